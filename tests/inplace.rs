#[macro_use]
extern crate inplace_dyn;

use std::cell::Cell;
use std::fmt::Debug;
use std::fmt::Display;
use std::mem;
use std::panic;
use std::rc::Rc;

use inplace_dyn::space::{S1, S2, S4, S8};
use inplace_dyn::InplaceDyn;
use static_assertions::{assert_impl_all, assert_not_impl_any};

trait Counter {
    fn value(&self) -> u64;
    fn bump(&mut self);
}

#[derive(Clone)]
struct Simple(u64);

impl Counter for Simple {
    fn value(&self) -> u64 {
        self.0
    }

    fn bump(&mut self) {
        self.0 += 1;
    }
}

/// Payload whose destructor bumps a shared counter; clones share the same
/// counter.
#[derive(Clone)]
struct Tracked {
    drops: Rc<Cell<usize>>,
    value: u64,
}

impl Tracked {
    fn new(drops: &Rc<Cell<usize>>, value: u64) -> Self {
        Tracked {
            drops: Rc::clone(drops),
            value,
        }
    }
}

impl Counter for Tracked {
    fn value(&self) -> u64 {
        self.value
    }

    fn bump(&mut self) {
        self.value += 1;
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// Payload whose `Clone` always panics.
struct PoisonClone;

impl Clone for PoisonClone {
    fn clone(&self) -> Self {
        panic!("payload clone failed");
    }
}

impl Counter for PoisonClone {
    fn value(&self) -> u64 {
        0
    }

    fn bump(&mut self) {}
}

/// Payload whose destructor records the drop, then panics.
#[derive(Clone)]
struct PoisonDrop {
    drops: Rc<Cell<usize>>,
}

impl Counter for PoisonDrop {
    fn value(&self) -> u64 {
        0
    }

    fn bump(&mut self) {}
}

impl Drop for PoisonDrop {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
        panic!("payload drop failed");
    }
}

assert_impl_all!(InplaceDyn<dyn Debug + Send + Sync, S4>: Send, Sync);
assert_not_impl_any!(InplaceDyn<dyn Debug, S4>: Send, Sync);

#[test]
fn reads_through_base_match_direct_value() {
    let mut direct = Simple(7);
    let mut erased: InplaceDyn<dyn Counter, S4> = inplace!(Simple(7));

    assert_eq!(erased.value(), direct.value());
    erased.bump();
    direct.bump();
    assert_eq!(erased.value(), direct.value());
}

#[test]
fn clone_is_independent() {
    let mut a: InplaceDyn<dyn Counter, S4> = inplace!(Simple(1));
    let mut b = a.clone();

    a.get_mut().unwrap().bump();
    assert_eq!(a.value(), 2);
    assert_eq!(b.value(), 1);

    b.get_mut().unwrap().bump();
    b.get_mut().unwrap().bump();
    assert_eq!(a.value(), 2);
    assert_eq!(b.value(), 3);
}

#[test]
fn take_leaves_source_empty() {
    let mut a: InplaceDyn<dyn Counter, S4> = inplace!(Simple(3));
    let b = a.take();

    assert!(a.is_empty());
    assert_eq!(a.allocated_size(), 0);
    assert!(a.get().is_none());

    assert_eq!(b.value(), 3);
    assert_eq!(b.allocated_size(), mem::size_of::<Simple>());
}

#[test]
fn self_move_keeps_value() {
    let drops = Rc::new(Cell::new(0));
    let mut a: InplaceDyn<dyn Counter, S8> = inplace!(Tracked::new(&drops, 9));

    a = a.take();
    assert_eq!(a.value(), 9);
    assert_eq!(drops.get(), 0);

    drop(a);
    assert_eq!(drops.get(), 1);
}

#[test]
fn empty_source_yields_empty_destination() {
    let mut a = InplaceDyn::<dyn Counter, S4>::empty();
    assert!(a.clone().is_empty());
    assert!(a.take().is_empty());
    assert!(a.is_empty());
}

#[test]
fn reemplace_destroys_exactly_one_prior_value() {
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));

    let mut val: InplaceDyn<dyn Counter, S8> = inplace!(Tracked::new(&first, 1));
    emplace!(val, Tracked::new(&second, 2));

    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 0);
    assert_eq!(val.value(), 2);

    drop(val);
    assert_eq!(second.get(), 1);
}

#[test]
fn allocated_size_tracks_concrete_type() {
    let mut val: InplaceDyn<dyn Counter, S8> = inplace!(Simple(0));
    assert_eq!(val.allocated_size(), mem::size_of::<Simple>());

    val.clear();
    assert_eq!(val.allocated_size(), 0);

    let drops = Rc::new(Cell::new(0));
    emplace!(val, Tracked::new(&drops, 0));
    assert_eq!(val.allocated_size(), mem::size_of::<Tracked>());

    let _ = val.take();
    assert_eq!(val.allocated_size(), 0);
}

// The 64-byte scenario: a small tracked payload is copied, the original is
// destroyed, and the copy keeps living with its own value.
#[test]
fn clone_survives_source_destruction() {
    let drops = Rc::new(Cell::new(0));
    let original: InplaceDyn<dyn Counter, S8> = inplace!(Tracked::new(&drops, 5));
    assert_eq!(original.allocated_size(), mem::size_of::<Tracked>());

    let copy = original.clone();
    drop(original);
    assert_eq!(drops.get(), 1);
    assert_eq!(copy.value(), 5);

    drop(copy);
    assert_eq!(drops.get(), 2);
}

#[test]
fn move_into_occupied_destroys_previous_once() {
    let b_drops = Rc::new(Cell::new(0));
    let c_drops = Rc::new(Cell::new(0));

    let mut b: InplaceDyn<dyn Counter, S8> = inplace!(Tracked::new(&b_drops, 10));
    let mut c: InplaceDyn<dyn Counter, S8> = inplace!(Tracked::new(&c_drops, 20));

    c = b.take();
    assert_eq!(c_drops.get(), 1);
    assert_eq!(b_drops.get(), 0);
    assert!(b.is_empty());
    assert_eq!(c.value(), 10);

    drop(c);
    assert_eq!(b_drops.get(), 1);
}

#[test]
fn clone_from_tears_down_destination_first() {
    let src_drops = Rc::new(Cell::new(0));
    let dst_drops = Rc::new(Cell::new(0));

    let src: InplaceDyn<dyn Counter, S8> = inplace!(Tracked::new(&src_drops, 1));
    let mut dst: InplaceDyn<dyn Counter, S8> = inplace!(Tracked::new(&dst_drops, 2));

    dst.clone_from(&src);
    assert_eq!(dst_drops.get(), 1);
    assert_eq!(src_drops.get(), 0);
    assert_eq!(dst.value(), 1);
    // Copy is non-destructive to the source.
    assert_eq!(src.value(), 1);
    assert!(!src.is_empty());
}

#[test]
fn panicking_clone_leaves_destination_empty() {
    let dst_drops = Rc::new(Cell::new(0));

    let src: InplaceDyn<dyn Counter, S8> = inplace!(PoisonClone);
    let mut dst: InplaceDyn<dyn Counter, S8> = inplace!(Tracked::new(&dst_drops, 1));

    let unwind = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        dst.clone_from(&src);
    }));
    assert!(unwind.is_err());

    // The destination's prior value was torn down exactly once, and the
    // failed clone left it empty rather than claiming a live payload.
    assert_eq!(dst_drops.get(), 1);
    assert!(dst.is_empty());
    assert_eq!(dst.allocated_size(), 0);
    assert!(!src.is_empty());
}

#[test]
fn panicking_drop_still_empties_container() {
    let drops = Rc::new(Cell::new(0));
    let mut val: InplaceDyn<dyn Counter, S8> = inplace!(PoisonDrop {
        drops: Rc::clone(&drops),
    });

    let unwind = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        val.clear();
    }));
    assert!(unwind.is_err());

    assert_eq!(drops.get(), 1);
    assert!(val.is_empty());

    // The container no longer claims the payload, so dropping it must not
    // run the destructor a second time.
    drop(val);
    assert_eq!(drops.get(), 1);
}

#[test]
fn slice_payloads_compare_equal() {
    let a: InplaceDyn<[u32], S4> = inplace!([1u32, 2, 3]);
    let b = a.clone();

    assert_eq!(a.len(), 3);
    assert_eq!(a, b);
    assert_ne!(a, InplaceDyn::<[u32], S4>::empty());
    assert_eq!(InplaceDyn::<[u32], S4>::empty(), InplaceDyn::empty());
}

#[test]
fn capacity_and_alignment_are_space_layout() {
    assert_eq!(
        InplaceDyn::<dyn Counter, S8>::capacity(),
        8 * mem::size_of::<usize>()
    );
    assert_eq!(
        InplaceDyn::<dyn Counter, S8>::align(),
        mem::align_of::<usize>()
    );
    assert!(InplaceDyn::<dyn Counter, S4>::fits::<Simple>());
    assert!(!InplaceDyn::<dyn Counter, S8>::fits::<[u64; 9]>());
}

#[test]
fn display_and_debug_formatting() {
    let val: InplaceDyn<dyn Display, S1> = inplace!(42u32);
    assert_eq!(val.to_string(), "42");
    assert_eq!(
        format!("{}", InplaceDyn::<dyn Display, S1>::empty()),
        "<empty>"
    );

    let val: InplaceDyn<dyn Debug, S2> = inplace!("x");
    assert_eq!(format!("{:?}", val), "\"x\"");
}
