//! Per-type tables of erased lifecycle operations.
//!
//! Every concrete payload type stored in a container gets one process-wide
//! table of function pointers covering the operations the container must
//! perform without static knowledge of the type: destruction, relocation,
//! cloning, and footprint queries. Tables are const-promoted `&'static`
//! records created once per instantiation; containers reference them by
//! address and never own or copy them.
//!
//! The fields are private to this module, so a table can only be obtained
//! through [`ErasedOps::of`], which pairs every function pointer with the
//! same payload type `T`. A container upholding "the buffer holds a live
//! `T` iff its slot references the table for `T`" can therefore dispatch
//! through the table without re-checking types.

use core::mem;
use core::ptr;

/// Erased lifecycle operations for one concrete payload type.
pub(crate) struct ErasedOps {
    /// Runs the payload's destructor on the bytes at `ptr`.
    drop: unsafe fn(*mut u8),
    /// Moves the payload from `src` to `dst`. The source bytes are no
    /// longer live afterwards and must be forgotten by the caller.
    relocate: unsafe fn(*const u8, *mut u8),
    /// Clones the payload at `src` into `dst`, leaving `src` live.
    clone_into: unsafe fn(*const u8, *mut u8),
    /// `size_of` the payload type.
    size: fn() -> usize,
    /// `align_of` the payload type.
    align: fn() -> usize,
}

impl ErasedOps {
    /// The operations table for payload type `T`.
    pub(crate) const fn of<T: Clone>() -> &'static Self {
        const {
            &ErasedOps {
                drop: drop_in_buffer::<T>,
                relocate: relocate::<T>,
                clone_into: clone_into::<T>,
                size: mem::size_of::<T>,
                align: mem::align_of::<T>,
            }
        }
    }

    /// Runs the payload destructor on the bytes at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live, properly aligned value of the type this
    /// table was created for, and that value must never be used again.
    #[inline]
    pub(crate) unsafe fn drop(&self, ptr: *mut u8) {
        unsafe { (self.drop)(ptr) }
    }

    /// Moves the payload at `src` into `dst`.
    ///
    /// # Safety
    ///
    /// Both pointers must be properly aligned for the type this table was
    /// created for and must not overlap; `src` must hold a live value and
    /// `dst` writable uninitialized bytes. Afterwards the value lives at
    /// `dst` and the caller must treat `src` as dead without dropping it.
    #[inline]
    pub(crate) unsafe fn relocate(&self, src: *const u8, dst: *mut u8) {
        unsafe { (self.relocate)(src, dst) }
    }

    /// Clones the payload at `src` into `dst`, leaving `src` live.
    ///
    /// # Safety
    ///
    /// Both pointers must be properly aligned for the type this table was
    /// created for and must not overlap; `src` must hold a live value and
    /// `dst` writable uninitialized bytes. A panicking payload `Clone`
    /// propagates and leaves `dst` uninitialized.
    #[inline]
    pub(crate) unsafe fn clone_into(&self, src: *const u8, dst: *mut u8) {
        unsafe { (self.clone_into)(src, dst) }
    }

    /// Size of the payload type in bytes.
    #[inline]
    pub(crate) fn size(&self) -> usize {
        (self.size)()
    }

    /// Alignment of the payload type in bytes.
    #[inline]
    pub(crate) fn align(&self) -> usize {
        (self.align)()
    }
}

unsafe fn drop_in_buffer<T>(ptr: *mut u8) {
    // SAFETY: the caller passes bytes holding a live `T`.
    unsafe { ptr.cast::<T>().drop_in_place() }
}

unsafe fn relocate<T>(src: *const u8, dst: *mut u8) {
    // Rust moves are bitwise; the caller forgets the source afterwards.
    unsafe { ptr::copy_nonoverlapping(src.cast::<T>(), dst.cast::<T>(), 1) }
}

unsafe fn clone_into<T: Clone>(src: *const u8, dst: *mut u8) {
    // `dst` is written only after the clone returns, so an unwinding
    // `Clone` leaves the destination untouched.
    let cloned = unsafe { &*src.cast::<T>() }.clone();
    unsafe { dst.cast::<T>().write(cloned) }
}
