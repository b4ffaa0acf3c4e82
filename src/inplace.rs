//! The container and its construction macros.
//!
//! [`InplaceDyn`] pairs an inline buffer with a slot recording what the
//! buffer holds: nothing, or a live payload together with its operations
//! table and the fat-pointer metadata needed to read it back as `Base`.

use core::fmt;
use core::mem;
use core::ops;

#[cfg(feature = "coerce")]
use core::marker::Unsize;

use crate::erased::ErasedOps;
use crate::sptr;
use crate::storage::InlineStorage;

/// Stores a value into a new container, coercing it to the container's base
/// trait.
///
/// This is the stable construction form: the macro captures the unsizing
/// coercion from the value's concrete type to the base at the call site.
/// The payload type must implement the base trait, be `Clone`, and fit the
/// container's `Space`; each violation is reported as its own compile-time
/// error.
///
/// # Example
///
/// ```
/// #[macro_use]
/// extern crate inplace_dyn;
///
/// # fn main() {
/// use core::fmt::Debug;
/// use inplace_dyn::InplaceDyn;
/// use inplace_dyn::space::S4;
///
/// let val: InplaceDyn<dyn Debug, S4> = inplace!([1u32, 2, 3]);
/// assert_eq!(format!("{:?}", val), "[1, 2, 3]");
/// # }
/// ```
#[macro_export]
macro_rules! inplace {
    ($e:expr) => {{
        let val = $e;
        let ptr = &val as *const _;
        #[allow(unsafe_code)]
        unsafe {
            $crate::InplaceDyn::new_unchecked(val, ptr)
        }
    }};
}

/// Replaces the contents of an existing container with a new value.
///
/// The value previously held (if any) is destroyed first, then the new one
/// is constructed in the buffer. The same compile-time payload constraints
/// apply as for [`inplace!`].
///
/// # Example
///
/// ```
/// #[macro_use]
/// extern crate inplace_dyn;
///
/// # fn main() {
/// use core::fmt::Debug;
/// use inplace_dyn::InplaceDyn;
/// use inplace_dyn::space::S4;
///
/// let mut val: InplaceDyn<dyn Debug, S4> = inplace!(1u8);
/// emplace!(val, "two");
/// assert_eq!(format!("{:?}", val), "\"two\"");
/// # }
/// ```
#[macro_export]
macro_rules! emplace {
    ($dst:expr, $e:expr) => {{
        let val = $e;
        let ptr = &val as *const _;
        #[allow(unsafe_code)]
        unsafe {
            $crate::InplaceDyn::emplace_unchecked(&mut $dst, val, ptr)
        }
    }};
}

/// A fixed-capacity container owning one value behind the base `Base`.
///
/// The value is stored directly in the container's buffer, whose capacity
/// and alignment are those of the `Space` type. The concrete payload type
/// is erased; all type-specific lifecycle work (drop, move, clone) routes
/// through a per-type `&'static` operations table recorded when the value
/// is stored.
///
/// A container is either empty or holds exactly one value. See the crate
/// documentation for the construction forms.
pub struct InplaceDyn<Base: ?Sized, Space> {
    storage: InlineStorage<Space>,
    slot: Slot<Base>,
}

/// What the buffer currently holds.
///
/// `Inplace` pairs the operations table of the live payload with the
/// fat-pointer template used to read it back as `Base`. An empty buffer has
/// neither; no other combination is representable.
enum Slot<Base: ?Sized> {
    Empty,
    Inplace {
        /// Lifecycle operations of the payload actually in the buffer.
        ops: &'static ErasedOps,
        /// Fat-pointer template; only its metadata half is meaningful, the
        /// address half is re-pointed at the buffer on every access.
        meta: *const Base,
    },
}

impl<Base: ?Sized> Clone for Slot<Base> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Base: ?Sized> Copy for Slot<Base> {}

impl<Base: ?Sized, Space> InplaceDyn<Base, Space> {
    /// Creates an empty container.
    ///
    /// # Example
    ///
    /// ```
    /// use core::fmt::Debug;
    /// use inplace_dyn::InplaceDyn;
    /// use inplace_dyn::space::S2;
    ///
    /// let val = InplaceDyn::<dyn Debug, S2>::empty();
    /// assert!(val.is_empty());
    /// ```
    pub const fn empty() -> Self {
        InplaceDyn {
            storage: InlineStorage::new(),
            slot: Slot::Empty,
        }
    }

    /// Whether a value of type `T` can be stored in this container type.
    ///
    /// # Example
    ///
    /// ```
    /// use core::fmt::Debug;
    /// use inplace_dyn::InplaceDyn;
    /// use inplace_dyn::space::S1;
    ///
    /// assert!(InplaceDyn::<dyn Debug, S1>::fits::<usize>());
    /// assert!(!InplaceDyn::<dyn Debug, S1>::fits::<[usize; 4]>());
    /// ```
    pub const fn fits<T>() -> bool {
        InlineStorage::<Space>::fits::<T>()
    }

    /// The buffer capacity in bytes.
    pub const fn capacity() -> usize {
        mem::size_of::<Space>()
    }

    /// The buffer alignment in bytes.
    pub const fn align() -> usize {
        mem::align_of::<Space>()
    }

    /// True when no value is stored.
    pub fn is_empty(&self) -> bool {
        matches!(self.slot, Slot::Empty)
    }

    /// Size of the stored value's concrete type, or 0 when empty.
    ///
    /// This is a diagnostic accessor: note that a zero-sized payload also
    /// reports 0 while [`is_empty`](InplaceDyn::is_empty) is false.
    ///
    /// # Example
    ///
    /// ```
    /// #[macro_use]
    /// extern crate inplace_dyn;
    ///
    /// # fn main() {
    /// use core::fmt::Debug;
    /// use inplace_dyn::InplaceDyn;
    /// use inplace_dyn::space::S2;
    ///
    /// let mut val: InplaceDyn<dyn Debug, S2> = inplace!(42u32);
    /// assert_eq!(val.allocated_size(), 4);
    ///
    /// let taken = val.take();
    /// assert_eq!(val.allocated_size(), 0);
    /// assert_eq!(taken.allocated_size(), 4);
    /// # }
    /// ```
    pub fn allocated_size(&self) -> usize {
        match self.slot {
            Slot::Empty => 0,
            Slot::Inplace { ops, .. } => ops.size(),
        }
    }

    /// The stored value as the base, or `None` when empty.
    ///
    /// The reference is valid until the container is mutated, moved, or
    /// dropped.
    ///
    /// # Example
    ///
    /// ```
    /// #[macro_use]
    /// extern crate inplace_dyn;
    ///
    /// # fn main() {
    /// use core::fmt::Debug;
    /// use inplace_dyn::InplaceDyn;
    /// use inplace_dyn::space::S2;
    ///
    /// let val: InplaceDyn<dyn Debug, S2> = inplace!(42u32);
    /// assert!(val.get().is_some());
    /// assert!(InplaceDyn::<dyn Debug, S2>::empty().get().is_none());
    /// # }
    /// ```
    pub fn get(&self) -> Option<&Base> {
        match self.slot {
            Slot::Empty => None,
            Slot::Inplace { meta, .. } => {
                // SAFETY: the buffer holds a live value whose concrete type
                // was coerced to `Base` when `meta` was captured.
                Some(unsafe { &*sptr::with_metadata_of(self.storage.as_ptr(), meta) })
            }
        }
    }

    /// The stored value as the base, mutably, or `None` when empty.
    pub fn get_mut(&mut self) -> Option<&mut Base> {
        match self.slot {
            Slot::Empty => None,
            Slot::Inplace { meta, .. } => {
                // SAFETY: as in `get`, with exclusivity from `&mut self`.
                Some(unsafe { &mut *sptr::with_metadata_of_mut(self.storage.as_mut_ptr(), meta) })
            }
        }
    }

    /// Destroys the stored value, leaving the container empty. No-op when
    /// already empty.
    ///
    /// # Example
    ///
    /// ```
    /// #[macro_use]
    /// extern crate inplace_dyn;
    ///
    /// # fn main() {
    /// use core::fmt::Debug;
    /// use inplace_dyn::InplaceDyn;
    /// use inplace_dyn::space::S2;
    ///
    /// let mut val: InplaceDyn<dyn Debug, S2> = inplace!(42u32);
    /// val.clear();
    /// assert!(val.is_empty());
    /// val.clear();
    /// # }
    /// ```
    pub fn clear(&mut self) {
        // Take the slot out first: the container is already empty when the
        // payload destructor runs, so an unwinding destructor can never
        // expose the dead value again.
        if let Slot::Inplace { ops, .. } = mem::replace(&mut self.slot, Slot::Empty) {
            // SAFETY: the slot said the buffer holds a live value of the
            // type `ops` was created for; it is dropped exactly once.
            unsafe { ops.drop(self.storage.as_mut_ptr()) }
        }
    }

    /// Moves the stored value out into a new container, leaving this one
    /// empty. An empty source yields an empty result.
    ///
    /// # Example
    ///
    /// ```
    /// #[macro_use]
    /// extern crate inplace_dyn;
    ///
    /// # fn main() {
    /// use core::fmt::Debug;
    /// use inplace_dyn::InplaceDyn;
    /// use inplace_dyn::space::S2;
    ///
    /// let mut val: InplaceDyn<dyn Debug, S2> = inplace!(42u32);
    /// let taken = val.take();
    /// assert!(val.is_empty());
    /// assert_eq!(format!("{:?}", taken), "42");
    /// # }
    /// ```
    pub fn take(&mut self) -> Self {
        let mut dst = Self::empty();
        if let Slot::Inplace { ops, meta } = mem::replace(&mut self.slot, Slot::Empty) {
            // SAFETY: both buffers fit the payload (same `Space`) and do
            // not overlap; the source slot is already cleared, so the
            // moved-from bytes are never dropped here.
            unsafe { ops.relocate(self.storage.as_ptr(), dst.storage.as_mut_ptr()) };
            dst.slot = Slot::Inplace { ops, meta };
        }
        dst
    }

    /// Creates a container holding `val`. Used by [`inplace!`]; prefer the
    /// macro, or [`new`](InplaceDyn::new) with the `coerce` feature.
    ///
    /// # Safety
    ///
    /// `ptr` must be `&val` coerced to `*const Base`, so that its metadata
    /// matches `val`'s concrete type.
    #[doc(hidden)]
    pub unsafe fn new_unchecked<U>(val: U, ptr: *const Base) -> Self
    where
        U: Clone,
    {
        let mut this = Self::empty();
        // SAFETY: forwarded to the caller's contract.
        unsafe { this.emplace_unchecked(val, ptr) };
        this
    }

    /// Replaces the contents with `val`, destroying the previous value
    /// first. Used by [`emplace!`]; prefer the macro, or
    /// [`emplace`](InplaceDyn::emplace) with the `coerce` feature.
    ///
    /// # Safety
    ///
    /// `ptr` must be `&val` coerced to `*const Base`, so that its metadata
    /// matches `val`'s concrete type.
    #[doc(hidden)]
    pub unsafe fn emplace_unchecked<U>(&mut self, val: U, ptr: *const Base)
    where
        U: Clone,
    {
        const {
            assert!(
                mem::size_of::<U>() <= mem::size_of::<Space>(),
                "payload is larger than the container's inline capacity"
            );
            assert!(
                mem::align_of::<U>() <= mem::align_of::<Space>(),
                "payload alignment exceeds the container's storage alignment"
            );
        }

        self.clear();
        self.storage.write(val);
        self.slot = Slot::Inplace {
            ops: ErasedOps::of::<U>(),
            meta: ptr,
        };
    }

    /// Creates a container holding `value`.
    ///
    /// Requires the `coerce` feature (nightly); on stable use [`inplace!`].
    #[cfg(feature = "coerce")]
    pub fn new<U>(value: U) -> Self
    where
        U: Unsize<Base> + Clone,
    {
        let thin: *const U = &value;
        let ptr: *const Base = thin;
        // SAFETY: the `Unsize` bound makes this the same coercion that
        // `inplace!` captures.
        unsafe { Self::new_unchecked(value, ptr) }
    }

    /// Replaces the contents with `value`, destroying the previous value
    /// first.
    ///
    /// Requires the `coerce` feature (nightly); on stable use [`emplace!`].
    #[cfg(feature = "coerce")]
    pub fn emplace<U>(&mut self, value: U)
    where
        U: Unsize<Base> + Clone,
    {
        let thin: *const U = &value;
        let ptr: *const Base = thin;
        // SAFETY: as in `new`.
        unsafe { self.emplace_unchecked(value, ptr) }
    }
}

impl<Base: ?Sized, Space> Default for InplaceDyn<Base, Space> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<Base: ?Sized, Space> ops::Drop for InplaceDyn<Base, Space> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<Base: ?Sized, Space> Clone for InplaceDyn<Base, Space> {
    fn clone(&self) -> Self {
        let mut dst = Self::empty();
        dst.clone_from(self);
        dst
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        if let Slot::Inplace { ops, meta } = source.slot {
            debug_assert!(ops.size() <= mem::size_of::<Space>());
            debug_assert!(ops.align() <= mem::align_of::<Space>());
            // SAFETY: the source buffer holds a live value of the type
            // `ops` was created for and the destination fits it (same
            // `Space`). The destination slot is only marked occupied after
            // the clone succeeds, so a panicking payload `Clone` leaves it
            // empty.
            unsafe { ops.clone_into(source.storage.as_ptr(), self.storage.as_mut_ptr()) };
            self.slot = Slot::Inplace { ops, meta };
        }
    }
}

impl<Base: ?Sized, Space> ops::Deref for InplaceDyn<Base, Space> {
    type Target = Base;

    /// Panics when the container is empty; use [`InplaceDyn::get`] to check
    /// first.
    fn deref(&self) -> &Base {
        self.get().expect("dereferenced an empty InplaceDyn")
    }
}

impl<Base: ?Sized, Space> ops::DerefMut for InplaceDyn<Base, Space> {
    /// Panics when the container is empty; use [`InplaceDyn::get_mut`] to
    /// check first.
    fn deref_mut(&mut self) -> &mut Base {
        self.get_mut().expect("dereferenced an empty InplaceDyn")
    }
}

impl<Base: ?Sized + fmt::Debug, Space> fmt::Debug for InplaceDyn<Base, Space> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.get() {
            Some(value) => fmt::Debug::fmt(value, f),
            None => f.write_str("<empty>"),
        }
    }
}

impl<Base: ?Sized + fmt::Display, Space> fmt::Display for InplaceDyn<Base, Space> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.get() {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str("<empty>"),
        }
    }
}

impl<Base: ?Sized + PartialEq, Space> PartialEq for InplaceDyn<Base, Space> {
    fn eq(&self, other: &InplaceDyn<Base, Space>) -> bool {
        match (self.get(), other.get()) {
            (Some(a), Some(b)) => PartialEq::eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

// Every payload was coerced to `Base` at construction, so it satisfies the
// same auto traits as `Base` itself.
unsafe impl<Base: ?Sized + Send, Space> Send for InplaceDyn<Base, Space> {}
unsafe impl<Base: ?Sized + Sync, Space> Sync for InplaceDyn<Base, Space> {}
