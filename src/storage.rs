//! The inline byte buffer backing a container.

use core::mem::{self, MaybeUninit};

/// A fixed buffer with the size and alignment of `Space`.
///
/// The buffer itself never knows what it holds; the container pairs it with
/// the [`ErasedOps`](crate::erased::ErasedOps) table of the live payload, if
/// any, and routes every payload operation through that table.
pub(crate) struct InlineStorage<Space> {
    bytes: MaybeUninit<Space>,
}

impl<Space> InlineStorage<Space> {
    /// A buffer with no live payload.
    pub(crate) const fn new() -> Self {
        InlineStorage {
            bytes: MaybeUninit::uninit(),
        }
    }

    /// Whether a value of type `T` can live in this buffer.
    pub(crate) const fn fits<T>() -> bool {
        mem::size_of::<T>() <= mem::size_of::<Space>()
            && mem::align_of::<T>() <= mem::align_of::<Space>()
    }

    /// First byte of the buffer.
    pub(crate) fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr().cast()
    }

    /// First byte of the buffer, mutably.
    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr().cast()
    }

    /// Places `value` at the start of the buffer.
    ///
    /// A payload previously in the buffer is overwritten without being
    /// dropped; the caller must have disposed of it first.
    pub(crate) fn write<T>(&mut self, value: T) {
        // Every caller rejects oversized payloads at compile time already.
        debug_assert!(mem::size_of::<T>() <= mem::size_of::<Space>());
        debug_assert!(mem::align_of::<T>() <= mem::align_of::<Space>());

        // SAFETY: the value fits, the buffer is at least as aligned, and
        // `&mut self` gives exclusive access.
        unsafe { self.as_mut_ptr().cast::<T>().write(value) }
    }
}
