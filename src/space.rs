//! Capacity markers for the inline buffer.
//!
//! The size and alignment of the `Space` parameter decide how large a
//! payload an [`InplaceDyn`](crate::InplaceDyn) can hold and how its buffer
//! is aligned. The types here cover the common word-multiple capacities at
//! machine-word alignment; they are never constructed, only their layout is
//! used.
//!
//! Any other type works as a space as well, for example `[u8; 100]` for an
//! odd capacity, or a `#[repr(align(64))]` struct for cache-line alignment.

/// 1 machine word of inline capacity.
pub struct S1 {
    _inner: [usize; 1],
}

/// 2 machine words of inline capacity.
pub struct S2 {
    _inner: [usize; 2],
}

/// 4 machine words of inline capacity.
pub struct S4 {
    _inner: [usize; 4],
}

/// 8 machine words of inline capacity.
pub struct S8 {
    _inner: [usize; 8],
}

/// 16 machine words of inline capacity.
pub struct S16 {
    _inner: [usize; 16],
}

/// 32 machine words of inline capacity.
pub struct S32 {
    _inner: [usize; 32],
}

/// 64 machine words of inline capacity.
pub struct S64 {
    _inner: [usize; 64],
}
