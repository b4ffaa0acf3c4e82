//! # InplaceDyn: Fixed-Capacity Inline Storage for Trait Objects
//!
//! [`InplaceDyn`] owns one value behind an object-safe trait, storing it
//! directly inside its own fixed-size buffer instead of on the heap. It
//! behaves like a local variable holding a polymorphic value: the concrete
//! type is erased, but copy (via [`Clone`]), move, and destruction work
//! exactly as they would for the concrete type itself.
//!
//! ## Core Concept
//!
//! A `Box<dyn Trait>` always heap-allocates. `InplaceDyn<dyn Trait, Space>`
//! never does: the payload lives in a buffer whose capacity and alignment
//! are those of the `Space` type parameter. A payload that does not fit is
//! rejected at compile time; there is deliberately no heap fallback.
//!
//! Alongside the payload bytes, the container tracks a per-type table of
//! erased lifecycle operations (drop, relocate, clone, footprint). One such
//! table exists per stored concrete type, process-wide; containers reference
//! it by address.
//!
//! ## Quick Start
//!
//! ```rust
//! #[macro_use]
//! extern crate inplace_dyn;
//!
//! # fn main() {
//! use inplace_dyn::InplaceDyn;
//! use inplace_dyn::space::S4;
//!
//! trait Animal {
//!     fn noise(&self) -> &'static str;
//! }
//!
//! #[derive(Clone)]
//! struct Dog;
//!
//! impl Animal for Dog {
//!     fn noise(&self) -> &'static str {
//!         "bark"
//!     }
//! }
//!
//! let mut pen: InplaceDyn<dyn Animal, S4> = inplace!(Dog);
//! assert_eq!(pen.noise(), "bark");
//!
//! let copy = pen.clone();
//! let moved = pen.take();
//! assert!(pen.is_empty());
//! assert_eq!(moved.noise(), "bark");
//! assert_eq!(copy.noise(), "bark");
//! # }
//! ```
//!
//! ## Capacity and Alignment
//!
//! The `Space` parameter is never constructed; only its size and alignment
//! matter. The [`space`] module provides word-multiple capacities (`S1` ..
//! `S64`), and any other type works as well:
//!
//! ```rust
//! #[macro_use]
//! extern crate inplace_dyn;
//!
//! # fn main() {
//! use core::fmt::Debug;
//! use inplace_dyn::InplaceDyn;
//!
//! // A custom 128-byte capacity.
//! type MySpace = [u8; 128];
//!
//! let val: InplaceDyn<dyn Debug, MySpace> = inplace!([0u8; 100]);
//! assert_eq!(val.allocated_size(), 100);
//! # }
//! ```
//!
//! **Important**: alignment matters as much as size. A payload whose
//! alignment exceeds the `Space` alignment is rejected at compile time, with
//! a diagnostic naming the violated constraint.
//!
//! ## Construction
//!
//! On stable Rust, construction goes through the [`inplace!`] and
//! [`emplace!`] macros, which capture the unsizing coercion from the
//! payload's concrete type to the base trait object at the call site.
//! Payload types must implement the base trait and be [`Clone`].
//!
//! With the `coerce` feature (nightly), the [`InplaceDyn::new`] and
//! [`InplaceDyn::emplace`] methods accept payloads directly.
//!
//! ## Reading the Value
//!
//! [`InplaceDyn::get`] and [`InplaceDyn::get_mut`] return the payload as the
//! base trait object, or `None` when the container is empty. The `Deref`
//! operators are conveniences over `get` and panic on an empty container;
//! check [`InplaceDyn::is_empty`] first when emptiness is possible.
//!
//! The base may be any object-safe trait (including `dyn Any`), a slice
//! type, or a sized type.
//!
//! ## No-std Usage
//!
//! The crate is `no_std`-compatible and never allocates:
//!
//! ```toml
//! [dependencies]
//! inplace-dyn = { version = "0.1", default-features = false }
//! ```
//!
//! ## Design Limits
//!
//! - No heap fallback: oversized payloads are a compile error, not a slower
//!   runtime path.
//! - Single-owner value semantics: no sharing, no internal synchronization.
//!   The container is `Send`/`Sync` exactly when the base trait object is.
//! - Every payload must be `Clone`, because the container itself is.

#![cfg_attr(feature = "nightly", feature(strict_provenance, set_ptr_value))]
#![cfg_attr(feature = "coerce", feature(unsize))]
#![cfg_attr(not(feature = "std"), no_std)]
#![allow(stable_features)]
#![deny(missing_docs)]
#![deny(clippy::as_conversions)]

mod erased;
mod inplace;
pub mod space;
mod sptr;
mod storage;

pub use crate::inplace::InplaceDyn;
