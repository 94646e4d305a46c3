//! # World Grammar
//!
//! The rules registry consumed by quest and puzzle generation. It loads a typed rule
//! set from a TOML document, validates it against its type hierarchy, and derives the
//! reverse of every rule once, on first use.
//!
//! The registry is immutable after loading and can be shared across threads.

mod error;
pub mod registry;

pub use error::*;
pub use registry::*;
