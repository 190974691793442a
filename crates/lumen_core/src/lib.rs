//! Lumen Core
//!
//! Foundational value model shared by the animation system and the render
//! front ends that consume it:
//!
//! - **Values**: a closed set of animatable kinds (numbers, flags, text,
//!   fixed-shape vectors, variable-length sequences, keyed mappings)
//! - **Conversions**: `From` impls for Rust primitives, tuples and arrays
//! - **Accessors**: typed views such as `as_f64()` or `as_rgb()` for painting
//! - **Serde**: values serialize tagged by kind, so they can live in config files
//!
//! # Example
//!
//! ```rust
//! use lumen_core::Value;
//!
//! let color = Value::from((255, 128, 0));
//! assert_eq!(color.as_rgb(), Some([255, 128, 0]));
//!
//! let alpha = Value::from(0.5);
//! assert_eq!(alpha.as_f64(), Some(0.5));
//! ```

pub mod value;

pub use value::{Mapping, Value};
