// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hvariant - self-describing binary value serialisation
//!
//! A compact binary format for typed values, with random access into nested
//! containers and a defensive normal form for untrusted input.
//!
//! ## Quick Start
//!
//! ```rust
//! use hvariant::{Value, Variant, VariantType};
//!
//! let ty: VariantType = "a(si)".parse()?;
//! let value = Value::array(
//!     ty.element().unwrap(),
//!     vec![Value::tuple(vec![Value::from("x"), Value::Int32(5)])],
//! )?;
//!
//! let variant = Variant::from_value(&value);
//! let first = variant.child_value(0).unwrap();
//! assert_eq!(first.child_value(1).unwrap().as_serialised().as_i32(), 5);
//! # Ok::<(), hvariant::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |   Value (owned tree)          Variant (owned bytes, zero-copy kids)  |
//! +---------------------------------------------------------------------+
//! |   Serialised<'a>: borrowed view, O(1) child access                   |
//! +---------------------------------------------------------------------+
//! |   serialiser: needed_size / serialise / is_normal / normalise /      |
//! |               byteswap                                               |
//! +---------------------------------------------------------------------+
//! |   layout: TypeInfo + TypeInfoRegistry (alignment, fixed size, a/b/c) |
//! +---------------------------------------------------------------------+
//! |   types: VariantType grammar and composition                         |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`types`] - type strings and descriptors
//! - [`layout`] - per-type layout and the shared registry
//! - [`serialiser`] - container framing, normal form, byte swapping
//! - [`serialised`] - borrowed views
//! - [`value`] / [`variant`] - owned values
//! - [`config`] - format constants and runtime limits

/// Format constants and runtime limits.
pub mod config;
/// Error types (type grammar, value construction, I/O).
pub mod error;
/// Whole-file read and write.
pub mod io;
/// Type layouts and the shared layout registry.
pub mod layout;
/// Borrowed views with constant-time child access.
pub mod serialised;
/// Container serialisation, normal-form checks and byte swapping.
pub mod serialiser;
/// Type strings and type descriptors.
pub mod types;
/// Owned value trees.
pub mod value;
/// Owned serialised values with shared storage.
pub mod variant;

pub use error::{Error, Result, TypeError, ValueError};
pub use layout::{TypeInfo, TypeInfoRegistry};
pub use serialised::Serialised;
pub use serialiser::Filler;
pub use types::{BasicType, VariantType};
pub use value::Value;
pub use variant::Variant;
