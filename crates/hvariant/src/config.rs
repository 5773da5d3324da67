// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Format constants and runtime limits.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: wire-format constants (alignments, scalar sizes,
//!   tag characters). These never change at runtime.
//! - **Level 2 (Dynamic)**: [`RuntimeConfig`] holding [`Limits`] behind an
//!   `ArcSwap`, so readers take an atomic snapshot without locking.
//!
//! # Example
//!
//! ```
//! use hvariant::config::{self, Limits};
//!
//! let limits = config::runtime().limits();
//! assert_eq!(limits.max_type_depth, config::DEFAULT_MAX_TYPE_DEPTH);
//!
//! let strict = config::RuntimeConfig::new();
//! strict.set_limits(Limits { max_nesting_depth: 16, ..Limits::default() });
//! assert_eq!(strict.limits().max_nesting_depth, 16);
//! ```

use arc_swap::ArcSwap;
use std::sync::{Arc, OnceLock};

// =======================================================================
// Wire format
// =======================================================================

/// Largest alignment any type can require, in bytes.
pub const MAX_ALIGNMENT: usize = 8;

/// Alignment of a variant container (one-less form).
pub const VARIANT_ALIGNMENT: u8 = 7;

/// Tags that may appear in a definite signature string.
pub const DEFINITE_SIGNATURE_TAGS: &[u8] = b"ybnqiuxthdvasog(){}";

/// Byte written into padding and string terminators.
pub const PADDING_BYTE: u8 = 0;

// =======================================================================
// Runtime limits
// =======================================================================

/// Default bound on type nesting accepted by the parser.
pub const DEFAULT_MAX_TYPE_DEPTH: usize = 128;

/// Default bound on container nesting followed through variants.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

/// Bounds applied when reading untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deepest container nesting a type string may describe.
    pub max_type_depth: usize,
    /// Deepest container nesting followed while reading a buffer. A variant
    /// found below this depth reads as the unit `()`.
    pub max_nesting_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_type_depth: DEFAULT_MAX_TYPE_DEPTH,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// Runtime configuration with lock-free reads.
pub struct RuntimeConfig {
    /// Current limits. Replaced as a whole, read via atomic load.
    limits: ArcSwap<Limits>,
}

impl RuntimeConfig {
    /// Create a configuration holding the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            limits: ArcSwap::from_pointee(Limits::default()),
        }
    }

    /// Snapshot of the current limits.
    pub fn limits(&self) -> Limits {
        **self.limits.load()
    }

    /// Atomically replace the limits.
    ///
    /// Zero depths are raised to 1 so that a top-level value can always be
    /// read.
    pub fn set_limits(&self, limits: Limits) {
        let limits = Limits {
            max_type_depth: limits.max_type_depth.max(1),
            max_nesting_depth: limits.max_nesting_depth.max(1),
        };
        log::debug!("[config] limits set to {:?}", limits);
        self.limits.store(Arc::new(limits));
    }

    /// Restore the default limits.
    pub fn reset(&self) {
        self.limits.store(Arc::new(Limits::default()));
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

static RUNTIME: OnceLock<RuntimeConfig> = OnceLock::new();

/// Process-wide runtime configuration.
pub fn runtime() -> &'static RuntimeConfig {
    RUNTIME.get_or_init(RuntimeConfig::new)
}
