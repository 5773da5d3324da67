// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Whole-file helpers.
//!
//! A file holds exactly one serialised value, with no header: the type is
//! supplied by the caller. Data read from disk is untrusted.

use crate::error::Result;
use crate::types::VariantType;
use crate::variant::Variant;
use std::fs;
use std::path::Path;

/// Read the whole file at `path` as a value of type `ty`.
pub fn read_variant(path: impl AsRef<Path>, ty: &VariantType) -> Result<Variant> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    log::debug!(
        "[io] read {} bytes of '{}' from {}",
        bytes.len(),
        ty,
        path.display()
    );
    Ok(Variant::from_bytes(ty, bytes)?)
}

/// Write the normal form of `variant` to `path`, replacing any existing file.
pub fn write_variant(path: impl AsRef<Path>, variant: &Variant) -> Result<()> {
    let path = path.as_ref();
    let normal = variant.normal_form();
    let bytes = normal.data().unwrap_or(&[]);
    fs::write(path, bytes)?;
    log::debug!(
        "[io] wrote {} bytes of '{}' to {}",
        bytes.len(),
        variant.type_string(),
        path.display()
    );
    Ok(())
}
