// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Validation of string-like leaves.

use crate::types::{is_signature, BasicType};

/// Zero-terminated UTF-8 with no interior zero byte.
///
/// Returns the text without its terminator.
pub(crate) fn as_string(data: &[u8]) -> Option<&str> {
    let (&last, body) = data.split_last()?;
    if last != 0 || body.contains(&0) {
        return None;
    }
    std::str::from_utf8(body).ok()
}

/// D-Bus object path: `/`, or `/`-separated non-empty elements of
/// `[A-Za-z0-9_]` with no trailing slash.
pub fn is_object_path(path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    rest.split('/').all(|element| {
        !element.is_empty()
            && element
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    })
}

/// Text of a string leaf if it is valid for `basic`.
pub(crate) fn valid_text(basic: BasicType, data: &[u8]) -> Option<&str> {
    let text = as_string(data)?;
    let ok = match basic {
        BasicType::ObjectPath => is_object_path(text),
        BasicType::Signature => is_signature(text),
        _ => true,
    };
    ok.then_some(text)
}

/// Text substituted for an invalid string leaf.
pub(crate) fn default_text(basic: BasicType) -> &'static str {
    match basic {
        BasicType::ObjectPath => "/",
        _ => "",
    }
}
