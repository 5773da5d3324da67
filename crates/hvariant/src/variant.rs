// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Owned serialised values.
//!
//! A [`Variant`] owns (a shared slice of) a serialised buffer together with
//! its type layout. Children share the parent's buffer, so walking into a
//! large value never copies. Buffers from outside the process are
//! *untrusted*: their normal-form status is checked on first use and
//! cached.

use crate::error::TypeError;
use crate::layout::{TypeInfo, TypeInfoRegistry};
use crate::serialised::Serialised;
use crate::serialiser::{self, Filler};
use crate::types::{BasicType, VariantType};
use crate::value::Value;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// An immutable serialised value with shared storage.
#[derive(Clone)]
pub struct Variant {
    type_info: Arc<TypeInfo>,
    bytes: Arc<[u8]>,
    /// Byte range inside `bytes`; `None` when the value reads as zeros.
    range: Option<(usize, usize)>,
    size: usize,
    depth: usize,
    normal: OnceLock<bool>,
}

impl Variant {
    /// Serialise `value` into a new trusted variant.
    pub fn from_value(value: &Value) -> Variant {
        let bytes: Arc<[u8]> = value.to_bytes().into();
        Self::trusted(value.type_info(), bytes)
    }

    /// Wrap an untrusted buffer as a value of type `ty`.
    pub fn from_bytes(ty: &VariantType, bytes: impl Into<Arc<[u8]>>) -> Result<Variant, TypeError> {
        let type_info = TypeInfoRegistry::global().get(ty)?;
        let bytes = bytes.into();
        let (range, size) = {
            let view = Serialised::new(Arc::clone(&type_info), &bytes);
            (view.data().map(|d| (0, d.len())), view.size())
        };
        Ok(Variant {
            type_info,
            range,
            size,
            depth: 0,
            normal: OnceLock::new(),
            bytes,
        })
    }

    fn trusted(type_info: Arc<TypeInfo>, bytes: Arc<[u8]>) -> Variant {
        let size = bytes.len();
        Variant {
            type_info,
            range: Some((0, size)),
            size,
            depth: 0,
            normal: OnceLock::from(true),
            bytes,
        }
    }

    pub fn type_info(&self) -> &Arc<TypeInfo> {
        &self.type_info
    }

    pub fn variant_type(&self) -> &VariantType {
        self.type_info.variant_type()
    }

    pub fn type_string(&self) -> &str {
        self.type_info.type_string()
    }

    /// Serialised bytes; `None` for a value that reads as zeros.
    pub fn data(&self) -> Option<&[u8]> {
        self.range.map(|(start, end)| &self.bytes[start..end])
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Borrowed view of the serialised data.
    pub fn as_serialised(&self) -> Serialised<'_> {
        Serialised {
            type_info: Arc::clone(&self.type_info),
            data: self.data(),
            size: self.size,
            depth: self.depth,
        }
    }

    pub fn n_children(&self) -> usize {
        self.as_serialised().n_children()
    }

    /// Child `index`, sharing this variant's buffer.
    pub fn child_value(&self, index: usize) -> Option<Variant> {
        let view = self.as_serialised();
        let child = view.child_at(index)?;
        let base = self.bytes.as_ptr() as usize;
        let range = child.data().map(|d| {
            let start = d.as_ptr() as usize - base;
            (start, start + d.len())
        });
        let trusted = self.normal.get() == Some(&true);
        Some(Variant {
            type_info: Arc::clone(child.type_info()),
            bytes: Arc::clone(&self.bytes),
            range,
            size: child.size(),
            depth: child.depth(),
            normal: if trusted {
                OnceLock::from(true)
            } else {
                OnceLock::new()
            },
        })
    }

    /// True if the buffer is in normal form. Computed once.
    pub fn is_normal_form(&self) -> bool {
        *self
            .normal
            .get_or_init(|| serialiser::is_normal(&self.as_serialised()))
    }

    /// This value in normal form; shares storage when already normal.
    pub fn normal_form(&self) -> Variant {
        if self.is_normal_form() {
            return self.clone();
        }
        let bytes: Arc<[u8]> = serialiser::normalise(&self.as_serialised()).into();
        Self::trusted(Arc::clone(&self.type_info), bytes)
    }

    /// Byte-swapped copy, always in normal form.
    pub fn byteswap(&self) -> Variant {
        let bytes: Arc<[u8]> = serialiser::byteswap(&self.as_serialised()).into();
        Self::trusted(Arc::clone(&self.type_info), bytes)
    }

    /// Decode into an owned value tree.
    pub fn to_value(&self) -> Value {
        Value::from_serialised(&self.as_serialised())
    }

    /// Raw elements of an array of fixed-size values, without copying.
    pub fn fixed_array(&self) -> Option<&[u8]> {
        self.as_serialised().fixed_array()
    }

    /// Value stored under `key` in an `a{s*}` or `a{o*}` dictionary.
    ///
    /// The first matching entry wins. Values of type `v` are unwrapped.
    /// With `expected` set, a value whose type does not match it reads
    /// as `None`, as does any other dictionary shape.
    pub fn lookup_value(&self, key: &str, expected: Option<&VariantType>) -> Option<Variant> {
        let ty = self.variant_type();
        let entry_type = ty.element().filter(|_| ty.is_array())?;
        match entry_type.key().and_then(VariantType::as_basic) {
            Some(BasicType::String | BasicType::ObjectPath) => {}
            _ => return None,
        }

        for index in 0..self.n_children() {
            let Some(entry) = self.child_value(index) else {
                continue;
            };
            let matches = entry
                .child_value(0)
                .is_some_and(|found| found.as_serialised().as_str() == key);
            if !matches {
                continue;
            }
            let mut value = entry.child_value(1)?;
            if value.variant_type().is_variant() {
                value = value.child_value(0)?;
            }
            return match expected {
                Some(expected) if !value.variant_type().is_subtype_of(expected) => None,
                _ => Some(value),
            };
        }
        None
    }

    /// Order two values of the same basic type.
    ///
    /// Numbers compare by value, strings byte-wise and `false` sorts before
    /// `true`. A double that is neither equal to nor greater than the other
    /// (NaN) sorts first. `None` when the types differ or are not basic.
    pub fn compare(&self, other: &Variant) -> Option<Ordering> {
        let basic = self.type_info.as_basic()?;
        if other.type_info.as_basic() != Some(basic) {
            return None;
        }
        let (a, b) = (self.as_serialised(), other.as_serialised());
        Some(match basic {
            BasicType::Boolean => a.as_bool().cmp(&b.as_bool()),
            BasicType::Byte => a.as_u8().cmp(&b.as_u8()),
            BasicType::Int16 => a.as_i16().cmp(&b.as_i16()),
            BasicType::Uint16 => a.as_u16().cmp(&b.as_u16()),
            BasicType::Int32 | BasicType::Handle => a.as_i32().cmp(&b.as_i32()),
            BasicType::Uint32 => a.as_u32().cmp(&b.as_u32()),
            BasicType::Int64 => a.as_i64().cmp(&b.as_i64()),
            BasicType::Uint64 => a.as_u64().cmp(&b.as_u64()),
            BasicType::Double => {
                let (x, y) = (a.as_f64(), b.as_f64());
                if x == y {
                    Ordering::Equal
                } else if x > y {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            BasicType::String | BasicType::ObjectPath | BasicType::Signature => {
                a.as_str().cmp(b.as_str())
            }
        })
    }
}

impl Filler for Variant {
    fn type_info(&self) -> Arc<TypeInfo> {
        Arc::clone(&self.type_info)
    }

    fn size_hint(&self) -> usize {
        if self.is_normal_form() {
            self.size
        } else {
            self.as_serialised().size_hint()
        }
    }

    fn write_into(&self, dest: &mut [u8]) {
        match self.data() {
            Some(data) if self.is_normal_form() => dest.copy_from_slice(data),
            _ => self.as_serialised().write_into(dest),
        }
    }
}

/// Values are equal when their types match and their normal forms are
/// byte-identical.
impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        if self.type_info != other.type_info {
            return false;
        }
        let a = self.normal_form();
        let b = other.normal_form();
        a.data().unwrap_or(&[]) == b.data().unwrap_or(&[])
    }
}

impl Eq for Variant {}

/// Hashes the type and the normal-form bytes, agreeing with `==`.
impl Hash for Variant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.variant_type().hash(state);
        self.normal_form().data().unwrap_or(&[]).hash(state);
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variant")
            .field("type", &self.type_string())
            .field("size", &self.size)
            .field("normal", &self.normal.get())
            .finish()
    }
}

impl From<&Value> for Variant {
    fn from(value: &Value) -> Self {
        Variant::from_value(value)
    }
}
