// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Owned value trees.
//!
//! [`Value`] is a fully decoded, typed value. It implements [`Filler`], so a
//! tree can be serialised in one call with [`Value::to_bytes`], and it can be
//! decoded from any [`Serialised`] view with [`Value::from_serialised`],
//! which substitutes defaults wherever the input is corrupt.
//!
//! # Example
//!
//! ```
//! use hvariant::{Value, VariantType};
//!
//! let entry = Value::dict_entry(Value::from("answer"), Value::variant(Value::Int32(42))).unwrap();
//! let dict = Value::array(&"{sv}".parse::<VariantType>().unwrap(), vec![entry]).unwrap();
//! assert_eq!(dict.type_string(), "a{sv}");
//! ```

use crate::error::ValueError;
use crate::layout::{basic_info, LayoutClass, TypeInfo, TypeInfoRegistry};
use crate::serialised::Serialised;
use crate::serialiser::{self, is_object_path, Filler};
use crate::types::{is_signature, BasicType, VariantType};
use std::sync::Arc;

/// An owned, typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Byte(u8),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Handle(i32),
    Double(f64),
    String(String),
    ObjectPath(String),
    Signature(String),
    /// A boxed value carrying its own type.
    Variant(Box<Value>),
    Array {
        info: Arc<TypeInfo>,
        items: Vec<Value>,
    },
    Maybe {
        info: Arc<TypeInfo>,
        item: Option<Box<Value>>,
    },
    Tuple {
        info: Arc<TypeInfo>,
        items: Vec<Value>,
    },
    DictEntry {
        info: Arc<TypeInfo>,
        entry: Box<[Value; 2]>,
    },
}

/// Resolve a definite container type built from value types.
fn resolve(ty: &VariantType) -> Arc<TypeInfo> {
    TypeInfoRegistry::global().resolve(ty)
}

fn check_items(element: &TypeInfo, items: &[Value]) -> Result<(), ValueError> {
    for item in items {
        let found = item.type_info();
        if *found != *element {
            return Err(ValueError::TypeMismatch {
                expected: element.type_string().to_string(),
                found: found.type_string().to_string(),
            });
        }
    }
    Ok(())
}

impl Value {
    /// Array of `element` values. Every item must have exactly that type.
    pub fn array(element: &VariantType, items: Vec<Value>) -> Result<Value, ValueError> {
        let info = TypeInfoRegistry::global().get(&VariantType::array(element))?;
        if let Some(element) = info.element() {
            check_items(element, &items)?;
        }
        Ok(Value::Array { info, items })
    }

    /// Maybe of `element`: `Just(item)` or `Nothing`.
    pub fn maybe(element: &VariantType, item: Option<Value>) -> Result<Value, ValueError> {
        let info = TypeInfoRegistry::global().get(&VariantType::maybe(element))?;
        if let (Some(element), Some(item)) = (info.element(), item.as_ref()) {
            check_items(element, std::slice::from_ref(item))?;
        }
        Ok(Value::Maybe {
            info,
            item: item.map(Box::new),
        })
    }

    /// Tuple of `items`; the empty tuple is the unit `()`.
    pub fn tuple(items: Vec<Value>) -> Value {
        let types: Vec<VariantType> = items.iter().map(Value::variant_type).collect();
        let info = resolve(&VariantType::tuple(&types));
        Value::Tuple { info, items }
    }

    /// Dictionary entry. The key must be of a basic type.
    pub fn dict_entry(key: Value, value: Value) -> Result<Value, ValueError> {
        let ty = VariantType::dict_entry(&key.variant_type(), &value.variant_type())?;
        Ok(Value::DictEntry {
            info: resolve(&ty),
            entry: Box::new([key, value]),
        })
    }

    pub fn variant(inner: Value) -> Value {
        Value::Variant(Box::new(inner))
    }

    pub fn object_path(path: &str) -> Result<Value, ValueError> {
        if !is_object_path(path) {
            return Err(ValueError::InvalidObjectPath(path.to_string()));
        }
        Ok(Value::ObjectPath(path.to_string()))
    }

    pub fn signature(signature: &str) -> Result<Value, ValueError> {
        if !is_signature(signature) {
            return Err(ValueError::InvalidSignature(signature.to_string()));
        }
        Ok(Value::Signature(signature.to_string()))
    }

    fn basic(&self) -> Option<BasicType> {
        Some(match self {
            Value::Boolean(_) => BasicType::Boolean,
            Value::Byte(_) => BasicType::Byte,
            Value::Int16(_) => BasicType::Int16,
            Value::Uint16(_) => BasicType::Uint16,
            Value::Int32(_) => BasicType::Int32,
            Value::Uint32(_) => BasicType::Uint32,
            Value::Int64(_) => BasicType::Int64,
            Value::Uint64(_) => BasicType::Uint64,
            Value::Handle(_) => BasicType::Handle,
            Value::Double(_) => BasicType::Double,
            Value::String(_) => BasicType::String,
            Value::ObjectPath(_) => BasicType::ObjectPath,
            Value::Signature(_) => BasicType::Signature,
            _ => return None,
        })
    }

    pub fn variant_type(&self) -> VariantType {
        match self {
            Value::Variant(_) => VariantType::variant(),
            Value::Array { info, .. }
            | Value::Maybe { info, .. }
            | Value::Tuple { info, .. }
            | Value::DictEntry { info, .. } => info.variant_type().clone(),
            leaf => match leaf.basic() {
                Some(basic) => VariantType::basic(basic),
                None => VariantType::unit(),
            },
        }
    }

    pub fn type_string(&self) -> String {
        self.variant_type().to_string()
    }

    /// Children of a container; empty for leaves.
    pub fn children(&self) -> &[Value] {
        match self {
            Value::Variant(inner) => std::slice::from_ref(inner.as_ref()),
            Value::Array { items, .. } | Value::Tuple { items, .. } => items,
            Value::Maybe { item, .. } => item.as_deref().map(std::slice::from_ref).unwrap_or(&[]),
            Value::DictEntry { entry, .. } => &entry[..],
            _ => &[],
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::ObjectPath(s) | Value::Signature(s) => Some(s),
            _ => None,
        }
    }

    /// Serialise into a new buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.size_hint()];
        self.write_into(&mut out);
        out
    }

    /// Decode a view, substituting defaults for corrupt data.
    pub fn from_serialised(view: &Serialised<'_>) -> Value {
        let info = Arc::clone(view.type_info());
        match view.type_info().class() {
            LayoutClass::Basic(basic) => match basic {
                BasicType::Boolean => Value::Boolean(view.as_bool()),
                BasicType::Byte => Value::Byte(view.as_u8()),
                BasicType::Int16 => Value::Int16(view.as_i16()),
                BasicType::Uint16 => Value::Uint16(view.as_u16()),
                BasicType::Int32 => Value::Int32(view.as_i32()),
                BasicType::Uint32 => Value::Uint32(view.as_u32()),
                BasicType::Int64 => Value::Int64(view.as_i64()),
                BasicType::Uint64 => Value::Uint64(view.as_u64()),
                BasicType::Handle => Value::Handle(view.as_i32()),
                BasicType::Double => Value::Double(view.as_f64()),
                BasicType::String => Value::String(view.as_str().to_string()),
                BasicType::ObjectPath => Value::ObjectPath(view.as_str().to_string()),
                BasicType::Signature => Value::Signature(view.as_str().to_string()),
            },
            LayoutClass::Variant => {
                let inner = view
                    .child_at(0)
                    .map_or_else(|| Value::tuple(Vec::new()), |c| Value::from_serialised(&c));
                Value::variant(inner)
            }
            LayoutClass::Array { .. } => Value::Array {
                items: view.children().map(|c| Value::from_serialised(&c)).collect(),
                info,
            },
            LayoutClass::Maybe { .. } => Value::Maybe {
                item: view
                    .child_at(0)
                    .map(|c| Box::new(Value::from_serialised(&c))),
                info,
            },
            LayoutClass::Tuple { .. } if info.variant_type().is_dict_entry() => {
                let mut children = view.children().map(|c| Value::from_serialised(&c));
                let key = children.next();
                let value = children.next();
                match (key, value) {
                    (Some(key), Some(value)) => Value::DictEntry {
                        entry: Box::new([key, value]),
                        info,
                    },
                    // a dict entry always has two members
                    _ => Value::tuple(Vec::new()),
                }
            }
            LayoutClass::Tuple { .. } => Value::Tuple {
                items: view.children().map(|c| Value::from_serialised(&c)).collect(),
                info,
            },
        }
    }
}

macro_rules! write_le {
    ($dest:expr, $value:expr) => {{
        let bytes = $value.to_le_bytes();
        $dest.copy_from_slice(&bytes);
    }};
}

impl Filler for Value {
    fn type_info(&self) -> Arc<TypeInfo> {
        match self {
            Value::Variant(_) => resolve(&VariantType::variant()),
            Value::Array { info, .. }
            | Value::Maybe { info, .. }
            | Value::Tuple { info, .. }
            | Value::DictEntry { info, .. } => Arc::clone(info),
            leaf => match leaf.basic() {
                Some(basic) => basic_info(basic),
                None => resolve(&VariantType::unit()),
            },
        }
    }

    fn size_hint(&self) -> usize {
        match self {
            Value::String(s) | Value::ObjectPath(s) | Value::Signature(s) => s.len() + 1,
            Value::Variant(inner) => {
                serialiser::needed_size(&self.type_info(), std::slice::from_ref(inner.as_ref()))
            }
            Value::Array { info, .. }
            | Value::Maybe { info, .. }
            | Value::Tuple { info, .. }
            | Value::DictEntry { info, .. } => serialiser::needed_size(info, self.children()),
            leaf => leaf.basic().map_or(0, BasicType::fixed_size),
        }
    }

    fn write_into(&self, dest: &mut [u8]) {
        match self {
            Value::Boolean(b) => dest[0] = u8::from(*b),
            Value::Byte(v) => dest[0] = *v,
            Value::Int16(v) => write_le!(dest, v),
            Value::Uint16(v) => write_le!(dest, v),
            Value::Int32(v) | Value::Handle(v) => write_le!(dest, v),
            Value::Uint32(v) => write_le!(dest, v),
            Value::Int64(v) => write_le!(dest, v),
            Value::Uint64(v) => write_le!(dest, v),
            Value::Double(v) => write_le!(dest, v),
            Value::String(s) | Value::ObjectPath(s) | Value::Signature(s) => {
                dest[..s.len()].copy_from_slice(s.as_bytes());
                dest[s.len()] = 0;
            }
            Value::Variant(inner) => serialiser::serialise(
                &self.type_info(),
                dest,
                std::slice::from_ref(inner.as_ref()),
            ),
            Value::Array { info, .. }
            | Value::Maybe { info, .. }
            | Value::Tuple { info, .. }
            | Value::DictEntry { info, .. } => serialiser::serialise(info, dest, self.children()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int16(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Uint16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Uint32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
