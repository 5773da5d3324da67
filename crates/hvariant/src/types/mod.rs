// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors.
//!
//! A [`VariantType`] is an immutable, reference-counted tree describing the
//! shape of a value. It is created by parsing a type string or by composing
//! existing descriptors, and compares by its canonical string.
//!
//! # Grammar
//!
//! | Tag        | Meaning                                  |
//! |------------|------------------------------------------|
//! | `b`        | boolean                                  |
//! | `y`        | byte                                     |
//! | `n` / `q`  | int16 / uint16                           |
//! | `i` / `u`  | int32 / uint32                           |
//! | `x` / `t`  | int64 / uint64                           |
//! | `h`        | handle (int32)                           |
//! | `d`        | double                                   |
//! | `s` `o` `g`| string / object path / signature         |
//! | `v`        | variant                                  |
//! | `aT` `mT`  | array / maybe of `T`                     |
//! | `(T...)`   | tuple                                    |
//! | `{KV}`     | dictionary entry, `K` basic              |
//! | `?` `r` `*`| any basic / any tuple / any type         |
//!
//! # Example
//!
//! ```
//! use hvariant::VariantType;
//!
//! let ty: VariantType = "a{sv}".parse().unwrap();
//! assert!(ty.is_array());
//! assert!(ty.is_definite());
//! assert_eq!(ty.element().unwrap().as_str(), "{sv}");
//! ```

mod grammar;

pub use grammar::{is_signature, scan_type, string_is_valid};

use crate::error::TypeError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// Basic (scalar and string-like) types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicType {
    Boolean,
    Byte,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Handle,
    Double,
    String,
    ObjectPath,
    Signature,
}

impl BasicType {
    /// Type string character.
    pub fn tag(self) -> u8 {
        match self {
            Self::Boolean => b'b',
            Self::Byte => b'y',
            Self::Int16 => b'n',
            Self::Uint16 => b'q',
            Self::Int32 => b'i',
            Self::Uint32 => b'u',
            Self::Int64 => b'x',
            Self::Uint64 => b't',
            Self::Handle => b'h',
            Self::Double => b'd',
            Self::String => b's',
            Self::ObjectPath => b'o',
            Self::Signature => b'g',
        }
    }

    /// Look up a basic type by its tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            b'b' => Self::Boolean,
            b'y' => Self::Byte,
            b'n' => Self::Int16,
            b'q' => Self::Uint16,
            b'i' => Self::Int32,
            b'u' => Self::Uint32,
            b'x' => Self::Int64,
            b't' => Self::Uint64,
            b'h' => Self::Handle,
            b'd' => Self::Double,
            b's' => Self::String,
            b'o' => Self::ObjectPath,
            b'g' => Self::Signature,
            _ => return None,
        })
    }

    /// Encoded size in bytes (0 for the string-like types).
    pub fn fixed_size(self) -> usize {
        match self {
            Self::Boolean | Self::Byte => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Handle => 4,
            Self::Int64 | Self::Uint64 | Self::Double => 8,
            Self::String | Self::ObjectPath | Self::Signature => 0,
        }
    }

    /// Alignment requirement in one-less form (0, 1, 3 or 7).
    pub fn alignment(self) -> u8 {
        match self.fixed_size() {
            0 => 0,
            n => (n - 1) as u8,
        }
    }

    /// True for `s`, `o` and `g`.
    pub fn is_string_like(self) -> bool {
        self.fixed_size() == 0
    }
}

/// The shape of one type node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Basic(BasicType),
    Variant,
    /// `*`: any type.
    Any,
    /// `?`: any basic type.
    AnyBasic,
    /// `r`: any tuple.
    AnyTuple,
    Array(VariantType),
    Maybe(VariantType),
    Tuple(Vec<VariantType>),
    /// Key and value.
    DictEntry([VariantType; 2]),
}

#[derive(Debug)]
struct Node {
    repr: Box<str>,
    kind: TypeKind,
    definite: bool,
    depth: usize,
}

/// Immutable, shared type descriptor.
#[derive(Clone)]
pub struct VariantType(Arc<Node>);

impl VariantType {
    /// Parse a complete type string.
    pub fn new(type_string: &str) -> Result<Self, TypeError> {
        grammar::parse(type_string)
    }

    fn from_kind(kind: TypeKind) -> Self {
        let mut repr = String::new();
        let (definite, depth) = match &kind {
            TypeKind::Basic(b) => {
                repr.push(b.tag() as char);
                (true, 1)
            }
            TypeKind::Variant => {
                repr.push('v');
                (true, 1)
            }
            TypeKind::Any => {
                repr.push('*');
                (false, 1)
            }
            TypeKind::AnyBasic => {
                repr.push('?');
                (false, 1)
            }
            TypeKind::AnyTuple => {
                repr.push('r');
                (false, 1)
            }
            TypeKind::Array(element) => {
                repr.push('a');
                repr.push_str(element.as_str());
                (element.is_definite(), element.depth() + 1)
            }
            TypeKind::Maybe(element) => {
                repr.push('m');
                repr.push_str(element.as_str());
                (element.is_definite(), element.depth() + 1)
            }
            TypeKind::Tuple(items) => {
                repr.push('(');
                for item in items {
                    repr.push_str(item.as_str());
                }
                repr.push(')');
                (
                    items.iter().all(VariantType::is_definite),
                    1 + items.iter().map(VariantType::depth).max().unwrap_or(0),
                )
            }
            TypeKind::DictEntry([key, value]) => {
                repr.push('{');
                repr.push_str(key.as_str());
                repr.push_str(value.as_str());
                repr.push('}');
                (
                    key.is_definite() && value.is_definite(),
                    1 + key.depth().max(value.depth()),
                )
            }
        };
        Self(Arc::new(Node {
            repr: repr.into_boxed_str(),
            kind,
            definite,
            depth,
        }))
    }

    /// Descriptor for a basic type.
    pub fn basic(basic: BasicType) -> Self {
        Self::from_kind(TypeKind::Basic(basic))
    }

    /// `v`
    pub fn variant() -> Self {
        Self::from_kind(TypeKind::Variant)
    }

    /// `()`
    pub fn unit() -> Self {
        Self::from_kind(TypeKind::Tuple(Vec::new()))
    }

    /// `*`
    pub fn any() -> Self {
        Self::from_kind(TypeKind::Any)
    }

    /// `?`
    pub fn any_basic() -> Self {
        Self::from_kind(TypeKind::AnyBasic)
    }

    /// `r`
    pub fn any_tuple() -> Self {
        Self::from_kind(TypeKind::AnyTuple)
    }

    /// Array of `element`.
    pub fn array(element: &VariantType) -> Self {
        Self::from_kind(TypeKind::Array(element.clone()))
    }

    /// Maybe of `element`.
    pub fn maybe(element: &VariantType) -> Self {
        Self::from_kind(TypeKind::Maybe(element.clone()))
    }

    /// Tuple of `items` (may be empty).
    pub fn tuple(items: &[VariantType]) -> Self {
        Self::from_kind(TypeKind::Tuple(items.to_vec()))
    }

    /// Dictionary entry; `key` must be a basic type.
    pub fn dict_entry(key: &VariantType, value: &VariantType) -> Result<Self, TypeError> {
        if !key.is_basic() {
            return Err(TypeError::NonBasicKey(key.as_str().to_string()));
        }
        Ok(Self::from_kind(TypeKind::DictEntry([
            key.clone(),
            value.clone(),
        ])))
    }

    pub(crate) fn from_parsed(kind: TypeKind) -> Self {
        Self::from_kind(kind)
    }

    /// Canonical type string.
    pub fn as_str(&self) -> &str {
        &self.0.repr
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0.kind
    }

    /// True when no wildcard appears anywhere in the tree.
    pub fn is_definite(&self) -> bool {
        self.0.definite
    }

    /// Container nesting depth; leaves have depth 1.
    pub fn depth(&self) -> usize {
        self.0.depth
    }

    /// Basic types and `?`.
    pub fn is_basic(&self) -> bool {
        matches!(self.kind(), TypeKind::Basic(_) | TypeKind::AnyBasic)
    }

    pub fn as_basic(&self) -> Option<BasicType> {
        match self.kind() {
            TypeKind::Basic(b) => Some(*b),
            _ => None,
        }
    }

    /// Arrays, maybes, tuples, dict entries, variants and `r`.
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind(),
            TypeKind::Variant
                | TypeKind::AnyTuple
                | TypeKind::Array(_)
                | TypeKind::Maybe(_)
                | TypeKind::Tuple(_)
                | TypeKind::DictEntry(_)
        )
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind(), TypeKind::Array(_))
    }

    pub fn is_maybe(&self) -> bool {
        matches!(self.kind(), TypeKind::Maybe(_))
    }

    /// Tuples and `r`.
    pub fn is_tuple(&self) -> bool {
        matches!(self.kind(), TypeKind::Tuple(_) | TypeKind::AnyTuple)
    }

    pub fn is_dict_entry(&self) -> bool {
        matches!(self.kind(), TypeKind::DictEntry(_))
    }

    pub fn is_variant(&self) -> bool {
        matches!(self.kind(), TypeKind::Variant)
    }

    /// Element type of an array or maybe.
    pub fn element(&self) -> Option<&VariantType> {
        match self.kind() {
            TypeKind::Array(e) | TypeKind::Maybe(e) => Some(e),
            _ => None,
        }
    }

    /// Member types of a tuple or dict entry (empty otherwise).
    pub fn items(&self) -> &[VariantType] {
        match self.kind() {
            TypeKind::Tuple(items) => items,
            TypeKind::DictEntry(kv) => kv,
            _ => &[],
        }
    }

    pub fn n_items(&self) -> usize {
        self.items().len()
    }

    /// Key type of a dict entry.
    pub fn key(&self) -> Option<&VariantType> {
        match self.kind() {
            TypeKind::DictEntry([k, _]) => Some(k),
            _ => None,
        }
    }

    /// Value type of a dict entry.
    pub fn value(&self) -> Option<&VariantType> {
        match self.kind() {
            TypeKind::DictEntry([_, v]) => Some(v),
            _ => None,
        }
    }

    /// True if every value of `self` is also a value of `supertype`.
    ///
    /// Wildcards in `supertype` match: `*` anything, `?` any basic type,
    /// `r` any tuple. A type is always a subtype of itself.
    pub fn is_subtype_of(&self, supertype: &VariantType) -> bool {
        match (supertype.kind(), self.kind()) {
            (TypeKind::Any, _) => true,
            (TypeKind::AnyBasic, _) => self.is_basic(),
            (TypeKind::AnyTuple, _) => self.is_tuple(),
            (TypeKind::Array(sup), TypeKind::Array(sub))
            | (TypeKind::Maybe(sup), TypeKind::Maybe(sub)) => sub.is_subtype_of(sup),
            (TypeKind::Tuple(sup), TypeKind::Tuple(sub)) => {
                sup.len() == sub.len() && sub.iter().zip(sup).all(|(t, s)| t.is_subtype_of(s))
            }
            (TypeKind::DictEntry([sk, sv]), TypeKind::DictEntry([k, v])) => {
                k.is_subtype_of(sk) && v.is_subtype_of(sv)
            }
            _ => self == supertype,
        }
    }
}

impl PartialEq for VariantType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.repr == other.0.repr
    }
}

impl Eq for VariantType {}

impl Hash for VariantType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.repr.hash(state);
    }
}

impl fmt::Debug for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariantType({:?})", self.as_str())
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<BasicType> for VariantType {
    fn from(basic: BasicType) -> Self {
        Self::basic(basic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ty(s: &str) -> VariantType {
        VariantType::new(s).expect("valid type string")
    }

    #[test]
    fn test_basic_table() {
        assert_eq!(BasicType::Boolean.fixed_size(), 1);
        assert_eq!(BasicType::Int16.alignment(), 1);
        assert_eq!(BasicType::Handle.fixed_size(), 4);
        assert_eq!(BasicType::Double.alignment(), 7);
        assert_eq!(BasicType::String.fixed_size(), 0);
        assert_eq!(BasicType::Signature.alignment(), 0);
        for tag in b"bynqiuxthdsog" {
            let basic = BasicType::from_tag(*tag).expect("basic tag");
            assert_eq!(basic.tag(), *tag);
        }
        assert!(BasicType::from_tag(b'v').is_none());
    }

    #[test]
    fn test_composition_matches_parsing() {
        let s = VariantType::basic(BasicType::String);
        let v = VariantType::variant();
        let entry = VariantType::dict_entry(&s, &v).expect("basic key");
        assert_eq!(VariantType::array(&entry), ty("a{sv}"));

        let tuple = VariantType::tuple(&[s.clone(), ty("i")]);
        assert_eq!(tuple.as_str(), "(si)");
        assert_eq!(VariantType::maybe(&tuple), ty("m(si)"));
        assert_eq!(VariantType::unit().as_str(), "()");
    }

    #[test]
    fn test_dict_entry_rejects_container_key() {
        let err = VariantType::dict_entry(&ty("ai"), &ty("s")).unwrap_err();
        assert_eq!(err, TypeError::NonBasicKey("ai".into()));
        assert!(VariantType::dict_entry(&VariantType::any_basic(), &ty("s")).is_ok());
        assert!(VariantType::dict_entry(&ty("v"), &ty("s")).is_err());
    }

    #[test]
    fn test_definite() {
        assert!(ty("a{sv}").is_definite());
        assert!(!ty("a{?v}").is_definite());
        assert!(!ty("(ir)").is_definite());
        assert!(!ty("m*").is_definite());
    }

    #[test]
    fn test_equality_and_hash_agree() {
        let mut set = HashSet::new();
        set.insert(ty("a(si)"));
        set.insert(VariantType::array(&VariantType::tuple(&[ty("s"), ty("i")])));
        assert_eq!(set.len(), 1);
        assert_ne!(ty("(si)"), ty("(is)"));
    }

    #[test]
    fn test_queries() {
        let entry = ty("{sai}");
        assert!(entry.is_dict_entry());
        assert_eq!(entry.key().map(VariantType::as_str), Some("s"));
        assert_eq!(entry.value().map(VariantType::as_str), Some("ai"));
        assert_eq!(entry.n_items(), 2);

        let tuple = ty("(ybv)");
        assert_eq!(tuple.n_items(), 3);
        assert!(tuple.items()[2].is_variant());
        assert!(ty("r").is_tuple());
        assert!(ty("r").is_container());
        assert!(!ty("?").is_container());
        assert!(ty("?").is_basic());
        assert_eq!(ty("aa(ai)").depth(), 5);
    }

    #[test]
    fn test_subtypes() {
        assert!(ty("a{sv}").is_subtype_of(&ty("a{?*}")));
        assert!(ty("(iu)").is_subtype_of(&ty("r")));
        assert!(ty("(iu)").is_subtype_of(&ty("(i?)")));
        assert!(!ty("(iu)").is_subtype_of(&ty("(i)")));
        assert!(!ty("ai").is_subtype_of(&ty("?")));
        assert!(ty("ms").is_subtype_of(&ty("m?")));
        assert!(ty("r").is_subtype_of(&ty("*")));
        assert!(!ty("*").is_subtype_of(&ty("r")));
    }
}
