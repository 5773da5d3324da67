// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recursive-descent type string parser.

use super::{BasicType, TypeKind, VariantType};
use crate::config;
use crate::error::{GrammarReason, TypeError};

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(bytes: &'a [u8], max_depth: usize) -> Self {
        Self {
            bytes,
            pos: 0,
            max_depth,
        }
    }

    fn fail(&self, position: usize, reason: GrammarReason) -> TypeError {
        TypeError::Grammar { position, reason }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn unknown_tag(&self) -> TypeError {
        let c = std::str::from_utf8(&self.bytes[self.pos..])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        self.fail(self.pos, GrammarReason::UnknownTag(c))
    }

    /// Parse one complete type whose outermost node sits at `depth`.
    fn parse_one(&mut self, depth: usize) -> Result<VariantType, TypeError> {
        if depth > self.max_depth {
            return Err(self.fail(self.pos, GrammarReason::TooDeep));
        }
        let tag = self
            .peek()
            .ok_or_else(|| self.fail(self.pos, GrammarReason::UnexpectedEnd))?;

        if let Some(basic) = BasicType::from_tag(tag) {
            self.pos += 1;
            return Ok(VariantType::from_parsed(TypeKind::Basic(basic)));
        }

        let kind = match tag {
            b'v' => {
                self.pos += 1;
                TypeKind::Variant
            }
            b'*' => {
                self.pos += 1;
                TypeKind::Any
            }
            b'?' => {
                self.pos += 1;
                TypeKind::AnyBasic
            }
            b'r' => {
                self.pos += 1;
                TypeKind::AnyTuple
            }
            b'a' => {
                self.pos += 1;
                TypeKind::Array(self.parse_one(depth + 1)?)
            }
            b'm' => {
                self.pos += 1;
                TypeKind::Maybe(self.parse_one(depth + 1)?)
            }
            b'(' => {
                self.pos += 1;
                let mut items = Vec::new();
                loop {
                    match self.peek() {
                        None => return Err(self.fail(self.pos, GrammarReason::UnexpectedEnd)),
                        Some(b')') => {
                            self.pos += 1;
                            break;
                        }
                        Some(_) => items.push(self.parse_one(depth + 1)?),
                    }
                }
                TypeKind::Tuple(items)
            }
            b'{' => {
                self.pos += 1;
                let key_pos = self.pos;
                let key = self.parse_one(depth + 1)?;
                if !key.is_basic() {
                    return Err(self.fail(key_pos, GrammarReason::NonBasicKey));
                }
                let value = self.parse_one(depth + 1)?;
                match self.peek() {
                    None => return Err(self.fail(self.pos, GrammarReason::UnexpectedEnd)),
                    Some(b'}') => self.pos += 1,
                    Some(_) => {
                        return Err(self.fail(self.pos, GrammarReason::UnterminatedDictEntry))
                    }
                }
                TypeKind::DictEntry([key, value])
            }
            _ => return Err(self.unknown_tag()),
        };
        Ok(VariantType::from_parsed(kind))
    }
}

/// Parse a complete type string with the runtime depth limit.
pub(crate) fn parse(type_string: &str) -> Result<VariantType, TypeError> {
    parse_bounded(type_string, config::runtime().limits().max_type_depth)
}

pub(crate) fn parse_bounded(type_string: &str, max_depth: usize) -> Result<VariantType, TypeError> {
    let mut parser = Parser::new(type_string.as_bytes(), max_depth);
    let ty = parser.parse_one(1)?;
    if parser.pos != parser.bytes.len() {
        return Err(parser.fail(parser.pos, GrammarReason::TrailingCharacters));
    }
    Ok(ty)
}

/// Parse one type from the front of `bytes`.
///
/// Returns the type and the number of bytes it occupies; anything after it
/// is left alone.
pub fn scan_type(bytes: &[u8]) -> Option<(VariantType, usize)> {
    let mut parser = Parser::new(bytes, config::runtime().limits().max_type_depth);
    let ty = parser.parse_one(1).ok()?;
    Some((ty, parser.pos))
}

/// True if `type_string` is exactly one well-formed type.
pub fn string_is_valid(type_string: &str) -> bool {
    parse(type_string).is_ok()
}

/// True if `signature` is a sequence of zero or more definite types.
pub fn is_signature(signature: &str) -> bool {
    let bytes = signature.as_bytes();
    if !bytes
        .iter()
        .all(|b| config::DEFINITE_SIGNATURE_TAGS.contains(b))
    {
        return false;
    }
    let mut rest = bytes;
    while !rest.is_empty() {
        match scan_type(rest) {
            Some((_, used)) => rest = &rest[used..],
            None => return false,
        }
    }
    true
}
