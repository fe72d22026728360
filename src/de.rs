//! TOON decoding.
//!
//! Decoding runs in two passes. A line scanner first classifies every
//! non-blank line and reads its scalars; the tree builder here then walks the
//! classified lines by depth and assembles the [`Value`].
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use toon_codec::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data { x: i32, y: i32 }
//!
//! let data: Data = from_str("x:1\ny:2").unwrap();
//! assert_eq!(data, Data { x: 1, y: 2 });
//! ```
//!
//! ## Guarantees
//!
//! A decode returns a complete value or exactly one error, never a partial
//! tree. Nesting is tracked with an explicit counter and checked against
//! [`DecodeOptions::max_depth`] before each container is entered, and
//! [`DecodeOptions::max_input_len`] is checked before any parsing.

use crate::options::{DecodeOptions, DuplicateKeyPolicy};
use crate::scan::{self, Item, Line, LineKind, Member};
use crate::value::whole_i64;
use crate::{Error, Position, Result, ToonMap, Value};
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};

/// Decodes TOON text into a [`Value`].
pub(crate) fn decode(input: &str, options: &DecodeOptions) -> Result<Value> {
    tracing::debug!(len = input.len(), "decoding TOON");

    let result = decode_inner(input, options);
    match &result {
        Ok(value) => tracing::debug!(kind = value.type_name(), "decoded TOON"),
        Err(err) => tracing::debug!(error = %err, "TOON decode failed"),
    }
    result
}

fn decode_inner(input: &str, options: &DecodeOptions) -> Result<Value> {
    if let Some(max) = options.max_input_len {
        if input.len() > max {
            return Err(Error::InputTooLarge {
                len: input.len(),
                max,
            });
        }
    }

    let lines = scan::scan(input, options.indent)?;
    TreeBuilder::new(&lines, options).build()
}

/// Recursive descent over classified lines.
///
/// `level` counts open containers, with the root container at level 1.
struct TreeBuilder<'a> {
    lines: &'a [Line],
    pos: usize,
    max_depth: usize,
    duplicate_keys: DuplicateKeyPolicy,
}

impl<'a> TreeBuilder<'a> {
    fn new(lines: &'a [Line], options: &DecodeOptions) -> Self {
        TreeBuilder {
            lines,
            pos: 0,
            max_depth: options.max_depth,
            duplicate_keys: options.duplicate_keys,
        }
    }

    fn peek_line(&self) -> Option<&'a Line> {
        self.lines.get(self.pos)
    }

    fn enter(&self, level: usize, position: Position) -> Result<()> {
        if level > self.max_depth {
            return Err(Error::depth_in_source(position, self.max_depth));
        }
        Ok(())
    }

    fn build(mut self) -> Result<Value> {
        let first = match self.peek_line() {
            Some(line) => line,
            None => return Ok(Value::Object(ToonMap::new())),
        };

        match &first.kind {
            LineKind::Member(member) if member.root_marker => {
                self.pos += 1;
                let value = self.member_value(member, first, 0, 0)?;
                if let Some(extra) = self.peek_line() {
                    return Err(if extra.depth > 0 {
                        over_indented(extra)
                    } else {
                        Error::unexpected_line(
                            extra.position(),
                            "the root marker `@` must be the only top-level line",
                        )
                    });
                }
                Ok(value)
            }
            LineKind::Member(_) => {
                self.enter(1, first.position())?;
                let mut map = ToonMap::new();
                self.parse_members(0, 1, &mut map)?;
                Ok(Value::Object(map))
            }
            LineKind::Item(_) => Err(Error::unexpected_line(
                first.position(),
                "a top-level list must be written under the root marker `@:`",
            )),
        }
    }

    /// Reads the value of `member`, whose line sits at `depth` inside a
    /// container at `level`.
    fn member_value(&mut self, member: &Member, line: &Line, depth: usize, level: usize) -> Result<Value> {
        match &member.value {
            Some(value) => {
                if matches!(value, Value::Array(_) | Value::Object(_)) {
                    self.enter(level + 1, Position::new(line.number, member.column))?;
                }
                Ok(value.clone())
            }
            None => self.parse_block(depth + 1, level + 1, Position::new(line.number, member.column)),
        }
    }

    /// Parses the children of an opener line. No children means an empty object.
    fn parse_block(&mut self, depth: usize, level: usize, opener: Position) -> Result<Value> {
        self.enter(level, opener)?;

        let first = match self.peek_line() {
            Some(line) if line.depth >= depth => line,
            _ => return Ok(Value::Object(ToonMap::new())),
        };
        if first.depth > depth {
            return Err(over_indented(first));
        }

        tracing::trace!(line = first.number, depth, level, "entering block");
        match first.kind {
            LineKind::Member(_) => {
                let mut map = ToonMap::new();
                self.parse_members(depth, level, &mut map)?;
                Ok(Value::Object(map))
            }
            LineKind::Item(_) => self.parse_items(depth, level).map(Value::Array),
        }
    }

    /// Parses the run of member lines at `depth` into `map`.
    fn parse_members(&mut self, depth: usize, level: usize, map: &mut ToonMap) -> Result<()> {
        while let Some(line) = self.peek_line() {
            if line.depth < depth {
                break;
            }
            if line.depth > depth {
                return Err(over_indented(line));
            }

            let member = match &line.kind {
                LineKind::Member(member) => member,
                LineKind::Item(_) => {
                    return Err(Error::unexpected_line(
                        line.position(),
                        "list item inside an object",
                    ))
                }
            };
            misplaced_root_marker(member, line)?;

            self.pos += 1;
            let value = self.member_value(member, line, depth, level)?;
            self.insert_member(map, member, line, value)?;
        }
        Ok(())
    }

    /// Parses the run of `-` item lines at `depth`.
    fn parse_items(&mut self, depth: usize, level: usize) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        while let Some(line) = self.peek_line() {
            if line.depth < depth {
                break;
            }
            if line.depth > depth {
                return Err(over_indented(line));
            }

            let item = match &line.kind {
                LineKind::Item(item) => item,
                LineKind::Member(_) => {
                    return Err(Error::unexpected_line(
                        line.position(),
                        "object member inside a list; list items start with `- `",
                    ))
                }
            };
            self.pos += 1;

            let value = match item {
                Item::Bare => self.parse_block(depth + 1, level + 1, line.position())?,
                Item::Value(value) => {
                    if matches!(value, Value::Array(_) | Value::Object(_)) {
                        self.enter(level + 1, line.position())?;
                    }
                    value.clone()
                }
                Item::Member(first) => {
                    // The first member shares the dash line; the rest sit one level deeper.
                    misplaced_root_marker(first, line)?;
                    self.enter(level + 1, line.position())?;
                    let mut map = ToonMap::new();
                    let value = self.member_value(first, line, depth + 1, level + 1)?;
                    map.insert(first.key.clone(), value);
                    self.parse_members(depth + 1, level + 1, &mut map)?;
                    Value::Object(map)
                }
            };
            items.push(value);
        }
        Ok(items)
    }

    fn insert_member(&self, map: &mut ToonMap, member: &Member, line: &Line, value: Value) -> Result<()> {
        if map.contains_key(&member.key) {
            match self.duplicate_keys {
                DuplicateKeyPolicy::Reject => {
                    return Err(Error::duplicate_key(
                        Position::new(line.number, member.column),
                        member.key.as_str(),
                    ))
                }
            }
        }
        map.insert(member.key.clone(), value);
        Ok(())
    }
}

fn over_indented(line: &Line) -> Error {
    Error::indentation(line.position(), "line is indented deeper than its block allows")
}

/// A bare `@` key is only valid as the first and only top-level line.
fn misplaced_root_marker(member: &Member, line: &Line) -> Result<()> {
    if member.root_marker {
        return Err(Error::unexpected_line(
            Position::new(line.number, member.column),
            "the root marker `@` must be the first and only top-level line; quote `\"@\"` to use it as a key",
        ));
    }
    Ok(())
}

/// Converts a [`Value`] into any type implementing `Deserialize`.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{from_value, toon};
///
/// let pair: (String, u8) = from_value(toon!(["x", 7])).unwrap();
/// assert_eq!(pair, ("x".to_string(), 7));
/// ```
///
/// # Errors
///
/// Returns [`Error::Serde`] when the value does not have the shape `T` expects.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: de::DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: ToonMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(key.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl EnumDeserializer {
    fn new(variant: String, value: Option<Value>) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(self.variant.into_deserializer())?;
        let visitor = VariantDeserializer { value: self.value };
        Ok((variant, visitor))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            Some(other) => Err(Error::custom(format!(
                "expected unit variant, found {}",
                other.type_name()
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant, found unit variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(arr)) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Object(obj)) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}

/// Largest whole `f64` exclusive bound that still fits a `u64`.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => match whole_i64(n) {
                Some(i) => visitor.visit_i64(i),
                None if n.fract() == 0.0 && n > 0.0 && n < U64_LIMIT => visitor.visit_u64(n as u64),
                None => visitor.visit_f64(n),
            },
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer::new(variant, None)),
            Value::Object(obj) if obj.len() == 1 => {
                let mut iter = obj.into_iter();
                match iter.next() {
                    Some((variant, value)) => {
                        visitor.visit_enum(EnumDeserializer::new(variant, Some(value)))
                    }
                    None => Err(Error::custom("expected enum variant")),
                }
            }
            other => Err(Error::custom(format!(
                "expected a string or single-key object for an enum, found {}",
                other.type_name()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}
