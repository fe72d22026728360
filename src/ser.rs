//! TOON encoding.
//!
//! [`encode`](crate::encode) walks a [`Value`] by variant and writes one line per
//! member or list item, choosing between inline and block layout per array and
//! between bare and quoted text per key and scalar. The rules themselves live in
//! [`grammar`](crate::grammar).
//!
//! ## Usage
//!
//! ```rust
//! use toon_codec::to_string;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User { name: String, tags: Vec<String> }
//!
//! let user = User { name: "Ada".into(), tags: vec!["math".into(), "engines".into()] };
//! assert_eq!(to_string(&user).unwrap(), "name:Ada\ntags:[math,engines]");
//! ```
//!
//! ## Layout
//!
//! - Arrays of scalars are written inline: `tags:[a,b]`
//! - Non-empty objects and arrays holding containers are written as blocks
//! - Empty containers are always inline: `[]` and `{}`
//! - Output lines are joined with `\n`, with no trailing newline

use crate::grammar::{self, Context, ROOT_KEY};
use crate::options::EncodeOptions;
use crate::{Error, Result, ToonMap, Value};
use serde::{ser, Serialize};
use std::fmt::Write;

/// Encodes a [`Value`] as canonical TOON text.
pub(crate) fn encode(value: &Value, options: &EncodeOptions) -> Result<String> {
    tracing::debug!(kind = value.type_name(), indent = options.indent, "encoding TOON");

    let mut encoder = Encoder::new(options);
    let result = encoder.write_root(value).map(|()| encoder.output);
    match &result {
        Ok(text) => tracing::debug!(len = text.len(), "encoded TOON"),
        Err(err) => tracing::debug!(error = %err, "TOON encode failed"),
    }
    result
}

enum Segment<'v> {
    Key(&'v str),
    Index(usize),
}

/// Writes lines for one value tree.
///
/// `level` is the nesting level a container would occupy, with the root
/// container at level 1.
struct Encoder<'o, 'v> {
    output: String,
    options: &'o EncodeOptions,
    path: Vec<Segment<'v>>,
}

impl<'o, 'v> Encoder<'o, 'v> {
    fn new(options: &'o EncodeOptions) -> Self {
        Encoder {
            output: String::with_capacity(256),
            options,
            path: Vec::new(),
        }
    }

    /// Renders the current location as `$.key[0]`.
    fn path(&self) -> String {
        let mut out = String::from("$");
        for segment in &self.path {
            match segment {
                Segment::Key(key) if is_plain_key(key) => {
                    out.push('.');
                    out.push_str(key);
                }
                Segment::Key(key) => {
                    let _ = write!(out, "[{:?}]", key);
                }
                Segment::Index(i) => {
                    let _ = write!(out, "[{}]", i);
                }
            }
        }
        out
    }

    fn enter(&self, level: usize) -> Result<()> {
        if level > self.options.max_depth {
            return Err(Error::depth_at_path(self.path(), self.options.max_depth));
        }
        Ok(())
    }

    fn start_line(&mut self, depth: usize) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        let width = depth * self.options.indent.max(1);
        self.output.extend(std::iter::repeat(' ').take(width));
    }

    fn write_root(&mut self, value: &'v Value) -> Result<()> {
        match value {
            Value::Object(map) => {
                self.enter(1)?;
                self.write_members(map, 0, 1)
            }
            other => {
                self.start_line(0);
                self.output.push_str(ROOT_KEY);
                self.output.push(':');
                self.write_member_value(other, 0, 1)
            }
        }
    }

    /// Writes each member of an object at `level` on its own line at `depth`.
    fn write_members(&mut self, members: &'v ToonMap, depth: usize, level: usize) -> Result<()> {
        for (key, value) in members {
            self.start_line(depth);
            self.write_member(key, value, depth, level)?;
        }
        Ok(())
    }

    /// Writes `key:value` at the cursor; the line itself is already started.
    fn write_member(&mut self, key: &'v str, value: &'v Value, depth: usize, level: usize) -> Result<()> {
        self.path.push(Segment::Key(key));
        grammar::write_key(&mut self.output, key);
        self.output.push(':');
        self.write_member_value(value, depth, level + 1)?;
        self.path.pop();
        Ok(())
    }

    /// Writes what follows `key:` for a member line at `depth`. A container
    /// value sits at `level`.
    fn write_member_value(&mut self, value: &'v Value, depth: usize, level: usize) -> Result<()> {
        match value {
            Value::Array(items) => {
                self.enter(level)?;
                if items.iter().all(Value::is_scalar) {
                    self.write_inline(items)
                } else {
                    tracing::trace!(path = %self.path(), len = items.len(), "block array");
                    self.write_items(items, depth + 1, level)
                }
            }
            Value::Object(map) => {
                self.enter(level)?;
                if map.is_empty() {
                    self.output.push_str("{}");
                    Ok(())
                } else {
                    self.write_members(map, depth + 1, level)
                }
            }
            scalar => self.write_scalar(scalar, Context::Member),
        }
    }

    /// Writes the items of an array at `level` as `-` lines at `depth`.
    fn write_items(&mut self, items: &'v [Value], depth: usize, level: usize) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            self.path.push(Segment::Index(i));
            self.start_line(depth);
            self.output.push('-');

            match item {
                Value::Array(inner) => {
                    self.enter(level + 1)?;
                    if inner.iter().all(Value::is_scalar) {
                        self.output.push(' ');
                        self.write_inline(inner)?;
                    } else {
                        self.write_items(inner, depth + 1, level + 1)?;
                    }
                }
                Value::Object(map) => {
                    self.enter(level + 1)?;
                    self.output.push(' ');
                    let mut members = map.iter();
                    match members.next() {
                        None => self.output.push_str("{}"),
                        Some((key, value)) => {
                            // Compact form: first member on the dash line.
                            self.write_member(key, value, depth + 1, level + 1)?;
                            for (key, value) in members {
                                self.start_line(depth + 1);
                                self.write_member(key, value, depth + 1, level + 1)?;
                            }
                        }
                    }
                }
                scalar => {
                    self.output.push(' ');
                    self.write_scalar(scalar, Context::Item)?;
                }
            }
            self.path.pop();
        }
        Ok(())
    }

    fn write_inline(&mut self, items: &'v [Value]) -> Result<()> {
        self.output.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            self.path.push(Segment::Index(i));
            self.write_scalar(item, Context::Inline)?;
            self.path.pop();
        }
        self.output.push(']');
        Ok(())
    }

    fn write_scalar(&mut self, value: &Value, context: Context) -> Result<()> {
        match value {
            Value::Null => self.output.push_str("null"),
            Value::Bool(true) => self.output.push_str("true"),
            Value::Bool(false) => self.output.push_str("false"),
            Value::Number(n) if n.is_finite() => self.output.push_str(&grammar::format_number(*n)),
            Value::Number(n) => {
                return Err(Error::unsupported_value(
                    self.path(),
                    format!("{} has no TOON representation", n),
                ))
            }
            Value::String(s) => grammar::write_string(&mut self.output, s, context),
            Value::Array(_) | Value::Object(_) => {
                return Err(Error::unsupported_value(self.path(), "expected a scalar"))
            }
        }
        Ok(())
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|ch| ch.is_alphanumeric() || ch == '_')
}

/// Converts any `Serialize` type into a [`Value`].
///
/// Integers become `f64` numbers, unit and `None` become `Null`, and enums are
/// externally tagged: a unit variant is its name as a string, any other variant
/// a single-key object.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{to_value, toon};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// enum Event { Started, Moved { x: i32 } }
///
/// assert_eq!(to_value(&Event::Started).unwrap(), toon!("Started"));
/// assert_eq!(to_value(&Event::Moved { x: 3 }).unwrap(), toon!({"Moved": {"x": 3}}));
/// ```
///
/// # Errors
///
/// Returns [`Error::Serde`] for map keys that are not strings, or when a
/// `Serialize` implementation reports its own error.
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Builds a [`Value`] from serde's data model.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: ToonMap,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

/// Wraps `value` as `{variant: value}` when serializing an enum variant.
fn tag(variant: Option<&'static str>, value: Value) -> Value {
    match variant {
        Some(name) => {
            let mut map = ToonMap::with_capacity(1);
            map.insert(name.to_string(), value);
            Value::Object(map)
        }
        None => value,
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Number(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Number(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Number(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Number(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Number(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Number(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Number(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(v.iter().map(|&b| Value::Number(b.into())).collect()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tag(Some(variant), to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        tag(self.variant, Value::Array(self.vec))
    }
}

impl SerializeMap {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: ToonMap::with_capacity(capacity),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Value {
        tag(self.variant, Value::Object(self.map))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => Err(Error::custom(format!(
                "map keys must be strings, found {}",
                other.type_name()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}
