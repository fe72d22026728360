//! # toon_codec
//!
//! A lossless codec between a JSON-compatible [`Value`] tree and TOON text.
//!
//! ## What is TOON?
//!
//! TOON is a compact, indentation-based text notation for JSON data. It drops
//! braces, most quotes and repeated punctuation, so the same data costs fewer
//! characters (and fewer LLM tokens) than minimal JSON while staying readable.
//!
//! ```text
//! name:Alice
//! age:30
//! city:New York
//! skills:[Python,JavaScript]
//! ```
//!
//! ## Key Features
//!
//! - **Lossless**: `decode(encode(v)) == v` for every finite value, member order
//!   and exact `f64` numbers included
//! - **Canonical**: identical input always encodes to byte-identical text
//! - **Precise errors**: decode errors carry a 1-based line and column, encode
//!   errors the path of the offending value
//! - **Bounded**: nesting depth and input size limits in both directions
//! - **Serde Compatible**: works with existing Rust types via `#[derive(Serialize, Deserialize)]`
//!
//! ## Quick Start
//!
//! ```rust
//! use toon_codec::{decode, encode, toon};
//!
//! let value = toon!({
//!     "name": "Alice",
//!     "age": 30,
//!     "city": "New York",
//!     "skills": ["Python", "JavaScript"]
//! });
//!
//! let text = encode(&value).unwrap();
//! assert_eq!(text, "name:Alice\nage:30\ncity:New York\nskills:[Python,JavaScript]");
//! assert_eq!(decode(&text).unwrap(), value);
//! ```
//!
//! ### Rust Types
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use toon_codec::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, "id:123\nname:Alice\nactive:true");
//!
//! let user_back: User = from_str(&text).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### JSON Interop
//!
//! [`Value`] implements `Serialize` and `Deserialize`, so `serde_json` can parse
//! JSON straight into it and print decoded values back as JSON:
//!
//! ```rust
//! use toon_codec::{decode, encode, Value};
//!
//! let value: Value = serde_json::from_str(r#"{"id":7,"tags":[],"meta":{}}"#).unwrap();
//! let text = encode(&value).unwrap();
//! assert_eq!(text, "id:7\ntags:[]\nmeta:{}");
//!
//! let json = serde_json::to_string(&decode(&text).unwrap()).unwrap();
//! assert_eq!(json, r#"{"id":7,"tags":[],"meta":{}}"#);
//! ```
//!
//! ## Format
//!
//! The full grammar, including quoting and number formatting rules, is
//! documented in the [`grammar`] module.
//!
//! ## Logging
//!
//! Encoding and decoding emit [`tracing`](https://docs.rs/tracing) events at
//! `debug` and `trace` level. The crate never installs a subscriber.
//!
//! ## Demos
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Round-tripping a derived struct
//! - **`macro.rs`** - Building values with the `toon!` macro
//! - **`dynamic_values.rs`** - Working with `Value` dynamically
//! - **`custom_options.rs`** - Indentation and limits
//! - **`token_savings.rs`** - TOON vs minimal JSON size comparison
//!
//! Run any demo with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod grammar;
pub mod macros;
pub mod map;
pub mod options;
mod scan;
pub mod ser;
pub mod value;

pub use de::from_value;
pub use error::{Error, ErrorKind, Location, Position, Result};
pub use map::ToonMap;
pub use options::{
    DecodeOptions, DuplicateKeyPolicy, EncodeOptions, IndentMode, DEFAULT_INDENT,
    DEFAULT_MAX_DEPTH,
};
pub use ser::{to_value, ValueSerializer};
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes a [`Value`] as TOON text with default options.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{encode, toon};
///
/// let value = toon!({"users": [{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]});
/// assert_eq!(
///     encode(&value).unwrap(),
///     "users:\n  - id:1\n    name:Alice\n  - id:2\n    name:Bob"
/// );
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedValue`] for a NaN or infinite number and
/// [`Error::DepthExceeded`] for nesting deeper than [`DEFAULT_MAX_DEPTH`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(value: &Value) -> Result<String> {
    ser::encode(value, &EncodeOptions::default())
}

/// Encodes a [`Value`] as TOON text with custom options.
///
/// # Errors
///
/// Same as [`encode`], with the depth limit taken from `options`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_with_options(value: &Value, options: &EncodeOptions) -> Result<String> {
    ser::encode(value, options)
}

/// Decodes TOON text into a [`Value`] with default options.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{decode, toon};
///
/// let value = decode("name:Alice\ntags:[a,\"1\"]\nmeta:\n  active:true").unwrap();
/// assert_eq!(value, toon!({"name": "Alice", "tags": ["a", "1"], "meta": {"active": true}}));
/// ```
///
/// # Errors
///
/// Returns the first syntax, indentation, duplicate-key or depth error found,
/// with its line and column.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(text: &str) -> Result<Value> {
    de::decode(text, &DecodeOptions::default())
}

/// Decodes TOON text into a [`Value`] with custom options.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{decode_with_options, DecodeOptions, ErrorKind};
///
/// let options = DecodeOptions::new().with_max_input_len(8);
/// let err = decode_with_options("note:much too long", &options).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::InputTooLarge);
/// ```
///
/// # Errors
///
/// Same as [`decode`], plus [`Error::InputTooLarge`] when a size limit is set.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_with_options(text: &str, options: &DecodeOptions) -> Result<Value> {
    de::decode(text, options)
}

/// Serialize any `T: Serialize` to a TOON string.
///
/// # Examples
///
/// ```rust
/// use toon_codec::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: -2 }).unwrap(), "x:1\ny:-2");
/// assert_eq!(to_string(&vec![1, 2, 3]).unwrap(), "@:[1,2,3]");
/// ```
///
/// # Errors
///
/// Returns [`Error::Serde`] if `T` cannot be represented as a [`Value`], and
/// otherwise any error [`encode`] reports.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &EncodeOptions::default())
}

/// Serialize any `T: Serialize` to a TOON string with custom options.
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &EncodeOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    ser::encode(&to_value(value)?, options)
}

/// Deserialize an instance of type `T` from a string of TOON text.
///
/// # Examples
///
/// ```rust
/// use toon_codec::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x:1\ny: 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns a decode error with line and column information if the text is not
/// valid TOON, or [`Error::Serde`] if it does not match the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, &DecodeOptions::default())
}

/// Deserialize an instance of type `T` from TOON text with custom options.
///
/// # Errors
///
/// Same as [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: &DecodeOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(de::decode(s, options)?)
}
