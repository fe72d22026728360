/// Builds a [`Value`](crate::Value) from JSON-like literal syntax.
///
/// Array elements and object values are single token trees, so negative
/// numbers and other compound expressions go in parentheses: `toon!([(-1), 2])`.
///
/// ```rust
/// use toon_codec::{toon, Value};
///
/// let value = toon!({
///     "name": "Alice",
///     "skills": ["Python", "JavaScript"],
///     "offset": (-2)
/// });
/// assert_eq!(value.get("offset"), Some(&Value::Number(-2.0)));
/// ```
#[macro_export]
macro_rules! toon {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::toon!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ToonMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ToonMap::new();
        $(
            object.insert($key.to_string(), $crate::toon!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Any other expression goes through the serde bridge.
    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}
