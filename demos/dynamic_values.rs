//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use std::error::Error;
use toon_codec::{decode, encode, from_value, to_value, toon, Value};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = toon!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Config as TOON:\n{}\n", encode(&config)?);

    if let Some(host) = config.get("host").and_then(Value::as_str) {
        println!("Accessing field 'host': {}", host);
    }
    if let Some(port) = config.get("port").and_then(Value::as_i64) {
        println!("Accessing field 'port': {}", port);
    }
    if let Some(features) = config.get("features").and_then(Value::as_array) {
        println!("Accessing field 'features': {} items\n", features.len());
    }

    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let user_value = to_value(&user)?;
    let text = encode(&user_value)?;
    println!("User as TOON:\n{}\n", text);

    // Decode to a Value first, then convert to a typed struct
    let decoded = decode(&text)?;
    let user_back: User = from_value(decoded.clone())?;
    assert_eq!(user, user_back);

    println!("Type checks:");
    println!("  type:      {}", decoded.type_name());
    println!("  is_object: {}", decoded.is_object());
    println!("  is_array:  {}", decoded.is_array());
    println!("  is_string: {}", decoded.is_string());

    // Values print back as JSON through serde_json
    println!("\nAs JSON: {}", serde_json::to_string(&decoded)?);

    Ok(())
}
