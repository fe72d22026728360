//! TOON vs minimal JSON size comparison.
//!
//! Run with: cargo run --example token_savings

use serde::{Deserialize, Serialize};
use std::error::Error;
use toon_codec::{decode, encode, to_value, Value};

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiResponse {
    users: Vec<User>,
    total: u32,
    page: u32,
}

/// Percentage saved going from `original` to `toon`, by character count.
fn savings_percent(original: &str, toon: &str) -> u32 {
    let l0 = original.chars().count() as f64;
    let l1 = toon.chars().count() as f64;
    if l0 == 0.0 {
        return 0;
    }
    ((1.0 - l1 / l0) * 100.0).round().max(0.0) as u32
}

fn compare(label: &str, value: &Value) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string(value)?;
    let toon = encode(value)?;
    assert_eq!(&decode(&toon)?, value);

    println!("{}:", label);
    println!("  JSON ({} chars): {}", json.chars().count(), json);
    println!("  TOON ({} chars):", toon.chars().count());
    for line in toon.lines() {
        println!("    {}", line);
    }
    println!("  ✓ Savings: {}%\n", savings_percent(&json, &toon));
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let profile: Value = serde_json::from_str(
        r#"{"name":"Alice","age":30,"city":"New York","skills":["Python","JavaScript"]}"#,
    )?;
    compare("Profile", &profile)?;

    let response = ApiResponse {
        users: vec![
            User {
                id: 1,
                name: "Alice Johnson".to_string(),
                email: "alice@example.com".to_string(),
                active: true,
                tags: vec!["admin".to_string()],
            },
            User {
                id: 2,
                name: "Bob Smith".to_string(),
                email: "bob@example.com".to_string(),
                active: true,
                tags: vec![],
            },
            User {
                id: 3,
                name: "Charlie Brown".to_string(),
                email: "charlie@example.com".to_string(),
                active: false,
                tags: vec!["guest".to_string(), "trial".to_string()],
            },
        ],
        total: 3,
        page: 1,
    };
    compare("API response", &to_value(&response)?)?;

    Ok(())
}
