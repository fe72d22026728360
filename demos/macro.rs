//! Using the toon! macro for dynamic value construction.
//!
//! Run with: cargo run --example macro

use std::error::Error;
use toon_codec::{encode, toon, Value};

fn main() -> Result<(), Box<dyn Error>> {
    let null_val = toon!(null);
    let bool_val = toon!(true);
    let number = toon!(42);
    let text = toon!("Hello, TOON!");

    println!("Primitives:");
    println!("  null:   {}", encode(&null_val)?);
    println!("  bool:   {}", encode(&bool_val)?);
    println!("  number: {}", encode(&number)?);
    println!("  text:   {}\n", encode(&text)?);

    let numbers = toon!([1, 2, 3, 4, 5]);
    let mixed = toon!([1, "two", true, null]);
    let nested = toon!([[1, 2], {"three": 3}]);

    println!("Arrays:");
    println!("  Numbers: {}", encode(&numbers)?);
    println!("  Mixed:   {}", encode(&mixed)?);
    println!("  Nested:\n{}\n", encode(&nested)?);

    let config = toon!({
        "app": {
            "name": "MyApp",
            "version": "1.0.0"
        },
        "database": {
            "host": "localhost",
            "port": 5432,
            "name": "mydb"
        },
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Nested structures:");
    println!("{}\n", encode(&config)?);

    let items = vec![
        toon!({"id": 1, "status": "active"}),
        toon!({"id": 2, "status": "pending"}),
        toon!({"id": 3, "status": "completed"}),
    ];

    let summary = toon!({
        "total": 3,
        "items": items
    });

    println!("Dynamic construction:");
    println!("{}\n", encode(&summary)?);

    if let Some(Value::Object(app)) = config.get("app") {
        if let Some(name) = app.get("name").and_then(Value::as_str) {
            println!("Accessing values:");
            println!("  App name: {}", name);
        }
    }
    if let Some(features) = config.get("features").and_then(Value::as_array) {
        println!("  Features: {}", features.len());
    }

    Ok(())
}
