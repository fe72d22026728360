//! Customizing indentation and limits with EncodeOptions and DecodeOptions.
//!
//! Run with: cargo run --example custom_options

use serde::{Deserialize, Serialize};
use std::error::Error;
use toon_codec::{
    from_str_with_options, to_string, to_string_with_options, DecodeOptions, EncodeOptions,
    ErrorKind, IndentMode,
};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Config {
    name: String,
    version: String,
    server: Server,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Server {
    host: String,
    port: u16,
    routes: Vec<Route>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Route {
    path: String,
    methods: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "MyApp".to_string(),
        version: "1.0.0".to_string(),
        server: Server {
            host: "localhost".to_string(),
            port: 8080,
            routes: vec![Route {
                path: "/api/users".to_string(),
                methods: vec!["GET".to_string(), "POST".to_string()],
            }],
        },
    };

    println!("Default (2-space indent):");
    println!("{}\n", to_string(&config)?);

    println!("4-space indent:");
    let wide = to_string_with_options(&config, &EncodeOptions::new().with_indent(4))?;
    println!("{}\n", wide);

    // Auto-detected indentation reads either form back
    let back: Config = from_str_with_options(&wide, &DecodeOptions::new())?;
    assert_eq!(back, config);

    // A fixed unit rejects anything else
    let strict = DecodeOptions::new().with_indent(IndentMode::Fixed(2));
    if let Err(err) = from_str_with_options::<Config>(&wide, &strict) {
        println!("Fixed 2-space indent: {}", err);
    }

    // Depth and size guards for untrusted input
    let guarded = DecodeOptions::new().with_max_depth(2).with_max_input_len(1024);
    match from_str_with_options::<Config>(&wide, &guarded) {
        Err(err) if err.kind() == ErrorKind::DepthExceeded => {
            println!("Depth limit 2: {}", err);
        }
        other => println!("Depth limit 2: unexpected {:?}", other.map(|c| c.name)),
    }

    let shallow = EncodeOptions::new().with_max_depth(2);
    if let Err(err) = to_string_with_options(&config, &shallow) {
        println!("Encode depth limit 2: {}", err);
    }

    Ok(())
}
