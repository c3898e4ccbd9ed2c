//! Generate JSON Schemas for the configuration file and emitted themes
//!
//! Usage:
//!   cargo run --features dev-bins --bin generate_schema config > theme-bridge.schema.json
//!   cargo run --features dev-bins --bin generate_schema theme > color-theme.schema.json

use schemars::schema_for;
use std::env;
use theme_bridge::theme::TargetTheme;
use theme_bridge::Config;

fn main() {
    let args: Vec<String> = env::args().collect();
    let schema_type = args.get(1).map(|s| s.as_str()).unwrap_or("config");

    let schema = match schema_type {
        "config" => schema_for!(Config),
        "theme" => schema_for!(TargetTheme),
        other => {
            eprintln!("Unknown schema type: {}. Use 'config' or 'theme'.", other);
            std::process::exit(1);
        }
    };

    let output = serde_json::to_string_pretty(&schema).expect("Failed to serialize schema");
    println!("{}", output);
}
