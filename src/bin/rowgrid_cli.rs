//! CLI tool for rowgrid - loads a record array into a headless grid and
//! prints the round-tripped rows as JSON
//!
//! Usage:
//!   rowgrid_cli <records.json>              # Output JSON to stdout
//!   rowgrid_cli <records.json> -o out.json  # Output JSON to file

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use rowgrid::{ColumnSpec, GridConfig, GridCore, MemoryBridge, Record};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: rowgrid_cli <records.json> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    // Read input file
    let data = match fs::read_to_string(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    // Parse records
    let records: Vec<Record> = match serde_json::from_str(&data) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error parsing records: {}", e);
            std::process::exit(1);
        }
    };

    // Derive a text column per key of the first record, in key order
    let columns: Vec<ColumnSpec> = match records.first() {
        Some(first) => first
            .keys()
            .map(|name| ColumnSpec::new(name, name))
            .collect(),
        None => {
            eprintln!("Error: no records to load");
            std::process::exit(1);
        }
    };

    // Load into a headless grid and read every row back
    let bridge = MemoryBridge::new(&columns);
    let mut config = GridConfig::new(columns);
    config.init_rows = 0;
    let mut grid = match GridCore::new(config, bridge) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error building grid: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = grid.load_data(records) {
        eprintln!("Error loading records: {}", e);
        std::process::exit(1);
    }

    let mut rows = Vec::new();
    for &id in grid.row_ids() {
        match grid.get_row_value(id, None) {
            Ok(record) => rows.push(serde_json::Value::Object(record)),
            Err(e) => {
                eprintln!("Error reading row {}: {}", id, e);
                std::process::exit(1);
            }
        }
    }

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&rows) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
