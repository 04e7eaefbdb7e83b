//! Utility to run the parse/extract pipeline on a local XML file.
//!
//! Prints the normalized report as pretty JSON; no database needed.

use std::env;

use rust_bureau_api::{extractor, xml};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .ok_or("usage: extract_file <report.xml>")?;

    let text = std::fs::read_to_string(&path)?;
    let doc = xml::parse_document(&text).map_err(|e| e.to_string())?;
    let report = extractor::extract(&doc);

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
