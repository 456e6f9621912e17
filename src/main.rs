//! # Forme Font CLI
//!
//! Usage:
//!   forme-font job.json -o subset.ttf
//!   forme-font job.json -o subset.ttf --pdf-objects font-objects.txt
//!   echo '{ ... }' | forme-font -o subset.ttf
//!   forme-font --example > job.json
//!
//! Logging goes to stderr; set `RUST_LOG=debug` for per-table detail.

use std::env;
use std::fs;
use std::io::{self, Read};

use forme_font::{write_font_objects, FontError, ObjectList, SubsetJob};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_job_json());
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), FontError> {
    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1])?
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    };

    let flag_value = |flag: &str| args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone());
    let output_path = flag_value("-o").unwrap_or_else(|| "subset.ttf".to_string());
    let objects_path = flag_value("--pdf-objects");

    let job = SubsetJob::from_json(&input)?;
    let output = job.run()?;
    let embedding = &output.embedding;

    fs::write(&output_path, &embedding.font_data)?;
    eprintln!(
        "✓ Written {} bytes to {} ({})",
        embedding.font_data.len(),
        output_path,
        embedding.base_font
    );

    if let Some(path) = objects_path {
        let mut objects = ObjectList::new();
        write_font_objects(&mut objects, embedding);
        fs::write(&path, objects.serialize())?;
        eprintln!("✓ Written {} PDF objects to {}", objects.len(), path);
    }
    Ok(())
}

fn example_job_json() -> &'static str {
    r##"{
  "font": "fonts/NotoSans-Regular.ttf",
  "text": "Invoice #INV-2026-001, Total due: $1,240.00",
  "glyphs": [],
  "subset": true,
  "options": {
    "includeCmap": false,
    "includeExtendedTables": false
  }
}
"##
}
