//! Generates the fixture compiler units into `OUT_DIR`.

use cdd_compiler_core::{generate_compiler_with_options, Domain, GeneratorOptions, DEFAULT_IMPORTS};
use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

/// Unit name and domain file of every generated unit.
const UNITS: &[(&str, &str)] = &[
    ("openapi_v3", "../core/tests/fixtures/petstore_v3.yaml"),
    ("counter", "fixtures/counter.yaml"),
    ("pointer", "fixtures/pointer.yaml"),
];

fn main() -> Result<(), Box<dyn Error>> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let options = GeneratorOptions {
        emit_type_declarations: true,
        embedded: true,
    };
    for (unit, path) in UNITS {
        println!("cargo:rerun-if-changed={}", path);
        let domain = Domain::from_path(path)?;
        let code = generate_compiler_with_options(&domain, unit, "", DEFAULT_IMPORTS, &options)?;
        fs::write(out_dir.join(format!("{}.rs", unit)), code)?;
    }
    Ok(())
}
