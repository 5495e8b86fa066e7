#![deny(missing_docs)]

//! # Generate Command
//!
//! Reads a domain model and writes the generated compiler unit.

use crate::error::CliResult;
use cdd_compiler_core::{generate_compiler_with_options, Domain, GeneratorOptions, DEFAULT_IMPORTS};
use std::fs;
use std::path::PathBuf;

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Domain model file. `.json` files are read as JSON, anything else as YAML.
    #[clap(long, env = "CDD_COMPILER_DOMAIN")]
    pub domain: PathBuf,

    /// Unit name returned by the generated `version()` accessor.
    #[clap(long)]
    pub unit: String,

    /// File whose contents are prepended as a license header.
    #[clap(long)]
    pub license: Option<PathBuf>,

    /// Use tree imported by the unit (repeatable).
    /// Defaults to `cdd_compiler_runtime as compiler`.
    #[clap(long = "import")]
    pub imports: Vec<String>,

    /// Also emit struct and enum declarations for every type.
    #[clap(long)]
    pub types: bool,

    /// Leave out inner attributes so the unit can be `include!`d.
    #[clap(long)]
    pub embedded: bool,

    /// Output path. Prints to stdout if not provided.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Executes the generate command.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let domain = Domain::from_path(&args.domain)?;
    let license = match &args.license {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    };
    let imports: Vec<&str> = if args.imports.is_empty() {
        DEFAULT_IMPORTS.to_vec()
    } else {
        args.imports.iter().map(String::as_str).collect()
    };
    let options = GeneratorOptions {
        emit_type_declarations: args.types,
        embedded: args.embedded,
    };

    let code = generate_compiler_with_options(&domain, &args.unit, &license, &imports, &options)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &code)?;
            tracing::info!(path = %path.display(), bytes = code.len(), "wrote compiler unit");
            println!("Generated {} compiler at {}", args.unit, path.display());
        }
        None => print!("{}", code),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DOMAIN: &str = r#"
typeModels:
  Tag:
    name: Tag
    required: [name]
    properties:
      - name: name
        type: string
"#;

    #[test]
    fn test_execute_writes_unit() {
        let dir = tempdir().unwrap();
        let domain = dir.path().join("domain.yaml");
        fs::write(&domain, DOMAIN).unwrap();
        let license = dir.path().join("LICENSE");
        fs::write(&license, "Licensed under MIT").unwrap();
        let output = dir.path().join("out").join("tags.rs");

        let args = GenerateArgs {
            domain,
            unit: "tags".into(),
            license: Some(license),
            imports: vec![],
            types: true,
            embedded: false,
            output: Some(output.clone()),
        };
        execute(&args).unwrap();

        let code = fs::read_to_string(output).unwrap();
        assert!(code.starts_with("// Licensed under MIT\n"));
        assert!(code.contains("pub struct Tag"));
        assert!(code.contains("use cdd_compiler_runtime as compiler;"));
    }

    #[test]
    fn test_execute_embedded_unit() {
        let dir = tempdir().unwrap();
        let domain = dir.path().join("domain.yaml");
        fs::write(&domain, DOMAIN).unwrap();
        let output = dir.path().join("tags.rs");

        let args = GenerateArgs {
            domain,
            unit: "tags".into(),
            license: None,
            imports: vec![],
            types: false,
            embedded: true,
            output: Some(output.clone()),
        };
        execute(&args).unwrap();

        let code = fs::read_to_string(output).unwrap();
        assert!(!code.contains("#!["));
        assert!(code.contains("pub fn version()"));
    }

    #[test]
    fn test_execute_reports_missing_domain() {
        let dir = tempdir().unwrap();
        let args = GenerateArgs {
            domain: dir.path().join("missing.yaml"),
            unit: "tags".into(),
            license: None,
            imports: vec![],
            types: false,
            embedded: false,
            output: None,
        };
        assert!(execute(&args).is_err());
    }
}
