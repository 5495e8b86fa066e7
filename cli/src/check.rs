#![deny(missing_docs)]

//! # Check Command
//!
//! Loads and validates a domain model, then summarizes its type shapes.

use crate::error::CliResult;
use cdd_compiler_core::{Domain, TypeShape};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Domain model file.
    #[clap(long, env = "CDD_COMPILER_DOMAIN")]
    pub domain: PathBuf,
}

fn shape_label(shape: TypeShape) -> &'static str {
    match shape {
        TypeShape::StringArray => "string array",
        TypeShape::ItemArray => "item array",
        TypeShape::Blob => "blob",
        TypeShape::ScalarUnion => "scalar union",
        TypeShape::OneOf => "oneof wrapper",
        TypeShape::Object => "object",
    }
}

/// Renders the summary printed by `check`.
pub fn summarize(domain: &Domain) -> String {
    let mut counts: BTreeMap<TypeShape, usize> = BTreeMap::new();
    for model in domain.type_models.values() {
        *counts.entry(model.shape()).or_default() += 1;
    }
    let version = serde_json::to_value(domain.version)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_default();

    let mut summary = format!(
        "{} types, format {}\n",
        domain.type_models.len(),
        version
    );
    for (shape, count) in counts {
        summary.push_str(&format!("  {}: {}\n", shape_label(shape), count));
    }
    summary
}

/// Executes the check command.
pub fn execute(args: &CheckArgs) -> CliResult<()> {
    let domain = Domain::from_path(&args.domain)?;
    domain.validate()?;
    tracing::debug!(types = domain.type_models.len(), "domain model is valid");
    print!("{}", summarize(&domain));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_shapes() {
        let domain = Domain::from_yaml_str(
            r#"
version: v2
typeModels:
  Any: {name: Any, isBlob: true}
  Info: {name: Info}
  Tag: {name: Tag}
  StringArray: {name: StringArray, isStringArray: true}
"#,
        )
        .unwrap();
        assert_eq!(
            summarize(&domain),
            "4 types, format v2\n  string array: 1\n  blob: 1\n  object: 2\n"
        );
    }
}
