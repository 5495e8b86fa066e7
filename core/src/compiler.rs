//! # Orchestrator
//!
//! Assembles one complete source unit from a [`Domain`]: license header, the
//! generated-file marker, imports, the version accessor, optional type
//! declarations, then every constructor, every resolver, every serializer and
//! finally the table of compiled key patterns.
//!
//! Types are visited in lexicographic order and the pattern allocator lives for
//! exactly one call, so the same inputs always produce the same text.

use crate::constructor::generate_constructor;
use crate::declarations::generate_declaration;
use crate::domain::{Domain, TypeModel};
use crate::error::AppResult;
use crate::patterns::PatternAllocator;
use crate::resolver::generate_resolver;
use crate::serializer::generate_serializer;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use serde::{Deserialize, Serialize};

/// Imports used when the caller supplies none.
pub const DEFAULT_IMPORTS: &[&str] = &["cdd_compiler_runtime as compiler"];

/// The line that marks a unit as machine written.
pub const GENERATED_MARKER: &str = "// THIS FILE IS AUTOMATICALLY GENERATED.";

/// Optional output sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// Emit struct and enum declarations for every type.
    pub emit_type_declarations: bool,
    /// Leave out the unit's inner attributes so it can be `include!`d inside
    /// a module that carries them instead.
    pub embedded: bool,
}

/// Generates the compiler unit for `domain`.
///
/// # Arguments
///
/// * `domain` - The types to compile.
/// * `unit_name` - Returned by the emitted `version()` accessor.
/// * `license` - Prepended as line comments; empty for none.
/// * `imports` - `use` trees of the unit, e.g. `cdd_compiler_runtime as compiler`.
pub fn generate_compiler(
    domain: &Domain,
    unit_name: &str,
    license: &str,
    imports: &[&str],
) -> AppResult<String> {
    generate_compiler_with_options(
        domain,
        unit_name,
        license,
        imports,
        &GeneratorOptions::default(),
    )
}

/// Generates the compiler unit for `domain` with optional sections.
pub fn generate_compiler_with_options(
    domain: &Domain,
    unit_name: &str,
    license: &str,
    imports: &[&str],
    options: &GeneratorOptions,
) -> AppResult<String> {
    domain.validate()?;

    let uses = imports
        .iter()
        .map(|import| syn::parse_str::<syn::UseTree>(import))
        .collect::<Result<Vec<_>, _>>()?;
    let models: Vec<&TypeModel> = domain
        .sorted_type_names()
        .into_iter()
        .filter_map(|name| domain.type_model(name))
        .collect();
    tracing::debug!(
        unit = unit_name,
        types = models.len(),
        declarations = options.emit_type_declarations,
        embedded = options.embedded,
        "generating compiler"
    );

    let unit_doc = format!(" Compiler for `{}` documents.", unit_name);
    let version_doc = " Returns the name of the document format this unit compiles.";
    let mut items = if options.embedded {
        TokenStream::new()
    } else {
        quote! {
            #![doc = #unit_doc]
            #![allow(
                clippy::all,
                dead_code,
                missing_docs,
                unreachable_patterns,
                unused_mut,
                unused_variables
            )]
        }
    };
    items.extend(quote! {
        #(use #uses;)*

        #[doc = #version_doc]
        pub fn version() -> &'static str {
            #unit_name
        }
    });

    if options.emit_type_declarations {
        for model in &models {
            items.extend(generate_declaration(domain, model));
        }
    }

    let mut patterns = PatternAllocator::new();
    for model in &models {
        tracing::debug!(ty = %model.name, shape = ?model.shape(), "generating constructor");
        items.extend(generate_constructor(domain, model, &mut patterns));
    }
    for model in &models {
        items.extend(generate_resolver(domain, model));
    }
    for model in &models {
        items.extend(generate_serializer(domain, model));
    }
    tracing::debug!(patterns = patterns.len(), "allocated key patterns");
    items.extend(pattern_table(&patterns));

    let file: syn::File = syn::parse2(items)?;
    let mut code = license_header(license);
    code.push_str(GENERATED_MARKER);
    code.push_str("\n\n");
    code.push_str(&prettyplease::unparse(&file));
    Ok(code)
}

/// One `static` per allocated pattern, ordered by identifier.
fn pattern_table(patterns: &PatternAllocator) -> TokenStream {
    let statics = patterns.names().into_iter().map(|(name, pattern)| {
        let ident = format_ident!("{}", name);
        quote! {
            static #ident: compiler::Pattern = compiler::Pattern::new(#pattern);
        }
    });
    quote! { #(#statics)* }
}

/// Comments out every license line that is not a comment already.
fn license_header(license: &str) -> String {
    let mut header = String::new();
    for line in license.lines() {
        if line.starts_with("//") {
            header.push_str(line);
        } else if line.is_empty() {
            header.push_str("//");
        } else {
            header.push_str("// ");
            header.push_str(line);
        }
        header.push('\n');
    }
    if !header.is_empty() {
        header.push('\n');
    }
    header
}
