//! Helpers shared by the generator unit tests.

use crate::domain::{Domain, FormatVersion, PropertyModel, TypeModel};
use proc_macro2::TokenStream;

/// Removes all whitespace, so token spacing never matters in comparisons.
pub fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Checks that `tokens` parse as items and returns them squashed.
pub fn squashed(tokens: TokenStream) -> String {
    syn::parse2::<syn::File>(tokens.clone()).unwrap();
    squash(&tokens.to_string())
}

/// Returns `true` if `code` contains `needle`, ignoring whitespace.
pub fn has(code: &str, needle: &str) -> bool {
    code.contains(&squash(needle))
}

/// A domain holding `models`.
pub fn domain(models: Vec<TypeModel>) -> Domain {
    Domain {
        type_models: models.into_iter().map(|m| (m.name.clone(), m)).collect(),
        version: FormatVersion::V3,
    }
}

/// A property of type `ty`.
pub fn property(name: &str, ty: &str) -> PropertyModel {
    PropertyModel {
        name: name.into(),
        ty: ty.into(),
        ..Default::default()
    }
}

/// An open type with the given properties.
pub fn object(name: &str, properties: Vec<PropertyModel>) -> TypeModel {
    TypeModel {
        name: name.into(),
        properties,
        open: true,
        ..Default::default()
    }
}
