//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A domain model file that is not valid YAML.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// A domain model file that is not valid JSON.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Emitted tokens (or a caller supplied import) that do not parse as Rust.
    #[display("Syntax Error: {_0}")]
    Syntax(syn::Error),

    /// An inconsistent domain model.
    /// Ignored for `From<String>` to avoid conflict with General.
    #[from(ignore)]
    #[display("Model Error: {_0}")]
    Model(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
