//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Only structural integrity failures abort a run. Shapes the model cannot
//! represent degrade to `Schema::Unknown` and never surface here.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors (configuration or document files).
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The document or configuration text could not be deserialized.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// Invalid configuration value (override key, naming pattern).
    #[from(ignore)]
    #[display("Config Error: {_0}")]
    Config(String),

    /// A `$ref` whose target is not part of the document.
    #[from(ignore)]
    #[display("Missing reference '{_0}'")]
    MissingReference(String),

    /// Two component schemas normalize to the same reference string.
    #[from(ignore)]
    #[display("Duplicate schema name '{_0}'")]
    DuplicateSchema(String),

    /// Naming policy violations promoted to a failure.
    #[from(ignore)]
    #[display("Found {_0} naming convention errors")]
    NamingViolations(usize),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
