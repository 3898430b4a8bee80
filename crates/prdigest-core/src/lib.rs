//! Core types, configuration, and error handling for prdigest.
//!
//! This crate provides the shared foundation used by the review crate and the CLI:
//! - [`PrDigestError`] — unified error type using `thiserror`
//! - [`PrDigestConfig`] — configuration loaded from `.prdigest.toml`
//! - Shared types: [`PullRequest`], [`Comment`], [`User`], [`PrInfo`], [`PromptLanguage`],
//!   [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{GitHubConfig, LlmConfig, PrDigestConfig, SummaryConfig};
pub use error::PrDigestError;
pub use types::{Comment, OutputFormat, PrInfo, PromptLanguage, PullRequest, User};

/// A convenience `Result` type for prdigest operations.
pub type Result<T> = std::result::Result<T, PrDigestError>;
