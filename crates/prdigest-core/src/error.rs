/// Errors that can occur while building a pull request digest.
///
/// Fetching pull requests and calling the LLM fail with distinct variants so
/// callers can tell which side of the pipeline broke. Library crates use this
/// type directly; it implements [`miette::Diagnostic`] so the binary crate can
/// propagate it into `miette::Report` with `?`.
///
/// # Examples
///
/// ```
/// use prdigest_core::PrDigestError;
///
/// let err = PrDigestError::Config("missing GitHub token".into());
/// assert!(err.to_string().contains("missing GitHub token"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PrDigestError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    #[diagnostic(code(prdigest::io))]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(code(prdigest::config))]
    Config(String),

    /// GitHub API request or response error.
    #[error("GitHub error: {0}")]
    #[diagnostic(code(prdigest::github))]
    GitHub(String),

    /// LLM API or response error.
    #[error("LLM error: {0}")]
    #[diagnostic(code(prdigest::llm))]
    Llm(String),

    /// Repository reference that is not `owner/repo`.
    #[error("invalid repository reference '{0}', expected owner/repo")]
    #[diagnostic(code(prdigest::invalid_repo), help("pass the repository as owner/repo"))]
    InvalidRepo(String),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(prdigest::toml))]
    Toml(#[from] toml::de::Error),
}
