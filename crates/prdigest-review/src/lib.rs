//! Pull request digest pipeline.
//!
//! Provides the GitHub client, the LLM client, the system prompt, and the
//! processor that turns a repository's open pull requests into one summary.

pub mod github;
pub mod llm;
pub mod pipeline;
pub mod prompt;
