use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The account that authored a pull request or comment.
///
/// # Examples
///
/// ```
/// use prdigest_core::User;
///
/// let user: User = serde_json::from_str(r#"{"login": "octocat", "id": 1}"#).unwrap();
/// assert_eq!(user.login, "octocat");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account handle, e.g. `octocat` or `dependabot[bot]`.
    pub login: String,
}

impl User {
    /// GitHub's placeholder for deleted accounts.
    pub fn ghost() -> Self {
        Self {
            login: "ghost".into(),
        }
    }
}

fn null_user_as_ghost<'de, D>(deserializer: D) -> Result<User, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<User>::deserialize(deserializer)?.unwrap_or_else(User::ghost))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// An open pull request as returned by `GET /repos/{owner}/{repo}/pulls`.
///
/// Only the fields the digest needs are kept; everything else in the
/// GitHub payload is ignored on deserialization.
///
/// # Examples
///
/// ```
/// use prdigest_core::PullRequest;
///
/// let json = r#"{
///     "number": 7,
///     "title": "Fix bug",
///     "user": { "login": "alice" },
///     "body": null,
///     "comments_url": "https://api.github.com/repos/o/r/issues/7/comments",
///     "review_comments_url": "https://api.github.com/repos/o/r/pulls/7/comments"
/// }"#;
/// let pr: PullRequest = serde_json::from_str(json).unwrap();
/// assert_eq!(pr.number, 7);
/// assert!(pr.body.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number, unique within the repository.
    pub number: u64,
    /// Pull request title.
    pub title: String,
    /// Author of the pull request; `ghost` when the account was deleted.
    #[serde(default = "User::ghost", deserialize_with = "null_user_as_ghost")]
    pub user: User,
    /// Description, absent when the author left it empty.
    #[serde(default)]
    pub body: Option<String>,
    /// Collection URL for general discussion comments.
    pub comments_url: String,
    /// Collection URL for inline review comments.
    pub review_comments_url: String,
}

/// A discussion or review comment on a pull request.
///
/// Both comment collections share this shape, so they can be merged into a
/// single timeline. A null `user` (deleted account) decodes as `ghost` and a
/// null or missing `body` as empty text, so one such comment never fails the
/// whole collection.
///
/// # Examples
///
/// ```
/// use prdigest_core::Comment;
///
/// let json = r#"{
///     "user": { "login": "bob" },
///     "body": "Looks good",
///     "created_at": "2024-05-01T10:00:00Z"
/// }"#;
/// let comment: Comment = serde_json::from_str(json).unwrap();
/// assert_eq!(comment.user.login, "bob");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Author of the comment.
    #[serde(default = "User::ghost", deserialize_with = "null_user_as_ghost")]
    pub user: User,
    /// Comment text.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// The parts of a pull request that go into its description message.
///
/// # Examples
///
/// ```
/// use prdigest_core::PrInfo;
///
/// let info = PrInfo {
///     number: 7,
///     title: "Fix bug".into(),
///     author: "alice".into(),
///     summary: "Fixes X".into(),
/// };
/// assert_eq!(info.author, "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrInfo {
    /// Pull request number.
    pub number: u64,
    /// Pull request title.
    pub title: String,
    /// Author handle.
    pub author: String,
    /// Description with normalized line endings, empty when absent.
    pub summary: String,
}

/// Language of the system instruction sent to the LLM.
///
/// # Examples
///
/// ```
/// use prdigest_core::PromptLanguage;
///
/// let lang: PromptLanguage = "ko".parse().unwrap();
/// assert_eq!(lang, PromptLanguage::Korean);
/// assert_eq!(lang.to_string(), "ko");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptLanguage {
    /// English instructions.
    #[default]
    #[serde(rename = "en", alias = "english")]
    English,
    /// Korean instructions.
    #[serde(rename = "ko", alias = "korean")]
    Korean,
}

impl fmt::Display for PromptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptLanguage::English => write!(f, "en"),
            PromptLanguage::Korean => write!(f, "ko"),
        }
    }
}

impl FromStr for PromptLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(PromptLanguage::English),
            "ko" | "korean" => Ok(PromptLanguage::Korean),
            other => Err(format!("unknown prompt language: {other}")),
        }
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use prdigest_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The summary text as returned by the LLM.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown with a heading and run statistics.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
