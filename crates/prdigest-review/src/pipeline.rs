use std::fmt;

use prdigest_core::{Comment, PrDigestError, PrInfo, PullRequest, SummaryConfig};
use serde::Serialize;

use crate::github::GitHubClient;
use crate::llm::{ChatMessage, LlmClient};

/// Messages assembled from a repository's open pull requests.
///
/// # Examples
///
/// ```
/// use prdigest_review::pipeline::DigestInput;
///
/// let input = DigestInput::default();
/// assert!(input.messages.is_empty());
/// assert_eq!(input.pull_requests, 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DigestInput {
    /// Description and comment messages in submission order.
    pub messages: Vec<ChatMessage>,
    /// Number of pull requests that were listed.
    pub pull_requests: usize,
    /// Comments turned into messages.
    pub comments_included: usize,
    /// Comments dropped because an automation account wrote them.
    pub comments_excluded: usize,
}

/// Result of a completed digest run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestOutcome {
    /// Summary text returned by the LLM.
    pub summary: String,
    /// Statistics about the run.
    pub stats: DigestStats,
}

/// Statistics about a digest run.
///
/// # Examples
///
/// ```
/// use prdigest_review::pipeline::DigestStats;
///
/// let stats = DigestStats {
///     pull_requests: 2,
///     comments_included: 5,
///     comments_excluded: 1,
///     messages: 7,
///     model_used: "gpt-4o-mini".into(),
/// };
/// assert_eq!(stats.messages, stats.pull_requests + stats.comments_included);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestStats {
    /// Open pull requests listed.
    pub pull_requests: usize,
    /// Comments sent to the LLM.
    pub comments_included: usize,
    /// Automation-account comments left out.
    pub comments_excluded: usize,
    /// Messages sent, excluding the system prompt.
    pub messages: usize,
    /// Model identifier used for the summary.
    pub model_used: String,
}

/// Orchestrates the GitHub and LLM clients for one repository.
///
/// Every request is awaited before the next one starts, so pull requests
/// and their comment collections are fetched strictly in order.
pub struct PrProcessor {
    github: GitHubClient,
    llm: LlmClient,
    owner: String,
    repo: String,
    config: SummaryConfig,
}

impl PrProcessor {
    /// Create a processor for `owner/repo`.
    pub fn new(
        github: GitHubClient,
        llm: LlmClient,
        owner: impl Into<String>,
        repo: impl Into<String>,
        config: &SummaryConfig,
    ) -> Self {
        Self {
            github,
            llm,
            owner: owner.into(),
            repo: repo.into(),
            config: config.clone(),
        }
    }

    /// Fetch open pull requests and their comments and assemble the messages.
    ///
    /// # Errors
    ///
    /// Returns [`PrDigestError::GitHub`] if the pull requests cannot be
    /// listed. Comment fetch failures are not errors.
    pub async fn collect_messages(&self) -> Result<DigestInput, PrDigestError> {
        let pulls = self
            .github
            .list_pull_requests(&self.owner, &self.repo)
            .await?;
        tracing::info!(
            repo = %format!("{}/{}", self.owner, self.repo),
            count = pulls.len(),
            "fetched open pull requests"
        );

        let mut input = DigestInput {
            pull_requests: pulls.len(),
            ..DigestInput::default()
        };

        for pr in &pulls {
            let general = self.github.list_comments(&pr.comments_url).await;
            let review = self.github.list_comments(&pr.review_comments_url).await;
            let comments = merge_comments(general, review);

            let total = comments.len();
            let messages = pr_messages(pr, &comments, &self.config.bot_marker);
            let kept = messages.len() - 1;
            tracing::debug!(
                pr = pr.number,
                kept,
                dropped = total - kept,
                "assembled pull request messages"
            );

            input.comments_included += kept;
            input.comments_excluded += total - kept;
            input.messages.extend(messages);
        }

        Ok(input)
    }

    /// Run the full digest: collect messages and summarize them in one call.
    ///
    /// # Errors
    ///
    /// Returns [`PrDigestError::GitHub`] if listing pull requests fails, or
    /// [`PrDigestError::Llm`] if the summarization call fails. In the first
    /// case the LLM is never called.
    pub async fn process(&self) -> Result<DigestOutcome, PrDigestError> {
        let input = self.collect_messages().await?;
        let messages = input.messages.len();

        tracing::info!(messages, model = self.llm.model(), "requesting summary");
        let summary = self
            .llm
            .summarize(input.messages, self.config.language)
            .await?;

        Ok(DigestOutcome {
            summary,
            stats: DigestStats {
                pull_requests: input.pull_requests,
                comments_included: input.comments_included,
                comments_excluded: input.comments_excluded,
                messages,
                model_used: self.llm.model().to_string(),
            },
        })
    }
}

/// Build the messages for one pull request: its description first, then
/// every human-authored comment in the order given.
///
/// `comments` is expected to be sorted already (see [`merge_comments`]).
///
/// # Examples
///
/// ```
/// use prdigest_core::{PullRequest, User};
/// use prdigest_review::pipeline::pr_messages;
///
/// let pr = PullRequest {
///     number: 1,
///     title: "Init".into(),
///     user: User { login: "alice".into() },
///     body: None,
///     comments_url: String::new(),
///     review_comments_url: String::new(),
/// };
/// let messages = pr_messages(&pr, &[], "[bot]");
/// assert_eq!(messages.len(), 1);
/// assert_eq!(messages[0].content, "PR #1: Init by alice.\n");
/// ```
pub fn pr_messages(pr: &PullRequest, comments: &[Comment], bot_marker: &str) -> Vec<ChatMessage> {
    let info = extract_pr_info(pr);
    let mut messages = vec![pr_message(&info)];
    messages.extend(
        comments
            .iter()
            .filter(|c| !is_automation_account(&c.user.login, bot_marker))
            .map(|c| comment_message(pr.number, c)),
    );
    messages
}

/// Extract the description fields of a pull request.
///
/// A missing body becomes an empty summary.
pub fn extract_pr_info(pr: &PullRequest) -> PrInfo {
    PrInfo {
        number: pr.number,
        title: pr.title.clone(),
        author: pr.user.login.clone(),
        summary: normalize_line_endings(pr.body.as_deref().unwrap_or_default()),
    }
}

/// Replace `\r\n` line endings with `\n`.
///
/// # Examples
///
/// ```
/// use prdigest_review::pipeline::normalize_line_endings;
///
/// assert_eq!(normalize_line_endings("a\r\nb"), "a\nb");
/// ```
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Merge general and review comments into one timeline, oldest first.
///
/// The sort is stable: comments with equal timestamps keep their fetch
/// order, general comments before review comments.
pub fn merge_comments(general: Vec<Comment>, review: Vec<Comment>) -> Vec<Comment> {
    let mut all = general;
    all.extend(review);
    all.sort_by_key(|c| c.created_at);
    all
}

/// Whether `login` belongs to an automation account.
///
/// # Examples
///
/// ```
/// use prdigest_review::pipeline::is_automation_account;
///
/// assert!(is_automation_account("dependabot[bot]", "[bot]"));
/// assert!(!is_automation_account("robert", "[bot]"));
/// ```
pub fn is_automation_account(login: &str, bot_marker: &str) -> bool {
    !bot_marker.is_empty() && login.contains(bot_marker)
}

fn pr_message(info: &PrInfo) -> ChatMessage {
    ChatMessage::user(format!(
        "PR #{}: {} by {}.\n{}",
        info.number, info.title, info.author, info.summary
    ))
}

fn comment_message(pr_number: u64, comment: &Comment) -> ChatMessage {
    ChatMessage::user(format!(
        "#{pr_number} @{} commented: {}",
        comment.user.login, comment.body
    ))
}

impl fmt::Display for DigestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)
    }
}

impl DigestOutcome {
    /// Render the digest as markdown with a heading and run statistics.
    ///
    /// # Examples
    ///
    /// ```
    /// use prdigest_review::pipeline::{DigestOutcome, DigestStats};
    ///
    /// let outcome = DigestOutcome {
    ///     summary: "All quiet.".into(),
    ///     stats: DigestStats {
    ///         pull_requests: 0,
    ///         comments_included: 0,
    ///         comments_excluded: 0,
    ///         messages: 0,
    ///         model_used: "gpt-4o-mini".into(),
    ///     },
    /// };
    /// let md = outcome.to_markdown();
    /// assert!(md.contains("# Pull Request Digest"));
    /// assert!(md.contains("All quiet."));
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Pull Request Digest\n\n");
        out.push_str(&format!(
            "**Model:** {} | **Pull requests:** {} | **Comments:** {} (bots skipped: {})\n\n",
            self.stats.model_used,
            self.stats.pull_requests,
            self.stats.comments_included,
            self.stats.comments_excluded,
        ));
        out.push_str(self.summary.trim_end());
        out.push('\n');
        out
    }
}
