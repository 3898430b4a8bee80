use prdigest_core::{Comment, PrDigestError, PullRequest};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// GitHub REST client for listing pull requests and their comments.
///
/// # Examples
///
/// ```
/// use prdigest_review::github::parse_repo_reference;
///
/// let (owner, repo) = parse_repo_reference("rust-lang/rust").unwrap();
/// assert_eq!(owner, "rust-lang");
/// assert_eq!(repo, "rust");
/// ```
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a client for the API at `api_url` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`PrDigestError::GitHub`] if the HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use prdigest_review::github::GitHubClient;
    ///
    /// let client = GitHubClient::new("https://api.github.com", "ghp_xxxx").unwrap();
    /// ```
    pub fn new(api_url: &str, token: &str) -> Result<Self, PrDigestError> {
        let http = reqwest::Client::builder()
            .user_agent("prdigest")
            .build()
            .map_err(|e| PrDigestError::GitHub(format!("failed to create GitHub client: {e}")))?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// List the open pull requests of `owner/repo`.
    ///
    /// Only the first page is read.
    ///
    /// # Errors
    ///
    /// Returns [`PrDigestError::GitHub`] on network errors, any status other
    /// than 200, or a body that does not decode.
    pub async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<PullRequest>, PrDigestError> {
        let url = format!("{}/repos/{owner}/{repo}/pulls", self.api_url);
        self.get_json(&url)
            .await
            .map_err(|e| PrDigestError::GitHub(format!("failed to list pull requests: {e}")))
    }

    /// Fetch a comment collection from `collection_url`.
    ///
    /// Failures are logged and yield an empty list so one broken collection
    /// does not stop the digest.
    pub async fn list_comments(&self, collection_url: &str) -> Vec<Comment> {
        tracing::debug!(url = collection_url, "fetching comments");
        match self.get_json(collection_url).await {
            Ok(comments) => comments,
            Err(e) => {
                tracing::warn!(url = collection_url, error = %e, "failed to fetch comments");
                Vec::new()
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, String> {
        let response = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| format!("request to {url} failed: {e}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("GitHub API error {status}: {body}"));
        }

        response
            .json()
            .await
            .map_err(|e| format!("failed to parse response from {url}: {e}"))
    }
}

/// Parse a repository reference string (`owner/repo`) into its components.
///
/// # Errors
///
/// Returns [`PrDigestError::InvalidRepo`] if the format is invalid.
///
/// # Examples
///
/// ```
/// use prdigest_review::github::parse_repo_reference;
///
/// let (owner, repo) = parse_repo_reference("octocat/hello-world").unwrap();
/// assert_eq!(owner, "octocat");
/// assert_eq!(repo, "hello-world");
/// ```
pub fn parse_repo_reference(repo_ref: &str) -> Result<(String, String), PrDigestError> {
    let Some((owner, repo)) = repo_ref.split_once('/') else {
        return Err(PrDigestError::InvalidRepo(repo_ref.to_string()));
    };
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(PrDigestError::InvalidRepo(repo_ref.to_string()));
    }
    Ok((owner.to_string(), repo.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn parse_valid_repo_reference() {
        let (owner, repo) = parse_repo_reference("rust-lang/rust").unwrap();
        assert_eq!(owner, "rust-lang");
        assert_eq!(repo, "rust");
    }

    #[test]
    fn parse_repo_reference_missing_slash() {
        assert!(parse_repo_reference("rust").is_err());
    }

    #[test]
    fn parse_repo_reference_empty_parts() {
        assert!(parse_repo_reference("/rust").is_err());
        assert!(parse_repo_reference("rust-lang/").is_err());
    }

    #[test]
    fn parse_repo_reference_extra_segment() {
        assert!(parse_repo_reference("a/b/c").is_err());
    }

    #[tokio::test]
    async fn list_pull_requests_sends_auth_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/pulls"))
            .and(header("Authorization", "Bearer ghp_test"))
            .and(header("Accept", "application/vnd.github.v3+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "number": 3,
                    "title": "Add docs",
                    "user": { "login": "dana" },
                    "body": "Docs",
                    "comments_url": "http://x/3/comments",
                    "review_comments_url": "http://x/3/review"
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), "ghp_test").unwrap();
        let prs = client.list_pull_requests("octo", "demo").await.unwrap();
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].number, 3);
        assert_eq!(prs[0].user.login, "dana");
    }

    #[tokio::test]
    async fn list_pull_requests_non_200_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/missing/pulls"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), "t").unwrap();
        let err = client
            .list_pull_requests("octo", "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, PrDigestError::GitHub(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn list_pull_requests_other_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/pulls"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), "t").unwrap();
        assert!(client.list_pull_requests("octo", "demo").await.is_err());
    }

    #[tokio::test]
    async fn list_comments_failure_returns_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/1/comments"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), "t").unwrap();
        let comments = client
            .list_comments(&format!("{}/issues/1/comments", server.uri()))
            .await;
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn list_comments_malformed_body_returns_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/1/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), "t").unwrap();
        let comments = client
            .list_comments(&format!("{}/issues/1/comments", server.uri()))
            .await;
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn list_comments_keeps_collection_with_deleted_author_or_null_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/5/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "user": { "login": "bob" }, "body": "a", "created_at": "2024-03-01T12:00:00Z" },
                { "user": null, "body": "b", "created_at": "2024-03-01T12:00:01Z" },
                { "user": { "login": "carol" }, "body": null, "created_at": "2024-03-01T12:00:02Z" }
            ])))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), "t").unwrap();
        let comments = client
            .list_comments(&format!("{}/issues/5/comments", server.uri()))
            .await;
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].user.login, "bob");
        assert_eq!(comments[1].user.login, "ghost");
        assert_eq!(comments[1].body, "b");
        assert_eq!(comments[2].user.login, "carol");
        assert_eq!(comments[2].body, "");
    }

    #[tokio::test]
    async fn list_comments_decodes_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pulls/1/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 10,
                    "user": { "login": "erin" },
                    "body": "nit: rename",
                    "path": "src/lib.rs",
                    "created_at": "2024-03-01T12:00:00Z"
                }
            ])))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&format!("{}/", server.uri()), "t").unwrap();
        let comments = client
            .list_comments(&format!("{}/pulls/1/comments", server.uri()))
            .await;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].user.login, "erin");
        assert_eq!(comments[0].body, "nit: rename");
    }
}
