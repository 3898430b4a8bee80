use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn github_with_one_pr() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/pulls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "number": 7,
            "title": "Fix bug",
            "user": { "login": "alice" },
            "body": "Fixes X\r\nY",
            "comments_url": format!("{}/repos/octo/demo/issues/7/comments", server.uri()),
            "review_comments_url": format!("{}/repos/octo/demo/pulls/7/comments", server.uri()),
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/issues/7/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "user": { "login": "bob" }, "body": "LGTM", "created_at": "2024-05-01T10:00:01Z" },
            { "user": { "login": "ci[bot]" }, "body": "green", "created_at": "2024-05-01T10:00:02Z" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/pulls/7/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "user": { "login": "carol" }, "body": "nit", "created_at": "2024-05-01T10:00:00Z" }
        ])))
        .mount(&server)
        .await;
    server
}

fn prdigest(dir: &std::path::Path) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_prdigest"));
    cmd.current_dir(dir)
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env_remove("OPENAI_API_KEY");
    cmd
}

#[tokio::test]
async fn dry_run_prints_messages_as_json() {
    let github = github_with_one_pr().await;
    let dir = tempfile::tempdir().unwrap();

    let output = prdigest(dir.path())
        .args(["summarize", "octo/demo", "--dry-run", "--format", "json"])
        .args(["--github-token", "ghp_test", "--api-url", github.uri().as_str()])
        .output()
        .await
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let messages: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let contents: Vec<&str> = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(
        contents,
        [
            "PR #7: Fix bug by alice.\nFixes X\nY",
            "#7 @carol commented: nit",
            "#7 @bob commented: LGTM",
        ]
    );
}

#[tokio::test]
async fn summarize_prints_llm_text_verbatim() {
    let github = github_with_one_pr().await;
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "PR #7 Fix bug\n- carol: nit" } }]
        })))
        .expect(1)
        .mount(&llm)
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".prdigest.toml"),
        format!(
            "[github]\napi_url = \"{}\"\ntoken = \"ghp_test\"\n\n[llm]\nbase_url = \"{}\"\n",
            github.uri(),
            llm.uri()
        ),
    )
    .unwrap();

    let output = prdigest(dir.path())
        .args(["summarize", "octo/demo"])
        .output()
        .await
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "PR #7 Fix bug\n- carol: nit\n");
}

#[tokio::test]
async fn listing_failure_exits_nonzero_without_summary() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/pulls"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&github)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = prdigest(dir.path())
        .args(["summarize", "octo/demo", "--github-token", "t", "--api-url", github.uri().as_str()])
        .output()
        .await
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("GitHub error"));
}

#[tokio::test]
async fn invalid_repo_reference_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = prdigest(dir.path())
        .args(["summarize", "no-slash", "--github-token", "t"])
        .output()
        .await
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid repository reference"),
        "stderr: {stderr}"
    );
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn malformed_config_reports_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".prdigest.toml"), "[github\napi_url = ").unwrap();

    let output = prdigest(dir.path())
        .args(["summarize", "octo/demo", "--github-token", "t"])
        .output()
        .await
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TOML parse error"), "stderr: {stderr}");
}
