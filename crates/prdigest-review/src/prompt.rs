use prdigest_core::PromptLanguage;

const SYSTEM_PROMPT_EN: &str = "\
The following is a list of pull requests and their reviews.

For each pull request:
- Show the pull request title
- Below it, summarize the description
- Below that, summarize the reviews

Do not repeat the reviews verbatim; summarize them.
State explicitly who wrote each review.
Do not add any other commentary.";

const SYSTEM_PROMPT_KO: &str = "\
다음은 Pull Request와 리뷰 목록입니다.
PR 제목을 표시하고 그 밑에 설명을 요약하고 그 밑에 리뷰의 요약을 표시하세요.
리뷰를 그대로 출력하는게 아닙니다. 요약을 해야합니다. 리뷰를 누가 했는지 명시적으로 표기해야 합니다.
별도의 추가 코멘트는 필요하지 않습니다.";

/// Build the system instruction that precedes the pull request messages.
///
/// # Examples
///
/// ```
/// use prdigest_core::PromptLanguage;
/// use prdigest_review::prompt::build_system_prompt;
///
/// let prompt = build_system_prompt(PromptLanguage::English);
/// assert!(prompt.contains("pull request title"));
/// ```
pub fn build_system_prompt(language: PromptLanguage) -> String {
    match language {
        PromptLanguage::English => SYSTEM_PROMPT_EN.to_string(),
        PromptLanguage::Korean => SYSTEM_PROMPT_KO.to_string(),
    }
}
