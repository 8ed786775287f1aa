//! Bearer-token authentication for GitHub-hosted references.

use reqwest::Url;

/// Hosts that get a bearer token attached when one is available.
pub fn is_github_host(url: &Url) -> bool {
    matches!(
        url.host_str(),
        Some(host)
            if host.eq_ignore_ascii_case("github.com")
                || host.eq_ignore_ascii_case("raw.githubusercontent.com")
    )
}

/// Looks up a GitHub token: `GH_TOKEN` environment variable first, then
/// `gh auth token`. Best effort; any failure just means an unauthenticated
/// request.
pub async fn github_token() -> Option<String> {
    if let Ok(token) = std::env::var("GH_TOKEN") {
        if !token.is_empty() {
            return Some(token);
        }
    }

    let output = tokio::process::Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8(output.stdout).ok()?;
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
