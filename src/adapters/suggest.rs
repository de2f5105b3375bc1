use reqwest::Error;
use serde_json::Value;
use std::env;

fn suggest_url() -> String {
    env::var("SUGGEST_API_URL")
        .unwrap_or_else(|_| "https://suggestqueries.google.com/complete/search".to_string())
}

/// Best-effort autocomplete lookup. Any transport or payload failure is
/// logged and swallowed into an empty list; callers never see an error.
pub async fn fetch_suggestions(query: &str, locale: &str) -> Vec<String> {
    match try_fetch(query, locale).await {
        Ok(suggestions) => suggestions,
        Err(error) => {
            eprintln!("Suggestion fetch failed for {:?}: {}", query, error);
            Vec::new()
        }
    }
}

async fn try_fetch(query: &str, locale: &str) -> Result<Vec<String>, Error> {
    let response = reqwest::Client::new()
        .get(suggest_url())
        .query(&[("client", "firefox"), ("hl", locale), ("q", query)])
        .send()
        .await?;
    let payload: Value = response.json().await?;

    // Firefox-client shape: ["query", ["suggestion", ...]]
    let suggestions = payload
        .get(1)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default();

    Ok(suggestions)
}
