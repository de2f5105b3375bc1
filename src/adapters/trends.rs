use crate::api::models::{RawSample, RelatedTopic};
use chrono::{DateTime, Utc};
use reqwest::Error;
use serde_json::Value;
use std::env;
use warp::reject;

/// The primary interest-over-time fetch failed; nothing downstream can be
/// computed without it, so the whole request is rejected.
#[derive(Debug)]
pub struct PrimaryFetchError;

impl reject::Reject for PrimaryFetchError {}

fn base_url() -> String {
    env::var("TRENDS_API_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Fetches the joint interest-over-time series for up to 5 keywords.
/// Each returned sample carries one 0-100 value per keyword, in request
/// order. Malformed rows in the payload are skipped, not errors.
pub async fn fetch_interest_over_time(
    keywords: &[String],
    geo: &str,
    start_time: DateTime<Utc>,
) -> Result<Vec<RawSample>, Error> {
    let url = format!("{}/interest-over-time", base_url());
    let response = reqwest::Client::new()
        .get(&url)
        .query(&[
            ("keywords", keywords.join(",")),
            ("geo", geo.to_string()),
            ("start", start_time.timestamp().to_string()),
        ])
        .send()
        .await?;
    let payload: Value = response.json().await?;

    let rows = match payload["timelineData"].as_array() {
        Some(rows) => rows,
        None => return Ok(Vec::new()),
    };

    Ok(rows.iter().filter_map(parse_sample).collect())
}

fn parse_sample(row: &Value) -> Option<RawSample> {
    // The upstream proxy emits `time` as a string of unix seconds.
    let timestamp = match &row["time"] {
        Value::String(seconds) => seconds.parse::<i64>().ok()?,
        other => other.as_i64()?,
    };

    let values = row["value"]
        .as_array()?
        .iter()
        .map(|value| value.as_u64().unwrap_or(0).min(100) as u32)
        .collect();

    Some(RawSample { timestamp, values })
}

/// Fetches the provider-ranked related topics for one keyword. Provider
/// order is preserved; ranking beyond truncation happens in core_logic.
pub async fn fetch_related_topics(
    keyword: &str,
    geo: &str,
    start_time: DateTime<Utc>,
) -> Result<Vec<RelatedTopic>, Error> {
    let url = format!("{}/related-topics", base_url());
    let response = reqwest::Client::new()
        .get(&url)
        .query(&[
            ("keyword", keyword.to_string()),
            ("geo", geo.to_string()),
            ("start", start_time.timestamp().to_string()),
        ])
        .send()
        .await?;
    let payload: Value = response.json().await?;

    let ranked = payload["rankedList"]
        .as_array()
        .and_then(|lists| lists.first())
        .and_then(|list| list["rankedKeyword"].as_array())
        .cloned()
        .unwrap_or_default();

    let topics = ranked
        .iter()
        .filter_map(|entry| {
            let topic = &entry["topic"];
            Some(RelatedTopic {
                title: topic["title"].as_str()?.to_string(),
                topic_type: topic["type"].as_str().unwrap_or("").to_string(),
            })
        })
        .collect();

    Ok(topics)
}
