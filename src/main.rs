mod adapters;
mod api;
mod core_logic;

use adapters::suggest::fetch_suggestions;
use adapters::trends::{fetch_interest_over_time, fetch_related_topics, PrimaryFetchError};
use api::models::{
    RankedRelatedQuery, RelatedTopic, TopQuery, TrendReport, TrendRequestParameters,
};
use core_logic::{aggregation, classification, ranking};

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use std::env;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

#[derive(Debug)]
struct MissingKeyword;

impl warp::reject::Reject for MissingKeyword {}

fn default_geo() -> String {
    env::var("DEFAULT_GEO").unwrap_or_else(|_| "US".to_string())
}

fn default_locale() -> String {
    env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en-US".to_string())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let trends_route = warp::path("trends")
        .and(warp::query::<TrendRequestParameters>())
        .and_then(|params: TrendRequestParameters| async move {
            let keyword = match params.keyword.as_deref().map(str::trim) {
                Some(keyword) if !keyword.is_empty() => keyword.to_string(),
                _ => return Err(warp::reject::custom(MissingKeyword)),
            };
            let compare_with = params
                .compare_with
                .as_deref()
                .map(str::trim)
                .filter(|compare| !compare.is_empty())
                .map(str::to_string);
            let geo = params
                .geo
                .filter(|geo| !geo.is_empty())
                .unwrap_or_else(default_geo);

            match build_report(keyword, compare_with, geo).await {
                Ok(report) => Ok(warp::reply::json(&report)),
                Err(error) => {
                    eprintln!("Primary interest fetch failed: {}", error);
                    Err(warp::reject::custom(PrimaryFetchError))
                }
            }
        });

    // Start the webserver
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8001".to_string())
        .parse()
        .expect("PORT must be a number");

    println!("Starting web server! on {}", port);
    warp::serve(trends_route.recover(handle_rejection))
        .run(([127, 0, 0, 1], port))
        .await;
}

/// Assembles the full aggregate for one keyword. The primary series fetch is
/// the only hard dependency; the related-query and related-topic branches
/// each degrade to empty sections on failure.
async fn build_report(
    keyword: String,
    compare_with: Option<String>,
    geo: String,
) -> Result<TrendReport, reqwest::Error> {
    let start_time = Utc::now() - Duration::days(365);

    let mut primary_keywords = vec![keyword.clone()];
    if let Some(compare) = &compare_with {
        primary_keywords.push(compare.clone());
    }

    let samples = fetch_interest_over_time(&primary_keywords, &geo, start_time).await?;

    let timeline_data = aggregation::aggregate_monthly(&samples, compare_with.is_some());
    let values: Vec<u32> = timeline_data.iter().map(|point| point.value).collect();
    let trend = classification::classify(&values);

    // Independent reads; the topics fetch overlaps the suggestion chain.
    let ((rising_queries, top_queries), rising_topics) = tokio::join!(
        related_query_sections(&keyword, &geo, start_time),
        related_topics_section(&keyword, &geo, start_time),
    );

    Ok(TrendReport {
        current_score: aggregation::current_score(&timeline_data),
        peak_score: aggregation::peak_score(&timeline_data),
        keyword,
        compare_keyword: compare_with,
        geo,
        trend,
        timeline_data,
        rising_queries,
        top_queries,
        rising_topics,
    })
}

/// Gathers candidate phrases, fetches the joint keyword+candidates series in
/// one batched call, and scores the candidates. Any failure empties both
/// ranked lists without touching the rest of the report.
async fn related_query_sections(
    keyword: &str,
    geo: &str,
    start_time: DateTime<Utc>,
) -> (Vec<RankedRelatedQuery>, Vec<TopQuery>) {
    let candidates = collect_candidates(keyword).await;
    if candidates.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let mut joint_keywords = vec![keyword.to_string()];
    joint_keywords.extend(candidates.iter().cloned());

    match fetch_interest_over_time(&joint_keywords, geo, start_time).await {
        Ok(joint_samples) => ranking::rank_candidates(&candidates, &joint_samples),
        Err(error) => {
            eprintln!("Joint series fetch failed for {:?}: {}", keyword, error);
            (Vec::new(), Vec::new())
        }
    }
}

/// Suggestion lookups for the full phrase plus each word of length >= 2 when
/// the phrase is multi-word. The lookups share no state, so they run
/// concurrently and merge through the candidate filter.
async fn collect_candidates(keyword: &str) -> Vec<String> {
    let locale = default_locale();

    let mut lookups: Vec<String> = vec![keyword.to_string()];
    let words: Vec<&str> = keyword.split_whitespace().collect();
    if words.len() > 1 {
        lookups.extend(
            words
                .into_iter()
                .filter(|word| word.chars().count() >= 2)
                .map(str::to_string),
        );
    }

    let fetches = lookups
        .iter()
        .map(|lookup| fetch_suggestions(lookup, &locale));
    let merged: Vec<String> = join_all(fetches).await.into_iter().flatten().collect();

    ranking::filter_candidates(keyword, merged)
}

async fn related_topics_section(
    keyword: &str,
    geo: &str,
    start_time: DateTime<Utc>,
) -> Vec<RelatedTopic> {
    match fetch_related_topics(keyword, geo, start_time).await {
        Ok(topics) => ranking::rank_topics(topics),
        Err(error) => {
            eprintln!("Related topics fetch failed for {:?}: {}", keyword, error);
            Vec::new()
        }
    }
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Rejection> {
    let (status, message) = if err.find::<MissingKeyword>().is_some() {
        (StatusCode::BAD_REQUEST, "keyword is required")
    } else if err.find::<PrimaryFetchError>().is_some() {
        (StatusCode::BAD_GATEWAY, "interest-over-time fetch failed")
    } else {
        return Err(err);
    };

    let body = warp::reply::json(&serde_json::json!({ "error": message }));
    Ok(warp::reply::with_status(body, status))
}
