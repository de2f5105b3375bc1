use crate::api::models::{Momentum, RankedRelatedQuery, RawSample, RelatedTopic, TopQuery};
use std::collections::HashSet;

pub const MAX_CANDIDATES: usize = 4;
pub const MAX_TOPICS: usize = 6;
const BREAKOUT_THRESHOLD: i64 = 4999;

/// Merges raw autocomplete suggestions into a candidate set: case-insensitive
/// de-duplication in first-seen order, minus the keyword itself and any
/// suggestion that merely extends it ("<keyword> ..."), capped at
/// `MAX_CANDIDATES`.
pub fn filter_candidates(keyword: &str, suggestions: Vec<String>) -> Vec<String> {
    let keyword_lower = keyword.to_lowercase();
    let extension_prefix = format!("{} ", keyword_lower);

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates: Vec<String> = Vec::new();

    for suggestion in suggestions {
        let lower = suggestion.to_lowercase();
        if lower == keyword_lower || lower.starts_with(&extension_prefix) {
            continue;
        }
        if seen.insert(lower) {
            candidates.push(suggestion);
        }
        if candidates.len() == MAX_CANDIDATES {
            break;
        }
    }

    candidates
}

struct ScoredCandidate {
    text: String,
    average: u32,
    column: Vec<u32>,
}

/// Scores candidates against the joint keyword+candidates series and splits
/// them into the two ranked views: steady-state top queries (normalized
/// average interest) and rising queries (half-over-half momentum).
///
/// Column 0 of each sample is the primary keyword; candidate `i` reads
/// column `i + 1`. Candidates with a zero average carry no provider signal
/// and are dropped before either ranking.
pub fn rank_candidates(
    candidates: &[String],
    samples: &[RawSample],
) -> (Vec<RankedRelatedQuery>, Vec<TopQuery>) {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let column: Vec<u32> = samples
                .iter()
                .map(|sample| sample.values.get(index + 1).copied().unwrap_or(0))
                .collect();
            ScoredCandidate {
                text: text.clone(),
                average: rounded_mean(&column),
                column,
            }
        })
        .filter(|candidate| candidate.average > 0)
        .collect();

    scored.sort_by(|a, b| b.average.cmp(&a.average));

    let top_queries = normalize_top(&scored);
    let rising_queries = rank_rising(&scored, samples.len());

    (rising_queries, top_queries)
}

fn normalize_top(scored: &[ScoredCandidate]) -> Vec<TopQuery> {
    let max_average = scored
        .iter()
        .map(|candidate| candidate.average)
        .max()
        .unwrap_or(0)
        .max(1);

    scored
        .iter()
        .map(|candidate| TopQuery {
            query: candidate.text.clone(),
            value: ((candidate.average as f64 / max_average as f64) * 100.0).round() as u32,
        })
        .collect()
}

fn rank_rising(scored: &[ScoredCandidate], sample_count: usize) -> Vec<RankedRelatedQuery> {
    let half = sample_count / 2;

    let mut rising: Vec<RankedRelatedQuery> = scored
        .iter()
        .filter_map(|candidate| {
            let momentum = half_over_half_change(&candidate.column, half)?;
            if momentum == Momentum::Value(0) {
                return None;
            }
            Some(RankedRelatedQuery {
                query: candidate.text.clone(),
                momentum,
            })
        })
        .collect();

    rising.sort_by(|a, b| b.momentum.cmp(&a.momentum));
    rising
}

/// Percent change between the front and back half of a candidate's column.
/// `None` when the older half has no signal: the change is unknown, not zero.
fn half_over_half_change(column: &[u32], half: usize) -> Option<Momentum> {
    if half == 0 || half >= column.len() {
        return None;
    }

    let older_avg = mean(&column[..half]);
    let recent_avg = mean(&column[half..]);
    if older_avg <= 0.0 {
        return None;
    }

    let percent = (((recent_avg - older_avg) / older_avg) * 100.0).round() as i64;
    if percent > BREAKOUT_THRESHOLD {
        Some(Momentum::Breakout)
    } else {
        Some(Momentum::Value(percent))
    }
}

/// Related topics arrive pre-ranked by the provider; keep the first
/// `MAX_TOPICS` in provider order.
pub fn rank_topics(mut topics: Vec<RelatedTopic>) -> Vec<RelatedTopic> {
    topics.truncate(MAX_TOPICS);
    topics
}

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&value| f64::from(value)).sum::<f64>() / values.len() as f64
}

fn rounded_mean(values: &[u32]) -> u32 {
    mean(values).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joint_samples(columns: &[Vec<u32>]) -> Vec<RawSample> {
        let rows = columns.first().map(|column| column.len()).unwrap_or(0);
        (0..rows)
            .map(|row| RawSample {
                timestamp: 1_700_000_000 + row as i64 * 604_800,
                values: columns.iter().map(|column| column[row]).collect(),
            })
            .collect()
    }

    #[test]
    fn test_filter_candidates_dedupes_case_insensitively() {
        let candidates = filter_candidates(
            "sourdough",
            vec![
                "Sourdough Starter".to_string(),
                "sourdough starter".to_string(),
                "rye bread".to_string(),
            ],
        );

        assert_eq!(candidates, vec!["rye bread"]);
    }

    #[test]
    fn test_filter_candidates_drops_keyword_and_extensions() {
        let candidates = filter_candidates(
            "sourdough",
            vec![
                "sourdough".to_string(),
                "sourdough recipe".to_string(),
                "bread flour".to_string(),
            ],
        );

        assert_eq!(candidates, vec!["bread flour"]);
    }

    #[test]
    fn test_filter_candidates_caps_at_four() {
        let suggestions: Vec<String> = (0..10).map(|i| format!("phrase {}", i)).collect();

        let candidates = filter_candidates("keyword", suggestions);

        assert_eq!(candidates.len(), MAX_CANDIDATES);
        assert_eq!(candidates[0], "phrase 0");
    }

    #[test]
    fn test_rank_candidates_drops_zero_average_and_normalizes() {
        // Column 0 is the primary keyword and is ignored by the ranker.
        let samples = joint_samples(&[
            vec![50, 50, 50, 50],
            vec![80, 80, 80, 80],
            vec![40, 40, 40, 40],
            vec![0, 0, 0, 0],
        ]);
        let candidates = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let (_, top_queries) = rank_candidates(&candidates, &samples);

        assert_eq!(
            top_queries,
            vec![
                TopQuery {
                    query: "a".to_string(),
                    value: 100,
                },
                TopQuery {
                    query: "b".to_string(),
                    value: 50,
                },
            ]
        );
    }

    #[test]
    fn test_rank_candidates_strongest_always_normalizes_to_hundred() {
        let samples = joint_samples(&[vec![10, 10], vec![3, 4]]);

        let (_, top_queries) = rank_candidates(&["a".to_string()], &samples);

        assert_eq!(top_queries[0].value, 100);
    }

    #[test]
    fn test_rising_momentum_percent_change() {
        // Candidate doubles from the front half to the back half.
        let samples = joint_samples(&[vec![50, 50, 50, 50], vec![10, 10, 20, 20]]);

        let (rising, _) = rank_candidates(&["a".to_string()], &samples);

        assert_eq!(
            rising,
            vec![RankedRelatedQuery {
                query: "a".to_string(),
                momentum: Momentum::Value(100),
            }]
        );
    }

    #[test]
    fn test_rising_excludes_undefined_older_half() {
        // olderAvg = 0: change is unknown, not zero, so the candidate is out.
        let samples = joint_samples(&[vec![50, 50, 50, 50], vec![0, 0, 5, 5]]);

        let (rising, top_queries) = rank_candidates(&["a".to_string()], &samples);

        assert!(rising.is_empty());
        // Still ranked by average popularity though.
        assert_eq!(top_queries.len(), 1);
    }

    #[test]
    fn test_rising_excludes_zero_momentum() {
        let samples = joint_samples(&[vec![50, 50, 50, 50], vec![30, 30, 30, 30]]);

        let (rising, _) = rank_candidates(&["a".to_string()], &samples);

        assert!(rising.is_empty());
    }

    #[test]
    fn test_rising_breakout_past_threshold() {
        // 1 -> 60 average is a 5900% change, past the 4999 cutoff.
        let samples = joint_samples(&[vec![50, 50, 50, 50], vec![1, 1, 60, 60]]);

        let (rising, _) = rank_candidates(&["a".to_string()], &samples);

        assert_eq!(rising[0].momentum, Momentum::Breakout);
    }

    #[test]
    fn test_rising_change_at_threshold_stays_numeric() {
        // Exactly 4900% must not collapse to the sentinel.
        let samples = joint_samples(&[vec![50, 50, 50, 50], vec![1, 1, 50, 50]]);

        let (rising, _) = rank_candidates(&["a".to_string()], &samples);

        assert_eq!(rising[0].momentum, Momentum::Value(4900));
    }

    #[test]
    fn test_rising_breakout_sorts_first() {
        let samples = joint_samples(&[
            vec![50, 50, 50, 50],
            vec![10, 10, 30, 30],
            vec![1, 1, 90, 90],
        ]);
        let candidates = vec!["steady".to_string(), "explosive".to_string()];

        let (rising, _) = rank_candidates(&candidates, &samples);

        assert_eq!(rising[0].query, "explosive");
        assert_eq!(rising[0].momentum, Momentum::Breakout);
        assert_eq!(rising[1].momentum, Momentum::Value(200));
    }

    #[test]
    fn test_rank_candidates_empty_samples() {
        let (rising, top_queries) = rank_candidates(&["a".to_string()], &[]);

        assert!(rising.is_empty());
        assert!(top_queries.is_empty());
    }

    #[test]
    fn test_rank_topics_caps_and_preserves_order() {
        let topics: Vec<RelatedTopic> = (0..8)
            .map(|i| RelatedTopic {
                title: format!("topic {}", i),
                topic_type: "Theme".to_string(),
            })
            .collect();

        let ranked = rank_topics(topics);

        assert_eq!(ranked.len(), MAX_TOPICS);
        assert_eq!(ranked[0].title, "topic 0");
        assert_eq!(ranked[5].title, "topic 5");
    }
}
