use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One raw slice from the interest-over-time provider. `values` holds one
/// 0-100 interest score per requested keyword, in request order.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RawSample {
    pub timestamp: i64,
    pub values: Vec<u32>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: String,
    pub value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_value: Option<u32>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Rising,
    Falling,
    Stable,
}

/// Percent change between the two halves of the joint series. Growth past
/// 4999% is numerically unstable and collapses to the `Breakout` sentinel,
/// which serializes as a string and sorts above every numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Momentum {
    Value(i64),
    Breakout,
}

impl Serialize for Momentum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Momentum::Value(percent) => serializer.serialize_i64(*percent),
            Momentum::Breakout => serializer.serialize_str("Breakout"),
        }
    }
}

impl Ord for Momentum {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Momentum::Breakout, Momentum::Breakout) => Ordering::Equal,
            (Momentum::Breakout, Momentum::Value(_)) => Ordering::Greater,
            (Momentum::Value(_), Momentum::Breakout) => Ordering::Less,
            (Momentum::Value(a), Momentum::Value(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Momentum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RankedRelatedQuery {
    pub query: String,
    pub momentum: Momentum,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TopQuery {
    pub query: String,
    pub value: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RelatedTopic {
    pub title: String,
    #[serde(rename = "type")]
    pub topic_type: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub keyword: String,
    pub compare_keyword: Option<String>,
    pub geo: String,
    pub current_score: u32,
    pub peak_score: u32,
    pub trend: TrendLabel,
    pub timeline_data: Vec<MonthlyPoint>,
    pub rising_queries: Vec<RankedRelatedQuery>,
    pub top_queries: Vec<TopQuery>,
    pub rising_topics: Vec<RelatedTopic>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TrendRequestParameters {
    pub keyword: Option<String>,
    pub compare_with: Option<String>,
    pub geo: Option<String>,
}
