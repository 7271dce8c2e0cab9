//! Per-post interaction totals exported alongside the comment table.

use super::{coerce, parse_rows, read_rows};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMetrics {
    #[serde(rename = "PostId", default, deserialize_with = "coerce::opt_string")]
    pub post_id: Option<String>,
    #[serde(rename = "ReplyToCount", default, deserialize_with = "coerce::opt_count")]
    pub replies: Option<u64>,
    #[serde(rename = "ReshareCount", default, deserialize_with = "coerce::opt_count")]
    pub reshares: Option<u64>,
    /// Every reference to the post: replies, reshares and reactions.
    #[serde(
        rename = "TotalFKReferences",
        default,
        deserialize_with = "coerce::opt_count"
    )]
    pub total_engagement: Option<u64>,
}

impl PostMetrics {
    pub fn get(&self, metric: PostMetric) -> Option<u64> {
        match metric {
            PostMetric::Replies => self.replies,
            PostMetric::Reshares => self.reshares,
            PostMetric::TotalEngagement => self.total_engagement,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostMetric {
    Replies,
    Reshares,
    TotalEngagement,
}

impl PostMetric {
    pub const ALL: [PostMetric; 3] = [
        PostMetric::Replies,
        PostMetric::Reshares,
        PostMetric::TotalEngagement,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PostMetric::Replies => "Replies",
            PostMetric::Reshares => "Reshares",
            PostMetric::TotalEngagement => "Total Engagement",
        }
    }
}

impl fmt::Display for PostMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostMetric {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replies" => Ok(PostMetric::Replies),
            "reshares" => Ok(PostMetric::Reshares),
            "total" | "total_engagement" => Ok(PostMetric::TotalEngagement),
            other => bail!("Unknown post metric '{other}'. Expected replies, reshares, or total."),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostMetricsTable {
    rows: Vec<PostMetrics>,
}

impl PostMetricsTable {
    pub fn new(rows: Vec<PostMetrics>) -> Self {
        Self { rows }
    }

    /// Loads a JSON array or JSON Lines export.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let table = Self::new(read_rows(path.as_ref())?);
        info!(posts = table.len(), path = %path.as_ref().display(), "Loaded post metrics");
        Ok(table)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        parse_rows(data).map(Self::new)
    }

    pub fn rows(&self) -> &[PostMetrics] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row for `post_id`.
    pub fn find(&self, post_id: &str) -> Option<&PostMetrics> {
        self.rows
            .iter()
            .find(|row| row.post_id.as_deref() == Some(post_id))
    }

    /// Posts with the highest `metric`, highest first. Ties keep file order;
    /// rows missing the id or the value are skipped.
    pub fn top(&self, metric: PostMetric, limit: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .rows
            .iter()
            .filter_map(|row| Some((row.post_id.as_deref()?, row.get(metric)?)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }
}
