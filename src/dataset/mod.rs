//! In-memory comment table shared read-only by dashboards and chat sessions.

pub mod coerce;
pub mod posts;

pub use posts::{PostMetric, PostMetrics, PostMetricsTable};

use crate::classification::{is_customer_comment, sub_theme, IssueClassifier, IssueLabel, SubThemeLabel};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::hash::Hash;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// One exported comment row. Only `extract` feeds the classifiers; the rest
/// is metadata for aggregations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(rename = "PostId", default, deserialize_with = "coerce::opt_string")]
    pub post_id: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub extract: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_timestamp")]
    pub published: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub engagement: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub sentiment: Option<f64>,
    /// Opportunity-to-see reach estimate.
    #[serde(rename = "OTS", default, deserialize_with = "coerce::opt_f64")]
    pub ots: Option<f64>,
    #[serde(rename = "region.name", default, deserialize_with = "coerce::opt_string")]
    pub region: Option<String>,
    #[serde(rename = "city.name", default, deserialize_with = "coerce::opt_string")]
    pub city: Option<String>,
    #[serde(rename = "category.label", default, deserialize_with = "coerce::opt_string")]
    pub category: Option<String>,
}

impl CommentRecord {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            extract: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.extract.as_deref()
    }

    pub fn column(&self, column: Column) -> Option<&str> {
        let value = match column {
            Column::City => self.city.as_deref(),
            Column::Category => self.category.as_deref(),
            Column::Region => self.region.as_deref(),
            Column::PostId => self.post_id.as_deref(),
        };
        value.filter(|value| !value.trim().is_empty())
    }
}

/// Label-like columns that can be counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    City,
    Category,
    Region,
    PostId,
}

/// A comment with the labels the dashboards derive from its text.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedComment<'a> {
    pub record: &'a CommentRecord,
    pub issue: IssueLabel,
    pub sub_theme: SubThemeLabel,
    /// Character count of the comment text.
    pub comment_length: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CommentRecord>,
}

impl Dataset {
    pub fn new(records: Vec<CommentRecord>) -> Self {
        Self { records }
    }

    /// Loads a JSON array or JSON Lines export.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let records = read_rows(path.as_ref())?;
        let dataset = Self::new(records);
        info!(rows = dataset.len(), path = %path.as_ref().display(), "Loaded comment dataset");
        Ok(dataset)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        parse_rows(data).map(Self::new)
    }

    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keeps only rows whose text passes the customer-comment filter. Rows
    /// without text are dropped as well.
    pub fn customer_comments(&self) -> Dataset {
        let records: Vec<CommentRecord> = self
            .records
            .iter()
            .filter(|record| record.text().map(is_customer_comment).unwrap_or(false))
            .cloned()
            .collect();
        debug!(
            kept = records.len(),
            dropped = self.records.len() - records.len(),
            "Applied customer comment filter"
        );
        Dataset::new(records)
    }

    /// Non-blank comment texts in row order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter_map(|record| record.text())
            .filter(|text| !text.trim().is_empty())
    }

    /// Uniform sample without replacement of at most `limit` non-blank texts.
    pub fn sample_texts<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> Vec<String> {
        let texts: Vec<&str> = self.texts().collect();
        texts
            .choose_multiple(rng, limit.min(texts.len()))
            .map(|text| text.to_string())
            .collect()
    }

    /// Rows whose text contains `keyword`, ignoring case. An empty keyword
    /// matches every row that has text.
    pub fn search(&self, keyword: &str) -> Vec<&CommentRecord> {
        let needle = keyword.to_lowercase();
        self.records
            .iter()
            .filter(|record| {
                record
                    .text()
                    .map(|text| text.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Value frequencies of a column, most frequent first.
    pub fn value_counts(&self, column: Column) -> Vec<(String, usize)> {
        frequencies(
            self.records
                .iter()
                .filter_map(|record| record.column(column))
                .map(str::to_string),
        )
    }

    /// Most frequent value of a column and its count.
    pub fn mode(&self, column: Column) -> Option<(String, usize)> {
        self.value_counts(column).into_iter().next()
    }

    /// Arithmetic mean of the engagement values that are present.
    pub fn mean_engagement(&self) -> Option<f64> {
        mean(self.records.iter().filter_map(|record| record.engagement))
    }

    /// Classifies every row. Rows are independent so this runs on the rayon
    /// pool; output order matches row order.
    pub fn annotate(&self, classifier: &IssueClassifier) -> Vec<AnnotatedComment<'_>> {
        self.records
            .par_iter()
            .map(|record| AnnotatedComment {
                record,
                issue: classifier.classify_opt(record.text()),
                sub_theme: sub_theme(record.text()),
                comment_length: record.text().map(|text| text.chars().count()).unwrap_or(0),
            })
            .collect()
    }
}

/// The full export and the customer-comment subset derived from it.
///
/// Row-level answers (chat, totals, sentiment, hourly activity) read `all`;
/// issue and theme aggregations read `comments`.
#[derive(Debug, Clone)]
pub struct DatasetViews {
    pub all: Arc<Dataset>,
    pub comments: Dataset,
}

impl DatasetViews {
    /// With `customer_only` off both views hold every row.
    pub fn new(all: Dataset, customer_only: bool) -> Self {
        let comments = if customer_only {
            all.customer_comments()
        } else {
            all.clone()
        };
        Self {
            all: Arc::new(all),
            comments,
        }
    }
}

/// Reads a JSON array or JSON Lines file into rows of `T`.
pub(crate) fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    parse_rows(&data).with_context(|| format!("Failed to parse dataset {}", path.display()))
}

pub(crate) fn parse_rows<T: DeserializeOwned>(data: &str) -> Result<Vec<T>> {
    let trimmed = data.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("Dataset is not a JSON array of rows");
    }
    let mut rows = Vec::new();
    for (index, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = serde_json::from_str(line)
            .with_context(|| format!("Invalid JSON on line {}", index + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Counts occurrences and sorts by descending count. Ties keep the order in
/// which values were first seen.
pub fn frequencies<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match index.get(&value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
