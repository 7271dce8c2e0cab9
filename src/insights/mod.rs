//! Aggregations behind the complaint dashboards.
//!
//! These functions compute what the presentation layer charts; none of them
//! render anything. Inputs are a [`Dataset`] or its annotated rows.

pub mod timeline;

pub use timeline::{sub_issue_timeline, SubIssueBucket, TimeBucket};

use crate::classification::{IssueLabel, SubThemeLabel};
use crate::dataset::{frequencies, mean, AnnotatedComment, Column, CommentRecord, Dataset};
use chrono::{NaiveDate, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rows published within `start..=end`. Undated rows are dropped.
pub fn filter_by_date(dataset: &Dataset, start: NaiveDate, end: NaiveDate) -> Dataset {
    let records: Vec<CommentRecord> = dataset
        .records()
        .iter()
        .filter(|record| {
            record
                .published
                .map(|published| {
                    let day = published.date();
                    day >= start && day <= end
                })
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    Dataset::new(records)
}

/// Issue label counts, most frequent first.
pub fn issue_counts(annotated: &[AnnotatedComment<'_>]) -> Vec<(IssueLabel, usize)> {
    frequencies(annotated.iter().map(|comment| comment.issue))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeCount {
    pub theme: IssueLabel,
    pub sub_theme: SubThemeLabel,
    pub count: usize,
}

/// (theme, sub-theme) pair counts for the sunburst, ordered by theme then
/// sub-theme.
pub fn theme_breakdown(annotated: &[AnnotatedComment<'_>]) -> Vec<ThemeCount> {
    let mut pairs: BTreeMap<(IssueLabel, SubThemeLabel), usize> = BTreeMap::new();
    for comment in annotated {
        *pairs.entry((comment.issue, comment.sub_theme)).or_insert(0) += 1;
    }
    pairs
        .into_iter()
        .map(|((theme, sub_theme), count)| ThemeCount {
            theme,
            sub_theme,
            count,
        })
        .collect()
}

/// Comments per calendar day, oldest first.
pub fn comments_per_day(dataset: &Dataset) -> Vec<(NaiveDate, usize)> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for published in dataset.records().iter().filter_map(|record| record.published) {
        *days.entry(published.date()).or_insert(0) += 1;
    }
    days.into_iter().collect()
}

/// Engagement summed per calendar day, oldest first. Dated rows without an
/// engagement value still open their day with zero.
pub fn engagement_per_day(dataset: &Dataset) -> Vec<(NaiveDate, f64)> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in dataset.records() {
        if let Some(published) = record.published {
            *days.entry(published.date()).or_insert(0.0) += record.engagement.unwrap_or(0.0);
        }
    }
    days.into_iter().collect()
}

/// Post ids with the most comments.
pub fn most_active_posts(dataset: &Dataset, limit: usize) -> Vec<(String, usize)> {
    dataset
        .value_counts(Column::PostId)
        .into_iter()
        .take(limit)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Buckets sentiment scores by sign. Rows without a score are not counted.
pub fn sentiment_distribution(dataset: &Dataset) -> SentimentDistribution {
    let mut distribution = SentimentDistribution::default();
    for score in dataset.records().iter().filter_map(|record| record.sentiment) {
        if score > 0.0 {
            distribution.positive += 1;
        } else if score < 0.0 {
            distribution.negative += 1;
        } else {
            distribution.neutral += 1;
        }
    }
    distribution
}

/// Comment counts per hour of day (0..=23).
pub fn hourly_activity(dataset: &Dataset) -> [usize; 24] {
    let mut hours = [0usize; 24];
    for published in dataset.records().iter().filter_map(|record| record.published) {
        hours[published.hour() as usize] += 1;
    }
    hours
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_posts: usize,
    pub total_engagement: f64,
    /// Mean sentiment rounded to two decimals.
    pub average_sentiment: Option<f64>,
    pub total_ots: f64,
}

pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    let records = dataset.records();
    DatasetSummary {
        total_posts: records.len(),
        total_engagement: records.iter().filter_map(|record| record.engagement).sum(),
        average_sentiment: mean(records.iter().filter_map(|record| record.sentiment))
            .map(|value| (value * 100.0).round() / 100.0),
        total_ots: records.iter().filter_map(|record| record.ots).sum(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityInsights {
    pub city: String,
    pub total_posts: usize,
    pub total_engagement: f64,
}

/// Totals for one city; the city name is matched exactly.
pub fn city_insights(dataset: &Dataset, city: &str) -> CityInsights {
    let rows: Vec<&CommentRecord> = dataset
        .records()
        .iter()
        .filter(|record| record.city.as_deref() == Some(city))
        .collect();
    CityInsights {
        city: city.to_string(),
        total_posts: rows.len(),
        total_engagement: rows.iter().filter_map(|record| record.engagement).sum(),
    }
}
