use crate::classification::{IssueLabel, SubIssuePatterns};
use crate::dataset::AnnotatedComment;
use anyhow::{bail, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Width of one timeline bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBucket {
    Day,
    Week,
    #[default]
    Month,
    Quarter,
}

impl TimeBucket {
    /// First day of the bucket containing `date`.
    pub fn start_of(&self, date: NaiveDate) -> NaiveDate {
        match self {
            TimeBucket::Day => date,
            TimeBucket::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            TimeBucket::Month => date.with_day(1).unwrap_or(date),
            TimeBucket::Quarter => {
                let month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
            }
        }
    }

    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            TimeBucket::Day => start.format("%b %d").to_string(),
            TimeBucket::Week => format!("Week of {}", start.format("%b %d")),
            TimeBucket::Month => start.format("%b %Y").to_string(),
            TimeBucket::Quarter => format!("Q{} {}", start.month0() / 3 + 1, start.year()),
        }
    }
}

impl FromStr for TimeBucket {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TimeBucket::Day),
            "week" => Ok(TimeBucket::Week),
            "month" => Ok(TimeBucket::Month),
            "quarter" => Ok(TimeBucket::Quarter),
            other => bail!("Unknown interval '{other}'. Expected day, week, month, or quarter."),
        }
    }
}

/// Sub-issue counts for one bucket of a category timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubIssueBucket {
    pub start: NaiveDate,
    pub label: String,
    pub counts: Vec<(&'static str, usize)>,
}

/// Stacked timeline of sub-issue flags for comments labelled `category`.
/// Buckets are chronological and only present when they hold at least one
/// dated comment of the category; every bucket lists every sub-issue label.
pub fn sub_issue_timeline(
    annotated: &[AnnotatedComment<'_>],
    category: IssueLabel,
    bucket: TimeBucket,
) -> Vec<SubIssueBucket> {
    let patterns = SubIssuePatterns::standard();
    let labels = patterns.labels(category);
    let mut buckets: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for comment in annotated.iter().filter(|comment| comment.issue == category) {
        let Some(published) = comment.record.published else {
            continue;
        };
        let start = bucket.start_of(published.date());
        let slots = buckets
            .entry(start)
            .or_insert_with(|| vec![0; labels.len()]);
        let text = comment.record.text().unwrap_or_default();
        for (slot, pattern) in patterns.for_category(category).iter().enumerate() {
            if pattern.is_match(text) {
                slots[slot] += 1;
            }
        }
    }
    buckets
        .into_iter()
        .map(|(start, slots)| SubIssueBucket {
            start,
            label: bucket.label(start),
            counts: labels.iter().copied().zip(slots).collect(),
        })
        .collect()
}
