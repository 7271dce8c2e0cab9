use super::IssueLabel;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Second-level theme shown under an issue label in the theme breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubThemeLabel {
    Penalty,
    Contract,
    Cancellation,
    Refund,
    #[serde(rename = "Debt collection")]
    DebtCollection,
    #[serde(rename = "Agreeing to resolve")]
    AgreeingToResolve,
    #[serde(rename = "No response")]
    NoResponse,
    #[serde(rename = "Data Expiry")]
    DataExpiry,
    #[serde(rename = "Rude service")]
    RudeService,
    Miscellaneous,
    Other,
}

impl SubThemeLabel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SubThemeLabel::Penalty => "Penalty",
            SubThemeLabel::Contract => "Contract",
            SubThemeLabel::Cancellation => "Cancellation",
            SubThemeLabel::Refund => "Refund",
            SubThemeLabel::DebtCollection => "Debt collection",
            SubThemeLabel::AgreeingToResolve => "Agreeing to resolve",
            SubThemeLabel::NoResponse => "No response",
            SubThemeLabel::DataExpiry => "Data Expiry",
            SubThemeLabel::RudeService => "Rude service",
            SubThemeLabel::Miscellaneous => "Miscellaneous",
            SubThemeLabel::Other => "Other",
        }
    }
}

impl fmt::Display for SubThemeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered (keyword, sub-theme) table; the first contained keyword wins.
pub const SUB_THEME_RULES: &[(&str, SubThemeLabel)] = &[
    ("penalty", SubThemeLabel::Penalty),
    ("contract", SubThemeLabel::Contract),
    ("cancel", SubThemeLabel::Cancellation),
    ("refund", SubThemeLabel::Refund),
    ("debit", SubThemeLabel::DebtCollection),
    ("resolve", SubThemeLabel::AgreeingToResolve),
    ("no response", SubThemeLabel::NoResponse),
    ("data", SubThemeLabel::DataExpiry),
    ("rude", SubThemeLabel::RudeService),
    ("ignored", SubThemeLabel::RudeService),
];

/// Sub-theme of a comment. Missing text is `Other`; text matching no
/// keyword is `Miscellaneous`.
pub fn sub_theme(text: Option<&str>) -> SubThemeLabel {
    let Some(text) = text else {
        return SubThemeLabel::Other;
    };
    let lowered = text.to_lowercase();
    SUB_THEME_RULES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, label)| *label)
        .unwrap_or(SubThemeLabel::Miscellaneous)
}

/// A named, non-exclusive sub-issue flag within one issue category.
#[derive(Debug, Clone)]
pub struct SubIssuePattern {
    pub label: &'static str,
    pattern: Regex,
}

impl SubIssuePattern {
    fn new(label: &'static str, pattern: &str) -> Self {
        Self {
            label,
            pattern: Regex::new(&format!("(?i){pattern}"))
                .expect("sub-issue patterns are valid regex"),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Per-category sub-issue patterns behind the stacked timelines. Unlike the
/// issue classifier, a comment may raise several flags at once.
#[derive(Debug, Clone)]
pub struct SubIssuePatterns {
    support: Vec<SubIssuePattern>,
    network: Vec<SubIssuePattern>,
    billing: Vec<SubIssuePattern>,
}

static SUB_ISSUE_PATTERNS: LazyLock<SubIssuePatterns> = LazyLock::new(|| SubIssuePatterns {
    support: vec![
        SubIssuePattern::new("No response", "no response"),
        SubIssuePattern::new("Agreeing to resolve", "resolve"),
        SubIssuePattern::new("Rude service", "rude|ignored"),
    ],
    network: vec![
        SubIssuePattern::new("Outage", "outage"),
        SubIssuePattern::new("Unable to use data", "unable to use data"),
        SubIssuePattern::new("Data Expiry", "expired"),
    ],
    billing: vec![
        SubIssuePattern::new("Undue charges", "undue"),
        SubIssuePattern::new("Penalty", "penalty"),
        SubIssuePattern::new("Contract", "contract"),
        SubIssuePattern::new("Cancellation", "cancel"),
        SubIssuePattern::new("Debt collection", "debit|billing"),
    ],
});

impl SubIssuePatterns {
    pub fn standard() -> &'static SubIssuePatterns {
        &SUB_ISSUE_PATTERNS
    }

    /// Patterns for a category; empty for categories without a breakdown.
    pub fn for_category(&self, category: IssueLabel) -> &[SubIssuePattern] {
        match category {
            IssueLabel::Support => &self.support,
            IssueLabel::Network => &self.network,
            IssueLabel::Billing => &self.billing,
            _ => &[],
        }
    }

    pub fn labels(&self, category: IssueLabel) -> Vec<&'static str> {
        self.for_category(category)
            .iter()
            .map(|pattern| pattern.label)
            .collect()
    }

    /// Every sub-issue label of `category` whose pattern occurs in `text`.
    pub fn flags(&self, category: IssueLabel, text: &str) -> Vec<&'static str> {
        self.for_category(category)
            .iter()
            .filter(|pattern| pattern.is_match(text))
            .map(|pattern| pattern.label)
            .collect()
    }
}
