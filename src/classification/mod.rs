//! Keyword and pattern classifiers for complaint comments.
//!
//! Every classifier here is a pure function over the lower-cased comment
//! text. Rule tables are walked in order and the first match decides the
//! label; reordering a table changes results.

pub mod prefilter;
pub mod sub_theme;
pub mod taxonomy;

pub use prefilter::{is_customer_comment, PROMO_KEYWORDS};
pub use sub_theme::{sub_theme, SubIssuePatterns, SubThemeLabel, SUB_THEME_RULES};
pub use taxonomy::{DASHBOARD_PATTERNS, GRANULAR_KEYWORDS};

use anyhow::{bail, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Issue labels across both taxonomies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IssueLabel {
    Billing,
    Network,
    Support,
    Purchase,
    #[serde(rename = "Delivery Issues")]
    DeliveryIssues,
    #[serde(rename = "Product Upgrade")]
    ProductUpgrade,
    #[serde(rename = "Application Issues")]
    ApplicationIssues,
    #[serde(rename = "Spam / Promotions")]
    SpamPromotions,
    #[serde(rename = "Access Issues")]
    AccessIssues,
    Other,
    Uncategorized,
}

impl IssueLabel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            IssueLabel::Billing => "Billing",
            IssueLabel::Network => "Network",
            IssueLabel::Support => "Support",
            IssueLabel::Purchase => "Purchase",
            IssueLabel::DeliveryIssues => "Delivery Issues",
            IssueLabel::ProductUpgrade => "Product Upgrade",
            IssueLabel::ApplicationIssues => "Application Issues",
            IssueLabel::SpamPromotions => "Spam / Promotions",
            IssueLabel::AccessIssues => "Access Issues",
            IssueLabel::Other => "Other",
            IssueLabel::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for IssueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule table a call site classifies with.
///
/// `Dashboard` is the coarse regex table of the main comments dashboard;
/// `Granular` is the keyword table shared by the home and issue-analysis
/// views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueTaxonomy {
    Dashboard,
    #[default]
    Granular,
}

impl IssueTaxonomy {
    pub const fn fallback(&self) -> IssueLabel {
        match self {
            IssueTaxonomy::Dashboard => IssueLabel::Other,
            IssueTaxonomy::Granular => IssueLabel::Uncategorized,
        }
    }
}

impl FromStr for IssueTaxonomy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dashboard" => Ok(IssueTaxonomy::Dashboard),
            "granular" => Ok(IssueTaxonomy::Granular),
            other => bail!("Unknown taxonomy '{other}'. Expected 'dashboard' or 'granular'."),
        }
    }
}

/// How a rule decides whether lower-cased text belongs to its label.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Any keyword appearing as a substring.
    Keywords(Vec<String>),
    /// A regex searched anywhere in the text.
    Pattern(Regex),
}

impl Matcher {
    pub fn is_match(&self, lowered: &str) -> bool {
        match self {
            Matcher::Keywords(keywords) => keywords
                .iter()
                .any(|keyword| lowered.contains(keyword.as_str())),
            Matcher::Pattern(regex) => regex.is_match(lowered),
        }
    }
}

/// One (label, matcher) entry of an ordered rule table.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub label: IssueLabel,
    pub matcher: Matcher,
}

impl ClassificationRule {
    pub fn keywords(label: IssueLabel, keywords: &[&str]) -> Self {
        Self {
            label,
            matcher: Matcher::Keywords(
                keywords
                    .iter()
                    .map(|keyword| keyword.to_lowercase())
                    .collect(),
            ),
        }
    }

    pub fn pattern(label: IssueLabel, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            label,
            matcher: Matcher::Pattern(Regex::new(pattern)?),
        })
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.matcher.is_match(lowered)
    }
}

/// First-match-wins issue classifier over an ordered rule table.
#[derive(Debug, Clone)]
pub struct IssueClassifier {
    rules: Vec<ClassificationRule>,
    fallback: IssueLabel,
}

impl IssueClassifier {
    pub fn new(taxonomy: IssueTaxonomy) -> Self {
        let rules = match taxonomy {
            IssueTaxonomy::Dashboard => taxonomy::dashboard_rules(),
            IssueTaxonomy::Granular => taxonomy::granular_rules(),
        };
        Self {
            rules,
            fallback: taxonomy.fallback(),
        }
    }

    /// Builds a classifier from a caller-supplied table.
    pub fn with_rules(rules: Vec<ClassificationRule>, fallback: IssueLabel) -> Self {
        Self { rules, fallback }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn fallback(&self) -> IssueLabel {
        self.fallback
    }

    /// Every label this classifier can emit, in table order, fallback last.
    pub fn labels(&self) -> Vec<IssueLabel> {
        let mut labels: Vec<IssueLabel> = Vec::with_capacity(self.rules.len() + 1);
        for rule in &self.rules {
            if !labels.contains(&rule.label) {
                labels.push(rule.label);
            }
        }
        if !labels.contains(&self.fallback) {
            labels.push(self.fallback);
        }
        labels
    }

    pub fn classify(&self, text: &str) -> IssueLabel {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.label)
            .unwrap_or(self.fallback)
    }

    /// Missing text classifies like an empty comment.
    pub fn classify_opt(&self, text: Option<&str>) -> IssueLabel {
        self.classify(text.unwrap_or_default())
    }
}

impl Default for IssueClassifier {
    fn default() -> Self {
        Self::new(IssueTaxonomy::default())
    }
}
