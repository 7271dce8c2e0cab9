use super::{ClassificationRule, IssueLabel};
use std::sync::LazyLock;

/// Regex table of the main comments dashboard, in priority order.
pub const DASHBOARD_PATTERNS: &[(IssueLabel, &str)] = &[
    (
        IssueLabel::Billing,
        r"invoice|charge|billing|refund|cancel|account",
    ),
    (
        IssueLabel::Network,
        r"network|signal|coverage|slow|disconnect|data",
    ),
    (
        IssueLabel::Support,
        r"help|support|service|response|ignored|agent",
    ),
    (IssueLabel::Purchase, r"upgrade|purchase|delivery|order"),
];

/// Keyword table of the home and issue-analysis views, in priority order.
pub const GRANULAR_KEYWORDS: &[(IssueLabel, &[&str])] = &[
    (
        IssueLabel::Billing,
        &[
            "billing", "debit", "charge", "refund", "penalty", "contract", "cancel", "account",
        ],
    ),
    (
        IssueLabel::Network,
        &[
            "network",
            "data",
            "signal",
            "coverage",
            "outage",
            "disconnect",
            "speed",
        ],
    ),
    (
        IssueLabel::Support,
        &["support", "response", "resolve", "rude", "ignored", "agent"],
    ),
    (
        IssueLabel::DeliveryIssues,
        &["delivery", "sim card", "not receive", "delay", "wait"],
    ),
    (
        IssueLabel::ProductUpgrade,
        &["upgrade", "device", "router", "purchase"],
    ),
    (
        IssueLabel::ApplicationIssues,
        &["application", "apply", "approval"],
    ),
    (
        IssueLabel::SpamPromotions,
        &["spam", "unrelated", "ads", "promotion"],
    ),
    (
        IssueLabel::AccessIssues,
        &["login", "access", "portal", "website"],
    ),
];

static DASHBOARD_RULES: LazyLock<Vec<ClassificationRule>> = LazyLock::new(|| {
    DASHBOARD_PATTERNS
        .iter()
        .map(|(label, pattern)| {
            ClassificationRule::pattern(*label, pattern).expect("dashboard patterns are valid regex")
        })
        .collect()
});

static GRANULAR_RULES: LazyLock<Vec<ClassificationRule>> = LazyLock::new(|| {
    GRANULAR_KEYWORDS
        .iter()
        .map(|(label, keywords)| ClassificationRule::keywords(*label, keywords))
        .collect()
});

pub(crate) fn dashboard_rules() -> Vec<ClassificationRule> {
    DASHBOARD_RULES.clone()
}

pub(crate) fn granular_rules() -> Vec<ClassificationRule> {
    GRANULAR_RULES.clone()
}
