/// Substrings that mark a comment as promotional rather than a complaint.
pub const PROMO_KEYWORDS: &[&str] = &[
    "deal",
    "buy",
    "order",
    "shop",
    "save",
    "promotion",
    "call me",
];

const MIN_COMMENT_CHARS: usize = 10;

/// Returns `false` for comments too short to carry a complaint or that read
/// like promotions. Everything downstream only sees comments that pass.
pub fn is_customer_comment(text: &str) -> bool {
    let lowered = text.to_lowercase();
    if lowered.trim().chars().count() < MIN_COMMENT_CHARS {
        return false;
    }
    !PROMO_KEYWORDS
        .iter()
        .any(|promo| lowered.contains(promo))
}
