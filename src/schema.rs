//! schema.rs — canonical record shape and the raw→canonical transform.
//!
//! Raw forum submissions come in as loosely-filled `RawItem`s; this stage
//! builds a `PainRecord` per item with an inferred category, a severity
//! rating, and a truncated summary. Later stages only ever fill the
//! `Option` slots they own — fields are additive, never overwritten.

use serde::{Deserialize, Serialize};

/// Raw submission as delivered by an ingestion source or an API caller.
/// Every field is optional in practice; missing text defaults to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub full_link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Pricing,
    Bugs,
    Feature,
    Performance,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pricing => "Pricing",
            Category::Bugs => "Bugs",
            Category::Feature => "Feature",
            Category::Performance => "Performance",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
}

impl CompetitionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionLevel::Low => "Low",
            CompetitionLevel::Medium => "Medium",
            CompetitionLevel::High => "High",
        }
    }
}

impl std::fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pipeline's working unit. Identity fields are filled by this stage;
/// everything `Option` belongs to a later stage and starts empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainRecord {
    pub date: String,
    pub subreddit: String,
    pub post_title: String,
    pub post_url: String,
    pub comment_or_content: String,
    pub pain_summary: String,
    pub category: Category,
    pub severity_rating: u8,
    pub notes: String,

    // Stage 2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pain_score: Option<u32>,

    // Stage 3
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_product_idea: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_features: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_mvp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_pricing_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_target_users: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_marketing_angle: Option<String>,

    // Stage 4
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reddit_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competition_level: Option<CompetitionLevel>,

    // Stage 5
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_potential_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_market_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_target_audience: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_pricing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_arr_potential: Option<String>,
}

/// Ordered category → keyword table. First substring hit wins, so the scan
/// order is part of the contract; keep this a slice, never a map.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Pricing,
        &["price", "pricing", "cost", "expensive", "subscription"],
    ),
    (Category::Bugs, &["bug", "error", "crash", "broken"]),
    (
        Category::Feature,
        &["feature", "missing", "would be nice", "need"],
    ),
    (
        Category::Performance,
        &["slow", "latency", "lag", "performance"],
    ),
];

const SUMMARY_MAX_CHARS: usize = 200;

/// First matching keyword group decides the category; no hit → `Other`.
pub fn infer_category(text: &str) -> Category {
    let t = text.to_lowercase();
    for (cat, kws) in CATEGORY_KEYWORDS {
        if kws.iter().any(|k| t.contains(k)) {
            return *cat;
        }
    }
    Category::Other
}

/// Severity 2–5 from descending keyword tiers; the highest tier with a hit
/// wins regardless of what else co-occurs. Tier 1 is never produced.
pub fn infer_severity(text: &str) -> u8 {
    let t = text.to_lowercase();
    if ["urgent", "critical", "blocking", "can't", "cannot"]
        .iter()
        .any(|k| t.contains(k))
    {
        return 5;
    }
    if ["major", "breaking", "serious"].iter().any(|k| t.contains(k)) {
        return 4;
    }
    if ["annoy", "annoying", "frustrat"].iter().any(|k| t.contains(k)) {
        return 3;
    }
    2
}

/// Trimmed input up to 200 chars verbatim; longer text is cut at the last
/// space before the limit and suffixed with "...".
pub fn summarize(text: &str) -> String {
    let t = text.trim();
    if t.chars().count() <= SUMMARY_MAX_CHARS {
        return t.to_string();
    }
    let cut: String = t.chars().take(SUMMARY_MAX_CHARS).collect();
    let head = match cut.rfind(' ') {
        Some(idx) => &cut[..idx],
        None => cut.as_str(),
    };
    format!("{head}...")
}

/// Stage 1: raw items → canonical records, order preserved.
pub fn transform_to_schema(items: &[RawItem]) -> Vec<PainRecord> {
    items
        .iter()
        .map(|it| {
            let content = format!("{}\n{}", it.title, it.selftext);
            PainRecord {
                date: it.date.clone(),
                subreddit: it.subreddit.clone(),
                post_title: it.title.clone(),
                post_url: it.full_link.clone(),
                comment_or_content: it.selftext.clone(),
                pain_summary: summarize(&content),
                category: infer_category(&content),
                severity_rating: infer_severity(&content),
                notes: String::new(),
                pain_score: None,
                suggested_product_idea: None,
                suggested_features: None,
                suggested_mvp: None,
                suggested_pricing_model: None,
                suggested_target_users: None,
                suggested_marketing_angle: None,
                ph_score: None,
                github_score: None,
                reddit_score: None,
                competition_level: None,
                revenue_potential_score: None,
                estimated_market_size: None,
                estimated_target_audience: None,
                recommended_pricing: None,
                estimated_arr_potential: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_first_group_wins_on_cooccurrence() {
        // "price" (pricing group) and "bug" (bugs group) both present;
        // pricing is scanned first.
        assert_eq!(infer_category("the price is a bug magnet"), Category::Pricing);
        assert_eq!(infer_category("found a bug, app crashes"), Category::Bugs);
        assert_eq!(infer_category("would be nice to have dark mode"), Category::Feature);
        assert_eq!(infer_category("so much lag lately"), Category::Performance);
        assert_eq!(infer_category("hello world"), Category::Other);
    }

    #[test]
    fn severity_higher_tier_dominates() {
        assert_eq!(infer_severity("urgent and also annoying"), 5);
        assert_eq!(infer_severity("this is a serious regression"), 4);
        assert_eq!(infer_severity("mildly frustrating"), 3);
        assert_eq!(infer_severity("all good here"), 2);
    }

    #[test]
    fn severity_never_one() {
        for text in ["", "neutral", "love it", "cannot log in"] {
            let s = infer_severity(text);
            assert!((2..=5).contains(&s), "severity {s} out of range for {text:?}");
        }
    }

    #[test]
    fn summary_short_text_verbatim() {
        assert_eq!(summarize("  hello  "), "hello");
        assert_eq!(summarize(""), "");
        let exactly_200 = "a".repeat(200);
        assert_eq!(summarize(&exactly_200), exactly_200);
    }

    #[test]
    fn summary_truncates_on_word_boundary() {
        let long = "word ".repeat(60); // 300 chars
        let s = summarize(&long);
        assert!(s.len() <= 203, "len {}", s.len());
        assert!(s.ends_with("..."));
        assert!(!s.trim_end_matches("...").ends_with(' '));
    }

    #[test]
    fn transform_defaults_missing_fields() {
        let items = vec![RawItem::default()];
        let recs = transform_to_schema(&items);
        assert_eq!(recs.len(), 1);
        let r = &recs[0];
        assert_eq!(r.category, Category::Other);
        assert_eq!(r.severity_rating, 2);
        assert_eq!(r.notes, "");
        assert!(r.pain_score.is_none());
        assert!(r.competition_level.is_none());
    }

    #[test]
    fn transform_preserves_order_and_length() {
        let items: Vec<RawItem> = (0..5)
            .map(|i| RawItem {
                title: format!("post {i}"),
                ..Default::default()
            })
            .collect();
        let recs = transform_to_schema(&items);
        assert_eq!(recs.len(), 5);
        for (i, r) in recs.iter().enumerate() {
            assert_eq!(r.post_title, format!("post {i}"));
        }
    }
}
