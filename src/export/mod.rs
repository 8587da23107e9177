//! export — sinks for the enriched record sequence.
//!
//! Sinks take the full field set as ordered columns; absent optional fields
//! render blank so partially-enriched batches (stages skipped per flag)
//! export cleanly.

pub mod report;
pub mod sheets;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::schema::PainRecord;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Column order of every tabular sink; matches the record's field order.
pub const COLUMNS: &[&str] = &[
    "date",
    "subreddit",
    "post_title",
    "post_url",
    "comment_or_content",
    "pain_summary",
    "category",
    "severity_rating",
    "notes",
    "pain_score",
    "suggested_product_idea",
    "suggested_features",
    "suggested_mvp",
    "suggested_pricing_model",
    "suggested_target_users",
    "suggested_marketing_angle",
    "ph_score",
    "github_score",
    "reddit_score",
    "competition_level",
    "revenue_potential_score",
    "estimated_market_size",
    "estimated_target_audience",
    "recommended_pricing",
    "estimated_arr_potential",
];

fn opt_str(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

fn opt_num<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// One record as a row in `COLUMNS` order; `None` → blank cell.
pub fn record_row(rec: &PainRecord) -> Vec<String> {
    vec![
        rec.date.clone(),
        rec.subreddit.clone(),
        rec.post_title.clone(),
        rec.post_url.clone(),
        rec.comment_or_content.clone(),
        rec.pain_summary.clone(),
        rec.category.to_string(),
        rec.severity_rating.to_string(),
        rec.notes.clone(),
        opt_num(&rec.pain_score),
        opt_str(&rec.suggested_product_idea),
        opt_str(&rec.suggested_features),
        opt_str(&rec.suggested_mvp),
        opt_str(&rec.suggested_pricing_model),
        opt_str(&rec.suggested_target_users),
        opt_str(&rec.suggested_marketing_angle),
        opt_num(&rec.ph_score),
        opt_num(&rec.github_score),
        opt_num(&rec.reddit_score),
        rec.competition_level
            .map(|c| c.to_string())
            .unwrap_or_default(),
        opt_num(&rec.revenue_potential_score),
        opt_num(&rec.estimated_market_size),
        opt_num(&rec.estimated_target_audience),
        opt_str(&rec.recommended_pricing),
        opt_str(&rec.estimated_arr_potential),
    ]
}

/// RFC-4180-style escaping: quote when the field contains a comma, quote,
/// or line break; double embedded quotes.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write records as CSV. `path` defaults to `output/pain_points.csv`;
/// parent directories are created as needed. Returns the written path.
pub fn write_csv(records: &[PainRecord], path: Option<&Path>) -> Result<PathBuf> {
    let out = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR).join("pain_points.csv"));
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output dir {}", parent.display()))?;
    }

    let mut body = String::new();
    body.push_str(&COLUMNS.join(","));
    body.push('\n');
    for rec in records {
        let row: Vec<String> = record_row(rec).iter().map(|f| csv_escape(f)).collect();
        body.push_str(&row.join(","));
        body.push('\n');
    }

    fs::write(&out, body).with_context(|| format!("writing csv to {}", out.display()))?;
    tracing::info!(path = %out.display(), rows = records.len(), "csv export written");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{transform_to_schema, RawItem};

    #[test]
    fn row_is_column_aligned_with_blanks_for_missing() {
        let recs = transform_to_schema(&[RawItem {
            title: "pricing woes".into(),
            subreddit: "SaaS".into(),
            ..Default::default()
        }]);
        let row = record_row(&recs[0]);
        assert_eq!(row.len(), COLUMNS.len());
        assert_eq!(row[6], "Pricing");
        assert_eq!(row[7], "2");
        // No stage 2+ fields yet → blank cells
        assert_eq!(row[9], "");
        assert_eq!(row[19], "");
    }

    #[test]
    fn escaping_quotes_commas_and_newlines() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn writes_header_plus_row_per_record() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let recs = transform_to_schema(&[
            RawItem {
                title: "one, with comma".into(),
                ..Default::default()
            },
            RawItem {
                title: "two".into(),
                ..Default::default()
            },
        ]);
        let written = write_csv(&recs, Some(&path)).unwrap();
        let content = std::fs::read_to_string(written).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,subreddit,post_title"));
        assert!(lines[1].contains("\"one, with comma\""));
    }
}
