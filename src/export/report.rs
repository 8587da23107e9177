//! HTML summary report: aggregate stats plus the ranked table, written as a
//! single self-contained page.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::schema::PainRecord;

fn esc(s: &str) -> String {
    html_escape::encode_text(s).to_string()
}

/// Render the report page. Records are expected pre-ranked; the table keeps
/// the given order.
pub fn render_report(records: &[PainRecord]) -> String {
    let total = records.len();
    let avg_pain = if total == 0 {
        0.0
    } else {
        records
            .iter()
            .map(|r| f64::from(r.pain_score.unwrap_or(0)))
            .sum::<f64>()
            / total as f64
    };

    let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
    for rec in records {
        *categories.entry(rec.category.as_str()).or_insert(0) += 1;
    }
    let category_list = categories
        .iter()
        .map(|(cat, n)| format!("<li>{}: {}</li>", esc(cat), n))
        .collect::<String>();

    let mut rows = String::new();
    for rec in records {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            esc(&rec.pain_summary),
            esc(rec.category.as_str()),
            rec.severity_rating,
            rec.pain_score.map(|s| s.to_string()).unwrap_or_default(),
            rec.competition_level
                .map(|c| c.to_string())
                .unwrap_or_default(),
            rec.recommended_pricing.clone().unwrap_or_default(),
            rec.estimated_arr_potential.clone().unwrap_or_default(),
        ));
    }

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Pain-Point Radar validation report</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }}
th {{ background: #f4f4f4; }}
</style>
</head>
<body>
<h1>Pain-Point Radar validation report</h1>
<p>Analyzed {total} posts; average pain score {avg_pain:.1}.</p>
<ul>{category_list}</ul>
<table>
<thead><tr><th>Summary</th><th>Category</th><th>Severity</th><th>Pain</th><th>Competition</th><th>Pricing</th><th>ARR potential</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
</body>
</html>
"#
    )
}

/// Write the report to `path` (default `output/report.html`).
pub fn write_report(records: &[PainRecord], path: Option<&Path>) -> Result<PathBuf> {
    let out = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(super::DEFAULT_OUTPUT_DIR).join("report.html"));
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output dir {}", parent.display()))?;
    }
    fs::write(&out, render_report(records))
        .with_context(|| format!("writing report to {}", out.display()))?;
    tracing::info!(path = %out.display(), rows = records.len(), "html report written");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{transform_to_schema, RawItem};

    #[test]
    fn renders_counts_and_escapes_content() {
        let mut recs = transform_to_schema(&[RawItem {
            title: "<script>alert('x')</script> pricing".into(),
            ..Default::default()
        }]);
        recs[0].pain_score = Some(40);
        let html = render_report(&recs);
        assert!(html.contains("Analyzed 1 posts"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Pricing: 1"));
    }

    #[test]
    fn empty_batch_renders_without_division_by_zero() {
        let html = render_report(&[]);
        assert!(html.contains("Analyzed 0 posts"));
        assert!(html.contains("average pain score 0.0"));
    }
}
