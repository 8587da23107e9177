//! revenue.rs — market score, pricing tier, and ARR estimate.
//!
//! Every input is defaulted when absent (pain 50, competition Medium,
//! severity 3), so this stage has no failure mode and can run on records
//! that skipped earlier optional stages.

use crate::audience::AudienceConfig;
use crate::schema::{CompetitionLevel, PainRecord};

const DEFAULT_PAIN_SCORE: u32 = 50;
const DEFAULT_SEVERITY: u8 = 3;

/// Thousands-separated currency string: 1234567 → "$1,234,567".
pub fn format_usd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("${out}")
}

fn competition_multiplier(level: CompetitionLevel) -> f64 {
    match level {
        CompetitionLevel::Low => 1.0,
        CompetitionLevel::Medium => 0.8,
        CompetitionLevel::High => 0.6,
    }
}

fn target_pct(severity: u8) -> f64 {
    if severity >= 4 {
        0.5
    } else if severity == 3 {
        0.3
    } else {
        0.1
    }
}

/// Stage 5: writes the five revenue fields. Order and length preserved.
pub fn estimate_revenue_potential(records: &mut [PainRecord], audiences: &AudienceConfig) {
    for rec in records.iter_mut() {
        let pain_score = rec.pain_score.unwrap_or(DEFAULT_PAIN_SCORE);
        let competition = rec.competition_level.unwrap_or(CompetitionLevel::Medium);
        let severity = if rec.severity_rating == 0 {
            DEFAULT_SEVERITY
        } else {
            rec.severity_rating
        };

        let audience_size = audiences.size_for(&rec.subreddit);

        let market_score = f64::from(pain_score) * 0.4
            + (audience_size as f64 / 10_000.0).min(100.0) * 0.3
            + f64::from(severity) * 5.0 * 0.2;

        let revenue_score = ((market_score * competition_multiplier(competition)) as u32).min(100);

        let target_audience = (audience_size as f64 * target_pct(severity)) as u64;

        let (pricing_tier, arr) = if revenue_score >= 75 {
            ("$199/mo", (target_audience as f64 * 199.0 * 0.05) as u64)
        } else if revenue_score >= 50 {
            ("$99/mo", (target_audience as f64 * 99.0 * 0.03) as u64)
        } else {
            ("$49/mo", (target_audience as f64 * 49.0 * 0.02) as u64)
        };

        rec.revenue_potential_score = Some(revenue_score);
        rec.estimated_market_size = Some(audience_size);
        rec.estimated_target_audience = Some(target_audience);
        rec.recommended_pricing = Some(pricing_tier.to_string());
        rec.estimated_arr_potential = Some(format_usd(arr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{transform_to_schema, RawItem};

    fn base_record(sub: &str) -> PainRecord {
        transform_to_schema(&[RawItem {
            subreddit: sub.to_string(),
            ..Default::default()
        }])
        .remove(0)
    }

    #[test]
    fn usd_formatting() {
        assert_eq!(format_usd(0), "$0");
        assert_eq!(format_usd(950), "$950");
        assert_eq!(format_usd(1_000), "$1,000");
        assert_eq!(format_usd(2_487_500), "$2,487,500");
    }

    #[test]
    fn high_pain_low_competition_lands_top_tier() {
        let mut rec = base_record("SaaS");
        rec.pain_score = Some(95);
        rec.competition_level = Some(CompetitionLevel::Low);
        rec.severity_rating = 4;
        let mut recs = vec![rec];
        estimate_revenue_potential(&mut recs, &AudienceConfig::default_seed());
        let r = &recs[0];
        // market = 95*0.4 + 50*0.3 + 4*5*0.2 = 38 + 15 + 4 = 57; ×1.0 = 57
        assert_eq!(r.revenue_potential_score, Some(57));
        assert_eq!(r.recommended_pricing.as_deref(), Some("$99/mo"));
        // severity 4 → 50% of 500k
        assert_eq!(r.estimated_target_audience, Some(250_000));
        assert_eq!(r.estimated_arr_potential.as_deref(), Some("$742,500"));
    }

    #[test]
    fn ceiling_inputs_land_top_tier() {
        let mut rec = base_record("startups");
        rec.pain_score = Some(100);
        rec.severity_rating = 5;
        rec.competition_level = Some(CompetitionLevel::Low);
        let mut recs = vec![rec];
        estimate_revenue_potential(&mut recs, &AudienceConfig::default_seed());
        let r = &recs[0];
        // market = 40 + 30 + 5 = 75, the theoretical ceiling; ×1.0 = 75
        assert_eq!(r.revenue_potential_score, Some(75));
        assert_eq!(r.recommended_pricing.as_deref(), Some("$199/mo"));
        assert_eq!(r.estimated_arr_potential.as_deref(), Some("$4,975,000"));
    }

    #[test]
    fn target_audience_scales_with_severity() {
        for (severity, expected) in [(4u8, 250_000u64), (3, 150_000), (2, 50_000)] {
            let mut rec = base_record("SaaS");
            rec.severity_rating = severity;
            let mut recs = vec![rec];
            estimate_revenue_potential(&mut recs, &AudienceConfig::default_seed());
            assert_eq!(
                recs[0].estimated_target_audience,
                Some(expected),
                "severity {severity}"
            );
        }
    }

    #[test]
    fn missing_inputs_take_defaults() {
        let mut recs = vec![base_record("unknown_sub")];
        recs[0].severity_rating = 0; // simulate an absent rating
        estimate_revenue_potential(&mut recs, &AudienceConfig::default_seed());
        let r = &recs[0];
        // pain 50, audience 100k, severity 3, competition Medium:
        // market = 20 + 3 + 3 = 26; ×0.8 = 20.8 → 20
        assert_eq!(r.revenue_potential_score, Some(20));
        assert_eq!(r.recommended_pricing.as_deref(), Some("$49/mo"));
        assert_eq!(r.estimated_market_size, Some(100_000));
    }

    #[test]
    fn competition_multiplier_is_monotone() {
        let score_for = |level: CompetitionLevel| {
            let mut rec = base_record("startups");
            rec.pain_score = Some(80);
            rec.severity_rating = 5;
            rec.competition_level = Some(level);
            let mut recs = vec![rec];
            estimate_revenue_potential(&mut recs, &AudienceConfig::default_seed());
            recs[0].revenue_potential_score.unwrap()
        };
        let low = score_for(CompetitionLevel::Low);
        let medium = score_for(CompetitionLevel::Medium);
        let high = score_for(CompetitionLevel::High);
        assert!(low > medium && medium > high, "{low} {medium} {high}");
    }

    #[test]
    fn rerun_is_idempotent() {
        let mut recs = vec![base_record("SaaS")];
        recs[0].pain_score = Some(66);
        estimate_revenue_potential(&mut recs, &AudienceConfig::default_seed());
        let first = recs[0].clone();
        estimate_revenue_potential(&mut recs, &AudienceConfig::default_seed());
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&recs[0]).unwrap()
        );
    }
}
