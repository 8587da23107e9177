//! solution.rs — category → static advisory template.
//!
//! Pure lookup, no failure mode; running it twice writes the same values.

use once_cell::sync::Lazy;

use crate::schema::{Category, PainRecord};

pub struct SolutionTemplate {
    pub idea: &'static str,
    pub features: &'static [&'static str],
    pub mvp: &'static str,
    pub pricing_model: &'static str,
    pub target_users: &'static str,
    pub marketing: &'static str,
}

static TEMPLATES: Lazy<Vec<(Category, SolutionTemplate)>> = Lazy::new(|| {
    vec![
        (
            Category::Pricing,
            SolutionTemplate {
                idea: "SaaS platform for cost optimization",
                features: &[
                    "Cost analyzer",
                    "Budget tracker",
                    "Alternative finder",
                    "ROI calculator",
                ],
                mvp: "Browser extension that compares prices across vendors",
                pricing_model: "Freemium ($0-29/mo for basic, $99+/mo for enterprise)",
                target_users: "Finance teams, procurement managers, cost-conscious founders",
                marketing: "Position as 'Save 30% on SaaS costs' on ProductHunt and indie communities",
            },
        ),
        (
            Category::Bugs,
            SolutionTemplate {
                idea: "Debugging & error tracking platform",
                features: &[
                    "Real-time error alerts",
                    "Stack trace analysis",
                    "Team collaboration",
                    "Integration hub",
                ],
                mvp: "Slack bot that aggregates and analyzes error logs",
                pricing_model: "Pay-per-error ($0.01 per logged error, min $99/mo)",
                target_users: "DevOps teams, startups, backend engineers",
                marketing: "Target r/devops, ProductHunt, and developer communities",
            },
        ),
        (
            Category::Feature,
            SolutionTemplate {
                idea: "Feature request management & prioritization tool",
                features: &[
                    "Vote-based prioritization",
                    "User feedback collection",
                    "Roadmap visualization",
                    "Integration with Slack",
                ],
                mvp: "Spreadsheet sync tool that auto-prioritizes based on user votes",
                pricing_model: "Subscription ($49-199/mo based on requests/month)",
                target_users: "Product managers, SaaS founders, design teams",
                marketing: "Target ProductHunt and product management communities",
            },
        ),
        (
            Category::Performance,
            SolutionTemplate {
                idea: "Performance monitoring & optimization SaaS",
                features: &[
                    "Real-time monitoring",
                    "Bottleneck detection",
                    "Recommendations",
                    "Benchmarking",
                ],
                mvp: "CLI tool for local performance profiling",
                pricing_model: "SaaS + premium support ($79-499/mo)",
                target_users: "Developers, DevOps, performance engineers",
                marketing: "HackerNews, GitHub, developer blogs",
            },
        ),
        (
            Category::Other,
            SolutionTemplate {
                idea: "Market validation & research platform",
                features: &[
                    "Problem identification",
                    "Market sizing",
                    "Competitor research",
                    "Automated reports",
                ],
                mvp: "CLI that aggregates Reddit + ProductHunt insights",
                pricing_model: "Subscription ($29-299/mo based on reports)",
                target_users: "Founders, product managers, investors",
                marketing: "Indie Hackers, Twitter, founder communities",
            },
        ),
    ]
});

/// Template for a category; anything unlisted takes the `Other` template.
pub fn template_for(category: Category) -> &'static SolutionTemplate {
    TEMPLATES
        .iter()
        .find(|(c, _)| *c == category)
        .or_else(|| TEMPLATES.iter().find(|(c, _)| *c == Category::Other))
        .map(|(_, t)| t)
        .expect("Other template present")
}

/// Stage 3: fills the six `suggested_*` fields from the category template.
pub fn generate_solutions(records: &mut [PainRecord]) {
    for rec in records.iter_mut() {
        let t = template_for(rec.category);
        rec.suggested_product_idea = Some(t.idea.to_string());
        rec.suggested_features = Some(t.features.join(", "));
        rec.suggested_mvp = Some(t.mvp.to_string());
        rec.suggested_pricing_model = Some(t.pricing_model.to_string());
        rec.suggested_target_users = Some(t.target_users.to_string());
        rec.suggested_marketing_angle = Some(t.marketing.to_string());
    }
}
