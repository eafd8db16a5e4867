//! Plain-text report rendering.
//!
//! The summary groups answers by catalog section; the strategy report lays
//! out a [`StrategyResult`] in eight numbered sections.

use crate::catalog::{Catalog, FieldKind, Section};
use crate::record::BusinessRecord;
use crate::strategy::StrategyResult;

/// Shown in place of a blank answer.
pub const NOT_PROVIDED: &str = "Not provided";

fn push_heading(out: &mut String, title: &str, underline: char) {
    out.push_str(title);
    out.push('\n');
    out.push_str(&underline.to_string().repeat(title.chars().count()));
    out.push('\n');
}

fn push_bullets<S: AsRef<str>>(out: &mut String, items: &[S]) {
    for item in items {
        out.push_str("- ");
        out.push_str(item.as_ref());
        out.push('\n');
    }
}

fn display_value(kind: FieldKind, value: &str) -> String {
    if value.trim().is_empty() {
        return NOT_PROVIDED.to_string();
    }
    match kind {
        FieldKind::Numeric => format!("${}", value.trim()),
        _ => value.to_string(),
    }
}

/// Render a record grouped by section, in catalog order.
///
/// Sections without fields in this catalog are skipped.
pub fn render_summary(catalog: &Catalog, record: &BusinessRecord) -> String {
    let mut out = String::new();
    push_heading(&mut out, "Business Information Summary:", '-');

    for section in Section::ALL {
        let mut fields = catalog.in_section(section).peekable();
        if fields.peek().is_none() {
            continue;
        }

        out.push('\n');
        out.push_str(section.heading());
        out.push_str(":\n");
        for field in fields {
            out.push_str(&format!(
                "- {}: {}\n",
                field.label,
                display_value(field.kind, record.value(field.key))
            ));
        }
    }

    out
}

/// Render the full strategy report.
pub fn render_strategy_report(strategy: &StrategyResult) -> String {
    let mut out = String::new();
    push_heading(&mut out, "Marketing Strategy:", '=');

    out.push('\n');
    push_heading(&mut out, "1. Business Analysis:", '-');
    out.push_str(&format!("Market Positioning: {}\n", strategy.market_positioning));
    out.push_str("\nSWOT Analysis:\n");
    let swot = &strategy.swot_analysis;
    for (title, items) in [
        ("Strengths", &swot.strengths),
        ("Weaknesses", &swot.weaknesses),
        ("Opportunities", &swot.opportunities),
        ("Threats", &swot.threats),
    ] {
        out.push_str(&format!("{title}:\n"));
        push_bullets(&mut out, items);
    }

    out.push('\n');
    push_heading(&mut out, "2. Target Audience:", '-');
    out.push_str("Audience Personas:\n");
    push_bullets(&mut out, &strategy.audience_personas);
    out.push_str("\nCustomer Journey:\n");
    push_bullets(&mut out, &strategy.customer_journey);

    out.push('\n');
    push_heading(&mut out, "3. Channel Strategy:", '-');
    for plan in &strategy.channel_strategy {
        out.push_str(&format!(
            "\nChannel: {}\nGoal: {}\nBudget Allocation: {}\nKPIs:\n",
            plan.channel, plan.goal, plan.budget_allocation
        ));
        push_bullets(&mut out, &plan.kpis);
    }

    out.push('\n');
    push_heading(&mut out, "4. Campaign Structure:", '-');
    for campaign in &strategy.campaign_structure {
        out.push_str(&format!(
            "\nCampaign Type: {}\nTargeting: {}\nKeywords:\n",
            campaign.campaign_type, campaign.targeting
        ));
        push_bullets(&mut out, &campaign.keywords);
        out.push_str("Ad Copy Recommendations:\n");
        push_bullets(&mut out, &campaign.ad_copy_recommendations);
    }

    out.push('\n');
    push_heading(&mut out, "5. Budget & Timeline:", '-');
    out.push_str("Budget Breakdown:\n");
    for line in &strategy.budget_breakdown {
        out.push_str(&format!(
            "- {}: {} ({})\n",
            line.channel, line.amount, line.percentage
        ));
    }
    out.push_str("\nTimeline:\n");
    for phase in &strategy.timeline {
        out.push_str(&format!(
            "\nPhase: {}\nDuration: {}\nMilestones:\n",
            phase.phase, phase.duration
        ));
        push_bullets(&mut out, &phase.milestones);
    }

    out.push('\n');
    push_heading(&mut out, "6. Measurement & Optimization:", '-');
    out.push_str("KPIs:\n");
    for kpi in &strategy.kpis {
        out.push_str(&format!(
            "- {}: {} ({})\n",
            kpi.metric, kpi.target, kpi.frequency
        ));
    }
    out.push_str("\nOptimization Schedule:\n");
    push_bullets(&mut out, &strategy.optimization_schedule);

    out.push('\n');
    push_heading(&mut out, "7. Implementation Plan:", '-');
    for step in &strategy.next_steps {
        out.push_str(&format!(
            "\nStep: {}\nPriority: {}\nTimeline: {}\nDependencies:\n",
            step.step, step.priority, step.timeline
        ));
        push_bullets(&mut out, &step.dependencies);
    }

    out.push('\n');
    push_heading(&mut out, "8. Risk Assessment:", '-');
    for risk in &strategy.risks {
        out.push_str(&format!(
            "\nRisk: {}\nImpact: {}\nMitigation: {}\n",
            risk.risk, risk.impact, risk.mitigation
        ));
    }

    out.push_str("\nSuccess Criteria:\n");
    push_bullets(&mut out, &strategy.success_criteria);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BusinessRecord {
        let catalog = Catalog::marketing();
        let mut record = BusinessRecord::empty(&catalog);
        record.set("name", "LNO Boutique").unwrap();
        record.set("industry", "Health & Wellness").unwrap();
        record.set("budget", "2000").unwrap();
        record
    }

    #[test]
    fn test_summary_groups_by_section() {
        let summary = render_summary(&Catalog::marketing(), &record());

        let positions: Vec<_> = Section::ALL
            .iter()
            .map(|s| summary.find(&format!("\n{}:\n", s.heading())).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(summary.contains("- Business Name: LNO Boutique\n"));
        assert!(summary.contains("- Monthly Budget: $2000\n"));
        assert!(summary.contains("- Location: Not provided\n"));
    }

    #[test]
    fn test_blank_budget_has_no_dollar_sign() {
        let catalog = Catalog::marketing();
        let summary = render_summary(&catalog, &BusinessRecord::empty(&catalog));
        assert!(summary.contains("- Monthly Budget: Not provided\n"));
    }

    #[test]
    fn test_strategy_report_sections_in_order() {
        let report = render_strategy_report(&StrategyResult::fallback(&record()));

        let headings = [
            "1. Business Analysis:",
            "2. Target Audience:",
            "3. Channel Strategy:",
            "4. Campaign Structure:",
            "5. Budget & Timeline:",
            "6. Measurement & Optimization:",
            "7. Implementation Plan:",
            "8. Risk Assessment:",
            "Success Criteria:",
        ];
        let positions: Vec<_> = headings.iter().map(|h| report.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(report.contains(
            "Market Positioning: Positioning LNO Boutique as a premium Health & Wellness provider..."
        ));
        assert!(report.contains("- Google Ads: 400 (40%)\n"));
        assert!(report.contains("- Conversion Rate: 3% (Weekly)\n"));
        assert!(report.contains("Mitigation: Focus on high-ROI channels\n"));
    }
}
