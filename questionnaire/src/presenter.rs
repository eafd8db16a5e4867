//! Strategy section presenters.
//!
//! Each presenter turns one facet of a [`StrategyResult`] into text. The
//! same ordered list drives the step-by-step walkthrough and the
//! random-access side panel. Rendering is pure: the same strategy always
//! yields the same text.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::strategy::StrategyResult;

/// Identifies one strategy section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    MarketPositioning,
    SwotAnalysis,
    AudiencePersonas,
    CustomerJourney,
    ChannelStrategy,
    CampaignStructure,
    BudgetBreakdown,
    Timeline,
    Kpis,
    OptimizationSchedule,
    NextSteps,
    Risks,
    SuccessCriteria,
}

impl SectionKey {
    /// Key as it appears in the strategy JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarketPositioning => "marketPositioning",
            Self::SwotAnalysis => "swotAnalysis",
            Self::AudiencePersonas => "audiencePersonas",
            Self::CustomerJourney => "customerJourney",
            Self::ChannelStrategy => "channelStrategy",
            Self::CampaignStructure => "campaignStructure",
            Self::BudgetBreakdown => "budgetBreakdown",
            Self::Timeline => "timeline",
            Self::Kpis => "kpis",
            Self::OptimizationSchedule => "optimizationSchedule",
            Self::NextSteps => "nextSteps",
            Self::Risks => "risks",
            Self::SuccessCriteria => "successCriteria",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised section name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown strategy section: {0}")]
pub struct UnknownSection(pub String);

impl FromStr for SectionKey {
    type Err = UnknownSection;

    /// Accepts the JSON key or the presenter label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PRESENTERS
            .iter()
            .find(|p| {
                p.key.as_str().eq_ignore_ascii_case(wanted) || p.label.eq_ignore_ascii_case(wanted)
            })
            .map(|p| p.key)
            .ok_or_else(|| UnknownSection(wanted.to_string()))
    }
}

/// Renders one strategy section.
pub struct SectionPresenter {
    /// Section identifier
    pub key: SectionKey,
    /// Human-readable title
    pub label: &'static str,
    render: fn(&StrategyResult) -> String,
    detail: fn(&StrategyResult) -> Vec<String>,
}

impl SectionPresenter {
    /// Walkthrough message for this section.
    pub fn render(&self, strategy: &StrategyResult) -> String {
        (self.render)(strategy)
    }

    /// Bullet lines shown when the section is expanded in the panel.
    pub fn detail(&self, strategy: &StrategyResult) -> Vec<String> {
        (self.detail)(strategy)
    }
}

impl fmt::Debug for SectionPresenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionPresenter")
            .field("key", &self.key)
            .field("label", &self.label)
            .finish()
    }
}

/// All presenters in walkthrough order.
pub fn presenters() -> &'static [SectionPresenter] {
    &PRESENTERS
}

/// Presenter for a section.
pub fn presenter(key: SectionKey) -> &'static SectionPresenter {
    // PRESENTERS holds one entry per key, in declaration order.
    &PRESENTERS[key as usize]
}

static PRESENTERS: [SectionPresenter; 13] = [
    SectionPresenter {
        key: SectionKey::MarketPositioning,
        label: "Market Positioning",
        render: render_positioning,
        detail: |s| vec![s.market_positioning.clone()],
    },
    SectionPresenter {
        key: SectionKey::SwotAnalysis,
        label: "SWOT Analysis",
        render: render_swot,
        detail: |s| {
            vec![
                format!("Strengths: {}", s.swot_analysis.strengths.join(", ")),
                format!("Weaknesses: {}", s.swot_analysis.weaknesses.join(", ")),
                format!("Opportunities: {}", s.swot_analysis.opportunities.join(", ")),
                format!("Threats: {}", s.swot_analysis.threats.join(", ")),
            ]
        },
    },
    SectionPresenter {
        key: SectionKey::AudiencePersonas,
        label: "Audience Personas",
        render: |s| {
            format!(
                "Audience Personas: {}\n\nPersonas represent your ideal customers. \
                 Understanding them helps tailor your marketing.",
                s.audience_personas.join("; ")
            )
        },
        detail: |s| s.audience_personas.clone(),
    },
    SectionPresenter {
        key: SectionKey::CustomerJourney,
        label: "Customer Journey",
        render: |s| {
            format!(
                "Customer Journey: {}\n\nThis maps out how a customer discovers, \
                 considers, and books your services.",
                s.customer_journey.join(" → ")
            )
        },
        detail: |s| s.customer_journey.clone(),
    },
    SectionPresenter {
        key: SectionKey::ChannelStrategy,
        label: "Channel Strategy",
        render: |s| {
            format!(
                "Channel Strategy:\n{}\n\nThis section explains which marketing channels \
                 to use, their goals, and how to measure success.",
                channel_lines(s).join("\n")
            )
        },
        detail: channel_lines,
    },
    SectionPresenter {
        key: SectionKey::CampaignStructure,
        label: "Campaign Structure",
        render: |s| {
            format!(
                "Campaign Structure:\n{}\n\nThis details how your campaigns are organized \
                 and what messages to use.",
                campaign_lines(s).join("\n")
            )
        },
        detail: campaign_lines,
    },
    SectionPresenter {
        key: SectionKey::BudgetBreakdown,
        label: "Budget Breakdown",
        render: |s| {
            format!(
                "Budget Breakdown:\n{}\n\nThis shows how your budget is allocated across channels.",
                budget_lines(s).join("\n")
            )
        },
        detail: budget_lines,
    },
    SectionPresenter {
        key: SectionKey::Timeline,
        label: "Timeline",
        render: |s| {
            format!(
                "Timeline:\n{}\n\nThis is your implementation schedule with key milestones.",
                timeline_lines(s).join("\n")
            )
        },
        detail: timeline_lines,
    },
    SectionPresenter {
        key: SectionKey::Kpis,
        label: "KPIs",
        render: |s| {
            format!(
                "KPIs:\n{}\n\nKPIs (Key Performance Indicators) help you track progress \
                 toward your goals.",
                kpi_lines(s).join("\n")
            )
        },
        detail: kpi_lines,
    },
    SectionPresenter {
        key: SectionKey::OptimizationSchedule,
        label: "Optimization Schedule",
        render: |s| {
            format!(
                "Optimization Schedule:\n{}\n\nThis is how often you should review and \
                 optimize your campaigns.",
                s.optimization_schedule.join(", ")
            )
        },
        detail: |s| s.optimization_schedule.clone(),
    },
    SectionPresenter {
        key: SectionKey::NextSteps,
        label: "Next Steps",
        render: |s| {
            format!(
                "Next Steps:\n{}\n\nThese are your immediate action items to get started.",
                next_step_lines(s).join("\n")
            )
        },
        detail: next_step_lines,
    },
    SectionPresenter {
        key: SectionKey::Risks,
        label: "Risks",
        render: |s| {
            format!(
                "Risks:\n{}\n\nBe aware of these risks and how to address them.",
                risk_lines(s).join("\n")
            )
        },
        detail: risk_lines,
    },
    SectionPresenter {
        key: SectionKey::SuccessCriteria,
        label: "Success Criteria",
        render: |s| {
            format!(
                "Success Criteria:\n{}\n\nThese are the metrics that define success for \
                 your marketing efforts.",
                s.success_criteria.join(", ")
            )
        },
        detail: |s| s.success_criteria.clone(),
    },
];

fn render_positioning(s: &StrategyResult) -> String {
    format!(
        "Market Positioning: {}\n\nThis describes how your business is positioned in the \
         market and what makes it unique.",
        s.market_positioning
    )
}

fn render_swot(s: &StrategyResult) -> String {
    let swot = &s.swot_analysis;
    format!(
        "SWOT Analysis:\nStrengths: {}\nWeaknesses: {}\nOpportunities: {}\nThreats: {}\n\n\
         A SWOT analysis helps you understand your business's internal strengths and \
         weaknesses, as well as external opportunities and threats.",
        swot.strengths.join(", "),
        swot.weaknesses.join(", "),
        swot.opportunities.join(", "),
        swot.threats.join(", "),
    )
}

fn channel_lines(s: &StrategyResult) -> Vec<String> {
    s.channel_strategy
        .iter()
        .map(|c| {
            format!(
                "{}: {}, Budget: {}, KPIs: {}",
                c.channel,
                c.goal,
                c.budget_allocation,
                c.kpis.join(", ")
            )
        })
        .collect()
}

fn campaign_lines(s: &StrategyResult) -> Vec<String> {
    s.campaign_structure
        .iter()
        .map(|c| {
            format!(
                "{} targeting {}, Keywords: {}, Ad Copy: {}",
                c.campaign_type,
                c.targeting,
                c.keywords.join(", "),
                c.ad_copy_recommendations.join("; ")
            )
        })
        .collect()
}

fn budget_lines(s: &StrategyResult) -> Vec<String> {
    s.budget_breakdown
        .iter()
        .map(|b| format!("{}: ${} ({})", b.channel, b.amount, b.percentage))
        .collect()
}

fn timeline_lines(s: &StrategyResult) -> Vec<String> {
    s.timeline
        .iter()
        .map(|t| format!("{} ({}): {}", t.phase, t.duration, t.milestones.join(", ")))
        .collect()
}

fn kpi_lines(s: &StrategyResult) -> Vec<String> {
    s.kpis
        .iter()
        .map(|k| format!("{}: {} ({})", k.metric, k.target, k.frequency))
        .collect()
}

fn next_step_lines(s: &StrategyResult) -> Vec<String> {
    s.next_steps
        .iter()
        .map(|n| {
            format!(
                "{} (Priority: {}, Timeline: {}, Dependencies: {})",
                n.step,
                n.priority,
                n.timeline,
                n.dependencies.join(", ")
            )
        })
        .collect()
}

fn risk_lines(s: &StrategyResult) -> Vec<String> {
    s.risks
        .iter()
        .map(|r| format!("{} (Impact: {}, Mitigation: {})", r.risk, r.impact, r.mitigation))
        .collect()
}

/// Open/closed state of the side panel, one flag per section.
///
/// Independent of the walkthrough step: a section can be expanded before
/// the walkthrough reaches it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    open: BTreeMap<SectionKey, bool>,
}

impl Panel {
    /// Create a panel with every section closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one section and return its new state.
    pub fn toggle(&mut self, key: SectionKey) -> bool {
        let flag = self.open.entry(key).or_insert(false);
        *flag = !*flag;
        *flag
    }

    /// Whether a section is expanded.
    pub fn is_open(&self, key: SectionKey) -> bool {
        self.open.get(&key).copied().unwrap_or(false)
    }

    /// Expanded sections in walkthrough order.
    pub fn open_sections(&self) -> Vec<SectionKey> {
        self.open
            .iter()
            .filter(|(_, open)| **open)
            .map(|(key, _)| *key)
            .collect()
    }

    /// Collapse everything.
    pub fn close_all(&mut self) {
        self.open.clear();
    }
}
