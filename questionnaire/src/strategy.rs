//! Marketing strategy document and the source that produces it.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::record::BusinessRecord;

/// Scalar a model may send where text is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

/// Read a text field, accepting numbers and booleans as their JSON text.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
        Scalar::Flag(b) => b.to_string(),
    })
}

/// Strengths, weaknesses, opportunities and threats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwotAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

/// Plan for one marketing channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPlan {
    #[serde(deserialize_with = "text")]
    pub channel: String,
    #[serde(deserialize_with = "text")]
    pub goal: String,
    #[serde(deserialize_with = "text")]
    pub budget_allocation: String,
    pub kpis: Vec<String>,
}

/// One campaign in the campaign structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPlan {
    #[serde(deserialize_with = "text")]
    pub campaign_type: String,
    #[serde(deserialize_with = "text")]
    pub targeting: String,
    pub keywords: Vec<String>,
    pub ad_copy_recommendations: Vec<String>,
}

/// Spend on one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    #[serde(deserialize_with = "text")]
    pub channel: String,
    #[serde(deserialize_with = "text")]
    pub amount: String,
    #[serde(deserialize_with = "text")]
    pub percentage: String,
}

/// Implementation phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePhase {
    #[serde(deserialize_with = "text")]
    pub phase: String,
    #[serde(deserialize_with = "text")]
    pub duration: String,
    pub milestones: Vec<String>,
}

/// Tracked metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpi {
    #[serde(deserialize_with = "text")]
    pub metric: String,
    #[serde(deserialize_with = "text")]
    pub target: String,
    #[serde(deserialize_with = "text")]
    pub frequency: String,
}

/// Immediate action item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextStep {
    #[serde(deserialize_with = "text")]
    pub step: String,
    #[serde(deserialize_with = "text")]
    pub priority: String,
    #[serde(deserialize_with = "text")]
    pub timeline: String,
    pub dependencies: Vec<String>,
}

/// Known risk and how to handle it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    #[serde(deserialize_with = "text")]
    pub risk: String,
    #[serde(deserialize_with = "text")]
    pub impact: String,
    #[serde(deserialize_with = "text")]
    pub mitigation: String,
}

/// Structured marketing strategy.
///
/// Every section is required when parsing, so a payload missing any of
/// them is rejected rather than half-rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyResult {
    #[serde(deserialize_with = "text")]
    pub market_positioning: String,
    pub swot_analysis: SwotAnalysis,
    pub audience_personas: Vec<String>,
    pub customer_journey: Vec<String>,
    pub channel_strategy: Vec<ChannelPlan>,
    pub campaign_structure: Vec<CampaignPlan>,
    pub budget_breakdown: Vec<BudgetLine>,
    pub timeline: Vec<TimelinePhase>,
    pub kpis: Vec<Kpi>,
    pub optimization_schedule: Vec<String>,
    pub next_steps: Vec<NextStep>,
    pub risks: Vec<Risk>,
    pub success_criteria: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl StrategyResult {
    /// Parse an upstream JSON payload.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Canned strategy used whenever the model cannot be reached.
    ///
    /// Deterministic for a given record.
    pub fn fallback(record: &BusinessRecord) -> Self {
        let name = record.value("name");
        let industry = record.value("industry");
        let audience = record.value("targetAudience");

        Self {
            market_positioning: format!("Positioning {name} as a premium {industry} provider..."),
            swot_analysis: SwotAnalysis {
                strengths: strings(&["Strong unique value proposition", "Clear target audience"]),
                weaknesses: strings(&["Limited marketing budget", "New to digital marketing"]),
                opportunities: strings(&["Growing market demand", "Digital transformation"]),
                threats: strings(&["Competition from established players", "Market saturation"]),
            },
            audience_personas: vec![format!(
                "Primary: {} {} with {} income",
                record.value("audienceAgeRange"),
                audience,
                record.value("audienceIncomeLevel"),
            )],
            customer_journey: strings(&[
                "Awareness through targeted ads",
                "Consideration via content marketing",
                "Conversion through personalized offers",
            ]),
            channel_strategy: vec![ChannelPlan {
                channel: "Google Ads".to_string(),
                goal: "Lead Generation".to_string(),
                budget_allocation: "40%".to_string(),
                kpis: strings(&["Click-through rate", "Cost per lead"]),
            }],
            campaign_structure: vec![CampaignPlan {
                campaign_type: "Search".to_string(),
                targeting: audience.to_string(),
                keywords: strings(&["relevant", "industry", "terms"]),
                ad_copy_recommendations: strings(&["Focus on unique value proposition"]),
            }],
            budget_breakdown: vec![BudgetLine {
                channel: "Google Ads".to_string(),
                amount: "400".to_string(),
                percentage: "40%".to_string(),
            }],
            timeline: vec![TimelinePhase {
                phase: "Initial Setup".to_string(),
                duration: "2 weeks".to_string(),
                milestones: strings(&["Account creation", "Campaign setup"]),
            }],
            kpis: vec![Kpi {
                metric: "Conversion Rate".to_string(),
                target: "3%".to_string(),
                frequency: "Weekly".to_string(),
            }],
            optimization_schedule: strings(&[
                "Weekly budget review",
                "Bi-weekly performance analysis",
            ]),
            next_steps: vec![NextStep {
                step: "Set up Google Ads account".to_string(),
                priority: "High".to_string(),
                timeline: "Week 1".to_string(),
                dependencies: strings(&["Business verification"]),
            }],
            risks: vec![Risk {
                risk: "Budget constraints".to_string(),
                impact: "Limited reach".to_string(),
                mitigation: "Focus on high-ROI channels".to_string(),
            }],
            success_criteria: strings(&[
                "Achieve 3% conversion rate",
                "Maintain cost per lead under $50",
            ]),
        }
    }
}

/// Produces a strategy for a completed record.
///
/// Implementations must always return a complete document; upstream
/// failures are absorbed by falling back to [`StrategyResult::fallback`].
#[async_trait]
pub trait StrategySource: Send + Sync {
    /// Generate a strategy for the record.
    async fn generate(&self, record: &BusinessRecord) -> StrategyResult;
}

/// Source that never leaves the process and always returns the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedStrategy;

#[async_trait]
impl StrategySource for CannedStrategy {
    async fn generate(&self, record: &BusinessRecord) -> StrategyResult {
        StrategyResult::fallback(record)
    }
}
