//! Prompt assembly for strategy generation.

use questionnaire::BusinessRecord;

use crate::backend::CompletionRequest;

/// Report groups and the strategy keys the model must fill under each.
const SECTION_GROUPS: &[(&str, &[&str])] = &[
    ("Business Analysis", &["marketPositioning", "swotAnalysis"]),
    ("Target Audience", &["audiencePersonas", "customerJourney"]),
    ("Channel Strategy", &["channelStrategy"]),
    ("Campaign Structure", &["campaignStructure"]),
    ("Budget & Timeline", &["budgetBreakdown", "timeline"]),
    ("Measurement & Optimization", &["kpis", "optimizationSchedule"]),
    ("Implementation Plan", &["nextSteps"]),
    ("Risk Assessment", &["risks", "successCriteria"]),
];

/// Assembles the strategy request.
pub struct PromptAssembler;

impl PromptAssembler {
    /// System prompt naming every section the response must contain.
    pub fn system_prompt() -> String {
        let mut prompt = String::new();

        prompt.push_str("You are a digital marketing strategist. ");
        prompt.push_str("Given the following business information, generate a comprehensive ");
        prompt.push_str("marketing strategy in JSON format with these sections: ");

        let groups: Vec<String> = SECTION_GROUPS
            .iter()
            .map(|(title, keys)| format!("{} ({})", title, keys.join(", ")))
            .collect();
        prompt.push_str(&groups.join(", "));
        prompt.push('.');

        prompt
    }

    /// User prompt carrying the record as pretty-printed JSON.
    pub fn user_prompt(record: &BusinessRecord) -> Result<String, serde_json::Error> {
        Ok(format!(
            "Business Info: {}",
            serde_json::to_string_pretty(record)?
        ))
    }

    /// Full completion request for a record.
    pub fn build_request(
        record: &BusinessRecord,
        max_tokens: u32,
        temperature: Option<f32>,
    ) -> Result<CompletionRequest, serde_json::Error> {
        let mut request = CompletionRequest::user(Self::user_prompt(record)?)
            .with_system(Self::system_prompt())
            .with_max_tokens(max_tokens)
            .with_json_output();

        if let Some(temp) = temperature {
            request = request.with_temperature(temp);
        }

        Ok(request)
    }
}
