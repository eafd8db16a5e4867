//! Question catalog.
//!
//! The catalog is the fixed, ordered list of fields the advisor asks about.
//! Its order defines both the question sequence and the edit-form layout.

use std::collections::HashSet;

use serde::Serialize;

/// Semantic grouping used by the summary checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Name, industry, description, location
    Identity,
    /// Who the business sells to
    Audience,
    /// Competitors and differentiation
    Competition,
    /// Goals, timeline, success metrics
    Goals,
    /// Monthly spend and allocation
    Budget,
    /// Channels and results so far
    CurrentMarketing,
}

impl Section {
    /// All sections in summary order.
    pub const ALL: [Section; 6] = [
        Self::Identity,
        Self::Audience,
        Self::Competition,
        Self::Goals,
        Self::Budget,
        Self::CurrentMarketing,
    ];

    /// Heading printed above the section in summaries.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Identity => "Business Identity",
            Self::Audience => "Target Audience",
            Self::Competition => "Competitive Analysis",
            Self::Goals => "Business Goals",
            Self::Budget => "Budget",
            Self::CurrentMarketing => "Current Marketing",
        }
    }
}

/// How a field is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single line of free text
    ShortText,
    /// Multi-line free text
    LongText,
    /// One of a fixed list of options (the empty option means "not set")
    Choice(&'static [&'static str]),
    /// A number, stored as its textual form
    Numeric,
}

impl FieldKind {
    /// Options offered for a choice field; empty for every other kind.
    pub fn choices(&self) -> &'static [&'static str] {
        match self {
            Self::Choice(options) => options,
            _ => &[],
        }
    }

    /// Whether `raw` is an acceptable answer for this kind.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            Self::Numeric => is_numeric(raw),
            _ => true,
        }
    }
}

/// Numeric check used for [`FieldKind::Numeric`].
///
/// Surrounding whitespace is ignored and a blank answer counts as zero.
/// Anything else must parse as a finite decimal number: `Infinity` and hex
/// literals such as `0x10` are rejected.
pub fn is_numeric(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty()
        || trimmed
            .parse::<f64>()
            .map(|n| n.is_finite())
            .unwrap_or(false)
}

/// One question in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Record key (camelCase, matches the upstream JSON)
    pub key: &'static str,
    /// Short label for summaries and the edit form
    pub label: &'static str,
    /// Question shown to the user
    pub prompt: &'static str,
    /// Input kind
    pub kind: FieldKind,
    /// Summary grouping
    pub section: Section,
}

impl FieldDescriptor {
    /// Create a short-text field.
    pub const fn new(
        key: &'static str,
        label: &'static str,
        prompt: &'static str,
        section: Section,
    ) -> Self {
        Self {
            key,
            label,
            prompt,
            kind: FieldKind::ShortText,
            section,
        }
    }

    /// Set the input kind.
    pub const fn with_kind(self, kind: FieldKind) -> Self {
        Self { kind, ..self }
    }
}

/// Errors raised while assembling a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A catalog needs at least one question
    #[error("Catalog has no fields")]
    Empty,

    /// Keys identify record entries and must be unique
    #[error("Duplicate field key: {0}")]
    DuplicateKey(&'static str),
}

/// Ordered, immutable list of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    fields: Vec<FieldDescriptor>,
}

impl Catalog {
    /// Build a catalog from an ordered list of fields.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, CatalogError> {
        if fields.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.key) {
                return Err(CatalogError::DuplicateKey(field.key));
            }
        }

        Ok(Self { fields })
    }

    /// The business-marketing questionnaire.
    pub fn marketing() -> Self {
        Self {
            fields: MARKETING_FIELDS.to_vec(),
        }
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at a position in question order.
    pub fn get(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    /// Field by key.
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Position of a key in question order.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    /// Iterate fields in question order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    /// Fields belonging to one summary section, in question order.
    pub fn in_section(&self, section: Section) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(move |f| f.section == section)
    }
}

const INDUSTRIES: &[&str] = &[
    "",
    "Retail",
    "Health & Wellness",
    "Professional Services",
    "Food & Beverage",
    "Education",
    "Technology",
    "Other",
];

const AGE_RANGES: &[&str] = &["", "18-24", "25-34", "35-44", "45-54", "55-64", "65+"];

const INCOME_LEVELS: &[&str] = &[
    "",
    "Under $50k",
    "$50k-$100k",
    "$100k-$150k",
    "$150k-$200k",
    "Over $200k",
];

const ALLOCATIONS: &[&str] = &[
    "",
    "Mostly Google Ads",
    "Mostly Social Media",
    "Even Split",
    "Other",
];

const MARKETING_FIELDS: [FieldDescriptor; 19] = [
    FieldDescriptor::new(
        "name",
        "Business Name",
        "What is your business name?",
        Section::Identity,
    ),
    FieldDescriptor::new(
        "industry",
        "Industry",
        "What industry is your business in?",
        Section::Identity,
    )
    .with_kind(FieldKind::Choice(INDUSTRIES)),
    FieldDescriptor::new(
        "description",
        "Description",
        "Please provide a brief description of your business:",
        Section::Identity,
    )
    .with_kind(FieldKind::LongText),
    FieldDescriptor::new(
        "location",
        "Location",
        "Where is your business located?",
        Section::Identity,
    ),
    FieldDescriptor::new(
        "targetAudience",
        "Audience",
        "Who is your target audience?",
        Section::Audience,
    ),
    FieldDescriptor::new(
        "audienceAgeRange",
        "Age Range",
        "What is the age range of your target audience?",
        Section::Audience,
    )
    .with_kind(FieldKind::Choice(AGE_RANGES)),
    FieldDescriptor::new(
        "audienceIncomeLevel",
        "Income Level",
        "What is the income level of your target audience?",
        Section::Audience,
    )
    .with_kind(FieldKind::Choice(INCOME_LEVELS)),
    FieldDescriptor::new(
        "audiencePainPoints",
        "Pain Points",
        "What are the main pain points your target audience faces?",
        Section::Audience,
    )
    .with_kind(FieldKind::LongText),
    FieldDescriptor::new(
        "competitors",
        "Competitors",
        "Who are your main competitors?",
        Section::Competition,
    ),
    FieldDescriptor::new(
        "uniqueValueProposition",
        "Unique Value Proposition",
        "What is your unique value proposition?",
        Section::Competition,
    )
    .with_kind(FieldKind::LongText),
    FieldDescriptor::new(
        "keyDifferentiators",
        "Key Differentiators",
        "What are your key differentiators from competitors?",
        Section::Competition,
    )
    .with_kind(FieldKind::LongText),
    FieldDescriptor::new(
        "goals",
        "Goals",
        "What are your business goals?",
        Section::Goals,
    )
    .with_kind(FieldKind::LongText),
    FieldDescriptor::new(
        "timeline",
        "Timeline",
        "What is your timeline for achieving these goals?",
        Section::Goals,
    ),
    FieldDescriptor::new(
        "successMetrics",
        "Success Metrics",
        "How will you measure success?",
        Section::Goals,
    ),
    FieldDescriptor::new(
        "budget",
        "Monthly Budget",
        "What is your monthly ad budget?",
        Section::Budget,
    )
    .with_kind(FieldKind::Numeric),
    FieldDescriptor::new(
        "budgetAllocation",
        "Budget Allocation",
        "How would you like to allocate this budget across channels?",
        Section::Budget,
    )
    .with_kind(FieldKind::Choice(ALLOCATIONS)),
    FieldDescriptor::new(
        "currentChannels",
        "Channels",
        "What marketing channels are you currently using?",
        Section::CurrentMarketing,
    ),
    FieldDescriptor::new(
        "currentResults",
        "Results",
        "What results are you seeing from current marketing efforts?",
        Section::CurrentMarketing,
    )
    .with_kind(FieldKind::LongText),
    FieldDescriptor::new(
        "marketingChallenges",
        "Challenges",
        "What are your main marketing challenges?",
        Section::CurrentMarketing,
    )
    .with_kind(FieldKind::LongText),
];
