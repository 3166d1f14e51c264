//! Fact data model for extracted consultant memories.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Category of an extracted fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FactType {
    #[serde(alias = "DECISIONS")]
    Decision,
    #[serde(alias = "ISSUES")]
    Issue,
    #[serde(alias = "ACTIONS")]
    Action,
    ClientContext,
    ProjectContext,
    #[serde(alias = "REFERENCES")]
    Reference,
    #[serde(alias = "LEARNINGS")]
    Learning,
}

impl FactType {
    /// All categories, in prompt order.
    pub const ALL: [FactType; 7] = [
        Self::Decision,
        Self::Issue,
        Self::Action,
        Self::ClientContext,
        Self::ProjectContext,
        Self::Reference,
        Self::Learning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decision => "DECISION",
            Self::Issue => "ISSUE",
            Self::Action => "ACTION",
            Self::ClientContext => "CLIENT_CONTEXT",
            Self::ProjectContext => "PROJECT_CONTEXT",
            Self::Reference => "REFERENCE",
            Self::Learning => "LEARNING",
        }
    }

    /// What belongs in this category. Rendered into the extraction prompt.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Decision => "Key decisions made, with their rationale and alternatives",
            Self::Issue => "Problems, challenges, or questions that arise",
            Self::Action => "Tasks, commitments, or next steps agreed upon",
            Self::ClientContext => {
                "Information about the client's preferences, constraints, or requirements"
            }
            Self::ProjectContext => {
                "Background information about the project scope, timeline, or objectives"
            }
            Self::Reference => "Important documents, sources, or best practices mentioned",
            Self::Learning => "Insights or lessons that could be applied to future work",
        }
    }
}

impl fmt::Display for FactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactType {
    type Err = String;

    /// Accepts the canonical names and the plural heading spellings.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DECISION" | "DECISIONS" => Ok(Self::Decision),
            "ISSUE" | "ISSUES" => Ok(Self::Issue),
            "ACTION" | "ACTIONS" => Ok(Self::Action),
            "CLIENT_CONTEXT" => Ok(Self::ClientContext),
            "PROJECT_CONTEXT" => Ok(Self::ProjectContext),
            "REFERENCE" | "REFERENCES" => Ok(Self::Reference),
            "LEARNING" | "LEARNINGS" => Ok(Self::Learning),
            other => Err(format!("unknown fact type `{other}`")),
        }
    }
}

/// A single extracted memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Fact {
    /// The category this fact belongs to.
    #[serde(rename = "type")]
    pub fact_type: FactType,
    /// One concise declarative statement.
    pub content: String,
    /// Free-form attributes such as priority, department, or sentiment.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Extraction certainty in [0.0, 1.0].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Fact {
    pub fn new(fact_type: FactType, content: impl Into<String>) -> Self {
        Self {
            fact_type,
            content: content.into(),
            metadata: BTreeMap::new(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Check the content and confidence invariants.
    pub fn validate(&self) -> Result<(), String> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err("content is empty".into());
        }
        if content.contains(['\n', '\r']) {
            return Err("content spans multiple lines".into());
        }
        if let Some(confidence) = self.confidence
            && !(confidence.is_finite() && (0.0..=1.0).contains(&confidence))
        {
            return Err(format!("confidence {confidence} is outside [0.0, 1.0]"));
        }
        Ok(())
    }
}

impl fmt::Display for Fact {
    /// `TYPE: content`, the flat form used for terminal output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.fact_type, self.content)
    }
}

/// Ordered facts extracted from one input segment. Serializes as
/// `{"facts": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FactBatch {
    pub facts: Vec<Fact>,
}

impl FactBatch {
    pub fn new(facts: Vec<Fact>) -> Self {
        Self { facts }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fact> {
        self.facts.iter()
    }

    /// Facts of a single category, in batch order.
    pub fn of_type(&self, fact_type: FactType) -> impl Iterator<Item = &Fact> {
        self.facts
            .iter()
            .filter(move |fact| fact.fact_type == fact_type)
    }

    /// Validate every fact, reporting the first failure with its index.
    pub fn validate(&self) -> Result<(), (usize, String)> {
        self.facts
            .iter()
            .enumerate()
            .try_for_each(|(index, fact)| fact.validate().map_err(|reason| (index, reason)))
    }

    /// Serialize to the `{"facts": [...]}` wire shape.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl IntoIterator for FactBatch {
    type Item = Fact;
    type IntoIter = std::vec::IntoIter<Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.into_iter()
    }
}

impl<'a> IntoIterator for &'a FactBatch {
    type Item = &'a Fact;
    type IntoIter = std::slice::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}

impl FromIterator<Fact> for FactBatch {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
