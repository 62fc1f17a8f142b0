//! Observation entity and the hierarchical rubric payload it carries

use serde::{Deserialize, Serialize};

use crate::model::identity::OwnerRef;
use crate::{Error, Result};

/// Five-value ordinal rating scale applied to every indicator
///
/// Serialized as the display strings the dashboards render
/// ("Highly Effective", "Not Observed", etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Basic,
    Developing,
    Effective,
    #[serde(rename = "Highly Effective")]
    HighlyEffective,
    #[serde(rename = "Not Observed")]
    NotObserved,
}

impl Rating {
    /// Point value for scoring. "Not Observed" carries no points and is
    /// excluded from both numerator and denominator.
    pub fn points(&self) -> Option<u8> {
        match self {
            Rating::HighlyEffective => Some(4),
            Rating::Effective => Some(3),
            Rating::Developing => Some(2),
            Rating::Basic => Some(1),
            Rating::NotObserved => None,
        }
    }

    /// Display string for the rating
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Basic => "Basic",
            Rating::Developing => "Developing",
            Rating::Effective => "Effective",
            Rating::HighlyEffective => "Highly Effective",
            Rating::NotObserved => "Not Observed",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Rating {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Basic" => Ok(Rating::Basic),
            "Developing" => Ok(Rating::Developing),
            "Effective" => Ok(Rating::Effective),
            "Highly Effective" => Ok(Rating::HighlyEffective),
            "Not Observed" => Ok(Rating::NotObserved),
            other => Err(Error::InvalidInput(format!("Unknown rating: {}", other))),
        }
    }
}

/// One rated line item within a domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub name: String,
    pub rating: Rating,
}

/// A rubric domain: a titled group of indicators plus free-text evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub domain_id: String,
    pub title: String,
    pub indicators: Vec<Indicator>,
    pub evidence: String,
}

/// Classroom context captured in wizard step 2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub block: String,
    pub grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub learning_area: String,
}

/// One rated indicator inside a reflection section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionRating {
    pub indicator: String,
    pub rating: Rating,
}

/// One section of a teacher's detailed self-assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionSection {
    pub id: String,
    pub title: String,
    pub ratings: Vec<ReflectionRating>,
    pub evidence: String,
}

/// The six named sections of a detailed reflection, mirroring the rubric shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionSections {
    pub planning: ReflectionSection,
    pub classroom_environment: ReflectionSection,
    pub instruction: ReflectionSection,
    pub assessment: ReflectionSection,
    pub environment: ReflectionSection,
    pub professionalism: ReflectionSection,
}

/// Teacher self-assessment attached to an observation after the fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedReflection {
    pub teacher_name: String,
    pub teacher_email: String,
    pub submission_date: String,
    pub sections: ReflectionSections,
    pub strengths: String,
    pub improvements: String,
    pub goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// The central entity: one classroom observation
///
/// Created by the wizard on final submit; ids are client-generated and never
/// reused. `date` is a free-form display string and is never parsed or
/// validated (multiple formats coexist in stored data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: String,
    /// Display name; fallback owner matcher
    pub teacher: String,
    /// Preferred stable owner key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    /// Fallback owner matcher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_email: Option<String>,
    #[serde(default)]
    pub observer: String,
    #[serde(default)]
    pub observer_role: String,
    pub campus: String,
    pub date: String,
    pub classroom: Classroom,
    /// Full rubric payload as rated in wizard step 3
    pub domains: Vec<Domain>,
    /// Computed at submit; immutable unless the rubric payload is re-submitted
    pub score: f64,
    /// Single display tag: first selected meta-tag, or "General Instruction"
    pub domain: String,
    #[serde(default)]
    pub routines: Vec<String>,
    #[serde(default)]
    pub culture_tools: Vec<String>,
    #[serde(default)]
    pub instructional_tools: Vec<String>,
    #[serde(default)]
    pub learning_area_tools: Vec<String>,
    pub discussion_met: bool,
    pub notes: String,
    pub action_step: String,
    #[serde(default)]
    pub meta_tags: Vec<String>,
    #[serde(default)]
    pub has_reflection: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_reflection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_reflection: Option<DetailedReflection>,
}

impl Observation {
    /// Owner reference for identity matching (push filter, dashboard views)
    pub fn owner_ref(&self) -> OwnerRef<'_> {
        OwnerRef::new(
            self.teacher_id.as_deref(),
            self.teacher_email.as_deref(),
            Some(self.teacher.as_str()),
        )
    }

    /// Record the teacher's reflection acknowledgement.
    ///
    /// `has_reflection == true` always implies a non-empty reflection payload.
    pub fn attach_reflection(
        &mut self,
        text: String,
        detailed: Option<DetailedReflection>,
    ) -> Result<()> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Reflection text cannot be empty".to_string(),
            ));
        }
        self.teacher_reflection = Some(text.clone());
        self.reflection = Some(text);
        self.detailed_reflection = detailed;
        self.has_reflection = true;
        Ok(())
    }
}
