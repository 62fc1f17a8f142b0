//! Accumulated wizard form state

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::{Domain, Rating};
use crate::rubric::catalog;
use crate::{Error, Result};

/// Mutable form state the wizard accumulates across its six steps
///
/// Nothing here is persisted; abandoning the wizard mid-flight drops the
/// draft with no side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationDraft {
    // Step 1: teacher and observer identity
    pub teacher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    pub teacher_email: String,
    pub campus: String,
    pub observer: String,
    pub observer_role: String,
    /// Observation date, YYYY-MM-DD by default; free-form is tolerated
    pub date: String,

    // Step 2: classroom context
    pub block: String,
    pub grade: String,
    pub section: String,
    pub learning_area: String,

    // Step 3: rubric ratings and evidence
    pub domains: Vec<Domain>,

    // Step 4: routines and tool selections (nothing required)
    pub routines: Vec<String>,
    pub culture_tools: Vec<String>,
    pub instructional_tools: Vec<String>,
    pub learning_area_tools: Vec<String>,

    // Step 5: feedback discussion
    /// None until the observer explicitly answers; validation requires an
    /// explicit answer, not a defaulted one
    pub discussion_met: Option<bool>,
    pub notes: String,
    pub action_step: String,

    // Step 6: meta tags
    pub meta_tags: Vec<String>,
}

impl Default for ObservationDraft {
    fn default() -> Self {
        Self {
            teacher: String::new(),
            teacher_id: None,
            teacher_email: String::new(),
            campus: "CMR NPS".to_string(),
            observer: String::new(),
            observer_role: "Head of School".to_string(),
            date: Utc::now().format("%Y-%m-%d").to_string(),
            block: String::new(),
            grade: String::new(),
            section: String::new(),
            learning_area: String::new(),
            domains: catalog::starter_domains(),
            routines: Vec::new(),
            culture_tools: Vec::new(),
            instructional_tools: Vec::new(),
            learning_area_tools: Vec::new(),
            discussion_met: None,
            notes: String::new(),
            action_step: String::new(),
            meta_tags: Vec::new(),
        }
    }
}

impl ObservationDraft {
    /// Rate one indicator within a domain
    pub fn set_rating(&mut self, domain_id: &str, indicator: &str, rating: Rating) -> Result<()> {
        let domain = self.domain_mut(domain_id)?;
        let entry = domain
            .indicators
            .iter_mut()
            .find(|i| i.name == indicator)
            .ok_or_else(|| {
                Error::NotFound(format!("Indicator {} in domain {}", indicator, domain_id))
            })?;
        entry.rating = rating;
        Ok(())
    }

    /// Replace the evidence text for a domain
    pub fn set_evidence(&mut self, domain_id: &str, evidence: &str) -> Result<()> {
        let domain = self.domain_mut(domain_id)?;
        domain.evidence = evidence.to_string();
        Ok(())
    }

    fn domain_mut(&mut self, domain_id: &str) -> Result<&mut Domain> {
        self.domains
            .iter_mut()
            .find(|d| d.domain_id == domain_id)
            .ok_or_else(|| Error::NotFound(format!("Domain {}", domain_id)))
    }
}

/// Toggle an item in a multi-select list, deduplicating on add
pub fn toggle_selection(list: &mut Vec<String>, item: &str, selected: bool) {
    let exists = list.iter().any(|i| i == item);
    if selected && !exists {
        list.push(item.to_string());
    } else if !selected && exists {
        list.retain(|i| i != item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_draft_carries_starter_rubric() {
        let draft = ObservationDraft::default();
        assert_eq!(draft.domains.len(), 6);
        assert!(draft.discussion_met.is_none());
        assert_eq!(draft.campus, "CMR NPS");
        // default date is ISO-shaped
        assert_eq!(draft.date.len(), 10);
        assert_eq!(&draft.date[4..5], "-");
    }

    #[test]
    fn test_set_rating_and_evidence() {
        let mut draft = ObservationDraft::default();
        draft
            .set_rating("3B3", "Using Assessments in Instruction", Rating::Effective)
            .unwrap();
        draft.set_evidence("3B3", "Exit tickets reviewed live").unwrap();

        let domain = draft.domains.iter().find(|d| d.domain_id == "3B3").unwrap();
        assert_eq!(domain.indicators[0].rating, Rating::Effective);
        assert_eq!(domain.evidence, "Exit tickets reviewed live");
    }

    #[test]
    fn test_set_rating_unknown_domain_or_indicator() {
        let mut draft = ObservationDraft::default();
        assert!(draft.set_rating("9Z", "Anything", Rating::Basic).is_err());
        assert!(draft.set_rating("3A", "Not an indicator", Rating::Basic).is_err());
    }

    #[test]
    fn test_toggle_selection_deduplicates() {
        let mut list = Vec::new();
        toggle_selection(&mut list, "Do Now", true);
        toggle_selection(&mut list, "Do Now", true);
        assert_eq!(list, vec!["Do Now".to_string()]);

        toggle_selection(&mut list, "Exit Ticket", true);
        toggle_selection(&mut list, "Do Now", false);
        assert_eq!(list, vec!["Exit Ticket".to_string()]);

        toggle_selection(&mut list, "Cold Call", false);
        assert_eq!(list.len(), 1);
    }
}
