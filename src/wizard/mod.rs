//! Observation wizard state machine
//!
//! Six fixed steps walked in order, each gated by its own validation:
//! Identity → Classroom → Rubric → Tools → Feedback → MetaTags, with a
//! terminal submit off the final step. Backward transitions are always
//! permitted. Submit scores the rubric payload and hands the finished
//! [`Observation`] to the caller; persistence belongs to the owning
//! dashboard context, never to the wizard.

mod draft;

pub use draft::{toggle_selection, ObservationDraft};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Classroom, Observation};
use crate::rubric::{self, catalog};
use crate::{Error, Result};

/// Wizard steps, in walk order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WizardStep {
    Identity,
    Classroom,
    Rubric,
    Tools,
    Feedback,
    MetaTags,
}

impl WizardStep {
    /// All steps in walk order
    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::Identity,
            WizardStep::Classroom,
            WizardStep::Rubric,
            WizardStep::Tools,
            WizardStep::Feedback,
            WizardStep::MetaTags,
        ]
    }

    /// 1-based position for "Step N of 6" headers
    pub fn number(&self) -> usize {
        match self {
            WizardStep::Identity => 1,
            WizardStep::Classroom => 2,
            WizardStep::Rubric => 3,
            WizardStep::Tools => 4,
            WizardStep::Feedback => 5,
            WizardStep::MetaTags => 6,
        }
    }

    /// Display title
    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Identity => "Teacher Details",
            WizardStep::Classroom => "Classroom Details",
            WizardStep::Rubric => "Danielson Ratings",
            WizardStep::Tools => "Routines & Tools",
            WizardStep::Feedback => "Feedback",
            WizardStep::MetaTags => "Meta Tags",
        }
    }

    /// Following step, None at the end
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Identity => Some(WizardStep::Classroom),
            WizardStep::Classroom => Some(WizardStep::Rubric),
            WizardStep::Rubric => Some(WizardStep::Tools),
            WizardStep::Tools => Some(WizardStep::Feedback),
            WizardStep::Feedback => Some(WizardStep::MetaTags),
            WizardStep::MetaTags => None,
        }
    }

    /// Preceding step, None at the start
    pub fn prev(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Identity => None,
            WizardStep::Classroom => Some(WizardStep::Identity),
            WizardStep::Rubric => Some(WizardStep::Classroom),
            WizardStep::Tools => Some(WizardStep::Rubric),
            WizardStep::Feedback => Some(WizardStep::Tools),
            WizardStep::MetaTags => Some(WizardStep::Feedback),
        }
    }

    pub fn is_first(&self) -> bool {
        matches!(self, WizardStep::Identity)
    }

    pub fn is_last(&self) -> bool {
        matches!(self, WizardStep::MetaTags)
    }
}

/// The observation wizard: a draft plus the step the observer is on
#[derive(Debug, Clone)]
pub struct ObservationWizard {
    draft: ObservationDraft,
    step: WizardStep,
}

impl ObservationWizard {
    /// Fresh wizard at step 1 with a starter draft
    pub fn new() -> Self {
        Self::from_draft(ObservationDraft::default())
    }

    /// Wizard over an existing draft (edit flows), starting back at step 1
    pub fn from_draft(draft: ObservationDraft) -> Self {
        Self {
            draft,
            step: WizardStep::Identity,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ObservationDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ObservationDraft {
        &mut self.draft
    }

    /// Validate one step of the draft.
    ///
    /// Failures carry a single human-readable message; there is no
    /// field-level granularity.
    pub fn validate(&self, step: WizardStep) -> Result<()> {
        let d = &self.draft;
        match step {
            WizardStep::Identity => {
                if d.teacher.trim().is_empty()
                    || d.teacher_email.trim().is_empty()
                    || d.campus.trim().is_empty()
                {
                    return Err(Error::Validation(
                        "Please fill in all required teacher details".to_string(),
                    ));
                }
            }
            WizardStep::Classroom => {
                if d.block.trim().is_empty()
                    || d.grade.trim().is_empty()
                    || d.learning_area.trim().is_empty()
                {
                    return Err(Error::Validation(
                        "Please fill in all required classroom details".to_string(),
                    ));
                }
            }
            WizardStep::Rubric => {
                // Fixed rule: every domain needs evidence, rated or not
                if d.domains.iter().any(|dom| dom.evidence.trim().is_empty()) {
                    return Err(Error::Validation(
                        "Please provide evidence for every rated domain".to_string(),
                    ));
                }
            }
            WizardStep::Tools => {
                // Nothing required on the routines & tools step
            }
            WizardStep::Feedback => {
                if d.discussion_met.is_none()
                    || d.notes.trim().is_empty()
                    || d.action_step.trim().is_empty()
                {
                    return Err(Error::Validation(
                        "Please complete feedback and action steps".to_string(),
                    ));
                }
            }
            WizardStep::MetaTags => {
                if d.meta_tags.is_empty() {
                    return Err(Error::Validation(
                        "Please select at least one Meta Tag for improvement".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Advance to the next step, gated on the current step's validation.
    ///
    /// The step does not change when validation fails.
    pub fn advance(&mut self) -> Result<WizardStep> {
        self.validate(self.step)?;
        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(next)
            }
            None => Err(Error::InvalidInput(
                "Already at the final step".to_string(),
            )),
        }
    }

    /// Step backward. Always permitted, never validated; at the first step
    /// this is a no-op.
    pub fn back(&mut self) -> WizardStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Terminal transition: validate everything, score the rubric payload,
    /// and hand back the finished observation.
    ///
    /// Only permitted from the final step. The wizard never persists; the
    /// caller owns the write.
    pub fn submit(self) -> Result<Observation> {
        if !self.step.is_last() {
            return Err(Error::Validation(format!(
                "Cannot submit from step {} of {}",
                self.step.number(),
                WizardStep::all().len()
            )));
        }
        for step in WizardStep::all() {
            self.validate(*step)?;
        }

        let d = self.draft;
        let score = rubric::score_domains(&d.domains);
        let domain_tag = d
            .meta_tags
            .first()
            .cloned()
            .unwrap_or_else(|| catalog::DEFAULT_DOMAIN_TAG.to_string());
        let id = Uuid::new_v4().to_string();

        tracing::info!(
            observation_id = %id,
            teacher = %d.teacher,
            score,
            "Observation wizard submitted"
        );

        Ok(Observation {
            id,
            teacher: d.teacher,
            teacher_id: d.teacher_id,
            teacher_email: Some(d.teacher_email),
            observer: d.observer,
            observer_role: d.observer_role,
            campus: d.campus,
            date: d.date,
            classroom: Classroom {
                block: d.block,
                grade: d.grade,
                section: if d.section.trim().is_empty() {
                    None
                } else {
                    Some(d.section)
                },
                learning_area: d.learning_area,
            },
            domains: d.domains,
            score,
            domain: domain_tag,
            routines: d.routines,
            culture_tools: d.culture_tools,
            instructional_tools: d.instructional_tools,
            learning_area_tools: d.learning_area_tools,
            discussion_met: d.discussion_met.unwrap_or(false),
            notes: d.notes,
            action_step: d.action_step,
            meta_tags: d.meta_tags,
            has_reflection: false,
            reflection: None,
            teacher_reflection: None,
            detailed_reflection: None,
        })
    }
}

impl Default for ObservationWizard {
    fn default() -> Self {
        Self::new()
    }
}
