//! Development goal entity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::identity::OwnerRef;

/// A professional-development target for one teacher
///
/// Created by a leader action or teacher self-service; mutated only by
/// progress updates. `status` is a derived display label and is re-derived on
/// every progress change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub teacher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    pub title: String,
    pub category: String,
    /// Completion percentage, 0-100
    pub progress: u8,
    /// Derived display label, see [`Goal::status_for`]
    pub status: String,
    pub due_date: String,
}

impl Goal {
    /// New goal at zero progress with a fresh client-generated id
    pub fn new(teacher: &str, title: &str, category: &str, due_date: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            teacher: teacher.to_string(),
            teacher_id: None,
            title: title.to_string(),
            category: category.to_string(),
            progress: 0,
            status: Self::status_for(0).to_string(),
            due_date: due_date.to_string(),
        }
    }

    /// Display label derived from progress
    pub fn status_for(progress: u8) -> &'static str {
        match progress {
            0 => "Not Started",
            p if p >= 100 => "Completed",
            _ => "In Progress",
        }
    }

    /// Update progress (clamped to 100) and re-derive the status label
    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
        self.status = Self::status_for(self.progress).to_string();
    }

    /// Owner reference for identity matching
    pub fn owner_ref(&self) -> OwnerRef<'_> {
        OwnerRef::new(self.teacher_id.as_deref(), None, Some(self.teacher.as_str()))
    }
}
