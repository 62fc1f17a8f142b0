//! Training event entity and registration accounting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Approval state of a scheduled training session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Pending,
    Approved,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "Pending",
            EventStatus::Approved => "Approved",
            EventStatus::Cancelled => "Cancelled",
        }
    }
}

/// One attendee on a training event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registrant {
    pub id: String,
    pub name: String,
    pub email: String,
    pub date_registered: DateTime<Utc>,
}

/// A schedulable professional-development session
///
/// `date` and `time` are free-form display strings. Registration is
/// monotonic: there is no unregister path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingEvent {
    pub id: String,
    pub title: String,
    pub topic: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub capacity: u32,
    pub registered: u32,
    #[serde(default)]
    pub registrants: Vec<Registrant>,
    pub status: EventStatus,
}

impl TrainingEvent {
    /// Remaining seats
    pub fn spots_left(&self) -> u32 {
        self.capacity.saturating_sub(self.registered)
    }

    /// Register an attendee.
    ///
    /// Rejects duplicates (same email) and registration at capacity. After a
    /// successful call `registered == registrants.len()` and
    /// `registered <= capacity` both hold.
    pub fn register(&mut self, registrant: Registrant) -> Result<()> {
        if self.status == EventStatus::Cancelled {
            return Err(Error::InvalidInput("Event has been cancelled".to_string()));
        }
        if self
            .registrants
            .iter()
            .any(|r| r.email.eq_ignore_ascii_case(&registrant.email))
        {
            return Err(Error::InvalidInput(
                "Already registered for this event".to_string(),
            ));
        }
        if self.registered >= self.capacity {
            return Err(Error::InvalidInput("Event is full".to_string()));
        }
        self.registrants.push(registrant);
        self.registered += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(capacity: u32) -> TrainingEvent {
        TrainingEvent {
            id: "evt-1".to_string(),
            title: "Differentiated Instruction Workshop".to_string(),
            topic: "Instruction".to_string(),
            event_type: "Workshop".to_string(),
            date: "Feb 15, 2026".to_string(),
            time: "09:00 AM".to_string(),
            location: "EJPN Campus".to_string(),
            capacity,
            registered: 0,
            registrants: vec![],
            status: EventStatus::Approved,
        }
    }

    fn registrant(n: u32) -> Registrant {
        Registrant {
            id: format!("u-{}", n),
            name: format!("Teacher {}", n),
            email: format!("teacher{}@school.example", n),
            date_registered: Utc::now(),
        }
    }

    #[test]
    fn test_registration_accounting() {
        let mut evt = event(5);
        for n in 0..3 {
            evt.register(registrant(n)).unwrap();
        }
        assert_eq!(evt.registered, 3);
        assert_eq!(evt.registrants.len(), 3);
        assert_eq!(evt.spots_left(), 2);
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let mut evt = event(5);
        evt.register(registrant(1)).unwrap();

        let mut dup = registrant(1);
        dup.email = "TEACHER1@school.example".to_string();
        let err = evt.register(dup).unwrap_err();
        assert!(err.to_string().contains("Already registered"));
        assert_eq!(evt.registered, 1);
        assert_eq!(evt.registrants.len(), 1);
    }

    #[test]
    fn test_register_rejects_at_capacity() {
        let mut evt = event(2);
        evt.register(registrant(1)).unwrap();
        evt.register(registrant(2)).unwrap();

        let err = evt.register(registrant(3)).unwrap_err();
        assert!(err.to_string().contains("Event is full"));
        assert_eq!(evt.registered, 2);
        assert_eq!(evt.registrants.len(), 2);
    }

    #[test]
    fn test_register_rejects_cancelled_event() {
        let mut evt = event(5);
        evt.status = EventStatus::Cancelled;
        assert!(evt.register(registrant(1)).is_err());
        assert_eq!(evt.registered, 0);
    }

    #[test]
    fn test_event_type_field_serializes_as_type() {
        let evt = event(10);
        let json = serde_json::to_string(&evt).unwrap();
        assert!(json.contains("\"type\":\"Workshop\""));
        assert!(json.contains("\"status\":\"Approved\""));
    }

    #[test]
    fn test_tolerates_legacy_records_without_registrants() {
        // older stored records carry counts but no registrant list
        let json = r#"{
            "id": "evt-9",
            "title": "Assessment Design",
            "topic": "Assessment",
            "type": "Seminar",
            "date": "Mar 02, 2026",
            "time": "02:00 PM",
            "location": "CMR NPS",
            "capacity": 40,
            "registered": 12,
            "status": "Pending",
            "spotsLeft": 28
        }"#;
        let evt: TrainingEvent = serde_json::from_str(json).unwrap();
        assert_eq!(evt.registered, 12);
        assert!(evt.registrants.is_empty());
        assert_eq!(evt.spots_left(), 28);
        assert_eq!(evt.status, EventStatus::Pending);
    }
}
