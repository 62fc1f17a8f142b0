//! Externally-submitted learning evidence records
//!
//! The submission form itself lives outside this engine; the records flow
//! through the same store and propagation machinery as the other collections.

use serde::{Deserialize, Serialize};

/// A self-reported course/certification evidence record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceSubmission {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub course_title: String,
    pub platform: String,
    /// Free-text platform name, only present when `platform` is "Other"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_other: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
    /// Required when no certificate is attached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
    pub status: String,
    pub submitted_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let record = EvidenceSubmission {
            id: "ev-1".to_string(),
            user_id: "u-7".to_string(),
            user_name: "Emily Johnson".to_string(),
            course_title: "Assessment Literacy".to_string(),
            platform: "Coursera".to_string(),
            platform_other: None,
            certificate_url: Some("https://cdn.example/cert-1.pdf".to_string()),
            reflection: None,
            status: "Pending".to_string(),
            submitted_at: "2026-02-11".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"userId\":\"u-7\""));
        assert!(json.contains("\"courseTitle\":"));
        assert!(json.contains("\"certificateUrl\":"));
        assert!(!json.contains("\"platformOther\""));
    }
}
