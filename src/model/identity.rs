//! Viewer identity and owner-key matching
//!
//! Every place the engine asks "does this record belong to this viewer" goes
//! through [`OwnerRef`], so the precedence order lives in exactly one spot.

use serde::{Deserialize, Serialize};

/// Dashboard role of the current viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Leader,
    Teacher,
    Management,
    SuperAdmin,
}

/// The authenticated viewer a dashboard context renders for
///
/// Supplied by the embedding application; the engine never issues sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Viewer {
    /// Owner reference for identity matching
    pub fn owner_ref(&self) -> OwnerRef<'_> {
        OwnerRef::new(
            Some(self.id.as_str()),
            Some(self.email.as_str()),
            Some(self.name.as_str()),
        )
    }

    /// Logical push room for this viewer: user id, falling back to the
    /// display name when no id is present.
    pub fn room_key(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }
}

/// Borrowed owner identity with the fields a record may carry
///
/// Matching compares at the highest-precedence field present on **both**
/// sides: id first, then email (case-insensitive), then display name
/// (case-insensitive). When a field is present on both sides it decides the
/// match outright; lower-precedence fields are not consulted. Records sharing
/// no field cannot match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnerRef<'a> {
    id: Option<&'a str>,
    email: Option<&'a str>,
    name: Option<&'a str>,
}

impl<'a> OwnerRef<'a> {
    /// Build a reference; empty strings are treated as absent.
    pub fn new(id: Option<&'a str>, email: Option<&'a str>, name: Option<&'a str>) -> Self {
        Self {
            id: non_empty(id),
            email: non_empty(email),
            name: non_empty(name),
        }
    }

    pub fn id(&self) -> Option<&'a str> {
        self.id
    }

    pub fn email(&self) -> Option<&'a str> {
        self.email
    }

    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    /// True when the two references denote the same owner under the
    /// id > email > name precedence order.
    pub fn matches(&self, other: &OwnerRef<'_>) -> bool {
        if let (Some(a), Some(b)) = (self.id, other.id) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (self.email, other.email) {
            return a.eq_ignore_ascii_case(b);
        }
        if let (Some(a), Some(b)) = (self.name, other.name) {
            return a.eq_ignore_ascii_case(b);
        }
        false
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_match_decides() {
        let a = OwnerRef::new(Some("t-1"), Some("a@x.example"), Some("A"));
        let b = OwnerRef::new(Some("t-1"), Some("b@x.example"), Some("B"));
        assert!(a.matches(&b));
    }

    #[test]
    fn test_id_mismatch_blocks_email_fallback() {
        // both sides carry ids, so the ids decide even though emails agree
        let a = OwnerRef::new(Some("t-1"), Some("same@x.example"), None);
        let b = OwnerRef::new(Some("t-2"), Some("same@x.example"), None);
        assert!(!a.matches(&b));
    }

    #[test]
    fn test_email_fallback_when_id_missing() {
        let a = OwnerRef::new(None, Some("Emily@School.example"), Some("Other"));
        let b = OwnerRef::new(Some("t-9"), Some("emily@school.example"), Some("Emily"));
        assert!(a.matches(&b));
    }

    #[test]
    fn test_name_fallback_last() {
        let a = OwnerRef::new(None, None, Some("emily johnson"));
        let b = OwnerRef::new(Some("t-9"), Some("e@x.example"), Some("Emily Johnson"));
        assert!(a.matches(&b));
    }

    #[test]
    fn test_no_overlapping_field_never_matches() {
        let a = OwnerRef::new(Some("t-1"), None, None);
        let b = OwnerRef::new(None, Some("e@x.example"), None);
        assert!(!a.matches(&b));
    }

    #[test]
    fn test_empty_strings_treated_as_absent() {
        let a = OwnerRef::new(Some(""), None, Some("Emily Johnson"));
        let b = OwnerRef::new(Some("t-2"), None, Some("Emily Johnson"));
        assert!(a.matches(&b));
    }

    #[test]
    fn test_viewer_room_key_falls_back_to_name() {
        let mut viewer = Viewer {
            id: "u-12".to_string(),
            name: "Emily Johnson".to_string(),
            email: "emily@school.example".to_string(),
            role: Role::Teacher,
        };
        assert_eq!(viewer.room_key(), "u-12");
        viewer.id = String::new();
        assert_eq!(viewer.room_key(), "Emily Johnson");
    }

    #[test]
    fn test_role_wire_shape() {
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"SUPERADMIN\"");
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"TEACHER\"");
        let r: Role = serde_json::from_str("\"LEADER\"").unwrap();
        assert_eq!(r, Role::Leader);
    }
}
