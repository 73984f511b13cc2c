// LeadDesk - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// store dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// =============================================================================
// Request status
// =============================================================================

/// Processing status of an inbound request.
///
/// Every request starts as `New`. The back office moves it to one of the
/// terminal states; the store deliberately permits re-assignment between
/// terminal states (an operator may correct a mis-click), so no transition
/// table is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Freshly created, not yet handled.
    #[default]
    New,
    /// Accepted and handed over for fulfilment.
    Accepted,
    /// Declined by the back office.
    Rejected,
    /// The customer could not be reached by phone.
    NoAnswer,
}

impl RequestStatus {
    /// Returns all variants in display order.
    pub fn all() -> &'static [RequestStatus] {
        &[
            RequestStatus::New,
            RequestStatus::Accepted,
            RequestStatus::Rejected,
            RequestStatus::NoAnswer,
        ]
    }

    /// Human-readable label for display and export.
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::New => "New",
            RequestStatus::Accepted => "Accepted",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::NoAnswer => "No answer",
        }
    }

    /// Inverse of [`label`](Self::label): recover the status from its
    /// display name. Returns `None` for unknown labels so callers reading
    /// back exported rows can distinguish known statuses from free text.
    pub fn from_label(label: &str) -> Option<RequestStatus> {
        RequestStatus::all()
            .iter()
            .find(|s| s.label() == label)
            .copied()
    }

    /// Stable wire tag used in snapshots (`new`, `accepted`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            RequestStatus::New => "new",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
            RequestStatus::NoAnswer => "no_answer",
        }
    }

    /// Parse a wire tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<RequestStatus> {
        RequestStatus::all().iter().find(|s| s.tag() == tag).copied()
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Priority
// =============================================================================

/// Handling priority assigned by the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Human-readable label for display and export.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Request (the central entity)
// =============================================================================

/// A single inbound customer request (lead).
///
/// This is the core data unit that flows through filtering, grouping,
/// statistics, and export. The store assigns `id` and `created_at` on
/// creation; neither changes afterwards. `updated_at` is re-stamped on
/// every status change or field edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Opaque unique id assigned by the store on creation.
    pub id: String,

    /// Customer full name. May be empty (free-text contact field).
    #[serde(default)]
    pub full_name: String,

    /// Customer phone number. May be empty.
    #[serde(default)]
    pub phone: String,

    /// Optional birth date in `dd.MM.yyyy` display format.
    /// Not validated beyond format; rendered verbatim.
    #[serde(default)]
    pub birth_date: Option<String>,

    /// Processing status. Always `New` on creation.
    #[serde(default)]
    pub status: RequestStatus,

    /// Origin channel tag (e.g. `hero_form`, `phone_call`). Free text;
    /// known tags get display names via [`source_label`], unknown tags
    /// pass through unchanged.
    #[serde(default)]
    pub source: String,

    /// Operator comment.
    #[serde(default)]
    pub comment: Option<String>,

    /// Free-form classification tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Name of the courier the request was assigned to, if any.
    #[serde(default)]
    pub assigned_to: Option<String>,

    /// Handling priority.
    #[serde(default)]
    pub priority: Priority,

    /// HTTP referrer captured by the submitting form, if any.
    #[serde(default)]
    pub referrer: Option<String>,

    /// Browser user agent captured by the submitting form, if any.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Creation timestamp. Immutable after creation.
    pub created_at: DateTime<Local>,

    /// Last-mutation timestamp. `updated_at >= created_at` whenever present.
    #[serde(default)]
    pub updated_at: Option<DateTime<Local>>,
}

// =============================================================================
// Source display names
// =============================================================================

/// Human-readable name for an origin channel tag.
///
/// Known tags are mapped through a fixed lookup; unknown non-empty tags
/// pass through unchanged and an empty tag renders as "Not specified".
pub fn source_label(source: &str) -> &str {
    match source {
        "hero_form" => "Landing form",
        "contact_form" => "Contact form",
        "popup_form" => "Popup form",
        "yandex_search" => "Yandex search",
        "google_search" => "Google search",
        "phone_call" => "Phone call",
        "" => constants::SOURCE_NOT_SPECIFIED,
        other => other,
    }
}

/// Inverse of [`source_label`] for known tags only. Unknown display names
/// return `None` (they were passed through unchanged on the way out).
pub fn source_from_label(label: &str) -> Option<&'static str> {
    match label {
        "Landing form" => Some("hero_form"),
        "Contact form" => Some("contact_form"),
        "Popup form" => Some("popup_form"),
        "Yandex search" => Some("yandex_search"),
        "Google search" => Some("google_search"),
        "Phone call" => Some("phone_call"),
        _ => None,
    }
}

// =============================================================================
// Company
// =============================================================================

/// A partner company that requests can be routed to.
///
/// Independent lifecycle; deletion is hard and does not cascade to
/// couriers that reference the company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Opaque unique id assigned by the store on creation.
    pub id: String,

    /// Company name. Required; uniqueness is by convention, not enforced.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub website: Option<String>,

    /// Whether the company is currently active.
    #[serde(default = "default_true")]
    pub is_active: bool,

    pub created_at: DateTime<Local>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Local>>,
}

// =============================================================================
// Courier
// =============================================================================

/// A courier, optionally attached to a company.
///
/// `company_id` is a weak reference: the company does not track which
/// couriers point at it, and a courier may reference a company that has
/// since been deleted. The association is resolved by a linear scan at
/// read time (see `store::directory::DirectoryStore::company_for`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Courier {
    /// Opaque unique id assigned by the store on creation.
    pub id: String,

    pub full_name: String,

    /// Contact phone. Required.
    pub phone: String,

    #[serde(default)]
    pub email: Option<String>,

    /// Optional weak foreign key into the company collection.
    #[serde(default)]
    pub company_id: Option<String>,

    /// Whether the courier is currently active.
    #[serde(default = "default_true")]
    pub is_active: bool,

    pub created_at: DateTime<Local>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Local>>,
}

/// Serde default: records missing the flag are treated as active.
/// Only an explicit `false` deactivates.
fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_round_trip() {
        for status in RequestStatus::all() {
            assert_eq!(
                RequestStatus::from_label(status.label()),
                Some(*status),
                "label round-trip failed for {status:?}"
            );
        }
    }

    #[test]
    fn test_status_tag_round_trip() {
        for status in RequestStatus::all() {
            assert_eq!(RequestStatus::from_tag(status.tag()), Some(*status));
        }
        assert_eq!(RequestStatus::from_tag("cancelled"), None);
    }

    #[test]
    fn test_status_serde_tags() {
        let json = serde_json::to_string(&RequestStatus::NoAnswer).unwrap();
        assert_eq!(json, "\"no_answer\"");
        let back: RequestStatus = serde_json::from_str("\"accepted\"").unwrap();
        assert_eq!(back, RequestStatus::Accepted);
    }

    #[test]
    fn test_source_label_known_and_passthrough() {
        assert_eq!(source_label("hero_form"), "Landing form");
        assert_eq!(source_label("phone_call"), "Phone call");
        assert_eq!(source_label("billboard"), "billboard");
        assert_eq!(source_label(""), "Not specified");
    }

    #[test]
    fn test_source_label_round_trip() {
        for tag in [
            "hero_form",
            "contact_form",
            "popup_form",
            "yandex_search",
            "google_search",
            "phone_call",
        ] {
            assert_eq!(source_from_label(source_label(tag)), Some(tag));
        }
        assert_eq!(source_from_label("billboard"), None);
    }

    #[test]
    fn test_request_deserialise_defaults() {
        // Only id and createdAt are required; everything else defaults.
        let json = r#"{"id":"r1","createdAt":"2026-08-30T10:00:00+03:00"}"#;
        let request: Request = serde_json::from_str(json).unwrap();
        assert_eq!(request.status, RequestStatus::New);
        assert_eq!(request.priority, Priority::Medium);
        assert!(request.full_name.is_empty());
        assert!(request.tags.is_empty());
        assert!(request.updated_at.is_none());
    }

    #[test]
    fn test_courier_active_by_default() {
        let json = r#"{"id":"c1","fullName":"A","phone":"1","createdAt":"2026-08-30T10:00:00+03:00"}"#;
        let courier: Courier = serde_json::from_str(json).unwrap();
        assert!(courier.is_active);
        assert!(courier.company_id.is_none());
    }
}
