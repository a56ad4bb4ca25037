//! The `/v1` contract types.
//!
//! Every struct and enum in this module maps 1:1 onto a JSON shape the
//! backend produces or consumes. Field names on the wire are camelCase
//! (`accessToken`, `favoriteStations`, ...), so most structs carry
//! `#[serde(rename_all = "camelCase")]` and the Rust fields stay
//! snake_case.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Path prefix for every backend endpoint. The backend versions its API
/// under this prefix; bumping it is a breaking contract change.
pub const API_PREFIX: &str = "/v1";

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a user account.
///
/// This is a newtype wrapper over the backend's numeric user id. Wrapping
/// it means a `UserId` can't be confused with any other number floating
/// through the client, and `#[serde(transparent)]` keeps the wire shape
/// a plain JSON number — `UserId(7)` is just `7` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// A unique identifier for a transit station.
///
/// Station ids are opaque strings assigned by the backend ("ast-004",
/// "x", ...). Same newtype pattern as [`UserId`]; the extra `Ord` derive
/// lets the profile keep favorites in an ordered set.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StationId(pub String);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A unique identifier for a transit line.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LineId(pub String);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Station feed
// ---------------------------------------------------------------------------

/// Operational status of a station, as reported by `GET /v1/data`.
///
/// The wire values are SCREAMING-case (`"OK"`, `"WARN"`, `"DELAY"`), so
/// the enum carries `rename_all = "UPPERCASE"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StationStatus {
    /// Normal service.
    Ok,
    /// Degraded service — trains running with restrictions.
    Warn,
    /// Active delays on the station.
    Delay,
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::Warn => f.write_str("WARN"),
            Self::Delay => f.write_str("DELAY"),
        }
    }
}

/// One entry in the live station-status feed.
///
/// The feed is an ordered JSON array of these; the backend controls the
/// ordering and the client replaces its copy wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Backend-assigned station id.
    pub id: StationId,
    /// Human-readable station name.
    pub name: String,
    /// Current operational status.
    pub status: StationStatus,
    /// Free-form operator message ("signal failure at ...", may be empty).
    pub message: String,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Which weekdays the user wants status notifications for.
///
/// The backend stores this as a row with one boolean per day; `id` and
/// `profileId` are backend bookkeeping and are omitted from request
/// bodies when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl WeeklySchedule {
    /// Returns `true` if at least one day is enabled.
    pub fn any(&self) -> bool {
        self.monday
            || self.tuesday
            || self.wednesday
            || self.thursday
            || self.friday
            || self.saturday
            || self.sunday
    }
}

/// The user's profile and preferences, as returned by `GET /v1/profile`
/// and `PUT /v1/profile`.
///
/// Favorites are sets: the backend enforces that the ids reference real
/// stations/lines, the client enforces no-duplicates by keeping them in
/// a `BTreeSet`. Both arrays may be omitted entirely in older backend
/// responses, so they default to empty on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Backend-assigned profile id.
    pub id: String,
    /// Owning user. Note: the profile service keys users by an opaque
    /// string id, unlike the numeric [`UserId`] the auth service issues.
    pub user_id: String,
    /// Display name, if the user set one.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the onboarding welcome flow should run on next visit.
    pub needs_welcome: bool,
    /// Stations the user has starred.
    #[serde(default)]
    pub favorite_stations: BTreeSet<StationId>,
    /// Lines the user has starred.
    #[serde(default)]
    pub favorite_lines: BTreeSet<LineId>,
    /// Notification schedule, if configured.
    #[serde(default)]
    pub notification_schedule: Option<WeeklySchedule>,
    /// Creation timestamp (RFC 3339 string, backend-formatted).
    pub created_at: String,
    /// Last-update timestamp (RFC 3339 string, backend-formatted).
    pub updated_at: String,
}

/// A partial profile update, the body of `PUT /v1/profile`.
///
/// Only fields that are `Some` appear in the JSON body; the backend
/// merges them into the stored profile and responds with the full
/// updated [`Profile`].
///
/// `notification_schedule` is a double `Option` because the contract
/// distinguishes "don't touch the schedule" (absent) from "clear the
/// schedule" (explicit JSON `null`): `None` is skipped, `Some(None)`
/// serializes as `null`, `Some(Some(s))` as the schedule object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_welcome: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_stations: Option<BTreeSet<StationId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_lines: Option<BTreeSet<LineId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_schedule: Option<Option<WeeklySchedule>>,
}

// ---------------------------------------------------------------------------
// Auth payloads
// ---------------------------------------------------------------------------

/// Body of `POST /v1/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful response of `POST /v1/auth/login`.
///
/// The access token goes into the Authorization header of subsequent
/// requests; the HTTP-only session cookie set alongside it is handled by
/// the transport layer and never appears in this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub id: UserId,
}

/// Successful response of `POST /v1/auth/refresh`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Wire-shape tests.
    //!
    //! The backend contract fixes exact JSON shapes. These tests verify
    //! that the serde attributes produce and accept those shapes, because
    //! a mismatch here silently breaks every layer above.

    use super::*;

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_user_id_serializes_as_plain_number() {
        // `#[serde(transparent)]` means UserId(7) → `7`, not `{"0":7}`.
        let json = serde_json::to_string(&UserId(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_user_id_deserializes_from_plain_number() {
        let id: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(id, UserId(7));
    }

    #[test]
    fn test_user_id_display() {
        assert_eq!(UserId(42).to_string(), "U-42");
    }

    #[test]
    fn test_station_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&StationId::from("ast-004")).unwrap();
        assert_eq!(json, "\"ast-004\"");
    }

    #[test]
    fn test_line_id_round_trip() {
        let id = LineId::from("M3");
        let json = serde_json::to_string(&id).unwrap();
        let back: LineId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    // =====================================================================
    // Station feed
    // =====================================================================

    #[test]
    fn test_station_status_serializes_uppercase() {
        // The feed uses "OK"/"WARN"/"DELAY", never Rust-style casing.
        assert_eq!(
            serde_json::to_string(&StationStatus::Ok).unwrap(),
            "\"OK\""
        );
        assert_eq!(
            serde_json::to_string(&StationStatus::Delay).unwrap(),
            "\"DELAY\""
        );
    }

    #[test]
    fn test_station_status_rejects_unknown_value() {
        let result: Result<StationStatus, _> =
            serde_json::from_str("\"CLOSED\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_station_deserializes_from_feed_entry() {
        // An entry exactly as the feed produces it.
        let json = r#"{
            "id": "x",
            "name": "Axial Street",
            "status": "DELAY",
            "message": "signal failure"
        }"#;
        let station: Station = serde_json::from_str(json).unwrap();
        assert_eq!(station.id, StationId::from("x"));
        assert_eq!(station.status, StationStatus::Delay);
        assert_eq!(station.message, "signal failure");
    }

    // =====================================================================
    // Profile
    // =====================================================================

    fn sample_profile_json() -> &'static str {
        r#"{
            "id": "prof-1",
            "userId": "user-abc",
            "needsWelcome": true,
            "favoriteStations": ["b", "a"],
            "favoriteLines": ["M1"],
            "notificationSchedule": null,
            "createdAt": "2025-03-01T10:00:00Z",
            "updatedAt": "2025-03-02T10:00:00Z"
        }"#
    }

    #[test]
    fn test_profile_deserializes_camel_case_fields() {
        let profile: Profile =
            serde_json::from_str(sample_profile_json()).unwrap();
        assert_eq!(profile.id, "prof-1");
        assert_eq!(profile.user_id, "user-abc");
        assert!(profile.needs_welcome);
        assert!(profile.notification_schedule.is_none());
    }

    #[test]
    fn test_profile_favorites_are_a_set() {
        // Duplicate ids in a response collapse; ordering is normalized.
        let json = r#"{
            "id": "prof-1",
            "userId": "user-abc",
            "needsWelcome": false,
            "favoriteStations": ["b", "a", "b"],
            "favoriteLines": [],
            "createdAt": "t",
            "updatedAt": "t"
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.favorite_stations.len(), 2);
        let ordered: Vec<_> =
            profile.favorite_stations.iter().cloned().collect();
        assert_eq!(ordered, vec![StationId::from("a"), StationId::from("b")]);
    }

    #[test]
    fn test_profile_missing_favorites_default_to_empty() {
        // Older backend responses omit empty arrays entirely.
        let json = r#"{
            "id": "prof-1",
            "userId": "user-abc",
            "needsWelcome": false,
            "createdAt": "t",
            "updatedAt": "t"
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert!(profile.favorite_stations.is_empty());
        assert!(profile.favorite_lines.is_empty());
        assert!(profile.name.is_none());
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let profile: Profile =
            serde_json::from_str(sample_profile_json()).unwrap();
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("userId").is_some());
        assert!(value.get("needsWelcome").is_some());
        assert!(value.get("user_id").is_none());
    }

    // =====================================================================
    // ProfilePatch — partial-update body shapes
    // =====================================================================

    #[test]
    fn test_patch_skips_unset_fields() {
        let patch = ProfilePatch {
            needs_welcome: Some(false),
            ..ProfilePatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "needsWelcome": false }));
    }

    #[test]
    fn test_patch_favorites_serialize_as_array() {
        let patch = ProfilePatch {
            favorite_stations: Some(
                [StationId::from("a"), StationId::from("b")].into(),
            ),
            ..ProfilePatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "favoriteStations": ["a", "b"] })
        );
    }

    #[test]
    fn test_patch_clearing_schedule_sends_explicit_null() {
        // "Clear the schedule" must reach the wire as `null`, not be
        // dropped from the body — dropping it would mean "don't touch".
        let patch = ProfilePatch {
            notification_schedule: Some(None),
            ..ProfilePatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "notificationSchedule": null })
        );
    }

    #[test]
    fn test_patch_setting_schedule_sends_object() {
        let schedule = WeeklySchedule {
            monday: true,
            friday: true,
            ..WeeklySchedule::default()
        };
        let patch = ProfilePatch {
            notification_schedule: Some(Some(schedule)),
            ..ProfilePatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["notificationSchedule"]["monday"], true);
        assert_eq!(value["notificationSchedule"]["tuesday"], false);
        // Backend bookkeeping ids stay off the wire when unset.
        assert!(value["notificationSchedule"].get("id").is_none());
    }

    #[test]
    fn test_empty_patch_serializes_as_empty_object() {
        let value = serde_json::to_value(&ProfilePatch::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    // =====================================================================
    // WeeklySchedule
    // =====================================================================

    #[test]
    fn test_weekly_schedule_round_trip() {
        let schedule = WeeklySchedule {
            id: Some("ns-1".into()),
            profile_id: Some("prof-1".into()),
            monday: true,
            sunday: true,
            ..WeeklySchedule::default()
        };
        let json = serde_json::to_string(&schedule).unwrap();
        let back: WeeklySchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(schedule, back);
    }

    #[test]
    fn test_weekly_schedule_any() {
        assert!(!WeeklySchedule::default().any());
        let schedule = WeeklySchedule {
            wednesday: true,
            ..WeeklySchedule::default()
        };
        assert!(schedule.any());
    }

    // =====================================================================
    // Auth payloads
    // =====================================================================

    #[test]
    fn test_login_request_shape() {
        let req = LoginRequest {
            email: "a@b.com".into(),
            password: "secret1".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "email": "a@b.com", "password": "secret1" })
        );
    }

    #[test]
    fn test_login_response_parses_access_token_and_id() {
        let json = r#"{ "accessToken": "tok1", "id": 7 }"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.access_token, "tok1");
        assert_eq!(resp.id, UserId(7));
    }

    #[test]
    fn test_refresh_response_parses_access_token() {
        let json = r#"{ "accessToken": "tok2" }"#;
        let resp: RefreshResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.access_token, "tok2");
    }

    #[test]
    fn test_login_response_rejects_missing_token() {
        let result: Result<LoginResponse, _> =
            serde_json::from_str(r#"{ "id": 7 }"#);
        assert!(result.is_err());
    }
}
