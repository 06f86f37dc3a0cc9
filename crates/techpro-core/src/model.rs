//! Record types held in the site's collections.
//!
//! Field names follow the persisted JSON shape (`abstract`, `video`, `ppt`)
//! so existing stored data keeps decoding.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Identifier shared by every collection.
///
/// Older data stored ids as either JSON numbers or numeric strings. Both
/// decode to the same value; ids are always written back as numbers and
/// compared strictly.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl RecordId {
  /// Millisecond timestamp of `at`, the id scheme used for new records.
  pub fn from_time(at: DateTime<Utc>) -> Self { Self(at.timestamp_millis()) }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

impl From<i64> for RecordId {
  fn from(v: i64) -> Self { Self(v) }
}

impl std::str::FromStr for RecordId {
  type Err = std::num::ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { s.trim().parse().map(Self) }
}

impl<'de> Deserialize<'de> for RecordId {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
      Int(i64),
      Float(f64),
      Text(String),
    }

    match Raw::deserialize(d)? {
      Raw::Int(n) => Ok(Self(n)),
      // `i64::MIN as f64` is exactly -2^63; anything at or past +2^63 would
      // saturate on the cast.
      Raw::Float(f)
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f < -(i64::MIN as f64) =>
      {
        Ok(Self(f as i64))
      }
      Raw::Float(f) => Err(de::Error::custom(format!("id {f} is not an integer in range"))),
      Raw::Text(s) => s.parse().map_err(de::Error::custom),
    }
  }
}

/// Any record that lives in a collection.
pub trait Identified {
  fn id(&self) -> RecordId;
}

// ─── Projects ────────────────────────────────────────────────────────────────

/// A portfolio project shown in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
  pub id:      RecordId,
  pub title:   String,
  #[serde(rename = "abstract")]
  pub summary: String,
  #[serde(default)]
  pub algo:    String,
  #[serde(default)]
  pub tech:    String,
  /// Demo video URL.
  #[serde(
    default,
    deserialize_with = "empty_as_none",
    skip_serializing_if = "Option::is_none"
  )]
  pub video:   Option<String>,
  /// Slide deck URL.
  #[serde(
    default,
    deserialize_with = "empty_as_none",
    skip_serializing_if = "Option::is_none"
  )]
  pub ppt:     Option<String>,
  #[serde(default)]
  pub tags:    Vec<String>,
}

impl Identified for Project {
  fn id(&self) -> RecordId { self.id }
}

impl Project {
  pub fn has_tag(&self, tag: &str) -> bool { self.tags.iter().any(|t| t == tag) }
}

/// The editable fields of a project, as submitted by the admin editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
  pub title:   String,
  pub summary: String,
  pub algo:    String,
  pub tech:    String,
  pub video:   Option<String>,
  pub ppt:     Option<String>,
  pub tags:    Vec<String>,
}

impl ProjectDraft {
  pub fn into_project(self, id: RecordId) -> Project {
    Project {
      id,
      title: self.title,
      summary: self.summary,
      algo: self.algo,
      tech: self.tech,
      video: self.video.filter(|s| !s.trim().is_empty()),
      ppt: self.ppt.filter(|s| !s.trim().is_empty()),
      tags: self.tags,
    }
  }
}

fn empty_as_none<'de, D: Deserializer<'de>>(
  d: D,
) -> Result<Option<String>, D::Error> {
  let v = Option::<String>::deserialize(d)?;
  Ok(v.filter(|s| !s.trim().is_empty()))
}

// ─── Users and sessions ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  User,
}

/// A site account. The password is stored as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:       RecordId,
  pub email:    String,
  pub password: String,
  pub role:     Role,
  pub name:     String,
}

impl Identified for User {
  fn id(&self) -> RecordId { self.id }
}

/// The signed-in identity: a copy of the user taken at sign-in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub id:    RecordId,
  pub email: String,
  pub role:  Role,
  pub name:  String,
}

impl Session {
  pub fn is_admin(&self) -> bool { self.role == Role::Admin }
}

impl From<&User> for Session {
  fn from(u: &User) -> Self {
    Self {
      id:    u.id,
      email: u.email.clone(),
      role:  u.role,
      name:  u.name.clone(),
    }
  }
}

// ─── Contact submissions ─────────────────────────────────────────────────────

/// A contact or service request kept locally because it could not be
/// delivered. Never updated after it is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
  pub id:      RecordId,
  pub name:    String,
  #[serde(default)]
  pub details: String,
  #[serde(default)]
  pub message: String,
  /// ISO-8601 creation time.
  pub created: String,
}

impl Identified for ContactSubmission {
  fn id(&self) -> RecordId { self.id }
}

/// Format a timestamp the way submissions record it, e.g.
/// `2024-01-01T09:30:00.125Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn record_id_accepts_numbers_and_numeric_strings() {
    let a: RecordId = serde_json::from_str("42").unwrap();
    let b: RecordId = serde_json::from_str("\"42\"").unwrap();
    let c: RecordId = serde_json::from_str("42.0").unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(serde_json::to_string(&b).unwrap(), "42");
  }

  #[test]
  fn record_id_rejects_garbage() {
    assert!(serde_json::from_str::<RecordId>("\"forty\"").is_err());
    assert!(serde_json::from_str::<RecordId>("4.5").is_err());
  }

  #[test]
  fn record_id_rejects_floats_outside_i64() {
    assert!(serde_json::from_str::<RecordId>("1e20").is_err());
    assert!(serde_json::from_str::<RecordId>("-1e20").is_err());
    assert!(serde_json::from_str::<RecordId>("10000000000000000000").is_err());
    assert!(serde_json::from_str::<RecordId>("9223372036854775808.0").is_err());

    let max: RecordId = serde_json::from_str("9223372036854775807").unwrap();
    assert_eq!(max, RecordId(i64::MAX));
    let big: RecordId = serde_json::from_str("1e18").unwrap();
    assert_eq!(big, RecordId(1_000_000_000_000_000_000));
  }

  #[test]
  fn project_decodes_legacy_shape() {
    let json = r#"{
      "id": "7",
      "title": "Smart Scheduler",
      "abstract": "GA + ILP",
      "algo": "Genetic Algorithm",
      "tech": "Python",
      "video": "",
      "ppt": "https://example.com/deck.pdf",
      "tags": ["Optimization"]
    }"#;
    let p: Project = serde_json::from_str(json).unwrap();
    assert_eq!(p.id, RecordId(7));
    assert_eq!(p.summary, "GA + ILP");
    assert_eq!(p.video, None);
    assert_eq!(p.ppt.as_deref(), Some("https://example.com/deck.pdf"));

    let back = serde_json::to_value(&p).unwrap();
    assert_eq!(back["abstract"], "GA + ILP");
    assert!(back.get("video").is_none());
  }

  #[test]
  fn session_copies_user_without_password() {
    let user = User {
      id:       RecordId(1),
      email:    "admin@innovate.local".into(),
      password: "Admin123!".into(),
      role:     Role::Admin,
      name:     "Admin".into(),
    };
    let session = Session::from(&user);
    assert!(session.is_admin());
    let json = serde_json::to_value(&session).unwrap();
    assert!(json.get("password").is_none());
    assert_eq!(json["role"], "admin");
  }

  #[test]
  fn iso_timestamp_has_millis_and_zulu_suffix() {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(iso_timestamp(at), "2024-01-01T00:00:00.000Z");
    let at = Utc.timestamp_nanos(1_704_101_400_125_999_999);
    assert_eq!(iso_timestamp(at), "2024-01-01T09:30:00.125Z");
  }
}
