use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking a child id that was synthesized locally after a failed
/// remote create. Server-assigned ids never carry it.
pub const LOCAL_ID_PREFIX: &str = "local_";

/// Opaque bearer token authorizing remote calls.
///
/// Absence means "no session". Owned exclusively by the orchestrator;
/// persisted on login and erased on logout.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[inline]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Token bodies never go to logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(***)")
    }
}

/// Child identity. Either server-assigned (authoritative) or a
/// time-based local placeholder created when a remote write failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildId(pub String);

impl ChildId {
    /// Synthesize a non-authoritative local id from the current time.
    #[must_use]
    pub fn local_now() -> Self {
        Self(format!("{LOCAL_ID_PREFIX}{}", Utc::now().timestamp_millis()))
    }

    /// Whether this id was synthesized locally (never persisted remotely).
    #[inline]
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_ID_PREFIX)
    }
}

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChildId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// A registered child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: ChildId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub profile_image_url: Option<String>,
}

/// Draft child fields for a create call. The id is assigned by the server,
/// or synthesized locally if the remote write fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDraft {
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub profile_image_url: Option<String>,
}

impl ChildDraft {
    /// Materialize the draft into a child carrying the given id.
    #[must_use]
    pub fn into_child(self, id: ChildId) -> Child {
        Child {
            id,
            name: self.name,
            birth_date: self.birth_date,
            gender: self.gender,
            profile_image_url: self.profile_image_url,
        }
    }
}

/// The logged-in parent, or a best-effort stand-in decoded from the
/// credential when the profile lookup fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub profile_image_url: Option<String>,
}

/// Purely local notification preferences. No remote persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub homework_reminders: bool,
    pub vaccination_reminders: bool,
    pub monthly_reports: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            homework_reminders: true,
            vaccination_reminders: true,
            monthly_reports: false,
        }
    }
}

/// Dashboard section requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Health,
    Learning,
    School,
    Meal,
    Settings,
}

/// Session mode. The single source of truth: no independent demo flag
/// exists, views derive one from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No backend session; synthetic sample data.
    Demo,
    /// Login surface shown in place of the dashboard.
    AwaitingLogin,
    /// Live data fetched with a bearer credential.
    Authenticated,
}

/// Monotonic tag bumped on every mode change. Async completions carry the
/// epoch they were issued under; stale ones are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SessionEpoch(pub u64);

impl SessionEpoch {
    #[inline]
    pub(crate) fn bump(&mut self) {
        self.0 += 1;
    }
}

/// Outcome of a child create, distinguishable by the caller so the
/// presentation layer can warn when the record is not persisted remotely.
#[derive(Debug, Clone, PartialEq)]
pub enum AddChildOutcome {
    /// Server accepted the create; the child carries an authoritative id.
    Saved(Child),
    /// Remote write failed; the child exists locally only, under a
    /// placeholder id.
    LocalFallback(Child),
}

impl AddChildOutcome {
    #[inline]
    #[must_use]
    pub fn child(&self) -> &Child {
        match self {
            Self::Saved(c) | Self::LocalFallback(c) => c,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_local_fallback(&self) -> bool {
        matches!(self, Self::LocalFallback(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ids_are_distinguishable() {
        let local = ChildId::local_now();
        assert!(local.is_local());
        assert!(!ChildId::from("42").is_local());
    }

    #[test]
    fn credential_debug_redacts_token() {
        let cred = Credential::new("secret-token");
        assert_eq!(format!("{cred:?}"), "Credential(***)");
    }

    #[test]
    fn notification_defaults_match_shell() {
        let settings = NotificationSettings::default();
        assert!(settings.homework_reminders);
        assert!(settings.vaccination_reminders);
        assert!(!settings.monthly_reports);
    }

    #[test]
    fn draft_materializes_with_given_id() {
        let draft = ChildDraft {
            name: "테스트".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2018, 1, 5).unwrap(),
            gender: Gender::Female,
            profile_image_url: None,
        };
        let child = draft.into_child(ChildId::from("7"));
        assert_eq!(child.id, ChildId::from("7"));
        assert_eq!(child.name, "테스트");
    }
}
