//! Fixed synthetic sample shown in demo mode.
//!
//! Repopulated in full on every entry into `Demo`, not just once.

use crate::types::{Child, ChildId, Gender, User};
use chrono::NaiveDate;

const CHILD_AVATAR: &str = "/api/placeholder/80/80";
const USER_AVATAR: &str = "/api/placeholder/40/40";

/// The fixed two-entry demo roster.
#[must_use]
pub fn sample_roster() -> Vec<Child> {
    vec![
        Child {
            id: ChildId::from("1"),
            name: "김민준".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2015, 3, 15).expect("valid sample date"),
            gender: Gender::Male,
            profile_image_url: Some(CHILD_AVATAR.to_string()),
        },
        Child {
            id: ChildId::from("2"),
            name: "이서연".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2016, 7, 22).expect("valid sample date"),
            gender: Gender::Female,
            profile_image_url: Some(CHILD_AVATAR.to_string()),
        },
    ]
}

/// Stand-in parent shown by the settings surface while in demo mode.
#[must_use]
pub fn sample_user() -> User {
    User {
        name: "김부모".to_string(),
        profile_image_url: Some(USER_AVATAR.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_roster_has_two_entries() {
        let roster = sample_roster();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].name, "김민준");
        assert_eq!(roster[1].name, "이서연");
    }

    #[test]
    fn sample_ids_are_not_local() {
        assert!(sample_roster().iter().all(|c| !c.id.is_local()));
    }
}
