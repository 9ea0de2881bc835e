//! Learner profile operations
//!
//! The stored profile keeps the grade the learner was in at `registeredAt`.
//! The current grade and level are derived on every read, so a learner moves
//! up one grade per calendar year without any stored data changing.

use chrono::{DateTime, Utc};
use crate::database::{KeyValueStore, Level, Profile, StoredProfile};
use crate::error::{Result, ValidationError};
use crate::utils::{calendar_years_between, now};
use crate::{GRADE_MAX, GRADE_MIN};
use super::tutor::Tutor;

/// Derive the current grade and level as of now; `None` in, `None` out
pub fn compute_status(stored: Option<&StoredProfile>) -> Option<Profile> {
    compute_status_at(stored, &now())
}

/// Derive the current grade and level as of `at`
pub fn compute_status_at(stored: Option<&StoredProfile>, at: &DateTime<Utc>) -> Option<Profile> {
    let stored = stored?;
    let current_grade = i32::from(stored.grade) + calendar_years_between(&stored.registered_at, at);
    Some(Profile {
        name: stored.name.clone(),
        grade: stored.grade,
        registered_at: stored.registered_at,
        user_id: stored.user_id.clone(),
        username: stored.username.clone(),
        current_grade,
        level: Level::from_grade(current_grade),
    })
}

/// Changes to apply to a profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    /// The grade the learner is in now
    pub grade: Option<u8>,
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired.into());
    }
    Ok(name.to_string())
}

fn validate_grade(grade: u8) -> Result<u8> {
    if !(GRADE_MIN..=GRADE_MAX).contains(&grade) {
        return Err(ValidationError::GradeOutOfRange { min: GRADE_MIN, max: GRADE_MAX }.into());
    }
    Ok(grade)
}

impl<S: KeyValueStore> Tutor<S> {
    /// Read the identity's permanent profile
    pub fn load_profile(&self) -> Result<Option<Profile>> {
        let identity = self.ensure_authenticated()?;
        let stored = self.storage.permanent_profile(&identity.user_id)?;
        Ok(compute_status(stored.as_ref()))
    }

    /// Create the learner profile after registration
    pub fn complete_onboarding(&mut self, name: &str, grade: u8) -> Result<Profile> {
        let identity = self.ensure_authenticated()?;
        let stored = StoredProfile {
            name: validate_name(name)?,
            grade: validate_grade(grade)?,
            registered_at: now(),
            user_id: identity.user_id.clone(),
            username: identity.username.clone(),
        };
        tracing::info!(user_id = %stored.user_id, grade, "onboarding completed");
        self.save_profile(stored)
    }

    /// Merge a patch into the profile and save it
    ///
    /// A new grade re-anchors the profile at the current time so the derived
    /// current grade equals the grade chosen. Without a grade the stored grade
    /// and its anchor stay as they are.
    pub fn update_profile(&mut self, patch: ProfilePatch) -> Result<Profile> {
        let mut stored = self.ensure_profile()?.to_stored();

        if let Some(name) = &patch.name {
            stored.name = validate_name(name)?;
        }
        if let Some(grade) = patch.grade {
            stored.grade = validate_grade(grade)?;
            stored.registered_at = now();
        }

        tracing::info!(user_id = %stored.user_id, grade = ?patch.grade, "profile updated");
        self.save_profile(stored)
    }

    /// Write both profile slots and make the profile current
    fn save_profile(&mut self, stored: StoredProfile) -> Result<Profile> {
        self.storage.set_active_profile(&stored)?;
        self.storage.set_permanent_profile(&stored)?;
        let profile = compute_status(Some(&stored));
        self.profile = Some(stored);
        profile.ok_or(crate::error::TutorError::ProfileRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use crate::business::tutor::tests::{create_test_tutor, create_ready_tutor};
    use crate::business::AuthState;
    use crate::error::TutorError;

    fn stored(grade: u8, registered_at: DateTime<Utc>) -> StoredProfile {
        StoredProfile {
            name: "Budi".into(),
            grade,
            registered_at,
            user_id: "user_1".into(),
            username: "budi".into(),
        }
    }

    #[test]
    fn test_compute_status_none() {
        assert!(compute_status(None).is_none());
    }

    #[test]
    fn test_grade_progression() {
        let registered = Utc.with_ymd_and_hms(2022, 7, 15, 0, 0, 0).unwrap();
        let profile = stored(5, registered);

        let same_year = Utc.with_ymd_and_hms(2022, 12, 31, 0, 0, 0).unwrap();
        let status = compute_status_at(Some(&profile), &same_year).unwrap();
        assert_eq!(status.current_grade, 5);
        assert_eq!(status.level, Level::Sd);

        let two_years = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let status = compute_status_at(Some(&profile), &two_years).unwrap();
        assert_eq!(status.current_grade, 7);
        assert_eq!(status.level, Level::Smp);
        assert_eq!(status.level_label(), "Kelas 7 (SMP)");
    }

    #[test]
    fn test_progression_monotonic() {
        let registered = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
        let profile = stored(10, registered);
        let mut prev = i32::MIN;
        for year in 0..6 {
            let at = registered + Duration::days(365 * year + 1);
            let status = compute_status_at(Some(&profile), &at).unwrap();
            assert!(status.current_grade >= prev);
            prev = status.current_grade;
        }
        assert_eq!(prev, 15);
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(compute_status_at(Some(&profile), &at).unwrap().level, Level::Mahasiswa);
    }

    #[test]
    fn test_onboarding_requires_login() {
        let (mut tutor, _) = create_test_tutor();
        let err = tutor.complete_onboarding("Budi", 7).unwrap_err();
        assert!(matches!(err, TutorError::NotAuthenticated));
    }

    #[test]
    fn test_onboarding_validation() {
        let (mut tutor, _) = create_test_tutor();
        tutor.register("budi", "secret123", "secret123").unwrap();

        let err = tutor.complete_onboarding("   ", 7).unwrap_err();
        assert!(matches!(err, TutorError::Validation(ValidationError::NameRequired)));
        let err = tutor.complete_onboarding("Budi", 0).unwrap_err();
        assert!(matches!(err, TutorError::Validation(ValidationError::GradeOutOfRange { .. })));
        let err = tutor.complete_onboarding("Budi", 14).unwrap_err();
        assert!(matches!(err, TutorError::Validation(ValidationError::GradeOutOfRange { .. })));
        assert_eq!(tutor.state(), AuthState::NoProfile);
    }

    #[test]
    fn test_onboarding_writes_both_slots() {
        let (mut tutor, _) = create_test_tutor();
        let identity = tutor.register("budi", "secret123", "secret123").unwrap();
        let profile = tutor.complete_onboarding(" Budi ", 7).unwrap();

        assert_eq!(profile.name, "Budi");
        assert_eq!(profile.current_grade, 7);
        assert_eq!(profile.level, Level::Smp);
        assert_eq!(tutor.state(), AuthState::Ready);

        let active = tutor.storage().active_profile().unwrap().unwrap();
        let permanent = tutor.storage().permanent_profile(&identity.user_id).unwrap().unwrap();
        assert_eq!(active, permanent);
        assert_eq!(tutor.load_profile().unwrap().unwrap().name, "Budi");
    }

    #[test]
    fn test_update_profile() {
        let (mut tutor, _) = create_ready_tutor();
        let profile = tutor.update_profile(ProfilePatch {
            name: Some("Budi Santoso".into()),
            grade: Some(10),
        }).unwrap();
        assert_eq!(profile.name, "Budi Santoso");
        assert_eq!(profile.current_grade, 10);
        assert_eq!(profile.level, Level::Sma);

        let permanent = tutor.load_profile().unwrap().unwrap();
        assert_eq!(permanent.current_grade, 10);
        assert_eq!(tutor.storage().active_profile().unwrap().unwrap().grade, 10);
    }

    #[test]
    fn test_update_profile_name_only_keeps_grade() {
        let (mut tutor, _) = create_ready_tutor();
        let profile = tutor.update_profile(ProfilePatch {
            name: Some("Budi S".into()),
            grade: None,
        }).unwrap();
        assert_eq!(profile.current_grade, 8);
    }

    #[test]
    fn test_rename_keeps_grade_past_range() {
        use chrono::Datelike;
        let (mut tutor, _) = create_ready_tutor();
        let user_id = tutor.identity().unwrap().user_id.clone();
        let registered = Utc.with_ymd_and_hms(2022, 7, 1, 0, 0, 0).unwrap();
        let mut old = stored(12, registered);
        old.user_id = user_id;
        tutor.storage().set_permanent_profile(&old).unwrap();
        tutor.logout().unwrap();
        tutor.login("budi", "secret123").unwrap();

        let expected = 12 + (Utc::now().year() - 2022);
        assert_eq!(tutor.profile().unwrap().current_grade, expected);

        let profile = tutor.update_profile(ProfilePatch {
            name: Some("Budi Santoso".into()),
            grade: None,
        }).unwrap();
        assert_eq!(profile.name, "Budi Santoso");
        assert_eq!(profile.current_grade, expected);
        assert_eq!(profile.grade, 12);
        assert_eq!(profile.registered_at, registered);
        assert_eq!(tutor.load_profile().unwrap().unwrap().current_grade, expected);
    }

    #[test]
    fn test_update_profile_rejects_blank_name() {
        let (mut tutor, _) = create_ready_tutor();
        let err = tutor.update_profile(ProfilePatch {
            name: Some(" ".into()),
            grade: Some(9),
        }).unwrap_err();
        assert!(matches!(err, TutorError::Validation(ValidationError::NameRequired)));
        assert_eq!(tutor.profile().unwrap().current_grade, 8);
    }

    #[test]
    fn test_update_requires_profile() {
        let (mut tutor, _) = create_test_tutor();
        tutor.register("budi", "secret123", "secret123").unwrap();
        let err = tutor.update_profile(ProfilePatch::default()).unwrap_err();
        assert!(matches!(err, TutorError::ProfileRequired));
    }
}
