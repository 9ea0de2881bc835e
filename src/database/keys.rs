//! Persisted key names
//!
//! These strings are shared with previously saved data and must not change.

/// Marker holding the logged-in identity
pub const CURRENT_IDENTITY: &str = "tutor_currentUser";

/// Profile of the logged-in identity
pub const ACTIVE_SESSION_PROFILE: &str = "mentorku-active-session";

/// Credential table (JSON object keyed by username)
pub const CREDENTIALS: &str = "tutor_users";

const PERMANENT_PROFILE_PREFIX: &str = "mentorku-user-";
const SESSION_BUNDLE_PREFIX: &str = "mentorku-data-";

/// Per-identity permanent profile key
pub fn permanent_profile(user_id: &str) -> String {
    format!("{}{}", PERMANENT_PROFILE_PREFIX, user_id)
}

/// Per-identity session bundle key
pub fn session_bundle(user_id: &str) -> String {
    format!("{}{}", SESSION_BUNDLE_PREFIX, user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(permanent_profile("user_1"), "mentorku-user-user_1");
        assert_eq!(session_bundle("user_1"), "mentorku-data-user_1");
        assert_eq!(CURRENT_IDENTITY, "tutor_currentUser");
        assert_eq!(ACTIVE_SESSION_PROFILE, "mentorku-active-session");
        assert_eq!(CREDENTIALS, "tutor_users");
    }
}
