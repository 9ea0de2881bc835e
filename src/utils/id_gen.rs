//! ID generation utilities

use chrono::Utc;

/// Timestamp-derived id source
///
/// Ids are milliseconds since the epoch, bumped past the previous id when two
/// are requested within the same millisecond or the clock steps backwards, so
/// a generator never hands out the same id twice.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Create a generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator whose ids are all greater than `floor`
    pub fn seeded(floor: i64) -> Self {
        Self { last: floor }
    }

    /// Next unique id
    pub fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last.saturating_add(1));
        self.last
    }

    /// Last id handed out (or the seed)
    pub fn last(&self) -> i64 {
        self.last
    }
}

/// Generate a user id (`user_` + 32 hex chars)
pub fn generate_user_id() -> String {
    format!("{}{}", crate::USER_ID_PREFIX, uuid::Uuid::new_v4().simple())
}
