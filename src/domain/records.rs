//! Flat records kept alongside detections: feedback, activity log, session user.
//!
//! Each type is appended independently; nothing links them together.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Feedback rating bounds (inclusive).
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    HealthWorker,
    Admin,
}

impl UserRole {
    /// Parse a role name, accepting a few spellings.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "healthworker" | "worker" | "user" => Some(Self::HealthWorker),
            "admin" | "administrator" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HealthWorker => write!(f, "Health worker"),
            Self::Admin => write!(f, "Admin"),
        }
    }
}

/// Signed-in user (stored under the `user` key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub signed_in_at: chrono::DateTime<chrono::Utc>,
}

impl SessionUser {
    /// Create a user session.
    ///
    /// # Errors
    /// Returns a validation error when the name is blank or the e-mail has no `@`.
    pub fn new(name: &str, email: &str, role: UserRole) -> Result<Self, ValidationError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(ValidationError::InvalidField("name must not be empty".into()));
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidField(format!(
                "invalid e-mail address: {email}"
            )));
        }

        Ok(Self {
            id: super::new_id(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            signed_in_at: chrono::Utc::now(),
        })
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Feedback left by a health worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub rating: u8,
    pub category: String,
    pub message: String,
    pub user_id: Option<String>,
}

impl FeedbackRecord {
    /// Create a feedback record.
    ///
    /// # Errors
    /// Returns a validation error if the rating is outside 1..=5 or the message is blank.
    pub fn new(
        rating: u8,
        category: impl Into<String>,
        message: impl Into<String>,
        user_id: Option<String>,
    ) -> Result<Self, ValidationError> {
        if !RATING_RANGE.contains(&rating) {
            return Err(ValidationError::InvalidField(format!(
                "rating {rating} out of range [1, 5]"
            )));
        }
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ValidationError::InvalidField("feedback message is empty".into()));
        }

        Ok(Self {
            id: super::new_id(),
            created_at: chrono::Utc::now(),
            rating,
            category: category.into(),
            message,
            user_id,
        })
    }
}

/// Severity of an activity log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// One activity log line (stored under `safecell_logs`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub action: String,
    pub details: String,
    pub user_id: Option<String>,
}

impl LogEntry {
    #[must_use]
    pub fn new(
        level: LogLevel,
        action: impl Into<String>,
        details: impl Into<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            id: super::new_id(),
            timestamp: chrono::Utc::now(),
            level,
            action: action.into(),
            details: details.into(),
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_rating_bounds() {
        assert!(FeedbackRecord::new(0, "general", "too low", None).is_err());
        assert!(FeedbackRecord::new(6, "general", "too high", None).is_err());
        assert!(FeedbackRecord::new(5, "general", "works well", None).is_ok());
        assert!(FeedbackRecord::new(3, "general", "   ", None).is_err());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("health_worker"), Some(UserRole::HealthWorker));
        assert_eq!(UserRole::parse("Health Worker"), Some(UserRole::HealthWorker));
        assert_eq!(UserRole::parse("nurse"), None);
    }

    #[test]
    fn test_session_user_validation() {
        assert!(SessionUser::new("", "a@b.rw", UserRole::Admin).is_err());
        assert!(SessionUser::new("Aline", "not-an-email", UserRole::Admin).is_err());

        let user = SessionUser::new(" Aline ", "aline@moh.gov.rw", UserRole::Admin)
            .expect("Should create user");
        assert_eq!(user.name, "Aline");
        assert!(user.is_admin());
    }
}
