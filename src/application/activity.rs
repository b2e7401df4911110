//! Session, activity log and feedback.

use super::RecordStore;
use crate::adapters::StorageError;
use crate::domain::{FeedbackRecord, LogEntry, LogLevel, SessionUser, UserRole};
use crate::ports::LocalStore;
use crate::SafecellError;

/// Service for the signed-in user and the records tied to them.
pub struct ActivityService<S: LocalStore> {
    records: RecordStore<S>,
}

impl<S> ActivityService<S>
where
    S: LocalStore,
    S::Error: Into<StorageError>,
{
    pub fn new(records: RecordStore<S>) -> Self {
        Self { records }
    }

    /// Sign a user in, replacing any current session.
    ///
    /// # Errors
    /// Returns a validation error for a bad name or e-mail, or a storage
    /// error if the session cannot be saved.
    pub fn sign_in(&self, name: &str, email: &str, role: UserRole) -> Result<SessionUser, SafecellError> {
        let user = SessionUser::new(name, email, role)?;
        self.records.set_user(&user)?;
        tracing::info!("Signed in {} as {}", user.email, user.role);
        self.log(LogLevel::Info, "sign_in", format!("Signed in as {}", user.role));
        Ok(user)
    }

    /// End the current session. Signing out with no session is a no-op.
    ///
    /// # Errors
    /// Returns a storage error if the session cannot be removed.
    pub fn sign_out(&self) -> Result<(), SafecellError> {
        if self.records.user().is_none() {
            return Ok(());
        }
        self.log(LogLevel::Info, "sign_out", String::new());
        self.records.clear_user()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.records.user()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|u| u.is_admin())
    }

    /// Append an activity log entry for the current user. Failures are
    /// only traced.
    pub fn log(&self, level: LogLevel, action: &str, details: String) {
        let entry = LogEntry::new(level, action, details, self.records.user_id());
        if let Err(e) = self.records.append_log(entry) {
            tracing::warn!("Failed to write activity log: {}", e);
        }
    }

    /// Most recent log entries, newest first.
    pub fn recent_logs(&self, limit: usize) -> Vec<LogEntry> {
        self.records.logs().into_iter().rev().take(limit).collect()
    }

    /// Record feedback from the current user.
    ///
    /// # Errors
    /// Returns a validation error for a bad rating or empty message, or a
    /// storage error if it cannot be saved.
    pub fn submit_feedback(
        &self,
        rating: u8,
        category: &str,
        message: &str,
    ) -> Result<FeedbackRecord, SafecellError> {
        let record = FeedbackRecord::new(rating, category, message, self.records.user_id())?;
        self.records.append_feedback(record.clone())?;
        self.log(
            LogLevel::Info,
            "feedback_submitted",
            format!("{} rated {}/5", record.category, record.rating),
        );
        Ok(record)
    }

    pub fn feedback(&self) -> Vec<FeedbackRecord> {
        self.records.feedback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::SqliteLocalStore;
    use crate::application::StoreLimits;
    use crate::domain::ValidationError;
    use std::sync::Arc;

    fn service() -> ActivityService<SqliteLocalStore> {
        let backend = SqliteLocalStore::in_memory().expect("Should create db");
        ActivityService::new(RecordStore::new(Arc::new(backend), StoreLimits::default()))
    }

    #[test]
    fn test_session_lifecycle() {
        let svc = service();
        assert!(svc.current_user().is_none());

        let user = svc
            .sign_in("Jean", "jean@moh.gov.rw", UserRole::Admin)
            .expect("Should sign in");
        assert!(svc.is_admin());
        assert_eq!(svc.current_user().map(|u| u.id), Some(user.id.clone()));

        svc.sign_out().expect("Should sign out");
        assert!(svc.current_user().is_none());
        svc.sign_out().expect("Second sign out is a no-op");

        let actions: Vec<String> = svc.recent_logs(10).into_iter().map(|l| l.action).collect();
        assert_eq!(actions, vec!["sign_out", "sign_in"]);
    }

    #[test]
    fn test_log_entries_carry_user() {
        let svc = service();
        let user = svc
            .sign_in("Jean", "jean@moh.gov.rw", UserRole::HealthWorker)
            .expect("Should sign in");
        svc.log(LogLevel::Warning, "export_failed", "disk full".into());

        let latest = svc.recent_logs(1).remove(0);
        assert_eq!(latest.action, "export_failed");
        assert_eq!(latest.user_id, Some(user.id));
    }

    #[test]
    fn test_feedback() {
        let svc = service();
        let err = svc.submit_feedback(9, "accuracy", "great").unwrap_err();
        assert!(matches!(
            err,
            SafecellError::Validation(ValidationError::InvalidField(_))
        ));

        svc.submit_feedback(4, "usability", "Easy to use in the field")
            .expect("Should submit");
        let all = svc.feedback();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].rating, 4);
        assert!(all[0].user_id.is_none());
    }
}
