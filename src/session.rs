use thiserror::Error;

use crate::models::User;
use crate::storage::{SlotStore, StorageError};

/// Storage key holding the signed-in user.
pub const SESSION_KEY: &str = "scholar_user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session payload is not a user record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("session user has an empty `{0}` field")]
    EmptyField(&'static str),
}

/// Sole owner of the session slot.
///
/// The stored value is plain JSON with no signature or expiry. Anything with
/// access to the slot store can forge it.
#[derive(Debug)]
pub struct SessionManager<S> {
    store: S,
}

impl<S: SlotStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save_session(&mut self, user: &User) -> Result<(), StorageError> {
        let payload = serde_json::to_string(user).map_err(StorageError::Encode)?;
        self.store.set(SESSION_KEY, &payload)?;
        tracing::debug!(user = %user.id, role = %user.role, "session saved");
        Ok(())
    }

    /// Returns the signed-in user. A slot that cannot be read or decoded is
    /// cleared and reported as signed out.
    pub fn load_session(&mut self) -> Option<User> {
        let payload = match self.store.get(SESSION_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(error = %e, "session slot unreadable, clearing");
                self.discard();
                return None;
            }
        };

        match decode(&payload) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::error!(error = %e, "corrupt session, clearing");
                self.discard();
                None
            }
        }
    }

    pub fn clear_session(&mut self) -> Result<(), StorageError> {
        self.store.remove(SESSION_KEY)?;
        tracing::debug!("session cleared");
        Ok(())
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn discard(&mut self) {
        if let Err(e) = self.store.remove(SESSION_KEY) {
            tracing::error!(error = %e, "failed to clear session slot");
        }
    }
}

fn decode(payload: &str) -> Result<User, SessionError> {
    let user: User = serde_json::from_str(payload)?;

    if user.id.trim().is_empty() {
        return Err(SessionError::EmptyField("id"));
    }
    if user.email.trim().is_empty() {
        return Err(SessionError::EmptyField("email"));
    }
    if user.name.trim().is_empty() {
        return Err(SessionError::EmptyField("name"));
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{faculty_user, student_user};
    use crate::storage::{FileSlotStore, MemorySlotStore};

    fn manager() -> SessionManager<MemorySlotStore> {
        SessionManager::new(MemorySlotStore::new())
    }

    #[test]
    fn load_returns_what_was_saved() {
        let mut sessions = manager();
        let user = student_user();
        sessions.save_session(&user).unwrap();
        assert_eq!(sessions.load_session(), Some(user));
    }

    #[test]
    fn save_overwrites_previous_session() {
        let mut sessions = manager();
        sessions.save_session(&student_user()).unwrap();
        sessions.save_session(&faculty_user()).unwrap();
        assert_eq!(sessions.load_session(), Some(faculty_user()));
    }

    #[test]
    fn fresh_and_cleared_slots_are_signed_out() {
        let mut sessions = manager();
        assert!(sessions.load_session().is_none());

        sessions.save_session(&faculty_user()).unwrap();
        sessions.clear_session().unwrap();
        assert!(sessions.load_session().is_none());

        sessions.clear_session().unwrap();
        assert!(sessions.load_session().is_none());
    }

    #[test]
    fn unparseable_payload_is_cleared() {
        let mut sessions = manager();
        sessions.store_mut().set(SESSION_KEY, "{not json").unwrap();

        assert!(sessions.load_session().is_none());
        assert!(sessions.store().get(SESSION_KEY).unwrap().is_none());
        assert!(sessions.load_session().is_none());
    }

    #[test]
    fn payload_missing_role_is_rejected() {
        let mut sessions = manager();
        let payload = r#"{"id":"stu-001","email":"alex.smith@university.edu","name":"Alex Smith"}"#;
        sessions.store_mut().set(SESSION_KEY, payload).unwrap();

        assert!(sessions.load_session().is_none());
        assert!(sessions.store().get(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn payload_with_unknown_role_or_wrong_types_is_rejected() {
        let payloads = [
            r#"{"id":"x","email":"e@x","name":"n","role":"admin"}"#,
            r#"{"id":1,"email":"e@x","name":"n","role":"student"}"#,
            r#"{"id":"x","email":"","name":"n","role":"faculty"}"#,
            r#""just a string""#,
            "null",
        ];

        for payload in payloads {
            let mut sessions = manager();
            sessions.store_mut().set(SESSION_KEY, payload).unwrap();
            assert!(sessions.load_session().is_none(), "{payload} should be rejected");
            assert!(sessions.store().get(SESSION_KEY).unwrap().is_none());
        }
    }

    #[test]
    fn stored_payload_uses_camel_case_fields() {
        let mut sessions = manager();
        sessions.save_session(&student_user()).unwrap();
        let raw = sessions.store().get(SESSION_KEY).unwrap().unwrap();
        assert!(raw.contains("\"studentId\":\"STU-2024-001\""));
        assert!(raw.contains("\"role\":\"student\""));
        assert!(!raw.contains("department"));
    }

    #[test]
    fn file_backed_session_survives_a_new_manager() {
        let dir = tempfile::tempdir().unwrap();
        SessionManager::new(FileSlotStore::new(dir.path()))
            .save_session(&faculty_user())
            .unwrap();

        let mut reopened = SessionManager::new(FileSlotStore::new(dir.path()));
        assert_eq!(reopened.load_session(), Some(faculty_user()));
    }
}
