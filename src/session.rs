//! Session store for the single local user profile.
//!
//! The store starts out [`SessionState::Loading`] and only reports
//! authentication once [`SessionStore::load`] has read storage, so callers can
//! tell "not read yet" apart from "signed out".

use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    error::AppError,
    profile::UserProfile,
    storage::{KeyValueStore, SESSION_STORAGE_KEY},
    validation::validate_profile,
};

/// Load state of the session slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Storage has not been read yet
    #[default]
    Loading,
    /// Storage was read and holds no usable profile
    Absent,
    /// Storage was read and holds this profile
    Present(UserProfile),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Present(_))
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Present(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Owns the session slot and writes every change through to storage
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    state: SessionState,
    last_write_failed: bool,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Creates a store in the loading state. Call [`SessionStore::load`] before use.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: SessionState::Loading,
            last_write_failed: false,
        }
    }

    /// Creates a store and immediately loads it from storage
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    /// Reads the stored profile. Unreadable or invalid data counts as no profile.
    pub fn load(&mut self) -> Option<&UserProfile> {
        self.state = match read_profile(&self.storage) {
            Some(profile) => SessionState::Present(profile),
            None => SessionState::Absent,
        };
        self.state.user()
    }

    /// Starts a session for `profile`, replacing any existing one
    ///
    /// # Arguments
    /// * `profile` - Profile to store, must pass field validation
    pub fn login(&mut self, profile: UserProfile) -> Result<(), AppError> {
        validate_profile(&profile)?;
        info!(username = %profile.username, "signing in");
        self.replace(profile);
        Ok(())
    }

    /// Replaces the stored profile. Same slot and same checks as [`SessionStore::login`].
    pub fn update_profile(&mut self, profile: UserProfile) -> Result<(), AppError> {
        validate_profile(&profile)?;
        info!(username = %profile.username, "updating profile");
        self.replace(profile);
        Ok(())
    }

    /// Clears the session. Does nothing beyond a storage removal when already signed out.
    pub fn logout(&mut self) {
        if self.state.is_authenticated() {
            info!("signing out");
        }
        self.state = SessionState::Absent;
        let outcome = self.storage.remove(SESSION_STORAGE_KEY);
        self.record_write(outcome);
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.state.user()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Whether the most recent change failed to reach storage and will not survive a restart
    pub fn last_write_failed(&self) -> bool {
        self.last_write_failed
    }

    fn replace(&mut self, profile: UserProfile) {
        let outcome = serde_json::to_string(&profile)
            .map_err(AppError::from)
            .and_then(|json| self.storage.set(SESSION_STORAGE_KEY, &json));
        self.state = SessionState::Present(profile);
        self.record_write(outcome);
    }

    fn record_write(&mut self, outcome: Result<(), AppError>) {
        self.last_write_failed = match outcome {
            Ok(()) => false,
            Err(err) => {
                error!(error = %err, "session change not persisted");
                true
            }
        };
    }
}

fn read_profile<S: KeyValueStore>(storage: &S) -> Option<UserProfile> {
    let raw: String = match storage.get(SESSION_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(error = %err, "failed to load session from storage");
            return None;
        }
    };

    // struct deserialization also accepts a sequence, so only objects get that far
    let value: Value = match serde_json::from_str(&raw) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) => {
            warn!("stored session is not an object");
            return None;
        }
        Err(err) => {
            warn!(error = %err, "stored session is malformed");
            return None;
        }
    };

    let profile: UserProfile = match serde_json::from_value(value) {
        Ok(profile) => profile,
        Err(err) => {
            warn!(error = %err, "stored session is malformed");
            return None;
        }
    };

    if let Err(err) = validate_profile(&profile) {
        warn!(error = %err, "stored session is out of bounds");
        return None;
    }

    Some(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    /// Storage that is never available
    struct UnavailableStore;

    impl KeyValueStore for UnavailableStore {
        fn get(&self, key: &str) -> Result<Option<String>, AppError> {
            Err(AppError::StorageRead {
                key: key.to_string(),
                reason: "disabled".to_string(),
            })
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), AppError> {
            Err(AppError::StorageWrite {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            })
        }

        fn remove(&mut self, key: &str) -> Result<(), AppError> {
            Err(AppError::StorageWrite {
                key: key.to_string(),
                reason: "disabled".to_string(),
            })
        }
    }

    fn rick() -> UserProfile {
        UserProfile::new("Rick", "Scientist")
    }

    #[test]
    fn starts_loading_until_loaded() {
        let mut store = SessionStore::new(MemoryStore::new());
        assert!(store.is_loading());
        assert!(!store.is_authenticated());

        assert_eq!(store.load(), None);
        assert_eq!(store.state(), &SessionState::Absent);
    }

    #[test]
    fn login_then_load_returns_profile() {
        let mut store = SessionStore::open(MemoryStore::new());
        store.login(rick()).unwrap();

        assert_eq!(store.load(), Some(&rick()));
        assert!(store.is_authenticated());
    }

    #[test]
    fn update_replaces_the_single_slot() {
        let mut store = SessionStore::open(MemoryStore::new());
        store.login(rick()).unwrap();
        let morty = UserProfile::new("Morty", "Student");
        store.update_profile(morty.clone()).unwrap();

        assert_eq!(store.load(), Some(&morty));
    }

    #[test]
    fn logout_clears_and_is_idempotent() {
        let mut store = SessionStore::open(MemoryStore::new());
        store.login(rick()).unwrap();
        store.login(UserProfile::new("Summer", "Student")).unwrap();

        store.logout();
        assert_eq!(store.load(), None);
        store.logout();
        assert_eq!(store.load(), None);
        assert!(!store.last_write_failed());
    }

    #[test]
    fn login_then_logout_ends_signed_out() {
        let mut store = SessionStore::open(MemoryStore::new());
        store.login(rick()).unwrap();
        store.logout();
        assert_eq!(store.state(), &SessionState::Absent);
    }

    #[test]
    fn invalid_login_leaves_prior_profile() {
        let mut store = SessionStore::open(MemoryStore::new());
        store.login(rick()).unwrap();

        let empty_name = store.login(UserProfile::new("", "Scientist"));
        assert!(matches!(empty_name, Err(AppError::Validation(_))));

        let long_title = store.update_profile(UserProfile::new("Rick", "x".repeat(101)));
        assert!(matches!(long_title, Err(AppError::Validation(_))));

        assert_eq!(store.user(), Some(&rick()));
        assert_eq!(store.load(), Some(&rick()));
    }

    #[test]
    fn malformed_stored_data_loads_as_absent() {
        let mut storage = MemoryStore::new();
        storage
            .set(SESSION_STORAGE_KEY, r#"{"username":"Ri"#)
            .unwrap();
        let store = SessionStore::open(storage);
        assert_eq!(store.state(), &SessionState::Absent);
    }

    #[test]
    fn wrong_shape_and_out_of_bounds_data_load_as_absent() {
        for raw in [
            r#"{"username":"Rick"}"#,
            r#"{"username":1,"jobTitle":"Scientist"}"#,
            r#"{"username":"","jobTitle":"Scientist"}"#,
            r#"["Rick","Scientist"]"#,
        ] {
            let mut storage = MemoryStore::new();
            storage.set(SESSION_STORAGE_KEY, raw).unwrap();
            let store = SessionStore::open(storage);
            assert_eq!(store.state(), &SessionState::Absent, "payload {raw}");
        }
    }

    #[test]
    fn positional_array_is_not_a_profile() {
        for raw in [r#"["Rick","Scientist"]"#, r#""Rick""#, "null"] {
            let mut storage = MemoryStore::new();
            storage.set(SESSION_STORAGE_KEY, raw).unwrap();
            let mut store = SessionStore::open(storage);
            assert_eq!(store.load(), None, "payload {raw}");
            assert!(!store.is_authenticated());
        }
    }

    #[test]
    fn unavailable_storage_keeps_in_memory_state() {
        let mut store = SessionStore::open(UnavailableStore);
        assert_eq!(store.state(), &SessionState::Absent);

        store.login(rick()).unwrap();
        assert!(store.is_authenticated());
        assert!(store.last_write_failed());

        store.logout();
        assert!(!store.is_authenticated());
        assert!(store.last_write_failed());
    }

    #[test]
    fn file_backed_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::open(FileStore::new(dir.path()));
        store.login(rick()).unwrap();

        let reopened = SessionStore::open(FileStore::new(dir.path()));
        assert_eq!(reopened.user(), Some(&rick()));
    }
}
