//! Session store with write-through persistence
//!
//! Holds the registered accounts and the active session. Mutations
//! persist a redacted session snapshot to local storage so a session
//! survives a restart; restores are best-effort.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::model::{Account, RegisterRequest, Role};
use crate::storage::{Storage, SESSION_KEY};
use crate::{Error, Result};

/// Simulated network latency applied to every store operation.
const DEFAULT_LATENCY: Duration = Duration::from_millis(400);

struct AuthState {
    accounts: Vec<Account>,
    current: Option<Account>,
}

/// Thread-safe session store
#[derive(Clone)]
pub struct AuthStore {
    state: Arc<RwLock<AuthState>>,
    storage: Arc<dyn Storage>,
    latency: Duration,
}

impl AuthStore {
    /// Create a new AuthStore seeded with the built-in demo accounts,
    /// restoring the persisted session if one is present.
    ///
    /// Malformed storage contents are ignored, leaving an anonymous
    /// session.
    pub async fn new(storage: Arc<dyn Storage>) -> Self {
        let mut state = AuthState {
            accounts: seed_accounts(),
            current: None,
        };
        match storage.get_item(SESSION_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Account>(&raw) {
                Ok(snapshot) => restore_session(&mut state, snapshot),
                Err(err) => debug!("Ignoring malformed session snapshot: {}", err),
            },
            Ok(None) => {}
            Err(err) => warn!("Failed to read session snapshot: {}", err),
        }

        Self {
            state: Arc::new(RwLock::new(state)),
            storage,
            latency: DEFAULT_LATENCY,
        }
    }

    /// Override the simulated latency (zero in tests)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Authenticate with an email/password pair.
    ///
    /// On success the matching account becomes the active session and a
    /// redacted snapshot is written through to storage.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account> {
        tokio::time::sleep(self.latency).await;

        let mut state = self.state.write().await;
        let account = state
            .accounts
            .iter()
            .find(|account| account.email == email && account.password == password)
            .cloned()
            .ok_or(Error::InvalidCredentials)?;

        state.current = Some(account.clone());
        self.persist_session(Some(&account)).await;
        debug!("Logged in account {}", account.id);
        Ok(account)
    }

    /// Register a new account and activate it as the session.
    ///
    /// Fails with [`Error::DuplicateEmail`] if the email is taken and
    /// [`Error::PasswordMismatch`] if the confirmation differs; neither
    /// failure mutates the collection.
    pub async fn register(&self, request: RegisterRequest) -> Result<Account> {
        tokio::time::sleep(self.latency).await;

        let mut state = self.state.write().await;
        if state
            .accounts
            .iter()
            .any(|account| account.email == request.email)
        {
            return Err(Error::DuplicateEmail(request.email));
        }
        if request.password != request.confirm_password {
            return Err(Error::PasswordMismatch);
        }

        let account = Account {
            id: crate::id::fresh_id(state.accounts.iter().map(|account| account.id)),
            name: request.name,
            email: request.email,
            password: request.password,
            role: Role::User,
            created_at: Utc::now(),
        };
        state.accounts.push(account.clone());
        state.current = Some(account.clone());
        self.persist_session(Some(&account)).await;
        debug!("Registered account {}", account.id);
        Ok(account)
    }

    /// Clear the active session and drop the persisted snapshot.
    pub async fn logout(&self) {
        tokio::time::sleep(self.latency).await;

        let mut state = self.state.write().await;
        state.current = None;
        self.persist_session(None).await;
    }

    /// Placeholder bearer credential for the active account.
    ///
    /// Only meant to be attached to request headers in a development
    /// setup; carries no cryptographic guarantee.
    pub async fn token(&self) -> Option<String> {
        let state = self.state.read().await;
        state
            .current
            .as_ref()
            .map(|account| format!("mock-token-{}", account.id))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.current.is_some()
    }

    pub async fn current_account(&self) -> Option<Account> {
        self.state.read().await.current.clone()
    }

    pub async fn is_admin(&self) -> bool {
        self.state
            .read()
            .await
            .current
            .as_ref()
            .is_some_and(Account::is_admin)
    }

    /// List all accounts, passwords redacted.
    ///
    /// Admin-only: any other session gets [`Error::Unauthorized`].
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        tokio::time::sleep(self.latency).await;

        let state = self.state.read().await;
        if !state.current.as_ref().is_some_and(Account::is_admin) {
            return Err(Error::Unauthorized(
                "Only admins may list accounts".to_string(),
            ));
        }
        Ok(state.accounts.iter().map(Account::redacted).collect())
    }

    /// Remove an account. Removing the session holder logs out as a
    /// side effect.
    pub async fn remove_account(&self, id: i64) -> Result<()> {
        tokio::time::sleep(self.latency).await;

        let mut state = self.state.write().await;
        let len_before = state.accounts.len();
        state.accounts.retain(|account| account.id != id);
        if state.accounts.len() == len_before {
            return Err(Error::AccountNotFound(id));
        }

        if state.current.as_ref().map(|account| account.id) == Some(id) {
            state.current = None;
            self.persist_session(None).await;
        }
        debug!("Removed account {}", id);
        Ok(())
    }

    /// Write the session snapshot through to storage, password
    /// redacted on every path. Best-effort: a storage failure is
    /// logged, never surfaced, so in-memory state can run ahead of the
    /// persisted snapshot.
    async fn persist_session(&self, current: Option<&Account>) {
        let result = match current {
            Some(account) => match serde_json::to_string(&account.redacted()) {
                Ok(raw) => self.storage.set_item(SESSION_KEY, &raw).await,
                Err(err) => Err(err.into()),
            },
            None => self.storage.remove_item(SESSION_KEY).await,
        };
        if let Err(err) = result {
            warn!("Failed to persist session snapshot: {}", err);
        }
    }
}

/// Re-link a restored snapshot to the account collection.
///
/// Accounts registered in a previous run are not in the seed
/// collection, so the snapshot is re-inserted to keep the session
/// pointing at a held account. Its password is already redacted and
/// stays that way.
fn restore_session(state: &mut AuthState, snapshot: Account) {
    if let Some(account) = state
        .accounts
        .iter()
        .find(|account| account.id == snapshot.id)
    {
        state.current = Some(account.clone());
    } else {
        state.accounts.push(snapshot.clone());
        state.current = Some(snapshot);
    }
}

fn seed_accounts() -> Vec<Account> {
    vec![
        Account {
            id: 1,
            name: "superadmin".to_string(),
            email: "admin@example.com".to_string(),
            password: "admin123".to_string(),
            role: Role::Admin,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        },
        Account {
            id: 2,
            name: "userclient".to_string(),
            email: "user@example.com".to_string(),
            password: "user123".to_string(),
            role: Role::User,
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::auth::model::REDACTED_PASSWORD;
    use crate::storage::{FileStorage, MemoryStorage};

    async fn build_store() -> AuthStore {
        let storage = Arc::new(MemoryStorage::new());
        AuthStore::new(storage).await.with_latency(Duration::ZERO)
    }

    fn request(email: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: "newcomer".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn register_and_login_roundtrip() {
        let store = build_store().await;

        let registered = store
            .register(request("new@example.com", "pw12345", "pw12345"))
            .await
            .unwrap();
        assert_eq!(registered.role, Role::User);

        store.logout().await;
        let logged_in = store.login("new@example.com", "pw12345").await.unwrap();
        assert_eq!(logged_in.id, registered.id);
        assert!(store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let store = build_store().await;

        let result = store.login("admin@example.com", "wrong").await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
        assert!(!store.is_authenticated().await);
        assert!(store.current_account().await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_does_not_mutate() {
        let store = build_store().await;

        let result = store
            .register(request("user@example.com", "pw12345", "pw12345"))
            .await;
        assert!(matches!(result, Err(Error::DuplicateEmail(_))));

        // Collection unchanged: only the two seed accounts remain
        store.login("admin@example.com", "admin123").await.unwrap();
        assert_eq!(store.list_accounts().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_password_mismatch() {
        let store = build_store().await;

        let result = store
            .register(request("new@example.com", "pw12345", "other"))
            .await;
        assert!(matches!(result, Err(Error::PasswordMismatch)));
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_token_shape() {
        let store = build_store().await;
        assert!(store.token().await.is_none());

        store.login("admin@example.com", "admin123").await.unwrap();
        assert_eq!(store.token().await.as_deref(), Some("mock-token-1"));

        store.logout().await;
        assert!(store.token().await.is_none());
    }

    #[tokio::test]
    async fn test_list_accounts_requires_admin() {
        let store = build_store().await;

        assert!(matches!(
            store.list_accounts().await,
            Err(Error::Unauthorized(_))
        ));

        store.login("user@example.com", "user123").await.unwrap();
        assert!(!store.is_admin().await);
        assert!(matches!(
            store.list_accounts().await,
            Err(Error::Unauthorized(_))
        ));

        store.login("admin@example.com", "admin123").await.unwrap();
        assert!(store.is_admin().await);
        let accounts = store.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert!(accounts
            .iter()
            .all(|account| account.password == REDACTED_PASSWORD));
    }

    #[tokio::test]
    async fn test_remove_account_clears_own_session() {
        let store = build_store().await;

        store.login("user@example.com", "user123").await.unwrap();
        store.remove_account(2).await.unwrap();

        assert!(store.current_account().await.is_none());
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_remove_unknown_account() {
        let store = build_store().await;
        let result = store.remove_account(999).await;
        assert!(matches!(result, Err(Error::AccountNotFound(999))));
    }

    #[tokio::test]
    async fn test_persisted_snapshot_is_redacted() {
        let storage = Arc::new(MemoryStorage::new());
        let store = AuthStore::new(storage.clone())
            .await
            .with_latency(Duration::ZERO);

        store.login("admin@example.com", "admin123").await.unwrap();

        let raw = storage.get_item(SESSION_KEY).await.unwrap().unwrap();
        assert!(!raw.contains("admin123"));
        assert!(raw.contains(REDACTED_PASSWORD));
    }

    #[tokio::test]
    async fn test_session_restored_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("data");

        {
            let store = AuthStore::new(Arc::new(FileStorage::new(&dir)))
                .await
                .with_latency(Duration::ZERO);
            store.login("admin@example.com", "admin123").await.unwrap();
        }

        {
            let store = AuthStore::new(Arc::new(FileStorage::new(&dir)))
                .await
                .with_latency(Duration::ZERO);
            let current = store.current_account().await.unwrap();
            assert_eq!(current.id, 1);
            // Re-linked to the seed account, real password intact
            assert_eq!(current.password, "admin123");
        }
    }

    #[tokio::test]
    async fn test_registered_session_restored_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("data");

        let registered_id;
        {
            let store = AuthStore::new(Arc::new(FileStorage::new(&dir)))
                .await
                .with_latency(Duration::ZERO);
            registered_id = store
                .register(request("new@example.com", "pw12345", "pw12345"))
                .await
                .unwrap()
                .id;
        }

        {
            let store = AuthStore::new(Arc::new(FileStorage::new(&dir)))
                .await
                .with_latency(Duration::ZERO);
            let current = store.current_account().await.unwrap();
            assert_eq!(current.id, registered_id);
            assert!(store.is_authenticated().await);
        }
    }

    #[tokio::test]
    async fn test_malformed_snapshot_leaves_anonymous_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(SESSION_KEY, "not json").await.unwrap();

        let store = AuthStore::new(storage).await.with_latency(Duration::ZERO);
        assert!(!store.is_authenticated().await);
        assert!(store.current_account().await.is_none());
    }

    #[tokio::test]
    async fn test_logout_drops_persisted_snapshot() {
        let storage = Arc::new(MemoryStorage::new());
        let store = AuthStore::new(storage.clone())
            .await
            .with_latency(Duration::ZERO);

        store.login("user@example.com", "user123").await.unwrap();
        assert!(storage.get_item(SESSION_KEY).await.unwrap().is_some());

        store.logout().await;
        assert!(storage.get_item(SESSION_KEY).await.unwrap().is_none());
    }
}
