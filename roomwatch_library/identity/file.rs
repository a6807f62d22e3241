//! Identity provider backed by files in the user's state directory
//!
//! Accounts live in `users.yaml` with argon2 password hashes. The signed-in
//! session is kept in `session.yaml` so it survives between CLI runs.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use roomwatch_core::config::config_dir;
use roomwatch_core::error::{AuthError, AuthResult};
use roomwatch_core::ports::{is_valid_email, IdentityProvider, Session, MIN_PASSWORD_LEN};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{debug, info, warn};

const USERS_FILE: &str = "users.yaml";
const SESSION_FILE: &str = "session.yaml";
const USER_ID_LEN: usize = 28;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    uid: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UserDb {
    #[serde(default)]
    users: Vec<UserRecord>,
}

/// File-backed identity provider
pub struct FileIdentity {
    dir: PathBuf,
    users: Mutex<UserDb>,
    session: watch::Sender<Option<Session>>,
}

impl FileIdentity {
    /// Open the provider rooted at `dir`, creating it if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> AuthResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(storage)?;

        let users = read_yaml::<UserDb>(&dir.join(USERS_FILE))?.unwrap_or_default();
        let session = read_yaml::<Session>(&dir.join(SESSION_FILE))?;
        // A session for a deleted account is not a session
        let session = session.filter(|s| users.users.iter().any(|u| u.uid == s.user_id));
        debug!(
            "Opened identity store at {} ({} users)",
            dir.display(),
            users.users.len()
        );

        Ok(Self {
            dir,
            users: Mutex::new(users),
            session: watch::channel(session).0,
        })
    }

    /// Open the provider in `~/.roomwatch`
    pub fn open_default() -> AuthResult<Self> {
        let dir = config_dir()
            .ok_or_else(|| AuthError::Storage("Could not determine home directory".to_string()))?;
        Self::open(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().users.len()
    }

    fn start_session(&self, record: &UserRecord) -> AuthResult<Session> {
        let session = Session::new(&record.uid, &record.email);
        write_yaml(&self.dir.join(SESSION_FILE), &session)?;
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }
}

impl IdentityProvider for FileIdentity {
    fn sign_in(&self, email: &str, password: &str) -> AuthResult<Session> {
        let email = canonical_email(email)?;
        let record = self
            .users
            .lock()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(AuthError::UserNotFound)?;

        let parsed = PasswordHash::new(&record.password_hash)
            .map_err(|e| AuthError::Storage(format!("Corrupt password hash: {}", e)))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            warn!("Failed sign-in for {}", email);
            return Err(AuthError::WrongPassword);
        }

        info!("Signed in as {}", email);
        self.start_session(&record)
    }

    fn create_account(&self, email: &str, password: &str) -> AuthResult<Session> {
        let email = canonical_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
        }

        let record = {
            let mut users = self.users.lock();
            if users.users.iter().any(|u| u.email == email) {
                return Err(AuthError::EmailAlreadyInUse);
            }
            let salt = SaltString::generate(&mut OsRng);
            let password_hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| AuthError::Storage(format!("Failed to hash password: {}", e)))?
                .to_string();
            let record = UserRecord {
                uid: new_user_id(),
                email,
                password_hash,
                created_at: Utc::now(),
            };
            users.users.push(record.clone());
            if let Err(e) = write_yaml(&self.dir.join(USERS_FILE), &*users) {
                users.users.pop();
                return Err(e);
            }
            record
        };

        info!("Created account {}", record.email);
        self.start_session(&record)
    }

    fn sign_out(&self) -> AuthResult<()> {
        let path = self.dir.join(SESSION_FILE);
        if path.exists() {
            std::fs::remove_file(&path).map_err(storage)?;
        }
        if self.session.send_replace(None).is_some() {
            info!("Signed out");
        }
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn session_changes(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}

fn canonical_email(email: &str) -> AuthResult<String> {
    if !is_valid_email(email) {
        return Err(AuthError::InvalidEmail);
    }
    Ok(email.trim().to_lowercase())
}

fn new_user_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(USER_ID_LEN)
        .map(char::from)
        .collect()
}

fn storage(e: std::io::Error) -> AuthError {
    AuthError::Storage(e.to_string())
}

fn read_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> AuthResult<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).map_err(storage)?;
    serde_yaml::from_str(&text)
        .map(Some)
        .map_err(|e| AuthError::Storage(format!("{}: {}", path.display(), e)))
}

fn write_yaml<T: Serialize>(path: &Path, value: &T) -> AuthResult<()> {
    let text = serde_yaml::to_string(value).map_err(|e| AuthError::Storage(e.to_string()))?;
    std::fs::write(path, text).map_err(storage)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> (tempfile::TempDir, FileIdentity) {
        let dir = tempfile::tempdir().unwrap();
        let identity = FileIdentity::open(dir.path()).unwrap();
        (dir, identity)
    }

    #[test]
    fn test_signup_then_login() {
        let (_dir, identity) = provider();
        let created = identity.create_account("Warden@Hostel.test", "secret1").unwrap();
        assert_eq!(created.email, "warden@hostel.test");
        assert_eq!(created.user_id.len(), USER_ID_LEN);

        identity.sign_out().unwrap();
        assert!(identity.current_session().is_none());

        let session = identity.sign_in("warden@hostel.test", "secret1").unwrap();
        assert_eq!(session.user_id, created.user_id);
    }

    #[test]
    fn test_signup_errors() {
        let (_dir, identity) = provider();
        assert_eq!(
            identity.create_account("not-an-email", "secret1"),
            Err(AuthError::InvalidEmail)
        );
        assert_eq!(
            identity.create_account("a@b.com", "12345"),
            Err(AuthError::WeakPassword(6))
        );
        identity.create_account("a@b.com", "123456").unwrap();
        assert_eq!(
            identity.create_account("A@B.com", "abcdef"),
            Err(AuthError::EmailAlreadyInUse)
        );
    }

    #[test]
    fn test_login_errors() {
        let (_dir, identity) = provider();
        identity.create_account("a@b.com", "123456").unwrap();
        assert_eq!(identity.sign_in("c@d.com", "123456"), Err(AuthError::UserNotFound));
        assert_eq!(identity.sign_in("a@b.com", "654321"), Err(AuthError::WrongPassword));
        assert_eq!(identity.sign_in("a@", "123456"), Err(AuthError::InvalidEmail));
    }

    #[test]
    fn test_session_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        {
            let identity = FileIdentity::open(dir.path()).unwrap();
            identity.create_account("a@b.com", "123456").unwrap();
        }
        let reopened = FileIdentity::open(dir.path()).unwrap();
        assert_eq!(reopened.user_count(), 1);
        assert_eq!(
            reopened.current_session().map(|s| s.email),
            Some("a@b.com".to_string())
        );

        reopened.sign_out().unwrap();
        let again = FileIdentity::open(dir.path()).unwrap();
        assert!(again.current_session().is_none());
    }

    #[test]
    fn test_session_changes_observed() {
        let (_dir, identity) = provider();
        let mut changes = identity.session_changes();
        assert!(changes.borrow_and_update().is_none());

        identity.create_account("a@b.com", "123456").unwrap();
        assert!(changes.has_changed().unwrap());
        assert!(changes.borrow_and_update().is_some());

        identity.sign_out().unwrap();
        assert!(changes.borrow_and_update().is_none());
    }
}
