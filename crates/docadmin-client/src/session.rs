//! Session lifecycle: token acquisition, persistence and invalidation.
//!
//! The token lives in exactly one durable slot. It is read once when the
//! [`SessionStore`] is created and written only by [`SessionStore::login`]
//! and [`SessionStore::logout`].

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::api::ApiClient;
use crate::error::AdminError;

/// Fixed identifier of the durable token slot.
pub const SLOT_KEY: &str = "admin_token";

// ── Session ──────────────────────────────────────────────────────────────────

/// An opaque bearer credential. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Authentication state. Being authenticated and holding a non-empty token
/// are the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(Token),
}

impl Session {
    /// Build a session from a raw token; an empty token is anonymous.
    pub fn from_token(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.is_empty() {
            Self::Anonymous
        } else {
            Self::Authenticated(Token(raw))
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(t) => Some(t.as_str()),
        }
    }

    /// `Bearer <token>`, or `None` when anonymous.
    pub fn authorization_header_value(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {t}"))
    }
}

// ── Durable slot ─────────────────────────────────────────────────────────────

/// A single durable key-value entry holding the bearer token as plain text.
pub trait TokenSlot {
    /// `Ok(None)` when nothing is stored.
    fn load(&self) -> io::Result<Option<String>>;
    fn store(&self, token: &str) -> io::Result<()>;
    /// Erasing an empty slot is not an error.
    fn clear(&self) -> io::Result<()>;
}

/// Token slot backed by a file named [`SLOT_KEY`] inside the data directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(SLOT_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenSlot for FileSlot {
    fn load(&self) -> io::Result<Option<String>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let text = String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok((!text.is_empty()).then_some(text))
    }

    fn store(&self, token: &str) -> io::Result<()> {
        std::fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-process slot. Clones share the same entry.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn with_token(token: &str) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(token.to_owned()))),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, value: Option<String>) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

impl TokenSlot for MemorySlot {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.get())
    }

    fn store(&self, token: &str) -> io::Result<()> {
        self.set(Some(token.to_owned()));
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        self.set(None);
        Ok(())
    }
}

// ── SessionStore ─────────────────────────────────────────────────────────────

/// Owns the current [`Session`] and its durable slot.
#[derive(Debug)]
pub struct SessionStore<S> {
    slot: S,
    session: Session,
}

impl<S: TokenSlot> SessionStore<S> {
    /// Read the slot once. Absent or unreadable means anonymous; never fails.
    pub fn load_persisted(slot: S) -> Self {
        let session = match slot.load() {
            Ok(Some(token)) => Session::from_token(token),
            Ok(None) => Session::Anonymous,
            Err(e) => {
                warn!(error = %e, "stored token unreadable; starting logged out");
                Session::Anonymous
            }
        };
        Self { slot, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn authorization_header_value(&self) -> Option<String> {
        self.session.authorization_header_value()
    }

    /// Exchange credentials for a token. Credentials are sent as given.
    ///
    /// On success the token is held in memory and written to the slot before
    /// returning. On any failure the current session is left untouched.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<&Session, AdminError> {
        let token = api.login(email, password).await?;

        if let Err(e) = self.slot.store(&token) {
            warn!(error = %e, "could not persist token; session lasts until exit");
        }
        self.session = Session::from_token(token);
        info!("logged in");
        Ok(&self.session)
    }

    /// Drop the token from memory and the slot. Always succeeds.
    pub fn logout(&mut self) -> &Session {
        self.session = Session::Anonymous;
        if let Err(e) = self.slot.clear() {
            warn!(error = %e, "could not erase stored token");
        }
        info!("logged out");
        &self.session
    }
}
