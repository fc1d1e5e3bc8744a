//! # Session Management
//!
//! Holds the bearer token, reads its claims, and logs the operator out
//! after a period of inactivity.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Session Lifecycle                               │
//! │                                                                         │
//! │  login ──► begin(token) ──► decode claims (exp) ──► TokenStore::save   │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │  every request ──► bearer() ──► past deadline? ──yes──► end()          │
//! │                                   │ no                                  │
//! │                                   ▼                                     │
//! │                          touch last_activity                            │
//! │                                                                         │
//! │  deadline = min(token expiry, last_activity + idle timeout)            │
//! │                                                                         │
//! │  spawn_idle_logout ──► sleep_until(deadline) ──► re-check ──► end()    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persistence
//! The token store is written only while the state lock is held, so a
//! concurrent `end()` can never be followed by a save of the token it
//! just cleared.
//!
//! ## Token Decoding
//! The token is decoded locally only to read its claims. The signature is
//! NOT verified here; the API verifies it on every request.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::token_store::{StoredToken, TokenStore};

// =============================================================================
// Claims
// =============================================================================

/// Claims read from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the operator's login.
    pub sub: String,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Claims {
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        self.exp <= now_unix
    }

    /// Seconds left before expiry, zero when already expired.
    pub fn remaining_at(&self, now_unix: i64) -> Duration {
        Duration::from_secs(self.exp.saturating_sub(now_unix).max(0) as u64)
    }
}

/// Decodes the token's claims without verifying its signature.
///
/// ## Errors
/// `InvalidToken` when the token is not a JWT or has no `exp` claim.
pub fn decode_claims(token: &str) -> ApiResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| ApiError::InvalidToken(e.to_string()))
}

// =============================================================================
// Session State
// =============================================================================

/// A live session.
#[derive(Debug, Clone)]
pub struct SessionState {
    token: String,
    claims: Claims,
    expires_at: Instant,
    last_activity: Instant,
}

impl SessionState {
    /// Builds the state for a token whose claims are known.
    ///
    /// `now_unix` and `now` are the same moment on the wall clock and the
    /// monotonic clock.
    pub fn new(token: String, claims: Claims, now_unix: i64, now: Instant) -> Self {
        let expires_at = now + claims.remaining_at(now_unix);
        SessionState {
            token,
            claims,
            expires_at,
            last_activity: now,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// Records activity at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.last_activity = self.last_activity.max(now);
    }

    /// Earlier of token expiry and `last_activity + idle`.
    pub fn deadline(&self, idle: Duration) -> Instant {
        self.expires_at.min(self.last_activity + idle)
    }

    pub fn is_over(&self, now: Instant, idle: Duration) -> bool {
        now >= self.deadline(idle)
    }
}

// =============================================================================
// Session Handle
// =============================================================================

struct SessionInner {
    state: RwLock<Option<SessionState>>,
    store: Arc<dyn TokenStore>,
    idle: Duration,
}

/// Shared session handle. Clones refer to the same session.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("idle", &self.inner.idle).finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>, idle: Duration) -> Self {
        Session {
            inner: Arc::new(SessionInner {
                state: RwLock::new(None),
                store,
                idle,
            }),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.inner.idle
    }

    /// Starts a session with a freshly issued token and persists it.
    pub async fn begin(&self, token: String) -> ApiResult<Claims> {
        let claims = decode_claims(&token)?;
        let now = Utc::now();
        if claims.is_expired_at(now.timestamp()) {
            return Err(ApiError::InvalidToken("token is already expired".to_string()));
        }

        let mut guard = self.inner.state.write().await;
        self.inner.store.save(&StoredToken::new(token.clone(), now))?;
        *guard = Some(SessionState::new(token, claims.clone(), now.timestamp(), Instant::now()));
        drop(guard);

        info!(sub = %claims.sub, "Session started");
        Ok(claims)
    }

    /// Resumes the persisted session if it is neither expired nor idle.
    ///
    /// A stale or unreadable stored token is cleared.
    pub async fn restore(&self) -> ApiResult<Option<Claims>> {
        let Some(stored) = self.inner.store.load()? else {
            return Ok(None);
        };
        let now = Utc::now();

        if stored.is_stale(now, self.inner.idle) {
            info!("Stored session was idle too long, discarding it");
            self.inner.store.clear()?;
            return Ok(None);
        }

        let claims = match decode_claims(&stored.token) {
            Ok(claims) if !claims.is_expired_at(now.timestamp()) => claims,
            Ok(_) => {
                info!("Stored token has expired, discarding it");
                self.inner.store.clear()?;
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "Stored token is unreadable, discarding it");
                self.inner.store.clear()?;
                return Ok(None);
            }
        };

        let instant_now = Instant::now();
        let idle_for = now
            .signed_duration_since(stored.last_activity)
            .to_std()
            .unwrap_or_default();
        let mut state = SessionState::new(stored.token, claims.clone(), now.timestamp(), instant_now);
        state.last_activity = instant_now.checked_sub(idle_for).unwrap_or(instant_now);
        *self.inner.state.write().await = Some(state);

        debug!(sub = %claims.sub, "Session restored");
        Ok(Some(claims))
    }

    /// Returns the token for an authenticated request and records activity.
    ///
    /// ## Errors
    /// - `NotLoggedIn` without a session
    /// - `SessionExpired` once the deadline has passed (the session is ended)
    pub async fn bearer(&self) -> ApiResult<String> {
        let now = Instant::now();
        let mut guard = self.inner.state.write().await;
        let Some(state) = guard.as_mut() else {
            return Err(ApiError::NotLoggedIn);
        };
        if state.is_over(now, self.inner.idle) {
            *guard = None;
            self.clear_store();
            drop(guard);
            info!("Session expired");
            return Err(ApiError::SessionExpired);
        }
        state.touch(now);
        let token = state.token.clone();

        if let Err(e) = self.inner.store.save(&StoredToken::new(token.clone(), Utc::now())) {
            warn!(error = %e, "Could not persist session activity");
        }
        drop(guard);
        Ok(token)
    }

    /// Ends the session and forgets the stored token.
    pub async fn end(&self) -> ApiResult<()> {
        let mut guard = self.inner.state.write().await;
        let had_session = guard.take().is_some();
        self.inner.store.clear()?;
        drop(guard);
        if had_session {
            info!("Session ended");
        }
        Ok(())
    }

    /// Ends the session if its deadline has passed. Returns whether it did.
    pub async fn expire_if_due(&self) -> bool {
        let mut guard = self.inner.state.write().await;
        let due = guard
            .as_ref()
            .is_some_and(|s| s.is_over(Instant::now(), self.inner.idle));
        if due {
            *guard = None;
            self.clear_store();
        }
        due
    }

    pub async fn claims(&self) -> Option<Claims> {
        self.inner.state.read().await.as_ref().map(|s| s.claims.clone())
    }

    pub async fn deadline(&self) -> Option<Instant> {
        self.inner
            .state
            .read()
            .await
            .as_ref()
            .map(|s| s.deadline(self.inner.idle))
    }

    pub async fn is_active(&self) -> bool {
        self.inner
            .state
            .read()
            .await
            .as_ref()
            .is_some_and(|s| !s.is_over(Instant::now(), self.inner.idle))
    }

    fn clear_store(&self) {
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "Could not clear stored token");
        }
    }
}

/// Watches the session and ends it once its deadline passes without
/// activity. The task stops when the session ends for any reason.
pub fn spawn_idle_logout(session: Session) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let Some(deadline) = session.deadline().await else {
                debug!("No session, idle watcher stopping");
                return;
            };
            tokio::time::sleep_until(deadline).await;
            if session.expire_if_due().await {
                info!("Logged out after inactivity");
                return;
            }
        }
    })
}
