//! In-memory session store
//!
//! Single owner of all session state. Every operation takes the one store-wide
//! lock, so at most one request mutates a given session at a time and the
//! expiry sweep always sees a consistent map.
//!
//! Time and randomness are injected by the caller:
//! - `now` decides expiry
//! - `rng` picks categories and fresh ids
//!
//! Category selection happens before the lock is taken.

use crate::catalog::{Catalog, Category};
use crate::error::WordhintError;
use crate::session::{ReplaceReason, Session};
use crate::types::{GameConfig, SessionId};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::Rng;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Arc;

/// Session id chosen for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSessionId {
    /// Id to use for the request
    pub id: SessionId,
    /// True when the request carried no cookie and the id must be set on the response
    pub assigned: bool,
}

#[derive(Debug, Default)]
struct StoreInner {
    sessions: HashMap<SessionId, Session>,
    /// Preloaded ids not yet handed out, in preload order
    unclaimed: VecDeque<SessionId>,
}

impl StoreInner {
    fn live_session<'a>(
        &'a mut self,
        id: &SessionId,
        candidate: Arc<Category>,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
        config: &GameConfig,
    ) -> &'a mut Session {
        match self.sessions.entry(id.clone()) {
            Entry::Occupied(mut entry) => {
                if let Some(reason) = entry.get().replace_reason(now, config) {
                    log_replacement(id, reason, &candidate);
                    entry.insert(Session::new(candidate, expires_at));
                }
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                log_replacement(id, ReplaceReason::Missing, &candidate);
                entry.insert(Session::new(candidate, expires_at))
            }
        }
    }

    fn claim_preloaded(&mut self, now: DateTime<Utc>) -> Option<SessionId> {
        while let Some(id) = self.unclaimed.pop_front() {
            match self.sessions.get(&id) {
                Some(session) if !session.is_expired(now) => return Some(id),
                _ => tracing::debug!(session_id = %id, "Skipping stale preloaded session"),
            }
        }
        None
    }
}

fn log_replacement(id: &SessionId, reason: ReplaceReason, category: &Category) {
    tracing::debug!(
        session_id = %id,
        %reason,
        category = %category.name,
        "Starting new session"
    );
}

/// Store of live sessions keyed by cookie id
#[derive(Debug)]
pub struct SessionStore {
    catalog: Arc<Catalog>,
    config: GameConfig,
    inner: Mutex<StoreInner>,
}

impl SessionStore {
    /// Create an empty store over `catalog`
    #[inline]
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: GameConfig) -> Self {
        Self {
            catalog,
            config,
            inner: Mutex::new(StoreInner::default()),
        }
    }

    /// Validate `config`, load the catalog at `path` and create an empty store
    ///
    /// # Errors
    /// - `WordhintError::Config` if the game policy is invalid
    /// - `WordhintError::Catalog` if the category data cannot be loaded
    pub fn open(path: impl AsRef<Path>, config: GameConfig) -> Result<Self, WordhintError> {
        config.validate()?;
        let catalog = Catalog::from_path(path)?;
        Ok(Self::new(Arc::new(catalog), config))
    }

    /// Game policy in force
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Category catalog sessions are drawn from
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the live session for `id`, replacing it if missing, expired, won or
    /// exhausted
    pub fn get<R: Rng + ?Sized>(&self, id: &SessionId, now: DateTime<Utc>, rng: &mut R) -> Session {
        self.update(id, now, rng, |session| session.clone())
    }

    /// Get-or-replace the session for `id`, then run `f` on it under the same
    /// lock acquisition
    pub fn update<R, T, F>(&self, id: &SessionId, now: DateTime<Utc>, rng: &mut R, f: F) -> T
    where
        R: Rng + ?Sized,
        F: FnOnce(&mut Session) -> T,
    {
        let candidate = self.catalog.pick(rng);
        let expires_at = now + self.config.session_ttl();

        let mut inner = self.inner.lock();
        let session = inner.live_session(id, candidate, expires_at, now, &self.config);
        f(session)
    }

    /// Insert or overwrite the session for `id`
    pub fn put(&self, id: SessionId, session: Session) {
        self.inner.lock().sessions.insert(id, session);
    }

    /// Current session for `id` without replacement
    #[must_use]
    pub fn peek(&self, id: &SessionId) -> Option<Session> {
        self.inner.lock().sessions.get(id).cloned()
    }

    /// Remove every session that expired strictly before `now`
    ///
    /// Returns the number of sessions removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.sessions.len();

        inner.sessions.retain(|id, session| {
            let keep = !session.is_expired(now);
            if !keep {
                tracing::debug!(session_id = %id, "Session expired and removed");
            }
            keep
        });
        let StoreInner {
            sessions,
            unclaimed,
        } = &mut *inner;
        unclaimed.retain(|id| sessions.contains_key(id));

        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "Swept expired sessions");
        }
        removed
    }

    /// Create up to `count` reserved sessions `preloaded-1..=preloaded-count`
    /// on distinct, shuffled categories
    ///
    /// Ids whose session is still live are left untouched, whether or not
    /// they have been claimed. Returns the ids created, in order.
    pub fn preload<R: Rng + ?Sized>(
        &self,
        count: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<SessionId> {
        let categories = self.catalog.shuffled(rng);
        let expires_at = now + self.config.session_ttl();

        let mut inner = self.inner.lock();
        let mut ids = Vec::with_capacity(count.min(categories.len()));
        for (i, category) in categories.into_iter().take(count).enumerate() {
            let id = SessionId::preloaded(i + 1);
            if inner
                .sessions
                .get(&id)
                .is_some_and(|session| !session.is_expired(now))
            {
                tracing::debug!(session_id = %id, "Preloaded session still live, skipping");
                continue;
            }
            tracing::info!(session_id = %id, category = %category.name, "Preloaded session");
            tracing::debug!(session_id = %id, keyword = %category.keyword, "Preloaded keyword");

            inner
                .sessions
                .insert(id.clone(), Session::new(category, expires_at));
            if !inner.unclaimed.contains(&id) {
                inner.unclaimed.push_back(id.clone());
            }
            ids.push(id);
        }
        ids
    }

    /// Hand out the first unexpired preloaded id not yet claimed
    pub fn claim_preloaded(&self, now: DateTime<Utc>) -> Option<SessionId> {
        self.inner.lock().claim_preloaded(now)
    }

    /// Choose the session id for a request
    ///
    /// An existing non-empty cookie value is used as is. Otherwise a preloaded
    /// id is claimed, falling back to a fresh random id not currently in use.
    pub fn resolve_session_id<R: Rng + ?Sized>(
        &self,
        cookie: Option<&str>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> ResolvedSessionId {
        if let Some(value) = cookie.filter(|v| !v.is_empty()) {
            return ResolvedSessionId {
                id: SessionId::new(value),
                assigned: false,
            };
        }

        let mut inner = self.inner.lock();
        let id = match inner.claim_preloaded(now) {
            Some(id) => id,
            None => loop {
                let id = SessionId::random(rng);
                if !inner.sessions.contains_key(&id) {
                    break id;
                }
            },
        };
        tracing::debug!(session_id = %id, "Assigned session id");
        ResolvedSessionId { id, assigned: true }
    }

    /// Whether a session is stored under `id`
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &SessionId) -> bool {
        self.inner.lock().sessions.contains_key(id)
    }

    /// Number of stored sessions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    /// Whether the store holds no sessions
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().sessions.is_empty()
    }
}
