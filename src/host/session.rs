//! Per-call global data sessions
//!
//! Each call session owns its global data behind an async mutex, so merges
//! for one call are serialized and applied whole. Distinct calls never
//! contend with each other beyond the map lookup.
//!
//! Ended sessions are kept for a retention window so late invocations can be
//! refused, then dropped by the sweeper.

use crate::result::GlobalStateMerge;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// State shared by every function invocation of one call
pub struct CallSession {
    call_id: String,
    global_data: Mutex<Map<String, Value>>,
    /// Set once, when the call ends
    ended_at: OnceLock<Instant>,
}

impl CallSession {
    fn new(call_id: String) -> Self {
        Self {
            call_id,
            global_data: Mutex::new(Map::new()),
            ended_at: OnceLock::new(),
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// Apply a patch atomically; later keys overwrite earlier ones
    pub async fn apply_patch(&self, patch: &GlobalStateMerge) {
        if patch.is_empty() {
            return;
        }
        let mut data = self.global_data.lock().await;
        for (key, value) in patch.as_map() {
            data.insert(key.clone(), value.clone());
        }
        tracing::debug!(call_id = %self.call_id, keys = patch.len(), "Global data merged");
    }

    pub async fn global_data(&self) -> Map<String, Value> {
        self.global_data.lock().await.clone()
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.get().is_some()
    }

    /// Mark the call ended. Returns false if it had already ended.
    pub fn end(&self) -> bool {
        self.ended_at.set(Instant::now()).is_ok()
    }

    fn ended_longer_than(&self, retention: Duration) -> bool {
        self.ended_at
            .get()
            .is_some_and(|at| at.elapsed() >= retention)
    }
}

/// All known call sessions, keyed by call id
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<CallSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, call_id: &str) -> Option<Arc<CallSession>> {
        self.sessions.read().await.get(call_id).cloned()
    }

    pub async fn get_or_create(&self, call_id: &str) -> Arc<CallSession> {
        if let Some(session) = self.get(call_id).await {
            return session;
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(call_id.to_string())
            .or_insert_with(|| {
                tracing::info!(call_id = %call_id, "Call session started");
                Arc::new(CallSession::new(call_id.to_string()))
            })
            .clone()
    }

    /// End a call. Ended sessions stay known so late invocations are refused.
    ///
    /// Returns false if the call was unknown or had already ended.
    pub async fn end(&self, call_id: &str) -> bool {
        let Some(session) = self.get(call_id).await else {
            return false;
        };
        let ended = session.end();
        if ended {
            tracing::info!(call_id = %call_id, "Call session ended");
        }
        ended
    }

    /// Drop a session outright, ended or not
    pub async fn remove(&self, call_id: &str) -> bool {
        self.sessions.write().await.remove(call_id).is_some()
    }

    /// Forget sessions that ended at least `retention` ago, returning how
    /// many were dropped
    pub async fn purge_ended(&self, retention: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.ended_longer_than(retention));
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!(purged, remaining = sessions.len(), "Ended call sessions purged");
        }
        purged
    }

    /// Purge ended sessions every `every` until `shutdown` is cancelled
    pub fn spawn_sweeper(
        self: Arc<Self>,
        every: Duration,
        retention: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        self.purge_ended(retention).await;
                    }
                }
            }
            tracing::debug!("Session sweeper stopped");
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
