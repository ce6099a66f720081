use std::{collections::HashMap, sync::Arc};

use axum::http::{header, HeaderMap, HeaderValue};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::domain::ApplicationInput;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::form::{application_from, Field, WidgetValue};

pub const SESSION_COOKIE: &str = "credit_risk_session";

/// Per-visitor form state. Widgets are stored under `"{field}_{reset_epoch}"`,
/// so advancing the epoch makes every field read its default again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    reset_epoch: u64,
    widgets: HashMap<String, WidgetValue>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_epoch(&self) -> u64 {
        self.reset_epoch
    }

    pub fn field_key(&self, field: Field) -> String {
        format!("{}_{}", field.key(), self.reset_epoch)
    }

    pub fn value(&self, field: Field) -> WidgetValue {
        self.widgets
            .get(&self.field_key(field))
            .cloned()
            .unwrap_or_else(|| field.default_value())
    }

    /// Stores a posted value. Unusable text leaves the field unchanged.
    pub fn set(&mut self, field: Field, raw: &str) -> bool {
        match field.parse(raw) {
            Some(value) => {
                let key = self.field_key(field);
                self.widgets.insert(key, value);
                true
            }
            None => {
                debug!(field = field.key(), raw, "ignoring unparseable widget value");
                false
            }
        }
    }

    /// Applies posted form values. Only names matching the current epoch's
    /// storage keys are read, so a page rendered before a reset cannot
    /// write stale values back.
    pub fn apply_form(&mut self, form: &HashMap<String, String>) {
        for field in Field::ALL {
            if let Some(raw) = form.get(&self.field_key(field)) {
                self.set(field, raw);
            }
        }
    }

    pub fn reset(&mut self) {
        self.reset_epoch += 1;
        self.widgets.clear();
    }

    pub fn application(&self) -> ApplicationInput {
        application_from(|field| self.value(field))
    }
}

struct SessionEntry {
    state: Arc<Mutex<SessionState>>,
    last_seen: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Returns the caller's session, creating one for unknown ids. Idle
    /// sessions are evicted on the way.
    pub async fn checkout(&self, id: Option<Uuid>) -> (Uuid, Arc<Mutex<SessionState>>) {
        self.checkout_at(id, Utc::now()).await
    }

    /// Like `checkout`, but never creates a session. Plain page views use
    /// this so cookie-less GETs do not fill the store.
    pub async fn lookup(&self, id: Option<Uuid>) -> Option<(Uuid, Arc<Mutex<SessionState>>)> {
        self.lookup_at(id, Utc::now()).await
    }

    pub(crate) async fn checkout_at(
        &self,
        id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> (Uuid, Arc<Mutex<SessionState>>) {
        let mut sessions = self.sessions.lock().await;
        self.evict_idle(&mut sessions, now);

        if let Some(found) = touch(&mut sessions, id, now) {
            return found;
        }

        let id = Uuid::new_v4();
        let state = Arc::new(Mutex::new(SessionState::new()));
        sessions.insert(
            id,
            SessionEntry {
                state: state.clone(),
                last_seen: now,
            },
        );
        debug!(session_id = %id, "created session");
        (id, state)
    }

    pub(crate) async fn lookup_at(
        &self,
        id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Option<(Uuid, Arc<Mutex<SessionState>>)> {
        let mut sessions = self.sessions.lock().await;
        self.evict_idle(&mut sessions, now);
        touch(&mut sessions, id, now)
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_seen <= self.idle_ttl);
        if sessions.len() < before {
            debug!(evicted = before - sessions.len(), "evicted idle sessions");
        }
    }

    #[cfg(test)]
    pub(crate) async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

fn touch(
    sessions: &mut HashMap<Uuid, SessionEntry>,
    id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Option<(Uuid, Arc<Mutex<SessionState>>)> {
    let id = id?;
    let entry = sessions.get_mut(&id)?;
    entry.last_seen = now;
    Some((id, entry.state.clone()))
}

pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

pub fn session_cookie(id: Uuid) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("credit_risk_session=; Path=/"))
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
