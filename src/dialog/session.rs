//! In-progress entry drafts, keyed by user.
//!
//! A `Session` exists for a user iff that user has started but not yet
//! finished or abandoned an entry — at most one per user. Sessions are
//! in-memory only and do not survive a restart.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::Mutex;

use crate::dialog::step::{Step, StepValue};
use crate::store::NewEntry;

/// A partially-filled record under construction.
///
/// Fields are populated only for steps already passed.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub emotion: Option<String>,
    pub intensity: Option<u8>,
    pub trigger_event: Option<String>,
    pub motivation: Option<String>,
    pub communication_others: Option<String>,
    pub self_communication: Option<String>,
}

impl Draft {
    /// Record a parsed value for a step's field.
    pub fn set(&mut self, step: Step, value: StepValue) {
        match (step, value) {
            (Step::ChoosingEmotion, StepValue::Emotion(e)) => self.emotion = Some(e),
            (Step::Intensity, StepValue::Intensity(n)) => self.intensity = Some(n),
            (Step::TriggerEvent, StepValue::Text(t)) => self.trigger_event = Some(t),
            (Step::Motivation, StepValue::Text(t)) => self.motivation = Some(t),
            (Step::CommunicationOthers, StepValue::Text(t)) => {
                self.communication_others = Some(t)
            }
            (Step::SelfCommunication, StepValue::Text(t)) => self.self_communication = Some(t),
            (step, value) => {
                // Parse results always match their step; reaching this arm
                // means a transition-table bug.
                tracing::error!(%step, ?value, "mismatched step value ignored");
            }
        }
    }

    /// Convert a completed draft into an insertable record, snapshotting
    /// `username` and `timestamp` at commit time. `None` if any field is
    /// still unset.
    pub fn to_new_entry(
        &self,
        user_id: &str,
        username: &str,
        at: DateTime<Local>,
    ) -> Option<NewEntry> {
        Some(NewEntry {
            user_id: user_id.to_string(),
            username: username.to_string(),
            emotion: self.emotion.clone()?,
            intensity: self.intensity?,
            trigger_event: self.trigger_event.clone()?,
            motivation: self.motivation.clone()?,
            communication_others: self.communication_others.clone()?,
            self_communication: self.self_communication.clone()?,
            timestamp: at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }
}

/// One user's in-progress entry.
#[derive(Debug, Clone)]
pub struct Session {
    /// Display label snapshot from the transport; may change over time.
    pub username: String,
    pub step: Step,
    pub draft: Draft,
}

impl Session {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            step: Step::FIRST,
            draft: Draft::default(),
        }
    }
}

/// Per-user session slots.
///
/// Each user gets an `Arc<Mutex<Option<Session>>>` slot; the engine holds
/// the slot lock for the whole of a `handle` call, so concurrent inputs
/// from one user are processed strictly sequentially while different
/// users proceed independently. The outer map lock is held only long
/// enough to clone the slot handle.
pub struct SessionStore {
    slots: Mutex<HashMap<String, Arc<Mutex<Option<Session>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Get (or create) the slot for a user.
    pub async fn slot(&self, user_id: &str) -> Arc<Mutex<Option<Session>>> {
        let mut slots = self.slots.lock().await;
        Arc::clone(
            slots
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(None))),
        )
    }

    /// Look up a user's slot without creating one.
    pub async fn peek(&self, user_id: &str) -> Option<Arc<Mutex<Option<Session>>>> {
        let slots = self.slots.lock().await;
        slots.get(user_id).cloned()
    }

    /// Drop a user's slot. Called when a session ends so the map does not
    /// accumulate empty entries; `slot` recreates on demand. Relies on
    /// same-user calls being sequential — the caller still holds the slot
    /// lock, so no concurrent call can be mid-flight on this slot.
    pub async fn release(&self, user_id: &str) {
        let mut slots = self.slots.lock().await;
        slots.remove(user_id);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
