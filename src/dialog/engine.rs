//! The conversation engine — validates input for the current step,
//! updates the draft, and computes the next transition.

use std::sync::Arc;

use chrono::Local;

use crate::channels::{Keyboard, OutgoingResponse};
use crate::dialog::prompts;
use crate::dialog::session::{Session, SessionStore};
use crate::dialog::step::Step;
use crate::store::EntryStore;

/// Drives per-user entry conversations.
///
/// `handle` returns `None` when the user has no active session and the
/// input is not the begin-entry command — top-level commands are the
/// dispatcher's business, not the engine's.
pub struct DialogEngine {
    sessions: SessionStore,
    store: Arc<dyn EntryStore>,
}

impl DialogEngine {
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self {
            sessions: SessionStore::new(),
            store,
        }
    }

    /// Process one input for one user.
    ///
    /// The per-user slot lock is held for the whole call, including the
    /// commit insert, so same-user inputs can never interleave.
    pub async fn handle(
        &self,
        user_id: &str,
        username: &str,
        text: &str,
    ) -> Option<OutgoingResponse> {
        // Only the begin-entry command may create a slot; other traffic
        // from session-less users takes the early return.
        let slot = match self.sessions.peek(user_id).await {
            Some(slot) => slot,
            None if text == prompts::ADD_ENTRY => self.sessions.slot(user_id).await,
            None => return None,
        };
        let mut guard = slot.lock().await;

        let Some(session) = guard.as_mut() else {
            if text == prompts::ADD_ENTRY {
                *guard = Some(Session::new(username));
                tracing::debug!(user = %user_id, "entry started");
                return Some(step_reply(Step::FIRST));
            }
            // An empty slot means its session just ended; drop it.
            self.sessions.release(user_id).await;
            return None;
        };

        // "back" is recognized at every step, before the step grammar.
        if text == prompts::BACK {
            match session.step.previous() {
                Some(prev) => {
                    session.step = prev;
                    return Some(step_reply(prev));
                }
                None => {
                    // Backward past the first step abandons the draft.
                    *guard = None;
                    self.sessions.release(user_id).await;
                    tracing::debug!(user = %user_id, "entry abandoned");
                    return Some(OutgoingResponse::text(prompts::MAIN_MENU, Keyboard::Main));
                }
            }
        }

        let value = match session.step.parse(text) {
            Ok(value) => value,
            Err(_) => {
                // Session unchanged; re-prompt with the step's own keyboard.
                return Some(OutgoingResponse::text(
                    prompts::invalid_input(session.step),
                    prompts::keyboard(session.step),
                ));
            }
        };

        session.draft.set(session.step, value);

        match session.step.next() {
            Some(next) => {
                session.step = next;
                Some(step_reply(next))
            }
            None => {
                // Final step passed — commit the draft.
                let now = Local::now();
                let Some(entry) = session.draft.to_new_entry(user_id, &session.username, now)
                else {
                    // Incomplete draft at the commit boundary means the
                    // transition table is broken; drop the session rather
                    // than write a bad record.
                    tracing::error!(user = %user_id, "draft incomplete at commit, abandoning");
                    *guard = None;
                    self.sessions.release(user_id).await;
                    return Some(OutgoingResponse::text(
                        prompts::GENERIC_FAILURE,
                        Keyboard::Main,
                    ));
                };

                match self.store.insert_entry(&entry).await {
                    Ok(id) => {
                        tracing::info!(
                            user = %user_id,
                            id,
                            emotion = %entry.emotion,
                            intensity = entry.intensity,
                            "entry committed"
                        );
                        *guard = None;
                        self.sessions.release(user_id).await;
                        Some(OutgoingResponse::text(
                            prompts::confirmation(&entry.emotion, entry.intensity, now),
                            Keyboard::Main,
                        ))
                    }
                    Err(e) => {
                        // Keep the session and draft so the user can retry
                        // the commit by re-sending the same final input.
                        tracing::warn!(user = %user_id, error = %e, "commit failed, draft kept");
                        Some(OutgoingResponse::text(
                            prompts::STORAGE_FAILURE,
                            prompts::keyboard(Step::SelfCommunication),
                        ))
                    }
                }
            }
        }
    }

    /// The step the user's session is currently at, if one exists.
    pub async fn active_step(&self, user_id: &str) -> Option<Step> {
        let slot = self.sessions.peek(user_id).await?;
        let guard = slot.lock().await;
        guard.as_ref().map(|s| s.step)
    }

    /// A snapshot of the user's draft, if a session exists.
    pub async fn draft_snapshot(&self, user_id: &str) -> Option<crate::dialog::Draft> {
        let slot = self.sessions.peek(user_id).await?;
        let guard = slot.lock().await;
        guard.as_ref().map(|s| s.draft.clone())
    }
}

/// Prompt + keyboard reply for entering a step.
fn step_reply(step: Step) -> OutgoingResponse {
    OutgoingResponse::text(prompts::prompt(step), prompts::keyboard(step))
}
