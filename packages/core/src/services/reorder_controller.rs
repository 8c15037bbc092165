//! Reorder Controller - Drag-and-Drop to Relative Moves
//!
//! Client-side state machine that turns a drag gesture into a
//! [`ReorderIntent`], shows the move optimistically, and reconciles with the
//! store's answer.
//!
//! # States
//!
//! ```text
//! Idle -> Dragging -> Committing -> { Reconciled | RolledBack }
//! ```
//!
//! The controller never talks to the store itself. [`ReorderController::update`]
//! takes an event and returns the effects the caller must carry out
//! (`Submit`, `Render`, `Refetch`, `Notify`); results come back in as
//! `CommitSucceeded` / `CommitFailed` / `Refreshed` events.
//!
//! # Ordering of responses
//!
//! Every submit gets a fresh token. Only the newest token per item is honored;
//! responses for superseded tokens are dropped. Successes carrying a shelf
//! version older than the controller's are dropped as well, so a late success
//! cannot overwrite a newer refresh.

use crate::db::order;
use crate::models::{PositionKey, ReorderIntent, ReorderOutcome, Shelf};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Monotonically increasing request token
pub type CommitToken = u64;

/// Gesture and commit state
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerState {
    Idle,

    /// A drag is in progress; `provisional` is UI feedback only
    Dragging {
        item_id: String,
        source_index: usize,
        provisional: Vec<String>,
    },

    /// The latest drop was submitted and awaits the store's answer
    Committing {
        item_id: String,
        token: CommitToken,
        intent: ReorderIntent,
        optimistic: Vec<String>,
    },

    /// Local order matches the store at `version`
    Reconciled { version: u64 },

    /// The latest commit failed and the optimistic move was undone
    RolledBack { reason: String },
}

/// Why a commit did not go through
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommitFailure {
    /// Shelf changed under the client
    #[error("Shelf changed while moving: {0}")]
    Conflict(String),

    /// Item or shelf is gone
    #[error("Item no longer exists: {0}")]
    NotFound(String),

    /// Any other refusal (transport, validation)
    #[error("Move rejected: {0}")]
    Rejected(String),
}

impl CommitFailure {
    /// Whether the local copy of the shelf is known to be stale
    pub fn needs_refetch(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::NotFound(_))
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    DragStart { index: usize },
    DragOver { index: usize },
    Drop { index: usize },
    DragEnd,
    CommitSucceeded {
        token: CommitToken,
        outcome: ReorderOutcome,
    },
    CommitFailed {
        token: CommitToken,
        failure: CommitFailure,
    },
    /// Fresh authoritative positions fetched from the store
    Refreshed {
        positions: HashMap<String, PositionKey>,
        version: u64,
    },
}

/// Work the caller performs on the controller's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Submit {
        token: CommitToken,
        intent: ReorderIntent,
    },
    /// Show this order
    Render(Vec<String>),
    /// Fetch the shelf and feed it back as `Refreshed`
    Refetch,
    /// Non-blocking user notification
    Notify(String),
}

pub struct ReorderController {
    shelf_id: String,
    state: ControllerState,
    committed: HashMap<String, PositionKey>,
    version: u64,
    displayed: Vec<String>,
    next_token: CommitToken,
    latest_tokens: HashMap<String, CommitToken>,
    in_flight: BTreeMap<CommitToken, ReorderIntent>,
}

impl ReorderController {
    /// Start from a fetched shelf snapshot
    pub fn new(shelf: &Shelf) -> Self {
        Self::from_positions(
            shelf.id.clone(),
            shelf.item_positions().clone(),
            shelf.version,
        )
    }

    pub fn from_positions(
        shelf_id: impl Into<String>,
        positions: HashMap<String, PositionKey>,
        version: u64,
    ) -> Self {
        let displayed = order(&positions);
        Self {
            shelf_id: shelf_id.into(),
            state: ControllerState::Idle,
            committed: positions,
            version,
            displayed,
            next_token: 0,
            latest_tokens: HashMap::new(),
            in_flight: BTreeMap::new(),
        }
    }

    pub fn shelf_id(&self) -> &str {
        &self.shelf_id
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Last shelf version acknowledged by the store
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Order currently shown, including optimistic moves still in flight
    pub fn displayed_order(&self) -> &[String] {
        &self.displayed
    }

    /// Last known authoritative positions
    pub fn committed_positions(&self) -> &HashMap<String, PositionKey> {
        &self.committed
    }

    pub fn has_pending_commits(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn on_drag_start(&mut self, index: usize) -> Vec<Effect> {
        self.update(ControllerEvent::DragStart { index })
    }

    pub fn on_drag_over(&mut self, index: usize) -> Vec<Effect> {
        self.update(ControllerEvent::DragOver { index })
    }

    pub fn on_drop(&mut self, index: usize) -> Vec<Effect> {
        self.update(ControllerEvent::Drop { index })
    }

    pub fn on_drag_end(&mut self) -> Vec<Effect> {
        self.update(ControllerEvent::DragEnd)
    }

    /// Feed one event through the state machine
    pub fn update(&mut self, event: ControllerEvent) -> Vec<Effect> {
        let state = std::mem::replace(&mut self.state, ControllerState::Idle);
        let (next, effects) = self.transition(state, event);
        self.state = next;
        effects
    }

    fn transition(
        &mut self,
        state: ControllerState,
        event: ControllerEvent,
    ) -> (ControllerState, Vec<Effect>) {
        match (state, event) {
            (state, ControllerEvent::DragStart { index }) => match self.displayed.get(index) {
                Some(item_id) => (
                    ControllerState::Dragging {
                        item_id: item_id.clone(),
                        source_index: index,
                        provisional: self.displayed.clone(),
                    },
                    Vec::new(),
                ),
                None => (state, Vec::new()),
            },

            (
                ControllerState::Dragging {
                    item_id,
                    source_index,
                    ..
                },
                ControllerEvent::DragOver { index },
            ) => {
                let provisional = splice(&self.displayed, source_index, index);
                (
                    ControllerState::Dragging {
                        item_id,
                        source_index,
                        provisional: provisional.clone(),
                    },
                    vec![Effect::Render(provisional)],
                )
            }

            (ControllerState::Dragging { item_id, .. }, ControllerEvent::Drop { index }) => {
                self.drop_item(item_id, index)
            }

            (ControllerState::Dragging { .. }, ControllerEvent::DragEnd) => (
                ControllerState::Idle,
                vec![Effect::Render(self.displayed.clone())],
            ),

            (state, ControllerEvent::CommitSucceeded { token, outcome }) => {
                self.reconcile(state, token, outcome)
            }

            (state, ControllerEvent::CommitFailed { token, failure }) => {
                self.roll_back(state, token, failure)
            }

            (state, ControllerEvent::Refreshed { positions, version }) => {
                if version < self.version {
                    tracing::debug!(
                        "Ignoring refresh of shelf '{}' at v{} (have v{})",
                        self.shelf_id,
                        version,
                        self.version
                    );
                    return (state, Vec::new());
                }
                self.committed = positions;
                self.version = version;
                self.recompute_displayed();
                let effects = self.render_unless_dragging(&state);
                (state, effects)
            }

            // Gesture events outside a drag
            (state, _) => (state, Vec::new()),
        }
    }

    /// Turn a drop at `index` into a submitted intent
    ///
    /// Drag and drop indexes refer to the displayed order, so the slot and its
    /// neighbor are resolved there. A drop that lands where the item already
    /// shows is only skipped when nothing is in flight for that item;
    /// otherwise it is submitted to supersede the older request.
    fn drop_item(&mut self, item_id: String, index: usize) -> (ControllerState, Vec<Effect>) {
        let current = self
            .displayed
            .iter()
            .position(|id| *id == item_id)
            .filter(|_| self.committed.contains_key(&item_id));
        let Some(current) = current else {
            return (
                ControllerState::Idle,
                vec![Effect::Render(self.displayed.clone()), Effect::Refetch],
            );
        };

        let rest: Vec<&String> = self.displayed.iter().filter(|id| **id != item_id).collect();
        let target = index.min(rest.len());

        let intent = if target == 0 {
            ReorderIntent::to_head(item_id.as_str())
        } else if target == rest.len() {
            ReorderIntent::to_tail(item_id.as_str())
        } else {
            ReorderIntent::after(item_id.as_str(), rest[target - 1].as_str())
        };

        if let Some(reference) = intent.reference_item_id.as_deref() {
            if !self.committed.contains_key(reference) {
                tracing::debug!(
                    "Drop of '{}' references unknown item '{}'",
                    item_id,
                    reference
                );
                return (
                    ControllerState::Idle,
                    vec![Effect::Render(self.displayed.clone()), Effect::Refetch],
                );
            }
        }

        let pending = self.latest_tokens.contains_key(&item_id);
        if target == current && !pending {
            tracing::debug!("Drop of '{}' leaves order unchanged", item_id);
            return (
                ControllerState::Idle,
                vec![Effect::Render(self.displayed.clone())],
            );
        }

        self.next_token += 1;
        let token = self.next_token;
        self.latest_tokens.insert(item_id.clone(), token);
        self.in_flight.insert(token, intent.clone());
        self.recompute_displayed();

        let optimistic = self.displayed.clone();
        (
            ControllerState::Committing {
                item_id,
                token,
                intent: intent.clone(),
                optimistic: optimistic.clone(),
            },
            vec![Effect::Render(optimistic), Effect::Submit { token, intent }],
        )
    }

    fn reconcile(
        &mut self,
        state: ControllerState,
        token: CommitToken,
        outcome: ReorderOutcome,
    ) -> (ControllerState, Vec<Effect>) {
        let Some(intent) = self.take_latest(token) else {
            return (state, Vec::new());
        };

        if outcome.version < self.version {
            tracing::warn!(
                "Discarding stale success for '{}' on shelf '{}' (v{} < v{})",
                intent.item_id,
                self.shelf_id,
                outcome.version,
                self.version
            );
            self.recompute_displayed();
            let effects = self.render_unless_dragging(&state);
            let version = self.version;
            return (
                self.settle(state, token, ControllerState::Reconciled { version }),
                effects,
            );
        }

        // Someone else committed in between; our key set is incomplete
        let missed_commits = outcome.version > self.version + 1;

        if outcome.rebalanced {
            self.committed = outcome.updated_keys;
        } else {
            self.committed.extend(outcome.updated_keys);
        }
        self.version = outcome.version;
        self.recompute_displayed();

        let mut effects = self.render_unless_dragging(&state);
        if missed_commits {
            effects.push(Effect::Refetch);
        }

        let version = self.version;
        (
            self.settle(state, token, ControllerState::Reconciled { version }),
            effects,
        )
    }

    fn roll_back(
        &mut self,
        state: ControllerState,
        token: CommitToken,
        failure: CommitFailure,
    ) -> (ControllerState, Vec<Effect>) {
        let Some(intent) = self.take_latest(token) else {
            return (state, Vec::new());
        };

        tracing::warn!(
            "Rolling back move of '{}' on shelf '{}': {}",
            intent.item_id,
            self.shelf_id,
            failure
        );
        self.recompute_displayed();

        let mut effects = self.render_unless_dragging(&state);
        if failure.needs_refetch() {
            effects.push(Effect::Refetch);
        }
        effects.push(Effect::Notify(failure.to_string()));

        let reason = failure.to_string();
        (
            self.settle(state, token, ControllerState::RolledBack { reason }),
            effects,
        )
    }

    /// Remove `token` from the in-flight set, returning its intent only if it
    /// is still the newest request for that item
    fn take_latest(&mut self, token: CommitToken) -> Option<ReorderIntent> {
        let Some(intent) = self.in_flight.remove(&token) else {
            tracing::debug!("Ignoring response for unknown token {}", token);
            return None;
        };

        if self.latest_tokens.get(&intent.item_id) != Some(&token) {
            tracing::debug!(
                "Discarding superseded response (token {}) for '{}'",
                token,
                intent.item_id
            );
            return None;
        }

        self.latest_tokens.remove(&intent.item_id);
        Some(intent)
    }

    /// A drag in progress, or a newer commit in flight, keeps the current state
    fn settle(
        &self,
        state: ControllerState,
        token: CommitToken,
        next: ControllerState,
    ) -> ControllerState {
        match state {
            ControllerState::Dragging { .. } => state,
            ControllerState::Committing { token: current, .. } if current != token => state,
            _ => next,
        }
    }

    fn render_unless_dragging(&self, state: &ControllerState) -> Vec<Effect> {
        if matches!(state, ControllerState::Dragging { .. }) {
            Vec::new()
        } else {
            vec![Effect::Render(self.displayed.clone())]
        }
    }

    /// Authoritative order with the newest in-flight move per item applied
    fn recompute_displayed(&mut self) {
        let mut displayed = order(&self.committed);
        for (token, intent) in &self.in_flight {
            if self.latest_tokens.get(&intent.item_id) == Some(token) {
                apply_intent(&mut displayed, intent);
            }
        }
        self.displayed = displayed;
    }
}

/// Move the element at `from` so it ends up at index `to`
fn splice(order: &[String], from: usize, to: usize) -> Vec<String> {
    let mut result = order.to_vec();
    if from >= result.len() {
        return result;
    }
    let item = result.remove(from);
    let to = to.min(result.len());
    result.insert(to, item);
    result
}

/// Apply a relative move to a plain id list; returns false if it cannot be
/// expressed (item or reference missing)
fn apply_intent(order: &mut Vec<String>, intent: &ReorderIntent) -> bool {
    let Some(from) = order.iter().position(|id| *id == intent.item_id) else {
        return false;
    };
    let item = order.remove(from);

    let index = match intent.reference_item_id.as_deref() {
        None if intent.before => Some(0),
        None => Some(order.len()),
        Some(reference) => order
            .iter()
            .position(|id| id == reference)
            .map(|i| if intent.before { i } else { i + 1 }),
    };

    match index {
        Some(index) => {
            order.insert(index, item);
            true
        }
        None => {
            order.insert(from, item);
            false
        }
    }
}
