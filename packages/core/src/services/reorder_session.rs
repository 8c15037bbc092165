//! Reorder Session - Drives a Controller Against the Store
//!
//! Binds a [`ReorderController`] to a [`ReorderQueue`]: drag hooks go into the
//! controller, `Submit` and `Refetch` effects are executed here, and the
//! results are fed back until only UI effects (`Render`, `Notify`) remain.
//! Those are returned to the caller in the order they were produced.

use crate::db::StoreError;
use crate::operations::{ReorderError, ReorderQueue};
use crate::services::reorder_controller::{
    CommitFailure, ControllerEvent, Effect, ReorderController,
};
use std::collections::VecDeque;
use std::sync::Arc;

pub struct ReorderSession {
    controller: ReorderController,
    queue: Arc<ReorderQueue>,
}

impl ReorderSession {
    /// Fetch the shelf and start a session on its current snapshot
    pub async fn open(queue: Arc<ReorderQueue>, shelf_id: &str) -> Result<Self, StoreError> {
        let shelf = queue.store().get_shelf(shelf_id).await?;
        Ok(Self {
            controller: ReorderController::new(&shelf),
            queue,
        })
    }

    pub fn controller(&self) -> &ReorderController {
        &self.controller
    }

    pub fn displayed_order(&self) -> &[String] {
        self.controller.displayed_order()
    }

    pub async fn on_drag_start(&mut self, index: usize) -> Vec<Effect> {
        self.dispatch(ControllerEvent::DragStart { index }).await
    }

    pub async fn on_drag_over(&mut self, index: usize) -> Vec<Effect> {
        self.dispatch(ControllerEvent::DragOver { index }).await
    }

    /// Drop and, if the order changes, commit through the queue
    pub async fn on_drop(&mut self, index: usize) -> Vec<Effect> {
        self.dispatch(ControllerEvent::Drop { index }).await
    }

    pub async fn on_drag_end(&mut self) -> Vec<Effect> {
        self.dispatch(ControllerEvent::DragEnd).await
    }

    /// Pull the authoritative order, e.g. after a store event
    pub async fn refresh(&mut self) -> Vec<Effect> {
        self.run(VecDeque::from([Effect::Refetch])).await
    }

    async fn dispatch(&mut self, event: ControllerEvent) -> Vec<Effect> {
        let effects = self.controller.update(event);
        self.run(effects.into()).await
    }

    async fn run(&mut self, mut pending: VecDeque<Effect>) -> Vec<Effect> {
        let shelf_id = self.controller.shelf_id().to_string();
        let mut surfaced = Vec::new();

        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::Submit { token, intent } => {
                    let event = match self.queue.commit_with_retry(&shelf_id, &intent).await {
                        Ok(outcome) => ControllerEvent::CommitSucceeded { token, outcome },
                        Err(e) => ControllerEvent::CommitFailed {
                            token,
                            failure: classify(&e),
                        },
                    };
                    pending.extend(self.controller.update(event));
                }
                Effect::Refetch => match self.queue.store().get_shelf(&shelf_id).await {
                    Ok(shelf) => {
                        pending.extend(self.controller.update(ControllerEvent::Refreshed {
                            positions: shelf.item_positions().clone(),
                            version: shelf.version,
                        }));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to refetch shelf '{}': {}", shelf_id, e);
                        surfaced.push(Effect::Notify(format!("Could not reload shelf: {}", e)));
                    }
                },
                other => surfaced.push(other),
            }
        }

        surfaced
    }
}

fn classify(err: &ReorderError) -> CommitFailure {
    if err.is_not_found() {
        CommitFailure::NotFound(err.to_string())
    } else if err.is_conflict() {
        CommitFailure::Conflict(err.to_string())
    } else {
        CommitFailure::Rejected(err.to_string())
    }
}
