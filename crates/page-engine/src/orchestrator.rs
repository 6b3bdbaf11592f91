//! Effect execution against the tag space and the call switch.
//!
//! The actor hands every I/O [`Effect`] to the orchestrator. Ordinary
//! tag writes and action submissions keep the actor's ordering; status
//! batches and delayed replays run as spawned tasks so a burst of
//! switch events never stalls the loop. At most two status batches are
//! in flight at once.

use std::sync::Arc;

use page_protocol::SwitchAction;
use tokio::sync::{broadcast, mpsc, Semaphore};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::actor::GatewayCommand;
use crate::engine::Effect;
use crate::events::GatewayEvent;
use crate::ports::{SwitchHandle, TagLink};

/// Number of status-write batches allowed in flight.
const STATUS_BATCH_PERMITS: usize = 2;

pub struct CallOrchestrator {
    tags: TagLink,
    switch: SwitchHandle,
    status_gate: Arc<Semaphore>,
    events: broadcast::Sender<GatewayEvent>,
    actor: mpsc::Sender<GatewayCommand>,
}

impl CallOrchestrator {
    pub fn new(
        tags: TagLink,
        switch: SwitchHandle,
        events: broadcast::Sender<GatewayEvent>,
        actor: mpsc::Sender<GatewayCommand>,
    ) -> Self {
        Self {
            tags,
            switch,
            status_gate: Arc::new(Semaphore::new(STATUS_BATCH_PERMITS)),
            events,
            actor,
        }
    }

    /// Executes one effect. Scheduler lifecycle effects are the
    /// actor's concern and are ignored here.
    pub async fn apply(&self, effect: Effect) {
        match effect {
            Effect::Submit(action) => self.submit(action).await,
            Effect::WriteTag { node, value } => self.tags.write(node, value).await,
            Effect::StatusBatch(writes) => {
                let tags = self.tags.clone();
                let gate = Arc::clone(&self.status_gate);
                tokio::spawn(async move {
                    let Ok(_permit) = gate.acquire_owned().await else { return };
                    for (node, value) in writes {
                        tags.write(node, value).await;
                    }
                });
            }
            Effect::PlayAfterDelay { group, file, delay } => {
                let actor = self.actor.clone();
                tokio::spawn(async move {
                    sleep(delay).await;
                    let _ = actor
                        .send(GatewayCommand::SemiAutoPlay { group, file })
                        .await;
                });
            }
            Effect::Emit(event) => {
                let _ = self.events.send(event);
            }
            other => debug!(?other, "scheduler effect reached the orchestrator"),
        }
    }

    /// Submits an action, emitting it to observers and logging the
    /// switch's verdict off the hot path.
    pub async fn submit(&self, action: SwitchAction) {
        info!(%action, "switch action");
        let _ = self
            .events
            .send(GatewayEvent::ActionSubmitted { action: action.clone() });
        let switch = self.switch.clone();
        tokio::spawn(async move {
            let kind = action.kind();
            match switch.submit(action).await {
                Some(result) if result.success => {
                    debug!(kind, id = %result.action_id, "action accepted");
                }
                Some(result) => {
                    warn!(kind, id = %result.action_id, "action rejected by the switch");
                }
                None => warn!(kind, "no response from the switch"),
            }
        });
    }
}
