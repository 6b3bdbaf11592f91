//! Simulated call switch.
//!
//! Records every submitted action and acknowledges it, and lets tests
//! inject switch events (channel states, conference traffic) toward
//! the gateway.

use std::sync::{Arc, Mutex};

use page_engine::SwitchSubmit;
use page_protocol::{SubmitResult, SwitchAction, SwitchEvent};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::SimError;

/// Test-side view of the simulated switch.
#[derive(Debug, Clone)]
pub struct VirtualSwitch {
    actions: Arc<Mutex<Vec<SwitchAction>>>,
    events: mpsc::Sender<SwitchEvent>,
}

impl VirtualSwitch {
    /// Spawns the switch server. Returns the switch alongside the
    /// submission sender and event receiver the gateway actor runs on.
    pub fn spawn(
        capacity: usize,
    ) -> (Self, mpsc::Sender<SwitchSubmit>, mpsc::Receiver<SwitchEvent>) {
        let (submit_tx, mut submit_rx) = mpsc::channel::<SwitchSubmit>(capacity);
        let (event_tx, event_rx) = mpsc::channel::<SwitchEvent>(capacity);
        let actions: Arc<Mutex<Vec<SwitchAction>>> = Arc::default();
        let recorded = Arc::clone(&actions);
        tokio::spawn(async move {
            let mut serial = 0u64;
            while let Some(submit) = submit_rx.recv().await {
                serial += 1;
                debug!(action = %submit.action, serial, "switch action received");
                recorded
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(submit.action);
                if let Some(reply) = submit.reply {
                    let _ = reply.send(SubmitResult::ok(format!("sim-{serial}")));
                }
            }
            debug!("switch server stopped");
        });
        (Self { actions, events: event_tx }, submit_tx, event_rx)
    }

    /// Injects a switch event toward the gateway.
    pub async fn inject(&self, event: SwitchEvent) -> Result<(), SimError> {
        self.events
            .send(event)
            .await
            .map_err(|_| SimError::GatewayClosed)
    }

    /// Snapshot of every action submitted so far.
    pub fn actions(&self) -> Vec<SwitchAction> {
        self.actions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Drains the recorded actions.
    pub fn take_actions(&self) -> Vec<SwitchAction> {
        std::mem::take(&mut *self.actions.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_engine::SwitchHandle;

    #[tokio::test]
    async fn actions_are_recorded_and_acknowledged() {
        let (switch, submit_tx, _events) = VirtualSwitch::spawn(8);
        let handle = SwitchHandle::new(submit_tx);

        let result = handle
            .submit(SwitchAction::Originate { extension: "101".into() })
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(
            switch.take_actions(),
            vec![SwitchAction::Originate { extension: "101".into() }]
        );
        assert!(switch.actions().is_empty());
    }
}
