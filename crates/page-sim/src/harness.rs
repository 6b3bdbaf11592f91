//! Full simulated gateway: tag space, switch and actor wired together.

use std::time::Duration;

use page_engine::{
    bind_model, run_gateway_actor, EngineError, GatewayChannels, GatewayCommand,
    GatewayConfig, GatewayEvent,
};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::switch::VirtualSwitch;
use crate::tagspace::{TagSpaceHandle, VirtualTagSpace};

const CHANNEL_CAPACITY: usize = 64;
const EVENT_CAPACITY: usize = 256;

/// A running gateway against simulated ends.
pub struct SimGateway {
    pub tags: TagSpaceHandle,
    pub switch: VirtualSwitch,
    events: broadcast::Sender<GatewayEvent>,
    commands: mpsc::Sender<GatewayCommand>,
    actor: JoinHandle<()>,
}

impl SimGateway {
    /// Binds `config` against a fresh tag space and starts the actor.
    pub fn start(config: &GatewayConfig) -> Result<Self, EngineError> {
        let mut space = VirtualTagSpace::new();
        let engine = bind_model(config, &mut space)?;
        let (tag_requests, tag_changes, tags) = space.serve(CHANNEL_CAPACITY);
        let (switch, switch_actions, switch_events) = VirtualSwitch::spawn(CHANNEL_CAPACITY);
        let (command_tx, command_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let channels = GatewayChannels {
            tag_changes,
            tag_requests,
            switch_events,
            switch_actions,
            commands: command_rx,
            command_tx: command_tx.clone(),
            events: event_tx.clone(),
        };
        let actor = tokio::spawn(run_gateway_actor(
            engine,
            channels,
            Duration::from_millis(config.scheduler.heartbeat_ms),
            Duration::from_millis(config.scheduler.pause_poll_ms),
        ));
        Ok(Self {
            tags,
            switch,
            events: event_tx,
            commands: command_tx,
            actor,
        })
    }

    /// New subscription to the gateway's event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.events.subscribe()
    }

    /// Stops the actor and waits for it to finish.
    pub async fn shutdown(self) {
        let _ = self.commands.send(GatewayCommand::Shutdown).await;
        let _ = self.actor.await;
    }
}
