//! The gateway actor: single owner of the engine.
//!
//! All inbound traffic (operator tag changes, switch events, internal
//! commands) is funneled through one `select!` loop, so engine state
//! never needs locking. The automatic scheduler runs as a supervised
//! child task; the actor owns its watch channel and joins it on
//! shutdown.

use std::collections::BTreeMap;
use std::time::Duration;

use page_protocol::{SwitchAction, SwitchEvent};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::{Effect, GatewayEngine};
use crate::events::GatewayEvent;
use crate::orchestrator::CallOrchestrator;
use crate::ports::{SwitchHandle, SwitchSubmit, TagChange, TagLink, TagRequest};
use crate::scheduler::{run_auto_scheduler, AutoControl, AutoGroup, AutoScheduler};

/// Internal commands addressed to the actor itself.
#[derive(Debug)]
pub enum GatewayCommand {
    /// Scheduler reports the groups its current pass activated.
    AutoGroupsActivated(BTreeMap<u8, AutoGroup>),
    /// A delayed semi-automatic repetition came due.
    SemiAutoPlay { group: u32, file: String },
    Shutdown,
}

/// All channel endpoints the actor runs on.
pub struct GatewayChannels {
    pub tag_changes: mpsc::Receiver<TagChange>,
    pub tag_requests: mpsc::Sender<TagRequest>,
    pub switch_events: mpsc::Receiver<SwitchEvent>,
    pub switch_actions: mpsc::Sender<SwitchSubmit>,
    pub commands: mpsc::Receiver<GatewayCommand>,
    /// Handed to child tasks that need to call back into the actor.
    pub command_tx: mpsc::Sender<GatewayCommand>,
    pub events: broadcast::Sender<GatewayEvent>,
}

struct SchedulerSlot {
    control: watch::Sender<AutoControl>,
    handle: JoinHandle<()>,
}

/// Runs the gateway until shutdown or until both inbound channels
/// close.
pub async fn run_gateway_actor(
    mut engine: GatewayEngine,
    mut channels: GatewayChannels,
    heartbeat: Duration,
    pause_poll: Duration,
) {
    let tags = TagLink::new(channels.tag_requests.clone());
    let switch = SwitchHandle::new(channels.switch_actions.clone());
    let orchestrator = CallOrchestrator::new(
        tags.clone(),
        switch.clone(),
        channels.events.clone(),
        channels.command_tx.clone(),
    );

    let mut scheduler: Option<SchedulerSlot> = None;
    let mut auto_groups: BTreeMap<u8, AutoGroup> = BTreeMap::new();

    info!("gateway actor running");
    loop {
        tokio::select! {
            change = channels.tag_changes.recv() => {
                let Some(change) = change else {
                    info!("tag space closed, stopping");
                    break;
                };
                let effects = engine.handle_tag_change(change.node, change.value);
                execute(
                    effects,
                    &engine,
                    &orchestrator,
                    &mut scheduler,
                    &auto_groups,
                    &tags,
                    &switch,
                    &channels.command_tx,
                    heartbeat,
                    pause_poll,
                )
                .await;
            }
            event = channels.switch_events.recv() => {
                let Some(event) = event else {
                    info!("switch link closed, stopping");
                    break;
                };
                let effects = engine.handle_switch_event(event);
                execute(
                    effects,
                    &engine,
                    &orchestrator,
                    &mut scheduler,
                    &auto_groups,
                    &tags,
                    &switch,
                    &channels.command_tx,
                    heartbeat,
                    pause_poll,
                )
                .await;
            }
            command = channels.commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    GatewayCommand::AutoGroupsActivated(groups) => {
                        if !groups.is_empty() {
                            orchestrator
                                .apply(Effect::Emit(GatewayEvent::AutomaticPassStarted {
                                    groups: groups.keys().copied().collect(),
                                }))
                                .await;
                        }
                        auto_groups = groups;
                    }
                    GatewayCommand::SemiAutoPlay { group, file } => {
                        if engine.semi_keep_alive() {
                            orchestrator
                                .submit(SwitchAction::PlayMessage { group, file, admin: false })
                                .await;
                        } else {
                            debug!("repetition dropped, cycle no longer alive");
                        }
                    }
                    GatewayCommand::Shutdown => {
                        info!("shutdown requested");
                        break;
                    }
                }
            }
        }
    }

    if let Some(slot) = scheduler.take() {
        let _ = slot.control.send(AutoControl { keep_alive: false, paused: false });
        if let Err(err) = slot.handle.await {
            warn!(%err, "scheduler task ended abnormally");
        }
    }
    info!("gateway actor stopped");
}

#[allow(clippy::too_many_arguments)]
async fn execute(
    effects: Vec<Effect>,
    engine: &GatewayEngine,
    orchestrator: &CallOrchestrator,
    scheduler: &mut Option<SchedulerSlot>,
    auto_groups: &BTreeMap<u8, AutoGroup>,
    tags: &TagLink,
    switch: &SwitchHandle,
    command_tx: &mpsc::Sender<GatewayCommand>,
    heartbeat: Duration,
    pause_poll: Duration,
) {
    for effect in effects {
        match effect {
            Effect::StartScheduler => {
                if scheduler.as_ref().is_some_and(|s| !s.handle.is_finished()) {
                    debug!("scheduler start ignored, task still running");
                    continue;
                }
                let (control_tx, control_rx) =
                    watch::channel(AutoControl { keep_alive: true, paused: false });
                let task = AutoScheduler {
                    commands: engine.auto_commands().to_vec(),
                    messages: engine.message_files(),
                    heartbeat,
                    pause_poll,
                    tags: tags.clone(),
                    switch: switch.clone(),
                    control: control_rx,
                    actor: command_tx.clone(),
                };
                *scheduler = Some(SchedulerSlot {
                    control: control_tx,
                    handle: tokio::spawn(run_auto_scheduler(task)),
                });
            }
            Effect::StopScheduler => {
                match scheduler.take() {
                    Some(slot) => {
                        let _ = slot
                            .control
                            .send(AutoControl { keep_alive: false, paused: false });
                        // Let it drain on its own; joined at shutdown
                        // if restarted, otherwise reaped here.
                        tokio::spawn(async move {
                            let _ = slot.handle.await;
                        });
                    }
                    None => debug!("scheduler stop with no running task"),
                }
            }
            Effect::SetSchedulerPaused(paused) => match scheduler.as_ref() {
                Some(slot) => {
                    slot.control.send_modify(|c| c.paused = paused);
                }
                None => debug!(paused, "scheduler pause with no running task"),
            },
            Effect::AutoReplay { group } => {
                let running = scheduler
                    .as_ref()
                    .is_some_and(|s| {
                        let c = *s.control.borrow();
                        c.keep_alive && !c.paused
                    });
                let index = u8::try_from(group).ok();
                match index.and_then(|i| auto_groups.get(&i)) {
                    Some(auto_group) if running => {
                        debug!(group, "replaying automatic message");
                        orchestrator
                            .submit(SwitchAction::PlayAutoMessage {
                                group,
                                file: auto_group.file.clone(),
                            })
                            .await;
                    }
                    _ => debug!(group, "auto replay skipped, group no longer active"),
                }
            }
            other => orchestrator.apply(other).await,
        }
    }
}
