//! The gateway engine: synchronous event handling over the model.
//!
//! [`GatewayEngine`] owns all mutable state (elements, groups, paging
//! modes, calling state) and is driven from a single task. Handlers
//! take one inbound event and return the [`Effect`]s it implies; all
//! I/O happens in the actor that owns the engine.

use std::collections::BTreeMap;
use std::time::Duration;

use page_protocol::{
    channel_extension, CallingField, ConferencePhase, ElementField, ExtensionStatus,
    PagingField, RedirectKind, SwitchAction, SwitchEvent, TagNodeId, TagValue,
};
use tracing::{debug, info, warn};

use crate::config::MessageEntry;
use crate::dispatch::{RouteKey, RouteTable};
use crate::element::ElementRegistry;
use crate::events::GatewayEvent;
use crate::group::GroupStatusAggregator;
use crate::paging::{PagingIntent, PagingStateMachine};
use crate::scheduler::AutoCommandBinding;

/// Conference context of manually paged announcements.
pub const MANUAL_PLAYBACK_CONTEXT: &str = "Paging-app";
/// Conference context of scheduler-driven announcements.
pub const AUTO_PLAYBACK_CONTEXT: &str = "Paging-autoapp";

const PRERECORD_ON_VAR: &str = "Stations_Pre_Recorded_Message_ON";
const PRERECORD_FILE_VAR: &str = "Stations_Pre_Recorded_Message";

/// Side effect of handling one inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Hand an action to the call switch.
    Submit(SwitchAction),
    /// Write a single tag node.
    WriteTag { node: TagNodeId, value: TagValue },
    /// Status writes batched under the concurrency gate.
    StatusBatch(Vec<(TagNodeId, TagValue)>),
    /// Play into the manual group after a delay, keep-alive permitting.
    PlayAfterDelay {
        group: u32,
        file: String,
        delay: Duration,
    },
    StartScheduler,
    StopScheduler,
    SetSchedulerPaused(bool),
    /// Replay the message of an automatic group whose playback ended.
    AutoReplay { group: u32 },
    /// Notify external observers.
    Emit(GatewayEvent),
}

/// Tag nodes owned by the calling page.
#[derive(Debug, Clone, Copy)]
pub struct CallingNodes {
    pub prerecord_status: TagNodeId,
    pub prerecord_title: TagNodeId,
    pub call_group_status: TagNodeId,
    pub call_group_reset: TagNodeId,
}

#[derive(Debug, Default)]
struct CallingState {
    announcement_on: bool,
    group_active: bool,
}

/// All gateway state plus the pure event handlers.
pub struct GatewayEngine {
    registry: ElementRegistry,
    groups: GroupStatusAggregator,
    paging: PagingStateMachine,
    routes: RouteTable,
    messages: BTreeMap<u8, MessageEntry>,
    auto_commands: Vec<AutoCommandBinding>,
    calling_nodes: CallingNodes,
    calling: CallingState,
}

impl GatewayEngine {
    pub fn new(
        registry: ElementRegistry,
        groups: GroupStatusAggregator,
        paging: PagingStateMachine,
        routes: RouteTable,
        messages: BTreeMap<u8, MessageEntry>,
        auto_commands: Vec<AutoCommandBinding>,
        calling_nodes: CallingNodes,
    ) -> Self {
        Self {
            registry,
            groups,
            paging,
            routes,
            messages,
            auto_commands,
            calling_nodes,
            calling: CallingState::default(),
        }
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn auto_commands(&self) -> &[AutoCommandBinding] {
        &self.auto_commands
    }

    /// Message index to sound file, for the scheduler.
    pub fn message_files(&self) -> BTreeMap<u8, String> {
        self.messages
            .iter()
            .map(|(i, m)| (*i, m.file.clone()))
            .collect()
    }

    pub fn semi_keep_alive(&self) -> bool {
        self.paging.semi_keep_alive()
    }

    pub fn automatic_active(&self) -> bool {
        self.paging.automatic_active()
    }

    /// Handles one operator-originated tag change.
    pub fn handle_tag_change(&mut self, node: TagNodeId, value: TagValue) -> Vec<Effect> {
        let Some(route) = self.routes.resolve(node).cloned() else {
            debug!(%node, %value, "change on unrouted node dropped");
            return Vec::new();
        };
        match route {
            RouteKey::Element { name, field } => self.handle_element_tag(&name, field, value),
            RouteKey::Paging(field) => self.handle_paging_tag(field, value),
            RouteKey::Calling(field) => self.handle_calling_tag(field, value),
            RouteKey::ZoneSelect(zone) => {
                let active = value.is_truthy();
                match self.registry.zone_mut(&zone) {
                    Some(z) => {
                        info!(zone, active, "zone selection changed");
                        z.active = active;
                    }
                    None => warn!(zone, "zone select for unknown zone"),
                }
                Vec::new()
            }
            RouteKey::Parameter(name) => {
                // Parameters pass straight through as global variables.
                vec![Effect::Submit(SwitchAction::SetVar {
                    name,
                    value: value.to_string(),
                })]
            }
        }
    }

    fn handle_element_tag(
        &mut self,
        name: &str,
        field: ElementField,
        value: TagValue,
    ) -> Vec<Effect> {
        let Some(element) = self.registry.element_mut(name) else {
            warn!(name, "tag change for unknown element");
            return Vec::new();
        };
        let mut effects = Vec::new();
        match field {
            ElementField::Call => {
                if value.is_truthy() {
                    info!(name, extension = %element.extension, "call button pressed");
                    effects.push(Effect::Submit(SwitchAction::Originate {
                        extension: element.extension.clone(),
                    }));
                    effects.push(Effect::WriteTag {
                        node: element.nodes.call,
                        value: TagValue::Int16(0),
                    });
                }
            }
            ElementField::Confirm => {
                if value.is_truthy() {
                    if element.bound_channel.is_empty() {
                        warn!(name, "confirm with no channel bound to the extension");
                    } else {
                        info!(
                            name,
                            channel = %element.bound_channel,
                            target = %element.transfer_target,
                            "transfer confirmed"
                        );
                        effects.push(Effect::Submit(SwitchAction::Redirect {
                            channel: element.bound_channel.clone(),
                            target: element.transfer_target.clone(),
                            kind: RedirectKind::Transfer,
                        }));
                    }
                    effects.push(Effect::WriteTag {
                        node: element.nodes.confirm,
                        value: TagValue::Bool(false),
                    });
                }
            }
            ElementField::Pickup => {
                if value.is_truthy() {
                    let channel = element.bound_channel.clone();
                    let pickup_node = element.nodes.pickup;
                    match self.registry.master_extension() {
                        Some(master) if !channel.is_empty() => {
                            info!(name, %channel, master, "pickup to master");
                            effects.push(Effect::Submit(SwitchAction::Redirect {
                                channel,
                                target: master,
                                kind: RedirectKind::Pickup,
                            }));
                        }
                        Some(_) => warn!(name, "pickup with no channel bound"),
                        None => warn!(name, "pickup without a master operator"),
                    }
                    effects.push(Effect::WriteTag {
                        node: pickup_node,
                        value: TagValue::Bool(false),
                    });
                }
            }
            ElementField::CallGroup => {
                let selected = value.is_truthy();
                element.call_group_selected = selected;
                effects.push(Effect::WriteTag {
                    node: element.nodes.call_group_status,
                    value: TagValue::Bool(selected),
                });
            }
            ElementField::Transfer => match value {
                TagValue::Str(target) => element.transfer_target = target,
                other => debug!(name, value = %other, "non-string transfer target ignored"),
            },
        }
        effects
    }

    fn handle_paging_tag(&mut self, field: PagingField, value: TagValue) -> Vec<Effect> {
        let nodes = self.paging.nodes();
        match field {
            PagingField::Live => {
                self.paging.request_live(value.is_truthy());
                self.evaluate_paging()
            }
            PagingField::LiveTest => {
                if value.is_truthy() {
                    vec![
                        Effect::Submit(SwitchAction::LiveTest),
                        Effect::WriteTag {
                            node: nodes.live_test,
                            value: TagValue::Bool(false),
                        },
                    ]
                } else {
                    Vec::new()
                }
            }
            PagingField::BroadcastMessage => {
                self.paging.request_broadcast(value.is_truthy());
                self.evaluate_paging()
            }
            PagingField::BroadcastMessageNo => match value.as_index() {
                Some(index) => match self.messages.get(&index) {
                    Some(message) => {
                        info!(index, title = %message.title, "broadcast message selected");
                        self.paging.select_message(message.clone());
                        vec![Effect::WriteTag {
                            node: nodes.broadcast_title,
                            value: TagValue::Str(message.title.clone()),
                        }]
                    }
                    None => {
                        warn!(index, "broadcast selection outside the message catalogue");
                        Vec::new()
                    }
                },
                None => Vec::new(),
            },
            PagingField::Semiautomatic => {
                self.paging.request_semiautomatic(value.is_truthy());
                self.evaluate_paging()
            }
            PagingField::SemiautomaticRepetitions => {
                if let Some(count) = value.as_count() {
                    self.paging.set_repetitions(count);
                }
                Vec::new()
            }
            PagingField::SemiautomaticDelay => {
                if let Some(secs) = value.as_count() {
                    self.paging.set_delay_secs(u64::from(secs));
                }
                Vec::new()
            }
            PagingField::Automatic => {
                self.paging.request_automatic(value.is_truthy());
                self.evaluate_paging()
            }
            PagingField::AutomaticPause => {
                let intents = self.paging.set_automatic_pause(value.is_truthy());
                self.intents_to_effects(intents)
            }
        }
    }

    fn handle_calling_tag(&mut self, field: CallingField, value: TagValue) -> Vec<Effect> {
        match field {
            CallingField::PreRecordMessage => {
                let on = value.is_truthy();
                if self.calling.announcement_on == on {
                    return Vec::new();
                }
                self.calling.announcement_on = on;
                info!(on, "pre-recorded announcement toggled");
                vec![
                    Effect::Submit(SwitchAction::SetVar {
                        name: PRERECORD_ON_VAR.to_string(),
                        value: if on { "True" } else { "False" }.to_string(),
                    }),
                    Effect::WriteTag {
                        node: self.calling_nodes.prerecord_status,
                        value: TagValue::Bool(on),
                    },
                ]
            }
            CallingField::PreRecordMessageNo => match value.as_index() {
                Some(index) => match self.messages.get(&index) {
                    Some(message) => vec![
                        Effect::WriteTag {
                            node: self.calling_nodes.prerecord_title,
                            value: TagValue::Str(message.title.clone()),
                        },
                        Effect::Submit(SwitchAction::SetVar {
                            name: PRERECORD_FILE_VAR.to_string(),
                            value: message.file.clone(),
                        }),
                    ],
                    None => {
                        warn!(index, "announcement selection outside the message catalogue");
                        Vec::new()
                    }
                },
                None => Vec::new(),
            },
            CallingField::CallGroupCalling => {
                if value.is_truthy() {
                    if self.calling.group_active {
                        debug!("call group already ringing");
                        return Vec::new();
                    }
                    let names = self.registry.call_group_selection();
                    let extensions: Vec<String> = names
                        .iter()
                        .filter_map(|n| self.registry.element(n))
                        .map(|e| e.extension.clone())
                        .collect();
                    info!(count = extensions.len(), "call group ringing");
                    let mut effects: Vec<Effect> = extensions
                        .iter()
                        .map(|ext| {
                            Effect::Submit(SwitchAction::CallGroupOriginate {
                                extension: ext.clone(),
                            })
                        })
                        .collect();
                    self.calling.group_active = true;
                    effects.push(Effect::WriteTag {
                        node: self.calling_nodes.call_group_status,
                        value: TagValue::Bool(true),
                    });
                    effects
                } else {
                    self.calling.group_active = false;
                    vec![Effect::WriteTag {
                        node: self.calling_nodes.call_group_status,
                        value: TagValue::Bool(false),
                    }]
                }
            }
            CallingField::CallGroupReset => {
                if !value.is_truthy() {
                    return Vec::new();
                }
                let mut effects = vec![Effect::WriteTag {
                    node: self.calling_nodes.call_group_reset,
                    value: TagValue::Bool(false),
                }];
                for name in self.registry.call_group_selection() {
                    if let Some(element) = self.registry.element_mut(&name) {
                        element.call_group_selected = false;
                        effects.push(Effect::WriteTag {
                            node: element.nodes.call_group,
                            value: TagValue::Bool(false),
                        });
                        effects.push(Effect::WriteTag {
                            node: element.nodes.call_group_status,
                            value: TagValue::Bool(false),
                        });
                    }
                }
                self.calling.group_active = false;
                effects.push(Effect::WriteTag {
                    node: self.calling_nodes.call_group_status,
                    value: TagValue::Bool(false),
                });
                effects
            }
        }
    }

    /// Handles one event from the call switch.
    pub fn handle_switch_event(&mut self, event: SwitchEvent) -> Vec<Effect> {
        match event {
            SwitchEvent::ChannelState { extension, state, channel } => {
                let status = ExtensionStatus::from_channel_state(&state);
                self.element_status_update(&extension, status, Some(channel))
            }
            SwitchEvent::PeerStatus { extension, status } => {
                let status = ExtensionStatus::from_peer_status(&status);
                self.element_status_update(&extension, status, None)
            }
            SwitchEvent::Queue { phase, caller, channel, .. } => {
                let status = ExtensionStatus::from_queue_phase(phase);
                self.element_status_update(&caller, status, Some(channel))
            }
            SwitchEvent::Conference { phase, conference, channels, channel } => {
                self.handle_conference(phase, &conference, channels, &channel)
            }
        }
    }

    fn handle_conference(
        &mut self,
        phase: ConferencePhase,
        conference: &str,
        channels: u16,
        channel: &str,
    ) -> Vec<Effect> {
        match phase {
            ConferencePhase::Start => {
                debug!(conference, "conference started");
                Vec::new()
            }
            ConferencePhase::End => {
                info!(conference, "conference ended, paging reset");
                let intents = self.paging.conference_ended();
                let mut effects = self.intents_to_effects(intents);
                effects.push(Effect::Emit(GatewayEvent::ActiveChannelsChanged { count: 0 }));
                effects
            }
            ConferencePhase::Join | ConferencePhase::Leave => {
                let count_intents = self.paging.conference_channels(channels);
                let mut effects = self.intents_to_effects(count_intents);
                effects.push(Effect::Emit(GatewayEvent::ActiveChannelsChanged {
                    count: channels,
                }));
                if phase == ConferencePhase::Leave {
                    match channel_extension(channel) {
                        Ok(context) if context == MANUAL_PLAYBACK_CONTEXT => {
                            let intents = self.paging.playback_finished();
                            effects.extend(self.intents_to_effects(intents));
                        }
                        Ok(context) if context == AUTO_PLAYBACK_CONTEXT => {
                            match conference.parse::<u32>() {
                                Ok(group) => effects.push(Effect::AutoReplay { group }),
                                Err(_) => {
                                    debug!(conference, "auto playback left a non-numeric group")
                                }
                            }
                        }
                        Ok(_) => {}
                        Err(err) => debug!(channel, %err, "unparsable conference channel"),
                    }
                }
                effects
            }
        }
    }

    fn element_status_update(
        &mut self,
        extension: &str,
        status: ExtensionStatus,
        channel: Option<String>,
    ) -> Vec<Effect> {
        let Some(element) = self.registry.element_by_extension_mut(extension) else {
            debug!(extension, "switch event for unmanaged extension");
            return Vec::new();
        };
        element.status = status;
        if let Some(channel) = channel {
            element.bound_channel = channel;
        }
        let name = element.name.clone();
        let status_node = element.nodes.status;

        let mut writes = vec![(status_node, TagValue::Byte(status.as_byte()))];
        let mut effects = vec![Effect::Emit(GatewayEvent::ElementStatusChanged {
            name,
            extension: extension.to_string(),
            status,
        })];
        if let Some((group_node, word)) = self.groups.set_active(extension, status.is_active()) {
            let group = self
                .registry
                .element_by_extension_mut(extension)
                .map(|e| e.group.clone())
                .unwrap_or_default();
            writes.push((group_node, TagValue::Byte(word)));
            effects.push(Effect::Emit(GatewayEvent::GroupWordChanged { group, word }));
        }
        effects.insert(0, Effect::StatusBatch(writes));
        effects
    }

    fn evaluate_paging(&mut self) -> Vec<Effect> {
        let master = self.registry.master_extension();
        let pagers = self.registry.active_zone_extensions();
        let intents = self.paging.evaluate(master.as_deref(), &pagers);
        self.intents_to_effects(intents)
    }

    fn intents_to_effects(&self, intents: Vec<PagingIntent>) -> Vec<Effect> {
        let status_node = self.paging.nodes().status_code;
        let status_text_node = self.paging.nodes().status;
        let mut effects = Vec::new();
        let mut pending_status: Option<u8> = None;
        let mut pending_text: Option<String> = None;
        for intent in intents {
            match intent {
                PagingIntent::ActivatePagers { extensions, group } => {
                    for extension in extensions {
                        effects.push(Effect::Submit(SwitchAction::ActivatePager {
                            extension,
                            group,
                        }));
                    }
                }
                PagingIntent::ActivateMaster { extension, group } => {
                    effects.push(Effect::Submit(SwitchAction::ActivateMaster {
                        extension,
                        group,
                    }));
                }
                PagingIntent::Play { group, file, admin } => {
                    effects.push(Effect::Submit(SwitchAction::PlayMessage {
                        group,
                        file,
                        admin,
                    }));
                }
                PagingIntent::PlayAfterDelay { group, file, delay_secs } => {
                    effects.push(Effect::PlayAfterDelay {
                        group,
                        file,
                        delay: Duration::from_secs(delay_secs),
                    });
                }
                PagingIntent::Deactivate { group } => {
                    effects.push(Effect::Submit(SwitchAction::KickGroup { group }));
                }
                PagingIntent::WriteTag { node, value } => {
                    if node == status_node {
                        if let TagValue::Byte(code) = value {
                            pending_status = Some(code);
                        }
                    } else if node == status_text_node {
                        if let TagValue::Str(ref text) = value {
                            pending_text = Some(text.clone());
                        }
                    }
                    effects.push(Effect::WriteTag { node, value });
                }
                PagingIntent::StartScheduler => effects.push(Effect::StartScheduler),
                PagingIntent::StopScheduler => effects.push(Effect::StopScheduler),
                PagingIntent::PauseScheduler { paused } => {
                    effects.push(Effect::SetSchedulerPaused(paused));
                }
            }
        }
        if let (Some(code), Some(text)) = (pending_status, pending_text) {
            effects.push(Effect::Emit(GatewayEvent::PagingStatusChanged { code, text }));
        }
        effects
    }
}
