//! Paging mode state machine.
//!
//! Four modes share the loudspeaker network: live paging, broadcast of
//! a pre-recorded message, a semi-automatic repetition cycle and the
//! background automatic scheduler. This module is pure state: control
//! tag writes arrive as edge requests, [`PagingStateMachine::evaluate`]
//! resolves them against the precedence rules and emits
//! [`PagingIntent`]s for the surrounding engine to execute.

use page_protocol::{TagNodeId, TagValue, MANUAL_PAGING_GROUP};
use tracing::{info, warn};

use crate::config::MessageEntry;

/// Tag nodes owned by the paging page of the operator model.
#[derive(Debug, Clone, Copy)]
pub struct PagingNodes {
    pub status: TagNodeId,
    pub status_code: TagNodeId,
    pub active_channels: TagNodeId,
    pub live_status: TagNodeId,
    pub live_test: TagNodeId,
    pub broadcast_status: TagNodeId,
    pub broadcast_title: TagNodeId,
    pub semiautomatic: TagNodeId,
    pub semiautomatic_status: TagNodeId,
    pub semiautomatic_remaining: TagNodeId,
    pub automatic_status: TagNodeId,
}

/// One step the engine must take on behalf of the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum PagingIntent {
    /// Pull each pager extension into the conference group.
    ActivatePagers { extensions: Vec<String>, group: u32 },
    /// Bring the master in as the live announcer.
    ActivateMaster { extension: String, group: u32 },
    /// Play a message file into the conference group.
    Play { group: u32, file: String, admin: bool },
    /// Replay after the configured delay, keep-alive permitting.
    PlayAfterDelay { group: u32, file: String, delay_secs: u64 },
    /// Kick every channel out of the conference group.
    Deactivate { group: u32 },
    WriteTag { node: TagNodeId, value: TagValue },
    StartScheduler,
    StopScheduler,
    PauseScheduler { paused: bool },
}

#[derive(Debug, Clone, Default)]
struct PendingEdges {
    live: Option<bool>,
    broadcast: Option<bool>,
    semiautomatic: Option<bool>,
    automatic: Option<bool>,
}

/// Pure mode logic for the paging subsystem.
#[derive(Debug)]
pub struct PagingStateMachine {
    nodes: PagingNodes,
    pending: PendingEdges,

    live_active: bool,
    broadcast_active: bool,
    semi_active: bool,
    auto_active: bool,

    /// Message currently selected on the broadcast page.
    selected: Option<MessageEntry>,

    configured_repetitions: u16,
    configured_delay_secs: u64,
    semi_remaining: u16,
    semi_delay_secs: u64,
    semi_file: String,
    semi_keep_alive: bool,

    auto_paused: bool,
    /// Set when the pause was forced by a manual mode, so that mode's
    /// end resumes the scheduler.
    auto_paused_by_manual: bool,

    last_status: Option<u8>,
}

impl PagingStateMachine {
    pub fn new(nodes: PagingNodes, repetitions: u16, delay_secs: u64) -> Self {
        Self {
            nodes,
            pending: PendingEdges::default(),
            live_active: false,
            broadcast_active: false,
            semi_active: false,
            auto_active: false,
            selected: None,
            configured_repetitions: repetitions,
            configured_delay_secs: delay_secs,
            semi_remaining: 0,
            semi_delay_secs: 0,
            semi_file: String::new(),
            semi_keep_alive: false,
            auto_paused: false,
            auto_paused_by_manual: false,
            last_status: None,
        }
    }

    pub fn request_live(&mut self, on: bool) {
        self.pending.live = Some(on);
    }

    pub fn request_broadcast(&mut self, on: bool) {
        self.pending.broadcast = Some(on);
    }

    pub fn request_semiautomatic(&mut self, on: bool) {
        self.pending.semiautomatic = Some(on);
    }

    pub fn request_automatic(&mut self, on: bool) {
        self.pending.automatic = Some(on);
    }

    pub fn select_message(&mut self, message: MessageEntry) {
        self.selected = Some(message);
    }

    pub fn set_repetitions(&mut self, count: u16) {
        self.configured_repetitions = count;
    }

    pub fn set_delay_secs(&mut self, secs: u64) {
        self.configured_delay_secs = secs;
    }

    pub fn nodes(&self) -> PagingNodes {
        self.nodes
    }

    pub fn live_active(&self) -> bool {
        self.live_active
    }

    pub fn semi_keep_alive(&self) -> bool {
        self.semi_keep_alive
    }

    pub fn automatic_active(&self) -> bool {
        self.auto_active
    }

    /// Resolves all pending edges against the current mode set.
    ///
    /// `master` is the master operator's extension; transitions that
    /// need it are logged and dropped when it is absent. `zone_pagers`
    /// lists the pager extensions of every selected zone.
    pub fn evaluate(
        &mut self,
        master: Option<&str>,
        zone_pagers: &[String],
    ) -> Vec<PagingIntent> {
        let mut out = Vec::new();
        self.apply_live_edge(master, zone_pagers, &mut out);
        self.apply_broadcast_edge(master, zone_pagers, &mut out);
        self.apply_semiautomatic_edge(master, zone_pagers, &mut out);
        self.apply_automatic_edge(&mut out);
        self.project_status(&mut out);
        out
    }

    fn apply_live_edge(
        &mut self,
        master: Option<&str>,
        zone_pagers: &[String],
        out: &mut Vec<PagingIntent>,
    ) {
        let Some(on) = self.pending.live.take() else { return };
        if on && !self.live_active {
            let Some(master) = master else {
                warn!("live paging requested without a master operator, ignored");
                return;
            };
            self.pause_scheduler_for_manual(out);
            if self.semi_active {
                self.stop_semiautomatic(out);
            }
            info!(pagers = zone_pagers.len(), "live paging started");
            out.push(PagingIntent::ActivatePagers {
                extensions: zone_pagers.to_vec(),
                group: MANUAL_PAGING_GROUP,
            });
            out.push(PagingIntent::ActivateMaster {
                extension: master.to_string(),
                group: MANUAL_PAGING_GROUP,
            });
            self.live_active = true;
            out.push(PagingIntent::WriteTag {
                node: self.nodes.live_status,
                value: TagValue::Bool(true),
            });
        } else if !on && self.live_active {
            info!("live paging stopped");
            self.live_active = false;
            out.push(PagingIntent::WriteTag {
                node: self.nodes.live_status,
                value: TagValue::Bool(false),
            });
            out.push(PagingIntent::Deactivate { group: MANUAL_PAGING_GROUP });
            self.resume_scheduler_after_manual(out);
        }
    }

    fn apply_broadcast_edge(
        &mut self,
        master: Option<&str>,
        zone_pagers: &[String],
        out: &mut Vec<PagingIntent>,
    ) {
        let Some(on) = self.pending.broadcast.take() else { return };
        if on && !self.broadcast_active {
            let Some(file) = self.selected.as_ref().map(|m| m.file.clone()) else {
                warn!("broadcast requested with no message selected, ignored");
                return;
            };
            if self.live_active {
                // Piggyback on the live conference: play only, no
                // admin rights, pagers are already in.
                info!(file, "broadcasting on top of live paging");
                self.broadcast_active = true;
                out.push(PagingIntent::WriteTag {
                    node: self.nodes.broadcast_status,
                    value: TagValue::Bool(true),
                });
                out.push(PagingIntent::Play {
                    group: MANUAL_PAGING_GROUP,
                    file,
                    admin: false,
                });
            } else {
                let Some(master) = master else {
                    warn!("broadcast requested without a master operator, ignored");
                    return;
                };
                self.pending.semiautomatic = None;
                if self.semi_active {
                    self.stop_semiautomatic(out);
                }
                self.pause_scheduler_for_manual(out);
                info!(file, pagers = zone_pagers.len(), "broadcast started");
                out.push(PagingIntent::ActivatePagers {
                    extensions: zone_pagers.to_vec(),
                    group: MANUAL_PAGING_GROUP,
                });
                out.push(PagingIntent::ActivatePagers {
                    extensions: vec![master.to_string()],
                    group: MANUAL_PAGING_GROUP,
                });
                self.broadcast_active = true;
                out.push(PagingIntent::WriteTag {
                    node: self.nodes.broadcast_status,
                    value: TagValue::Bool(true),
                });
                out.push(PagingIntent::Play {
                    group: MANUAL_PAGING_GROUP,
                    file,
                    admin: true,
                });
            }
        } else if !on && self.broadcast_active {
            info!("broadcast stopped");
            self.stop_broadcast(out);
        }
    }

    fn apply_semiautomatic_edge(
        &mut self,
        master: Option<&str>,
        zone_pagers: &[String],
        out: &mut Vec<PagingIntent>,
    ) {
        let Some(on) = self.pending.semiautomatic.take() else { return };
        if on && !self.semi_active {
            if self.live_active || self.broadcast_active || self.auto_active {
                warn!("semi-automatic paging refused while another mode is active");
                // Reset the control tag so the operator sees the refusal.
                out.push(PagingIntent::WriteTag {
                    node: self.nodes.semiautomatic,
                    value: TagValue::Bool(false),
                });
                return;
            }
            let Some(master) = master else {
                warn!("semi-automatic paging requested without a master operator, ignored");
                return;
            };
            let Some(file) = self.selected.as_ref().map(|m| m.file.clone()) else {
                warn!("semi-automatic paging requested with no message selected, ignored");
                return;
            };
            self.semi_remaining = self.configured_repetitions;
            self.semi_delay_secs = self.configured_delay_secs;
            self.semi_file = file.clone();
            self.semi_keep_alive = true;
            self.semi_active = true;
            info!(
                file,
                repetitions = self.semi_remaining,
                delay_secs = self.semi_delay_secs,
                "semi-automatic paging started"
            );
            out.push(PagingIntent::WriteTag {
                node: self.nodes.semiautomatic_status,
                value: TagValue::Bool(true),
            });
            out.push(PagingIntent::WriteTag {
                node: self.nodes.semiautomatic_remaining,
                value: TagValue::Str(self.semi_remaining.to_string()),
            });
            out.push(PagingIntent::ActivatePagers {
                extensions: zone_pagers.to_vec(),
                group: MANUAL_PAGING_GROUP,
            });
            out.push(PagingIntent::ActivatePagers {
                extensions: vec![master.to_string()],
                group: MANUAL_PAGING_GROUP,
            });
            out.push(PagingIntent::Play {
                group: MANUAL_PAGING_GROUP,
                file,
                admin: false,
            });
        } else if !on && self.semi_active {
            info!("semi-automatic paging stopped");
            self.stop_semiautomatic(out);
        }
    }

    fn apply_automatic_edge(&mut self, out: &mut Vec<PagingIntent>) {
        let Some(on) = self.pending.automatic.take() else { return };
        if on && !self.auto_active {
            info!("automatic paging enabled");
            self.auto_active = true;
            self.auto_paused = false;
            self.auto_paused_by_manual = false;
            out.push(PagingIntent::WriteTag {
                node: self.nodes.automatic_status,
                value: TagValue::Bool(true),
            });
            out.push(PagingIntent::StartScheduler);
        } else if !on && self.auto_active {
            info!("automatic paging disabled");
            self.auto_active = false;
            self.auto_paused = false;
            self.auto_paused_by_manual = false;
            out.push(PagingIntent::WriteTag {
                node: self.nodes.automatic_status,
                value: TagValue::Bool(false),
            });
            out.push(PagingIntent::StopScheduler);
        }
    }

    /// Operator wrote the automatic pause tag.
    pub fn set_automatic_pause(&mut self, paused: bool) -> Vec<PagingIntent> {
        let mut out = Vec::new();
        if self.auto_active && self.auto_paused != paused {
            self.auto_paused = paused;
            self.auto_paused_by_manual = false;
            out.push(PagingIntent::PauseScheduler { paused });
        }
        out
    }

    /// The message playing into the manual conference group finished.
    pub fn playback_finished(&mut self) -> Vec<PagingIntent> {
        let mut out = Vec::new();
        if self.broadcast_active {
            info!("broadcast playback finished");
            self.stop_broadcast(&mut out);
            self.project_status(&mut out);
        } else if self.semi_active {
            self.semi_remaining = self.semi_remaining.saturating_sub(1);
            out.push(PagingIntent::WriteTag {
                node: self.nodes.semiautomatic_remaining,
                value: TagValue::Str(self.semi_remaining.to_string()),
            });
            if self.semi_keep_alive && self.semi_remaining > 0 {
                info!(remaining = self.semi_remaining, "scheduling next repetition");
                out.push(PagingIntent::PlayAfterDelay {
                    group: MANUAL_PAGING_GROUP,
                    file: self.semi_file.clone(),
                    delay_secs: self.semi_delay_secs,
                });
            } else {
                info!("semi-automatic cycle complete");
                self.stop_semiautomatic(&mut out);
                self.project_status(&mut out);
            }
        }
        out
    }

    /// Conference bookkeeping from the switch.
    pub fn conference_channels(&mut self, count: u16) -> Vec<PagingIntent> {
        vec![PagingIntent::WriteTag {
            node: self.nodes.active_channels,
            value: TagValue::Int16(count as i16),
        }]
    }

    /// The whole conference collapsed: drop every pending edge and
    /// force the manual modes back to ready.
    pub fn conference_ended(&mut self) -> Vec<PagingIntent> {
        let mut out = vec![PagingIntent::WriteTag {
            node: self.nodes.active_channels,
            value: TagValue::Int16(0),
        }];
        self.pending = PendingEdges::default();
        if self.live_active {
            self.live_active = false;
            out.push(PagingIntent::WriteTag {
                node: self.nodes.live_status,
                value: TagValue::Bool(false),
            });
            self.resume_scheduler_after_manual(&mut out);
        }
        if self.broadcast_active {
            self.broadcast_active = false;
            out.push(PagingIntent::WriteTag {
                node: self.nodes.broadcast_status,
                value: TagValue::Bool(false),
            });
            self.resume_scheduler_after_manual(&mut out);
        }
        if self.semi_active {
            self.semi_active = false;
            self.semi_keep_alive = false;
            out.push(PagingIntent::WriteTag {
                node: self.nodes.semiautomatic_status,
                value: TagValue::Bool(false),
            });
        }
        self.project_status(&mut out);
        out
    }

    fn stop_broadcast(&mut self, out: &mut Vec<PagingIntent>) {
        self.broadcast_active = false;
        out.push(PagingIntent::WriteTag {
            node: self.nodes.broadcast_status,
            value: TagValue::Bool(false),
        });
        if !self.live_active {
            out.push(PagingIntent::Deactivate { group: MANUAL_PAGING_GROUP });
            self.resume_scheduler_after_manual(out);
        }
    }

    fn stop_semiautomatic(&mut self, out: &mut Vec<PagingIntent>) {
        self.semi_active = false;
        self.semi_keep_alive = false;
        out.push(PagingIntent::WriteTag {
            node: self.nodes.semiautomatic_status,
            value: TagValue::Bool(false),
        });
        if !self.live_active && !self.broadcast_active {
            out.push(PagingIntent::Deactivate { group: MANUAL_PAGING_GROUP });
        }
    }

    fn pause_scheduler_for_manual(&mut self, out: &mut Vec<PagingIntent>) {
        if self.auto_active && !self.auto_paused {
            self.auto_paused = true;
            self.auto_paused_by_manual = true;
            out.push(PagingIntent::PauseScheduler { paused: true });
        }
    }

    fn resume_scheduler_after_manual(&mut self, out: &mut Vec<PagingIntent>) {
        if self.auto_active && self.auto_paused_by_manual {
            self.auto_paused = false;
            self.auto_paused_by_manual = false;
            out.push(PagingIntent::PauseScheduler { paused: false });
        }
    }

    fn current_status(&self) -> (u8, &'static str) {
        if self.live_active && self.broadcast_active {
            (3, "Broadcasting on Live")
        } else if self.live_active {
            (1, "Live Paging")
        } else if self.broadcast_active {
            (2, "Broadcasting")
        } else if self.semi_active {
            (4, "Semi-Automatic Paging")
        } else if self.auto_active {
            (5, "Automatic Paging")
        } else {
            (0, "Ready")
        }
    }

    fn project_status(&mut self, out: &mut Vec<PagingIntent>) {
        let (code, text) = self.current_status();
        if self.last_status == Some(code) {
            return;
        }
        self.last_status = Some(code);
        out.push(PagingIntent::WriteTag {
            node: self.nodes.status_code,
            value: TagValue::Byte(code),
        });
        out.push(PagingIntent::WriteTag {
            node: self.nodes.status,
            value: TagValue::Str(text.to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> PagingNodes {
        PagingNodes {
            status: TagNodeId(1),
            status_code: TagNodeId(2),
            active_channels: TagNodeId(3),
            live_status: TagNodeId(4),
            live_test: TagNodeId(5),
            broadcast_status: TagNodeId(7),
            broadcast_title: TagNodeId(8),
            semiautomatic: TagNodeId(9),
            semiautomatic_status: TagNodeId(10),
            semiautomatic_remaining: TagNodeId(11),
            automatic_status: TagNodeId(12),
        }
    }

    fn machine() -> PagingStateMachine {
        PagingStateMachine::new(nodes(), 3, 1)
    }

    fn message() -> MessageEntry {
        MessageEntry {
            index: 1,
            title: "Evacuation".into(),
            file: "evacuation.wav".into(),
        }
    }

    fn pagers() -> Vec<String> {
        vec!["201".into(), "202".into()]
    }

    fn status_code(intents: &[PagingIntent]) -> Option<u8> {
        intents.iter().rev().find_map(|i| match i {
            PagingIntent::WriteTag { node: TagNodeId(2), value: TagValue::Byte(c) } => Some(*c),
            _ => None,
        })
    }

    #[test]
    fn live_start_activates_pagers_and_master() {
        let mut sm = machine();
        sm.request_live(true);
        let intents = sm.evaluate(Some("100"), &pagers());
        assert!(intents.contains(&PagingIntent::ActivatePagers {
            extensions: pagers(),
            group: MANUAL_PAGING_GROUP,
        }));
        assert!(intents.contains(&PagingIntent::ActivateMaster {
            extension: "100".into(),
            group: MANUAL_PAGING_GROUP,
        }));
        assert_eq!(status_code(&intents), Some(1));
        assert!(sm.live_active());
    }

    #[test]
    fn live_without_master_is_dropped() {
        let mut sm = machine();
        sm.request_live(true);
        let intents = sm.evaluate(None, &pagers());
        assert!(intents.is_empty());
        assert!(!sm.live_active());
    }

    #[test]
    fn repeated_live_request_is_a_no_op() {
        let mut sm = machine();
        sm.request_live(true);
        sm.evaluate(Some("100"), &pagers());
        sm.request_live(true);
        let again = sm.evaluate(Some("100"), &pagers());
        assert!(again.is_empty());
    }

    #[test]
    fn broadcast_on_live_plays_without_admin() {
        let mut sm = machine();
        sm.request_live(true);
        sm.evaluate(Some("100"), &pagers());
        sm.select_message(message());
        sm.request_broadcast(true);
        let intents = sm.evaluate(Some("100"), &pagers());
        assert!(intents.contains(&PagingIntent::Play {
            group: MANUAL_PAGING_GROUP,
            file: "evacuation.wav".into(),
            admin: false,
        }));
        // No extra activations while live holds the conference.
        assert!(!intents
            .iter()
            .any(|i| matches!(i, PagingIntent::ActivatePagers { .. })));
        assert_eq!(status_code(&intents), Some(3));
    }

    #[test]
    fn standalone_broadcast_owns_the_conference() {
        let mut sm = machine();
        sm.select_message(message());
        sm.request_broadcast(true);
        let intents = sm.evaluate(Some("100"), &pagers());
        assert!(intents.contains(&PagingIntent::Play {
            group: MANUAL_PAGING_GROUP,
            file: "evacuation.wav".into(),
            admin: true,
        }));
        assert_eq!(status_code(&intents), Some(2));
    }

    #[test]
    fn broadcast_start_discards_a_pending_semiautomatic_edge() {
        let mut sm = machine();
        sm.select_message(message());
        sm.request_broadcast(true);
        sm.request_semiautomatic(true);
        let intents = sm.evaluate(Some("100"), &pagers());
        // Broadcast wins; the semi-automatic cycle never starts.
        assert_eq!(status_code(&intents), Some(2));
        assert!(!sm.semi_keep_alive());
        assert!(!intents.contains(&PagingIntent::WriteTag {
            node: nodes().semiautomatic_status,
            value: TagValue::Bool(true),
        }));

        let done = sm.playback_finished();
        assert!(!done
            .iter()
            .any(|i| matches!(i, PagingIntent::PlayAfterDelay { .. })));
        assert_eq!(status_code(&done), Some(0));
    }

    #[test]
    fn broadcast_stop_leaves_live_running() {
        let mut sm = machine();
        sm.request_live(true);
        sm.evaluate(Some("100"), &pagers());
        sm.select_message(message());
        sm.request_broadcast(true);
        sm.evaluate(Some("100"), &pagers());
        sm.request_broadcast(false);
        let intents = sm.evaluate(Some("100"), &pagers());
        assert!(!intents
            .iter()
            .any(|i| matches!(i, PagingIntent::Deactivate { .. })));
        assert_eq!(status_code(&intents), Some(1));
        assert!(sm.live_active());
    }

    #[test]
    fn semiautomatic_is_refused_while_live() {
        let mut sm = machine();
        sm.request_live(true);
        sm.evaluate(Some("100"), &pagers());
        sm.select_message(message());
        sm.request_semiautomatic(true);
        let intents = sm.evaluate(Some("100"), &pagers());
        assert!(intents.contains(&PagingIntent::WriteTag {
            node: nodes().semiautomatic,
            value: TagValue::Bool(false),
        }));
        assert!(!sm.semi_keep_alive());
    }

    #[test]
    fn semiautomatic_cycle_plays_exactly_the_configured_count() {
        let mut sm = machine();
        sm.set_repetitions(3);
        sm.set_delay_secs(1);
        sm.select_message(message());
        sm.request_semiautomatic(true);
        let start = sm.evaluate(Some("100"), &pagers());
        let plays = start
            .iter()
            .filter(|i| matches!(i, PagingIntent::Play { .. }))
            .count();
        assert_eq!(plays, 1);

        // First two completions reschedule with the configured delay.
        for remaining in [2u16, 1] {
            let intents = sm.playback_finished();
            assert!(intents.contains(&PagingIntent::WriteTag {
                node: nodes().semiautomatic_remaining,
                value: TagValue::Str(remaining.to_string()),
            }));
            assert!(intents.contains(&PagingIntent::PlayAfterDelay {
                group: MANUAL_PAGING_GROUP,
                file: "evacuation.wav".into(),
                delay_secs: 1,
            }));
        }

        // Third completion clears the cycle instead of rescheduling.
        let last = sm.playback_finished();
        assert!(!last
            .iter()
            .any(|i| matches!(i, PagingIntent::PlayAfterDelay { .. })));
        assert!(last.contains(&PagingIntent::Deactivate { group: MANUAL_PAGING_GROUP }));
        assert_eq!(status_code(&last), Some(0));
    }

    #[test]
    fn live_pauses_and_resumes_the_scheduler() {
        let mut sm = machine();
        sm.request_automatic(true);
        let started = sm.evaluate(Some("100"), &pagers());
        assert!(started.contains(&PagingIntent::StartScheduler));
        assert_eq!(status_code(&started), Some(5));

        sm.request_live(true);
        let live = sm.evaluate(Some("100"), &pagers());
        assert!(live.contains(&PagingIntent::PauseScheduler { paused: true }));

        sm.request_live(false);
        let stopped = sm.evaluate(Some("100"), &pagers());
        assert!(stopped.contains(&PagingIntent::PauseScheduler { paused: false }));
        assert_eq!(status_code(&stopped), Some(5));
    }

    #[test]
    fn operator_pause_is_not_undone_by_live() {
        let mut sm = machine();
        sm.request_automatic(true);
        sm.evaluate(Some("100"), &pagers());
        assert_eq!(
            sm.set_automatic_pause(true),
            vec![PagingIntent::PauseScheduler { paused: true }]
        );

        sm.request_live(true);
        sm.evaluate(Some("100"), &pagers());
        sm.request_live(false);
        let intents = sm.evaluate(Some("100"), &pagers());
        // The operator paused it, so live ending must not resume it.
        assert!(!intents.contains(&PagingIntent::PauseScheduler { paused: false }));
    }

    #[test]
    fn conference_end_forces_ready() {
        let mut sm = machine();
        sm.request_live(true);
        sm.evaluate(Some("100"), &pagers());
        sm.request_broadcast(true); // pending, never evaluated
        let intents = sm.conference_ended();
        assert!(intents.contains(&PagingIntent::WriteTag {
            node: nodes().active_channels,
            value: TagValue::Int16(0),
        }));
        assert_eq!(status_code(&intents), Some(0));
        assert!(!sm.live_active());
        // The stale broadcast edge was dropped with the conference.
        let after = sm.evaluate(Some("100"), &pagers());
        assert!(after.is_empty());
    }
}
