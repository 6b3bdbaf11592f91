//! Automatic paging scheduler.
//!
//! A background task that cycles through the configured command tags,
//! decodes their bitmasks into (pager, message) slots, plays each
//! message group into its own conference and tears it down again. The
//! actor supervises it through a `watch` channel; flipping `keep_alive`
//! off ends the loop at the next check, `paused` parks it between
//! passes.

use std::collections::BTreeMap;
use std::time::Duration;

use page_protocol::{SwitchAction, TagNodeId};
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::actor::GatewayCommand;
use crate::ports::{SwitchHandle, TagLink};

/// Supervision state the actor publishes to the scheduler task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoControl {
    pub keep_alive: bool,
    pub paused: bool,
}

/// A command tag and the slots its bits select.
#[derive(Debug, Clone)]
pub struct AutoCommandBinding {
    pub name: String,
    pub node: TagNodeId,
    pub slots: Vec<AutoSlot>,
}

#[derive(Debug, Clone)]
pub struct AutoSlot {
    pub bit: u8,
    pub extension: String,
    pub message: u8,
}

/// One message group of an automatic pass. The conference group id is
/// the message index, keeping automatic traffic away from the manual
/// paging group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoGroup {
    pub file: String,
    pub members: Vec<String>,
}

/// Everything a scheduler run needs, handed over at spawn.
pub struct AutoScheduler {
    pub commands: Vec<AutoCommandBinding>,
    /// Message index to sound file.
    pub messages: BTreeMap<u8, String>,
    pub heartbeat: Duration,
    pub pause_poll: Duration,
    pub tags: TagLink,
    pub switch: SwitchHandle,
    pub control: watch::Receiver<AutoControl>,
    pub actor: mpsc::Sender<GatewayCommand>,
}

/// Bit positions set in `mask`, lowest first.
pub fn decode_bits(mask: u8) -> Vec<u8> {
    (0..8).filter(|b| mask & (1 << b) != 0).collect()
}

/// Groups the slots a mask selects by message index.
pub fn resolve_groups(
    mask: u8,
    slots: &[AutoSlot],
    messages: &BTreeMap<u8, String>,
) -> BTreeMap<u8, AutoGroup> {
    let mut groups = BTreeMap::new();
    for bit in decode_bits(mask) {
        let Some(slot) = slots.iter().find(|s| s.bit == bit) else {
            debug!(bit, "command bit without a configured slot");
            continue;
        };
        let Some(file) = messages.get(&slot.message) else {
            warn!(index = slot.message, "slot refers to an unknown message");
            continue;
        };
        let group: &mut AutoGroup = groups.entry(slot.message).or_default();
        group.file = file.clone();
        if !group.members.contains(&slot.extension) {
            group.members.push(slot.extension.clone());
        }
    }
    groups
}

/// Runs scheduler passes until `keep_alive` is cleared.
pub async fn run_auto_scheduler(sched: AutoScheduler) {
    info!(commands = sched.commands.len(), "automatic scheduler started");
    loop {
        let ctrl = *sched.control.borrow();
        if !ctrl.keep_alive {
            break;
        }
        if ctrl.paused {
            sleep(sched.pause_poll).await;
            continue;
        }

        let mut active: BTreeMap<u8, AutoGroup> = BTreeMap::new();
        for cmd in &sched.commands {
            let mask = sched
                .tags
                .read(cmd.node)
                .await
                .and_then(|v| v.as_index())
                .unwrap_or(0);
            for (index, group) in resolve_groups(mask, &cmd.slots, &sched.messages) {
                let merged: &mut AutoGroup = active.entry(index).or_default();
                merged.file = group.file;
                for member in group.members {
                    if !merged.members.contains(&member) {
                        merged.members.push(member);
                    }
                }
            }
        }

        // Tell the actor which groups this pass owns so a finished
        // playback can be replayed into the right conference.
        let _ = sched
            .actor
            .send(GatewayCommand::AutoGroupsActivated(active.clone()))
            .await;

        if active.is_empty() {
            debug!("automatic pass with no active command bits");
        }
        for (index, group) in &active {
            info!(
                message = index,
                members = group.members.len(),
                "activating automatic group"
            );
            for extension in &group.members {
                sched
                    .switch
                    .submit_detached(SwitchAction::ActivatePager {
                        extension: extension.clone(),
                        group: u32::from(*index),
                    })
                    .await;
            }
            sched
                .switch
                .submit_detached(SwitchAction::PlayAutoMessage {
                    group: u32::from(*index),
                    file: group.file.clone(),
                })
                .await;
        }

        // Hold the pass while running; leave early on stop or pause.
        loop {
            let ctrl = *sched.control.borrow();
            if !ctrl.keep_alive || ctrl.paused {
                break;
            }
            sleep(sched.heartbeat).await;
        }

        for index in active.keys() {
            sched
                .switch
                .submit_detached(SwitchAction::KickGroup { group: u32::from(*index) })
                .await;
        }
        let _ = sched
            .actor
            .send(GatewayCommand::AutoGroupsActivated(BTreeMap::new()))
            .await;

        // Park while paused; a stop request falls through to the outer
        // check.
        loop {
            let ctrl = *sched.control.borrow();
            if !ctrl.keep_alive || !ctrl.paused {
                break;
            }
            sleep(sched.pause_poll).await;
        }
    }
    info!("automatic scheduler stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> Vec<AutoSlot> {
        vec![
            AutoSlot { bit: 0, extension: "201".into(), message: 1 },
            AutoSlot { bit: 1, extension: "202".into(), message: 1 },
            AutoSlot { bit: 2, extension: "203".into(), message: 2 },
        ]
    }

    fn messages() -> BTreeMap<u8, String> {
        BTreeMap::from([(1, "alpha.wav".into()), (2, "bravo.wav".into())])
    }

    #[test]
    fn decode_bits_lists_set_positions() {
        assert_eq!(decode_bits(0), Vec::<u8>::new());
        assert_eq!(decode_bits(0b0000_0101), vec![0, 2]);
        assert_eq!(decode_bits(0xff), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn slots_group_by_message_index() {
        let groups = resolve_groups(0b0000_0111, &slots(), &messages());
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[&1],
            AutoGroup { file: "alpha.wav".into(), members: vec!["201".into(), "202".into()] }
        );
        assert_eq!(
            groups[&2],
            AutoGroup { file: "bravo.wav".into(), members: vec!["203".into()] }
        );
    }

    #[test]
    fn unmapped_bits_are_skipped() {
        let groups = resolve_groups(0b1000_0001, &slots(), &messages());
        assert_eq!(groups.len(), 1);
        assert!(groups.contains_key(&1));
    }
}
