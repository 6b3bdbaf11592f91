//! Extension status byte and its raw-string mappings
//!
//! The per-station status tag carries one of these values. The numeric
//! values are load-bearing: operator displays decode the byte directly,
//! and the group aggregator treats `Up` and `Ringing` as "active".

use std::fmt;

use crate::event::QueuePhase;

/// Status of one extension, as published to its status tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExtensionStatus {
    OnHook = 1,
    Up = 2,
    Ringing = 4,
    OnHold = 8,
    Unreachable = 16,
}

impl ExtensionStatus {
    /// Value written to the status tag
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Whether this status counts toward the group activity word
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Up | Self::Ringing)
    }

    /// Map a raw channel-state description from the switch
    ///
    /// Unrecognized states fall back to `OnHook` so a stuck channel can
    /// never leave a station displayed as busy.
    pub fn from_channel_state(state: &str) -> Self {
        match state {
            "Up" => Self::Up,
            "Ringing" => Self::Ringing,
            "Hangup" => Self::OnHook,
            _ => Self::OnHook,
        }
    }

    /// Map a raw peer-reachability status from the switch
    pub fn from_peer_status(status: &str) -> Self {
        match status {
            "Reachable" => Self::OnHook,
            "Unreachable" => Self::Unreachable,
            _ => Self::Unreachable,
        }
    }

    /// Map a queue phase to the caller's displayed status
    pub fn from_queue_phase(phase: QueuePhase) -> Self {
        match phase {
            QueuePhase::Join => Self::OnHold,
            QueuePhase::Leave => Self::Up,
            QueuePhase::Abandon => Self::OnHook,
        }
    }
}

impl fmt::Display for ExtensionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OnHook => "OnHook",
            Self::Up => "Up",
            Self::Ringing => "Ringing",
            Self::OnHold => "OnHold",
            Self::Unreachable => "Unreachable",
        };
        f.write_str(name)
    }
}
