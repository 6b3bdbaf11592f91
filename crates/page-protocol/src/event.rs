//! Typed records for the switch-side event stream
//!
//! Raw state strings are preserved here; mapping to [`crate::ExtensionStatus`]
//! happens in the orchestrator, so unrecognized values can be logged with
//! their original spelling before falling back.

/// Lifecycle phase of a paging/announcement conference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConferencePhase {
    Start,
    End,
    Join,
    Leave,
}

/// Phase of a queued caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueuePhase {
    Join,
    Leave,
    Abandon,
}

/// One event delivered by the call-control link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchEvent {
    /// A channel changed state (`Up`, `Ringing`, `Hangup`, ...)
    ChannelState {
        extension: String,
        state: String,
        /// Full channel name; empty on hangup, where the channel is gone
        channel: String,
    },
    /// Peer registration/reachability changed
    PeerStatus { extension: String, status: String },
    /// Conference membership changed
    Conference {
        phase: ConferencePhase,
        conference: String,
        /// Bridge channel count reported with the event
        channels: u16,
        /// Full name of the joining/leaving channel; empty for start/end
        channel: String,
    },
    /// A caller moved through a hold queue
    Queue {
        phase: QueuePhase,
        caller: String,
        channel: String,
        position: Option<u32>,
    },
}

impl SwitchEvent {
    /// Whether this event feeds the per-element status path
    pub fn is_element_status(&self) -> bool {
        matches!(
            self,
            SwitchEvent::ChannelState { .. }
                | SwitchEvent::PeerStatus { .. }
                | SwitchEvent::Queue { .. }
        )
    }

    /// Whether this event feeds the paging state machine
    pub fn is_paging(&self) -> bool {
        matches!(self, SwitchEvent::Conference { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_classification() {
        let state = SwitchEvent::ChannelState {
            extension: "101".into(),
            state: "Up".into(),
            channel: "PJSIP/101-0001".into(),
        };
        assert!(state.is_element_status());
        assert!(!state.is_paging());

        let conf = SwitchEvent::Conference {
            phase: ConferencePhase::Join,
            conference: "999".into(),
            channels: 3,
            channel: "110".into(),
        };
        assert!(conf.is_paging());
        assert!(!conf.is_element_status());
    }
}
