//! Gateway notifications for external observers.

use page_protocol::{ExtensionStatus, SwitchAction};

/// A state change worth relaying outside the gateway.
///
/// Broadcast on a `tokio::sync::broadcast` channel; slow subscribers
/// lose old events rather than back-pressuring the actor.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    ElementStatusChanged {
        name: String,
        extension: String,
        status: ExtensionStatus,
    },
    GroupWordChanged {
        group: String,
        word: u8,
    },
    PagingStatusChanged {
        code: u8,
        text: String,
    },
    ActiveChannelsChanged {
        count: u16,
    },
    ActionSubmitted {
        action: SwitchAction,
    },
    AutomaticPassStarted {
        groups: Vec<u8>,
    },
}

impl GatewayEvent {
    pub fn is_status(&self) -> bool {
        matches!(
            self,
            GatewayEvent::ElementStatusChanged { .. } | GatewayEvent::GroupWordChanged { .. }
        )
    }

    pub fn is_paging(&self) -> bool {
        matches!(
            self,
            GatewayEvent::PagingStatusChanged { .. }
                | GatewayEvent::ActiveChannelsChanged { .. }
                | GatewayEvent::AutomaticPassStarted { .. }
        )
    }

    /// Flattens the event into a `(topic, detail)` pair for line-based
    /// relays and logs.
    pub fn relay_parts(&self) -> (&'static str, String) {
        match self {
            GatewayEvent::ElementStatusChanged { name, status, .. } => {
                ("element-status", format!("{name}={status}"))
            }
            GatewayEvent::GroupWordChanged { group, word } => {
                ("group-status", format!("{group}={word:#010b}"))
            }
            GatewayEvent::PagingStatusChanged { code, text } => {
                ("paging-status", format!("{code} {text}"))
            }
            GatewayEvent::ActiveChannelsChanged { count } => {
                ("active-channels", count.to_string())
            }
            GatewayEvent::ActionSubmitted { action } => ("action", action.to_string()),
            GatewayEvent::AutomaticPassStarted { groups } => (
                "auto-pass",
                groups
                    .iter()
                    .map(|g| g.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_parts_flatten_the_event() {
        let ev = GatewayEvent::PagingStatusChanged {
            code: 3,
            text: "Broadcasting on Live".into(),
        };
        assert!(ev.is_paging());
        assert_eq!(ev.relay_parts(), ("paging-status", "3 Broadcasting on Live".into()));
    }
}
