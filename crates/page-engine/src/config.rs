//! Declarative gateway model, deserialized from a JSON file at startup.
//!
//! The configuration names every element, zone, message and automatic
//! command the gateway exposes. [`crate::setup::bind_model`] turns it
//! into live tag nodes and routing entries, rejecting inconsistencies
//! before the first event is processed.

use serde::{Deserialize, Serialize};

use crate::element::ElementKind;

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub elements: Vec<ElementEntry>,
    pub zones: Vec<ZoneEntry>,
    #[serde(default)]
    pub messages: Vec<MessageEntry>,
    #[serde(default)]
    pub auto_commands: Vec<AutoCommandEntry>,
    #[serde(default)]
    pub parameters: Vec<ParameterEntry>,
    #[serde(default)]
    pub semiautomatic: SemiAutomaticConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// One telephony endpoint surfaced in the tag space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementEntry {
    /// Tag-name prefix, e.g. `E2-TEL-101`. Field tags hang off this name.
    pub name: String,
    /// Extension on the call switch, e.g. `101`.
    pub extension: String,
    pub kind: ElementKind,
    /// Paging zone the element belongs to.
    pub zone: String,
    /// Status group the element reports into.
    pub group: String,
    /// Bit position inside the group status byte, 0..8.
    pub group_bit: u8,
}

/// A selectable paging zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneEntry {
    pub name: String,
}

/// A pre-recorded announcement available for broadcast and calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEntry {
    /// Operator-facing selection index, written to the `-No` tags.
    pub index: u8,
    pub title: String,
    /// Sound file name handed to the switch when playing.
    pub file: String,
}

/// A bitmask command tag driving the automatic scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoCommandEntry {
    pub name: String,
    pub slots: Vec<AutoSlotEntry>,
}

/// One bit of an automatic command: which pager plays which message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoSlotEntry {
    /// Bit position inside the command byte, 0..8.
    pub bit: u8,
    pub extension: String,
    /// Index into the message catalogue.
    pub message: u8,
}

/// A global switch variable mirrored one-to-one from a tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub name: String,
    #[serde(default)]
    pub initial: String,
}

/// Defaults for the semi-automatic repetition cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemiAutomaticConfig {
    #[serde(default = "default_repetitions")]
    pub repetitions: u16,
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

impl Default for SemiAutomaticConfig {
    fn default() -> Self {
        Self {
            repetitions: default_repetitions(),
            delay_secs: default_delay_secs(),
        }
    }
}

/// Pacing of the automatic scheduler loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Sleep between keep-alive checks while a pass is playing.
    #[serde(default = "default_heartbeat_ms")]
    pub heartbeat_ms: u64,
    /// Sleep between checks while the scheduler is paused.
    #[serde(default = "default_pause_poll_ms")]
    pub pause_poll_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            heartbeat_ms: default_heartbeat_ms(),
            pause_poll_ms: default_pause_poll_ms(),
        }
    }
}

fn default_repetitions() -> u16 {
    3
}

fn default_delay_secs() -> u64 {
    2
}

fn default_heartbeat_ms() -> u64 {
    2000
}

fn default_pause_poll_ms() -> u64 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let raw = r#"{
            "elements": [
                {"name": "E2-TEL-101", "extension": "101", "kind": "station",
                 "zone": "E2", "group": "G1", "group_bit": 0}
            ],
            "zones": [{"name": "E2"}]
        }"#;
        let cfg: GatewayConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(cfg.elements.len(), 1);
        assert_eq!(cfg.semiautomatic.repetitions, 3);
        assert_eq!(cfg.scheduler.heartbeat_ms, 2000);
        assert!(cfg.messages.is_empty());
    }
}
