//! Call-control actions submitted by the gateway
//!
//! Actions are rendered as ordered key/value field maps, the framing
//! the switch-side signaling link expects. Every submit result is
//! advisory only: the gateway logs it and never retries.

use std::fmt;

/// Conference group used by all manual paging modes (live, broadcast,
/// semi-automatic). Automatic paging groups are keyed by message index.
pub const MANUAL_PAGING_GROUP: u32 = 999;

/// Redirect flavor, selecting the dial-plan context on the switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// Station-initiated transfer to its configured target
    Transfer,
    /// Operator pickup of a station's call
    Pickup,
}

impl RedirectKind {
    fn context(&self) -> &'static str {
        match self {
            Self::Transfer => "Transfer-Call",
            Self::Pickup => "Pickup-Call",
        }
    }
}

/// One call-control request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchAction {
    /// Ring a station and park it in the on-hold context
    Originate { extension: String },
    /// Move a live channel to another extension
    Redirect {
        channel: String,
        target: String,
        kind: RedirectKind,
    },
    /// Ring one member of a call group into the group conference
    CallGroupOriginate { extension: String },
    /// Set a switch-side global variable
    SetVar { name: String, value: String },
    /// Pull one pager extension into a paging conference
    ActivatePager { extension: String, group: u32 },
    /// Pull the master operator into a paging conference as announcer
    ActivateMaster { extension: String, group: u32 },
    /// Play a pre-recorded message into a manual paging conference
    ///
    /// `admin` marks the terminal playback of a chained announcement.
    PlayMessage {
        group: u32,
        file: String,
        admin: bool,
    },
    /// Play a message into an automatic paging conference
    PlayAutoMessage { group: u32, file: String },
    /// One-shot live-paging test playback chain
    LiveTest,
    /// Kick every channel out of a paging conference
    KickGroup { group: u32 },
}

impl SwitchAction {
    /// Action verb, the `Action` field of the wire map
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Redirect { .. } => "Redirect",
            Self::SetVar { .. } => "Setvar",
            Self::KickGroup { .. } => "ConfbridgeKick",
            _ => "Originate",
        }
    }

    /// Render the ordered field map submitted to the switch
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Originate { extension } => vec![
                ("Action", "Originate".into()),
                ("Channel", format!("PJSIP/{extension}")),
                ("WaitTime", "2".into()),
                ("CallerID", String::new()),
                ("Exten", "1".into()),
                ("Timeout", "2".into()),
                ("Context", "OnHold-Call".into()),
                ("Priority", "1".into()),
                ("Async", "true".into()),
            ],
            Self::Redirect {
                channel,
                target,
                kind,
            } => vec![
                ("Action", "Redirect".into()),
                ("Channel", channel.clone()),
                ("WaitTime", "2".into()),
                ("CallerID", String::new()),
                ("Exten", target.clone()),
                ("Timeout", "2".into()),
                ("Context", kind.context().into()),
                ("Priority", "1".into()),
                ("Async", "true".into()),
            ],
            Self::CallGroupOriginate { extension } => vec![
                ("Action", "Originate".into()),
                ("Channel", "Local/1@CallGroup-Start".into()),
                ("WaitTime", "1".into()),
                ("CallerID", "Call Group".into()),
                ("Exten", "1".into()),
                ("Timeout", "30".into()),
                ("Context", "CallGroup-Call".into()),
                ("Priority", "1".into()),
                ("Async", "true".into()),
                ("Variable", format!("var1={extension}")),
            ],
            Self::SetVar { name, value } => vec![
                ("Action", "Setvar".into()),
                ("Variable", name.clone()),
                ("Value", value.clone()),
            ],
            Self::ActivatePager { extension, group } => vec![
                ("Action", "Originate".into()),
                ("Channel", format!("Local/{group}@Paging-ActivatePager")),
                ("WaitTime", "1".into()),
                ("CallerID", "Paging...".into()),
                ("Timeout", "2".into()),
                ("Async", "true".into()),
                ("Variable", format!("var1={extension}")),
            ],
            Self::ActivateMaster { extension, group } => vec![
                ("Action", "Originate".into()),
                ("Channel", format!("Local/{group}@Paging-Master")),
                ("WaitTime", "2".into()),
                ("CallerID", "Live Paging".into()),
                ("Async", "true".into()),
                ("Variable", format!("var1={extension}")),
            ],
            Self::PlayMessage { group, file, admin } => vec![
                ("Action", "Originate".into()),
                ("Channel", format!("Local/{group}@Paging-app")),
                ("WaitTime", "1000".into()),
                ("CallerID", "Paging...".into()),
                ("Application", "Playback".into()),
                ("Data", file.clone()),
                ("Async", "true".into()),
                ("Variable", format!("is_admin={admin}")),
            ],
            Self::PlayAutoMessage { group, file } => vec![
                ("Action", "Originate".into()),
                ("Channel", format!("Local/{group}@Paging-autoapp")),
                ("WaitTime", "1000".into()),
                ("CallerID", "Paging...".into()),
                ("Application", "Playback".into()),
                ("Data", file.clone()),
                ("Async", "true".into()),
            ],
            Self::LiveTest => vec![
                ("Action", "Originate".into()),
                ("Channel", "Local/1@Paging-Test".into()),
                ("WaitTime", "15000".into()),
                ("CallerID", "Paging...".into()),
                ("Application", "Playback".into()),
                (
                    "Data",
                    "PreRecordedMessage/Pre-Recorded-4&PreRecordedMessage/Pre-Recorded-3\
                     &PreRecordedMessage/Pre-Recorded-2&tt-weasels"
                        .into(),
                ),
                ("Async", "true".into()),
            ],
            Self::KickGroup { group } => vec![
                ("Action", "ConfbridgeKick".into()),
                ("Conference", group.to_string()),
                ("Channel", "all".into()),
                ("Async", "true".into()),
            ],
        }
    }
}

// Display shows the verb and the addressed channel/conference; the full
// field map stays in Debug.
impl fmt::Display for SwitchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fields().get(1) {
            Some((key, value)) => write!(f, "{} {}={}", self.kind(), key, value),
            None => f.write_str(self.kind()),
        }
    }
}

/// Advisory outcome of a submitted action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResult {
    pub success: bool,
    pub action_id: String,
}

impl SubmitResult {
    /// Successful result with an assigned action id
    pub fn ok(action_id: impl Into<String>) -> Self {
        Self {
            success: true,
            action_id: action_id.into(),
        }
    }
}
