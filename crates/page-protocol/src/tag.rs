//! Tag addressing and the `{entity}-{field}` naming convention
//!
//! Every operator-facing point is a tag node with a numeric identifier
//! and a hierarchical name. The final `-`-separated segment of the name
//! is the field; the remainder is the entity. Splitting on the *last*
//! dash matters because entities themselves contain dashes
//! (`E2-TEL-101-CALL` is field `CALL` of entity `E2-TEL-101`).
//!
//! The engine routes on node ids it handed out at bind time, so the
//! parse functions here are for adapters that only see browse names,
//! such as an address-space frontend mapping subscriptions back to
//! fields.

use std::fmt;

use crate::error::ProtocolError;

/// Unique identifier for a tag node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagNodeId(pub u32);

impl TagNodeId {
    /// Get the raw identifier value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TagNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Value carried by a tag node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagValue {
    Bool(bool),
    Byte(u8),
    Int16(i16),
    Str(String),
}

impl TagValue {
    /// Interpret the value as a boolean edge
    ///
    /// Numeric tags count as true when non-zero; string tags never do.
    /// Operator panels write `1` to some boolean-semantics controls
    /// (the CALL tag is an Int16), so truthiness must span the numeric
    /// variants.
    pub fn is_truthy(&self) -> bool {
        match self {
            TagValue::Bool(b) => *b,
            TagValue::Byte(v) => *v != 0,
            TagValue::Int16(v) => *v != 0,
            TagValue::Str(_) => false,
        }
    }

    /// Interpret the value as a small unsigned index (message selectors)
    pub fn as_index(&self) -> Option<u8> {
        match self {
            TagValue::Byte(v) => Some(*v),
            TagValue::Int16(v) => u8::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Interpret the value as an unsigned count
    pub fn as_count(&self) -> Option<u16> {
        match self {
            TagValue::Byte(v) => Some(u16::from(*v)),
            TagValue::Int16(v) => u16::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Bool(b) => write!(f, "{b}"),
            TagValue::Byte(v) => write!(f, "{v}"),
            TagValue::Int16(v) => write!(f, "{v}"),
            TagValue::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Split a tag name into `(entity, field)` on the last dash
pub fn split_tag_name(name: &str) -> Result<(&str, &str), ProtocolError> {
    match name.rfind('-') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => {
            Ok((&name[..idx], &name[idx + 1..]))
        }
        _ => Err(ProtocolError::MissingSeparator(name.to_string())),
    }
}

/// Per-element control fields
///
/// These are the subscribed fields of a station entity. `Transfer` is
/// subscribed only to keep the element's transfer target cached; it
/// triggers no call-control action by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementField {
    Call,
    Confirm,
    Pickup,
    CallGroup,
    Transfer,
}

impl ElementField {
    /// Parse the field segment of an element tag name
    pub fn parse(field: &str) -> Result<Self, ProtocolError> {
        match field {
            "CALL" => Ok(Self::Call),
            "CONFIRM" => Ok(Self::Confirm),
            "PICKUP" => Ok(Self::Pickup),
            "CallGroup" => Ok(Self::CallGroup),
            "TRANSFER" => Ok(Self::Transfer),
            _ => Err(ProtocolError::UnknownElementField(field.to_string())),
        }
    }

    /// Tag-name suffix for this field
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Confirm => "CONFIRM",
            Self::Pickup => "PICKUP",
            Self::CallGroup => "CallGroup",
            Self::Transfer => "TRANSFER",
        }
    }
}

/// Paging control tags (matched on the full tag name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PagingField {
    Live,
    LiveTest,
    BroadcastMessage,
    BroadcastMessageNo,
    Semiautomatic,
    SemiautomaticRepetitions,
    SemiautomaticDelay,
    Automatic,
    AutomaticPause,
}

impl PagingField {
    /// Parse a full paging tag name
    pub fn parse(name: &str) -> Result<Self, ProtocolError> {
        match name {
            "Paging-Live" => Ok(Self::Live),
            "Paging-Live-Test" => Ok(Self::LiveTest),
            "Broadcasting-Message" => Ok(Self::BroadcastMessage),
            "Broadcasting-Message-No" => Ok(Self::BroadcastMessageNo),
            "Semiautomatic-Paging" => Ok(Self::Semiautomatic),
            "Semiautomatic-Paging-No-Repetitions" => Ok(Self::SemiautomaticRepetitions),
            "Semiautomatic-Paging-Delay" => Ok(Self::SemiautomaticDelay),
            "Automatic-Paging" => Ok(Self::Automatic),
            "Automatic-Paging-Pause" => Ok(Self::AutomaticPause),
            _ => Err(ProtocolError::UnknownPagingTag(name.to_string())),
        }
    }

    /// Full tag name for this control
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Live => "Paging-Live",
            Self::LiveTest => "Paging-Live-Test",
            Self::BroadcastMessage => "Broadcasting-Message",
            Self::BroadcastMessageNo => "Broadcasting-Message-No",
            Self::Semiautomatic => "Semiautomatic-Paging",
            Self::SemiautomaticRepetitions => "Semiautomatic-Paging-No-Repetitions",
            Self::SemiautomaticDelay => "Semiautomatic-Paging-Delay",
            Self::Automatic => "Automatic-Paging",
            Self::AutomaticPause => "Automatic-Paging-Pause",
        }
    }
}

/// Calling control tags (matched on the full tag name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallingField {
    PreRecordMessage,
    PreRecordMessageNo,
    CallGroupCalling,
    CallGroupReset,
}

impl CallingField {
    /// Parse a full calling tag name
    pub fn parse(name: &str) -> Result<Self, ProtocolError> {
        match name {
            "Call-PreRecord-Message" => Ok(Self::PreRecordMessage),
            "Call-PreRecord-Message-No" => Ok(Self::PreRecordMessageNo),
            "Call-CallGroup-Calling" => Ok(Self::CallGroupCalling),
            "Call-CallGroup-Reset" => Ok(Self::CallGroupReset),
            _ => Err(ProtocolError::UnknownCallingTag(name.to_string())),
        }
    }

    /// Full tag name for this control
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::PreRecordMessage => "Call-PreRecord-Message",
            Self::PreRecordMessageNo => "Call-PreRecord-Message-No",
            Self::CallGroupCalling => "Call-CallGroup-Calling",
            Self::CallGroupReset => "Call-CallGroup-Reset",
        }
    }
}
