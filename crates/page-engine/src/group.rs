//! Group status bytes, one bit per member extension.
//!
//! Each status group mirrors the call activity of up to eight
//! extensions into a single byte tag. A member's bit is toggled with
//! XOR, so applying the same transition twice leaves the byte
//! unchanged and flipping back restores the previous value.

use std::collections::HashMap;

use page_protocol::TagNodeId;
use tracing::debug;

use crate::error::EngineError;

#[derive(Debug)]
struct GroupMember {
    group: String,
    bit: u8,
    active: bool,
}

#[derive(Debug)]
struct GroupWord {
    node: TagNodeId,
    word: u8,
}

/// Folds per-extension activity into per-group status bytes.
#[derive(Debug, Default)]
pub struct GroupStatusAggregator {
    members: HashMap<String, GroupMember>,
    groups: HashMap<String, GroupWord>,
}

impl GroupStatusAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `extension` as bit `bit` of `group`, creating the
    /// group on first mention.
    pub fn register_member(
        &mut self,
        extension: &str,
        group: &str,
        bit: u8,
        node: TagNodeId,
    ) -> Result<(), EngineError> {
        if bit >= 8 {
            return Err(EngineError::GroupBitOutOfRange {
                group: group.to_string(),
                bit,
            });
        }
        self.groups
            .entry(group.to_string())
            .or_insert(GroupWord { node, word: 0 });
        self.members.insert(
            extension.to_string(),
            GroupMember {
                group: group.to_string(),
                bit,
                active: false,
            },
        );
        Ok(())
    }

    /// Applies an activity transition for `extension`.
    ///
    /// Returns the group node and its new byte when the byte changed,
    /// `None` when the extension is unknown or already in that state.
    pub fn set_active(&mut self, extension: &str, active: bool) -> Option<(TagNodeId, u8)> {
        let member = match self.members.get_mut(extension) {
            Some(m) => m,
            None => {
                debug!(extension, "activity for extension outside any status group");
                return None;
            }
        };
        if member.active == active {
            return None;
        }
        member.active = active;
        let word = self.groups.get_mut(&member.group)?;
        word.word ^= 1 << member.bit;
        Some((word.node, word.word))
    }

    /// Current byte of `group`, if it exists.
    pub fn word(&self, group: &str) -> Option<u8> {
        self.groups.get(group).map(|g| g.word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn aggregator() -> GroupStatusAggregator {
        let mut agg = GroupStatusAggregator::new();
        agg.register_member("101", "G1", 0, TagNodeId(1)).unwrap();
        agg.register_member("102", "G1", 1, TagNodeId(1)).unwrap();
        agg.register_member("201", "G2", 0, TagNodeId(2)).unwrap();
        agg
    }

    #[test]
    fn bits_accumulate_per_group() {
        let mut agg = aggregator();
        assert_eq!(agg.set_active("101", true), Some((TagNodeId(1), 0b01)));
        assert_eq!(agg.set_active("102", true), Some((TagNodeId(1), 0b11)));
        assert_eq!(agg.set_active("201", true), Some((TagNodeId(2), 0b01)));
        assert_eq!(agg.set_active("101", false), Some((TagNodeId(1), 0b10)));
    }

    #[test]
    fn repeated_transition_is_suppressed() {
        let mut agg = aggregator();
        assert!(agg.set_active("101", true).is_some());
        assert_eq!(agg.set_active("101", true), None);
        assert_eq!(agg.word("G1"), Some(0b01));
    }

    #[test]
    fn unknown_extension_is_ignored() {
        let mut agg = aggregator();
        assert_eq!(agg.set_active("999", true), None);
    }

    #[test]
    fn ninth_bit_is_rejected() {
        let mut agg = GroupStatusAggregator::new();
        let err = agg.register_member("101", "G1", 8, TagNodeId(1)).unwrap_err();
        assert!(matches!(err, EngineError::GroupBitOutOfRange { bit: 8, .. }));
    }

    proptest! {
        // Toggling any member on and back off restores the byte.
        #[test]
        fn toggle_is_an_involution(bit in 0u8..8, word in any::<u8>()) {
            let toggled = word ^ (1 << bit);
            prop_assert_eq!(toggled ^ (1 << bit), word);
            prop_assert_ne!(toggled, word);
        }
    }
}
