//! Elements and zones: the live registry behind the tag space.

use std::collections::HashMap;

use page_protocol::{ExtensionStatus, TagNodeId};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Zone name that hosts the master operator station.
pub const MASTER_ZONE: &str = "MST";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A plain telephone station.
    Station,
    /// A paging loudspeaker endpoint.
    Pager,
    /// An operator console; the one in [`MASTER_ZONE`] is the master.
    Operator,
}

/// Tag nodes bound for a single element.
#[derive(Debug, Clone, Copy)]
pub struct ElementNodes {
    pub status: TagNodeId,
    pub call: TagNodeId,
    pub confirm: TagNodeId,
    pub transfer: TagNodeId,
    pub pickup: TagNodeId,
    pub call_group: TagNodeId,
    pub call_group_status: TagNodeId,
}

/// Runtime state of one telephony endpoint.
#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub extension: String,
    pub kind: ElementKind,
    pub zone: String,
    pub group: String,
    pub status: ExtensionStatus,
    /// Channel the extension was last seen on; empty when unknown.
    pub bound_channel: String,
    /// Target extension cached from the TRANSFER tag.
    pub transfer_target: String,
    pub call_group_selected: bool,
    pub nodes: ElementNodes,
}

/// A selectable paging zone.
#[derive(Debug, Clone)]
pub struct Zone {
    pub name: String,
    pub active: bool,
}

/// All elements and zones, indexed by name and by extension.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    elements: HashMap<String, Element>,
    by_extension: HashMap<String, String>,
    zones: HashMap<String, Zone>,
    /// Element names in configuration order, for stable iteration.
    order: Vec<String>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_element(&mut self, element: Element) -> Result<(), EngineError> {
        if self.elements.contains_key(&element.name)
            || self.by_extension.contains_key(&element.extension)
        {
            return Err(EngineError::DuplicateElement(element.name));
        }
        self.by_extension
            .insert(element.extension.clone(), element.name.clone());
        self.order.push(element.name.clone());
        self.elements.insert(element.name.clone(), element);
        Ok(())
    }

    pub fn insert_zone(&mut self, zone: Zone) -> Result<(), EngineError> {
        if self.zones.contains_key(&zone.name) {
            return Err(EngineError::DuplicateZone(zone.name));
        }
        self.zones.insert(zone.name.clone(), zone);
        Ok(())
    }

    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.get(name)
    }

    pub fn element_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements.get_mut(name)
    }

    pub fn element_by_extension_mut(&mut self, extension: &str) -> Option<&mut Element> {
        let name = self.by_extension.get(extension)?;
        self.elements.get_mut(name)
    }

    pub fn zone_mut(&mut self, name: &str) -> Option<&mut Zone> {
        self.zones.get_mut(name)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|n| self.elements.get(n))
    }

    /// Extension of the master operator, if one is configured.
    pub fn master_extension(&self) -> Option<String> {
        self.elements()
            .find(|e| e.kind == ElementKind::Operator && e.zone == MASTER_ZONE)
            .map(|e| e.extension.clone())
    }

    /// Pager extensions in every currently selected zone, in
    /// configuration order.
    pub fn active_zone_extensions(&self) -> Vec<String> {
        self.elements()
            .filter(|e| {
                e.kind == ElementKind::Pager
                    && self.zones.get(&e.zone).is_some_and(|z| z.active)
            })
            .map(|e| e.extension.clone())
            .collect()
    }

    /// Names of elements whose call-group flag is currently set.
    pub fn call_group_selection(&self) -> Vec<String> {
        self.elements()
            .filter(|e| e.call_group_selected)
            .map(|e| e.name.clone())
            .collect()
    }
}
