//! Model binding: configuration to live tag nodes.
//!
//! [`bind_model`] walks the [`GatewayConfig`] once, asks the binder
//! (an address space server or the simulator) for a node per tag, and
//! records every writable node in the route table. All naming and
//! initial values live here; nothing else invents tag names.

use std::collections::BTreeMap;

use page_protocol::{CallingField, ElementField, ExtensionStatus, PagingField, TagNodeId, TagValue};
use tracing::info;

use crate::config::GatewayConfig;
use crate::dispatch::{RouteKey, RouteTable};
use crate::element::{Element, ElementNodes, ElementRegistry, Zone};
use crate::engine::{CallingNodes, GatewayEngine};
use crate::error::EngineError;
use crate::group::GroupStatusAggregator;
use crate::paging::{PagingNodes, PagingStateMachine};
use crate::scheduler::{AutoCommandBinding, AutoSlot};

/// Creates tag nodes on behalf of [`bind_model`].
///
/// `writable` nodes are operator controls whose changes come back to
/// the gateway; the rest are gateway-owned status tags.
pub trait NodeBinder {
    fn folder(&mut self, name: &str);
    fn node(&mut self, name: &str, initial: TagValue, writable: bool) -> TagNodeId;
}

/// Binds the configured model and returns the ready engine.
pub fn bind_model(
    config: &GatewayConfig,
    binder: &mut dyn NodeBinder,
) -> Result<GatewayEngine, EngineError> {
    let mut registry = ElementRegistry::new();
    let mut groups = GroupStatusAggregator::new();
    let mut routes = RouteTable::new();

    // Group status bytes first so element binding can point at them.
    binder.folder("Groups");
    let mut group_nodes: BTreeMap<String, TagNodeId> = BTreeMap::new();
    for entry in &config.elements {
        group_nodes.entry(entry.group.clone()).or_insert_with(|| {
            binder.node(
                &format!("Group-Status-{}", entry.group),
                TagValue::Byte(0),
                false,
            )
        });
    }

    for entry in &config.elements {
        binder.folder(&entry.name);
        let nodes = ElementNodes {
            status: binder.node(
                &format!("{}-{}", entry.name, "ST"),
                TagValue::Byte(ExtensionStatus::OnHook.as_byte()),
                false,
            ),
            call: binder.node(
                &format!("{}-{}", entry.name, ElementField::Call.suffix()),
                TagValue::Int16(0),
                true,
            ),
            confirm: binder.node(
                &format!("{}-{}", entry.name, ElementField::Confirm.suffix()),
                TagValue::Bool(false),
                true,
            ),
            transfer: binder.node(
                &format!("{}-{}", entry.name, ElementField::Transfer.suffix()),
                TagValue::Str("0".to_string()),
                true,
            ),
            pickup: binder.node(
                &format!("{}-{}", entry.name, ElementField::Pickup.suffix()),
                TagValue::Bool(false),
                true,
            ),
            call_group: binder.node(
                &format!("{}-{}", entry.name, ElementField::CallGroup.suffix()),
                TagValue::Bool(false),
                true,
            ),
            call_group_status: binder.node(
                &format!("{}-CallGroup-Status", entry.name),
                TagValue::Bool(false),
                false,
            ),
        };
        for (field, node) in [
            (ElementField::Call, nodes.call),
            (ElementField::Confirm, nodes.confirm),
            (ElementField::Transfer, nodes.transfer),
            (ElementField::Pickup, nodes.pickup),
            (ElementField::CallGroup, nodes.call_group),
        ] {
            routes.insert(node, RouteKey::Element { name: entry.name.clone(), field });
        }
        let group_node = group_nodes[&entry.group];
        groups.register_member(&entry.extension, &entry.group, entry.group_bit, group_node)?;
        registry.insert_element(Element {
            name: entry.name.clone(),
            extension: entry.extension.clone(),
            kind: entry.kind,
            zone: entry.zone.clone(),
            group: entry.group.clone(),
            status: ExtensionStatus::OnHook,
            bound_channel: String::new(),
            transfer_target: String::new(),
            call_group_selected: false,
            nodes,
        })?;
    }

    binder.folder("Zones");
    for entry in &config.zones {
        let node = binder.node(
            &format!("Paging-Zone-{}", entry.name),
            TagValue::Bool(false),
            true,
        );
        routes.insert(node, RouteKey::ZoneSelect(entry.name.clone()));
        registry.insert_zone(Zone { name: entry.name.clone(), active: false })?;
    }

    binder.folder("Paging");
    let controls = [
        (PagingField::Live, TagValue::Bool(false)),
        (PagingField::LiveTest, TagValue::Bool(false)),
        (PagingField::BroadcastMessage, TagValue::Bool(false)),
        (PagingField::BroadcastMessageNo, TagValue::Byte(0)),
        (PagingField::Semiautomatic, TagValue::Bool(false)),
        (
            PagingField::SemiautomaticRepetitions,
            TagValue::Int16(config.semiautomatic.repetitions as i16),
        ),
        (
            PagingField::SemiautomaticDelay,
            TagValue::Int16(config.semiautomatic.delay_secs as i16),
        ),
        (PagingField::Automatic, TagValue::Bool(false)),
        (PagingField::AutomaticPause, TagValue::Bool(false)),
    ];
    let mut control_nodes: BTreeMap<&'static str, TagNodeId> = BTreeMap::new();
    for (field, initial) in controls {
        let node = binder.node(field.tag_name(), initial, true);
        routes.insert(node, RouteKey::Paging(field));
        control_nodes.insert(field.tag_name(), node);
    }
    let paging_nodes = PagingNodes {
        status: binder.node("Paging-Status", TagValue::Str("Ready".to_string()), false),
        status_code: binder.node("Paging-Status-Code", TagValue::Byte(0), false),
        active_channels: binder.node("Paging-Active-Channels", TagValue::Int16(0), false),
        live_status: binder.node("Paging-Live-Status", TagValue::Bool(false), false),
        live_test: control_nodes[PagingField::LiveTest.tag_name()],
        broadcast_status: binder.node("Broadcasting-Message-Status", TagValue::Bool(false), false),
        broadcast_title: binder.node(
            "Broadcasting-Message-Message",
            TagValue::Str(String::new()),
            false,
        ),
        semiautomatic: control_nodes[PagingField::Semiautomatic.tag_name()],
        semiautomatic_status: binder.node(
            "Semiautomatic-Paging-Status",
            TagValue::Bool(false),
            false,
        ),
        semiautomatic_remaining: binder.node(
            "Semiautomatic-Paging-Repetition-Status",
            TagValue::Str("0".to_string()),
            false,
        ),
        automatic_status: binder.node("Automatic-Paging-Status", TagValue::Bool(false), false),
    };

    binder.folder("Calling");
    let calling_controls = [
        (CallingField::PreRecordMessage, TagValue::Bool(false)),
        (CallingField::PreRecordMessageNo, TagValue::Byte(0)),
        (CallingField::CallGroupCalling, TagValue::Bool(false)),
        (CallingField::CallGroupReset, TagValue::Bool(false)),
    ];
    let mut calling_ids: BTreeMap<&'static str, TagNodeId> = BTreeMap::new();
    for (field, initial) in calling_controls {
        let node = binder.node(field.tag_name(), initial, true);
        routes.insert(node, RouteKey::Calling(field));
        calling_ids.insert(field.tag_name(), node);
    }
    let calling_nodes = CallingNodes {
        prerecord_status: binder.node(
            "Call-PreRecord-Message-Status",
            TagValue::Bool(false),
            false,
        ),
        prerecord_title: binder.node(
            "Call-PreRecord-Message-Message",
            TagValue::Str(String::new()),
            false,
        ),
        call_group_status: binder.node("Call-CallGroup-Status", TagValue::Bool(false), false),
        call_group_reset: calling_ids[CallingField::CallGroupReset.tag_name()],
    };

    let mut auto_commands = Vec::new();
    if !config.auto_commands.is_empty() {
        binder.folder("Automatic-Commands");
        for entry in &config.auto_commands {
            for slot in &entry.slots {
                if slot.bit >= 8 {
                    return Err(EngineError::GroupBitOutOfRange {
                        group: entry.name.clone(),
                        bit: slot.bit,
                    });
                }
                if !config.messages.iter().any(|m| m.index == slot.message) {
                    return Err(EngineError::UnknownMessage(slot.message));
                }
            }
            let node = binder.node(
                &format!("Automatic-Paging-CMD-{}", entry.name),
                TagValue::Byte(0),
                true,
            );
            auto_commands.push(AutoCommandBinding {
                name: entry.name.clone(),
                node,
                slots: entry
                    .slots
                    .iter()
                    .map(|s| AutoSlot {
                        bit: s.bit,
                        extension: s.extension.clone(),
                        message: s.message,
                    })
                    .collect(),
            });
        }
    }

    if !config.parameters.is_empty() {
        binder.folder("Parameters");
        for entry in &config.parameters {
            let node = binder.node(
                &entry.name,
                TagValue::Str(entry.initial.clone()),
                true,
            );
            routes.insert(node, RouteKey::Parameter(entry.name.clone()));
        }
    }

    let messages: BTreeMap<u8, _> = config
        .messages
        .iter()
        .map(|m| (m.index, m.clone()))
        .collect();

    let paging = PagingStateMachine::new(
        paging_nodes,
        config.semiautomatic.repetitions,
        config.semiautomatic.delay_secs,
    );

    info!(
        elements = config.elements.len(),
        zones = config.zones.len(),
        messages = messages.len(),
        routes = routes.len(),
        "gateway model bound"
    );

    Ok(GatewayEngine::new(
        registry,
        groups,
        paging,
        routes,
        messages,
        auto_commands,
        calling_nodes,
    ))
}
