//! Integration tests for the paging gateway
//!
//! These tests drive the full actor against the simulated tag space
//! and call switch, covering:
//! - Call, transfer-confirm and pickup tag handling
//! - Status projection and group aggregation from switch events
//! - Live, broadcast and semi-automatic paging flows
//! - The automatic scheduler lifecycle
//! - Conference collapse recovery

use std::time::Duration;

use page_engine::{GatewayConfig, GatewayEvent};
use page_protocol::{
    ConferencePhase, RedirectKind, SwitchAction, SwitchEvent, TagValue, MANUAL_PAGING_GROUP,
};
use page_sim::SimGateway;

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    /// Plant model: one master operator, two stations, two pagers in
    /// separate zones, two messages and one automatic command tag.
    pub fn config() -> GatewayConfig {
        serde_json::from_str(
            r#"{
                "elements": [
                    {"name": "MST-TEL-100", "extension": "100", "kind": "operator",
                     "zone": "MST", "group": "G1", "group_bit": 0},
                    {"name": "E1-TEL-101", "extension": "101", "kind": "station",
                     "zone": "E1", "group": "G1", "group_bit": 1},
                    {"name": "E1-TEL-102", "extension": "102", "kind": "station",
                     "zone": "E1", "group": "G1", "group_bit": 2},
                    {"name": "E1-TEL-201", "extension": "201", "kind": "pager",
                     "zone": "E1", "group": "G2", "group_bit": 0},
                    {"name": "E2-TEL-202", "extension": "202", "kind": "pager",
                     "zone": "E2", "group": "G2", "group_bit": 1}
                ],
                "zones": [{"name": "MST"}, {"name": "E1"}, {"name": "E2"}],
                "messages": [
                    {"index": 1, "title": "General Evacuation", "file": "evacuation.wav"},
                    {"index": 2, "title": "Shift Change", "file": "shift-change.wav"}
                ],
                "auto_commands": [
                    {"name": "Area-1", "slots": [
                        {"bit": 0, "extension": "201", "message": 1},
                        {"bit": 1, "extension": "202", "message": 2}
                    ]}
                ],
                "semiautomatic": {"repetitions": 2, "delay_secs": 0},
                "scheduler": {"heartbeat_ms": 20, "pause_poll_ms": 20}
            }"#,
        )
        .expect("valid test model")
    }

    pub fn config_without_master() -> GatewayConfig {
        let mut cfg = config();
        cfg.elements.retain(|e| e.extension != "100");
        cfg
    }

    /// Polls `cond` until it holds or a short deadline passes.
    pub async fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
        for _ in 0..400 {
            if cond() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    pub async fn wait_for_action(
        gateway: &SimGateway,
        pred: impl Fn(&SwitchAction) -> bool + Copy,
    ) -> bool {
        wait_for(|| gateway.switch.actions().iter().any(pred)).await
    }

    pub async fn wait_for_tag(gateway: &SimGateway, name: &str, value: TagValue) -> bool {
        wait_for(|| gateway.tags.value(name) == Some(value.clone())).await
    }

    /// A manual-conference member leaving, as reported by the switch.
    pub fn playback_finished_event() -> SwitchEvent {
        SwitchEvent::Conference {
            phase: ConferencePhase::Leave,
            conference: MANUAL_PAGING_GROUP.to_string(),
            channels: 3,
            channel: "Local/999@Paging-app-00000001;2".into(),
        }
    }

    pub fn channel_up(extension: &str) -> SwitchEvent {
        SwitchEvent::ChannelState {
            extension: extension.into(),
            state: "Up".into(),
            channel: format!("PJSIP/{extension}-00000001"),
        }
    }

    pub fn hangup(extension: &str) -> SwitchEvent {
        SwitchEvent::ChannelState {
            extension: extension.into(),
            state: "Hangup".into(),
            channel: String::new(),
        }
    }
}

use helpers::*;

// ============================================================================
// Element tags
// ============================================================================

#[tokio::test]
async fn call_tag_originates_and_resets() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("E1-TEL-101-CALL", TagValue::Int16(1))
        .await
        .unwrap();

    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::Originate { extension } if extension.as_str() == "101"
        ))
        .await
    );
    // The control tag is handed back to the operator.
    assert!(wait_for_tag(&gateway, "E1-TEL-101-CALL", TagValue::Int16(0)).await);
    gateway.shutdown().await;
}

#[tokio::test]
async fn confirm_transfers_the_bound_channel() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway.switch.inject(channel_up("101")).await.unwrap();
    assert!(wait_for_tag(&gateway, "E1-TEL-101-ST", TagValue::Byte(2)).await);
    gateway
        .tags
        .operator_write("E1-TEL-101-TRANSFER", TagValue::Str("102".into()))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("E1-TEL-101-CONFIRM", TagValue::Bool(true))
        .await
        .unwrap();

    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::Redirect { channel, target, kind: RedirectKind::Transfer }
                if channel.as_str() == "PJSIP/101-00000001" && target.as_str() == "102"
        ))
        .await
    );
    assert!(wait_for_tag(&gateway, "E1-TEL-101-CONFIRM", TagValue::Bool(false)).await);
    gateway.shutdown().await;
}

#[tokio::test]
async fn pickup_redirects_to_the_master() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway.switch.inject(channel_up("102")).await.unwrap();
    assert!(wait_for_tag(&gateway, "E1-TEL-102-ST", TagValue::Byte(2)).await);
    gateway
        .tags
        .operator_write("E1-TEL-102-PICKUP", TagValue::Bool(true))
        .await
        .unwrap();

    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::Redirect { target, kind: RedirectKind::Pickup, .. }
                if target.as_str() == "100"
        ))
        .await
    );
    gateway.shutdown().await;
}

#[tokio::test]
async fn pickup_without_master_submits_nothing() {
    let gateway = SimGateway::start(&config_without_master()).unwrap();

    gateway.switch.inject(channel_up("102")).await.unwrap();
    gateway
        .tags
        .operator_write("E1-TEL-102-PICKUP", TagValue::Bool(true))
        .await
        .unwrap();

    // The control tag still resets, proving the event was handled.
    assert!(wait_for_tag(&gateway, "E1-TEL-102-PICKUP", TagValue::Bool(false)).await);
    assert!(gateway
        .switch
        .actions()
        .iter()
        .all(|a| !matches!(a, SwitchAction::Redirect { .. })));
    gateway.shutdown().await;
}

// ============================================================================
// Status projection and groups
// ============================================================================

#[tokio::test]
async fn channel_states_project_status_and_group_bits() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway.switch.inject(channel_up("101")).await.unwrap();
    assert!(wait_for_tag(&gateway, "E1-TEL-101-ST", TagValue::Byte(2)).await);
    assert!(wait_for_tag(&gateway, "Group-Status-G1", TagValue::Byte(0b010)).await);

    gateway.switch.inject(channel_up("102")).await.unwrap();
    assert!(wait_for_tag(&gateway, "Group-Status-G1", TagValue::Byte(0b110)).await);

    gateway.switch.inject(hangup("101")).await.unwrap();
    assert!(wait_for_tag(&gateway, "E1-TEL-101-ST", TagValue::Byte(1)).await);
    assert!(wait_for_tag(&gateway, "Group-Status-G1", TagValue::Byte(0b100)).await);
    gateway.shutdown().await;
}

#[tokio::test]
async fn peer_reachability_projects_onto_the_status_tag() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .switch
        .inject(SwitchEvent::PeerStatus {
            extension: "101".into(),
            status: "Unreachable".into(),
        })
        .await
        .unwrap();
    assert!(wait_for_tag(&gateway, "E1-TEL-101-ST", TagValue::Byte(16)).await);

    gateway
        .switch
        .inject(SwitchEvent::PeerStatus {
            extension: "101".into(),
            status: "Reachable".into(),
        })
        .await
        .unwrap();
    assert!(wait_for_tag(&gateway, "E1-TEL-101-ST", TagValue::Byte(1)).await);
    // Reachability never counts toward the group word.
    assert_eq!(gateway.tags.value("Group-Status-G1"), Some(TagValue::Byte(0)));
    gateway.shutdown().await;
}

#[tokio::test]
async fn events_for_unmanaged_extensions_are_dropped() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway.switch.inject(channel_up("777")).await.unwrap();
    // The gateway keeps running and handles the next event normally.
    gateway.switch.inject(channel_up("101")).await.unwrap();
    assert!(wait_for_tag(&gateway, "E1-TEL-101-ST", TagValue::Byte(2)).await);
    assert!(wait_for_tag(&gateway, "Group-Status-G1", TagValue::Byte(0b010)).await);
    gateway.shutdown().await;
}

// ============================================================================
// Live and broadcast paging
// ============================================================================

#[tokio::test]
async fn live_paging_builds_and_tears_down_the_conference() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("Paging-Zone-E1", TagValue::Bool(true))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Paging-Live", TagValue::Bool(true))
        .await
        .unwrap();

    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::ActivatePager { extension, group: MANUAL_PAGING_GROUP }
                if extension.as_str() == "201"
        ))
        .await
    );
    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::ActivateMaster { extension, group: MANUAL_PAGING_GROUP }
                if extension.as_str() == "100"
        ))
        .await
    );
    // Pagers outside the selected zone stay quiet.
    assert!(!gateway.switch.actions().iter().any(|a| matches!(
        a,
        SwitchAction::ActivatePager { extension, .. } if extension.as_str() == "202"
    )));
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(1)).await);
    assert!(wait_for_tag(&gateway, "Paging-Status", TagValue::Str("Live Paging".into())).await);

    gateway
        .tags
        .operator_write("Paging-Live", TagValue::Bool(false))
        .await
        .unwrap();
    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::KickGroup { group: MANUAL_PAGING_GROUP }
        ))
        .await
    );
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(0)).await);
    gateway.shutdown().await;
}

#[tokio::test]
async fn live_test_fires_once_and_resets_the_tag() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("Paging-Live-Test", TagValue::Bool(true))
        .await
        .unwrap();

    assert!(wait_for_action(&gateway, |a| matches!(a, SwitchAction::LiveTest)).await);
    assert!(wait_for_tag(&gateway, "Paging-Live-Test", TagValue::Bool(false)).await);
    // The gateway's own reset write must not retrigger the chain.
    assert_eq!(
        gateway
            .switch
            .actions()
            .iter()
            .filter(|a| matches!(a, SwitchAction::LiveTest))
            .count(),
        1
    );
    gateway.shutdown().await;
}

#[tokio::test]
async fn live_without_master_is_refused() {
    let gateway = SimGateway::start(&config_without_master()).unwrap();

    gateway
        .tags
        .operator_write("Paging-Zone-E1", TagValue::Bool(true))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Paging-Live", TagValue::Bool(true))
        .await
        .unwrap();

    // Trailing write proves the earlier ones were processed.
    gateway
        .tags
        .operator_write("E1-TEL-101-CALL", TagValue::Int16(1))
        .await
        .unwrap();
    assert!(wait_for_action(&gateway, |a| matches!(a, SwitchAction::Originate { .. })).await);

    assert!(!gateway
        .switch
        .actions()
        .iter()
        .any(|a| matches!(a, SwitchAction::ActivatePager { .. })));
    assert_eq!(gateway.tags.value("Paging-Status-Code"), Some(TagValue::Byte(0)));
    gateway.shutdown().await;
}

#[tokio::test]
async fn broadcast_on_live_plays_without_admin_rights() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("Paging-Zone-E1", TagValue::Bool(true))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Paging-Live", TagValue::Bool(true))
        .await
        .unwrap();
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(1)).await);

    gateway
        .tags
        .operator_write("Broadcasting-Message-No", TagValue::Byte(1))
        .await
        .unwrap();
    assert!(
        wait_for_tag(
            &gateway,
            "Broadcasting-Message-Message",
            TagValue::Str("General Evacuation".into())
        )
        .await
    );
    gateway
        .tags
        .operator_write("Broadcasting-Message", TagValue::Bool(true))
        .await
        .unwrap();

    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::PlayMessage { group: MANUAL_PAGING_GROUP, file, admin: false }
                if file.as_str() == "evacuation.wav"
        ))
        .await
    );
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(3)).await);
    assert!(
        wait_for_tag(
            &gateway,
            "Paging-Status",
            TagValue::Str("Broadcasting on Live".into())
        )
        .await
    );

    // The broadcast ends but live keeps the conference.
    gateway
        .switch
        .inject(playback_finished_event())
        .await
        .unwrap();
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(1)).await);
    assert!(!gateway
        .switch
        .actions()
        .iter()
        .any(|a| matches!(a, SwitchAction::KickGroup { .. })));
    gateway.shutdown().await;
}

#[tokio::test]
async fn standalone_broadcast_gets_admin_rights() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("Paging-Zone-E1", TagValue::Bool(true))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Broadcasting-Message-No", TagValue::Byte(2))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Broadcasting-Message", TagValue::Bool(true))
        .await
        .unwrap();

    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::PlayMessage { admin: true, file, .. } if file.as_str() == "shift-change.wav"
        ))
        .await
    );
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(2)).await);
    gateway.shutdown().await;
}

#[tokio::test]
async fn broadcast_without_selection_is_refused() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("Paging-Zone-E1", TagValue::Bool(true))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Broadcasting-Message", TagValue::Bool(true))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("E1-TEL-101-CALL", TagValue::Int16(1))
        .await
        .unwrap();
    assert!(wait_for_action(&gateway, |a| matches!(a, SwitchAction::Originate { .. })).await);

    assert!(!gateway
        .switch
        .actions()
        .iter()
        .any(|a| matches!(a, SwitchAction::PlayMessage { .. })));
    assert_eq!(gateway.tags.value("Paging-Status-Code"), Some(TagValue::Byte(0)));
    gateway.shutdown().await;
}

// ============================================================================
// Semi-automatic paging
// ============================================================================

#[tokio::test]
async fn semiautomatic_cycle_repeats_and_completes() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("Paging-Zone-E1", TagValue::Bool(true))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Broadcasting-Message-No", TagValue::Byte(1))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Semiautomatic-Paging", TagValue::Bool(true))
        .await
        .unwrap();

    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(4)).await);
    assert!(
        wait_for_tag(
            &gateway,
            "Semiautomatic-Paging-Repetition-Status",
            TagValue::Str("2".into())
        )
        .await
    );
    assert!(
        wait_for_action(&gateway, |a| matches!(a, SwitchAction::PlayMessage { .. })).await
    );
    gateway.switch.take_actions();

    // First completion: one repetition left, replayed after the delay.
    gateway
        .switch
        .inject(playback_finished_event())
        .await
        .unwrap();
    assert!(
        wait_for_tag(
            &gateway,
            "Semiautomatic-Paging-Repetition-Status",
            TagValue::Str("1".into())
        )
        .await
    );
    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::PlayMessage { file, admin: false, .. } if file.as_str() == "evacuation.wav"
        ))
        .await
    );

    // Second completion exhausts the cycle.
    gateway
        .switch
        .inject(playback_finished_event())
        .await
        .unwrap();
    assert!(
        wait_for_tag(
            &gateway,
            "Semiautomatic-Paging-Repetition-Status",
            TagValue::Str("0".into())
        )
        .await
    );
    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::KickGroup { group: MANUAL_PAGING_GROUP }
        ))
        .await
    );
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(0)).await);
    gateway.shutdown().await;
}

#[tokio::test]
async fn semiautomatic_is_refused_while_live() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("Paging-Zone-E1", TagValue::Bool(true))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Paging-Live", TagValue::Bool(true))
        .await
        .unwrap();
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(1)).await);

    gateway
        .tags
        .operator_write("Broadcasting-Message-No", TagValue::Byte(1))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Semiautomatic-Paging", TagValue::Bool(true))
        .await
        .unwrap();

    // The gateway writes the control tag back to false.
    assert!(wait_for_tag(&gateway, "Semiautomatic-Paging", TagValue::Bool(false)).await);
    assert_eq!(gateway.tags.value("Paging-Status-Code"), Some(TagValue::Byte(1)));
    gateway.shutdown().await;
}

// ============================================================================
// Automatic scheduler
// ============================================================================

#[tokio::test]
async fn automatic_scheduler_runs_command_groups() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("Automatic-Paging-CMD-Area-1", TagValue::Byte(0b11))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Automatic-Paging", TagValue::Bool(true))
        .await
        .unwrap();

    assert!(wait_for_tag(&gateway, "Automatic-Paging-Status", TagValue::Bool(true)).await);
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(5)).await);
    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::ActivatePager { extension, group: 1 } if extension.as_str() == "201"
        ))
        .await
    );
    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::PlayAutoMessage { group: 1, file } if file.as_str() == "evacuation.wav"
        ))
        .await
    );
    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::PlayAutoMessage { group: 2, file } if file.as_str() == "shift-change.wav"
        ))
        .await
    );

    gateway
        .tags
        .operator_write("Automatic-Paging", TagValue::Bool(false))
        .await
        .unwrap();
    assert!(wait_for_tag(&gateway, "Automatic-Paging-Status", TagValue::Bool(false)).await);
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(0)).await);
    assert!(
        wait_for_action(&gateway, |a| matches!(a, SwitchAction::KickGroup { group: 1 })).await
    );
    gateway.shutdown().await;
}

#[tokio::test]
async fn automatic_pass_is_relayed_to_observers() {
    let gateway = SimGateway::start(&config()).unwrap();
    let mut events = gateway.subscribe();

    gateway
        .tags
        .operator_write("Automatic-Paging-CMD-Area-1", TagValue::Byte(0b01))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Automatic-Paging", TagValue::Bool(true))
        .await
        .unwrap();

    let groups = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let GatewayEvent::AutomaticPassStarted { groups } = events.recv().await.unwrap() {
                break groups;
            }
        }
    })
    .await
    .expect("a pass announcement");
    assert_eq!(groups, vec![1]);
    gateway.shutdown().await;
}

#[tokio::test]
async fn live_paging_pauses_the_scheduler() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("Automatic-Paging-CMD-Area-1", TagValue::Byte(0b01))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Automatic-Paging", TagValue::Bool(true))
        .await
        .unwrap();
    assert!(
        wait_for_action(&gateway, |a| matches!(a, SwitchAction::PlayAutoMessage { .. })).await
    );

    gateway
        .tags
        .operator_write("Paging-Zone-E1", TagValue::Bool(true))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Paging-Live", TagValue::Bool(true))
        .await
        .unwrap();
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(1)).await);

    // The paused scheduler kicks its groups and starts no new pass.
    assert!(
        wait_for_action(&gateway, |a| matches!(a, SwitchAction::KickGroup { group: 1 })).await
    );
    gateway.switch.take_actions();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!gateway
        .switch
        .actions()
        .iter()
        .any(|a| matches!(a, SwitchAction::PlayAutoMessage { .. })));

    // Live ending resumes it.
    gateway
        .tags
        .operator_write("Paging-Live", TagValue::Bool(false))
        .await
        .unwrap();
    assert!(
        wait_for_action(&gateway, |a| matches!(a, SwitchAction::PlayAutoMessage { .. })).await
    );
    gateway.shutdown().await;
}

// ============================================================================
// Conference collapse
// ============================================================================

#[tokio::test]
async fn conference_end_forces_ready() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("Paging-Zone-E1", TagValue::Bool(true))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("Paging-Live", TagValue::Bool(true))
        .await
        .unwrap();
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(1)).await);

    gateway
        .switch
        .inject(SwitchEvent::Conference {
            phase: ConferencePhase::Join,
            conference: MANUAL_PAGING_GROUP.to_string(),
            channels: 4,
            channel: "PJSIP/201-00000002".into(),
        })
        .await
        .unwrap();
    assert!(wait_for_tag(&gateway, "Paging-Active-Channels", TagValue::Int16(4)).await);

    gateway
        .switch
        .inject(SwitchEvent::Conference {
            phase: ConferencePhase::End,
            conference: MANUAL_PAGING_GROUP.to_string(),
            channels: 0,
            channel: String::new(),
        })
        .await
        .unwrap();
    assert!(wait_for_tag(&gateway, "Paging-Active-Channels", TagValue::Int16(0)).await);
    assert!(wait_for_tag(&gateway, "Paging-Status-Code", TagValue::Byte(0)).await);
    assert!(wait_for_tag(&gateway, "Paging-Live-Status", TagValue::Bool(false)).await);
    gateway.shutdown().await;
}

// ============================================================================
// Calling page
// ============================================================================

#[tokio::test]
async fn call_group_rings_the_selected_elements() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("E1-TEL-101-CallGroup", TagValue::Bool(true))
        .await
        .unwrap();
    gateway
        .tags
        .operator_write("E1-TEL-102-CallGroup", TagValue::Bool(true))
        .await
        .unwrap();
    assert!(wait_for_tag(&gateway, "E1-TEL-101-CallGroup-Status", TagValue::Bool(true)).await);

    gateway
        .tags
        .operator_write("Call-CallGroup-Calling", TagValue::Bool(true))
        .await
        .unwrap();
    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::CallGroupOriginate { extension } if extension.as_str() == "101"
        ))
        .await
    );
    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::CallGroupOriginate { extension } if extension.as_str() == "102"
        ))
        .await
    );
    assert!(wait_for_tag(&gateway, "Call-CallGroup-Status", TagValue::Bool(true)).await);

    // Reset clears the selection and every related tag.
    gateway
        .tags
        .operator_write("Call-CallGroup-Reset", TagValue::Bool(true))
        .await
        .unwrap();
    assert!(wait_for_tag(&gateway, "E1-TEL-101-CallGroup", TagValue::Bool(false)).await);
    assert!(wait_for_tag(&gateway, "E1-TEL-102-CallGroup-Status", TagValue::Bool(false)).await);
    assert!(wait_for_tag(&gateway, "Call-CallGroup-Status", TagValue::Bool(false)).await);
    assert!(wait_for_tag(&gateway, "Call-CallGroup-Reset", TagValue::Bool(false)).await);
    gateway.shutdown().await;
}

#[tokio::test]
async fn prerecorded_announcement_sets_switch_variables() {
    let gateway = SimGateway::start(&config()).unwrap();

    gateway
        .tags
        .operator_write("Call-PreRecord-Message-No", TagValue::Byte(2))
        .await
        .unwrap();
    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::SetVar { name, value }
                if name.as_str() == "Stations_Pre_Recorded_Message" && value.as_str() == "shift-change.wav"
        ))
        .await
    );
    assert!(
        wait_for_tag(
            &gateway,
            "Call-PreRecord-Message-Message",
            TagValue::Str("Shift Change".into())
        )
        .await
    );

    gateway
        .tags
        .operator_write("Call-PreRecord-Message", TagValue::Bool(true))
        .await
        .unwrap();
    assert!(
        wait_for_action(&gateway, |a| matches!(
            a,
            SwitchAction::SetVar { name, value }
                if name.as_str() == "Stations_Pre_Recorded_Message_ON" && value.as_str() == "True"
        ))
        .await
    );
    assert!(wait_for_tag(&gateway, "Call-PreRecord-Message-Status", TagValue::Bool(true)).await);
    gateway.shutdown().await;
}
