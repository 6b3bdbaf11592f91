//! Channel-backed ports to the tag space and the call switch.
//!
//! The engine never talks to either side directly; it owns the sending
//! half of a request channel and whatever serves the other half (a live
//! link or the simulator) owns the state.

use page_protocol::{SubmitResult, SwitchAction, TagNodeId, TagValue};
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// A request against the tag space.
#[derive(Debug)]
pub enum TagRequest {
    Read {
        node: TagNodeId,
        reply: oneshot::Sender<Option<TagValue>>,
    },
    /// Gateway-originated write. Does not re-enter the gateway as a
    /// change notification.
    Write { node: TagNodeId, value: TagValue },
}

/// An operator-originated tag change, fanned in to the gateway actor.
#[derive(Debug, Clone, PartialEq)]
pub struct TagChange {
    pub node: TagNodeId,
    pub value: TagValue,
}

/// An action handed to the call switch, with an optional result reply.
#[derive(Debug)]
pub struct SwitchSubmit {
    pub action: SwitchAction,
    pub reply: Option<oneshot::Sender<SubmitResult>>,
}

/// Cloneable sender side of the tag space port.
#[derive(Debug, Clone)]
pub struct TagLink {
    tx: mpsc::Sender<TagRequest>,
}

impl TagLink {
    pub fn new(tx: mpsc::Sender<TagRequest>) -> Self {
        Self { tx }
    }

    /// Reads a node's current value; `None` when the node is unknown
    /// or the tag space is gone.
    pub async fn read(&self, node: TagNodeId) -> Option<TagValue> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(TagRequest::Read { node, reply }).await.is_err() {
            warn!(%node, "tag space closed, read dropped");
            return None;
        }
        rx.await.ok().flatten()
    }

    pub async fn write(&self, node: TagNodeId, value: TagValue) {
        if self
            .tx
            .send(TagRequest::Write { node, value })
            .await
            .is_err()
        {
            warn!(%node, "tag space closed, write dropped");
        }
    }
}

/// Cloneable sender side of the call switch port.
#[derive(Debug, Clone)]
pub struct SwitchHandle {
    tx: mpsc::Sender<SwitchSubmit>,
}

impl SwitchHandle {
    pub fn new(tx: mpsc::Sender<SwitchSubmit>) -> Self {
        Self { tx }
    }

    /// Submits an action and waits for the switch's acknowledgement.
    pub async fn submit(&self, action: SwitchAction) -> Option<SubmitResult> {
        let (reply, rx) = oneshot::channel();
        let kind = action.kind();
        if self
            .tx
            .send(SwitchSubmit { action, reply: Some(reply) })
            .await
            .is_err()
        {
            warn!(kind, "switch link closed, action dropped");
            return None;
        }
        rx.await.ok()
    }

    /// Fire-and-forget submission; failures are logged by the caller
    /// of the serving side.
    pub async fn submit_detached(&self, action: SwitchAction) {
        let kind = action.kind();
        if self
            .tx
            .send(SwitchSubmit { action, reply: None })
            .await
            .is_err()
        {
            warn!(kind, "switch link closed, action dropped");
        }
    }
}
