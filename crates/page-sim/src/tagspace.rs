//! In-memory tag space.
//!
//! Implements [`NodeBinder`] so the simulated gateway binds against it
//! exactly like a live address space. Operator writes through
//! [`TagSpaceHandle::operator_write`] raise change notifications;
//! gateway writes through the request channel update silently, the way
//! a server distinguishes remote clients from its own process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use page_engine::{NodeBinder, TagChange, TagRequest};
use page_protocol::{TagNodeId, TagValue};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::SimError;

#[derive(Debug)]
struct NodeSlot {
    name: String,
    value: TagValue,
    writable: bool,
}

#[derive(Debug, Default)]
struct Space {
    nodes: HashMap<TagNodeId, NodeSlot>,
    by_name: HashMap<String, TagNodeId>,
    next_id: u32,
}

/// The simulated address space. Bind against it, then call
/// [`VirtualTagSpace::serve`] to get the gateway-facing channels.
#[derive(Debug, Default)]
pub struct VirtualTagSpace {
    space: Arc<Mutex<Space>>,
}

/// Cloneable operator-side view of a served tag space.
#[derive(Debug, Clone)]
pub struct TagSpaceHandle {
    space: Arc<Mutex<Space>>,
    notify: mpsc::Sender<TagChange>,
}

impl NodeBinder for VirtualTagSpace {
    fn folder(&mut self, _name: &str) {}

    fn node(&mut self, name: &str, initial: TagValue, writable: bool) -> TagNodeId {
        let mut space = self.space.lock().unwrap_or_else(|e| e.into_inner());
        space.next_id += 1;
        let id = TagNodeId(space.next_id);
        space.nodes.insert(
            id,
            NodeSlot { name: name.to_string(), value: initial, writable },
        );
        space.by_name.insert(name.to_string(), id);
        id
    }
}

impl VirtualTagSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts serving gateway requests. Returns the request sender for
    /// the gateway, the change receiver for the gateway actor and the
    /// operator handle.
    pub fn serve(
        &self,
        capacity: usize,
    ) -> (mpsc::Sender<TagRequest>, mpsc::Receiver<TagChange>, TagSpaceHandle) {
        let (request_tx, mut request_rx) = mpsc::channel::<TagRequest>(capacity);
        let (notify_tx, notify_rx) = mpsc::channel::<TagChange>(capacity);
        let space = Arc::clone(&self.space);
        let server_space = Arc::clone(&self.space);
        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let mut space = server_space.lock().unwrap_or_else(|e| e.into_inner());
                match request {
                    TagRequest::Read { node, reply } => {
                        let value = space.nodes.get(&node).map(|slot| slot.value.clone());
                        let _ = reply.send(value);
                    }
                    TagRequest::Write { node, value } => match space.nodes.get_mut(&node) {
                        Some(slot) => slot.value = value,
                        None => warn!(%node, "gateway wrote an unbound node"),
                    },
                }
            }
            debug!("tag space server stopped");
        });
        (
            request_tx,
            notify_rx,
            TagSpaceHandle { space, notify: notify_tx },
        )
    }
}

impl TagSpaceHandle {
    /// Writes a tag as the operator would and notifies the gateway.
    pub async fn operator_write(
        &self,
        name: &str,
        value: TagValue,
    ) -> Result<(), SimError> {
        let (node, writable) = {
            let mut space = self.space.lock().unwrap_or_else(|e| e.into_inner());
            let Some(&node) = space.by_name.get(name) else {
                return Err(SimError::UnknownTag(name.to_string()));
            };
            let slot = space
                .nodes
                .get_mut(&node)
                .ok_or_else(|| SimError::UnknownTag(name.to_string()))?;
            slot.value = value.clone();
            (node, slot.writable)
        };
        if !writable {
            warn!(name, "operator wrote a status tag");
        }
        self.notify
            .send(TagChange { node, value })
            .await
            .map_err(|_| SimError::GatewayClosed)
    }

    /// Current value of a tag by name.
    pub fn value(&self, name: &str) -> Option<TagValue> {
        let space = self.space.lock().unwrap_or_else(|e| e.into_inner());
        let node = space.by_name.get(name)?;
        space.nodes.get(node).map(|slot| slot.value.clone())
    }

    pub fn node_id(&self, name: &str) -> Option<TagNodeId> {
        let space = self.space.lock().unwrap_or_else(|e| e.into_inner());
        space.by_name.get(name).copied()
    }
}
