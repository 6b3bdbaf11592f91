//! Tag change routing.
//!
//! Every writable node bound at setup gets a [`RouteKey`] describing
//! which handler owns it. Changes for nodes outside the table are
//! dropped with a log line instead of reaching any handler.

use std::collections::HashMap;

use page_protocol::{CallingField, ElementField, PagingField, TagNodeId};

/// Where a tag change is dispatched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKey {
    Element { name: String, field: ElementField },
    Paging(PagingField),
    Calling(CallingField),
    ZoneSelect(String),
    Parameter(String),
}

/// Node-to-handler table, fixed after setup.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<TagNodeId, RouteKey>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: TagNodeId, key: RouteKey) {
        self.routes.insert(node, key);
    }

    pub fn resolve(&self, node: TagNodeId) -> Option<&RouteKey> {
        self.routes.get(&node)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_returns_the_registered_key() {
        let mut table = RouteTable::new();
        table.insert(
            TagNodeId(7),
            RouteKey::Element {
                name: "E2-TEL-101".into(),
                field: ElementField::Call,
            },
        );
        table.insert(TagNodeId(8), RouteKey::Paging(PagingField::Live));

        assert_eq!(
            table.resolve(TagNodeId(7)),
            Some(&RouteKey::Element {
                name: "E2-TEL-101".into(),
                field: ElementField::Call,
            })
        );
        assert_eq!(table.resolve(TagNodeId(9)), None);
        assert_eq!(table.len(), 2);
    }
}
