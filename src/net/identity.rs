//! Bidirectional association between nodes and caller-visible ids.

use std::collections::HashMap;

use super::types::NodeRef;
use crate::error::{Result, SketchError};

/// Maps external ids such as `a__2` to nodes of one net and back.
///
/// The mapping is one-to-one: an external id never names two nodes and a
/// node never carries two external ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityMapper {
    by_id: HashMap<String, NodeRef>,
    by_node: HashMap<NodeRef, String>,
}

impl IdentityMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `external_id` to `node`.
    ///
    /// Rebinding an existing pair is a no-op; binding either side to
    /// something else fails with [`SketchError::IdentityConflict`].
    pub fn bind(&mut self, node: impl Into<NodeRef>, external_id: impl Into<String>) -> Result<()> {
        let node = node.into();
        let external_id = external_id.into();
        let id_taken = self.by_id.get(&external_id).is_some_and(|n| *n != node);
        let node_taken = self.by_node.get(&node).is_some_and(|id| *id != external_id);
        if id_taken || node_taken {
            return Err(SketchError::IdentityConflict { external_id });
        }
        self.by_node.insert(node, external_id.clone());
        self.by_id.insert(external_id, node);
        Ok(())
    }

    /// The node bound to `external_id`.
    pub fn node(&self, external_id: &str) -> Option<NodeRef> {
        self.by_id.get(external_id).copied()
    }

    /// The external id bound to `node`.
    pub fn external_id(&self, node: NodeRef) -> Option<&str> {
        self.by_node.get(&node).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterate `(external id, node)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeRef)> {
        self.by_id.iter().map(|(id, node)| (id.as_str(), *node))
    }

    /// Add every binding of `other` to this mapper.
    pub fn merge(&mut self, other: &IdentityMapper) -> Result<()> {
        for (id, node) in other.iter() {
            self.bind(node, id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{PlaceId, TransitionId};

    #[test]
    fn test_bind_and_lookup() {
        let mut mapper = IdentityMapper::new();
        mapper.bind(TransitionId(0), "a__1").unwrap();
        mapper.bind(TransitionId(1), "a__2").unwrap();
        assert_eq!(mapper.node("a__2"), Some(NodeRef::Transition(TransitionId(1))));
        assert_eq!(mapper.external_id(TransitionId(0).into()), Some("a__1"));
        assert_eq!(mapper.node("a"), None);
        assert_eq!(mapper.len(), 2);
    }

    #[test]
    fn test_rebind_same_pair() {
        let mut mapper = IdentityMapper::new();
        mapper.bind(PlaceId(0), "I").unwrap();
        mapper.bind(PlaceId(0), "I").unwrap();
        assert_eq!(mapper.len(), 1);
    }

    #[test]
    fn test_one_to_one() {
        let mut mapper = IdentityMapper::new();
        mapper.bind(TransitionId(0), "a").unwrap();
        assert!(matches!(
            mapper.bind(TransitionId(1), "a"),
            Err(SketchError::IdentityConflict { .. })
        ));
        assert!(mapper.bind(TransitionId(0), "b").is_err());
        assert_eq!(mapper.node("a"), Some(NodeRef::Transition(TransitionId(0))));
        assert_eq!(mapper.node("b"), None);
    }

    #[test]
    fn test_merge() {
        let mut base = IdentityMapper::new();
        base.bind(TransitionId(0), "a__1").unwrap();
        let mut delta = IdentityMapper::new();
        delta.bind(TransitionId(1), "a__2").unwrap();
        base.merge(&delta).unwrap();
        assert_eq!(base.len(), 2);
    }
}
