//! Core types for net representation.

use std::fmt;

/// Index of a place within its net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceId(pub usize);

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Index of a transition within its net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub usize);

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Index of an arc within its net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArcId(pub usize);

impl fmt::Display for ArcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

/// A reference to either kind of node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRef {
    Place(PlaceId),
    Transition(TransitionId),
}

impl NodeRef {
    /// The kind of node referenced.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Place(_) => NodeKind::Place,
            NodeRef::Transition(_) => NodeKind::Transition,
        }
    }

    pub fn as_place(&self) -> Option<PlaceId> {
        match self {
            NodeRef::Place(id) => Some(*id),
            NodeRef::Transition(_) => None,
        }
    }

    pub fn as_transition(&self) -> Option<TransitionId> {
        match self {
            NodeRef::Transition(id) => Some(*id),
            NodeRef::Place(_) => None,
        }
    }
}

impl From<PlaceId> for NodeRef {
    fn from(id: PlaceId) -> Self {
        NodeRef::Place(id)
    }
}

impl From<TransitionId> for NodeRef {
    fn from(id: TransitionId) -> Self {
        NodeRef::Transition(id)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Place(id) => write!(f, "{}", id),
            NodeRef::Transition(id) => write!(f, "{}", id),
        }
    }
}

/// Node kinds of the bipartite graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Place,
    Transition,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Place => write!(f, "place"),
            NodeKind::Transition => write!(f, "transition"),
        }
    }
}

/// Edge direction relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Arcs ending at the node
    Incoming,
    /// Arcs starting at the node
    Outgoing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ref_kind() {
        let place: NodeRef = PlaceId(3).into();
        let transition: NodeRef = TransitionId(3).into();
        assert_eq!(place.kind(), NodeKind::Place);
        assert_eq!(transition.kind(), NodeKind::Transition);
        assert_ne!(place, transition);
        assert_eq!(place.as_place(), Some(PlaceId(3)));
        assert_eq!(place.as_transition(), None);
        assert_eq!(transition.to_string(), "T3");
    }
}
