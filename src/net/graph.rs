//! Net graph structure.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::identity::IdentityMapper;
use super::types::{ArcId, Direction, NodeRef, PlaceId, TransitionId};
use crate::error::{Result, SketchError};

/// A place of the net.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Display label, not necessarily unique
    pub label: String,
}

/// A transition of the net.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Display label, not necessarily unique
    pub label: String,
    /// Silent transitions produce no observable event
    pub invisible: bool,
    /// Weight of an immediate transition, `None` for simple transitions
    pub weight: Option<f64>,
}

impl Transition {
    /// A simple (unweighted) visible transition.
    pub fn simple(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            invisible: false,
            weight: None,
        }
    }

    /// An immediate transition with the given weight.
    pub fn immediate(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            invisible: false,
            weight: Some(weight),
        }
    }

    /// Mark the transition as silent.
    pub fn silent(mut self) -> Self {
        self.invisible = true;
        self
    }

    pub fn is_immediate(&self) -> bool {
        self.weight.is_some()
    }
}

/// A directed arc between a place and a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub source: NodeRef,
    pub target: NodeRef,
    /// Multiplicity of the arc
    pub weight: u32,
}

/// A stochastic Petri net: places and transitions connected by arcs.
///
/// Node and arc ids are indices into this net only; two nets never share
/// nodes. Label lookups are maintained as nodes are added.
#[derive(Debug, Clone, Default)]
pub struct StochasticNet {
    label: String,
    places: Vec<Place>,
    transitions: Vec<Transition>,
    arcs: Vec<Arc>,

    /// Arc lookup by (source, target)
    arc_index: HashMap<(NodeRef, NodeRef), ArcId>,
    in_arcs: HashMap<NodeRef, Vec<ArcId>>,
    out_arcs: HashMap<NodeRef, Vec<ArcId>>,

    place_labels: HashMap<String, Vec<PlaceId>>,
    transition_labels: HashMap<String, Vec<TransitionId>>,
}

impl StochasticNet {
    /// Create an empty net.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Add a place. Labels may repeat.
    pub fn add_place(&mut self, label: impl Into<String>) -> PlaceId {
        let id = PlaceId(self.places.len());
        let label = label.into();
        self.place_labels.entry(label.clone()).or_default().push(id);
        self.places.push(Place { label });
        id
    }

    /// Add a simple transition.
    pub fn add_transition(&mut self, label: impl Into<String>) -> TransitionId {
        self.insert_transition(Transition::simple(label))
    }

    /// Add an immediate transition with the given weight.
    pub fn add_immediate_transition(&mut self, label: impl Into<String>, weight: f64) -> TransitionId {
        self.insert_transition(Transition::immediate(label, weight))
    }

    /// Add a fully specified transition.
    pub fn insert_transition(&mut self, transition: Transition) -> TransitionId {
        let id = TransitionId(self.transitions.len());
        self.transition_labels
            .entry(transition.label.clone())
            .or_default()
            .push(id);
        self.transitions.push(transition);
        id
    }

    /// Add an arc with weight 1.
    ///
    /// Adding an arc that already exists between the same source and target
    /// is a no-op returning the existing arc.
    pub fn add_arc(&mut self, source: impl Into<NodeRef>, target: impl Into<NodeRef>) -> Result<ArcId> {
        let (source, target) = (source.into(), target.into());
        if let Some(id) = self.find_arc(source, target) {
            return Ok(id);
        }
        self.push_arc(source, target, 1)
    }

    /// Add an arc, or add `weight` to the weight of the existing arc.
    ///
    /// The accumulated weight saturates at `u32::MAX`.
    pub fn add_arc_with_weight(
        &mut self,
        source: impl Into<NodeRef>,
        target: impl Into<NodeRef>,
        weight: u32,
    ) -> Result<ArcId> {
        let (source, target) = (source.into(), target.into());
        if let Some(id) = self.find_arc(source, target) {
            let arc = &mut self.arcs[id.0];
            arc.weight = arc.weight.saturating_add(weight);
            return Ok(id);
        }
        self.push_arc(source, target, weight)
    }

    fn push_arc(&mut self, source: NodeRef, target: NodeRef, weight: u32) -> Result<ArcId> {
        if source.kind() == target.kind() || !self.contains(source) || !self.contains(target) {
            return Err(SketchError::InvalidArc {
                from: source,
                to: target,
            });
        }
        let id = ArcId(self.arcs.len());
        self.arcs.push(Arc {
            source,
            target,
            weight,
        });
        self.arc_index.insert((source, target), id);
        self.out_arcs.entry(source).or_default().push(id);
        self.in_arcs.entry(target).or_default().push(id);
        Ok(id)
    }

    /// Find the arc from `source` to `target`.
    pub fn find_arc(&self, source: impl Into<NodeRef>, target: impl Into<NodeRef>) -> Option<ArcId> {
        self.arc_index.get(&(source.into(), target.into())).copied()
    }

    pub fn contains(&self, node: NodeRef) -> bool {
        match node {
            NodeRef::Place(id) => id.0 < self.places.len(),
            NodeRef::Transition(id) => id.0 < self.transitions.len(),
        }
    }

    pub fn place(&self, id: PlaceId) -> Option<&Place> {
        self.places.get(id.0)
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.get(id.0)
    }

    pub fn arc(&self, id: ArcId) -> Option<&Arc> {
        self.arcs.get(id.0)
    }

    /// Display label of any node.
    pub fn node_label(&self, node: NodeRef) -> Option<&str> {
        match node {
            NodeRef::Place(id) => self.place(id).map(|p| p.label.as_str()),
            NodeRef::Transition(id) => self.transition(id).map(|t| t.label.as_str()),
        }
    }

    pub fn places(&self) -> impl Iterator<Item = (PlaceId, &Place)> {
        self.places.iter().enumerate().map(|(i, p)| (PlaceId(i), p))
    }

    pub fn transitions(&self) -> impl Iterator<Item = (TransitionId, &Transition)> {
        self.transitions
            .iter()
            .enumerate()
            .map(|(i, t)| (TransitionId(i), t))
    }

    pub fn arcs(&self) -> impl Iterator<Item = (ArcId, &Arc)> {
        self.arcs.iter().enumerate().map(|(i, a)| (ArcId(i), a))
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty() && self.transitions.is_empty()
    }

    /// All places carrying `label`, in creation order.
    pub fn places_labeled(&self, label: &str) -> &[PlaceId] {
        self.place_labels
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All transitions carrying `label`, in creation order.
    pub fn transitions_labeled(&self, label: &str) -> &[TransitionId] {
        self.transition_labels
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Arcs touching `node` in the given direction.
    pub fn arcs_of(&self, node: NodeRef, direction: Direction) -> impl Iterator<Item = &Arc> {
        let index = match direction {
            Direction::Incoming => &self.in_arcs,
            Direction::Outgoing => &self.out_arcs,
        };
        index
            .get(&node)
            .into_iter()
            .flatten()
            .map(move |id| &self.arcs[id.0])
    }

    pub fn in_arcs(&self, node: impl Into<NodeRef>) -> impl Iterator<Item = &Arc> {
        self.arcs_of(node.into(), Direction::Incoming)
    }

    pub fn out_arcs(&self, node: impl Into<NodeRef>) -> impl Iterator<Item = &Arc> {
        self.arcs_of(node.into(), Direction::Outgoing)
    }

    /// Nodes with an arc into `node`.
    pub fn preset(&self, node: impl Into<NodeRef>) -> Vec<NodeRef> {
        self.in_arcs(node).map(|a| a.source).collect()
    }

    /// Nodes `node` has an arc into.
    pub fn postset(&self, node: impl Into<NodeRef>) -> Vec<NodeRef> {
        self.out_arcs(node).map(|a| a.target).collect()
    }

    /// Transitions that consume from a place `transition` produces into.
    pub fn successor_transitions(&self, transition: TransitionId) -> BTreeSet<TransitionId> {
        self.postset(transition)
            .into_iter()
            .flat_map(|place| self.postset(place))
            .filter_map(|node| node.as_transition())
            .collect()
    }

    /// Transitions that produce into a place `transition` consumes from.
    pub fn predecessor_transitions(&self, transition: TransitionId) -> BTreeSet<TransitionId> {
        self.preset(transition)
            .into_iter()
            .flat_map(|place| self.preset(place))
            .filter_map(|node| node.as_transition())
            .collect()
    }

    /// Transitions sharing an input place with `transition`, itself included.
    pub fn sibling_transitions(&self, transition: TransitionId) -> BTreeSet<TransitionId> {
        self.preset(transition)
            .into_iter()
            .flat_map(|place| self.postset(place))
            .filter_map(|node| node.as_transition())
            .collect()
    }

    /// Copy of this net where every transition is relabelled with its
    /// external id from `identities`. Places keep their label unless they
    /// have an external id too. Node and arc ids are preserved.
    pub fn relabeled(&self, identities: &IdentityMapper) -> Result<StochasticNet> {
        let mut copy = StochasticNet::new(self.label.clone());
        for (id, place) in self.places() {
            let label = identities
                .external_id(NodeRef::Place(id))
                .unwrap_or(place.label.as_str());
            copy.add_place(label);
        }
        for (id, transition) in self.transitions() {
            let node = NodeRef::Transition(id);
            let label = identities.external_id(node).ok_or_else(|| {
                SketchError::ComparisonPrecondition {
                    net: self.label.clone(),
                    node,
                }
            })?;
            copy.insert_transition(Transition {
                label: label.to_string(),
                ..transition.clone()
            });
        }
        for (_, arc) in self.arcs() {
            copy.push_arc(arc.source, arc.target, arc.weight)?;
        }
        Ok(copy)
    }
}

impl fmt::Display for StochasticNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.label)?;
        write!(f, "Places: {{")?;
        for place in &self.places {
            write!(f, "{}  ", place.label)?;
        }
        writeln!(f, "}}")?;
        write!(f, "Transitions: {{")?;
        for transition in &self.transitions {
            write!(f, "{}", transition.label)?;
            if transition.invisible {
                write!(f, "(silent)")?;
            }
            if let Some(weight) = transition.weight {
                write!(f, "_{}", weight)?;
            }
            write!(f, "  ")?;
        }
        writeln!(f, "}}")?;
        write!(f, "Arcs: {{")?;
        for arc in &self.arcs {
            let source = self.node_label(arc.source).unwrap_or("?");
            let target = self.node_label(arc.target).unwrap_or("?");
            write!(f, "{}->{}", source, target)?;
            if arc.weight != 1 {
                write!(f, "({})", arc.weight)?;
            }
            write!(f, "  ")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_transition_net() -> (StochasticNet, PlaceId, TransitionId, PlaceId) {
        let mut net = StochasticNet::new("ot");
        let i = net.add_place("I");
        let a = net.add_transition("a");
        let f = net.add_place("F");
        net.add_arc(i, a).unwrap();
        net.add_arc(a, f).unwrap();
        (net, i, a, f)
    }

    #[test]
    fn test_add_arc_is_idempotent() {
        let (mut net, i, a, _) = one_transition_net();
        let existing = net.find_arc(i, a).unwrap();
        assert_eq!(net.add_arc(i, a).unwrap(), existing);
        assert_eq!(net.arc_count(), 2);
        assert_eq!(net.arc(existing).unwrap().weight, 1);
    }

    #[test]
    fn test_add_arc_with_weight_accumulates() {
        let (mut net, _, a, f) = one_transition_net();
        let id = net.add_arc_with_weight(a, f, 1).unwrap();
        assert_eq!(net.arc_count(), 2);
        assert_eq!(net.arc(id).unwrap().weight, 2);
    }

    #[test]
    fn test_add_arc_with_weight_saturates() {
        let (mut net, i, a, _) = one_transition_net();
        let id = net.add_arc_with_weight(i, a, u32::MAX).unwrap();
        net.add_arc_with_weight(i, a, 1).unwrap();
        assert_eq!(net.arc(id).unwrap().weight, u32::MAX);
    }

    #[test]
    fn test_transition_kinds() {
        assert!(!Transition::simple("a").is_immediate());
        let immediate = Transition::immediate("a", 0.4);
        assert!(immediate.is_immediate());
        assert!(!immediate.invisible);
        let silent = Transition::simple("tau").silent();
        assert!(silent.invisible && !silent.is_immediate());
    }

    #[test]
    fn test_arc_must_be_bipartite() {
        let (mut net, i, a, f) = one_transition_net();
        assert!(matches!(net.add_arc(i, f), Err(SketchError::InvalidArc { .. })));
        let b = net.add_transition("b");
        assert!(net.add_arc(a, b).is_err());
        assert!(net.add_arc(PlaceId(42), a).is_err());
    }

    #[test]
    fn test_label_lookup() {
        let mut net = StochasticNet::new("dupes");
        let a1 = net.add_transition("a");
        let a2 = net.add_immediate_transition("a", 0.5);
        let p = net.add_place("a");
        assert_eq!(net.transitions_labeled("a"), &[a1, a2]);
        assert_eq!(net.places_labeled("a"), &[p]);
        assert!(net.places_labeled("missing").is_empty());
        assert_eq!(net.transition(a2).unwrap().weight, Some(0.5));
    }

    #[test]
    fn test_neighbourhood() {
        // I -> [a] -> p -> [b] -> F, I -> [c] -> F
        let mut net = StochasticNet::new("n");
        let i = net.add_place("I");
        let p = net.add_place("p");
        let f = net.add_place("F");
        let a = net.add_transition("a");
        let b = net.add_transition("b");
        let c = net.add_transition("c");
        for (s, t) in [(i, a), (p, b), (i, c)] {
            net.add_arc(s, t).unwrap();
        }
        for (s, t) in [(a, p), (b, f), (c, f)] {
            net.add_arc(s, t).unwrap();
        }

        assert_eq!(net.preset(a), vec![NodeRef::Place(i)]);
        assert_eq!(net.postset(i), vec![NodeRef::Transition(a), NodeRef::Transition(c)]);
        assert_eq!(net.successor_transitions(a), BTreeSet::from([b]));
        assert_eq!(net.predecessor_transitions(b), BTreeSet::from([a]));
        assert!(net.predecessor_transitions(a).is_empty());
        assert_eq!(net.sibling_transitions(a), BTreeSet::from([a, c]));
    }

    #[test]
    fn test_relabeled() {
        let mut net = StochasticNet::new("r");
        let i = net.add_place("I");
        let a1 = net.add_transition("a");
        let a2 = net.add_transition("a");
        net.add_arc(i, a1).unwrap();
        net.add_arc(i, a2).unwrap();

        let mut identities = IdentityMapper::new();
        identities.bind(a1, "a__1").unwrap();
        identities.bind(a2, "a__2").unwrap();

        let copy = net.relabeled(&identities).unwrap();
        assert_eq!(copy.transition(a1).unwrap().label, "a__1");
        assert_eq!(copy.transition(a2).unwrap().label, "a__2");
        assert_eq!(copy.place(i).unwrap().label, "I");
        assert_eq!(copy.arc_count(), 2);
        assert!(copy.find_arc(i, a2).is_some());
    }

    #[test]
    fn test_relabeled_requires_transition_ids() {
        let (net, _, _, _) = one_transition_net();
        assert!(matches!(
            net.relabeled(&IdentityMapper::new()),
            Err(SketchError::ComparisonPrecondition { .. })
        ));
    }

    #[test]
    fn test_display() {
        let (net, _, _, _) = one_transition_net();
        assert_eq!(
            net.to_string(),
            "ot\nPlaces: {I  F  }\nTransitions: {a  }\nArcs: {I->a  a->F  }"
        );
    }
}
