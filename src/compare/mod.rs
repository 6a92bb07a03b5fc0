//! Structural comparison of nets.
//!
//! Two nets are equal when their nodes can be matched by label such that
//! matched nodes agree on kind, visibility, weight and incoming arcs.
//! Node ids play no part, so a net built from fragments can be checked
//! against one built by hand.
//!
//! [`equal_unique`] requires labels to be unique within each net. Nets with
//! repeated transition labels are compared with [`equal_with_dupes`], which
//! first relabels every node with its external id.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::error::Result;
use crate::net::{Direction, IdentityMapper, NodeKind, NodeRef, StochasticNet};

/// Comparison settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareConfig {
    /// Largest absolute difference at which two transition weights are equal
    pub weight_tolerance: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            weight_tolerance: 1e-4,
        }
    }
}

impl CompareConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weight_tolerance(mut self, tolerance: f64) -> Self {
        self.weight_tolerance = tolerance;
        self
    }
}

/// Neighbour label to the weights of the arcs touching those neighbours,
/// for one node in one direction.
///
/// Arcs from neighbours sharing a label fold into one entry whose weights
/// are kept sorted, so the signature does not depend on arc order.
pub type Signature<'a> = BTreeMap<&'a str, Vec<u32>>;

/// The arcs touching `node` in `direction`, keyed by the label of the node
/// at the other end.
pub fn node_signature(net: &StochasticNet, node: NodeRef, direction: Direction) -> Signature<'_> {
    let mut signature = Signature::new();
    for arc in net.arcs_of(node, direction) {
        let neighbour = match direction {
            Direction::Incoming => arc.source,
            Direction::Outgoing => arc.target,
        };
        if let Some(label) = net.node_label(neighbour) {
            signature.entry(label).or_default().push(arc.weight);
        }
    }
    for weights in signature.values_mut() {
        weights.sort_unstable();
    }
    signature
}

/// Compare two nets whose labels are unique, with default settings.
pub fn equal_unique(net1: &StochasticNet, net2: &StochasticNet) -> bool {
    equal_unique_with(net1, net2, &CompareConfig::default())
}

/// Compare two nets whose labels are unique.
///
/// Returns false when either net repeats a label for nodes of the same
/// kind, since nodes cannot be matched by label then.
pub fn equal_unique_with(net1: &StochasticNet, net2: &StochasticNet, config: &CompareConfig) -> bool {
    if net1.place_count() != net2.place_count()
        || net1.transition_count() != net2.transition_count()
        || net1.arc_count() != net2.arc_count()
    {
        debug!("not equal: '{}' and '{}' differ in size", net1.label(), net2.label());
        return false;
    }
    let (Some(index1), Some(index2)) = (label_index(net1), label_index(net2)) else {
        debug!(
            "not equal: '{}' or '{}' has duplicate labels",
            net1.label(),
            net2.label()
        );
        return false;
    };
    for (key, &node1) in &index1 {
        let Some(&node2) = index2.get(key) else {
            debug!("not equal: {} '{}' missing from '{}'", key.0, key.1, net2.label());
            return false;
        };
        if !nodes_equal_with(net1, node1, net2, node2, config) {
            return false;
        }
    }
    true
}

/// Compare two nets that may repeat labels, with default settings.
///
/// Every node is relabelled with its external id from the matching mapper
/// before comparing. Fails when a transition has no external id.
pub fn equal_with_dupes(
    net1: &StochasticNet,
    net2: &StochasticNet,
    identities1: &IdentityMapper,
    identities2: &IdentityMapper,
) -> Result<bool> {
    equal_with_dupes_with(net1, net2, identities1, identities2, &CompareConfig::default())
}

/// Compare two nets that may repeat labels.
pub fn equal_with_dupes_with(
    net1: &StochasticNet,
    net2: &StochasticNet,
    identities1: &IdentityMapper,
    identities2: &IdentityMapper,
    config: &CompareConfig,
) -> Result<bool> {
    let relabeled1 = net1.relabeled(identities1)?;
    let relabeled2 = net2.relabeled(identities2)?;
    Ok(equal_unique_with(&relabeled1, &relabeled2, config))
}

/// Compare two nodes, possibly of different nets, with default settings.
pub fn nodes_equal(net1: &StochasticNet, node1: NodeRef, net2: &StochasticNet, node2: NodeRef) -> bool {
    nodes_equal_with(net1, node1, net2, node2, &CompareConfig::default())
}

/// Compare label, kind, visibility, weight and incoming arcs of two nodes.
pub fn nodes_equal_with(
    net1: &StochasticNet,
    node1: NodeRef,
    net2: &StochasticNet,
    node2: NodeRef,
    config: &CompareConfig,
) -> bool {
    let equal = match (node1, node2) {
        (NodeRef::Place(p1), NodeRef::Place(p2)) => match (net1.place(p1), net2.place(p2)) {
            (Some(a), Some(b)) => a.label == b.label,
            _ => false,
        },
        (NodeRef::Transition(t1), NodeRef::Transition(t2)) => {
            match (net1.transition(t1), net2.transition(t2)) {
                (Some(a), Some(b)) => {
                    a.label == b.label
                        && a.invisible == b.invisible
                        && weights_equal(a.weight, b.weight, config.weight_tolerance)
                }
                _ => false,
            }
        }
        _ => false,
    };
    if !equal {
        debug!("not equal: {} != {}", describe(net1, node1), describe(net2, node2));
        return false;
    }

    let arcs1 = net1.arcs_of(node1, Direction::Incoming).count();
    let arcs2 = net2.arcs_of(node2, Direction::Incoming).count();
    if arcs1 != arcs2
        || node_signature(net1, node1, Direction::Incoming) != node_signature(net2, node2, Direction::Incoming)
    {
        debug!("not equal: incoming arcs of {} differ", describe(net1, node1));
        return false;
    }
    true
}

fn weights_equal(a: Option<f64>, b: Option<f64>, tolerance: f64) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => (a - b).abs() <= tolerance,
        _ => false,
    }
}

/// Nodes by kind and label, or `None` if a label repeats within a kind.
fn label_index(net: &StochasticNet) -> Option<HashMap<(NodeKind, &str), NodeRef>> {
    let mut index = HashMap::with_capacity(net.place_count() + net.transition_count());
    let places = net
        .places()
        .map(|(id, p)| ((NodeKind::Place, p.label.as_str()), NodeRef::Place(id)));
    let transitions = net
        .transitions()
        .map(|(id, t)| ((NodeKind::Transition, t.label.as_str()), NodeRef::Transition(id)));
    for (key, node) in places.chain(transitions) {
        if index.insert(key, node).is_some() {
            return None;
        }
    }
    Some(index)
}

fn describe(net: &StochasticNet, node: NodeRef) -> String {
    format!("{} '{}'", node, net.node_label(node).unwrap_or("?"))
}
