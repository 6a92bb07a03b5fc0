//! Accepting nets: a net with an initial marking and final markings.
//!
//! Markings are derived from place naming conventions. A place named like an
//! initial place (`Start`, `Initial`, `I`) with no incoming arcs becomes the
//! initial marking; a place named like a final place (`End`, `Final`, `F`)
//! with no outgoing arcs becomes the final marking.

use std::collections::BTreeMap;

use log::debug;

use super::graph::StochasticNet;
use super::types::{Direction, NodeRef, PlaceId};

/// Initial place aliases in priority order.
pub const INITIAL_PLACE_LABELS: [&str; 3] = ["Start", "Initial", "I"];

/// Final place aliases in priority order.
pub const FINAL_PLACE_LABELS: [&str; 3] = ["End", "Final", "F"];

/// A multiset of places.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Marking {
    tokens: BTreeMap<PlaceId, u32>,
}

impl Marking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put one more token on `place`.
    pub fn add(&mut self, place: PlaceId) {
        *self.tokens.entry(place).or_insert(0) += 1;
    }

    /// Number of tokens on `place`.
    pub fn tokens(&self, place: PlaceId) -> u32 {
        self.tokens.get(&place).copied().unwrap_or(0)
    }

    pub fn contains(&self, place: PlaceId) -> bool {
        self.tokens.contains_key(&place)
    }

    /// Marked places in id order.
    pub fn places(&self) -> impl Iterator<Item = PlaceId> + '_ {
        self.tokens.keys().copied()
    }

    /// Number of distinct marked places.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<PlaceId> for Marking {
    fn from_iter<I: IntoIterator<Item = PlaceId>>(iter: I) -> Self {
        let mut marking = Marking::new();
        for place in iter {
            marking.add(place);
        }
        marking
    }
}

/// Naming conventions used to derive markings.
#[derive(Debug, Clone)]
pub struct MarkingConventions {
    /// Initial place labels, highest priority first
    pub initial_aliases: Vec<String>,
    /// Final place labels, highest priority first
    pub final_aliases: Vec<String>,
}

impl Default for MarkingConventions {
    fn default() -> Self {
        Self {
            initial_aliases: INITIAL_PLACE_LABELS.iter().map(|s| s.to_string()).collect(),
            final_aliases: FINAL_PLACE_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MarkingConventions {
    /// Create conventions with the default aliases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the initial place aliases.
    pub fn with_initial_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the final place aliases.
    pub fn with_final_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.final_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// The initial marking of `net` under these conventions.
    ///
    /// Only the places of the first alias that has any candidate are
    /// marked. A candidate must have no incoming arcs.
    pub fn initial_marking(&self, net: &StochasticNet) -> Marking {
        first_alias_marking(net, &self.initial_aliases, Direction::Incoming)
    }

    /// The final markings of `net`: none, or one marking holding every
    /// candidate of the first matching alias. A candidate must have no
    /// outgoing arcs.
    pub fn final_markings(&self, net: &StochasticNet) -> Vec<Marking> {
        let marking = first_alias_marking(net, &self.final_aliases, Direction::Outgoing);
        if marking.is_empty() {
            Vec::new()
        } else {
            vec![marking]
        }
    }
}

/// Mark the candidates of the first alias that has any. Candidates have
/// no arcs in `forbidden` direction.
fn first_alias_marking(net: &StochasticNet, aliases: &[String], forbidden: Direction) -> Marking {
    for alias in aliases {
        let candidates: Vec<PlaceId> = net
            .places_labeled(alias)
            .iter()
            .copied()
            .filter(|p| net.arcs_of(NodeRef::Place(*p), forbidden).next().is_none())
            .collect();
        if !candidates.is_empty() {
            debug!("marking {} place(s) labelled '{}' in net '{}'", candidates.len(), alias, net.label());
            return candidates.into_iter().collect();
        }
    }
    Marking::new()
}

/// A net together with its initial marking and final markings.
#[derive(Debug, Clone)]
pub struct AcceptingNet {
    net: StochasticNet,
    initial_marking: Marking,
    final_markings: Vec<Marking>,
}

impl AcceptingNet {
    /// Create an accepting net from explicit markings.
    pub fn new(net: StochasticNet, initial_marking: Marking, final_markings: Vec<Marking>) -> Self {
        Self {
            net,
            initial_marking,
            final_markings,
        }
    }

    /// Derive markings with the default naming conventions.
    pub fn from_conventions(net: StochasticNet) -> Self {
        Self::with_conventions(net, &MarkingConventions::default())
    }

    /// Derive markings with the given naming conventions.
    pub fn with_conventions(net: StochasticNet, conventions: &MarkingConventions) -> Self {
        let initial_marking = conventions.initial_marking(&net);
        let final_markings = conventions.final_markings(&net);
        Self::new(net, initial_marking, final_markings)
    }

    /// The accepting net's id, which is the label of its net.
    pub fn id(&self) -> &str {
        self.net.label()
    }

    pub fn net(&self) -> &StochasticNet {
        &self.net
    }

    pub fn into_net(self) -> StochasticNet {
        self.net
    }

    pub fn initial_marking(&self) -> &Marking {
        &self.initial_marking
    }

    pub fn final_markings(&self) -> &[Marking] {
        &self.final_markings
    }

    pub fn set_initial_marking(&mut self, marking: Marking) {
        self.initial_marking = marking;
    }

    pub fn set_final_markings(&mut self, markings: Vec<Marking>) {
        self.final_markings = markings;
    }
}

/// Every place without incoming arcs.
pub fn guess_initial_marking(net: &StochasticNet) -> Marking {
    net.places()
        .map(|(id, _)| id)
        .filter(|id| net.in_arcs(*id).next().is_none())
        .collect()
}

/// One marking of every place with incoming but no outgoing arcs.
///
/// This only matches the real final markings for sound workflow nets.
pub fn guess_final_markings(net: &StochasticNet) -> Vec<Marking> {
    let marking = net
        .places()
        .map(|(id, _)| id)
        .filter(|id| net.out_arcs(*id).next().is_none() && net.in_arcs(*id).next().is_some())
        .collect();
    vec![marking]
}

/// Transfer an initial marking from `from` to `to` by place label.
///
/// The result marks the first place of `to` whose label matches a marked
/// place, and nothing else. Assumes place labels are unique in `to`.
pub fn find_equivalent_initial_marking(marking: &Marking, from: &StochasticNet, to: &StochasticNet) -> Marking {
    for place in marking.places() {
        let Some(label) = from.place(place).map(|p| p.label.as_str()) else {
            continue;
        };
        if let Some(equivalent) = to.places_labeled(label).first() {
            return std::iter::once(*equivalent).collect();
        }
    }
    Marking::new()
}

/// Transfer final markings from `from` to `to` by place label. Only places
/// without outgoing arcs in `to` are marked.
pub fn find_equivalent_final_markings(
    markings: &[Marking],
    from: &StochasticNet,
    to: &StochasticNet,
) -> Vec<Marking> {
    markings
        .iter()
        .map(|marking| {
            marking
                .places()
                .filter_map(|place| from.place(place))
                .flat_map(|place| to.places_labeled(&place.label).iter().copied())
                .filter(|id| to.out_arcs(*id).next().is_none())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(arcs: &[(&str, &str)]) -> StochasticNet {
        // Places are upper-case-initial or 'p'-prefixed, transitions lower-case
        let mut net = StochasticNet::new("t");
        let node = |net: &mut StochasticNet, label: &str| -> NodeRef {
            let is_place = label.starts_with(|c: char| c.is_ascii_uppercase()) || label.starts_with('p');
            if is_place {
                match net.places_labeled(label).first() {
                    Some(p) => NodeRef::Place(*p),
                    None => net.add_place(label).into(),
                }
            } else {
                match net.transitions_labeled(label).first() {
                    Some(t) => NodeRef::Transition(*t),
                    None => net.add_transition(label).into(),
                }
            }
        };
        for (s, t) in arcs {
            let s = node(&mut net, s);
            let t = node(&mut net, t);
            net.add_arc(s, t).unwrap();
        }
        net
    }

    fn labels(net: &StochasticNet, marking: &Marking) -> Vec<String> {
        marking
            .places()
            .map(|p| net.place(p).unwrap().label.clone())
            .collect()
    }

    #[test]
    fn test_marking_multiset() {
        let mut marking = Marking::new();
        marking.add(PlaceId(1));
        marking.add(PlaceId(1));
        assert_eq!(marking.tokens(PlaceId(1)), 2);
        assert_eq!(marking.tokens(PlaceId(0)), 0);
        assert_eq!(marking.len(), 1);
    }

    #[test]
    fn test_derive_markings() {
        let net = net(&[("I", "a"), ("a", "F")]);
        let accepting = AcceptingNet::from_conventions(net);
        assert_eq!(labels(accepting.net(), accepting.initial_marking()), vec!["I"]);
        assert_eq!(accepting.final_markings().len(), 1);
        assert_eq!(labels(accepting.net(), &accepting.final_markings()[0]), vec!["F"]);
    }

    #[test]
    fn test_alias_priority() {
        // 'Start' outranks 'I', 'End' outranks 'F'
        let net = net(&[("I", "a"), ("Start", "b"), ("a", "F"), ("b", "End")]);
        let accepting = AcceptingNet::from_conventions(net);
        assert_eq!(labels(accepting.net(), accepting.initial_marking()), vec!["Start"]);
        assert_eq!(labels(accepting.net(), &accepting.final_markings()[0]), vec!["End"]);
    }

    #[test]
    fn test_alias_requires_edge_property() {
        // Start has an incoming arc, so Initial is used instead
        let net = net(&[("Start", "a"), ("b", "Start"), ("Initial", "b"), ("a", "End"), ("End", "c")]);
        let accepting = AcceptingNet::from_conventions(net);
        assert_eq!(labels(accepting.net(), accepting.initial_marking()), vec!["Initial"]);
        assert!(accepting.final_markings().is_empty());
    }

    #[test]
    fn test_same_alias_candidates_all_kept() {
        let mut net = net(&[("I", "a")]);
        let a = net.transitions_labeled("a")[0];
        let f1 = net.add_place("F");
        let f2 = net.add_place("F");
        net.add_arc(a, f1).unwrap();
        net.add_arc(a, f2).unwrap();
        let finals = MarkingConventions::new().final_markings(&net);
        assert_eq!(finals.len(), 1);
        assert!(finals[0].contains(f1) && finals[0].contains(f2));
    }

    #[test]
    fn test_replace_markings() {
        let mut accepting = AcceptingNet::from_conventions(net(&[("Q", "a"), ("a", "R")]));
        assert!(accepting.initial_marking().is_empty());
        assert!(accepting.final_markings().is_empty());

        let q = accepting.net().places_labeled("Q")[0];
        let r = accepting.net().places_labeled("R")[0];
        accepting.set_initial_marking(std::iter::once(q).collect());
        accepting.set_final_markings(vec![std::iter::once(r).collect()]);
        assert_eq!(labels(accepting.net(), accepting.initial_marking()), vec!["Q"]);
        assert_eq!(labels(accepting.net(), &accepting.final_markings()[0]), vec!["R"]);

        let net = accepting.into_net();
        assert_eq!(net.place_count(), 2);
        assert_eq!(net.arc_count(), 2);
    }

    #[test]
    fn test_custom_conventions() {
        let net = net(&[("Source", "a"), ("a", "Sink")]);
        let conventions = MarkingConventions::new()
            .with_initial_aliases(["Source"])
            .with_final_aliases(vec!["Sink".to_string()]);
        let accepting = AcceptingNet::with_conventions(net, &conventions);
        assert_eq!(labels(accepting.net(), accepting.initial_marking()), vec!["Source"]);
        assert_eq!(accepting.final_markings().len(), 1);
    }

    #[test]
    fn test_guess_markings() {
        let net = net(&[("I", "a"), ("a", "p1"), ("p1", "b"), ("b", "F"), ("a", "Q")]);
        assert_eq!(labels(&net, &guess_initial_marking(&net)), vec!["I"]);
        let finals = guess_final_markings(&net);
        assert_eq!(labels(&net, &finals[0]), vec!["F", "Q"]);
    }

    #[test]
    fn test_find_equivalent_markings() {
        let from = net(&[("I", "a"), ("a", "F")]);
        let to = net(&[("X", "b"), ("b", "I"), ("I", "c"), ("c", "F")]);
        let initial = guess_initial_marking(&from);
        let transferred = find_equivalent_initial_marking(&initial, &from, &to);
        assert_eq!(labels(&to, &transferred), vec!["I"]);

        let finals = find_equivalent_final_markings(&guess_final_markings(&from), &from, &to);
        assert_eq!(finals.len(), 1);
        assert_eq!(labels(&to, &finals[0]), vec!["F"]);
    }
}
