//! Incremental net construction from fragments.
//!
//! A [`Session`] owns one net, its identity mapper and the label lookup
//! table used to resolve node references. Every fragment added to the same
//! session extends the same net:
//!
//! ```
//! use petri_sketch::Session;
//!
//! let mut session = Session::new("example");
//! session.add_fragment("I -> [a__1] -> F").unwrap();
//! session.add_fragment("I -> [a__2] -> p1 -> {b 0.4} -> F").unwrap();
//!
//! let net = session.net();
//! assert_eq!(net.transitions_labeled("a").len(), 2);
//! assert_eq!(net.place_count(), 3);
//! ```
//!
//! # Resolution
//!
//! Places resolve by label: the first reference creates the place, later
//! references reuse it. Transitions resolve by key, `label` or
//! `label__id`, so `[a__1]` and `[a__2]` are two transitions labelled `a`
//! while two fragments mentioning `[a__1]` share one transition. A label
//! used for a place cannot be reused as a transition key, and vice versa.

use std::collections::HashMap;

use log::{debug, warn};

use crate::dsl::{self, Fragment, TransitionSpec};
use crate::error::{Result, SketchError};
use crate::net::{
    AcceptingNet, IdentityMapper, MarkingConventions, NodeKind, NodeRef, StochasticNet, Transition,
    TransitionId,
};

/// Construction state of one net.
#[derive(Debug, Clone, Default)]
pub struct Session {
    net: StochasticNet,
    identities: IdentityMapper,
    /// Most recent node per place label or transition key
    lookup: HashMap<String, NodeRef>,
}

/// How a node reference of a fragment resolves before anything is committed.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Planned {
    Existing(NodeRef),
    /// Index into the plan's new places
    NewPlace(usize),
    /// Index into the plan's new transitions
    NewTransition(usize),
}

impl Planned {
    fn kind(&self) -> NodeKind {
        match self {
            Planned::Existing(node) => node.kind(),
            Planned::NewPlace(_) => NodeKind::Place,
            Planned::NewTransition(_) => NodeKind::Transition,
        }
    }
}

/// Everything one fragment will add, resolved against the session.
#[derive(Default)]
struct Plan<'f> {
    /// Resolutions made by this fragment, shadowing the session lookup
    overlay: HashMap<String, Planned>,
    new_places: Vec<&'f str>,
    new_transitions: Vec<(String, &'f TransitionSpec)>,
    /// Place, transition, place, ... in chain order
    chain: Vec<Planned>,
}

impl Session {
    /// Start a new, empty net.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            net: StochasticNet::new(label),
            ..Self::default()
        }
    }

    /// Continue building an existing net.
    ///
    /// The lookup table is seeded with the most recently added place per
    /// label and the most recently added transition per label, unless a
    /// place already uses that label. The identity mapper starts empty.
    pub fn from_net(net: StochasticNet) -> Self {
        let mut lookup = HashMap::new();
        for (id, place) in net.places() {
            lookup.insert(place.label.clone(), NodeRef::Place(id));
        }
        for (id, transition) in net.transitions() {
            match lookup.get(&transition.label) {
                Some(NodeRef::Place(_)) => {}
                _ => {
                    lookup.insert(transition.label.clone(), NodeRef::Transition(id));
                }
            }
        }
        Self {
            net,
            identities: IdentityMapper::new(),
            lookup,
        }
    }

    /// Build a session from several fragments, applied in order.
    pub fn from_fragments(label: impl Into<String>, fragments: &[&str]) -> Result<Self> {
        let mut session = Session::new(label);
        for fragment in fragments {
            session.add_fragment(fragment)?;
        }
        Ok(session)
    }

    pub fn net(&self) -> &StochasticNet {
        &self.net
    }

    pub fn identities(&self) -> &IdentityMapper {
        &self.identities
    }

    /// Take the net and its identity mapper.
    pub fn into_parts(self) -> (StochasticNet, IdentityMapper) {
        (self.net, self.identities)
    }

    /// Lex, parse and apply one fragment.
    ///
    /// Returns the identity bindings this fragment created. On error the
    /// session is left unchanged.
    pub fn add_fragment(&mut self, text: &str) -> Result<IdentityMapper> {
        let fragment = dsl::parse_fragment(text)?;
        self.apply(&fragment)
    }

    /// Apply every fragment line of a multi-line text.
    ///
    /// Blank lines and `#` comments are skipped. Stops at the first failing
    /// line; lines before it stay applied.
    pub fn add_fragments(&mut self, text: &str) -> Result<IdentityMapper> {
        let mut created = IdentityMapper::new();
        for line in dsl::fragment_lines(text) {
            created.merge(&self.add_fragment(line)?)?;
        }
        Ok(created)
    }

    /// Apply every fragment line of a file.
    #[cfg(feature = "cli")]
    pub fn add_fragment_file(&mut self, path: &std::path::Path) -> Result<IdentityMapper> {
        let content = std::fs::read_to_string(path).map_err(|e| SketchError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;
        self.add_fragments(&content)
    }

    /// Apply an already parsed fragment.
    pub fn apply(&mut self, fragment: &Fragment) -> Result<IdentityMapper> {
        let plan = self.plan(fragment)?;
        self.commit(plan)
    }

    /// The net with markings derived from the default naming conventions.
    pub fn accepting_net(&self) -> AcceptingNet {
        AcceptingNet::from_conventions(self.net.clone())
    }

    /// The net with markings derived from the given naming conventions.
    pub fn accepting_net_with(&self, conventions: &MarkingConventions) -> AcceptingNet {
        AcceptingNet::with_conventions(self.net.clone(), conventions)
    }

    pub fn into_accepting_net(self) -> AcceptingNet {
        AcceptingNet::from_conventions(self.net)
    }

    fn resolve(&self, plan: &Plan<'_>, key: &str) -> Option<Planned> {
        plan.overlay
            .get(key)
            .copied()
            .or_else(|| self.lookup.get(key).copied().map(Planned::Existing))
    }

    fn plan<'f>(&self, fragment: &'f Fragment) -> Result<Plan<'f>> {
        let mut plan = Plan::default();
        let head = self.plan_place(&mut plan, &fragment.head)?;
        plan.chain.push(head);
        for step in &fragment.steps {
            let transition = self.plan_transition(&mut plan, &step.transition)?;
            plan.chain.push(transition);
            let place = self.plan_place(&mut plan, &step.place)?;
            plan.chain.push(place);
        }
        Ok(plan)
    }

    fn plan_place<'f>(&self, plan: &mut Plan<'f>, label: &'f str) -> Result<Planned> {
        match self.resolve(plan, label) {
            Some(found) if found.kind() == NodeKind::Place => Ok(found),
            Some(found) => Err(SketchError::type_conflict(label, found.kind(), NodeKind::Place)),
            None => {
                let planned = Planned::NewPlace(plan.new_places.len());
                plan.new_places.push(label);
                plan.overlay.insert(label.to_string(), planned);
                Ok(planned)
            }
        }
    }

    fn plan_transition<'f>(&self, plan: &mut Plan<'f>, spec: &'f TransitionSpec) -> Result<Planned> {
        let key = spec.key();
        match self.resolve(plan, &key) {
            Some(found) if found.kind() == NodeKind::Transition => {
                if let Planned::Existing(NodeRef::Transition(id)) = found {
                    self.check_redescription(id, spec);
                }
                Ok(found)
            }
            Some(found) => Err(SketchError::type_conflict(key, found.kind(), NodeKind::Transition)),
            None => {
                let planned = Planned::NewTransition(plan.new_transitions.len());
                plan.overlay.insert(key.clone(), planned);
                plan.new_transitions.push((key, spec));
                Ok(planned)
            }
        }
    }

    /// Reused transitions keep their attributes; say so when a fragment
    /// describes them differently.
    fn check_redescription(&self, id: TransitionId, spec: &TransitionSpec) {
        let Some(existing) = self.net.transition(id) else {
            return;
        };
        if existing.weight != spec.weight() {
            warn!(
                "transition '{}' reused as {} but was created with weight {:?}; keeping the original",
                spec.key(),
                spec,
                existing.weight
            );
        }
    }

    fn commit(&mut self, plan: Plan<'_>) -> Result<IdentityMapper> {
        let mut created = IdentityMapper::new();

        let mut places = Vec::with_capacity(plan.new_places.len());
        for label in &plan.new_places {
            let id = self.net.add_place(*label);
            debug!("created place {} '{}'", id, label);
            self.lookup.insert(label.to_string(), id.into());
            self.identities.bind(id, *label)?;
            created.bind(id, *label)?;
            places.push(id);
        }

        let mut transitions = Vec::with_capacity(plan.new_transitions.len());
        for (key, spec) in plan.new_transitions {
            let mut transition = match spec.weight() {
                Some(weight) => Transition::immediate(spec.label.clone(), weight),
                None => Transition::simple(spec.label.clone()),
            };
            transition.invisible = spec.silent;
            let id = self.net.insert_transition(transition);
            debug!("created transition {} '{}' as {}", id, key, spec);
            self.lookup.insert(key.clone(), id.into());
            self.identities.bind(id, key.clone())?;
            created.bind(id, key)?;
            transitions.push(id);
        }

        let node = |planned: Planned| -> NodeRef {
            match planned {
                Planned::Existing(node) => node,
                Planned::NewPlace(i) => places[i].into(),
                Planned::NewTransition(i) => transitions[i].into(),
            }
        };
        for pair in plan.chain.windows(2) {
            self.net.add_arc(node(pair[0]), node(pair[1]))?;
        }

        Ok(created)
    }
}

/// Build a net from a single fragment.
pub fn create_net(label: impl Into<String>, text: &str) -> Result<StochasticNet> {
    let mut session = Session::new(label);
    session.add_fragment(text)?;
    Ok(session.net)
}

/// Build a net from several fragments. No fragments give an empty net.
pub fn create_net_from_fragments(label: impl Into<String>, fragments: &[&str]) -> Result<StochasticNet> {
    Session::from_fragments(label, fragments).map(|session| session.net)
}

/// Build an accepting net from one or more fragments, with markings
/// derived from the default naming conventions.
pub fn create_accepting_net(label: impl Into<String>, fragments: &[&str]) -> Result<AcceptingNet> {
    if fragments.is_empty() {
        return Err(SketchError::EmptyAcceptingNet);
    }
    Session::from_fragments(label, fragments).map(Session::into_accepting_net)
}
