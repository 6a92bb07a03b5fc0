//! Stochastic Petri net representation.
//!
//! This module provides the graph built from fragments. The
//! [`StochasticNet`] struct holds places, transitions and the arcs between
//! them; an [`IdentityMapper`] ties nodes to the external ids they were
//! created under, and an [`AcceptingNet`] adds initial and final markings.

mod accepting;
mod graph;
mod identity;
mod types;

pub use accepting::{
    find_equivalent_final_markings, find_equivalent_initial_marking, guess_final_markings,
    guess_initial_marking, AcceptingNet, Marking, MarkingConventions, FINAL_PLACE_LABELS,
    INITIAL_PLACE_LABELS,
};
pub use graph::{Arc, Place, StochasticNet, Transition};
pub use identity::IdentityMapper;
pub use types::*;
