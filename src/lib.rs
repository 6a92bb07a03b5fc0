//! # Petri Sketch
//!
//! Build stochastic Petri nets from one-line text fragments and compare
//! them structurally.
//!
//! This library provides:
//! - A small DSL where each line describes a chain of places and transitions
//! - Incremental construction: fragments added to one session extend one net
//! - Accepting nets with markings derived from place naming conventions
//! - Structural equality, tolerant of repeated transition labels
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Lexer and parser for net fragments
//! - [`net`] - Net graph, identity mapper and accepting nets
//! - [`session`] - Incremental construction from fragments
//! - [`compare`] - Structural comparison of nets
//!
//! ## Usage
//!
//! ```
//! use petri_sketch::{compare, Session};
//!
//! let mut session = Session::new("sketch");
//! session.add_fragment("I -> {a__1 0.4} -> F").unwrap();
//! session.add_fragment("I -> {a__2 0.6} -> p1 -> [b] -> F").unwrap();
//! let (net, identities) = session.into_parts();
//!
//! let mut other = Session::new("other");
//! other.add_fragments("
//!     I -> {a__2 0.6} -> p1 -> [b] -> F
//!     I -> {a__1 0.4} -> F
//! ").unwrap();
//!
//! assert!(compare::equal_with_dupes(&net, other.net(), &identities, other.identities()).unwrap());
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! netsketch model.pns --accepting --compare expected.pns
//! ```
//!
//! Set `NETSKETCH_LOG=debug` to trace node resolution and comparison.

pub mod compare;
pub mod dsl;
pub mod error;
pub mod net;
pub mod session;

// Re-export main types for convenience
pub use error::{Result, SketchError};
pub use net::{AcceptingNet, IdentityMapper, StochasticNet};
pub use session::{create_accepting_net, create_net, create_net_from_fragments, Session};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmNetSketch;

/// Weight of an immediate transition written without one, as in `{a}`
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Separates a transition label from its id, as in `a__2`
pub const ID_SEPARATOR: &str = "__";

/// Label of silent transitions
pub const SILENT_LABEL: &str = "tau";
