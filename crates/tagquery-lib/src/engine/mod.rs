//! Matching engine.
//!
//! Two phases per candidate: the structural matcher unifies a rule with a
//! sibling list, then predicates filter and shape the bound captures.

mod error;
mod matcher;
mod matches;
mod predicates;
mod result;
mod trace;


pub use error::RuntimeError;
pub use matches::{MatchOptions, Matches};
pub use result::{CapturedNode, MatchResult};
pub use trace::{LogTracer, NoopTracer, Tracer};
