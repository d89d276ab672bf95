//! Analysis workflow engine.
//!
//! Drives the three-step enhancement pipeline (extract → optimize → skill
//! gaps) against an [`EnhancerBackend`]. The backend is a trait so the runner
//! can be exercised in isolation with mocked collaborators; the production
//! implementation ([`HttpBackend`]) talks to the remote service through
//! `cvlift-api`.

mod backend;
mod runner;
mod validate;

pub use backend::{EnhancerBackend, HttpBackend};
pub use runner::{AnalysisRunner, CancelFlag};
pub use validate::resolve_input;
