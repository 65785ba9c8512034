//! Local visibility scoring engine.
//!
//! [`Engine::analyze`] turns a map of copy-pasted listing attributes into a
//! [`localvis_core::ScoreResult`]: a 0-100 score split across weighted
//! dimensions, a label, the issues found, a lost-revenue estimate and an
//! estimated local ranking. The component functions are public so callers
//! can run any stage on its own.

pub mod classify;
pub mod clock;
mod engine;
mod error;
pub mod issues;
pub mod normalize;
mod parse;
pub mod ranking;
pub mod revenue;
pub mod scorer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::Engine;
pub use error::EngineError;
pub use normalize::{normalize, RawFields};
