//! Deterministic throw logic
//!
//! Everything here is pure and platform-free:
//! - Outcomes are drawn from a validated table with an injected RNG
//! - Phase timing comes from an injected `Scheduler`
//! - No DOM or rendering dependencies

pub mod outcome;
pub mod sequencer;
pub mod state;
pub mod timeline;

pub use outcome::{ConfigError, Outcome, OutcomeKind, OutcomeTable, select_outcome};
pub use sequencer::{ThrowEvent, ThrowSequencer};
pub use state::{
    ActorTransform, HandTransform, SessionCounters, Stage, StageMetrics, ThrowPhase, ThrowSession,
};
pub use timeline::{Cue, Easing, Props, Scheduler, Target, Timeline, Tween, Tweener};
