//! Throw state and core minigame types
//!
//! Transforms are offsets from each element's resting layout position,
//! so the baseline pose is all zeros (and unit scale/opacity).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::outcome::{Outcome, OutcomeKind};

/// Current phase of a throw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrowPhase {
    /// Waiting for a throw trigger
    Idle,
    /// Hand pulls back (anticipation)
    WindUp,
    /// Actor ascends and spins
    Flight,
    /// Outcome-dependent landing
    Descent,
    /// Result tag shown, counters updated
    ResultDisplay,
    /// Actor returns to the hand
    Respawn,
}

/// Thrown actor transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorTransform {
    /// Offset from rest (pixels, +y is down)
    pub pos: Vec2,
    /// Rotation (degrees)
    pub rotation: f32,
    pub scale: Vec2,
    pub opacity: f32,
}

impl ActorTransform {
    pub const BASELINE: Self = Self {
        pos: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
        opacity: 1.0,
    };
}

impl Default for ActorTransform {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Throwing hand transform
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HandTransform {
    pub y: f32,
    /// Rotation (degrees)
    pub rotation: f32,
    /// Horizontal skew (degrees)
    pub skew_x: f32,
}

/// Everything the animation scheduler may write to
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stage {
    pub actor: ActorTransform,
    pub hand: HandTransform,
}

impl Stage {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_baseline(&self) -> bool {
        *self == Self::default()
    }
}

/// Screen measurements sampled when a throw starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageMetrics {
    /// Bottom edge of the actor (screen px)
    pub actor_bottom: f32,
    pub actor_height: f32,
    /// Top edge of the ground marker (screen px)
    pub ground_top: f32,
}

impl StageMetrics {
    /// Distance the actor travels to reach the ground
    pub fn fall_distance(&self) -> f32 {
        self.ground_top - self.actor_bottom + self.actor_height
    }
}

/// Throw tallies for this page view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionCounters {
    pub falls: u32,
    pub pokes: u32,
    pub successes: u32,
}

impl SessionCounters {
    /// Count one resolved throw
    pub fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Perfect => self.successes += 1,
            OutcomeKind::UpsideDown => self.pokes += 1,
            OutcomeKind::Fallen => self.falls += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.falls + self.pokes + self.successes
    }
}

/// Everything decided up front for one throw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowSession {
    pub outcome: Outcome,
    /// Outcome rotation plus jitter (degrees)
    pub spin: f32,
    /// Horizontal drift (pixels)
    pub drift: f32,
    /// Fall distance sampled at throw start
    pub fall_distance: f32,
}
