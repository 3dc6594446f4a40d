//! Firey's Roulette - a bottle-flip throwing minigame
//!
//! Core modules:
//! - `sim`: Deterministic throw logic (outcome selection, phase sequencing, tweens)
//! - `settings`: Validated outcome table and throw tuning
//! - `platform`: Browser DOM bindings

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{Settings, ThrowTuning};
pub use sim::{ConfigError, OutcomeKind, OutcomeTable, SessionCounters, ThrowSequencer};

/// Animation timing and pose constants
pub mod consts {
    /// Fixed step used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Wind-up: hand pulls back
    pub const WIND_UP_SECS: f32 = 0.15;
    pub const WIND_UP_HAND_SKEW: f32 = 15.0;
    pub const WIND_UP_HAND_ROTATION: f32 = 8.0;
    pub const WIND_UP_ACTOR_ROTATION: f32 = -8.0;

    /// Flight: ascent, hand returns to neutral near the end
    pub const ASCENT_SECS: f32 = 0.3;
    pub const ASCENT_SCALE: f32 = 1.1;
    /// Fraction of the drift covered on the way up
    pub const ASCENT_DRIFT_FACTOR: f32 = 0.3;
    /// Fraction of the spin covered on the way up
    pub const ASCENT_SPIN_FACTOR: f32 = 0.5;
    pub const HAND_RETURN_SECS: f32 = 0.2;

    /// Spin jitter range added to the outcome rotation (degrees)
    pub const SPIN_JITTER: std::ops::Range<f32> = -7.0..8.0;
    /// Drift for caught throws (pixels)
    pub const CAUGHT_DRIFT: std::ops::Range<f32> = -7.0..8.0;
    /// Drift magnitude for fallen throws (pixels, random sign)
    pub const FALLEN_DRIFT: std::ops::Range<f32> = 30.0..80.0;

    /// Descent
    pub const CATCH_SECS: f32 = 0.35;
    pub const CATCH_SQUASH: (f32, f32) = (1.08, 0.9);
    pub const CATCH_SQUASH_SECS: f32 = 0.1;
    pub const SETTLE_SECS: f32 = 0.15;

    pub const POKE_RECOIL_LEAD_SECS: f32 = 0.1;
    pub const POKE_RECOIL_SECS: f32 = 0.12;
    pub const POKE_WOBBLE: f32 = 5.0;
    pub const POKE_WOBBLE_SECS: f32 = 0.15;
    pub const POKE_CORRECT_SECS: f32 = 0.12;
    pub const POKE_HAND_SETTLE_SECS: f32 = 0.2;
    pub const POKE_HAND_SETTLE_OVERLAP: f32 = 0.15;

    pub const FALL_SECS: f32 = 0.6;
    pub const IMPACT_SQUASH: (f32, f32) = (1.2, 0.7);
    pub const IMPACT_SECS: f32 = 0.08;

    /// Respawn from the ground
    pub const FADE_OUT_SECS: f32 = 0.25;
    pub const FADE_OUT_SCALE: f32 = 0.7;
    pub const SPAWN_SCALE: f32 = 0.5;
    pub const POP_IN_SECS: f32 = 0.35;
    pub const POP_IN_SCALE: f32 = 1.15;
    pub const POP_IN_OVERSHOOT: f32 = 1.7;

    /// Respawn from the hand
    pub const UNSPIN_SECS: f32 = 0.2;
    pub const GLIDE_SECS: f32 = 0.25;

    /// Hurt flash on the hand (milliseconds)
    pub const HURT_FLASH_MS: i32 = 300;
}
