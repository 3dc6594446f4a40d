//! Throw sequencer
//!
//! Drives one throw at a time through
//! Idle → WindUp → Flight → Descent → ResultDisplay → Respawn → Idle.
//! The outcome and every random offset are decided when the throw starts;
//! phases only advance on scheduler cues.

use rand::Rng;

use super::outcome::{Outcome, OutcomeKind, OutcomeTable};
use super::state::{SessionCounters, Stage, StageMetrics, ThrowPhase, ThrowSession};
use super::timeline::{Cue, Easing, Props, Scheduler, Target, Timeline, Tween, Tweener};
use crate::consts::*;
use crate::settings::{Settings, ThrowTuning};

/// Things the presentation layer reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrowEvent {
    PhaseEntered(ThrowPhase),
    /// Flash the hand (upside-down impact)
    HurtFlash,
    /// Result resolved; tag the actor with `outcome.kind.tag()`
    Landed(Outcome),
    CountersChanged(SessionCounters),
    /// Remove every landing tag from the actor
    TagsCleared,
    /// Back in Idle, trigger can be re-enabled
    Ready,
}

/// Throw state machine
#[derive(Debug)]
pub struct ThrowSequencer<S: Scheduler = Tweener> {
    table: OutcomeTable,
    tuning: ThrowTuning,
    scheduler: S,
    stage: Stage,
    phase: ThrowPhase,
    session: Option<ThrowSession>,
    counters: SessionCounters,
    tag: Option<OutcomeKind>,
    pending: Vec<ThrowEvent>,
}

impl ThrowSequencer<Tweener> {
    /// Sequencer with the default time-based scheduler
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.outcomes.clone(), settings.tuning, Tweener::new())
    }
}

impl<S: Scheduler> ThrowSequencer<S> {
    pub fn new(table: OutcomeTable, tuning: ThrowTuning, scheduler: S) -> Self {
        Self {
            table,
            tuning,
            scheduler,
            stage: Stage::default(),
            phase: ThrowPhase::Idle,
            session: None,
            counters: SessionCounters::default(),
            tag: None,
            pending: Vec::new(),
        }
    }

    pub fn phase(&self) -> ThrowPhase {
        self.phase
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn session(&self) -> Option<&ThrowSession> {
        self.session.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.session.is_some()
    }

    /// Landing tag currently shown on the actor
    pub fn tag(&self) -> Option<&'static str> {
        self.tag.map(|k| k.tag())
    }

    /// Start a throw. Returns false (and changes nothing) unless idle.
    pub fn start_throw<R: Rng + ?Sized>(&mut self, rng: &mut R, metrics: &StageMetrics) -> bool {
        if self.phase != ThrowPhase::Idle {
            log::debug!("Throw ignored, already in {:?}", self.phase);
            return false;
        }

        let outcome = *self.table.draw(rng);
        let spin = outcome.rotation + rng.random_range(SPIN_JITTER);
        let drift = match outcome.kind {
            OutcomeKind::Fallen => {
                let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                rng.random_range(FALLEN_DRIFT) * side
            }
            _ => rng.random_range(CAUGHT_DRIFT),
        };
        let session = ThrowSession {
            outcome,
            spin,
            drift,
            fall_distance: metrics.fall_distance(),
        };
        log::info!(
            "Throw started: {} (spin {:.1}, drift {:.1})",
            outcome.kind.as_str(),
            spin,
            drift
        );

        self.session = Some(session);
        self.tag = None;
        self.pending.push(ThrowEvent::TagsCleared);
        self.enter(ThrowPhase::WindUp);
        true
    }

    /// Advance animations by `dt` seconds and return what happened
    pub fn tick(&mut self, dt: f32) -> Vec<ThrowEvent> {
        if self.phase != ThrowPhase::Idle {
            let cues = self.scheduler.advance(dt, &mut self.stage);
            for cue in cues {
                self.handle_cue(cue);
            }
        }
        std::mem::take(&mut self.pending)
    }

    fn handle_cue(&mut self, cue: Cue) {
        match cue {
            Cue::HurtFlash => self.pending.push(ThrowEvent::HurtFlash),
            Cue::PhaseComplete(phase) if phase != self.phase => {
                log::warn!("Stale completion for {:?} while in {:?}", phase, self.phase);
            }
            Cue::PhaseComplete(ThrowPhase::WindUp) => self.enter(ThrowPhase::Flight),
            Cue::PhaseComplete(ThrowPhase::Flight) => self.enter(ThrowPhase::Descent),
            Cue::PhaseComplete(ThrowPhase::Descent) => self.enter(ThrowPhase::ResultDisplay),
            Cue::PhaseComplete(ThrowPhase::ResultDisplay) => self.enter(ThrowPhase::Respawn),
            Cue::PhaseComplete(ThrowPhase::Respawn) => self.finish(),
            Cue::PhaseComplete(ThrowPhase::Idle) => {}
        }
    }

    fn enter(&mut self, phase: ThrowPhase) {
        let Some(session) = self.session else {
            log::warn!("No throw session while entering {:?}", phase);
            return;
        };

        self.phase = phase;
        self.pending.push(ThrowEvent::PhaseEntered(phase));

        let timeline = match phase {
            ThrowPhase::Idle => return,
            ThrowPhase::WindUp => wind_up(),
            ThrowPhase::Flight => flight(&session, &self.tuning),
            ThrowPhase::Descent => descent(&session, &self.tuning),
            ThrowPhase::ResultDisplay => {
                self.resolve(&session);
                Timeline::new().delay(self.tuning.dwell_secs)
            }
            ThrowPhase::Respawn => {
                self.tag = None;
                self.pending.push(ThrowEvent::TagsCleared);
                let on_ground = self.stage.actor.pos.y > self.tuning.ground_threshold;
                respawn(on_ground)
            }
        };
        self.scheduler
            .play(timeline.on_complete(Cue::PhaseComplete(phase)));
    }

    fn resolve(&mut self, session: &ThrowSession) {
        let outcome = session.outcome;
        self.tag = Some(outcome.kind);
        self.counters.record(outcome.kind);
        log::info!(
            "Landed {} (falls {}, pokes {}, successes {})",
            outcome.kind.as_str(),
            self.counters.falls,
            self.counters.pokes,
            self.counters.successes
        );
        self.pending.push(ThrowEvent::Landed(outcome));
        self.pending.push(ThrowEvent::CountersChanged(self.counters));
    }

    fn finish(&mut self) {
        self.session = None;
        self.stage.reset();
        self.phase = ThrowPhase::Idle;
        self.pending.push(ThrowEvent::PhaseEntered(ThrowPhase::Idle));
        self.pending.push(ThrowEvent::Ready);
    }
}

fn wind_up() -> Timeline {
    Timeline::new()
        .to(Tween::hand(
            Props::new()
                .skew_x(WIND_UP_HAND_SKEW)
                .rotation(WIND_UP_HAND_ROTATION),
            WIND_UP_SECS,
            Easing::Power2Out,
        ))
        .with_previous(Tween::actor(
            Props::new().rotation(WIND_UP_ACTOR_ROTATION),
            WIND_UP_SECS,
            Easing::Power2Out,
        ))
}

fn flight(session: &ThrowSession, tuning: &ThrowTuning) -> Timeline {
    Timeline::new()
        .to(Tween::actor(
            Props::new()
                .y(tuning.flight_height)
                .x(session.drift * ASCENT_DRIFT_FACTOR)
                .rotation(session.spin * ASCENT_SPIN_FACTOR)
                .scale(ASCENT_SCALE),
            ASCENT_SECS,
            Easing::Power2Out,
        ))
        .overlap(
            HAND_RETURN_SECS,
            Tween::hand(
                Props::new().skew_x(0.0).rotation(0.0),
                HAND_RETURN_SECS,
                Easing::Power2Out,
            ),
        )
}

fn descent(session: &ThrowSession, tuning: &ThrowTuning) -> Timeline {
    let target = session.outcome.rotation;
    match session.outcome.kind {
        OutcomeKind::Perfect => Timeline::new()
            .to(Tween::actor(
                Props::new().y(0.0).x(0.0).rotation(target).scale(1.0),
                CATCH_SECS,
                Easing::Power2In,
            ))
            .to(Tween::actor(
                Props::new().scale_xy(CATCH_SQUASH.0, CATCH_SQUASH.1),
                CATCH_SQUASH_SECS,
                Easing::Power2Out,
            ))
            .to(Tween::actor(
                Props::new().scale(1.0),
                SETTLE_SECS,
                Easing::Power2Out,
            )),
        OutcomeKind::UpsideDown => Timeline::new()
            .to(Tween::actor(
                Props::new()
                    .y(tuning.perch_height)
                    .x(0.0)
                    .rotation(target)
                    .scale(1.0),
                CATCH_SECS,
                Easing::Power2In,
            ))
            .cue_after(Cue::HurtFlash)
            .overlap(
                POKE_RECOIL_LEAD_SECS,
                Tween::hand(
                    Props::new().y(tuning.hand_recoil),
                    POKE_RECOIL_SECS,
                    Easing::Power2Out,
                ),
            )
            .to(Tween::actor(
                Props::new().rotation(target + POKE_WOBBLE),
                POKE_WOBBLE_SECS,
                Easing::Power1Out,
            ))
            .to(Tween::actor(
                Props::new().rotation(target),
                POKE_CORRECT_SECS,
                Easing::Power2Out,
            ))
            .overlap(
                POKE_HAND_SETTLE_OVERLAP,
                Tween::hand(
                    Props::new().y(0.0),
                    POKE_HAND_SETTLE_SECS,
                    Easing::Power2Out,
                ),
            ),
        OutcomeKind::Fallen => Timeline::new()
            .to(Tween::actor(
                Props::new()
                    .y(session.fall_distance)
                    .x(session.drift)
                    .rotation(session.spin + tuning.fallen_spin_offset)
                    .scale(1.0),
                FALL_SECS,
                Easing::Power2In,
            ))
            .to(Tween::actor(
                Props::new().scale_xy(IMPACT_SQUASH.0, IMPACT_SQUASH.1),
                IMPACT_SECS,
                Easing::Power2In,
            ))
            .to(Tween::actor(
                Props::new()
                    .scale(1.0)
                    .x(session.drift + tuning.settle_offset),
                SETTLE_SECS,
                Easing::Power2Out,
            )),
    }
}

fn respawn(on_ground: bool) -> Timeline {
    if on_ground {
        Timeline::new()
            .to(Tween::actor(
                Props::new().opacity(0.0).scale(FADE_OUT_SCALE),
                FADE_OUT_SECS,
                Easing::Power2In,
            ))
            .set(
                Target::Actor,
                Props::new().x(0.0).y(0.0).rotation(0.0).scale(SPAWN_SCALE),
            )
            .to(Tween::actor(
                Props::new().opacity(1.0).scale(POP_IN_SCALE),
                POP_IN_SECS,
                Easing::BackOut(POP_IN_OVERSHOOT),
            ))
            .to(Tween::actor(
                Props::new().scale(1.0),
                SETTLE_SECS,
                Easing::Power2Out,
            ))
    } else {
        Timeline::new()
            .to(Tween::actor(
                Props::new().rotation(0.0).scale(1.0),
                UNSPIN_SECS,
                Easing::Power2Out,
            ))
            .to(Tween::actor(
                Props::new().x(0.0).y(0.0),
                GLIDE_SECS,
                Easing::Power2InOut,
            ))
    }
}
