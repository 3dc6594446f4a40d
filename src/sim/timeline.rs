//! Tween timelines
//!
//! The sequencer describes each phase as a `Timeline` of property tweens and
//! hands it to a `Scheduler`. Schedulers report progress back as `Cue`s, so
//! the sequencer never waits on anything directly.

use super::state::{Stage, ThrowPhase};

/// Easing curves (power1 = quadratic, power2 = cubic)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    Power1Out,
    Power2In,
    Power2Out,
    Power2InOut,
    /// Overshoots the target then settles back
    BackOut(f32),
}

impl Easing {
    /// Map linear progress `t` in [0, 1] to eased progress
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power1Out => 1.0 - (1.0 - t).powi(2),
            Easing::Power2In => t.powi(3),
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::Power2InOut => {
                if t < 0.5 {
                    4.0 * t.powi(3)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::BackOut(overshoot) => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u.powi(3) + overshoot * u.powi(2)
            }
        }
    }
}

/// Which element a tween drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Actor,
    Hand,
}

/// Animatable property channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prop {
    X,
    Y,
    Rotation,
    ScaleX,
    ScaleY,
    Opacity,
    SkewX,
}

impl Prop {
    pub const COUNT: usize = 7;

    pub const ALL: [Prop; Prop::COUNT] = [
        Prop::X,
        Prop::Y,
        Prop::Rotation,
        Prop::ScaleX,
        Prop::ScaleY,
        Prop::Opacity,
        Prop::SkewX,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl Stage {
    /// Mutable access to one property channel (None if the target lacks it)
    pub fn channel_mut(&mut self, target: Target, prop: Prop) -> Option<&mut f32> {
        match (target, prop) {
            (Target::Actor, Prop::X) => Some(&mut self.actor.pos.x),
            (Target::Actor, Prop::Y) => Some(&mut self.actor.pos.y),
            (Target::Actor, Prop::Rotation) => Some(&mut self.actor.rotation),
            (Target::Actor, Prop::ScaleX) => Some(&mut self.actor.scale.x),
            (Target::Actor, Prop::ScaleY) => Some(&mut self.actor.scale.y),
            (Target::Actor, Prop::Opacity) => Some(&mut self.actor.opacity),
            (Target::Hand, Prop::Y) => Some(&mut self.hand.y),
            (Target::Hand, Prop::Rotation) => Some(&mut self.hand.rotation),
            (Target::Hand, Prop::SkewX) => Some(&mut self.hand.skew_x),
            _ => None,
        }
    }
}

/// Target values for a tween; unset channels are left alone
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Props {
    values: [Option<f32>; Prop::COUNT],
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, prop: Prop, value: f32) -> Self {
        self.values[prop.index()] = Some(value);
        self
    }

    pub fn x(self, v: f32) -> Self {
        self.with(Prop::X, v)
    }

    pub fn y(self, v: f32) -> Self {
        self.with(Prop::Y, v)
    }

    pub fn rotation(self, v: f32) -> Self {
        self.with(Prop::Rotation, v)
    }

    /// Uniform scale
    pub fn scale(self, v: f32) -> Self {
        self.with(Prop::ScaleX, v).with(Prop::ScaleY, v)
    }

    pub fn scale_xy(self, x: f32, y: f32) -> Self {
        self.with(Prop::ScaleX, x).with(Prop::ScaleY, y)
    }

    pub fn opacity(self, v: f32) -> Self {
        self.with(Prop::Opacity, v)
    }

    pub fn skew_x(self, v: f32) -> Self {
        self.with(Prop::SkewX, v)
    }

    pub fn get(&self, prop: Prop) -> Option<f32> {
        self.values[prop.index()]
    }

    /// Iterate the channels this tween drives
    pub fn iter(&self) -> impl Iterator<Item = (Prop, f32)> + '_ {
        Prop::ALL
            .iter()
            .filter_map(|&p| self.values[p.index()].map(|v| (p, v)))
    }
}

/// Interpolate some properties of one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub target: Target,
    pub props: Props,
    /// Seconds (0 = instantaneous set)
    pub duration: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(target: Target, props: Props, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            props,
            duration: duration.max(0.0),
            easing,
        }
    }

    pub fn actor(props: Props, duration: f32, easing: Easing) -> Self {
        Self::new(Target::Actor, props, duration, easing)
    }

    pub fn hand(props: Props, duration: f32, easing: Easing) -> Self {
        Self::new(Target::Hand, props, duration, easing)
    }

    /// Read the current values of the driven channels
    pub fn capture(&self, stage: &mut Stage) -> Props {
        let mut from = Props::new();
        for (prop, _) in self.props.iter() {
            if let Some(value) = stage.channel_mut(self.target, prop) {
                from = from.with(prop, *value);
            }
        }
        from
    }

    /// Write the interpolated values for linear progress `t`
    pub fn apply(&self, stage: &mut Stage, from: &Props, t: f32) {
        let k = if t >= 1.0 { 1.0 } else { self.easing.apply(t) };
        for (prop, to) in self.props.iter() {
            let Some(channel) = stage.channel_mut(self.target, prop) else {
                log::debug!("{:?} has no {:?} channel", self.target, prop);
                continue;
            };
            // Exact target on completion, no float residue
            *channel = if t >= 1.0 {
                to
            } else {
                let start = from.get(prop).unwrap_or(to);
                start + (to - start) * k
            };
        }
    }

    /// Jump straight to the target values
    pub fn finish(&self, stage: &mut Stage) {
        self.apply(stage, &Props::new(), 1.0);
    }
}

/// Signals a scheduler reports back to the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Impact on the hand (upside-down landing)
    HurtFlash,
    /// Every tween of the phase's timeline has completed
    PhaseComplete(ThrowPhase),
}

/// A tween placed on the timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    /// Seconds from timeline start
    pub start: f32,
    pub tween: Tween,
}

impl Entry {
    pub fn end(&self) -> f32 {
        self.start + self.tween.duration
    }
}

/// Ordered tweens and cues for one phase
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    entries: Vec<Entry>,
    cues: Vec<(f32, Cue)>,
    completion: Option<Cue>,
    /// Padding past the last tween
    tail: f32,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    fn cursor(&self) -> f32 {
        self.entries.iter().map(Entry::end).fold(0.0, f32::max)
    }

    fn push(mut self, start: f32, tween: Tween) -> Self {
        let start = start.max(0.0);
        let end = start + tween.duration;
        self.tail = (self.tail - (end - self.cursor()).max(0.0)).max(0.0);
        self.entries.push(Entry { start, tween });
        self
    }

    /// Append after everything queued so far
    pub fn to(self, tween: Tween) -> Self {
        let start = self.duration();
        self.push(start, tween)
    }

    /// Start alongside the previous tween
    pub fn with_previous(self, tween: Tween) -> Self {
        let start = self.entries.last().map(|e| e.start).unwrap_or(0.0);
        self.push(start, tween)
    }

    /// Start `secs` before the current end
    pub fn overlap(self, secs: f32, tween: Tween) -> Self {
        let start = self.duration() - secs;
        self.push(start, tween)
    }

    /// Instantaneous set
    pub fn set(self, target: Target, props: Props) -> Self {
        self.to(Tween::new(target, props, 0.0, Easing::Linear))
    }

    /// Hold for `secs` before anything appended later
    pub fn delay(mut self, secs: f32) -> Self {
        self.tail += secs.max(0.0);
        self
    }

    /// Fire `cue` when the most recently added tween finishes
    pub fn cue_after(mut self, cue: Cue) -> Self {
        let at = self.entries.last().map(Entry::end).unwrap_or(0.0);
        self.cues.push((at, cue));
        self
    }

    /// Fire `cue` once the whole timeline has played
    pub fn on_complete(mut self, cue: Cue) -> Self {
        self.completion = Some(cue);
        self
    }

    /// Total length in seconds
    pub fn duration(&self) -> f32 {
        self.cursor() + self.tail
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entry indices in start order (stable for equal starts)
    pub fn play_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by(|&a, &b| self.entries[a].start.total_cmp(&self.entries[b].start));
        order
    }

    /// Mid-timeline cues in time order
    pub fn cues(&self) -> Vec<(f32, Cue)> {
        let mut cues = self.cues.clone();
        cues.sort_by(|a, b| a.0.total_cmp(&b.0));
        cues
    }

    pub fn completion(&self) -> Option<Cue> {
        self.completion
    }
}

/// Anything that can play timelines against the stage
pub trait Scheduler {
    /// Queue a timeline to start on the next advance
    fn play(&mut self, timeline: Timeline);

    /// Advance time, writing property values and returning fired cues
    fn advance(&mut self, dt: f32, stage: &mut Stage) -> Vec<Cue>;

    /// True when nothing is playing
    fn is_idle(&self) -> bool;
}

/// A timeline being played by the `Tweener`
#[derive(Debug)]
struct Playback {
    timeline: Timeline,
    order: Vec<usize>,
    cues: Vec<(f32, Cue)>,
    time: f32,
    from: Vec<Option<Props>>,
    finished: Vec<bool>,
    next_cue: usize,
}

impl Playback {
    fn new(timeline: Timeline) -> Self {
        let n = timeline.entries().len();
        Self {
            order: timeline.play_order(),
            cues: timeline.cues(),
            timeline,
            time: 0.0,
            from: vec![None; n],
            finished: vec![false; n],
            next_cue: 0,
        }
    }

    /// Returns true once the timeline has fully played
    fn step(&mut self, dt: f32, stage: &mut Stage, fired: &mut Vec<Cue>) -> bool {
        self.time += dt;

        for &i in &self.order {
            let entry = self.timeline.entries()[i];
            if self.finished[i] || self.time < entry.start {
                continue;
            }
            let from = *self.from[i].get_or_insert_with(|| entry.tween.capture(stage));
            let t = if entry.tween.duration <= 0.0 {
                1.0
            } else {
                (self.time - entry.start) / entry.tween.duration
            };
            entry.tween.apply(stage, &from, t);
            if t >= 1.0 {
                self.finished[i] = true;
            }
        }

        while let Some(&(at, cue)) = self.cues.get(self.next_cue) {
            if self.time < at {
                break;
            }
            fired.push(cue);
            self.next_cue += 1;
        }

        let done = self.time >= self.timeline.duration() && self.finished.iter().all(|&f| f);
        if done {
            fired.extend(self.timeline.completion());
        }
        done
    }
}

/// Default time-driven scheduler
#[derive(Debug, Default)]
pub struct Tweener {
    playing: Vec<Playback>,
}

impl Tweener {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for Tweener {
    fn play(&mut self, timeline: Timeline) {
        self.playing.push(Playback::new(timeline));
    }

    fn advance(&mut self, dt: f32, stage: &mut Stage) -> Vec<Cue> {
        let mut fired = Vec::new();
        self.playing
            .retain_mut(|playback| !playback.step(dt, stage, &mut fired));
        fired
    }

    fn is_idle(&self) -> bool {
        self.playing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::Power1Out,
            Easing::Power2In,
            Easing::Power2Out,
            Easing::Power2InOut,
            Easing::BackOut(1.7),
        ] {
            assert!(approx(easing.apply(0.0), 0.0), "{:?} at 0", easing);
            assert!(approx(easing.apply(1.0), 1.0), "{:?} at 1", easing);
        }
        assert!(Easing::BackOut(1.7).apply(0.7) > 1.0);
        assert!(approx(Easing::Power2InOut.apply(0.5), 0.5));
    }

    #[test]
    fn test_timeline_placement() {
        let timeline = Timeline::new()
            .to(Tween::hand(Props::new().skew_x(15.0), 0.15, Easing::Power2Out))
            .with_previous(Tween::actor(Props::new().rotation(-8.0), 0.15, Easing::Power2Out))
            .to(Tween::actor(Props::new().y(-150.0), 0.3, Easing::Power2Out))
            .overlap(0.2, Tween::hand(Props::new().skew_x(0.0), 0.2, Easing::Power2Out));

        let starts: Vec<f32> = timeline.entries().iter().map(|e| e.start).collect();
        assert!(approx(starts[0], 0.0));
        assert!(approx(starts[1], 0.0));
        assert!(approx(starts[2], 0.15));
        assert!(approx(starts[3], 0.25));
        assert!(approx(timeline.duration(), 0.45));
    }

    #[test]
    fn test_delay_extends_duration() {
        let timeline = Timeline::new()
            .to(Tween::actor(Props::new().x(10.0), 0.5, Easing::Linear))
            .delay(1.2);
        assert!(approx(timeline.duration(), 1.7));

        let timeline = timeline.to(Tween::actor(Props::new().x(0.0), 0.5, Easing::Linear));
        assert!(approx(timeline.entries()[1].start, 1.7));
        assert!(approx(timeline.duration(), 2.2));
    }

    #[test]
    fn test_tweener_interpolates_and_completes() {
        let mut stage = Stage::default();
        let mut tweener = Tweener::new();
        tweener.play(
            Timeline::new()
                .to(Tween::actor(Props::new().y(-100.0), 1.0, Easing::Linear))
                .on_complete(Cue::PhaseComplete(ThrowPhase::Flight)),
        );

        let cues = tweener.advance(0.5, &mut stage);
        assert!(cues.is_empty());
        assert!(approx(stage.actor.pos.y, -50.0));

        let cues = tweener.advance(0.6, &mut stage);
        assert_eq!(cues, vec![Cue::PhaseComplete(ThrowPhase::Flight)]);
        assert_eq!(stage.actor.pos.y, -100.0);
        assert!(tweener.is_idle());
    }

    #[test]
    fn test_sequential_tweens_chain_start_values() {
        let mut stage = Stage::default();
        let mut tweener = Tweener::new();
        tweener.play(
            Timeline::new()
                .to(Tween::actor(Props::new().x(10.0), 0.2, Easing::Linear))
                .to(Tween::actor(Props::new().x(30.0), 0.2, Easing::Linear)),
        );

        tweener.advance(0.3, &mut stage);
        // Second tween started from 10 and is halfway
        assert!(approx(stage.actor.pos.x, 20.0));
    }

    #[test]
    fn test_mid_timeline_cue_order() {
        let mut stage = Stage::default();
        let mut tweener = Tweener::new();
        tweener.play(
            Timeline::new()
                .to(Tween::actor(Props::new().rotation(540.0), 0.35, Easing::Power2In))
                .cue_after(Cue::HurtFlash)
                .to(Tween::actor(Props::new().rotation(545.0), 0.15, Easing::Power1Out))
                .on_complete(Cue::PhaseComplete(ThrowPhase::Descent)),
        );

        assert!(tweener.advance(0.2, &mut stage).is_empty());
        assert_eq!(tweener.advance(0.2, &mut stage), vec![Cue::HurtFlash]);
        assert_eq!(
            tweener.advance(0.2, &mut stage),
            vec![Cue::PhaseComplete(ThrowPhase::Descent)]
        );
    }

    #[test]
    fn test_hand_ignores_missing_channels() {
        let mut stage = Stage::default();
        Tween::hand(Props::new().x(50.0).y(4.0), 0.1, Easing::Linear).finish(&mut stage);
        assert_eq!(stage.hand.y, 4.0);
        assert_eq!(stage.actor.pos.x, 0.0);
    }
}
