//! Frame-counted tween timeline.
//!
//! The host drives one [`tick`](TweenTimeline::tick) per rendered
//! frame; every active tween advances one frame, writes an eased
//! sample, and reports completion on the tick its frame budget runs
//! out. Durations are frame counts rather than wall-clock durations —
//! transitions are authored in frames (90 frames ≈ 1.5 s at 60 fps)
//! and completion must be deterministic for the controllers layered
//! on top.

use glam::Vec3;

use super::easing::EasingFunction;
use crate::scene::NodeHandle;

/// Identifier for a started tween. Ids are never reused within a
/// timeline, so a stale id held across cancellation simply stops
/// matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenId(u64);

/// Property channel a tween writes to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenChannel {
    /// Orbit camera azimuth angle, radians.
    CameraAzimuth,
    /// Orbit camera polar angle, radians.
    CameraPolar,
    /// Orbit camera radius.
    CameraRadius,
    /// Orbit camera look-at target.
    CameraTarget,
    /// Vertical position of a scene node.
    NodeHeight(NodeHandle),
}

/// Interpolated value carried by a per-frame sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenValue {
    /// Scalar channel value.
    Scalar(f32),
    /// Vector channel value.
    Vector(Vec3),
}

impl TweenValue {
    fn lerp(start: Self, end: Self, t: f32) -> Self {
        match (start, end) {
            (Self::Scalar(a), Self::Scalar(b)) => {
                Self::Scalar(a + (b - a) * t)
            }
            (Self::Vector(a), Self::Vector(b)) => Self::Vector(a.lerp(b, t)),
            // Mismatched pairs cannot be constructed via the typed
            // start_* entry points; fall through to the end value.
            (_, end) => end,
        }
    }
}

struct ActiveTween {
    id: TweenId,
    channel: TweenChannel,
    start: TweenValue,
    end: TweenValue,
    frames: u32,
    elapsed: u32,
    easing: EasingFunction,
}

impl ActiveTween {
    fn progress(&self) -> f32 {
        if self.frames == 0 {
            return 1.0;
        }
        (self.elapsed as f32 / self.frames as f32).min(1.0)
    }
}

/// Timeline of concurrently running property tweens.
pub struct TweenTimeline {
    active: Vec<ActiveTween>,
    next_id: u64,
    /// Samples produced by the most recent tick.
    samples: Vec<(TweenChannel, TweenValue)>,
    /// Tweens that finished on the most recent tick.
    completed: Vec<TweenId>,
}

impl TweenTimeline {
    /// An empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Vec::with_capacity(8),
            next_id: 0,
            samples: Vec::with_capacity(8),
            completed: Vec::new(),
        }
    }

    fn start(
        &mut self,
        channel: TweenChannel,
        start: TweenValue,
        end: TweenValue,
        frames: u32,
        easing: EasingFunction,
    ) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.active.push(ActiveTween {
            id,
            channel,
            start,
            end,
            frames,
            elapsed: 0,
            easing,
        });
        id
    }

    /// Start a scalar tween. A zero-frame tween samples its end value
    /// and completes on the following tick.
    pub fn start_scalar(
        &mut self,
        channel: TweenChannel,
        start: f32,
        end: f32,
        frames: u32,
        easing: EasingFunction,
    ) -> TweenId {
        self.start(
            channel,
            TweenValue::Scalar(start),
            TweenValue::Scalar(end),
            frames,
            easing,
        )
    }

    /// Start a vector tween.
    pub fn start_vector(
        &mut self,
        channel: TweenChannel,
        start: Vec3,
        end: Vec3,
        frames: u32,
        easing: EasingFunction,
    ) -> TweenId {
        self.start(
            channel,
            TweenValue::Vector(start),
            TweenValue::Vector(end),
            frames,
            easing,
        )
    }

    /// Stop a tween without completing it. Idempotent: stopping a
    /// finished or already-stopped tween is a no-op.
    pub fn stop(&mut self, id: TweenId) {
        self.active.retain(|t| t.id != id);
    }

    /// Advance every active tween by one frame.
    ///
    /// Returns `true` while any tween remains active after the tick.
    /// Samples and completions from the tick are available from
    /// [`samples`](Self::samples) and [`completed`](Self::completed)
    /// until the next tick.
    pub fn tick(&mut self) -> bool {
        self.samples.clear();
        self.completed.clear();

        for tween in &mut self.active {
            tween.elapsed += 1;
            let eased = tween.easing.evaluate(tween.progress());
            self.samples.push((
                tween.channel,
                TweenValue::lerp(tween.start, tween.end, eased),
            ));
            if tween.elapsed >= tween.frames {
                self.completed.push(tween.id);
            }
        }

        let done = std::mem::take(&mut self.completed);
        self.active.retain(|t| !done.contains(&t.id));
        self.completed = done;

        !self.active.is_empty()
    }

    /// Samples produced by the most recent tick, in start order.
    #[must_use]
    pub fn samples(&self) -> &[(TweenChannel, TweenValue)] {
        &self.samples
    }

    /// Tweens that finished on the most recent tick.
    #[must_use]
    pub fn completed(&self) -> &[TweenId] {
        &self.completed
    }

    /// Whether the given tween finished on the most recent tick.
    #[must_use]
    pub fn just_completed(&self, id: TweenId) -> bool {
        self.completed.contains(&id)
    }

    /// Whether the given tween is still running.
    #[must_use]
    pub fn is_active(&self, id: TweenId) -> bool {
        self.active.iter().any(|t| t.id == id)
    }

    /// Whether any tween is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.active.is_empty()
    }

    /// Number of running tweens.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl Default for TweenTimeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_tween_runs_its_frame_budget() {
        let mut timeline = TweenTimeline::new();
        let id = timeline.start_scalar(
            TweenChannel::CameraRadius,
            0.0,
            10.0,
            4,
            EasingFunction::Linear,
        );

        for frame in 1..=3 {
            assert!(timeline.tick());
            assert!(!timeline.just_completed(id));
            let (_, value) = timeline.samples()[0];
            assert_eq!(value, TweenValue::Scalar(2.5 * frame as f32));
        }

        assert!(!timeline.tick());
        assert!(timeline.just_completed(id));
        assert_eq!(
            timeline.samples()[0].1,
            TweenValue::Scalar(10.0),
            "final sample is the exact end value"
        );
        assert!(!timeline.is_active(id));
    }

    #[test]
    fn vector_tween_final_sample_is_exact() {
        let mut timeline = TweenTimeline::new();
        let end = Vec3::new(1.0, 2.0, 3.0);
        let _ = timeline.start_vector(
            TweenChannel::CameraTarget,
            Vec3::ZERO,
            end,
            2,
            EasingFunction::CubicInOut,
        );
        let _ = timeline.tick();
        let _ = timeline.tick();
        assert_eq!(timeline.samples()[0].1, TweenValue::Vector(end));
    }

    #[test]
    fn concurrent_tweens_complete_independently() {
        let mut timeline = TweenTimeline::new();
        let short = timeline.start_scalar(
            TweenChannel::CameraAzimuth,
            0.0,
            1.0,
            1,
            EasingFunction::Linear,
        );
        let long = timeline.start_scalar(
            TweenChannel::CameraPolar,
            0.0,
            1.0,
            3,
            EasingFunction::Linear,
        );

        assert!(timeline.tick());
        assert!(timeline.just_completed(short));
        assert!(!timeline.just_completed(long));
        assert_eq!(timeline.active_count(), 1);

        let _ = timeline.tick();
        assert!(!timeline.just_completed(short), "completions are per-tick");
        assert!(!timeline.tick());
        assert!(timeline.just_completed(long));
    }

    #[test]
    fn stop_is_idempotent_and_suppresses_completion() {
        let mut timeline = TweenTimeline::new();
        let id = timeline.start_scalar(
            TweenChannel::CameraRadius,
            0.0,
            1.0,
            5,
            EasingFunction::Linear,
        );
        timeline.stop(id);
        timeline.stop(id);
        assert!(!timeline.tick());
        assert!(!timeline.just_completed(id));
        assert!(timeline.samples().is_empty());
    }

    #[test]
    fn zero_frame_tween_completes_next_tick_at_end_value() {
        let mut timeline = TweenTimeline::new();
        let id = timeline.start_scalar(
            TweenChannel::CameraRadius,
            3.0,
            7.0,
            0,
            EasingFunction::Linear,
        );
        let _ = timeline.tick();
        assert!(timeline.just_completed(id));
        assert_eq!(timeline.samples()[0].1, TweenValue::Scalar(7.0));
    }

    #[test]
    fn ids_are_not_reused() {
        let mut timeline = TweenTimeline::new();
        let a = timeline.start_scalar(
            TweenChannel::CameraRadius,
            0.0,
            1.0,
            1,
            EasingFunction::Linear,
        );
        let _ = timeline.tick();
        let b = timeline.start_scalar(
            TweenChannel::CameraRadius,
            0.0,
            1.0,
            1,
            EasingFunction::Linear,
        );
        assert_ne!(a, b);
    }
}
