//! Active animation set and tick stepping.

use std::collections::BTreeMap;
use std::fmt;

use super::descriptor::{AnimationDescriptor, Tint, Vec2};
use super::AnimationError;

/// Handle identifying one active playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationHandle(u64);

impl fmt::Display for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anim#{}", self.0)
    }
}

/// Renderer-facing view of one playback at the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameView {
    /// Index into the source sprite sheet (rendered frame × stride).
    pub sprite_frame: u32,
    pub position: Vec2,
    pub alpha: f32,
    pub tint: Option<Tint>,
}

struct ActiveAnimation {
    descriptor: AnimationDescriptor,
    position: Vec2,
    tint: Option<Tint>,
    elapsed: f32,
    alpha: f32,
}

// Completion tolerance: ticking in exact frame_duration steps must not fall
// one float ulp short of the derived total.
const TIME_EPSILON: f32 = 1e-6;

impl ActiveAnimation {
    /// Steps the playback; returns true once it is eligible for teardown.
    fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.position += self.descriptor.velocity.scaled(dt);
        self.alpha = (self.alpha + self.descriptor.alpha_velocity * dt).clamp(0.0, 1.0);

        if self.alpha <= 0.0 && self.descriptor.alpha_velocity < 0.0 {
            return true;
        }
        match self.descriptor.total_duration() {
            Some(total) => self.elapsed + TIME_EPSILON >= total,
            None => false,
        }
    }

    fn frame_index(&self) -> u32 {
        let raw = (self.elapsed / self.descriptor.frame_duration) as u32;
        if self.descriptor.looping {
            raw % self.descriptor.frame_count
        } else {
            // Past the sequence the last frame holds until duration elapses.
            raw.min(self.descriptor.frame_count - 1)
        }
    }

    fn view(&self) -> FrameView {
        FrameView {
            sprite_frame: self.frame_index() * self.descriptor.frame_stride,
            position: self.position,
            alpha: self.alpha,
            tint: self.tint,
        }
    }
}

/// Owns every active playback and advances them in lockstep.
///
/// Playbacks run independently of each other and of combat; the host calls
/// [`AnimationPlayer::advance`] once per simulation tick with the elapsed
/// delta.
#[derive(Default)]
pub struct AnimationPlayer {
    active: BTreeMap<u64, ActiveAnimation>,
    next_handle: u64,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a playback.
    ///
    /// # Errors
    ///
    /// Rejects malformed descriptors with
    /// [`AnimationError::InvalidDescriptor`]; no playback is registered in
    /// that case.
    pub fn play(
        &mut self,
        descriptor: AnimationDescriptor,
        position: Vec2,
        tint: Option<Tint>,
    ) -> Result<AnimationHandle, AnimationError> {
        descriptor.validate()?;
        let handle = AnimationHandle(self.next_handle);
        self.next_handle += 1;
        let alpha = descriptor.alpha;
        self.active.insert(
            handle.0,
            ActiveAnimation {
                descriptor,
                position,
                tint,
                elapsed: 0.0,
                alpha,
            },
        );
        Ok(handle)
    }

    /// Stops a playback and releases its resources synchronously.
    ///
    /// Idempotent: stopping an unknown or already-finished handle is a
    /// no-op returning false (external cancellation may race completion).
    pub fn stop(&mut self, handle: AnimationHandle) -> bool {
        self.active.remove(&handle.0).is_some()
    }

    /// Advances every active playback by `dt` simulation seconds and
    /// returns the handles that finished this tick, already removed.
    pub fn advance(&mut self, dt: f32) -> Vec<AnimationHandle> {
        let dt = dt.max(0.0);
        let finished: Vec<u64> = self
            .active
            .iter_mut()
            .filter_map(|(id, animation)| animation.advance(dt).then_some(*id))
            .collect();
        for id in &finished {
            self.active.remove(id);
        }
        finished.into_iter().map(AnimationHandle).collect()
    }

    /// Current frame of a playback, or `None` once it ended.
    pub fn frame(&self, handle: AnimationHandle) -> Option<FrameView> {
        self.active.get(&handle.0).map(ActiveAnimation::view)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spark() -> AnimationDescriptor {
        AnimationDescriptor::one_shot("fx/spark", 8, 0.075)
    }

    #[test]
    fn one_shot_terminates_when_the_sequence_completes() {
        let mut player = AnimationPlayer::new();
        let handle = player.play(spark(), Vec2::ZERO, None).unwrap();

        let mut elapsed: f32 = 0.0;
        let mut finished_at = None;
        for _ in 0..20 {
            elapsed += 0.075;
            if player.advance(0.075).contains(&handle) {
                finished_at = Some(elapsed);
                break;
            }
        }

        let finished_at = finished_at.expect("one-shot must self-terminate");
        assert!((finished_at - 0.6).abs() < 0.076, "ended at {finished_at}");
        assert!(player.frame(handle).is_none());
    }

    #[test]
    fn looping_never_self_terminates() {
        let mut player = AnimationPlayer::new();
        let mut descriptor = spark();
        descriptor.looping = true;
        let handle = player.play(descriptor, Vec2::ZERO, None).unwrap();

        for _ in 0..10_000 {
            assert!(player.advance(0.05).is_empty());
        }
        let view = player.frame(handle).unwrap();
        assert!(view.sprite_frame < 8);
    }

    #[test]
    fn looping_frame_index_wraps_to_zero() {
        let mut player = AnimationPlayer::new();
        let mut descriptor = spark();
        descriptor.looping = true;
        let handle = player.play(descriptor, Vec2::ZERO, None).unwrap();

        // 8 frames × 0.075 = 0.6; at 0.61 the sequence has wrapped.
        player.advance(0.61);
        assert_eq!(player.frame(handle).unwrap().sprite_frame, 0);
    }

    #[test]
    fn alpha_fade_makes_playback_eligible_for_teardown() {
        let mut player = AnimationPlayer::new();
        let mut descriptor = spark();
        descriptor.alpha_velocity = -0.5;
        descriptor.duration = Some(10.0);
        let handle = player.play(descriptor, Vec2::ZERO, None).unwrap();

        let mut elapsed: f32 = 0.0;
        let mut finished_at = None;
        for _ in 0..100 {
            elapsed += 0.1;
            if player.advance(0.1).contains(&handle) {
                finished_at = Some(elapsed);
                break;
            }
        }

        let finished_at = finished_at.expect("fade to zero must tear down");
        assert!((finished_at - 2.0).abs() < 0.11, "ended at {finished_at}");
    }

    #[test]
    fn explicit_longer_duration_holds_the_last_frame() {
        let mut player = AnimationPlayer::new();
        let mut descriptor = spark();
        descriptor.duration = Some(2.0);
        let handle = player.play(descriptor, Vec2::ZERO, None).unwrap();

        player.advance(1.0);
        let view = player.frame(handle).unwrap();
        assert_eq!(view.sprite_frame, 7);

        let finished = player.advance(1.0);
        assert!(finished.contains(&handle));
    }

    #[test]
    fn stride_skips_source_frames() {
        let mut player = AnimationPlayer::new();
        let mut descriptor = spark();
        descriptor.frame_stride = 3;
        let handle = player.play(descriptor, Vec2::ZERO, None).unwrap();

        player.advance(0.08);
        assert_eq!(player.frame(handle).unwrap().sprite_frame, 3);
    }

    #[test]
    fn position_drifts_with_velocity() {
        let mut player = AnimationPlayer::new();
        let mut descriptor = spark();
        descriptor.velocity = Vec2::new(10.0, -4.0);
        descriptor.duration = Some(5.0);
        let handle = player.play(descriptor, Vec2::new(1.0, 1.0), None).unwrap();

        player.advance(0.5);
        let view = player.frame(handle).unwrap();
        assert!((view.position.x - 6.0).abs() < 1e-4);
        assert!((view.position.y + 1.0).abs() < 1e-4);
    }

    #[test]
    fn invalid_descriptor_registers_nothing() {
        let mut player = AnimationPlayer::new();
        let mut descriptor = spark();
        descriptor.frame_count = 0;
        assert!(player.play(descriptor, Vec2::ZERO, None).is_err());
        assert!(player.is_empty());
    }

    #[test]
    fn stop_is_synchronous_and_idempotent() {
        let mut player = AnimationPlayer::new();
        let mut descriptor = spark();
        descriptor.looping = true;
        let handle = player.play(descriptor, Vec2::ZERO, None).unwrap();

        assert!(player.stop(handle));
        assert!(player.frame(handle).is_none());
        assert!(!player.stop(handle));
    }

    #[test]
    fn animations_advance_independently() {
        let mut player = AnimationPlayer::new();
        let short = player.play(spark(), Vec2::ZERO, None).unwrap();
        let mut long = spark();
        long.duration = Some(5.0);
        let long = player.play(long, Vec2::ZERO, None).unwrap();

        let finished = player.advance(0.7);
        assert!(finished.contains(&short));
        assert!(!finished.contains(&long));
        assert_eq!(player.len(), 1);
    }
}
