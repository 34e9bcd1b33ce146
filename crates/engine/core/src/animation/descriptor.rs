//! Animation descriptors and the small vector/color types they carry.

use super::AnimationError;

/// 2D vector in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Color override applied to every frame of a playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Declarative description of a sprite-sequence effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationDescriptor {
    /// Path prefix of the sprite sheet frames.
    pub sprite_base: String,
    /// Rendered frames in the sequence. Must be non-zero.
    pub frame_count: u32,
    /// Source frames consumed per rendered frame (sparse sheets). Must be
    /// non-zero; 1 means every frame.
    pub frame_stride: u32,
    /// Simulation seconds per rendered frame. Must be positive.
    pub frame_duration: f32,
    /// Starting opacity, within [0, 1].
    pub alpha: f32,
    /// Opacity delta per second. Negative fades out; reaching 0 makes the
    /// playback eligible for teardown even with frames remaining.
    pub alpha_velocity: f32,
    /// Positional drift in units per second.
    pub velocity: Vec2,
    /// Explicit playback length. `None` derives frame_count × frame_duration
    /// for one-shot sequences; a longer value holds the last frame.
    pub duration: Option<f32>,
    /// Looping playbacks restart at frame 0 and never self-terminate.
    pub looping: bool,
}

impl AnimationDescriptor {
    /// One-shot descriptor with full opacity, no drift and derived duration.
    pub fn one_shot(sprite_base: impl Into<String>, frame_count: u32, frame_duration: f32) -> Self {
        Self {
            sprite_base: sprite_base.into(),
            frame_count,
            frame_stride: 1,
            frame_duration,
            alpha: 1.0,
            alpha_velocity: 0.0,
            velocity: Vec2::ZERO,
            duration: None,
            looping: false,
        }
    }

    /// Total playback length, or `None` for looping descriptors.
    pub fn total_duration(&self) -> Option<f32> {
        if self.looping {
            None
        } else {
            Some(
                self.duration
                    .unwrap_or(self.frame_count as f32 * self.frame_duration),
            )
        }
    }

    /// Checks every field against its documented range.
    ///
    /// [`AnimationPlayer::play`](super::AnimationPlayer::play) validates on
    /// entry; content loaders call this earlier to reject bad data at load
    /// time.
    pub fn validate(&self) -> Result<(), AnimationError> {
        if self.frame_count == 0 {
            return Err(AnimationError::invalid("frame_count must be non-zero"));
        }
        if self.frame_stride == 0 {
            return Err(AnimationError::invalid("frame_stride must be non-zero"));
        }
        if !self.frame_duration.is_finite() || self.frame_duration <= 0.0 {
            return Err(AnimationError::invalid(format!(
                "frame_duration must be positive, got {}",
                self.frame_duration
            )));
        }
        if let Some(duration) = self.duration {
            if !duration.is_finite() || duration < 0.0 {
                return Err(AnimationError::invalid(format!(
                    "duration must be non-negative, got {duration}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(AnimationError::invalid(format!(
                "alpha must be within [0, 1], got {}",
                self.alpha
            )));
        }
        if !self.alpha_velocity.is_finite() {
            return Err(AnimationError::invalid("alpha_velocity must be finite"));
        }
        if !self.velocity.x.is_finite() || !self.velocity.y.is_finite() {
            return Err(AnimationError::invalid("velocity must be finite"));
        }
        Ok(())
    }
}

/// A playback request queued by a hook for the host to execute.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationRequest {
    pub descriptor: AnimationDescriptor,
    pub position: Vec2,
    pub tint: Option<Tint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_frames_is_rejected() {
        let mut descriptor = AnimationDescriptor::one_shot("fx/spark", 8, 0.075);
        descriptor.frame_count = 0;
        assert!(matches!(
            descriptor.validate(),
            Err(AnimationError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let mut descriptor = AnimationDescriptor::one_shot("fx/spark", 8, 0.075);
        descriptor.duration = Some(-1.0);
        assert!(matches!(
            descriptor.validate(),
            Err(AnimationError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn derived_duration_covers_the_frame_sequence() {
        let descriptor = AnimationDescriptor::one_shot("fx/spark", 8, 0.075);
        let total = descriptor.total_duration().unwrap();
        assert!((total - 0.6).abs() < 1e-6);
    }

    #[test]
    fn looping_descriptors_have_no_total_duration() {
        let mut descriptor = AnimationDescriptor::one_shot("fx/torch", 4, 0.1);
        descriptor.looping = true;
        assert_eq!(descriptor.total_duration(), None);
    }
}
