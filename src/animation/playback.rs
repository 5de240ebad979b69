use super::{decode, types::Animation};
use crate::{retarget::RetargetMode, skeleton::BonePose, transform};
use log::trace;
use nalgebra_glm as glm;

/// Caller owned playback state for one animated instance. The application
/// mutates these fields per tick (keyboard input, script binding) and the
/// sampling methods turn the continuous time value into frame data. Frame
/// wraparound lives here rather than in the decoder because looping policy
/// is a playback concern.
#[derive(Clone, Copy, Debug, Default)]
pub struct Playback {
    pub time: f32,
    pub animation: usize,
    pub retarget_mode: RetargetMode,
}

impl Playback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32) {
        self.time += dt;
    }

    /// Bracketing frame pair and blend weight for the current time. A
    /// looped animation wraps into `[0, frame_count)` and blends the last
    /// frame back towards the first, a non looped one clamps at the ends.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn frame_pair(&self, animation: &Animation) -> (usize, usize, f32) {
        let frames = animation.frame_count();
        if frames < 2 {
            return (0, 0, 0.0f32);
        }
        let position = self.time * animation.frame_rate();
        if animation.looped() {
            let wrapped = position.rem_euclid(frames as f32);
            let first = (wrapped.floor() as usize).min(frames - 1);
            (first, (first + 1) % frames, wrapped - wrapped.floor())
        } else {
            let clamped = position.clamp(0.0f32, (frames - 1) as f32);
            let first = (clamped.floor() as usize).min(frames - 2);
            (first, first + 1, clamped - first as f32)
        }
    }

    /// Writes the blended local pose for the current time. Each bone is
    /// extracted from the two bracketing frames and blended, rotations
    /// along the shorter arc.
    ///
    /// # Panics
    /// Will panic if `pose` is shorter than the animation's bone count
    pub fn sample(&self, animation: &Animation, pose: &mut [BonePose]) {
        let (first, second, weight) = self.frame_pair(animation);
        trace!(
            "sample time={} first={} second={} weight={}",
            self.time,
            first,
            second,
            weight
        );
        if first == second || weight <= 0.0f32 {
            decode::extract_frame(animation, first, pose);
            return;
        }
        assert!(
            pose.len() >= animation.bone_count(),
            "pose slice too short for animation"
        );
        for (bone, out) in
            pose.iter_mut().enumerate().take(animation.bone_count())
        {
            let a = decode::extract_bone(animation, first, bone);
            let b = decode::extract_bone(animation, second, bone);
            *out = blend(&a, &b, weight);
        }
    }
}

/// Blends two local poses. Translation and scale interpolate linearly,
/// rotation uses the shorter arc so blending never flips near 180 degrees.
#[must_use]
pub fn blend(a: &BonePose, b: &BonePose, weight: f32) -> BonePose {
    BonePose {
        translation: glm::lerp(&a.translation, &b.translation, weight),
        rotation: transform::quat_nlerp_shortest(
            &a.rotation,
            &b.rotation,
            weight,
        ),
        scale: glm::lerp(&a.scale, &b.scale, weight),
    }
}
