use super::types::{Animation, ChannelMask};
use crate::skeleton::BonePose;

/// Extracts the full local pose for one frame. Every bone starts from the
/// animation's stored default pose, then each explicitly keyed field is
/// overwritten from the frame data. Unkeyed fields keep the default value,
/// never zero, so a sparsely keyed scale channel stays at one.
///
/// # Panics
/// Will panic if `frame` is out of range or `pose` is shorter than the
/// animation's bone count. Both are caller contract violations since they
/// come from the asset's own declared bounds.
pub fn extract_frame(animation: &Animation, frame: usize, pose: &mut [BonePose]) {
    assert!(
        pose.len() >= animation.bone_count(),
        "pose slice too short for animation"
    );
    for (bone, out) in pose.iter_mut().enumerate().take(animation.bone_count())
    {
        *out = extract_bone(animation, frame, bone);
    }
}

/// Extracts one bone's pose from one frame, consuming the bone's floats in
/// strict mask bit order: translation x, y, z, rotation x, y, z, w, scale
/// x, y, z.
///
/// # Panics
/// Will panic if `frame` or `bone` is out of range
#[must_use]
pub fn extract_bone(animation: &Animation, frame: usize, bone: usize) -> BonePose {
    let mut pose = *animation.default_pose(bone);
    let bits = animation.mask(bone);
    let span = animation.bone_span(frame, bone);
    let mut at = 0;

    if bits.contains(ChannelMask::TRANSLATION_X) {
        pose.translation.x = span[at];
        at += 1;
    }
    if bits.contains(ChannelMask::TRANSLATION_Y) {
        pose.translation.y = span[at];
        at += 1;
    }
    if bits.contains(ChannelMask::TRANSLATION_Z) {
        pose.translation.z = span[at];
        at += 1;
    }
    if bits.contains(ChannelMask::ROTATION_X) {
        pose.rotation.coords.x = span[at];
        at += 1;
    }
    if bits.contains(ChannelMask::ROTATION_Y) {
        pose.rotation.coords.y = span[at];
        at += 1;
    }
    if bits.contains(ChannelMask::ROTATION_Z) {
        pose.rotation.coords.z = span[at];
        at += 1;
    }
    if bits.contains(ChannelMask::ROTATION_W) {
        pose.rotation.coords.w = span[at];
        at += 1;
    }
    if bits.contains(ChannelMask::SCALE_X) {
        pose.scale.x = span[at];
        at += 1;
    }
    if bits.contains(ChannelMask::SCALE_Y) {
        pose.scale.y = span[at];
        at += 1;
    }
    if bits.contains(ChannelMask::SCALE_Z) {
        pose.scale.z = span[at];
    }
    pose
}

#[cfg(test)]
mod tests {
    use super::{Animation, ChannelMask};
    use crate::skeleton::BonePose;
    use nalgebra_glm as glm;

    const EPSILON: f32 = 0.0001f32;

    /// Two bones: bone 0 keys only translation x and z, bone 1 keys only
    /// rotation. Defaults are deliberately not identity.
    fn granary() -> Animation {
        let masks = vec![
            ChannelMask::new(
                ChannelMask::TRANSLATION_X | ChannelMask::TRANSLATION_Z,
            ),
            ChannelMask::new(ChannelMask::ROTATION),
        ];
        let defaults = vec![
            BonePose {
                translation: glm::vec3(9.0f32, 8.0f32, 7.0f32),
                scale: glm::vec3(2.0f32, 2.0f32, 2.0f32),
                ..Default::default()
            },
            BonePose {
                translation: glm::vec3(0.0f32, 1.0f32, 0.0f32),
                ..Default::default()
            },
        ];
        // Frame 0: bone 0 keeps x=1 z=2, bone 1 at identity rotation.
        // Frame 1: bone 0 at x=3 z=4, bone 1 rotated 90 degrees about x.
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let data = vec![
            1.0f32, 2.0f32, 0.0f32, 0.0f32, 0.0f32, 1.0f32, //
            3.0f32, 4.0f32, half, 0.0f32, 0.0f32, half,
        ];
        Animation::new(
            "test".to_string(),
            2,
            2,
            24.0f32,
            true,
            masks,
            defaults,
            data,
        )
        .unwrap()
    }

    #[test]
    fn keyed_fields_overwrite() {
        let animation = granary();
        let pose = super::extract_bone(&animation, 1, 0);
        let c = glm::equal_eps(
            &pose.translation,
            &glm::vec3(3.0f32, 8.0f32, 4.0f32),
            EPSILON,
        );
        assert!(c.x && c.y && c.z);
    }

    #[test]
    fn unkeyed_fields_keep_defaults() {
        let animation = granary();
        let mut pose = [BonePose::default(); 2];
        super::extract_frame(&animation, 1, &mut pose);

        // Bone 0 never keys scale so it must stay at the default 2, not
        // reset to 0 or 1
        let c = glm::equal_eps(
            &pose[0].scale,
            &glm::vec3(2.0f32, 2.0f32, 2.0f32),
            EPSILON,
        );
        assert!(c.x && c.y && c.z);

        // Bone 1 never keys translation
        let c = glm::equal_eps(
            &pose[1].translation,
            &glm::vec3(0.0f32, 1.0f32, 0.0f32),
            EPSILON,
        );
        assert!(c.x && c.y && c.z);
    }

    #[test]
    fn rotation_consumed_in_bit_order() {
        let animation = granary();
        let pose = super::extract_bone(&animation, 1, 1);
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let expected = glm::quat(half, 0.0f32, 0.0f32, half);
        let c = glm::quat_equal_eps(&pose.rotation, &expected, EPSILON);
        assert!(c.x && c.y && c.z && c.w);
    }
}
