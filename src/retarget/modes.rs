use super::types::RetargetMode;
use crate::{
    skeleton::{matrices, BonePose, Skeleton},
    transform,
    types::MAX_BONES,
};
use itertools::izip;
use log::trace;
use nalgebra_glm as glm;

// Bones present in the target but absent in the source are expected
// (partial rig overlap) and silently keep the target bind pose.
fn match_bone(source: &Skeleton, name: &str) -> Option<usize> {
    let found = source.bone_index(name);
    if found.is_none() {
        trace!("bone {} not in source skeleton", name);
    }
    found
}

/// Mode 0: copies the target bind pose, then overwrites every name matched
/// bone with the source bone's current pose verbatim. Only correct when
/// source and target share a bind pose per bone, otherwise the mismatch is
/// visible in the result.
///
/// # Panics
/// Will panic if `pose` is shorter than the target bone count
pub fn direct_pose(
    target: &Skeleton,
    source: &Skeleton,
    source_pose: &[BonePose],
    pose: &mut [BonePose],
) {
    assert!(
        pose.len() >= target.bone_count(),
        "pose slice too short for target skeleton"
    );
    for (out, bone, bind) in
        izip!(pose.iter_mut(), target.bones(), target.bind_pose())
    {
        *out = match_bone(source, &bone.name)
            .map_or(*bind, |found| source_pose[found]);
    }
}

/// Mode 1: like mode 0 but copies only the rotation from matched bones,
/// keeping the target's own bind translation and scale
///
/// # Panics
/// Will panic if `pose` is shorter than the target bone count
pub fn direct_rotation(
    target: &Skeleton,
    source: &Skeleton,
    source_pose: &[BonePose],
    pose: &mut [BonePose],
) {
    assert!(
        pose.len() >= target.bone_count(),
        "pose slice too short for target skeleton"
    );
    for (out, bone, bind) in
        izip!(pose.iter_mut(), target.bones(), target.bind_pose())
    {
        *out = match_bone(source, &bone.name).map_or(*bind, |found| BonePose {
            rotation: source_pose[found].rotation,
            ..*bind
        });
    }
}

/// Mode 2: quaternion delta between the source's bind rotation and its
/// current rotation, reapplied on top of the target's own bind rotation.
/// Translation and scale stay at the target bind pose. This isolates the
/// change from rest and replays it in the target's rest frame, so it
/// tolerates differing bind poses as long as both represent the same
/// stance.
///
/// # Panics
/// Will panic if `pose` is shorter than the target bone count
pub fn pose_space(
    target: &Skeleton,
    source: &Skeleton,
    source_pose: &[BonePose],
    pose: &mut [BonePose],
) {
    assert!(
        pose.len() >= target.bone_count(),
        "pose slice too short for target skeleton"
    );
    for (out, bone, bind) in
        izip!(pose.iter_mut(), target.bones(), target.bind_pose())
    {
        *out = match_bone(source, &bone.name).map_or(*bind, |found| {
            let delta = glm::quat_inverse(&source.bind_pose()[found].rotation)
                * source_pose[found].rotation;
            BonePose {
                rotation: transform::quat_normalize(&(bind.rotation * delta)),
                ..*bind
            }
        });
    }
}

/// Mode 3: the delta idea of mode 2 on full local affine matrices, which
/// keeps scale and shear deltas the quaternion form discards. The composed
/// locals run through the standard parent chain, so the output is already
/// absolute.
///
/// # Panics
/// Will panic if `absolute` is shorter than the target bone count
pub fn local_delta(
    target: &Skeleton,
    source: &Skeleton,
    source_pose: &[BonePose],
    absolute: &mut [glm::Mat4],
) {
    assert!(
        absolute.len() >= target.bone_count(),
        "matrix slice too short for target skeleton"
    );
    for (i, (bone, bind)) in
        target.bones().iter().zip(target.bind_pose()).enumerate()
    {
        let local = match_bone(source, &bone.name).map_or_else(
            || bind.matrix(),
            |found| {
                let delta = transform::mul(
                    &transform::invert(&source.bind_pose()[found].matrix()),
                    &source_pose[found].matrix(),
                );
                transform::mul(&bind.matrix(), &delta)
            },
        );
        absolute[i] = bone.parent.map_or(local, |parent| {
            transform::mul(&absolute[parent], &local)
        });
    }
}

/// Mode 4: the strongest form, deltas computed and applied in absolute
/// space: `target_bind_absolute * source_bind_absolute⁻¹ *
/// source_current_absolute`. Matched bones need no parent chain step since
/// the result is already absolute, which tolerates differing hierarchy
/// topology between matched bones. Unmatched bones keep their bind local
/// transform and chain from their parent's result.
///
/// # Panics
/// Will panic if `absolute` is shorter than the target bone count or
/// `source_pose` shorter than the source bone count
pub fn world_delta(
    target: &Skeleton,
    source: &Skeleton,
    source_pose: &[BonePose],
    absolute: &mut [glm::Mat4],
) {
    assert!(
        absolute.len() >= target.bone_count(),
        "matrix slice too short for target skeleton"
    );
    assert!(
        source_pose.len() >= source.bone_count(),
        "pose slice too short for source skeleton"
    );

    // Current absolute matrices of the source skeleton
    let mut source_local = [glm::Mat4::identity(); MAX_BONES];
    matrices::local_matrices(
        &source_pose[..source.bone_count()],
        &mut source_local,
    );
    let mut source_absolute = [glm::Mat4::identity(); MAX_BONES];
    matrices::absolute_matrices(
        &source_local[..source.bone_count()],
        source.bones(),
        &mut source_absolute,
    );

    for (i, (bone, bind)) in
        target.bones().iter().zip(target.bind_pose()).enumerate()
    {
        absolute[i] = match_bone(source, &bone.name).map_or_else(
            || {
                let local = bind.matrix();
                bone.parent.map_or(local, |parent| {
                    transform::mul(&absolute[parent], &local)
                })
            },
            |found| {
                let delta = transform::mul(
                    &source.inverse_bind()[found],
                    &source_absolute[found],
                );
                transform::mul(&target.bind_absolute()[i], &delta)
            },
        );
    }
}

/// Produces absolute pose matrices for the target skeleton from a source
/// skeleton's current pose under the selected mode. The pose producing
/// modes run through the local to absolute chain, the matrix modes write
/// absolute matrices directly. All strategies are pure functions of their
/// inputs.
///
/// # Panics
/// Will panic if `absolute` is shorter than the target bone count or
/// `source_pose` shorter than the source bone count
pub fn absolute_matrices(
    target: &Skeleton,
    source: &Skeleton,
    source_pose: &[BonePose],
    mode: RetargetMode,
    absolute: &mut [glm::Mat4],
) {
    match mode {
        RetargetMode::DirectPose
        | RetargetMode::DirectRotation
        | RetargetMode::PoseSpace => {
            let mut pose = [BonePose::default(); MAX_BONES];
            match mode {
                RetargetMode::DirectPose => {
                    direct_pose(target, source, source_pose, &mut pose);
                }
                RetargetMode::DirectRotation => {
                    direct_rotation(target, source, source_pose, &mut pose);
                }
                _ => pose_space(target, source, source_pose, &mut pose),
            }
            let count = target.bone_count();
            let mut local = [glm::Mat4::identity(); MAX_BONES];
            matrices::local_matrices(&pose[..count], &mut local);
            matrices::absolute_matrices(
                &local[..count],
                target.bones(),
                absolute,
            );
        }
        RetargetMode::LocalDelta => {
            local_delta(target, source, source_pose, absolute);
        }
        RetargetMode::WorldDelta => {
            world_delta(target, source, source_pose, absolute);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::skeleton::{Bone, BonePose, Skeleton};
    use nalgebra_glm as glm;

    const EPSILON: f32 = 0.0001f32;

    fn single_bone(name: &str, rotation: glm::Quat) -> Skeleton {
        Skeleton::new(
            name.to_string(),
            vec![Bone {
                name: "pelvis".to_string(),
                parent: None,
            }],
            vec![BonePose {
                rotation,
                ..Default::default()
            }],
        )
        .unwrap()
    }

    #[test]
    fn direct_rotation_keeps_target_translation() {
        let target = Skeleton::new(
            "target".to_string(),
            vec![Bone {
                name: "pelvis".to_string(),
                parent: None,
            }],
            vec![BonePose {
                translation: glm::vec3(0.0f32, 5.0f32, 0.0f32),
                ..Default::default()
            }],
        )
        .unwrap();
        let source = single_bone("source", glm::Quat::identity());
        let spin = glm::quat_angle_axis(
            1.0f32,
            &glm::vec3(0.0f32, 0.0f32, 1.0f32),
        );
        let source_pose = [BonePose {
            translation: glm::vec3(7.0f32, 7.0f32, 7.0f32),
            rotation: spin,
            ..Default::default()
        }];

        let mut pose = [BonePose::default(); 1];
        super::direct_rotation(&target, &source, &source_pose, &mut pose);

        let c = glm::equal_eps(
            &pose[0].translation,
            &glm::vec3(0.0f32, 5.0f32, 0.0f32),
            EPSILON,
        );
        assert!(c.x && c.y && c.z);
        let c = glm::quat_equal_eps(&pose[0].rotation, &spin, EPSILON);
        assert!(c.x && c.y && c.z && c.w);
    }

    #[test]
    fn pose_space_replays_delta_in_target_frame() {
        // Source rests at identity and pitches 90 degrees about x. The
        // target rests rolled 90 degrees about z, so the same pitch must
        // land on top of that roll.
        let pitch = glm::quat_angle_axis(
            std::f32::consts::FRAC_PI_2,
            &glm::vec3(1.0f32, 0.0f32, 0.0f32),
        );
        let roll = glm::quat_angle_axis(
            std::f32::consts::FRAC_PI_2,
            &glm::vec3(0.0f32, 0.0f32, 1.0f32),
        );
        let source = single_bone("source", glm::Quat::identity());
        let target = single_bone("target", roll);
        let source_pose = [BonePose {
            rotation: pitch,
            ..Default::default()
        }];

        let mut pose = [BonePose::default(); 1];
        super::pose_space(&target, &source, &source_pose, &mut pose);

        let expected = roll * pitch;
        let c = glm::quat_equal_eps(&pose[0].rotation, &expected, EPSILON);
        assert!(c.x && c.y && c.z && c.w);
    }

    #[test]
    fn unmatched_bone_keeps_bind_rotation() {
        let roll = glm::quat_angle_axis(
            0.5f32,
            &glm::vec3(0.0f32, 0.0f32, 1.0f32),
        );
        let target = single_bone("target", roll);
        let source = Skeleton::new(
            "source".to_string(),
            vec![Bone {
                name: "tail".to_string(),
                parent: None,
            }],
            vec![BonePose::default()],
        )
        .unwrap();
        let source_pose = [BonePose::default(); 1];

        let mut pose = [BonePose::default(); 1];
        super::direct_pose(&target, &source, &source_pose, &mut pose);
        let c = glm::quat_equal_eps(&pose[0].rotation, &roll, EPSILON);
        assert!(c.x && c.y && c.z && c.w);
    }
}
