use super::types::{Bone, BonePose};
use crate::transform;
use itertools::izip;
use nalgebra_glm as glm;

/// Fills `out` with one local matrix per pose entry
///
/// # Panics
/// Will panic if `out` is shorter than `pose`
pub fn local_matrices(pose: &[BonePose], out: &mut [glm::Mat4]) {
    assert!(out.len() >= pose.len(), "output slice too short");
    for (out, p) in out.iter_mut().zip(pose) {
        *out = transform::compose(&p.translation, &p.rotation, &p.scale);
    }
}

/// Single forward pass computing absolute (root relative) matrices. A root
/// bone's absolute matrix is its local matrix, any other bone composes its
/// local matrix with the parent's absolute matrix. Correct because parents
/// always precede children in the bone order.
///
/// # Panics
/// Will panic if the slice lengths disagree
pub fn absolute_matrices(
    local: &[glm::Mat4],
    bones: &[Bone],
    out: &mut [glm::Mat4],
) {
    assert_eq!(local.len(), bones.len(), "one local matrix per bone");
    assert!(out.len() >= bones.len(), "output slice too short");
    for (i, bone) in bones.iter().enumerate() {
        out[i] = bone.parent.map_or(local[i], |parent| {
            debug_assert!(parent < i);
            transform::mul(&out[parent], &local[i])
        });
    }
}

/// Per bone `absolute * inverse_bind`, the transform taking a vertex from
/// bind space to current pose space
///
/// # Panics
/// Will panic if the slice lengths disagree
pub fn skin_matrices(
    absolute: &[glm::Mat4],
    inverse_bind: &[glm::Mat4],
    out: &mut [glm::Mat4],
) {
    assert_eq!(
        absolute.len(),
        inverse_bind.len(),
        "one inverse bind matrix per bone"
    );
    assert!(out.len() >= absolute.len(), "output slice too short");
    for (out, pose, inv) in izip!(out.iter_mut(), absolute, inverse_bind) {
        *out = transform::mul(pose, inv);
    }
}
