//! Affine transform maths for the pose pipeline
//!
//! Matrices are column major `glm::Mat4` used as affine transforms: the
//! upper left 3x3 carries rotation and scale, the last column carries
//! translation. nalgebra provides the generic operations but the pose
//! specific compose/decompose conventions live here.

use nalgebra_glm as glm;

/// Builds an affine matrix from translation, rotation and scale. The upper
/// left 3x3 is the rotation matrix with its columns scaled elementwise and
/// the bottom row is `[0, 0, 0, 1]`.
#[must_use]
pub fn compose(
    translation: &glm::Vec3,
    rotation: &glm::Quat,
    scale: &glm::Vec3,
) -> glm::Mat4 {
    let r = glm::quat_to_mat4(rotation);
    glm::mat4(
        r[(0, 0)] * scale.x,
        r[(0, 1)] * scale.y,
        r[(0, 2)] * scale.z,
        translation.x,
        r[(1, 0)] * scale.x,
        r[(1, 1)] * scale.y,
        r[(1, 2)] * scale.z,
        translation.y,
        r[(2, 0)] * scale.x,
        r[(2, 1)] * scale.y,
        r[(2, 2)] * scale.z,
        translation.z,
        0.0f32,
        0.0f32,
        0.0f32,
        1.0f32,
    )
}

/// Splits an affine matrix back into translation, rotation and scale.
/// Scale magnitudes are taken from the column lengths. A negative
/// determinant of the 3x3 part means a reflected basis, in which case all
/// three scale signs are flipped so the remaining 3x3 is a proper rotation.
/// The rotation is recovered with the four branch quaternion extraction
/// keyed on the largest diagonal element, which stays stable when the trace
/// is near zero.
#[allow(clippy::similar_names, clippy::suboptimal_flops)]
#[must_use]
pub fn decompose(m: &glm::Mat4) -> (glm::Vec3, glm::Quat, glm::Vec3) {
    let translation = glm::vec3(m[(0, 3)], m[(1, 3)], m[(2, 3)]);

    let mut scale = glm::vec3(
        glm::length(&glm::vec3(m[(0, 0)], m[(1, 0)], m[(2, 0)])),
        glm::length(&glm::vec3(m[(0, 1)], m[(1, 1)], m[(2, 1)])),
        glm::length(&glm::vec3(m[(0, 2)], m[(1, 2)], m[(2, 2)])),
    );
    let det = m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)]);
    if det < 0.0f32 {
        scale = -scale;
    }

    // De-scaled 3x3 part, now a proper rotation
    let r00 = m[(0, 0)] / scale.x;
    let r10 = m[(1, 0)] / scale.x;
    let r20 = m[(2, 0)] / scale.x;
    let r01 = m[(0, 1)] / scale.y;
    let r11 = m[(1, 1)] / scale.y;
    let r21 = m[(2, 1)] / scale.y;
    let r02 = m[(0, 2)] / scale.z;
    let r12 = m[(1, 2)] / scale.z;
    let r22 = m[(2, 2)] / scale.z;

    let trace = r00 + r11 + r22;
    let rotation = if trace > 0.0f32 {
        let s = (trace + 1.0f32).sqrt() * 2.0f32; // s = 4w
        glm::quat(
            (r21 - r12) / s,
            (r02 - r20) / s,
            (r10 - r01) / s,
            0.25f32 * s,
        )
    } else if r00 > r11 && r00 > r22 {
        let s = (1.0f32 + r00 - r11 - r22).sqrt() * 2.0f32; // s = 4x
        glm::quat(
            0.25f32 * s,
            (r01 + r10) / s,
            (r02 + r20) / s,
            (r21 - r12) / s,
        )
    } else if r11 > r22 {
        let s = (1.0f32 + r11 - r00 - r22).sqrt() * 2.0f32; // s = 4y
        glm::quat(
            (r01 + r10) / s,
            0.25f32 * s,
            (r12 + r21) / s,
            (r02 - r20) / s,
        )
    } else {
        let s = (1.0f32 + r22 - r00 - r11).sqrt() * 2.0f32; // s = 4z
        glm::quat(
            (r02 + r20) / s,
            (r12 + r21) / s,
            0.25f32 * s,
            (r10 - r01) / s,
        )
    };

    (translation, rotation, scale)
}

/// Full 4x4 inversion. Inverting a singular matrix is a contract violation
/// since bind matrices are invertible by construction, so debug builds
/// assert while release builds fall back to the identity matrix rather than
/// crash a renderer.
#[must_use]
pub fn invert(m: &glm::Mat4) -> glm::Mat4 {
    (*m).try_inverse().unwrap_or_else(|| {
        debug_assert!(false, "inverting a singular matrix");
        glm::Mat4::identity()
    })
}

/// Matrix product `a * b`, applying `b` first. Used to chain parent to
/// child transforms.
#[must_use]
pub fn mul(a: &glm::Mat4, b: &glm::Mat4) -> glm::Mat4 {
    a * b
}

#[must_use]
pub fn quat_normalize(q: &glm::Quat) -> glm::Quat {
    glm::quat_normalize(q)
}

/// Componentwise interpolation. The result is not unit length.
#[must_use]
pub fn quat_lerp(a: &glm::Quat, b: &glm::Quat, t: f32) -> glm::Quat {
    a.lerp(b, t)
}

/// Componentwise interpolation followed by normalization
#[must_use]
pub fn quat_nlerp(a: &glm::Quat, b: &glm::Quat, t: f32) -> glm::Quat {
    glm::quat_normalize(&a.lerp(b, t))
}

/// Like `quat_nlerp` but negates the second operand when the dot product is
/// negative so interpolation takes the shorter arc on the unit hypersphere.
/// A plain lerp visibly flips when the rotations are near 180 degrees apart.
#[must_use]
pub fn quat_nlerp_shortest(a: &glm::Quat, b: &glm::Quat, t: f32) -> glm::Quat {
    let b = if a.dot(b) < 0.0f32 { -*b } else { *b };
    glm::quat_normalize(&a.lerp(&b, t))
}
