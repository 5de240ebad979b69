use crate::{
    skeleton::{matrices, Skeleton},
    types::SkinSink,
};
use bytemuck::{Pod, Zeroable};
use nalgebra_glm as glm;

/// One GPU ready bone matrix, column major as the skinning shader expects
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BoneMatrix(pub [[f32; 4]; 4]);

impl From<glm::Mat4> for BoneMatrix {
    fn from(m: glm::Mat4) -> Self {
        Self(m.into())
    }
}

/// Per instance skin matrix palette, the crate's contact point with the
/// renderer. Recomputed every frame from the absolute pose matrices and
/// the skeleton's cached inverse bind matrices. Each instance owns its own
/// storage so concurrent renders of a shared skeleton never share mutable
/// state.
pub struct SkinPalette {
    skin: Vec<glm::Mat4>,
    gpu: Vec<BoneMatrix>,
}

impl SkinPalette {
    #[must_use]
    pub fn new(skeleton: &Skeleton) -> Self {
        let count = skeleton.bone_count();
        Self {
            skin: vec![glm::Mat4::identity(); count],
            gpu: vec![BoneMatrix::from(glm::Mat4::identity()); count],
        }
    }

    /// Recomputes the palette from the current absolute pose matrices
    ///
    /// # Panics
    /// Will panic if `absolute` is shorter than the skeleton's bone count
    pub fn update(&mut self, absolute: &[glm::Mat4], skeleton: &Skeleton) {
        matrices::skin_matrices(
            &absolute[..skeleton.bone_count()],
            skeleton.inverse_bind(),
            &mut self.skin,
        );
        for (gpu, skin) in self.gpu.iter_mut().zip(&self.skin) {
            *gpu = BoneMatrix::from(*skin);
        }
    }

    /// Skin matrices in skeleton bone order
    #[must_use]
    pub fn matrices(&self) -> &[glm::Mat4] {
        &self.skin
    }

    /// The same palette as plain arrays for a uniform or storage buffer
    #[must_use]
    pub fn gpu(&self) -> &[BoneMatrix] {
        &self.gpu
    }

    /// Raw bytes of the palette for direct buffer upload
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.skin)
    }

    /// Hands the palette to the rendering side
    pub fn submit(&self, sink: &mut impl SkinSink) {
        sink.set_skin(&self.gpu);
    }
}

/// Line segments from each bone's absolute position to its parent's, for
/// debug drawing of the skeleton. Root bones produce no segment.
#[cfg(feature = "visualize")]
#[must_use]
pub fn bone_segments(
    absolute: &[glm::Mat4],
    skeleton: &Skeleton,
) -> Vec<(glm::Vec3, glm::Vec3)> {
    let mut segments = Vec::new();
    for (i, bone) in skeleton.bones().iter().enumerate() {
        if let Some(parent) = bone.parent {
            segments
                .push((position(&absolute[parent]), position(&absolute[i])));
        }
    }
    segments
}

#[cfg(feature = "visualize")]
fn position(m: &glm::Mat4) -> glm::Vec3 {
    glm::vec3(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

#[cfg(test)]
mod tests {
    use super::BoneMatrix;
    use nalgebra_glm as glm;

    /// Translation must land in the last column of the GPU array
    #[test]
    fn gpu_layout_is_column_major() {
        let m = glm::translate(
            &glm::Mat4::identity(),
            &glm::vec3(5.0f32, 7.0f32, 9.0f32),
        );
        let gpu = BoneMatrix::from(m);
        assert!(
            gpu.0[3][0] == 5.0f32
                && gpu.0[3][1] == 7.0f32
                && gpu.0[3][2] == 9.0f32
                && gpu.0[3][3] == 1.0f32
        );
    }
}
