use super::matrices;
use crate::{mw_error::MwError, transform, types::MAX_BONES};
use ahash::{HashMap, HashMapExt};
use log::{error, info};
use nalgebra_glm as glm;

/// A bone's local transform relative to its parent. A full pose is a slice
/// of one entry per bone, aligned by index with the skeleton.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BonePose {
    pub translation: glm::Vec3,
    pub rotation: glm::Quat,
    pub scale: glm::Vec3,
}

impl Default for BonePose {
    fn default() -> Self {
        Self {
            translation: glm::Vec3::zeros(),
            rotation: glm::Quat::identity(),
            scale: glm::vec3(1.0f32, 1.0f32, 1.0f32),
        }
    }
}

impl BonePose {
    /// Local pose matrix for this bone
    #[must_use]
    pub fn matrix(&self) -> glm::Mat4 {
        transform::compose(&self.translation, &self.rotation, &self.scale)
    }
}

/// One node in the parent indexed hierarchy. The parent is `None` for a
/// root bone and always references an earlier index otherwise.
#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
}

/// Bone hierarchy with its bind pose, created once when a model is loaded
/// and immutable afterwards. Construction validates the asset and caches
/// the absolute bind matrices, their inverses (needed every frame for
/// skinning) and a name lookup used when retargeting by bone name.
#[derive(Clone, Debug)]
pub struct Skeleton {
    name: String,
    bones: Vec<Bone>,
    bind_pose: Vec<BonePose>,
    bind_absolute: Vec<glm::Mat4>,
    inverse_bind: Vec<glm::Mat4>,
    index: HashMap<String, usize>,
}

impl Skeleton {
    /// Creates a validated skeleton. Bones must be in topological order so
    /// that a single forward pass can compute absolute matrices.
    ///
    /// # Errors
    /// May return `MwError` if the bone count is zero or above `MAX_BONES`,
    /// if a parent index does not reference an earlier bone, if a bone name
    /// repeats, or if the bind pose length does not match the bone count.
    pub fn new(
        name: String,
        bones: Vec<Bone>,
        bind_pose: Vec<BonePose>,
    ) -> Result<Self, MwError> {
        if bones.is_empty() {
            return Err(MwError::EmptySkeleton);
        }
        if bones.len() > MAX_BONES {
            error!("skeleton {}: {} bones exceeds MAX_BONES", name, bones.len());
            return Err(MwError::TooManyBones(bones.len()));
        }
        if bind_pose.len() != bones.len() {
            return Err(MwError::BoneCountMismatch);
        }

        let mut index = HashMap::with_capacity(bones.len());
        for (i, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= i {
                    error!(
                        "skeleton {}: bone {} has parent {} out of order",
                        name, i, parent
                    );
                    return Err(MwError::ParentOutOfOrder(i));
                }
            }
            if index.insert(bone.name.clone(), i).is_some() {
                return Err(MwError::DuplicateBoneName(bone.name.clone()));
            }
        }

        // Cache the bind matrix chain and its inverses
        let mut local = vec![glm::Mat4::identity(); bones.len()];
        matrices::local_matrices(&bind_pose, &mut local);
        let mut bind_absolute = vec![glm::Mat4::identity(); bones.len()];
        matrices::absolute_matrices(&local, &bones, &mut bind_absolute);
        let inverse_bind = bind_absolute.iter().map(transform::invert).collect();

        info!("skeleton {}: {} bones", name, bones.len());
        Ok(Self {
            name,
            bones,
            bind_pose,
            bind_absolute,
            inverse_bind,
            index,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[must_use]
    pub fn bind_pose(&self) -> &[BonePose] {
        &self.bind_pose
    }

    /// Absolute (root relative) matrices of the bind pose
    #[must_use]
    pub fn bind_absolute(&self) -> &[glm::Mat4] {
        &self.bind_absolute
    }

    /// Inverses of the absolute bind matrices, computed once at load
    #[must_use]
    pub fn inverse_bind(&self) -> &[glm::Mat4] {
        &self.inverse_bind
    }

    /// Looks up a bone by name. Names are matched exactly, case sensitive.
    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}
