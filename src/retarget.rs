mod modes;
mod types;

// Re-exports
pub use {
    modes::{
        absolute_matrices, direct_pose, direct_rotation, local_delta,
        pose_space, world_delta,
    },
    types::RetargetMode,
};
