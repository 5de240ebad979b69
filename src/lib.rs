//! Skeletal animation and retargeting core for a real-time model viewer.
//!
//! The crate takes validated skeleton and animation assets from a loader,
//! decodes sparse per-bone channel data into local poses, optionally
//! retargets a pose authored for one skeleton onto a differently shaped
//! skeleton matched by bone name, and composes the matrix chain down to the
//! skin matrix palette consumed by a renderer. Windowing, GPU resources and
//! file format parsing are left to the application.

pub mod animation;
pub mod mw_error;
pub mod palette;
pub mod retarget;
pub mod settings;
pub mod skeleton;
pub mod transform;
pub mod types;
