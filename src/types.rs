use crate::palette::BoneMatrix;

/// Trait for something that consumes a computed skin matrix palette,
/// typically the renderer's skinning pipeline
pub trait SkinSink {
    fn set_skin(&mut self, palette: &[BoneMatrix]);
}

/// Maximum bones for a skeleton. You can't actually change this constant
/// without also changing the palette array size in the skinning shader.
pub const MAX_BONES: usize = 256;
