use crate::{mw_error::MwError, skeleton::BonePose};
use log::info;

/// Per bone bitmask of the pose fields an animation keys explicitly. Bit
/// order matches the float order inside a frame: translation x, y, z, then
/// rotation x, y, z, w, then scale x, y, z. Fields without their bit set
/// stay at the animation's stored default pose for that bone.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ChannelMask(u16);

impl ChannelMask {
    pub const TRANSLATION_X: u16 = 1 << 0;
    pub const TRANSLATION_Y: u16 = 1 << 1;
    pub const TRANSLATION_Z: u16 = 1 << 2;
    pub const ROTATION_X: u16 = 1 << 3;
    pub const ROTATION_Y: u16 = 1 << 4;
    pub const ROTATION_Z: u16 = 1 << 5;
    pub const ROTATION_W: u16 = 1 << 6;
    pub const SCALE_X: u16 = 1 << 7;
    pub const SCALE_Y: u16 = 1 << 8;
    pub const SCALE_Z: u16 = 1 << 9;
    pub const TRANSLATION: u16 =
        Self::TRANSLATION_X | Self::TRANSLATION_Y | Self::TRANSLATION_Z;
    pub const ROTATION: u16 = Self::ROTATION_X
        | Self::ROTATION_Y
        | Self::ROTATION_Z
        | Self::ROTATION_W;
    pub const SCALE: u16 = Self::SCALE_X | Self::SCALE_Y | Self::SCALE_Z;
    pub const ALL: u16 = Self::TRANSLATION | Self::ROTATION | Self::SCALE;

    #[must_use]
    pub const fn new(bits: u16) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, bits: u16) -> bool {
        self.0 & bits != 0
    }

    /// Number of floats one frame stores for a bone with this mask
    #[must_use]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }
}

/// A named animation clip, conceptually bound to the skeleton it was
/// authored against. Channel data is one flat float buffer of
/// `frame_count * channels_per_frame` values, already decompressed from
/// whatever quantized encoding the asset format used. Read only during
/// playback.
#[derive(Clone, Debug)]
pub struct Animation {
    name: String,
    frame_count: usize,
    frame_rate: f32,
    looped: bool,
    channels_per_frame: usize,
    masks: Vec<ChannelMask>,
    defaults: Vec<BonePose>,
    // Cumulative float offset of each bone within a frame
    offsets: Vec<usize>,
    data: Vec<f32>,
}

impl Animation {
    /// Creates a validated animation for a skeleton with `bone_count`
    /// bones.
    ///
    /// # Errors
    /// May return `MwError` if the mask or default counts disagree with
    /// `bone_count`, a mask has bits beyond the ten pose fields, the data
    /// length is not `frame_count` times the total channel count, there
    /// are no frames, or the frame rate is not positive.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        bone_count: usize,
        frame_count: usize,
        frame_rate: f32,
        looped: bool,
        masks: Vec<ChannelMask>,
        defaults: Vec<BonePose>,
        data: Vec<f32>,
    ) -> Result<Self, MwError> {
        if masks.len() != bone_count || defaults.len() != bone_count {
            return Err(MwError::BoneCountMismatch);
        }
        if frame_count == 0 {
            return Err(MwError::EmptyAnimation);
        }
        if frame_rate <= 0.0f32 {
            return Err(MwError::InvalidFrameRate);
        }
        let mut offsets = Vec::with_capacity(bone_count);
        let mut channels_per_frame = 0;
        for (i, mask) in masks.iter().enumerate() {
            if mask.bits() & !ChannelMask::ALL != 0 {
                return Err(MwError::MaskOverflow(i));
            }
            offsets.push(channels_per_frame);
            channels_per_frame += mask.count();
        }
        if data.len() != frame_count * channels_per_frame {
            return Err(MwError::DataLengthMismatch);
        }

        info!(
            "animation {}: {} bones, {} frames, {} channels per frame",
            name, bone_count, frame_count, channels_per_frame
        );
        Ok(Self {
            name,
            frame_count,
            frame_rate,
            looped,
            channels_per_frame,
            masks,
            defaults,
            offsets,
            data,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.masks.len()
    }

    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.frame_count
    }

    #[must_use]
    pub const fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    #[must_use]
    pub const fn looped(&self) -> bool {
        self.looped
    }

    #[must_use]
    pub const fn channels_per_frame(&self) -> usize {
        self.channels_per_frame
    }

    #[must_use]
    pub fn mask(&self, bone: usize) -> ChannelMask {
        self.masks[bone]
    }

    /// The pose a bone keeps for every field its mask leaves unkeyed
    #[must_use]
    pub fn default_pose(&self, bone: usize) -> &BonePose {
        &self.defaults[bone]
    }

    /// Floats one frame stores for one bone, in mask bit order
    pub(crate) fn bone_span(&self, frame: usize, bone: usize) -> &[f32] {
        assert!(frame < self.frame_count, "frame {frame} out of range");
        let start = frame * self.channels_per_frame + self.offsets[bone];
        &self.data[start..start + self.masks[bone].count()]
    }
}
