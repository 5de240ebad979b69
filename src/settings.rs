use crate::{mw_error::MwError, retarget::RetargetMode};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Viewer side playback options, loaded from a YAML file or created
/// manually. `retarget_mode` is kept as the bare integer a config file or
/// script binding provides; it is clamped into range when converted to a
/// `RetargetMode`.
#[derive(Serialize, Deserialize, PartialEq, Debug)]
pub struct ViewerOptions {
    pub animation: usize,
    pub retarget_mode: i32,
    pub speed: f32,
    pub loop_override: Option<bool>,
    pub frame_rate_override: Option<f32>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            animation: 0,
            retarget_mode: 0,
            speed: 1.0f32,
            loop_override: None,
            frame_rate_override: None,
        }
    }
}

impl ViewerOptions {
    /// Loads options from a YAML file
    ///
    /// # Errors
    /// May return `MwError`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MwError> {
        let file = fs::File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    /// The selected retarget strategy, clamped into range
    #[must_use]
    pub const fn mode(&self) -> RetargetMode {
        RetargetMode::from_index(self.retarget_mode)
    }
}
