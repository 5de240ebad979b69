use std::{error, fmt};

/// Unified error type
///
/// Everything here is a load time failure: skeletons and animations are
/// validated once when an asset is constructed and the per frame animation
/// path assumes validated input. Per frame contract violations (out of range
/// frame or bone indices) panic instead of returning an error.
#[derive(Debug)]
pub enum MwError {
    EmptySkeleton,
    TooManyBones(usize),
    ParentOutOfOrder(usize),
    DuplicateBoneName(String),
    BoneCountMismatch,
    EmptyAnimation,
    MaskOverflow(usize),
    DataLengthMismatch,
    InvalidFrameRate,
    SerdeYamlError(Box<serde_yaml::Error>),
    StdIoError(std::io::Error),
}

impl error::Error for MwError {}

impl fmt::Display for MwError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::EmptySkeleton => write!(f, "skeleton has no bones"),
            Self::TooManyBones(a) => {
                write!(f, "skeleton has {a} bones which is more than MAX_BONES")
            }
            Self::ParentOutOfOrder(a) => {
                write!(f, "bone {a} has a parent with an equal or later index")
            }
            Self::DuplicateBoneName(a) => {
                write!(f, "bone name \"{a}\" is not unique")
            }
            Self::BoneCountMismatch => {
                write!(f, "there is a mismatch in the count of bones")
            }
            Self::EmptyAnimation => write!(f, "animation has no frames"),
            Self::MaskOverflow(a) => {
                write!(f, "bone {a} has channel mask bits beyond the ten pose fields")
            }
            Self::DataLengthMismatch => {
                write!(f, "animation data length does not match frames x channels")
            }
            Self::InvalidFrameRate => {
                write!(f, "animation frame rate must be positive")
            }
            Self::SerdeYamlError(e) => {
                write!(f, "serde_yaml::Error: {e}")
            }
            Self::StdIoError(e) => write!(f, "std::io::Error: {}", e.kind()),
        }
    }
}

impl From<serde_yaml::Error> for MwError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::SerdeYamlError(Box::new(e))
    }
}

impl From<std::io::Error> for MwError {
    fn from(e: std::io::Error) -> Self {
        Self::StdIoError(e)
    }
}
