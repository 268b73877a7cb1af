//! The sharpness labels.

use crate::common::*;

/// The class of a generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// The image went through the degradation pipeline.
    Degraded,
    /// The image was left untouched.
    Sharp,
}

impl Label {
    pub const NUM_CLASSES: usize = 2;

    pub fn class_index(&self) -> usize {
        match self {
            Self::Degraded => 0,
            Self::Sharp => 1,
        }
    }

    /// The one-hot encoding, `[1, 0]` for degraded and `[0, 1]` for sharp images.
    pub fn one_hot(&self) -> [f32; 2] {
        let mut one_hot = [0.0; Self::NUM_CLASSES];
        one_hot[self.class_index()] = 1.0;
        one_hot
    }

    pub fn from_one_hot(one_hot: &[f32]) -> Option<Self> {
        match one_hot {
            [degraded, sharp] if *degraded == 1.0 && *sharp == 0.0 => Some(Self::Degraded),
            [degraded, sharp] if *degraded == 0.0 && *sharp == 1.0 => Some(Self::Sharp),
            _ => None,
        }
    }
}
