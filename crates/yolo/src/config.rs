//! Configuration of a multi-scale [`Decoder`](crate::Decoder).

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    anchor::{AnchorSet, YOLOV3_LARGE, YOLOV3_MEDIUM, YOLOV3_SMALL},
    decode::DEFAULT_NUM_BOXES,
    error::{Error, Result},
};

/// A configuration that lives in its own file.
pub trait Config {
    /// The default file name of the configuration.
    const PATH: &'static str;
}

/// The anchor priors of a single detection scale.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScaleConfig {
    /// Flat `[w0, h0, w1, h1, ..]` priors, in input pixels.
    pub anchors: Vec<f32>,
}

/// Configuration of the detection head outputs of a network.
///
/// ```toml
/// obj_thresh = 0.5
/// input_width = 416
/// input_height = 416
/// num_anchor_boxes = 3
///
/// [[scales]]
/// anchors = [116.0, 90.0, 156.0, 198.0, 373.0, 326.0]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DecoderConfig {
    /// Minimum objectness probability for a box to be emitted (exclusive).
    pub obj_thresh: f32,
    pub input_width: u32,
    pub input_height: u32,
    /// Number of anchor boxes per grid cell, shared by all scales.
    pub num_anchor_boxes: usize,
    /// One entry per detection head, in the order the network outputs them.
    pub scales: Vec<ScaleConfig>,
}

impl Config for DecoderConfig {
    const PATH: &'static str = "yolo_decoder.toml";
}

impl Default for DecoderConfig {
    /// YOLOv3 with a 416x416 input, trained on COCO.
    fn default() -> Self {
        DecoderConfig {
            obj_thresh: 0.5,
            input_width: 416,
            input_height: 416,
            num_anchor_boxes: DEFAULT_NUM_BOXES,
            scales: [YOLOV3_LARGE, YOLOV3_MEDIUM, YOLOV3_SMALL]
                .into_iter()
                .map(|anchors| ScaleConfig {
                    anchors: anchors.to_vec(),
                })
                .collect(),
        }
    }
}

impl DecoderConfig {
    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: DecoderConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading decoder config");

        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// Check that the configuration describes a decodable network.
    pub fn validate(&self) -> Result<()> {
        if self.obj_thresh.is_nan() {
            return Err(Error::Threshold(self.obj_thresh));
        }

        if self.input_width == 0 || self.input_height == 0 {
            return Err(Error::Resolution {
                width: self.input_width,
                height: self.input_height,
            });
        }

        self.anchor_sets().map(|_| ())
    }

    /// The validated anchor priors of every scale.
    pub fn anchor_sets(&self) -> Result<Vec<AnchorSet>> {
        self.scales
            .iter()
            .map(|scale| AnchorSet::new(&scale.anchors, self.num_anchor_boxes))
            .collect()
    }
}
