use itertools::iproduct;
use ndarray::{ArrayView3, Axis, s};

use crate::{
    activation::{activate_probs, sigmoid},
    anchor::AnchorSet,
    bbox::{Bbox, ConvertBbox, Xyxy},
    box_coder::BoxCoder,
    boxes::BoundingBox,
    config::DecoderConfig,
    error::{Error, Result},
};

/// Default number of anchor boxes predicted per grid cell.
pub const DEFAULT_NUM_BOXES: usize = 3;

const IDX_X: usize = 0;
const IDX_W: usize = 2;
const IDX_OBJECTNESS: usize = 4;
const IDX_CLASS_PROB: usize = 5;

/// Decodes the raw output of a single YOLO detection scale into bounding boxes.
///
/// `netout` has shape `(rows, cols, num_boxes * (4 + 1 + num_classes))`, where each anchor box
/// contributes `x, y, w, h, objectness` logits followed by its class logits. `anchors` holds the
/// `(width, height)` priors of the anchor boxes as a flat list, in pixels of the
/// `input_width x input_height` network input.
///
/// Only anchor boxes with an objectness probability above `obj_thresh` are returned, in row, column,
/// anchor box order. Box coordinates are relative to the network input and are not clipped.
pub fn decode_netout(
    netout: ArrayView3<f32>,
    anchors: &[f32],
    obj_thresh: f32,
    input_height: u32,
    input_width: u32,
    num_boxes: usize,
) -> Result<Vec<BoundingBox>> {
    let anchors = AnchorSet::new(anchors, num_boxes)?;
    decode_scale(netout, &anchors, obj_thresh, (input_width, input_height))
}

fn decode_scale(
    netout: ArrayView3<f32>,
    anchors: &AnchorSet,
    obj_thresh: f32,
    (input_width, input_height): (u32, u32),
) -> Result<Vec<BoundingBox>> {
    if obj_thresh.is_nan() {
        return Err(Error::Threshold(obj_thresh));
    }

    if input_width == 0 || input_height == 0 {
        return Err(Error::Resolution {
            width: input_width,
            height: input_height,
        });
    }

    let (rows, cols, channels) = netout.dim();
    let num_boxes = anchors.num_boxes();
    if channels % num_boxes != 0 {
        return Err(Error::ChannelCount {
            channels,
            num_boxes,
        });
    }

    let box_channels = channels / num_boxes;
    if box_channels <= IDX_CLASS_PROB {
        return Err(Error::BoxLayout {
            channels: box_channels,
        });
    }

    let netout = netout.to_shape((rows, cols, num_boxes, box_channels))?;

    let xy = netout.slice(s![.., .., .., IDX_X..IDX_W]).mapv(sigmoid);
    let wh = netout.slice(s![.., .., .., IDX_W..IDX_OBJECTNESS]);
    let (classes, objectness_prob) = activate_probs(
        netout.slice(s![.., .., .., IDX_CLASS_PROB..]),
        netout.index_axis(Axis(3), IDX_OBJECTNESS),
        obj_thresh,
    );

    let coder = BoxCoder::new((rows, cols), (input_width, input_height), anchors.clone());
    let decoded = coder.decode_grid(xy.view(), wh)?;

    let boxes = iproduct!(0..rows, 0..cols, 0..num_boxes)
        .filter_map(|(row, col, b)| {
            let objectness = objectness_prob[[row, col, b]];
            if objectness.is_nan() || objectness <= obj_thresh {
                return None;
            }

            let [cx, cy, w, h] = [0, 1, 2, 3].map(|i| decoded[[row, col, b, i]]);
            let bbox: Bbox<Xyxy> = Bbox::cxcywh(cx, cy, w, h).convert();
            let probs = classes.slice(s![row, col, b, ..]).to_vec();

            tracing::trace!(row, col, anchor = b, objectness, "candidate box");
            Some(BoundingBox::new(bbox, objectness, probs))
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        rows,
        cols,
        num_classes = box_channels - IDX_CLASS_PROB,
        num_boxes = boxes.len(),
        "decoded detection scale"
    );

    Ok(boxes)
}

/// A decoder for all detection scales of a network.
#[derive(Debug, Clone)]
pub struct Decoder {
    obj_thresh: f32,
    input: (u32, u32),
    scales: Vec<AnchorSet>,
}

impl Decoder {
    /// Create a new [`Decoder`] from a configuration, validating it.
    pub fn new(config: &DecoderConfig) -> Result<Self> {
        config.validate()?;

        Ok(Decoder {
            obj_thresh: config.obj_thresh,
            input: (config.input_width, config.input_height),
            scales: config.anchor_sets()?,
        })
    }

    #[must_use]
    pub fn num_scales(&self) -> usize {
        self.scales.len()
    }

    /// Decode the output of the detection scale with the given index.
    pub fn decode_scale(&self, index: usize, netout: ArrayView3<f32>) -> Result<Vec<BoundingBox>> {
        let anchors = self.scales.get(index).ok_or(Error::ScaleIndex {
            index,
            num_scales: self.scales.len(),
        })?;

        decode_scale(netout, anchors, self.obj_thresh, self.input)
    }

    /// Decode the outputs of all detection scales, in the order of the configured scales.
    ///
    /// The boxes of all scales are concatenated, overlapping boxes are not merged.
    pub fn decode_scales(&self, outputs: &[ArrayView3<f32>]) -> Result<Vec<BoundingBox>> {
        if outputs.len() != self.scales.len() {
            return Err(Error::ScaleCount {
                expected: self.scales.len(),
                actual: outputs.len(),
            });
        }

        let mut boxes = Vec::new();
        for (index, netout) in outputs.iter().enumerate() {
            boxes.extend(self.decode_scale(index, netout.view())?);
        }

        Ok(boxes)
    }
}
