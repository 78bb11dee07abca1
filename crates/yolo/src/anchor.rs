use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};

/// Anchors of the coarsest YOLOv3 scale (13x13 cells for a 416x416 input).
pub const YOLOV3_LARGE: [f32; 6] = [116.0, 90.0, 156.0, 198.0, 373.0, 326.0];
/// Anchors of the intermediate YOLOv3 scale (26x26 cells for a 416x416 input).
pub const YOLOV3_MEDIUM: [f32; 6] = [30.0, 61.0, 62.0, 45.0, 59.0, 119.0];
/// Anchors of the finest YOLOv3 scale (52x52 cells for a 416x416 input).
pub const YOLOV3_SMALL: [f32; 6] = [10.0, 13.0, 16.0, 30.0, 33.0, 23.0];

/// The anchor box priors of a single detection scale.
///
/// Stored as a `(num_boxes, 2)` array of `(width, height)` pairs, in input image pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorSet {
    priors: Array2<f32>,
}

impl AnchorSet {
    /// Create an [`AnchorSet`] from a flat `[w0, h0, w1, h1, ..]` sequence for `num_boxes`
    /// anchor boxes.
    pub fn new(anchors: &[f32], num_boxes: usize) -> Result<Self> {
        if num_boxes == 0 {
            return Err(Error::NoAnchorBoxes);
        }

        if anchors.len() != 2 * num_boxes {
            return Err(Error::AnchorCount {
                expected: 2 * num_boxes,
                actual: anchors.len(),
            });
        }

        let priors = Array2::from_shape_vec((num_boxes, 2), anchors.to_vec())?;
        Ok(Self { priors })
    }

    /// The number of anchor boxes per grid cell.
    #[must_use]
    pub fn num_boxes(&self) -> usize {
        self.priors.nrows()
    }

    /// The `(width, height)` prior of anchor box `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn prior(&self, index: usize) -> (f32, f32) {
        (self.priors[[index, 0]], self.priors[[index, 1]])
    }

    /// All priors, as a `(num_boxes, 2)` view.
    #[must_use]
    pub fn priors(&self) -> ArrayView2<f32> {
        self.priors.view()
    }
}
