use ndarray::{Array4, ArrayView4, Axis, arr1, concatenate};

use crate::{anchor::AnchorSet, error::Result, meshgrid::cell_grid};

/// Decodes the geometry channels of a single detection scale.
///
/// Box centers are offsets from the top-left corner of their grid cell, box sizes are log-space
/// scales of the anchor priors. Decoded values are relative to the network input size.
#[derive(Debug, Clone)]
pub struct BoxCoder {
    /// The number of `(rows, cols)` grid cells of the detection scale.
    pub grid: (usize, usize),
    /// The `(width, height)` of the network input, in pixels.
    pub input: (u32, u32),
    pub anchors: AnchorSet,
}

impl BoxCoder {
    /// Create a new [`BoxCoder`] for a grid of `(rows, cols)` cells.
    #[must_use]
    pub fn new(grid: (usize, usize), input: (u32, u32), anchors: AnchorSet) -> Self {
        BoxCoder {
            grid,
            input,
            anchors,
        }
    }

    /// Decode the offsets of every anchor box in the grid.
    ///
    /// `xy` holds the center offsets, which should already be passed through a sigmoid, and
    /// `wh` the raw size logits. Both have shape `(rows, cols, num_boxes, 2)`.
    ///
    /// Returns `(rows, cols, num_boxes, 4)` boxes in center, width, height format:
    ///
    /// ```text
    /// cx = (col + x) / cols
    /// cy = (row + y) / rows
    /// w  = anchor_w * exp(w) / input_width
    /// h  = anchor_h * exp(h) / input_height
    /// ```
    ///
    /// The exponent is not clamped, extreme size logits decode to infinite sizes.
    pub fn decode_grid(&self, xy: ArrayView4<f32>, wh: ArrayView4<f32>) -> Result<Array4<f32>> {
        let (rows, cols) = self.grid;
        let (input_width, input_height) = self.input;

        let cells = cell_grid(self.grid)?;
        let grid_size = arr1(&[cols as f32, rows as f32]);
        let input_size = arr1(&[input_width as f32, input_height as f32]);

        // cell offsets are shared by all anchor boxes of a cell
        let centers = (&xy + &cells.view().insert_axis(Axis(2))) / &grid_size;
        // anchor priors are shared by all cells
        let sizes = wh.mapv(f32::exp) * &self.anchors.priors() / &input_size;

        let decoded = concatenate(Axis(3), &[centers.view(), sizes.view()])?;

        Ok(decoded)
    }
}
