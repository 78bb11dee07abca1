//! Elementwise activations applied to the raw detection head output.

use ndarray::{Array3, Array4, ArrayView3, ArrayView4, Axis};

/// Computes the sigmoid score of the provided logit.
///
/// Branches on the sign of the logit, so `exp` is only ever evaluated on non-positive values and
/// large magnitudes saturate to `0.0` or `1.0` instead of overflowing.
#[inline]
#[must_use]
pub fn sigmoid(logit: f32) -> f32 {
    if logit >= 0.0 {
        1.0 / (1.0 + (-logit).exp())
    } else {
        let e = logit.exp();
        e / (1.0 + e)
    }
}

/// Turns class and objectness logits into probabilities.
///
/// `classes` has shape `(rows, cols, num_boxes, num_classes)` and `objectness` has shape
/// `(rows, cols, num_boxes)`. Returns the conditional class probabilities
/// `sigmoid(class) * sigmoid(objectness)`, with the same shape as `classes`, and the objectness
/// probabilities, with the same shape as `objectness`.
///
/// Class probabilities of every anchor box whose objectness probability is not above
/// `obj_thresh` are multiplied by zero.
#[must_use]
pub fn activate_probs(
    classes: ArrayView4<f32>,
    objectness: ArrayView3<f32>,
    obj_thresh: f32,
) -> (Array4<f32>, Array3<f32>) {
    let objectness = objectness.mapv(sigmoid);
    let broadcast = objectness.view().insert_axis(Axis(3));

    let mut conditional = classes.mapv(sigmoid);
    conditional *= &broadcast;
    conditional *= &broadcast.mapv(|p| if p > obj_thresh { 1.0 } else { 0.0 });

    (conditional, objectness)
}
