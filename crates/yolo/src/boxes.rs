use std::sync::OnceLock;

use crate::bbox::{Bbox, Xyxy};

/// A decoded detection candidate.
///
/// Coordinates are relative to the network input, and are not clipped to `[0, 1]`.
///
/// The most likely class and its probability are computed on first access and cached for the
/// lifetime of the box.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    bbox: Bbox<Xyxy>,
    objectness: f32,
    classes: Vec<f32>,
    label: OnceLock<usize>,
    score: OnceLock<f32>,
}

impl BoundingBox {
    /// Create a new [`BoundingBox`] from its corners, objectness probability and conditional
    /// class probabilities.
    ///
    /// # Panics
    ///
    /// Panics if `classes` is empty.
    #[must_use]
    pub fn new(bbox: Bbox<Xyxy>, objectness: f32, classes: Vec<f32>) -> Self {
        assert!(!classes.is_empty(), "a bounding box needs at least one class");

        BoundingBox {
            bbox,
            objectness,
            classes,
            label: OnceLock::new(),
            score: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn bbox(&self) -> Bbox<Xyxy> {
        self.bbox
    }

    #[must_use]
    pub fn xmin(&self) -> f32 {
        self.bbox.coords[0]
    }

    #[must_use]
    pub fn ymin(&self) -> f32 {
        self.bbox.coords[1]
    }

    #[must_use]
    pub fn xmax(&self) -> f32 {
        self.bbox.coords[2]
    }

    #[must_use]
    pub fn ymax(&self) -> f32 {
        self.bbox.coords[3]
    }

    /// The probability that this box contains an object, regardless of its class.
    #[must_use]
    pub fn objectness(&self) -> f32 {
        self.objectness
    }

    /// The probability of each class being present, conditioned on the objectness.
    #[must_use]
    pub fn classes(&self) -> &[f32] {
        &self.classes
    }

    /// The index of the most likely class.
    ///
    /// Ties resolve to the lowest index.
    #[must_use]
    pub fn label(&self) -> usize {
        *self.label.get_or_init(|| argmax(&self.classes))
    }

    /// The probability of the most likely class.
    #[must_use]
    pub fn score(&self) -> f32 {
        *self.score.get_or_init(|| self.classes[self.label()])
    }
}

/// Returns the index of the first maximum element in a slice.
///
/// # Panics
///
/// If the input slice is empty this function will panic.
#[inline]
#[must_use]
pub fn argmax(v: &[f32]) -> usize {
    let mut max_index = 0;
    let mut max_value = v[0];

    for (i, &value) in v.iter().enumerate().skip(1) {
        if value > max_value {
            max_index = i;
            max_value = value;
        }
    }

    max_index
}
