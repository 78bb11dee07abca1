/// A type-safe bounding box.
///
/// Wraps four `f32` coordinates, with the type parameter `T` marking which format they are in.
/// Decoded boxes use coordinates relative to the network input, where `1.0` is the full input
/// width or height.
///
/// # Conversion
///
/// Boxes can be converted between formats with the [`ConvertBbox`] trait:
///
/// ```
/// use yolo::bbox::*;
///
/// let center = Bbox::cxcywh(0.5, 0.5, 0.25, 0.5);
/// let corners: Bbox<Xyxy> = center.convert();
///
/// assert_eq!(corners.coords, [0.375, 0.25, 0.625, 0.75]);
/// ```
///
/// # Formats
///
/// - [`Xyxy`] (xmin, ymin, xmax, ymax)
/// - [`Xywh`] (xmin, ymin, width, height)
/// - [`Cxcywh`] (center_x, center_y, width, height)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox<T> {
    pub coords: [f32; 4],
    _marker: std::marker::PhantomData<T>,
}

impl<T> Bbox<T> {
    fn new(coords: [f32; 4]) -> Self {
        Bbox {
            coords,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> Bbox<T>
where
    Bbox<T>: ConvertBbox<Xyxy>,
{
    /// Compute the area of the bounding box.
    pub fn area(&self) -> f32 {
        let [x1, y1, x2, y2] = ConvertBbox::<Xyxy>::convert(self).coords;
        (x2 - x1) * (y2 - y1)
    }

    /// Compute the area of the overlap between two bounding boxes, `0.0` if they are disjoint.
    pub fn intersection<S>(&self, other: &S) -> f32
    where
        S: ConvertBbox<Xyxy>,
    {
        let [x1, y1, x2, y2] = ConvertBbox::<Xyxy>::convert(self).coords;
        let [x3, y3, x4, y4] = other.convert().coords;

        let x1 = x1.max(x3);
        let y1 = y1.max(y3);
        let x2 = x2.min(x4);
        let y2 = y2.min(y4);

        if x2 < x1 || y2 < y1 {
            0.0
        } else {
            (x2 - x1) * (y2 - y1)
        }
    }

    /// Compute the union area between two bounding boxes.
    pub fn union<S>(&self, other: &S) -> f32
    where
        S: ConvertBbox<Xyxy>,
    {
        let area1 = ConvertBbox::<Xyxy>::convert(self).area();
        let area2 = other.convert().area();
        area1 + area2 - self.intersection(other)
    }

    /// Compute the intersection over union (IoU) between two bounding boxes.
    pub fn iou<S>(&self, other: &S) -> f32
    where
        S: ConvertBbox<Xyxy>,
    {
        self.intersection(other) / self.union(other)
    }
}

impl<T> From<Bbox<T>> for [f32; 4] {
    fn from(bbox: Bbox<T>) -> Self {
        bbox.coords
    }
}

/// Trait for converting a bounding box to a different representation.
pub trait ConvertBbox<T> {
    fn convert(&self) -> Bbox<T>;
}

/// Marker type for bounding boxes with coordinates of the top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyxy;

impl Bbox<Xyxy> {
    /// Create a bounding box from the coordinates of the top-left and bottom-right corners.
    #[must_use]
    pub fn xyxy(x1: f32, y1: f32, x2: f32, y2: f32) -> Bbox<Xyxy> {
        Bbox::new([x1, y1, x2, y2])
    }

    /// Clamp the bounding box to `[0, width] x [0, height]`.
    ///
    /// Decoding never clamps, use `clamp(1.0, 1.0)` to clip a decoded box to the input image.
    #[must_use]
    pub fn clamp(&self, width: f32, height: f32) -> Bbox<Xyxy> {
        let [x1, y1, x2, y2] = self.coords;
        Bbox::new([
            x1.clamp(0.0, width),
            y1.clamp(0.0, height),
            x2.clamp(0.0, width),
            y2.clamp(0.0, height),
        ])
    }

    /// Scale the bounding box by the given width and height, e.g. from relative to pixel
    /// coordinates.
    #[must_use]
    pub fn scaled(&self, width: f32, height: f32) -> Bbox<Xyxy> {
        let [x1, y1, x2, y2] = self.coords;
        Bbox::new([x1 * width, y1 * height, x2 * width, y2 * height])
    }
}

impl ConvertBbox<Xyxy> for Bbox<Xyxy> {
    fn convert(&self) -> Bbox<Xyxy> {
        *self
    }
}

impl ConvertBbox<Xywh> for Bbox<Xyxy> {
    fn convert(&self) -> Bbox<Xywh> {
        let [x1, y1, x2, y2] = self.coords;
        Bbox::new([x1, y1, x2 - x1, y2 - y1])
    }
}

impl ConvertBbox<Cxcywh> for Bbox<Xyxy> {
    fn convert(&self) -> Bbox<Cxcywh> {
        let [x1, y1, x2, y2] = self.coords;
        Bbox::new([(x1 + x2) / 2.0, (y1 + y2) / 2.0, x2 - x1, y2 - y1])
    }
}

/// Marker type for bounding boxes with coordinates of the top-left corner and the width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xywh;

impl Bbox<Xywh> {
    /// Create a bounding box from the coordinates of the top-left corner and the width and height.
    #[must_use]
    pub fn xywh(x: f32, y: f32, w: f32, h: f32) -> Bbox<Xywh> {
        Bbox::new([x, y, w, h])
    }
}

impl ConvertBbox<Xyxy> for Bbox<Xywh> {
    fn convert(&self) -> Bbox<Xyxy> {
        let [x, y, w, h] = self.coords;
        Bbox::new([x, y, x + w, y + h])
    }
}

impl ConvertBbox<Xywh> for Bbox<Xywh> {
    fn convert(&self) -> Bbox<Xywh> {
        *self
    }
}

/// Marker type for bounding boxes with coordinates of the center and the width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cxcywh;

impl Bbox<Cxcywh> {
    /// Create a bounding box from the coordinates of the center and the width and height.
    #[must_use]
    pub fn cxcywh(cx: f32, cy: f32, w: f32, h: f32) -> Bbox<Cxcywh> {
        Bbox::new([cx, cy, w, h])
    }
}

impl ConvertBbox<Xyxy> for Bbox<Cxcywh> {
    fn convert(&self) -> Bbox<Xyxy> {
        let [cx, cy, w, h] = self.coords;
        Bbox::new([cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0])
    }
}

impl ConvertBbox<Cxcywh> for Bbox<Cxcywh> {
    fn convert(&self) -> Bbox<Cxcywh> {
        *self
    }
}
