use serde::Serialize;

/// Axis-aligned bounding box in model input-pixel space.
///
/// Stored in corner form (left, top, right, bottom). Boxes built through
/// [`BoundingBox::from_center`] satisfy `left <= right`, `top <= bottom` and
/// lie inside `[0, max_coord]` on both axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    /// Create a box from corner coordinates, unchecked.
    #[inline]
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a box from center form (center x, center y, width, height),
    /// clamping every edge into `[0, max_coord]`.
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32, max_coord: f32) -> Self {
        let (left, right) = clamp_span(cx - width / 2.0, cx + width / 2.0, max_coord);
        let (top, bottom) = clamp_span(cy - height / 2.0, cy + height / 2.0, max_coord);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Center point of the box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Intersection area, zero when the boxes are disjoint on either axis.
    pub fn intersection(&self, other: &BoundingBox) -> f32 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        let w = overlap(ax, self.width(), bx, other.width());
        let h = overlap(ay, self.height(), by, other.height());
        if w < 0.0 || h < 0.0 { 0.0 } else { w * h }
    }

    pub fn union(&self, other: &BoundingBox) -> f32 {
        self.area() + other.area() - self.intersection(other)
    }

    /// Calculate Intersection over Union (IoU) with another bounding box.
    ///
    /// Two degenerate (zero-area) boxes have no defined overlap and yield 0.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let union = self.union(other);
        if union > 0.0 {
            self.intersection(other) / union
        } else {
            0.0
        }
    }
}

/// Overlap length of two 1-D spans given as (center, extent).
///
/// Negative when the spans are disjoint.
#[inline]
pub fn overlap(c1: f32, w1: f32, c2: f32, w2: f32) -> f32 {
    let left = (c1 - w1 / 2.0).max(c2 - w2 / 2.0);
    let right = (c1 + w1 / 2.0).min(c2 + w2 / 2.0);
    right - left
}

fn clamp_span(a: f32, b: f32, max_coord: f32) -> (f32, f32) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (lo.clamp(0.0, max_coord), hi.clamp(0.0, max_coord))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center() {
        let b = BoundingBox::from_center(100.0, 200.0, 40.0, 60.0, 639.0);
        assert_eq!(b, BoundingBox::new(80.0, 170.0, 120.0, 230.0));
        assert_eq!(b.center(), (100.0, 200.0));
        assert_eq!(b.area(), 2400.0);
    }

    #[test]
    fn test_from_center_clamps_to_input() {
        let b = BoundingBox::from_center(5.0, 635.0, 20.0, 20.0, 639.0);
        assert_eq!(b.left, 0.0);
        assert_eq!(b.right, 15.0);
        assert_eq!(b.top, 625.0);
        assert_eq!(b.bottom, 639.0);
    }

    #[test]
    fn test_from_center_keeps_ordering_outside_frame() {
        // Entirely left of the frame, and a negative extent.
        let outside = BoundingBox::from_center(-50.0, 10.0, 10.0, 4.0, 639.0);
        assert!(outside.left <= outside.right);
        let flipped = BoundingBox::from_center(50.0, 50.0, -10.0, -4.0, 639.0);
        assert_eq!(flipped, BoundingBox::new(45.0, 48.0, 55.0, 52.0));
    }

    #[test]
    fn test_overlap() {
        assert_eq!(overlap(5.0, 10.0, 10.0, 10.0), 5.0);
        assert!(overlap(0.0, 2.0, 10.0, 2.0) < 0.0);
    }

    #[test]
    fn test_iou() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);

        // Intersection: 5x5 = 25
        // Union: 100 + 100 - 25 = 175
        let iou = a.iou(&b);
        assert!((iou - 25.0 / 175.0).abs() < 1e-6);
        assert_eq!(a.iou(&b), b.iou(&a));
    }

    #[test]
    fn test_iou_no_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_same_box() {
        let a = BoundingBox::new(3.0, 7.0, 13.0, 20.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_degenerate() {
        let a = BoundingBox::new(4.0, 4.0, 4.0, 4.0);
        assert_eq!(a.iou(&a), 0.0);
    }
}
