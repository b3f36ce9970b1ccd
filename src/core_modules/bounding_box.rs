// THEORY:
// The `bounding_box` module is the reduction stage of the pipeline. It scans
// a gradient-magnitude map against a single global threshold and collapses
// every surviving pixel into the smallest axis-aligned rectangle that
// contains them all.
//
// Key architectural principles:
// 1.  **Strict threshold**: a pixel participates only when its magnitude is
//     strictly greater than the threshold. A pixel exactly at the threshold
//     is excluded.
// 2.  **Running extents**: the scan keeps four running values
//     (min_x, min_y, max_x, max_y) seeded at (width, height, 0, 0) and
//     widens them per qualifying pixel, exactly like the blob aggregation
//     pass that sweeps chunk coordinates into a box.
// 3.  **Two contracts for the empty case**: when no pixel qualifies, the
//     seeds survive untouched and describe an inverted rectangle
//     (min_x = width, max_x = 0, ...). That inverted box is indistinguishable
//     from a structurally valid result, so the primary API reports the empty
//     case as `None`; `find_bounding_box_raw` keeps the historical inverted
//     rectangle for callers that need the literal behavior. Both share one
//     scan.

/// A 2D pixel coordinate in image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// An axis-aligned rectangle described by its four corner points.
///
/// The corners always agree pairwise: `top_left.x == bottom_left.x`,
/// `top_right.x == bottom_right.x`, `top_left.y == top_right.y`, and
/// `bottom_left.y == bottom_right.y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl BoundingBox {
    fn from_extents(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            top_left: Point { x: min_x, y: min_y },
            top_right: Point { x: max_x, y: min_y },
            bottom_right: Point { x: max_x, y: max_y },
            bottom_left: Point { x: min_x, y: max_y },
        }
    }

    /// The corners in stroke order: top_left, top_right, bottom_right,
    /// bottom_left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// True when the extents never converged, i.e. no pixel qualified and
    /// the box still carries its inverted seed values.
    pub fn is_inverted(&self) -> bool {
        self.top_left.x > self.top_right.x || self.top_left.y > self.bottom_left.y
    }
}

/// Scans a row-major magnitude map and returns the box enclosing every pixel
/// whose magnitude strictly exceeds `threshold`, or `None` when no pixel
/// qualifies.
pub fn find_bounding_box(
    magnitude: &[f64],
    width: u32,
    height: u32,
    threshold: f64,
) -> Option<BoundingBox> {
    let bounding_box = find_bounding_box_raw(magnitude, width, height, threshold);
    if bounding_box.is_inverted() {
        None
    } else {
        Some(bounding_box)
    }
}

/// Compatibility form of [`find_bounding_box`].
///
/// Reproduces the historical contract literally: when no pixel exceeds the
/// threshold the returned box is the untouched seed rectangle
/// `min_x = width, min_y = height, max_x = 0, max_y = 0`, inverted and
/// degenerate, not an explicit "no detection" signal.
pub fn find_bounding_box_raw(
    magnitude: &[f64],
    width: u32,
    height: u32,
    threshold: f64,
) -> BoundingBox {
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for (index, &value) in magnitude.iter().enumerate() {
        if value > threshold {
            let x = (index % width as usize) as u32;
            let y = (index / width as usize) as u32;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    BoundingBox::from_extents(min_x, min_y, max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_hot_pixel_collapses_all_corners() {
        let width = 9u32;
        let height = 7u32;
        let mut magnitude = vec![0.0; (width * height) as usize];
        magnitude[(3 * width + 5) as usize] = 150.0;

        let bounding_box = find_bounding_box(&magnitude, width, height, 100.0).unwrap();

        let expected = Point { x: 5, y: 3 };
        assert_eq!(bounding_box.corners(), [expected; 4]);
    }

    #[test]
    fn all_quiet_map_yields_the_inverted_seed_rectangle() {
        let magnitude = vec![0.0; 100];

        let raw = find_bounding_box_raw(&magnitude, 10, 10, 100.0);

        assert_eq!(raw.top_left, Point { x: 10, y: 10 });
        assert_eq!(raw.bottom_right, Point { x: 0, y: 0 });
        assert!(raw.is_inverted());
        assert_eq!(find_bounding_box(&magnitude, 10, 10, 100.0), None);
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let mut magnitude = vec![0.0; 25];
        magnitude[12] = 100.0;

        assert_eq!(find_bounding_box(&magnitude, 5, 5, 100.0), None);

        magnitude[12] = 100.0 + f64::EPSILON * 100.0;
        assert!(find_bounding_box(&magnitude, 5, 5, 100.0).is_some());
    }

    #[test]
    fn box_spans_scattered_hot_pixels() {
        let width = 12u32;
        let height = 8u32;
        let mut magnitude = vec![0.0; (width * height) as usize];
        magnitude[(2 * width + 3) as usize] = 200.0;
        magnitude[(6 * width + 9) as usize] = 300.0;
        magnitude[(4 * width + 1) as usize] = 101.0;

        let bounding_box = find_bounding_box(&magnitude, width, height, 100.0).unwrap();

        assert_eq!(bounding_box.top_left, Point { x: 1, y: 2 });
        assert_eq!(bounding_box.top_right, Point { x: 9, y: 2 });
        assert_eq!(bounding_box.bottom_right, Point { x: 9, y: 6 });
        assert_eq!(bounding_box.bottom_left, Point { x: 1, y: 6 });
    }
}
