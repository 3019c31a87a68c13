//! The fixed-point grid distance used for both heuristic and step costs.

use wayfind_core::Point;

/// Cost of one orthogonal step.
pub const ORTHOGONAL_COST: i32 = 10;
/// Cost of one diagonal step (√2 ≈ 1.4, scaled by 10).
pub const DIAGONAL_COST: i32 = 14;

/// Octile distance between two cells under the 14/10 cost constants.
///
/// Serves double duty: the admissible heuristic to the target and the exact
/// step cost to an adjacent cell (where it degenerates to 10 or 14).
#[inline]
pub fn octile(a: Point, b: Point) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    if dx < dy {
        DIAGONAL_COST * dx + ORTHOGONAL_COST * (dy - dx)
    } else {
        DIAGONAL_COST * dy + ORTHOGONAL_COST * (dx - dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthogonal_line() {
        assert_eq!(octile(Point::new(0, 0), Point::new(3, 0)), 30);
        assert_eq!(octile(Point::new(0, 0), Point::new(0, 5)), 50);
    }

    #[test]
    fn pure_diagonal() {
        assert_eq!(octile(Point::new(0, 0), Point::new(3, 3)), 42);
    }

    #[test]
    fn mixed_path() {
        // One diagonal + one orthogonal step.
        assert_eq!(octile(Point::new(0, 0), Point::new(1, 2)), 24);
        assert_eq!(octile(Point::new(0, 0), Point::new(4, 1)), 44);
    }

    #[test]
    fn adjacent_step_costs() {
        let p = Point::new(5, 5);
        assert_eq!(octile(p, p.shift(1, 0)), ORTHOGONAL_COST);
        assert_eq!(octile(p, p.shift(1, 1)), DIAGONAL_COST);
    }

    #[test]
    fn symmetric() {
        let a = Point::new(2, 7);
        let b = Point::new(9, 1);
        assert_eq!(octile(a, b), octile(b, a));
        assert_eq!(octile(a, a), 0);
    }
}
