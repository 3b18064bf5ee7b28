use crate::point::Point;
use std::collections::VecDeque;

/// Fixed-length history of recent positions, newest first.
///
/// Only used to draw a streak behind a moving entity.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<Point>,
}

impl Trail {
    /// A trail of `len` entries, all at the starting position.
    pub fn new(len: usize, at: Point) -> Self {
        Self {
            points: std::iter::repeat_n(at, len).collect(),
        }
    }

    /// Drops the oldest position and records `p` as the newest.
    pub fn push(&mut self, p: Point) {
        if self.points.is_empty() {
            return;
        }
        self.points.pop_back();
        self.points.push_front(p);
    }

    pub fn oldest(&self) -> Option<Point> {
        self.points.back().copied()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_filled_with_origin() {
        let mut trail = Trail::new(3, Point::new(1.0, 2.0));
        assert_eq!(trail.oldest(), Some(Point::new(1.0, 2.0)));
        trail.push(Point::new(5.0, 5.0));
        trail.push(Point::new(6.0, 6.0));
        assert_eq!(trail.oldest(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn push_keeps_length_and_order() {
        let mut trail = Trail::new(3, Point::new(0.0, 0.0));
        for i in 1..=4 {
            trail.push(Point::new(i as f32, 0.0));
        }
        assert_eq!(trail.oldest(), Some(Point::new(2.0, 0.0)));
        trail.push(Point::new(5.0, 0.0));
        assert_eq!(trail.oldest(), Some(Point::new(3.0, 0.0)));
    }

    #[test]
    fn zero_length_trail_stays_empty() {
        let mut trail = Trail::new(0, Point::default());
        trail.push(Point::new(5.0, 5.0));
        assert_eq!(trail.oldest(), None);
    }
}
