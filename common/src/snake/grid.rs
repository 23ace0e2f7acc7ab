use std::collections::HashSet;

use crate::SessionRng;
use super::types::{FieldSize, Point};

impl FieldSize {
    pub fn in_bounds(&self, cell: Point) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height
    }

    /// Row-major: y outer, x inner.
    pub fn list_free_cells(&self, occupied: &HashSet<Point>) -> Vec<Point> {
        let mut free = Vec::with_capacity(self.area().saturating_sub(occupied.len()));
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let cell = Point::new(x, y);
                if !occupied.contains(&cell) {
                    free.push(cell);
                }
            }
        }
        free
    }

    /// `None` means the board is full.
    pub fn sample_free(&self, occupied: &HashSet<Point>, rng: &mut SessionRng) -> Option<Point> {
        let free = self.list_free_cells(occupied);
        rng.pick_index(free.len()).map(|idx| free[idx])
    }

    pub fn neighbours(&self, cell: Point) -> impl Iterator<Item = Point> + '_ {
        super::types::Direction::ALL
            .into_iter()
            .map(move |d| cell.moved(d))
            .filter(|p| self.in_bounds(*p))
    }
}
