use crate::world::hex::HexPoint;
use rayon::prelude::*;
use std::ops::{Index, IndexMut};

/// A fixed-size rectangle of values, one per hex. Storage is a flat `Vec` in
/// row-major order (`index = y * width + x`). The grid is allocated once and
/// can never grow or shrink; values can only be mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: u16,
    height: u16,
    values: Vec<T>,
}

impl<T> Grid<T> {
    /// Create a new grid, initializing every position with the given
    /// function. Positions are visited in row-major order.
    pub fn new(
        width: u16,
        height: u16,
        mut init: impl FnMut(HexPoint) -> T,
    ) -> Self {
        let mut values =
            Vec::with_capacity(usize::from(width) * usize::from(height));
        for y in 0..height {
            for x in 0..width {
                values.push(init(HexPoint::new(x, y)));
            }
        }
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total number of positions in the grid
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Is the given point inside this grid?
    pub fn contains(&self, point: HexPoint) -> bool {
        point.x < self.width && point.y < self.height
    }

    fn index_of(&self, point: HexPoint) -> Option<usize> {
        if self.contains(point) {
            Some(
                usize::from(point.y) * usize::from(self.width)
                    + usize::from(point.x),
            )
        } else {
            None
        }
    }

    /// Convert a flat index back into a position
    pub fn point_at(&self, index: usize) -> HexPoint {
        let width = usize::from(self.width);
        HexPoint::new((index % width) as u16, (index / width) as u16)
    }

    pub fn get(&self, point: HexPoint) -> Option<&T> {
        self.index_of(point).map(|i| &self.values[i])
    }

    pub fn get_mut(&mut self, point: HexPoint) -> Option<&mut T> {
        match self.index_of(point) {
            Some(i) => Some(&mut self.values[i]),
            None => None,
        }
    }

    /// Get every in-bounds neighbor of the given point, in
    /// [HexDirection](crate::HexDirection) order. Cells on the edge of the map
    /// will have fewer than six neighbors.
    pub fn neighbors(
        &self,
        point: HexPoint,
    ) -> impl Iterator<Item = HexPoint> + '_ {
        point.adjacents().filter(move |p| self.contains(*p))
    }

    /// Iterate over every position in row-major order
    pub fn points(&self) -> impl Iterator<Item = HexPoint> + '_ {
        (0..self.values.len()).map(move |i| self.point_at(i))
    }

    /// Iterate over every value in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    /// Iterate over every value in row-major order, along with its position
    pub fn iter_points(&self) -> impl Iterator<Item = (HexPoint, &T)> {
        self.points().zip(self.values.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.values.iter_mut()
    }

    /// Convert every value in the grid, keeping positions intact. Fails on
    /// the first error.
    pub fn try_map<U>(
        self,
        f: impl FnMut(T) -> anyhow::Result<U>,
    ) -> anyhow::Result<Grid<U>> {
        Ok(Grid {
            width: self.width,
            height: self.height,
            values: self
                .values
                .into_iter()
                .map(f)
                .collect::<anyhow::Result<_>>()?,
        })
    }
}

impl<T: Send + Sync> Grid<T> {
    /// Parallel iterator over every value
    pub fn par_iter(&self) -> impl IndexedParallelIterator<Item = &T> {
        self.values.par_iter()
    }

    /// Parallel mutable iterator over every value. Order matches
    /// [Self::points], so this can be zipped with a same-sized buffer.
    pub fn par_iter_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = &mut T> {
        self.values.par_iter_mut()
    }
}

impl<T> Index<HexPoint> for Grid<T> {
    type Output = T;

    fn index(&self, point: HexPoint) -> &T {
        match self.get(point) {
            Some(value) => value,
            None => panic!(
                "point {} out of bounds for {}x{} grid",
                point, self.width, self.height
            ),
        }
    }
}

impl<T> IndexMut<HexPoint> for Grid<T> {
    fn index_mut(&mut self, point: HexPoint) -> &mut T {
        let (width, height) = (self.width, self.height);
        match self.get_mut(point) {
            Some(value) => value,
            None => panic!(
                "point {} out of bounds for {}x{} grid",
                point, width, height
            ),
        }
    }
}
