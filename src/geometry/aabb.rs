// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use crate::{geometry::point::Point3, numeric::scalar::Scalar};

/// An axis-aligned bounding box in 3 dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb<T: Scalar> {
    pub min: Point3<T>,
    pub max: Point3<T>,
}

impl<T: Scalar> Aabb<T> {
    pub fn new(min: Point3<T>, max: Point3<T>) -> Self {
        Aabb { min, max }
    }

    /// Box of a single point.
    pub fn from_point(p: &Point3<T>) -> Self {
        Aabb::new(*p, *p)
    }

    /// Smallest box containing every point; `None` for an empty set.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<T>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = Aabb::from_point(first);
        for p in iter {
            bb.grow(p);
        }
        Some(bb)
    }

    /// Smallest box containing every point of a flat `[x, y, z, ...]` buffer.
    pub fn from_buffer(buffer: &[T]) -> Option<Self> {
        let pts: Vec<Point3<T>> = buffer
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Aabb::from_points(pts.iter())
    }

    pub fn grow(&mut self, p: &Point3<T>) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    pub fn union(&self, other: &Aabb<T>) -> Aabb<T> {
        let mut out = *self;
        out.grow(&other.min);
        out.grow(&other.max);
        out
    }

    pub fn contains(&self, p: &Point3<T>) -> bool {
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    /// Center coordinate along axis `i`.
    pub fn center(&self, i: usize) -> T {
        (self.min[i] + self.max[i]) * T::half()
    }

    /// Length of the diagonal.
    pub fn diagonal(&self) -> T {
        self.min.distance_to(&self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_box_spans_all_points() {
        let bb = Aabb::from_buffer(&[0.0, 0.0, 0.0, 1.0, -2.0, 3.0, 0.5, 4.0, -1.0]).unwrap();
        assert_eq!(bb.min, Point3::new(0.0, -2.0, -1.0));
        assert_eq!(bb.max, Point3::new(1.0, 4.0, 3.0));
        assert_eq!(bb.center(0), 0.5);
    }

    #[test]
    fn empty_buffer_has_no_box() {
        assert!(Aabb::<f64>::from_buffer(&[]).is_none());
    }
}
