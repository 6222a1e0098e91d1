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

use std::ops::{Add, Index, IndexMut, Mul, Sub};

use crate::numeric::scalar::Scalar;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3<T: Scalar> {
    pub coords: [T; 3],
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3<T: Scalar> {
    pub coords: [T; 3],
}

impl<T: Scalar> Point3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { coords: [x, y, z] }
    }

    pub fn origin() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Reads the point stored at `index` in a flat `[x, y, z, x, y, z, ...]` buffer.
    pub fn from_slice(buffer: &[T], index: usize) -> Option<Self> {
        let base = index.checked_mul(3)?;
        let chunk = buffer.get(base..base + 3)?;
        Some(Self::new(chunk[0], chunk[1], chunk[2]))
    }

    pub fn x(&self) -> T {
        self.coords[0]
    }

    pub fn y(&self) -> T {
        self.coords[1]
    }

    pub fn z(&self) -> T {
        self.coords[2]
    }

    pub fn vector_to(&self, other: &Self) -> Vector3<T> {
        *other - *self
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        let h = T::half();
        Self::new(
            (self[0] + other[0]) * h,
            (self[1] + other[1]) * h,
            (self[2] + other[2]) * h,
        )
    }

    pub fn distance_to(&self, other: &Self) -> T {
        self.vector_to(other).norm()
    }

    pub fn add_vector(&self, v: &Vector3<T>) -> Self {
        Self::new(self[0] + v[0], self[1] + v[1], self[2] + v[2])
    }

    /// Arithmetic mean of a non-empty set of points; `None` if empty.
    pub fn centroid<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<T>>,
    {
        let mut sum = [T::zero(); 3];
        let mut n = 0usize;
        for p in points {
            for i in 0..3 {
                sum[i] = sum[i] + p[i];
            }
            n += 1;
        }
        if n == 0 {
            return None;
        }
        let n = T::from_usize(n)?;
        Some(Self::new(sum[0] / n, sum[1] / n, sum[2] / n))
    }
}

impl<T: Scalar> Vector3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { coords: [x, y, z] }
    }

    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    pub fn dot(&self, other: &Self) -> T {
        self[0] * other[0] + self[1] * other[1] + self[2] * other[2]
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self[1] * other[2] - self[2] * other[1],
            self[2] * other[0] - self[0] * other[2],
            self[0] * other[1] - self[1] * other[0],
        )
    }

    pub fn norm2(&self) -> T {
        self.dot(self)
    }

    pub fn norm(&self) -> T {
        self.norm2().sqrt()
    }

    pub fn scale(&self, s: T) -> Self {
        Self::new(self[0] * s, self[1] * s, self[2] * s)
    }
}

impl<T: Scalar> Index<usize> for Point3<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.coords[i]
    }
}

impl<T: Scalar> IndexMut<usize> for Point3<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.coords[i]
    }
}

impl<T: Scalar> Index<usize> for Vector3<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.coords[i]
    }
}

impl<T: Scalar> Sub for Point3<T> {
    type Output = Vector3<T>;

    fn sub(self, rhs: Self) -> Vector3<T> {
        Vector3::new(self[0] - rhs[0], self[1] - rhs[1], self[2] - rhs[2])
    }
}

impl<T: Scalar> Add for Vector3<T> {
    type Output = Vector3<T>;

    fn add(self, rhs: Self) -> Vector3<T> {
        Vector3::new(self[0] + rhs[0], self[1] + rhs[1], self[2] + rhs[2])
    }
}

impl<T: Scalar> Mul<T> for Vector3<T> {
    type Output = Vector3<T>;

    fn mul(self, rhs: T) -> Vector3<T> {
        self.scale(rhs)
    }
}

impl<T: Scalar> From<[T; 3]> for Point3<T> {
    fn from(coords: [T; 3]) -> Self {
        Self { coords }
    }
}

impl<T: Scalar> From<Point3<T>> for [T; 3] {
    fn from(p: Point3<T>) -> Self {
        p.coords
    }
}

/// Area of the triangle `(a, b, c)`.
pub fn triangle_area<T: Scalar>(a: &Point3<T>, b: &Point3<T>, c: &Point3<T>) -> T {
    a.vector_to(b).cross(&a.vector_to(c)).norm() * T::half()
}
