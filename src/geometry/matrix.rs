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

use std::ops::{Index, IndexMut, Mul};

use crate::{geometry::point::Point3, numeric::scalar::Scalar};

/// Row-major 4x4 homogeneous transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4<T: Scalar>(pub [[T; 4]; 4]);

/// What a transform does to a point set, as far as a log reader cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformKind {
    Identity,
    Translation,
    Scaling,
    Rotation,
    General,
}

impl TransformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Identity => "identity",
            TransformKind::Translation => "translation",
            TransformKind::Scaling => "scaling",
            TransformKind::Rotation => "rotation",
            TransformKind::General => "general",
        }
    }
}

impl<T: Scalar> Matrix4<T> {
    #[inline]
    pub fn new(rows: [[T; 4]; 4]) -> Self {
        Matrix4(rows)
    }

    pub fn identity() -> Self {
        let mut m = [[T::zero(); 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = T::one();
        }
        Matrix4(m)
    }

    pub fn translation(t: [T; 3]) -> Self {
        let mut m = Self::identity();
        for i in 0..3 {
            m[i][3] = t[i];
        }
        m
    }

    pub fn scaling(s: [T; 3]) -> Self {
        let mut m = Self::identity();
        for i in 0..3 {
            m[i][i] = s[i];
        }
        m
    }

    /// Rotation of `angle` radians about the z axis.
    pub fn rotation_z(angle: T) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m[0][0] = c;
        m[0][1] = -s;
        m[1][0] = s;
        m[1][1] = c;
        m
    }

    /// Reads sixteen numbers in row-major order.
    pub fn from_row_major(values: &[T; 16]) -> Self {
        Matrix4(std::array::from_fn(|i| std::array::from_fn(|j| values[i * 4 + j])))
    }

    pub fn to_row_major(&self) -> [T; 16] {
        std::array::from_fn(|k| self[k / 4][k % 4])
    }

    pub fn transpose(&self) -> Self {
        Matrix4(std::array::from_fn(|i| std::array::from_fn(|j| self[j][i])))
    }

    /// Applies the transform to a point, dividing by `w` when it is not one.
    pub fn transform_point(&self, p: &Point3<T>) -> Point3<T> {
        let h = [p[0], p[1], p[2], T::one()];
        let mut out = [T::zero(); 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = (0..4).fold(T::zero(), |acc, j| acc + self[i][j] * h[j]);
        }
        let w = out[3];
        if w != T::one() && w.abs() > T::tolerance() {
            Point3::new(out[0] / w, out[1] / w, out[2] / w)
        } else {
            Point3::new(out[0], out[1], out[2])
        }
    }

    fn has_projective_row(&self) -> bool {
        let t = T::tolerance();
        (0..3).any(|j| self[3][j].abs() > t) || (self[3][3] - T::one()).abs() > t
    }

    /// Classifies the upper 3x3 block and the translation column.
    pub fn classify(&self) -> TransformKind {
        if self.has_projective_row() {
            return TransformKind::General;
        }
        let t = T::tolerance();
        let translated = (0..3).any(|i| self[i][3].abs() > t);
        let off_diagonal = (0..3).any(|i| (0..3).any(|j| i != j && self[i][j].abs() > t));
        let unit_diagonal = (0..3).all(|i| (self[i][i] - T::one()).abs() <= t);

        if !off_diagonal {
            return match (unit_diagonal, translated) {
                (true, false) => TransformKind::Identity,
                (true, true) => TransformKind::Translation,
                (false, _) => TransformKind::Scaling,
            };
        }

        // Orthonormal columns with determinant +1.
        let cols: [[T; 3]; 3] = std::array::from_fn(|j| std::array::from_fn(|i| self[i][j]));
        let dot = |a: &[T; 3], b: &[T; 3]| a[0] * b[0] + a[1] * b[1] + a[2] * b[2];
        let tol = T::from_f64_lossy(1e-9).max(t);
        let orthonormal = (0..3).all(|a| {
            (0..3).all(|b| {
                let expected = if a == b { T::one() } else { T::zero() };
                (dot(&cols[a], &cols[b]) - expected).abs() <= tol
            })
        });
        if orthonormal && self.determinant3() > T::zero() {
            TransformKind::Rotation
        } else {
            TransformKind::General
        }
    }

    fn determinant3(&self) -> T {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }
}

impl<T: Scalar> Index<usize> for Matrix4<T> {
    type Output = [T; 4];

    #[inline]
    fn index(&self, i: usize) -> &[T; 4] {
        &self.0[i]
    }
}

impl<T: Scalar> IndexMut<usize> for Matrix4<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut [T; 4] {
        &mut self.0[i]
    }
}

impl<T: Scalar> Mul for Matrix4<T> {
    type Output = Matrix4<T>;

    fn mul(self, rhs: Matrix4<T>) -> Matrix4<T> {
        Matrix4(std::array::from_fn(|i| {
            std::array::from_fn(|j| (0..4).fold(T::zero(), |acc, k| acc + self[i][k] * rhs[k][j]))
        }))
    }
}
