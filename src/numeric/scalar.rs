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

use std::fmt::Debug;

use num_traits::{Float, FromPrimitive};

/// Coordinate type stored in a [`crate::mesh::Surface`].
///
/// Positions cross the buffer boundary as plain floats, so any
/// `num_traits::Float` that converts from `f64` qualifies.
pub trait Scalar: Float + FromPrimitive + Debug + Default + Send + Sync + 'static {
    fn from_num_den(num: i32, den: i32) -> Self {
        Self::from_i32(num).unwrap_or_else(Self::zero) / Self::from_i32(den).unwrap_or_else(Self::one)
    }

    fn half() -> Self {
        Self::one() / (Self::one() + Self::one())
    }

    /// Lengths below this are treated as zero.
    fn tolerance() -> Self;

    fn from_f64_lossy(v: f64) -> Self {
        Self::from_f64(v).unwrap_or_else(Self::nan)
    }

    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl Scalar for f64 {
    fn tolerance() -> Self {
        1e-12
    }

    fn half() -> Self {
        0.5
    }

    fn from_f64_lossy(v: f64) -> Self {
        v
    }

    fn to_f64_lossy(self) -> f64 {
        self
    }
}

impl Scalar for f32 {
    fn tolerance() -> Self {
        1e-6
    }

    fn half() -> Self {
        0.5
    }
}
