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

pub mod api;
pub mod basic_types;
pub mod builder;
pub mod core;
pub mod editor;
pub mod face;
pub mod half_edge;
pub mod topology;
pub mod validate;
pub mod vertex;

pub use api::HalfedgeApi;
pub use basic_types::{FacetId, HalfEdgeId, Surface, VertexId};
pub use builder::SurfaceBuilder;
pub use editor::SurfaceEditor;
pub use validate::{IntegrityReport, Violation};

/// Spreads the inherent `Surface` impl over several files.
#[macro_export]
macro_rules! impl_surface {
    ($($items:item)*) => {
        impl<T: $crate::numeric::scalar::Scalar> $crate::mesh::basic_types::Surface<T> {
            $($items)*
        }
    };
}
