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

use log::debug;

use crate::{
    error::{EditError, EditResult, Refusal, SurfaceResult},
    mesh::{
        basic_types::{FacetId, HalfEdgeId, Surface, VertexId},
        editor::SurfaceEditor,
    },
};

type Notifier = Box<dyn FnMut(&str)>;

/// Id-addressed editing of one surface built from flat buffers.
///
/// Every operation resolves vertex and facet ids against the current
/// numbering, runs inside its own edit session and reindexes on return, so
/// ids seen by the caller always match [`HalfedgeApi::positions`] and
/// [`HalfedgeApi::indices`].
///
/// ```
/// use meshedit::mesh::HalfedgeApi;
///
/// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
/// let mut api = HalfedgeApi::from_buffers(&positions, &[0, 1, 2, 0, 2, 3]).unwrap();
/// api.erase_triangle(0).unwrap();
/// assert_eq!(api.indices().unwrap(), vec![0, 1, 2]);
/// ```
pub struct HalfedgeApi {
    surface: Surface<f64>,
    notifiers: Vec<Notifier>,
}

impl std::fmt::Debug for HalfedgeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HalfedgeApi")
            .field("surface", &self.surface)
            .field("notifiers", &self.notifiers.len())
            .finish()
    }
}

impl HalfedgeApi {
    pub fn from_buffers(positions: &[f64], indices: &[usize]) -> SurfaceResult<Self> {
        Ok(Self::new(Surface::create(positions, indices)?))
    }

    pub fn new(surface: Surface<f64>) -> Self {
        Self {
            surface,
            notifiers: Vec::new(),
        }
    }

    pub fn surface(&self) -> &Surface<f64> {
        &self.surface
    }

    pub fn into_surface(self) -> Surface<f64> {
        self.surface
    }

    /// Registers a callback receiving the name of every successful edit.
    pub fn add_notifier<F: FnMut(&str) + 'static>(&mut self, f: F) {
        self.notifiers.push(Box::new(f));
    }

    fn notify(&mut self, what: &str) {
        for n in self.notifiers.iter_mut() {
            n(what);
        }
    }

    fn edit<R>(
        &mut self,
        what: &'static str,
        op: impl FnOnce(&mut SurfaceEditor<'_, f64>) -> EditResult<R>,
    ) -> EditResult<R> {
        let mut editor = SurfaceEditor::new(&mut self.surface);
        editor.begin_modif();
        let result = op(&mut editor);
        editor.end_modif();
        if result.is_ok() {
            debug!("halfedge api: {}", what);
            self.notify(what);
        }
        result
    }

    pub fn vertex(&self, id: usize) -> EditResult<VertexId> {
        self.surface
            .vertex_by_id(id)
            .ok_or(EditError::VertexOutOfRange {
                id,
                count: self.surface.nb_vertices(),
            })
    }

    pub fn facet(&self, id: usize) -> EditResult<FacetId> {
        self.surface
            .facet_by_id(id)
            .ok_or(EditError::FacetOutOfRange {
                id,
                count: self.surface.nb_facets(),
            })
    }

    /// Halfedge between two vertex ids, in either direction.
    pub fn edge(&self, v1: usize, v2: usize) -> EditResult<HalfEdgeId> {
        let (a, b) = (self.vertex(v1)?, self.vertex(v2)?);
        self.surface
            .find_half_edge(a, b)
            .or_else(|| self.surface.find_half_edge(b, a))
            .ok_or(EditError::NoSuchEdge { v1, v2 })
    }

    /// The border halfedge between two vertex ids.
    pub fn border_edge(&self, v1: usize, v2: usize) -> EditResult<HalfEdgeId> {
        let h = self.edge(v1, v2)?;
        if self.surface.is_border(h) {
            Ok(h)
        } else if self.surface.is_border(self.surface.opposite(h)) {
            Ok(self.surface.opposite(h))
        } else {
            Err(EditError::Refused(Refusal::NotBorder))
        }
    }

    pub fn collapse_vertex(&mut self, id: usize) -> EditResult<()> {
        let v = self.vertex(id)?;
        self.edit("collapse", |e| e.collapse_vertex(v, true).map(|_| ()))
    }

    pub fn erase_vertex(&mut self, id: usize) -> EditResult<()> {
        let v = self.vertex(id)?;
        self.edit("eraseNode", |e| e.erase_vertex(v))
    }

    pub fn erase_triangle(&mut self, id: usize) -> EditResult<()> {
        let f = self.facet(id)?;
        self.edit("eraseFacet", |e| e.erase_facet(f))
    }

    pub fn switch_edge(&mut self, v1: usize, v2: usize) -> EditResult<()> {
        let h = self.edge(v1, v2)?;
        self.edit("switchEdge", |e| e.switch_edge(h).map(|_| ()))
    }

    pub fn fill_hole(&mut self, v1: usize, v2: usize) -> EditResult<()> {
        let h = self.border_edge(v1, v2)?;
        self.edit("fillHole", |e| e.fill_hole(h, true).map(|_| ()))
    }

    /// Glues the border edge `(a, b)` onto the border edge `(c, d)`.
    pub fn glue_edges(&mut self, edge1: [usize; 2], edge2: [usize; 2]) -> EditResult<()> {
        let h0 = self.border_edge(edge1[0], edge1[1])?;
        let h1 = self.border_edge(edge2[0], edge2[1])?;
        self.edit("zipEdges", |e| e.glue(h0, h1))
    }

    /// Opens the interior edge between two vertex ids; one endpoint must
    /// lie on the border.
    pub fn unzip_edge(&mut self, v1: usize, v2: usize) -> EditResult<()> {
        let h = self.edge(v1, v2)?;
        self.edit("unzipEdge", |e| e.unglue(h, true))
    }

    pub fn zip_vertex(&mut self, id: usize) -> EditResult<()> {
        let v = self.vertex(id)?;
        self.edit("zipVertex", |e| e.zip_edge(v))
    }

    pub fn create_center_vertex(&mut self, facet: usize) -> EditResult<usize> {
        let f = self.facet(facet)?;
        let v = self.edit("centerVertex", |e| e.create_center_vertex(f))?;
        Ok(self.surface.vertex_id(v))
    }

    pub fn flip_normal(&mut self, facet: usize) -> EditResult<()> {
        let f = self.facet(facet)?;
        let h = self.surface.facet(f).half_edge;
        self.edit("flipNormal", |e| e.flip_normal(h))
    }

    pub fn flip_normals(&mut self) -> EditResult<()> {
        self.edit("flipNormals", |e| e.flip_normals())
    }

    /// Flat `[x, y, z, ...]` positions, indexed by vertex id.
    pub fn positions(&self) -> Vec<f64> {
        self.surface.nodes_as_array()
    }

    /// Flat triangle indices.
    pub fn indices(&self) -> SurfaceResult<Vec<usize>> {
        self.surface.triangles_as_array()
    }

    pub fn border_nodes(&self) -> Vec<f64> {
        self.surface.borders_as_array()
    }

    pub fn border_ids(&self) -> Vec<usize> {
        self.surface.border_ids_as_array()
    }
}
