use crate::bounds::{BoundingBox, box_side};
use crate::error::{Result, VoronoiError};
use crate::plane::Plane;
use crate::vector::{self, Vec3};
use crate::EPSILON;
use std::fmt;

/// Lifecycle of a cell. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    /// The cell still spans the full bounding box and holds no borders.
    Seeded,
    /// At least one border has been applied.
    Clipping,
    /// Construction is done, the cell rejects further borders.
    Finalized,
}

/// What happened to a plane offered to [`ConvexCell::add_border`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderOutcome {
    /// The plane cut the polyhedron and was appended to the borders.
    Added,
    /// The site is not on the positive side of the plane. The cell is unchanged.
    NotFacingSite,
    /// The plane does not cut the polyhedron. The cell is unchanged.
    Disjoint,
    /// The plane is already one of the borders. The cell is unchanged.
    Duplicate,
}

/// Scratch buffer to reuse allocations during clipping.
#[derive(Default, Clone)]
pub struct ClipScratch {
    dists: Vec<f64>,
    sides: Vec<i8>,
    vertices: Vec<Vec3>,
    face_counts: Vec<u32>,
    face_indices: Vec<u32>,
    face_neighbors: Vec<i32>,
    old_to_new: Vec<Option<u32>>,
    intersection_map: Vec<(u64, u32)>,
    face_buffer: Vec<u32>,
    edges: Vec<(u32, u32)>,
    cap_edges: Vec<(u32, u32)>,
    used: Vec<bool>,
    stack: Vec<u32>,
    cap: Vec<u32>,
}

/// A convex Voronoi cell: one site, its border half-spaces and the polyhedron they cut
/// out of the bounding box.
///
/// Faces are stored flattened, as a count per face plus the vertex indices of all faces in
/// order. Every face winds counter-clockwise seen from outside the cell and remembers the
/// neighbor ID of the border that produced it: the index of the other site for bisectors,
/// or a negative [`box_side`] ID for the bounding box.
#[derive(Clone, Debug)]
pub struct ConvexCell {
    site: Vec3,
    bounds: BoundingBox,
    state: CellState,
    borders: Vec<Plane>,
    border_neighbors: Vec<i32>,
    vertices: Vec<Vec3>,
    face_counts: Vec<u32>,
    face_indices: Vec<u32>,
    face_neighbors: Vec<i32>,
}

impl ConvexCell {
    /// Seeds a cell with the full bounding box and no borders.
    pub fn new(site: Vec3, bounds: BoundingBox) -> ConvexCell {
        let face_counts: Vec<u32> = vec![4, 4, 4, 4, 4, 4];

        let face_indices: Vec<u32> = vec![
            3, 2, 1, 0, // Bottom (z-)
            4, 5, 6, 7, // Top (z+)
            0, 1, 5, 4, // Front (y-)
            2, 3, 7, 6, // Back (y+)
            0, 4, 7, 3, // Left (x-)
            1, 2, 6, 5, // Right (x+)
        ];

        ConvexCell {
            site,
            bounds,
            state: CellState::Seeded,
            borders: Vec::new(),
            border_neighbors: Vec::new(),
            vertices: bounds.corners().to_vec(),
            face_counts,
            face_indices,
            face_neighbors: vec![
                box_side(2, false), // z-
                box_side(2, true),  // z+
                box_side(1, false), // y-
                box_side(1, true),  // y+
                box_side(0, false), // x-
                box_side(0, true),  // x+
            ],
        }
    }

    pub fn site(&self) -> Vec3 {
        self.site
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn borders(&self) -> &[Plane] {
        &self.borders
    }

    /// Neighbor ID for each border, parallel to [`ConvexCell::borders`].
    pub fn border_neighbors(&self) -> &[i32] {
        &self.border_neighbors
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Number of vertices for each face.
    pub fn face_counts(&self) -> &[u32] {
        &self.face_counts
    }

    /// Flattened vertex indices for all faces.
    pub fn face_indices(&self) -> &[u32] {
        &self.face_indices
    }

    /// Neighbor ID for each face. Negative values indicate the bounding box.
    pub fn face_neighbors(&self) -> &[i32] {
        &self.face_neighbors
    }

    /// Vertex index loops, one per face.
    pub fn faces(&self) -> Vec<Vec<usize>> {
        let mut faces: Vec<Vec<usize>> = Vec::with_capacity(self.face_counts.len());
        let mut offset: usize = 0;
        for &count in &self.face_counts {
            let count = count as usize;
            let face = &self.face_indices[offset..offset + count];
            faces.push(face.iter().map(|&i| i as usize).collect());
            offset += count;
        }
        faces
    }

    /// Vertex position loops, one per face.
    pub fn face_polygons(&self) -> Vec<Vec<Vec3>> {
        self.faces()
            .into_iter()
            .map(|face| face.into_iter().map(|i| self.vertices[i]).collect())
            .collect()
    }

    /// Indices of the sites this cell shares a face with, sorted and deduplicated.
    pub fn neighbors(&self) -> Vec<usize> {
        let mut neighbors: Vec<usize> = self
            .face_neighbors
            .iter()
            .filter(|&&n| n >= 0)
            .map(|&n| n as usize)
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    pub fn is_empty(&self) -> bool {
        self.face_counts.is_empty()
    }

    /// Membership test: inside the bounding box and on the non-negative side of every border.
    ///
    /// The test is closed with `EPSILON` tolerance, so a point on a face shared by two cells
    /// is contained in both of them.
    pub fn contains(&self, point: Vec3) -> bool {
        self.bounds.contains(point)
            && self.borders.iter().all(|b| b.signed_distance(point) >= -EPSILON)
    }

    /// Clips the cell by a border half-space, keeping the part on the positive side.
    ///
    /// `neighbor` is recorded on the cap face the plane creates.
    pub fn add_border(&mut self, plane: Plane, neighbor: i32) -> Result<BorderOutcome> {
        let mut scratch = ClipScratch::default();
        self.add_border_with_scratch(plane, neighbor, &mut scratch)
    }

    pub fn add_border_with_scratch(
        &mut self,
        plane: Plane,
        neighbor: i32,
        scratch: &mut ClipScratch,
    ) -> Result<BorderOutcome> {
        if self.state == CellState::Finalized {
            return Err(VoronoiError::CellFinalized);
        }
        if !plane.get_side(self.site) {
            log::warn!(
                "Tried to add border {} to the cell of {:?}, but the plane is not facing it",
                plane,
                self.site
            );
            return Ok(BorderOutcome::NotFacingSite);
        }
        if self.has_border(&plane) {
            return Ok(BorderOutcome::Duplicate);
        }
        if !self.clip(&plane, neighbor, scratch)? {
            log::trace!("Border {} does not cut the cell of {:?}", plane, self.site);
            return Ok(BorderOutcome::Disjoint);
        }
        self.borders.push(plane);
        self.border_neighbors.push(neighbor);
        self.state = CellState::Clipping;
        Ok(BorderOutcome::Added)
    }

    /// Adds a permanent boundary border.
    ///
    /// Unlike [`ConvexCell::add_border`] the plane is kept even if it does not cut the
    /// polyhedron, and a site lying on the plane itself is accepted.
    pub fn add_boundary(&mut self, plane: Plane, id: i32) -> Result<BorderOutcome> {
        if self.state == CellState::Finalized {
            return Err(VoronoiError::CellFinalized);
        }
        if plane.signed_distance(self.site) < -EPSILON {
            log::warn!("Boundary {} excludes the site {:?}", plane, self.site);
            return Ok(BorderOutcome::NotFacingSite);
        }
        if self.has_border(&plane) {
            return Ok(BorderOutcome::Duplicate);
        }
        let mut scratch = ClipScratch::default();
        self.clip(&plane, id, &mut scratch)?;
        self.borders.push(plane);
        self.border_neighbors.push(id);
        self.state = CellState::Clipping;
        Ok(BorderOutcome::Added)
    }

    /// Ends construction.
    ///
    /// Bisector borders that no longer own a face were made redundant by later cuts and are
    /// dropped; boundary borders are always kept.
    pub fn finalize(&mut self) -> Result<()> {
        if self.state == CellState::Finalized {
            return Ok(());
        }
        if self.is_empty() {
            return Err(VoronoiError::EmptyCell { site: self.site });
        }

        let mut kept_borders = Vec::with_capacity(self.borders.len());
        let mut kept_neighbors = Vec::with_capacity(self.borders.len());
        for (plane, &neighbor) in self.borders.iter().zip(&self.border_neighbors) {
            if neighbor < 0 || self.face_neighbors.contains(&neighbor) {
                kept_borders.push(*plane);
                kept_neighbors.push(neighbor);
            }
        }
        let pruned = self.borders.len() - kept_borders.len();
        if pruned > 0 {
            log::trace!("Dropped {} redundant borders from the cell of {:?}", pruned, self.site);
        }
        self.borders = kept_borders;
        self.border_neighbors = kept_neighbors;
        self.state = CellState::Finalized;
        Ok(())
    }

    fn has_border(&self, plane: &Plane) -> bool {
        self.borders.iter().any(|b| b.approx_eq(plane))
    }

    /// Cuts away the part of the polyhedron on the negative side of `plane`.
    ///
    /// Returns `Ok(false)` without touching the cell if the plane leaves every vertex on one
    /// side.
    fn clip(&mut self, plane: &Plane, neighbor: i32, scratch: &mut ClipScratch) -> Result<bool> {
        let num_verts = self.vertices.len();

        // 1. Classify vertices: 1 inside, -1 outside, 0 on the plane
        scratch.dists.clear();
        scratch.sides.clear();
        let mut any_inside = false;
        let mut any_outside = false;
        for &v in &self.vertices {
            let d = plane.signed_distance(v);
            let side = if d > EPSILON {
                any_inside = true;
                1
            } else if d < -EPSILON {
                any_outside = true;
                -1
            } else {
                0
            };
            scratch.dists.push(d);
            scratch.sides.push(side);
        }

        if !any_outside {
            return Ok(false);
        }
        if !any_inside {
            log::warn!(
                "Border {} leaves no vertex of the cell of {:?} strictly inside, ignoring it",
                plane,
                self.site
            );
            return Ok(false);
        }

        // 2. Keep the vertices on or inside the plane, unmoved
        scratch.vertices.clear();
        scratch.face_counts.clear();
        scratch.face_indices.clear();
        scratch.face_neighbors.clear();
        scratch.intersection_map.clear();
        scratch.old_to_new.clear();
        scratch.old_to_new.resize(num_verts, None);

        for i in 0..num_verts {
            if scratch.sides[i] >= 0 {
                scratch.old_to_new[i] = Some(scratch.vertices.len() as u32);
                scratch.vertices.push(self.vertices[i]);
            }
        }

        // 3. Clip each face against the plane
        let mut index_offset = 0;
        for (face_idx, &count) in self.face_counts.iter().enumerate() {
            let count = count as usize;
            let face = &self.face_indices[index_offset..index_offset + count];
            index_offset += count;

            scratch.face_buffer.clear();
            for i in 0..count {
                let idx_s = face[i] as usize;
                let idx_e = face[(i + 1) % count] as usize;
                let side_s = scratch.sides[idx_s];
                let side_e = scratch.sides[idx_e];

                if side_e >= 0 {
                    if side_s < 0 && side_e > 0 {
                        let idx = intersect_edge(&self.vertices, plane, idx_s, idx_e, scratch);
                        scratch.face_buffer.push(idx);
                    }
                    if let Some(idx) = scratch.old_to_new[idx_e] {
                        scratch.face_buffer.push(idx);
                    }
                } else if side_s > 0 {
                    let idx = intersect_edge(&self.vertices, plane, idx_s, idx_e, scratch);
                    scratch.face_buffer.push(idx);
                }
            }

            if scratch.face_buffer.len() >= 3 {
                scratch.face_counts.push(scratch.face_buffer.len() as u32);
                scratch.face_neighbors.push(self.face_neighbors[face_idx]);
                scratch.face_indices.extend_from_slice(&scratch.face_buffer);
            }
        }

        // 4. Close the hole left by the removed part with cap faces
        build_cap(plane, neighbor, scratch);

        // 5. Drop vertices no face refers to anymore
        compact(scratch);

        if scratch.face_counts.is_empty() {
            return Err(VoronoiError::EmptyCell { site: self.site });
        }

        std::mem::swap(&mut self.vertices, &mut scratch.vertices);
        std::mem::swap(&mut self.face_counts, &mut scratch.face_counts);
        std::mem::swap(&mut self.face_indices, &mut scratch.face_indices);
        std::mem::swap(&mut self.face_neighbors, &mut scratch.face_neighbors);
        Ok(true)
    }

    /// Volume of the polyhedron.
    ///
    /// Tetrahedra are fanned from the site rather than the origin, which keeps the
    /// determinants small for cells far away from the origin.
    pub fn volume(&self) -> f64 {
        let mut volume: f64 = 0.0;
        self.for_each_tetrahedron(|det, _| volume += det);
        (volume / 6.0).abs()
    }

    pub fn centroid(&self) -> Vec3 {
        let mut centroid: Vec3 = [0.0; 3];
        let mut total_volume: f64 = 0.0;
        self.for_each_tetrahedron(|det, tet| {
            total_volume += det;
            centroid = vector::add(centroid, vector::scale(tet, det));
        });

        if total_volume.abs() < EPSILON {
            return self.site;
        }

        vector::add(self.site, vector::scale(centroid, 1.0 / (4.0 * total_volume)))
    }

    /// Calls `visit(det, v0 + v1 + v2)` for every fan triangle of every face, with the
    /// triangle corners taken relative to the site.
    fn for_each_tetrahedron<F: FnMut(f64, Vec3)>(&self, mut visit: F) {
        let local = |index: u32| vector::sub(self.vertices[index as usize], self.site);
        let mut index_offset: usize = 0;

        for &count in &self.face_counts {
            let count = count as usize;
            // Fan triangulation around the first vertex of the face
            let v0 = local(self.face_indices[index_offset]);
            for i in 1..count - 1 {
                let v1 = local(self.face_indices[index_offset + i]);
                let v2 = local(self.face_indices[index_offset + i + 1]);
                let det = vector::dot(v0, vector::cross(v1, v2));
                visit(det, vector::add(vector::add(v0, v1), v2));
            }
            index_offset += count;
        }
    }

    pub fn face_area(&self, face_index: usize) -> f64 {
        if face_index >= self.face_counts.len() {
            return 0.0;
        }
        let offset: usize = self.face_counts[..face_index].iter().map(|&c| c as usize).sum();
        let count = self.face_counts[face_index] as usize;

        let p0 = self.vertices[self.face_indices[offset] as usize];
        let mut area = 0.0;
        for i in 1..count - 1 {
            let p1 = self.vertices[self.face_indices[offset + i] as usize];
            let p2 = self.vertices[self.face_indices[offset + i + 1] as usize];
            area += 0.5 * vector::length(vector::cross(vector::sub(p1, p0), vector::sub(p2, p0)));
        }
        area
    }

    /// Squared distance from `center` to the furthest vertex.
    pub fn max_radius_sq(&self, center: Vec3) -> f64 {
        self.vertices
            .iter()
            .map(|&v| vector::distance_sq(v, center))
            .fold(0.0, f64::max)
    }
}

impl fmt::Display for ConvexCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Site: ({:.2}, {:.2}, {:.2}) Borders amount: {}",
            self.site[0],
            self.site[1],
            self.site[2],
            self.borders.len()
        )?;
        for border in &self.borders {
            write!(f, " {}", border)?;
        }
        Ok(())
    }
}

/// Returns the new vertex where the edge `a`-`b` crosses `plane`, creating it once per edge.
fn intersect_edge(
    vertices: &[Vec3],
    plane: &Plane,
    a: usize,
    b: usize,
    scratch: &mut ClipScratch,
) -> u32 {
    // Interpolate from the lower index so both faces sharing the edge get the same point
    let (a, b) = if a < b { (a, b) } else { (b, a) };
    let key = (a as u64) << 32 | b as u64;
    if let Some(&(_, idx)) = scratch.intersection_map.iter().find(|&&(k, _)| k == key) {
        return idx;
    }

    let d_a = scratch.dists[a];
    let d_b = scratch.dists[b];
    let denom = d_a - d_b;
    let t = if denom.abs() < EPSILON { 0.5 } else { (d_a / denom).clamp(0.0, 1.0) };
    let p = vector::add(vertices[a], vector::scale(vector::sub(vertices[b], vertices[a]), t));

    let idx = scratch.vertices.len() as u32;
    scratch.vertices.push(plane.closest_point(p));
    scratch.intersection_map.push((key, idx));
    idx
}

/// Appends the cap faces on `plane` to the clipped faces in `scratch`.
///
/// The cap is read off the topology instead of the geometry: every directed edge of a
/// clipped face must be matched by its reverse in a neighboring face, and the edges left
/// unmatched outline the hole the cut opened. Reversing them gives the cap boundary with
/// the winding of the surrounding faces, counter-clockwise seen from outside. Each closed
/// walk over those edges becomes one cap face, so the cap always agrees with the faces it
/// is glued to, even when near-coplanar cuts leave the points slightly off the plane.
fn build_cap(plane: &Plane, neighbor: i32, scratch: &mut ClipScratch) {
    scratch.edges.clear();
    let mut offset = 0;
    for &count in &scratch.face_counts {
        let face = &scratch.face_indices[offset..offset + count as usize];
        for (i, &a) in face.iter().enumerate() {
            scratch.edges.push((a, face[(i + 1) % face.len()]));
        }
        offset += count as usize;
    }
    scratch.edges.sort_unstable();

    scratch.cap_edges.clear();
    for &(a, b) in &scratch.edges {
        if scratch.edges.binary_search(&(b, a)).is_err() {
            scratch.cap_edges.push((b, a));
        }
    }
    if scratch.cap_edges.is_empty() {
        log::debug!("Cut by {} left no open edges", plane);
        return;
    }
    scratch.cap_edges.sort_unstable();
    scratch.used.clear();
    scratch.used.resize(scratch.cap_edges.len(), false);

    // Hierholzer walk, one closed walk per connected group of cap edges
    while let Some(first) = scratch.used.iter().position(|&u| !u) {
        scratch.stack.clear();
        scratch.cap.clear();
        scratch.stack.push(scratch.cap_edges[first].0);
        while let Some(&v) = scratch.stack.last() {
            let from = scratch.cap_edges.partition_point(|&(a, _)| a < v);
            let next = (from..scratch.cap_edges.len())
                .take_while(|&e| scratch.cap_edges[e].0 == v)
                .find(|&e| !scratch.used[e]);
            match next {
                Some(e) => {
                    scratch.used[e] = true;
                    scratch.stack.push(scratch.cap_edges[e].1);
                }
                None => {
                    scratch.stack.pop();
                    scratch.cap.push(v);
                }
            }
        }
        // The walk comes out backwards and closed, with the start at both ends
        scratch.cap.pop();
        scratch.cap.reverse();

        if scratch.cap.len() < 3 {
            log::debug!("Cut by {} left a degenerate cap of {} points", plane, scratch.cap.len());
            continue;
        }
        scratch.face_counts.push(scratch.cap.len() as u32);
        scratch.face_indices.extend_from_slice(&scratch.cap);
        scratch.face_neighbors.push(neighbor);
    }
}

/// Removes unreferenced vertices and renumbers the face indices.
fn compact(scratch: &mut ClipScratch) {
    scratch.old_to_new.clear();
    scratch.old_to_new.resize(scratch.vertices.len(), None);
    let mut next: u32 = 0;
    for idx in scratch.face_indices.iter_mut() {
        let slot = &mut scratch.old_to_new[*idx as usize];
        *idx = *slot.get_or_insert_with(|| {
            next += 1;
            next - 1
        });
    }

    let mut compacted = vec![[0.0; 3]; next as usize];
    for (old, new) in scratch.old_to_new.iter().enumerate() {
        if let Some(new) = new {
            compacted[*new as usize] = scratch.vertices[old];
        }
    }
    scratch.vertices = compacted;
}
