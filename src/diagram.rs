use crate::bisector::bisector;
use crate::bounds::{BoundingBox, box_side};
use crate::cell::{BorderOutcome, ClipScratch, ConvexCell};
use crate::config::{DiagramConfig, OutOfBoundsPolicy};
use crate::error::{Result, VoronoiError};
use crate::plane::Plane;
use crate::vector::{self, Vec3};
use rayon::prelude::*;

/// A bounded 3D Voronoi diagram.
///
/// The diagram owns one [`ConvexCell`] per site, built eagerly on construction and
/// immutable afterwards. Cell `i` belongs to `sites()[i]`, and the neighbor IDs reported by
/// cells index into the same list.
#[derive(Clone, Debug)]
pub struct VoronoiDiagram {
    bounds: BoundingBox,
    sites: Vec<Vec3>,
    boundary_planes: [Plane; 6],
    regions: Vec<ConvexCell>,
    config: DiagramConfig,
}

impl VoronoiDiagram {
    /// Builds the diagram of `sites` inside the box spanned by `min` and `max`.
    ///
    /// Fails if the box is degenerate, no sites are given, or a site lies outside the box.
    pub fn new(sites: &[Vec3], min: Vec3, max: Vec3) -> Result<Self> {
        Self::with_config(sites, min, max, &DiagramConfig::default())
    }

    pub fn with_config(
        sites: &[Vec3],
        min: Vec3,
        max: Vec3,
        config: &DiagramConfig,
    ) -> Result<Self> {
        let bounds = BoundingBox::new(min, max)?;
        let sites = validate_sites(sites, &bounds, config.out_of_bounds)?;
        let boundary_planes = bounds.planes();

        let regions: Vec<ConvexCell> = if config.parallel {
            (0..sites.len())
                .into_par_iter()
                .map_init(ClipScratch::default, |scratch, i| {
                    build_cell(&sites, i, &bounds, &boundary_planes, scratch)
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            let mut scratch = ClipScratch::default();
            (0..sites.len())
                .map(|i| build_cell(&sites, i, &bounds, &boundary_planes, &mut scratch))
                .collect::<Result<Vec<_>>>()?
        };

        log::debug!(
            "Built {} cells with {} faces in total",
            regions.len(),
            regions.iter().map(|c| c.face_counts().len()).sum::<usize>()
        );

        Ok(Self {
            bounds,
            sites,
            boundary_planes,
            regions,
            config: *config,
        })
    }

    pub fn regions(&self) -> &[ConvexCell] {
        &self.regions
    }

    pub fn cell(&self, index: usize) -> Option<&ConvexCell> {
        self.regions.get(index)
    }

    pub fn count_cells(&self) -> usize {
        self.regions.len()
    }

    /// The sites the cells were built from, after out-of-bounds filtering.
    pub fn sites(&self) -> &[Vec3] {
        &self.sites
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// The six inward-facing box planes shared by every cell.
    pub fn boundary_planes(&self) -> &[Plane; 6] {
        &self.boundary_planes
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// Indices of every cell that contains `point`.
    ///
    /// Points on a face shared by several cells are reported by all of them.
    pub fn containing(&self, point: Vec3) -> Vec<usize> {
        self.regions
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.contains(point))
            .map(|(i, _)| i)
            .collect()
    }

    /// The cell a point belongs to, or `None` outside the bounds.
    ///
    /// Ties between cells sharing a face go to the nearest site, then to the lowest index.
    pub fn locate(&self, point: Vec3) -> Option<usize> {
        self.containing(point).into_iter().min_by(|&a, &b| {
            vector::distance_sq(self.sites[a], point)
                .total_cmp(&vector::distance_sq(self.sites[b], point))
                .then(a.cmp(&b))
        })
    }

    /// Sum of all cell volumes.
    pub fn volume(&self) -> f64 {
        self.regions.iter().map(|c| c.volume()).sum()
    }

    /// Performs one step of Lloyd's relaxation.
    ///
    /// Builds a new diagram whose sites are the centroids of this diagram's cells, which
    /// tends to make the cells more uniform in size and shape.
    pub fn relaxed(&self) -> Result<VoronoiDiagram> {
        let centroids: Vec<Vec3> = if self.config.parallel {
            self.regions.par_iter().map(|c| c.centroid()).collect()
        } else {
            self.regions.iter().map(|c| c.centroid()).collect()
        };
        Self::with_config(&centroids, self.bounds.min, self.bounds.max, &self.config)
    }
}

fn validate_sites(
    sites: &[Vec3],
    bounds: &BoundingBox,
    policy: OutOfBoundsPolicy,
) -> Result<Vec<Vec3>> {
    let mut valid = Vec::with_capacity(sites.len());
    for (index, &site) in sites.iter().enumerate() {
        if site.iter().any(|c| !c.is_finite()) {
            return Err(VoronoiError::InvalidSite { index });
        }
        if !bounds.contains(site) {
            match policy {
                OutOfBoundsPolicy::Reject => {
                    return Err(VoronoiError::SiteOutOfBounds { index, site });
                }
                OutOfBoundsPolicy::Exclude => {
                    log::warn!(
                        "Excluding site {} at {:?}, it lies outside the bounds",
                        index,
                        site
                    );
                    continue;
                }
            }
        }
        valid.push(site);
    }
    if valid.is_empty() {
        return Err(VoronoiError::NoSites);
    }
    Ok(valid)
}

/// Builds the cell of `sites[index]` from the full box.
///
/// Other sites are visited nearest-first. Once a site is further than twice the distance to
/// the furthest vertex of the cell, its bisector and those of all later sites cannot cut
/// the cell anymore.
fn build_cell(
    sites: &[Vec3],
    index: usize,
    bounds: &BoundingBox,
    boundary_planes: &[Plane; 6],
    scratch: &mut ClipScratch,
) -> Result<ConvexCell> {
    let site = sites[index];
    let mut cell = ConvexCell::new(site, *bounds);

    let mut candidates: Vec<(f64, usize)> = sites
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != index)
        .map(|(j, &other)| (vector::distance_sq(site, other), j))
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut max_radius_sq = cell.max_radius_sq(site);
    let mut visited = 0;
    for (dist_sq, j) in candidates {
        if dist_sq > 4.0 * max_radius_sq {
            break;
        }
        visited += 1;
        let plane = match bisector(site, sites[j]) {
            Ok(plane) => plane,
            Err(err) => {
                log::warn!("Skipping sites {} and {}: {}", index, j, err);
                continue;
            }
        };
        if cell.add_border_with_scratch(plane, j as i32, scratch)? == BorderOutcome::Added {
            max_radius_sq = cell.max_radius_sq(site);
        }
    }

    for (k, plane) in boundary_planes.iter().enumerate() {
        cell.add_boundary(*plane, box_side(k / 2, k % 2 == 1))?;
    }
    cell.finalize()?;

    log::trace!(
        "Cell {} visited {} of {} sites, {} faces",
        index,
        visited,
        sites.len() - 1,
        cell.face_counts().len()
    );
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_site_fills_box() {
        let diagram =
            VoronoiDiagram::new(&[[0.0, 0.0, 0.0]], [-1.0, -2.0, -3.0], [1.0, 2.0, 3.0]).unwrap();
        assert_eq!(diagram.count_cells(), 1);
        assert!((diagram.volume() - 48.0).abs() < 1e-9);
        assert_eq!(diagram.regions()[0].borders().len(), 6);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let min = [0.0, 0.0, 0.0];
        let max = [1.0, 1.0, 1.0];
        assert_eq!(VoronoiDiagram::new(&[], min, max).unwrap_err(), VoronoiError::NoSites);
        assert_eq!(
            VoronoiDiagram::new(&[[0.5, 0.5, 0.5]], max, min).unwrap_err(),
            VoronoiError::InvalidBounds { axis: 0, min: 1.0, max: 0.0 }
        );
        assert_eq!(
            VoronoiDiagram::new(&[[0.5, 0.5, 0.5], [0.5, 1.5, 0.5]], min, max).unwrap_err(),
            VoronoiError::SiteOutOfBounds { index: 1, site: [0.5, 1.5, 0.5] }
        );
        assert_eq!(
            VoronoiDiagram::new(&[[0.5, f64::NAN, 0.5]], min, max).unwrap_err(),
            VoronoiError::InvalidSite { index: 0 }
        );
    }

    #[test]
    fn test_exclude_policy() {
        let config = DiagramConfig::new().out_of_bounds(OutOfBoundsPolicy::Exclude);
        let min = [0.0, 0.0, 0.0];
        let max = [1.0, 1.0, 1.0];

        let sites = [[0.25, 0.5, 0.5], [5.0, 0.5, 0.5], [0.75, 0.5, 0.5]];
        let diagram = VoronoiDiagram::with_config(&sites, min, max, &config).unwrap();
        assert_eq!(diagram.sites(), &[[0.25, 0.5, 0.5], [0.75, 0.5, 0.5]]);
        assert_eq!(diagram.regions()[0].neighbors(), vec![1]);

        assert_eq!(
            VoronoiDiagram::with_config(&[[2.0, 2.0, 2.0]], min, max, &config).unwrap_err(),
            VoronoiError::NoSites
        );
    }

    #[test]
    fn test_coincident_sites_are_skipped() {
        let sites = [[0.25, 0.5, 0.5], [0.25, 0.5, 0.5], [0.75, 0.5, 0.5]];
        let diagram = VoronoiDiagram::new(&sites, [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]).unwrap();

        // Both copies get the same half of the box.
        assert!((diagram.regions()[0].volume() - 0.5).abs() < 1e-9);
        assert!((diagram.regions()[1].volume() - 0.5).abs() < 1e-9);
        assert!((diagram.regions()[2].volume() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sites = [
            [1.0, 2.0, 3.0],
            [7.0, 1.0, 2.0],
            [4.0, 8.0, 5.0],
            [9.0, 9.0, 9.0],
            [2.0, 6.0, 8.0],
        ];
        let min = [0.0, 0.0, 0.0];
        let max = [10.0, 10.0, 10.0];
        let build = |parallel: bool| {
            let config = DiagramConfig::new().parallel(parallel);
            VoronoiDiagram::with_config(&sites, min, max, &config).unwrap()
        };
        let parallel = build(true);
        let sequential = build(false);

        for (a, b) in parallel.regions().iter().zip(sequential.regions()) {
            assert_eq!(a.vertices(), b.vertices());
            assert_eq!(a.faces(), b.faces());
            assert_eq!(a.borders(), b.borders());
        }
    }
}
