use crate::bounds::BoundingBox;
use crate::cell::ConvexCell;
use crate::config::{DiagramConfig, OutOfBoundsPolicy};
use crate::diagram::VoronoiDiagram;
use crate::sites::random_sites;
use crate::vector::Vec3;
use js_sys::{Array, Uint32Array};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_BOUNDS: &'static str = r#"
export const BOX_ID_LEFT = -1;
export const BOX_ID_RIGHT = -2;
export const BOX_ID_FRONT = -3;
export const BOX_ID_BACK = -4;
export const BOX_ID_BOTTOM = -5;
export const BOX_ID_TOP = -6;
"#;

fn to_points(flat: &[f64]) -> Vec<Vec3> {
    flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect()
}

fn to_corners(min: &[f64], max: &[f64]) -> Result<(Vec3, Vec3), JsError> {
    if min.len() < 3 || max.len() < 3 {
        return Err(JsError::new("min and max must have three coordinates"));
    }
    Ok(([min[0], min[1], min[2]], [max[0], max[1], max[2]]))
}

fn flat_vertices(cell: &ConvexCell) -> Vec<f64> {
    cell.vertices().iter().flatten().copied().collect()
}

// Workaround for the fact that wasm-bindgen does not support nested vectors directly
fn faces_array(cell: &ConvexCell) -> Array {
    let result = Array::new_with_length(cell.face_counts().len() as u32);
    for (i, face) in cell.faces().into_iter().enumerate() {
        let face: Vec<u32> = face.into_iter().map(|idx| idx as u32).collect();
        result.set(i as u32, Uint32Array::from(face.as_slice()).into());
    }
    result
}

/// Draws `count` random sites inside the box, as a flat `[x, y, z, ...]` array.
///
/// The same `seed` always yields the same sites.
#[wasm_bindgen(js_name = randomSites)]
pub fn wasm_random_sites(
    count: usize,
    seed: u64,
    min: &[f64],
    max: &[f64],
) -> Result<Vec<f64>, JsError> {
    let (min, max) = to_corners(min, max)?;
    let bounds = BoundingBox::new(min, max)?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(random_sites(&mut rng, count, &bounds).into_iter().flatten().collect())
}

// --- ConvexCell Wrapper ---

#[wasm_bindgen(js_name = Cell3D)]
pub struct Cell3D {
    inner: ConvexCell,
}

#[wasm_bindgen(js_class = Cell3D)]
impl Cell3D {
    #[wasm_bindgen(getter)]
    pub fn site(&self) -> Vec<f64> { self.inner.site().to_vec() }
    /// Flat array of vertices [x, y, z, x, y, z, ...].
    #[wasm_bindgen(getter)]
    pub fn vertices(&self) -> Vec<f64> { flat_vertices(&self.inner) }
    #[wasm_bindgen(getter)]
    pub fn face_counts(&self) -> Vec<u32> { self.inner.face_counts().to_vec() }
    #[wasm_bindgen(getter)]
    pub fn face_indices(&self) -> Vec<u32> { self.inner.face_indices().to_vec() }
    /// Neighbor ID for each face. Negative values indicate the bounding box.
    #[wasm_bindgen(getter)]
    pub fn face_neighbors(&self) -> Vec<i32> { self.inner.face_neighbors().to_vec() }
    /// Border planes as a flat array [nx, ny, nz, distance, ...].
    #[wasm_bindgen(getter)]
    pub fn borders(&self) -> Vec<f64> {
        self.inner
            .borders()
            .iter()
            .flat_map(|p| [p.normal[0], p.normal[1], p.normal[2], p.distance])
            .collect()
    }
    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool { self.inner.contains([x, y, z]) }
    pub fn volume(&self) -> f64 { self.inner.volume() }
    pub fn centroid(&self) -> Vec<f64> { self.inner.centroid().to_vec() }
    pub fn face_area(&self, face_index: usize) -> f64 { self.inner.face_area(face_index) }
    #[wasm_bindgen(js_name = faces)]
    pub fn wasm_faces(&self) -> Array { faces_array(&self.inner) }
}

// --- VoronoiDiagram ---

#[wasm_bindgen(js_name = VoronoiDiagram3D)]
pub struct VoronoiDiagram3D {
    inner: VoronoiDiagram,
}

#[wasm_bindgen(js_class = VoronoiDiagram3D)]
impl VoronoiDiagram3D {
    /// Builds the diagram from a flat `[x, y, z, ...]` site array and the box corners.
    ///
    /// With `exclude_outside` set, sites outside the box are dropped instead of failing.
    #[wasm_bindgen(constructor)]
    pub fn new(
        sites: &[f64],
        min: &[f64],
        max: &[f64],
        exclude_outside: bool,
    ) -> Result<VoronoiDiagram3D, JsError> {
        let (min, max) = to_corners(min, max)?;
        let policy = match exclude_outside {
            true => OutOfBoundsPolicy::Exclude,
            false => OutOfBoundsPolicy::Reject,
        };
        let config = DiagramConfig::new().out_of_bounds(policy);
        let inner = VoronoiDiagram::with_config(&to_points(sites), min, max, &config)?;
        Ok(VoronoiDiagram3D { inner })
    }
    #[wasm_bindgen(getter)]
    pub fn count_cells(&self) -> usize { self.inner.count_cells() }
    #[wasm_bindgen(getter)]
    pub fn sites(&self) -> Vec<f64> { self.inner.sites().iter().flatten().copied().collect() }
    pub fn get_cell(&self, index: usize) -> Option<Cell3D> {
        self.inner.cell(index).cloned().map(|inner| Cell3D { inner })
    }
    #[wasm_bindgen(getter)]
    pub fn cells(&self) -> Vec<Cell3D> {
        self.inner.regions().iter().cloned().map(|inner| Cell3D { inner }).collect()
    }

    // Per-cell accessors that avoid copying the cell across the boundary.
    // They return `undefined` for an out of range index.
    pub fn cell_site(&self, index: usize) -> Option<Vec<f64>> {
        self.inner.cell(index).map(|c| c.site().to_vec())
    }
    pub fn cell_vertices(&self, index: usize) -> Option<Vec<f64>> {
        self.inner.cell(index).map(flat_vertices)
    }
    pub fn cell_faces(&self, index: usize) -> Option<Array> {
        self.inner.cell(index).map(faces_array)
    }
    pub fn cell_face_neighbors(&self, index: usize) -> Option<Vec<i32>> {
        self.inner.cell(index).map(|c| c.face_neighbors().to_vec())
    }
    pub fn cell_volume(&self, index: usize) -> Option<f64> {
        self.inner.cell(index).map(|c| c.volume())
    }
    /// Whether cell `index` contains the point. False for an out of range index.
    pub fn contains(&self, index: usize, x: f64, y: f64, z: f64) -> bool {
        self.inner.cell(index).is_some_and(|c| c.contains([x, y, z]))
    }

    pub fn locate(&self, x: f64, y: f64, z: f64) -> Option<usize> { self.inner.locate([x, y, z]) }
    pub fn volume(&self) -> f64 { self.inner.volume() }
    pub fn relaxed(&self) -> Result<VoronoiDiagram3D, JsError> {
        Ok(VoronoiDiagram3D { inner: self.inner.relaxed()? })
    }
}
