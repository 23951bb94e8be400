use rand::SeedableRng;
use rand::rngs::StdRng;
use vorocell::sites::{random_sites, with_corners};
use vorocell::{BoundingBox, ConvexCell, DiagramConfig, VoronoiDiagram};

const GRID_SIZE: usize = 5;

fn generate_grid(size: f64) -> Vec<[f64; 3]> {
    let n = GRID_SIZE;
    let step = size / n as f64;
    let offset = step / 2.0;
    let mut sites = Vec::with_capacity(n * n * n);
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                let at = |k: usize| k as f64 * step + offset;
                sites.push([at(x), at(y), at(z)]);
            }
        }
    }
    sites
}

fn assert_partitions_box(diagram: &VoronoiDiagram) {
    assert_partitions_box_within(diagram, 1e-9);
}

fn assert_partitions_box_within(diagram: &VoronoiDiagram, tolerance: f64) {
    let expected = diagram.bounds().volume();
    let total = diagram.volume();
    let error = (total - expected).abs() / expected;
    assert!(error < tolerance, "Volume error too high: got {}, expected {}", total, expected);
}

/// V - E + F, which is 2 for every closed convex polyhedron.
fn euler_characteristic(cell: &ConvexCell) -> i64 {
    let v = cell.vertices().len() as i64;
    let e = cell.face_counts().iter().map(|&c| c as i64).sum::<i64>() / 2;
    let f = cell.face_counts().len() as i64;
    v - e + f
}

#[test]
fn test_grid_volume() {
    let size = 10.0;
    let diagram = VoronoiDiagram::new(&generate_grid(size), [0.0; 3], [size; 3]).unwrap();

    assert_eq!(diagram.count_cells(), GRID_SIZE * GRID_SIZE * GRID_SIZE);
    let cell_volume = (size / GRID_SIZE as f64).powi(3);
    for cell in diagram.regions() {
        assert!((cell.volume() - cell_volume).abs() < 1e-9);
    }
    assert_partitions_box(&diagram);
}

#[test]
fn test_random_volume() {
    let bounds = BoundingBox::new([-20.0, 0.0, 5.0], [20.0, 30.0, 15.0]).unwrap();
    let mut rng = StdRng::seed_from_u64(1234);
    let sites = random_sites(&mut rng, 200, &bounds);
    let diagram = VoronoiDiagram::new(&sites, bounds.min, bounds.max).unwrap();

    assert_eq!(diagram.count_cells(), 200);
    assert_partitions_box(&diagram);
}

#[test]
fn test_random_volume_with_corners() {
    let bounds = BoundingBox::new([0.0; 3], [50.0; 3]).unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let sites = with_corners(random_sites(&mut rng, 60, &bounds), &bounds);
    let diagram = VoronoiDiagram::new(&sites, bounds.min, bounds.max).unwrap();

    assert_eq!(diagram.count_cells(), 62);
    assert_partitions_box(&diagram);
}

#[test]
fn test_cells_are_closed_polyhedra() {
    let bounds = BoundingBox::new([0.0; 3], [30.0; 3]).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let sites = random_sites(&mut rng, 50, &bounds);
    let diagram = VoronoiDiagram::new(&sites, bounds.min, bounds.max).unwrap();

    for (i, cell) in diagram.regions().iter().enumerate() {
        assert!(cell.contains(cell.site()), "cell {} does not contain its site", i);
        assert!(cell.face_counts().iter().all(|&c| c >= 3));

        assert_eq!(euler_characteristic(cell), 2, "cell {} is not a closed polyhedron", i);

        // Every vertex lies inside the box and on the inner side of every border.
        for &vertex in cell.vertices() {
            assert!(cell.contains(vertex), "cell {} vertex {:?} escapes its borders", i, vertex);
        }
    }
}

#[test]
fn test_relaxation_keeps_volume() {
    let bounds = BoundingBox::new([0.0; 3], [10.0; 3]).unwrap();
    let mut rng = StdRng::seed_from_u64(21);
    let sites = random_sites(&mut rng, 30, &bounds);
    let config = DiagramConfig::new().parallel(false);
    let diagram = VoronoiDiagram::with_config(&sites, bounds.min, bounds.max, &config).unwrap();

    let relaxed = diagram.relaxed().unwrap();
    assert_eq!(relaxed.count_cells(), 30);
    assert_eq!(relaxed.config(), &config);
    for (cell, site) in diagram.regions().iter().zip(relaxed.sites()) {
        assert_eq!(&cell.centroid(), site);
    }
    assert_partitions_box(&relaxed);
}

#[test]
fn test_nearly_coincident_site_pairs() {
    // Each site gets a twin a few EPSILON away, so the bisectors of a third site with
    // both twins are almost the same plane.
    let bounds = BoundingBox::new([0.0; 3], [10.0; 3]).unwrap();
    let inner = BoundingBox::new([1.0; 3], [9.0; 3]).unwrap();

    for separation in [3e-9, 1e-8, 1e-7] {
        let mut rng = StdRng::seed_from_u64(17);
        let mut sites = random_sites(&mut rng, 20, &inner);
        let twins: Vec<[f64; 3]> = sites.iter().map(|s| [s[0] + separation, s[1], s[2]]).collect();
        sites.extend(twins);

        let diagram = VoronoiDiagram::new(&sites, bounds.min, bounds.max).unwrap();
        assert_eq!(diagram.count_cells(), 40);
        for (i, cell) in diagram.regions().iter().enumerate() {
            assert!(cell.face_counts().iter().all(|&c| c >= 3));
            assert_eq!(
                euler_characteristic(cell),
                2,
                "cell {} is not a closed polyhedron at separation {}",
                i,
                separation
            );
        }
        assert_partitions_box_within(&diagram, 1e-6);
    }
}

#[test]
fn test_volume_far_from_origin() {
    let bounds = BoundingBox::new([1e7; 3], [1e7 + 10.0; 3]).unwrap();
    let mut rng = StdRng::seed_from_u64(50);
    let sites = random_sites(&mut rng, 50, &bounds);
    let diagram = VoronoiDiagram::new(&sites, bounds.min, bounds.max).unwrap();

    assert_partitions_box_within(&diagram, 1e-6);
    for cell in diagram.regions() {
        assert!(bounds.contains(cell.centroid()));
    }

    let relaxed = diagram.relaxed().unwrap();
    assert_eq!(relaxed.count_cells(), 50);
    assert_partitions_box_within(&relaxed, 1e-6);
}
