use rand::prelude::*;
use rand::rngs::StdRng;
use vorocell::sites::random_sites;
use vorocell::vector::distance_sq;
use vorocell::{BoundingBox, VoronoiDiagram};

/// The index of the nearest site and whether it is unambiguous.
fn nearest(sites: &[[f64; 3]], p: [f64; 3]) -> (usize, bool) {
    let mut order: Vec<(f64, usize)> = sites
        .iter()
        .enumerate()
        .map(|(i, &s)| (distance_sq(s, p).sqrt(), i))
        .collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0));
    (order[0].1, order.len() < 2 || order[1].0 - order[0].0 > 1e-6)
}

#[test]
fn test_points_belong_to_the_nearest_site() {
    let bounds = BoundingBox::new([-5.0, -5.0, -5.0], [15.0, 5.0, 5.0]).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let sites = random_sites(&mut rng, 30, &bounds);
    let diagram = VoronoiDiagram::new(&sites, bounds.min, bounds.max).unwrap();

    for _ in 0..2000 {
        let p = [
            rng.gen_range(bounds.min[0]..bounds.max[0]),
            rng.gen_range(bounds.min[1]..bounds.max[1]),
            rng.gen_range(bounds.min[2]..bounds.max[2]),
        ];
        let (expected, unambiguous) = nearest(&sites, p);
        let containing = diagram.containing(p);
        assert!(containing.contains(&expected), "{:?} is not in the cell of its nearest site", p);
        if unambiguous {
            assert_eq!(containing, vec![expected], "{:?} is claimed by several cells", p);
            assert_eq!(diagram.locate(p), Some(expected));
        }
    }
}

#[test]
fn test_bisector_tie_break() {
    let sites = [[2.0, 2.0, 2.0], [8.0, 8.0, 8.0], [8.0, 2.0, 2.0]];
    let diagram = VoronoiDiagram::new(&sites, [0.0; 3], [10.0; 3]).unwrap();

    // Equidistant from sites 0 and 2: both closed cells claim the point.
    let p = [5.0, 2.0, 2.0];
    assert_eq!(diagram.containing(p), vec![0, 2]);
    assert_eq!(diagram.locate(p), Some(0));

    // Equidistant from all three sites, on the edge shared by the three cells.
    let q = [5.0, 5.0, 5.0];
    assert_eq!(diagram.containing(q), vec![0, 1, 2]);
    assert_eq!(diagram.locate(q), Some(0));
}
