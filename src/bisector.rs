use crate::error::{Result, VoronoiError};
use crate::plane::Plane;
use crate::vector::{self, Vec3};
use crate::EPSILON;

/// The perpendicular bisector of two sites, facing `site`.
///
/// The plane passes through the midpoint of the two sites with normal
/// `normalize(site - other)`, so `site` lies on its positive side. Fails when the
/// sites coincide within `EPSILON`, since the normal is undefined.
pub fn bisector(site: Vec3, other: Vec3) -> Result<Plane> {
    let degenerate = || VoronoiError::DegenerateBisector { a: site, b: other };
    if vector::distance_sq(site, other) <= EPSILON * EPSILON {
        return Err(degenerate());
    }
    Plane::new(vector::sub(site, other), vector::midpoint(site, other)).ok_or_else(degenerate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand::rngs::StdRng;

    #[test]
    fn test_bisector_two_sites() {
        let plane = bisector([0.0, 0.0, 0.0], [10.0, 0.0, 0.0]).unwrap();
        assert!(vector::approx_eq(plane.normal, [-1.0, 0.0, 0.0]));
        assert!(vector::approx_eq(plane.anchor(), [5.0, 0.0, 0.0]));
        assert!(plane.get_side([0.0, 0.0, 0.0]));
        assert!(!plane.get_side([10.0, 0.0, 0.0]));
    }

    #[test]
    fn test_bisector_coincident_sites() {
        let a = [1.0, 2.0, 3.0];
        assert_eq!(bisector(a, a), Err(VoronoiError::DegenerateBisector { a, b: a }));
        assert!(bisector(a, [1.0, 2.0, 3.0 + 1e-12]).is_err());
    }

    #[test]
    fn test_bisector_is_equidistant_and_antisymmetric() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let mut point = || -> Vec3 { [0; 3].map(|_| rng.gen_range(-50.0..50.0)) };
            let a = point();
            let b = point();
            let ab = bisector(a, b).unwrap();
            let ba = bisector(b, a).unwrap();

            let da = ab.signed_distance(a);
            let db = ab.signed_distance(b);
            assert!((da + db).abs() < 1e-9, "bisector not equidistant: {} vs {}", da, db);
            assert!(da > 0.0);
            assert!(vector::approx_eq(ab.normal, vector::scale(ba.normal, -1.0)));
            assert!(ab.flipped().approx_eq(&ba));
        }
    }
}
