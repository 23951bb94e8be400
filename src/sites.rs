//! Site generation helpers.
//!
//! The random source is always passed in, so seeded generators give reproducible diagrams.

use crate::bounds::BoundingBox;
use crate::vector::{self, Vec3};
use rand::Rng;

/// Draws `count` distinct sites uniformly inside `bounds`.
pub fn random_sites<R: Rng + ?Sized>(rng: &mut R, count: usize, bounds: &BoundingBox) -> Vec<Vec3> {
    let mut sites: Vec<Vec3> = Vec::with_capacity(count);
    while sites.len() < count {
        let site = [
            rng.gen_range(bounds.min[0]..bounds.max[0]),
            rng.gen_range(bounds.min[1]..bounds.max[1]),
            rng.gen_range(bounds.min[2]..bounds.max[2]),
        ];
        if !sites.contains(&site) {
            sites.push(site);
        }
    }
    sites
}

/// Appends the min and max corners of `bounds` as two more sites.
pub fn with_corners(mut sites: Vec<Vec3>, bounds: &BoundingBox) -> Vec<Vec3> {
    sites.push(bounds.min);
    sites.push(bounds.max);
    sites
}

/// Sorts sites from closest to furthest from `target`.
pub fn sort_by_distance(sites: &mut [Vec3], target: Vec3) {
    sites.sort_by(|a, b| {
        vector::distance_sq(*a, target).total_cmp(&vector::distance_sq(*b, target))
    });
}
