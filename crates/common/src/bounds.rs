use nalgebra::Vector4;
use pointclouds_core::{Aabb, HasXyz, PointCloud};
use rayon::prelude::*;

/// Axis-aligned bounds of every finite point in the cloud.
pub fn get_min_max_3d<P: HasXyz>(cloud: &PointCloud<P>) -> Aabb {
    min_max_of(cloud.points().par_iter())
}

/// Bounds of the finite points at `indices`.
///
/// # Panics
///
/// Panics if any index is out of bounds.
pub fn get_min_max_3d_indices<P: HasXyz>(cloud: &PointCloud<P>, indices: &[usize]) -> Aabb {
    min_max_of(indices.par_iter().map(|&i| &cloud[i]))
}

fn min_max_of<'a, P, I>(points: I) -> Aabb
where
    P: HasXyz + 'a,
    I: ParallelIterator<Item = &'a P>,
{
    points
        .fold(Aabb::empty, |mut aabb, p| {
            aabb.expand_with_point(p.xyz());
            aabb
        })
        .reduce(Aabb::empty, |a, b| a.merge(&b))
}

/// The point farthest from `pivot`, returned as its full homogeneous vector.
///
/// Distance is measured in xyz only; the fourth component of both the pivot
/// and the points is ignored. Non-finite points are skipped and ties go to
/// the earliest point. `None` when no finite point exists.
pub fn get_max_distance<P: HasXyz>(
    cloud: &PointCloud<P>,
    pivot: &Vector4<f32>,
) -> Option<Vector4<f32>> {
    farthest_of(cloud.points().par_iter().enumerate(), pivot)
}

/// Like [`get_max_distance`], restricted to the points at `indices`.
///
/// # Panics
///
/// Panics if any index is out of bounds.
pub fn get_max_distance_indices<P: HasXyz>(
    cloud: &PointCloud<P>,
    indices: &[usize],
    pivot: &Vector4<f32>,
) -> Option<Vector4<f32>> {
    farthest_of(
        indices.par_iter().enumerate().map(|(k, &i)| (k, &cloud[i])),
        pivot,
    )
}

fn farthest_of<'a, P, I>(points: I, pivot: &Vector4<f32>) -> Option<Vector4<f32>>
where
    P: HasXyz + 'a,
    I: ParallelIterator<Item = (usize, &'a P)>,
{
    let pivot = pivot.xyz();
    points
        .filter(|(_, p)| p.is_finite())
        .map(|(order, p)| {
            let v = p.vector4();
            (order, (v.xyz() - pivot).norm_squared(), v)
        })
        .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(_, _, v)| v)
}
