use nalgebra::{Matrix3, Vector3, Vector4};
use pointclouds_core::{HasXyz, PointCloud};

use crate::eigen::smallest_eigenvector;

/// Centroid of the finite points, with `w = 1`. `None` if there are none.
pub fn compute_centroid<P: HasXyz>(cloud: &PointCloud<P>) -> Option<Vector4<f32>> {
    centroid_of(cloud.iter())
}

/// Centroid of the finite points at `indices`.
///
/// # Panics
///
/// Panics if any index is out of bounds.
pub fn compute_centroid_indices<P: HasXyz>(
    cloud: &PointCloud<P>,
    indices: &[usize],
) -> Option<Vector4<f32>> {
    centroid_of(indices.iter().map(|&i| &cloud[i]))
}

fn centroid_of<'a, P, I>(points: I) -> Option<Vector4<f32>>
where
    P: HasXyz + 'a,
    I: Iterator<Item = &'a P>,
{
    let mut sum = Vector3::<f64>::zeros();
    let mut count = 0usize;
    for p in points.filter(|p| p.is_finite()) {
        let [x, y, z] = p.xyz();
        sum += Vector3::new(x as f64, y as f64, z as f64);
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;
    Some(Vector4::new(mean.x as f32, mean.y as f32, mean.z as f32, 1.0))
}

/// Centroid and normalized (divided by the point count) covariance matrix of
/// the finite points. `None` if there are none.
pub fn compute_mean_and_covariance<P: HasXyz>(
    cloud: &PointCloud<P>,
) -> Option<(Vector4<f32>, Matrix3<f32>)> {
    mean_and_covariance_of(cloud.points().iter())
}

/// Like [`compute_mean_and_covariance`], restricted to the points at `indices`.
///
/// # Panics
///
/// Panics if any index is out of bounds.
pub fn compute_mean_and_covariance_indices<P: HasXyz>(
    cloud: &PointCloud<P>,
    indices: &[usize],
) -> Option<(Vector4<f32>, Matrix3<f32>)> {
    mean_and_covariance_of(indices.iter().map(|&i| &cloud[i]))
}

fn mean_and_covariance_of<'a, P, I>(points: I) -> Option<(Vector4<f32>, Matrix3<f32>)>
where
    P: HasXyz + 'a,
    I: Iterator<Item = &'a P> + Clone,
{
    let centroid = centroid_of(points.clone())?;
    let (cx, cy, cz) = (centroid.x as f64, centroid.y as f64, centroid.z as f64);

    // Upper triangle; the matrix is symmetric
    let (mut c00, mut c01, mut c02) = (0.0f64, 0.0f64, 0.0f64);
    let (mut c11, mut c12, mut c22) = (0.0f64, 0.0f64, 0.0f64);
    let mut count = 0usize;
    for p in points.filter(|p| p.is_finite()) {
        let [x, y, z] = p.xyz();
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        let dz = z as f64 - cz;
        c00 += dx * dx;
        c01 += dx * dy;
        c02 += dx * dz;
        c11 += dy * dy;
        c12 += dy * dz;
        c22 += dz * dz;
        count += 1;
    }

    let n = count as f64;
    let covariance =
        Matrix3::new(c00, c01, c02, c01, c11, c12, c02, c12, c22).map(|v| (v / n) as f32);
    Some((centroid, covariance))
}

/// Least-squares plane through the finite points and its surface curvature.
///
/// Returns `([nx, ny, nz, d], curvature)` with a unit normal and
/// `n · p + d = 0` for points on the plane. Curvature is the smallest
/// eigenvalue over the eigenvalue sum, so `0` for a perfect plane. Fewer than
/// three finite points give `None`.
pub fn compute_point_normal<P: HasXyz>(cloud: &PointCloud<P>) -> Option<(Vector4<f32>, f32)> {
    plane_of(cloud.points().iter())
}

/// Like [`compute_point_normal`], restricted to the points at `indices`.
///
/// # Panics
///
/// Panics if any index is out of bounds.
pub fn compute_point_normal_indices<P: HasXyz>(
    cloud: &PointCloud<P>,
    indices: &[usize],
) -> Option<(Vector4<f32>, f32)> {
    plane_of(indices.iter().map(|&i| &cloud[i]))
}

fn plane_of<'a, P, I>(points: I) -> Option<(Vector4<f32>, f32)>
where
    P: HasXyz + 'a,
    I: Iterator<Item = &'a P> + Clone,
{
    if points.clone().filter(|p| p.is_finite()).take(3).count() < 3 {
        return None;
    }
    let (centroid, covariance) = mean_and_covariance_of(points)?;
    let (lambda, normal) = smallest_eigenvector(&covariance);

    let d = -normal.dot(&centroid.xyz());
    let plane = Vector4::new(normal.x, normal.y, normal.z, d);

    let trace = covariance.trace();
    let curvature = if trace > 0.0 { (lambda / trace).abs() } else { 0.0 };
    Some((plane, curvature))
}

/// Flips `normal` so it points towards `viewpoint` as seen from `point`.
pub fn flip_normal_towards_viewpoint(
    point: &Vector4<f32>,
    viewpoint: &Vector4<f32>,
    normal: &mut Vector3<f32>,
) {
    let to_viewpoint = viewpoint.xyz() - point.xyz();
    if normal.dot(&to_viewpoint) < 0.0 {
        *normal = -*normal;
    }
}
