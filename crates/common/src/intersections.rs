use nalgebra::{Vector4, Vector6};

use crate::distances::line_to_line_segment;

/// Squared distance below which two lines are considered to intersect.
pub const DEFAULT_SQR_EPS: f64 = 1e-4;

/// Intersection point of two lines given as `[px, py, pz, dx, dy, dz]`, or
/// `None` when their closest points are farther apart than
/// [`DEFAULT_SQR_EPS`] allows.
pub fn line_with_line_intersection(
    line_a: &Vector6<f32>,
    line_b: &Vector6<f32>,
) -> Option<Vector4<f32>> {
    line_with_line_intersection_eps(line_a, line_b, DEFAULT_SQR_EPS)
}

/// Like [`line_with_line_intersection`] with an explicit squared tolerance.
/// The returned point lies on `line_a` and has `w = 0`.
pub fn line_with_line_intersection_eps(
    line_a: &Vector6<f32>,
    line_b: &Vector6<f32>,
    sqr_eps: f64,
) -> Option<Vector4<f32>> {
    let (on_a, on_b) = line_to_line_segment(line_a, line_b);

    let sqr_dist = (on_a - on_b).norm_squared() as f64;
    if sqr_dist < sqr_eps {
        Some(on_a)
    } else {
        log::trace!("lines miss each other: squared distance {sqr_dist} >= {sqr_eps}");
        None
    }
}
