use nalgebra::{Vector3, Vector4, Vector6};
use pointclouds_core::HasXyz;

/// Squared distance from `pt` to the infinite line through `line_pt` along
/// `line_dir`. Only the xyz parts are used; `line_dir` need not be unit length.
pub fn sqr_point_to_line_distance(
    pt: &Vector4<f32>,
    line_pt: &Vector4<f32>,
    line_dir: &Vector4<f32>,
) -> f32 {
    let dir = line_dir.xyz();
    let cross = dir.cross(&(line_pt.xyz() - pt.xyz()));
    cross.norm_squared() / dir.norm_squared()
}

/// Radius of the circle through three points, from Heron's formula for the
/// triangle area. Collinear points give an infinite radius.
pub fn circumcircle_radius<P: HasXyz>(pa: &P, pb: &P, pc: &P) -> f64 {
    let [p1, p2, p3] = [pa, pb, pc].map(|p| {
        let [x, y, z] = p.xyz();
        Vector3::new(x as f64, y as f64, z as f64)
    });

    let p2p1 = (p2 - p1).norm();
    let p3p2 = (p3 - p2).norm();
    let p1p3 = (p1 - p3).norm();

    let semiperimeter = (p2p1 + p3p2 + p1p3) / 2.0;
    let area = (semiperimeter
        * (semiperimeter - p2p1)
        * (semiperimeter - p3p2)
        * (semiperimeter - p1p3))
        .sqrt();

    (p2p1 * p3p2 * p1p3) / (4.0 * area)
}

/// Closest points between two lines, each given as
/// `[px, py, pz, dx, dy, dz]`.
///
/// Returns one point on each line; their separation is the shortest distance
/// between the lines. Near-parallel lines (cross term below `1e-5`) pin the
/// first line's point and project it onto the second. Both points have `w = 0`.
pub fn line_to_line_segment(
    line_a: &Vector6<f32>,
    line_b: &Vector6<f32>,
) -> (Vector4<f32>, Vector4<f32>) {
    let p1 = line_a.fixed_rows::<3>(0).into_owned();
    let u = line_a.fixed_rows::<3>(3).into_owned();
    let q1 = line_b.fixed_rows::<3>(0).into_owned();
    let v = line_b.fixed_rows::<3>(3).into_owned();

    // Second point on the first line
    let p2 = p1 + u;
    let w = p2 - q1;

    let a = u.dot(&u);
    let b = u.dot(&v);
    let c = v.dot(&v);
    let d = u.dot(&w);
    let e = v.dot(&w);
    let denominator = a * c - b * b;

    let (sc, tc) = if denominator < 1e-5 {
        (0.0, if b > c { d / b } else { e / c })
    } else {
        ((b * e - c * d) / denominator, (a * e - b * d) / denominator)
    };

    let on_a = p2 + sc * u;
    let on_b = q1 + tc * v;
    (on_a.push(0.0), on_b.push(0.0))
}
