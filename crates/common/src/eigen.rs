use nalgebra::{Matrix3, SymmetricEigen, Vector3};

/// Eigen decomposition of a symmetric 3x3 matrix.
///
/// Returns the eigenvalues in ascending order and the matching unit
/// eigenvectors as columns. Only the lower triangle of `mat` is read. The
/// matrix is scaled by its largest absolute coefficient before solving so
/// that covariance matrices of tiny or huge extent stay well conditioned.
pub fn eigen33(mat: &Matrix3<f32>) -> (Vector3<f32>, Matrix3<f32>) {
    if mat.iter().any(|v| !v.is_finite()) {
        return (Vector3::repeat(f32::NAN), Matrix3::repeat(f32::NAN));
    }
    let scale = mat.amax();
    if scale <= f32::MIN_POSITIVE {
        return (Vector3::zeros(), Matrix3::identity());
    }

    let scaled = mat.map(|v| (v / scale) as f64);
    let eig = SymmetricEigen::new(scaled);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));

    let values = Vector3::from_fn(|i, _| (eig.eigenvalues[order[i]] * scale as f64) as f32);
    let vectors = Matrix3::from_fn(|r, c| eig.eigenvectors[(r, order[c])] as f32);
    (values, vectors)
}

/// Smallest eigenvalue of a symmetric 3x3 matrix and its unit eigenvector.
///
/// Closed form: eigenvalues via Cardano's formula, the eigenvector as the
/// cross product of two rows of `A - λI`. This skips the iterative solver of
/// [`eigen33`] and is the hot path for plane fitting. Degenerate inputs (a
/// multiple of the identity) yield `+z`.
pub fn smallest_eigenvector(mat: &Matrix3<f32>) -> (f32, Vector3<f32>) {
    let scale = mat.amax();
    if mat.iter().any(|v| !v.is_finite()) || scale <= f32::MIN_POSITIVE {
        return (0.0, Vector3::z());
    }

    let a = mat.map(|v| (v / scale) as f64);
    let (lambda, [ex, ey, ez]) =
        smallest_eigenpair_3x3(a[(0, 0)], a[(1, 0)], a[(2, 0)], a[(1, 1)], a[(2, 1)], a[(2, 2)]);
    (
        (lambda * scale as f64) as f32,
        Vector3::new(ex as f32, ey as f32, ez as f32),
    )
}

/// The matrix is:
///   | a00  a01  a02 |
///   | a01  a11  a12 |
///   | a02  a12  a22 |
fn smallest_eigenpair_3x3(
    a00: f64,
    a01: f64,
    a02: f64,
    a11: f64,
    a12: f64,
    a22: f64,
) -> (f64, [f64; 3]) {
    // Characteristic equation: det(A - λI) = 0
    let m = (a00 + a11 + a22) / 3.0; // mean of diagonal (trace / 3)

    // Shift: B = A - mI
    let b00 = a00 - m;
    let b11 = a11 - m;
    let b22 = a22 - m;

    // q = det(B) / 2
    let q = (b00 * (b11 * b22 - a12 * a12) - a01 * (a01 * b22 - a12 * a02)
        + a02 * (a01 * a12 - b11 * a02))
        / 2.0;

    // p = sum of squares of B entries / 6
    let p = (b00 * b00 + b11 * b11 + b22 * b22 + 2.0 * (a01 * a01 + a02 * a02 + a12 * a12)) / 6.0;

    let pp = p.max(0.0); // guard against tiny negatives from floating point

    if pp < 1e-30 {
        // Scalar multiple of identity: every direction is an eigenvector
        return (m, [0.0, 0.0, 1.0]);
    }

    // phi = arccos(q / p^(3/2)) / 3
    let det_ratio = (q / (pp * pp.sqrt())).clamp(-1.0, 1.0);
    let phi = det_ratio.acos() / 3.0;

    // Smallest root of the three (phi + 2π/3 gives the minimum cosine)
    let lambda = m + 2.0 * pp.sqrt() * (phi + 2.0 * std::f64::consts::FRAC_PI_3).cos();

    let r00 = a00 - lambda;
    let r11 = a11 - lambda;
    let r22 = a22 - lambda;

    // (A - λI) has rank ≤ 2, so the cross product of two independent rows
    // spans its null space. Try each row pair in turn.
    let candidates = [
        [a01 * a12 - r11 * a02, a02 * a01 - a12 * r00, r00 * r11 - a01 * a01],
        [a01 * r22 - a12 * a02, a02 * a02 - r22 * r00, r00 * a12 - a01 * a02],
        [r11 * r22 - a12 * a12, a12 * a02 - r22 * a01, a01 * a12 - r11 * a02],
    ];

    for [ex, ey, ez] in candidates {
        let len2 = ex * ex + ey * ey + ez * ez;
        if len2 >= 1e-30 {
            let inv = 1.0 / len2.sqrt();
            return (lambda, [ex * inv, ey * inv, ez * inv]);
        }
    }

    (lambda, [0.0, 0.0, 1.0])
}
