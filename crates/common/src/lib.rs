#![forbid(unsafe_code)]

pub mod bounds;
pub mod covariance;
pub mod distances;
pub mod eigen;
pub mod intersections;

pub use bounds::{
    get_max_distance, get_max_distance_indices, get_min_max_3d, get_min_max_3d_indices,
};
pub use covariance::{
    compute_centroid, compute_centroid_indices, compute_mean_and_covariance,
    compute_mean_and_covariance_indices, compute_point_normal, compute_point_normal_indices,
    flip_normal_towards_viewpoint,
};
pub use distances::{circumcircle_radius, line_to_line_segment, sqr_point_to_line_distance};
pub use eigen::{eigen33, smallest_eigenvector};
pub use intersections::{
    line_with_line_intersection, line_with_line_intersection_eps, DEFAULT_SQR_EPS,
};
