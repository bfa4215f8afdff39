pub mod bbox;
pub mod cloud;
pub mod cloud_view;
pub mod error;
pub mod fields;
pub mod point;
pub mod traits;

pub use bbox::Aabb;
pub use cloud::{Header, PointCloud};
pub use cloud_view::{MatrixView, StorageOrder};
pub use error::{CloudError, Result};
pub use fields::{
    copy_if_field_exists, find_field, has_all_fields, has_any_field, has_color, has_curvature,
    has_field, has_intensity, has_label, has_normal, has_xyz, is_same_point_type, read_field,
    set_if_field_exists, Datatype, Field, FieldDescriptor, FieldValue,
};
pub use point::{
    Normal, PointNormal, PointXY, PointXYZ, PointXYZI, PointXYZL, PointXYZRGB, PointXYZRGBA,
    PointXYZRGBNormal, Rgb,
};
pub use traits::{HasColor, HasCurvature, HasIntensity, HasLabel, HasNormal, HasXyz, PointType};
