use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};

use crate::fields::{Datatype, Field, FieldDescriptor};
use crate::traits::{HasColor, HasCurvature, HasIntensity, HasLabel, HasNormal, HasXyz, PointType};

fn finite3(v: [f32; 3]) -> bool {
    v.iter().all(|c| c.is_finite())
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointXY {
    pub x: f32,
    pub y: f32,
}

impl PointXY {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl PointType for PointXY {
    const NAME: &'static str = "PointXY";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new(Field::X, offset_of!(PointXY, x), Datatype::F32),
        FieldDescriptor::new(Field::Y, offset_of!(PointXY, y), Datatype::F32),
    ];

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// `w` is the homogeneous coordinate and defaults to `1.0`.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointXYZ {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl PointXYZ {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }
}

impl Default for PointXYZ {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl PointType for PointXYZ {
    const NAME: &'static str = "PointXYZ";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new(Field::X, offset_of!(PointXYZ, x), Datatype::F32),
        FieldDescriptor::new(Field::Y, offset_of!(PointXYZ, y), Datatype::F32),
        FieldDescriptor::new(Field::Z, offset_of!(PointXYZ, z), Datatype::F32),
    ];

    fn is_finite(&self) -> bool {
        finite3(self.xyz())
    }
}

impl HasXyz for PointXYZ {}

#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointXYZI {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
    pub intensity: f32,
    _pad: [f32; 3],
}

impl PointXYZI {
    pub fn new(x: f32, y: f32, z: f32, intensity: f32) -> Self {
        Self {
            x,
            y,
            z,
            w: 1.0,
            intensity,
            _pad: [0.0; 3],
        }
    }
}

impl Default for PointXYZI {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl PointType for PointXYZI {
    const NAME: &'static str = "PointXYZI";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new(Field::X, offset_of!(PointXYZI, x), Datatype::F32),
        FieldDescriptor::new(Field::Y, offset_of!(PointXYZI, y), Datatype::F32),
        FieldDescriptor::new(Field::Z, offset_of!(PointXYZI, z), Datatype::F32),
        FieldDescriptor::new(
            Field::Intensity,
            offset_of!(PointXYZI, intensity),
            Datatype::F32,
        ),
    ];

    fn is_finite(&self) -> bool {
        finite3(self.xyz())
    }
}

impl HasXyz for PointXYZI {}

impl HasIntensity for PointXYZI {
    fn intensity(&self) -> f32 {
        self.intensity
    }
}

#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointXYZL {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
    pub label: u32,
    _pad: [u32; 3],
}

impl PointXYZL {
    pub fn new(x: f32, y: f32, z: f32, label: u32) -> Self {
        Self {
            x,
            y,
            z,
            w: 1.0,
            label,
            _pad: [0; 3],
        }
    }
}

impl Default for PointXYZL {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0)
    }
}

impl PointType for PointXYZL {
    const NAME: &'static str = "PointXYZL";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new(Field::X, offset_of!(PointXYZL, x), Datatype::F32),
        FieldDescriptor::new(Field::Y, offset_of!(PointXYZL, y), Datatype::F32),
        FieldDescriptor::new(Field::Z, offset_of!(PointXYZL, z), Datatype::F32),
        FieldDescriptor::new(Field::Label, offset_of!(PointXYZL, label), Datatype::U32),
    ];

    fn is_finite(&self) -> bool {
        finite3(self.xyz())
    }
}

impl HasXyz for PointXYZL {}

impl HasLabel for PointXYZL {
    fn label(&self) -> u32 {
        self.label
    }
}

/// Colour bytes are laid out `b, g, r, a` so that the packed value reads
/// `0xAARRGGBB` on little-endian targets. Alpha defaults to 255.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointXYZRGB {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
    _pad: [f32; 3],
}

impl PointXYZRGB {
    pub fn new(x: f32, y: f32, z: f32, r: u8, g: u8, b: u8) -> Self {
        Self {
            x,
            y,
            z,
            w: 1.0,
            b,
            g,
            r,
            a: 255,
            _pad: [0.0; 3],
        }
    }
}

impl Default for PointXYZRGB {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0, 0, 0)
    }
}

impl PointType for PointXYZRGB {
    const NAME: &'static str = "PointXYZRGB";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new(Field::X, offset_of!(PointXYZRGB, x), Datatype::F32),
        FieldDescriptor::new(Field::Y, offset_of!(PointXYZRGB, y), Datatype::F32),
        FieldDescriptor::new(Field::Z, offset_of!(PointXYZRGB, z), Datatype::F32),
        FieldDescriptor::new(Field::Rgb, offset_of!(PointXYZRGB, b), Datatype::F32),
    ];

    fn is_finite(&self) -> bool {
        finite3(self.xyz())
    }
}

impl HasXyz for PointXYZRGB {}

impl HasColor for PointXYZRGB {
    const COLOR_OFFSET: usize = offset_of!(PointXYZRGB, b);
}

#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointXYZRGBA {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
    _pad: [f32; 3],
}

impl PointXYZRGBA {
    pub fn new(x: f32, y: f32, z: f32, r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            x,
            y,
            z,
            w: 1.0,
            b,
            g,
            r,
            a,
            _pad: [0.0; 3],
        }
    }
}

impl Default for PointXYZRGBA {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0, 0, 0, 255)
    }
}

impl PointType for PointXYZRGBA {
    const NAME: &'static str = "PointXYZRGBA";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new(Field::X, offset_of!(PointXYZRGBA, x), Datatype::F32),
        FieldDescriptor::new(Field::Y, offset_of!(PointXYZRGBA, y), Datatype::F32),
        FieldDescriptor::new(Field::Z, offset_of!(PointXYZRGBA, z), Datatype::F32),
        FieldDescriptor::new(Field::Rgba, offset_of!(PointXYZRGBA, b), Datatype::U32),
    ];

    fn is_finite(&self) -> bool {
        finite3(self.xyz())
    }
}

impl HasXyz for PointXYZRGBA {}

impl HasColor for PointXYZRGBA {
    const COLOR_OFFSET: usize = offset_of!(PointXYZRGBA, b);
}

/// A bare colour record.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgb {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { b, g, r, a: 255 }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl PointType for Rgb {
    const NAME: &'static str = "RGB";
    const FIELDS: &'static [FieldDescriptor] = &[FieldDescriptor::new(
        Field::Rgba,
        offset_of!(Rgb, b),
        Datatype::U32,
    )];
}

impl HasColor for Rgb {
    const COLOR_OFFSET: usize = 0;
}

#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Normal {
    pub normal_x: f32,
    pub normal_y: f32,
    pub normal_z: f32,
    _normal_pad: f32,
    pub curvature: f32,
    _pad: [f32; 3],
}

impl Normal {
    pub fn new(normal_x: f32, normal_y: f32, normal_z: f32, curvature: f32) -> Self {
        Self {
            normal_x,
            normal_y,
            normal_z,
            curvature,
            ..Self::default()
        }
    }
}

impl PointType for Normal {
    const NAME: &'static str = "Normal";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new(Field::NormalX, offset_of!(Normal, normal_x), Datatype::F32),
        FieldDescriptor::new(Field::NormalY, offset_of!(Normal, normal_y), Datatype::F32),
        FieldDescriptor::new(Field::NormalZ, offset_of!(Normal, normal_z), Datatype::F32),
        FieldDescriptor::new(
            Field::Curvature,
            offset_of!(Normal, curvature),
            Datatype::F32,
        ),
    ];

    fn is_finite(&self) -> bool {
        finite3(self.normal())
    }
}

impl HasNormal for Normal {
    const NORMAL_OFFSET: usize = offset_of!(Normal, normal_x);
}

impl HasCurvature for Normal {
    fn curvature(&self) -> f32 {
        self.curvature
    }
}

#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointNormal {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
    pub normal_x: f32,
    pub normal_y: f32,
    pub normal_z: f32,
    _normal_pad: f32,
    pub curvature: f32,
    _pad: [f32; 3],
}

impl PointNormal {
    pub fn new(xyz: [f32; 3], normal: [f32; 3], curvature: f32) -> Self {
        let [x, y, z] = xyz;
        let [normal_x, normal_y, normal_z] = normal;
        Self {
            x,
            y,
            z,
            w: 1.0,
            normal_x,
            normal_y,
            normal_z,
            _normal_pad: 0.0,
            curvature,
            _pad: [0.0; 3],
        }
    }
}

impl Default for PointNormal {
    fn default() -> Self {
        Self::new([0.0; 3], [0.0; 3], 0.0)
    }
}

impl PointType for PointNormal {
    const NAME: &'static str = "PointNormal";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new(Field::X, offset_of!(PointNormal, x), Datatype::F32),
        FieldDescriptor::new(Field::Y, offset_of!(PointNormal, y), Datatype::F32),
        FieldDescriptor::new(Field::Z, offset_of!(PointNormal, z), Datatype::F32),
        FieldDescriptor::new(
            Field::NormalX,
            offset_of!(PointNormal, normal_x),
            Datatype::F32,
        ),
        FieldDescriptor::new(
            Field::NormalY,
            offset_of!(PointNormal, normal_y),
            Datatype::F32,
        ),
        FieldDescriptor::new(
            Field::NormalZ,
            offset_of!(PointNormal, normal_z),
            Datatype::F32,
        ),
        FieldDescriptor::new(
            Field::Curvature,
            offset_of!(PointNormal, curvature),
            Datatype::F32,
        ),
    ];

    fn is_finite(&self) -> bool {
        finite3(self.xyz())
    }
}

impl HasXyz for PointNormal {}

impl HasNormal for PointNormal {
    const NORMAL_OFFSET: usize = offset_of!(PointNormal, normal_x);
}

impl HasCurvature for PointNormal {
    fn curvature(&self) -> f32 {
        self.curvature
    }
}

#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointXYZRGBNormal {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
    pub normal_x: f32,
    pub normal_y: f32,
    pub normal_z: f32,
    _normal_pad: f32,
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
    pub curvature: f32,
    _pad: [f32; 2],
}

impl PointXYZRGBNormal {
    pub fn new(xyz: [f32; 3], rgb: [u8; 3], normal: [f32; 3], curvature: f32) -> Self {
        let [x, y, z] = xyz;
        let [r, g, b] = rgb;
        let [normal_x, normal_y, normal_z] = normal;
        Self {
            x,
            y,
            z,
            w: 1.0,
            normal_x,
            normal_y,
            normal_z,
            _normal_pad: 0.0,
            b,
            g,
            r,
            a: 255,
            curvature,
            _pad: [0.0; 2],
        }
    }
}

impl Default for PointXYZRGBNormal {
    fn default() -> Self {
        Self::new([0.0; 3], [0; 3], [0.0; 3], 0.0)
    }
}

impl PointType for PointXYZRGBNormal {
    const NAME: &'static str = "PointXYZRGBNormal";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new(Field::X, offset_of!(PointXYZRGBNormal, x), Datatype::F32),
        FieldDescriptor::new(Field::Y, offset_of!(PointXYZRGBNormal, y), Datatype::F32),
        FieldDescriptor::new(Field::Z, offset_of!(PointXYZRGBNormal, z), Datatype::F32),
        FieldDescriptor::new(Field::Rgb, offset_of!(PointXYZRGBNormal, b), Datatype::F32),
        FieldDescriptor::new(
            Field::NormalX,
            offset_of!(PointXYZRGBNormal, normal_x),
            Datatype::F32,
        ),
        FieldDescriptor::new(
            Field::NormalY,
            offset_of!(PointXYZRGBNormal, normal_y),
            Datatype::F32,
        ),
        FieldDescriptor::new(
            Field::NormalZ,
            offset_of!(PointXYZRGBNormal, normal_z),
            Datatype::F32,
        ),
        FieldDescriptor::new(
            Field::Curvature,
            offset_of!(PointXYZRGBNormal, curvature),
            Datatype::F32,
        ),
    ];

    fn is_finite(&self) -> bool {
        finite3(self.xyz())
    }
}

impl HasXyz for PointXYZRGBNormal {}

impl HasNormal for PointXYZRGBNormal {
    const NORMAL_OFFSET: usize = offset_of!(PointXYZRGBNormal, normal_x);
}

impl HasColor for PointXYZRGBNormal {
    const COLOR_OFFSET: usize = offset_of!(PointXYZRGBNormal, b);
}

impl HasCurvature for PointXYZRGBNormal {
    fn curvature(&self) -> f32 {
        self.curvature
    }
}

macro_rules! impl_from_xyz {
    ($($point:ty),* $(,)?) => {
        $(
            impl From<[f32; 3]> for $point {
                fn from([x, y, z]: [f32; 3]) -> Self {
                    let mut p = <$point>::default();
                    *p.vector3_map_mut() = [x, y, z];
                    p
                }
            }

            impl From<(f32, f32, f32)> for $point {
                fn from((x, y, z): (f32, f32, f32)) -> Self {
                    Self::from([x, y, z])
                }
            }
        )*
    };
}

impl_from_xyz!(
    PointXYZ,
    PointXYZI,
    PointXYZL,
    PointXYZRGB,
    PointXYZRGBA,
    PointNormal,
    PointXYZRGBNormal,
);
