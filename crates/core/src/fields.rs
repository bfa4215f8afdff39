//! Static field registry for point types.
//!
//! Every [`PointType`] publishes a table of `(field, byte offset, datatype)`
//! descriptors. The capability queries below (`has_xyz`, `has_color`, ...) and
//! the by-name accessors ([`copy_if_field_exists`], [`set_if_field_exists`])
//! read that table; nothing here inspects values beyond the described bytes.

use num_traits::{NumCast, ToPrimitive};

use crate::traits::PointType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    X,
    Y,
    Z,
    NormalX,
    NormalY,
    NormalZ,
    Curvature,
    /// Packed colour stored as a float.
    Rgb,
    /// Packed colour stored as an unsigned integer.
    Rgba,
    Intensity,
    Label,
}

impl Field {
    pub const fn name(self) -> &'static str {
        match self {
            Field::X => "x",
            Field::Y => "y",
            Field::Z => "z",
            Field::NormalX => "normal_x",
            Field::NormalY => "normal_y",
            Field::NormalZ => "normal_z",
            Field::Curvature => "curvature",
            Field::Rgb => "rgb",
            Field::Rgba => "rgba",
            Field::Intensity => "intensity",
            Field::Label => "label",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    U8,
    U32,
    F32,
}

impl Datatype {
    pub const fn size(self) -> usize {
        match self {
            Datatype::U8 => 1,
            Datatype::U32 | Datatype::F32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub field: Field,
    pub offset: usize,
    pub datatype: Datatype,
}

impl FieldDescriptor {
    pub const fn new(field: Field, offset: usize, datatype: Datatype) -> Self {
        Self {
            field,
            offset,
            datatype,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.field.name()
    }
}

/// A raw field value as stored in the point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    U8(u8),
    U32(u32),
    F32(f32),
}

impl FieldValue {
    fn cast<T: NumCast>(self) -> Option<T> {
        match self {
            FieldValue::U8(v) => <T as NumCast>::from(v),
            FieldValue::U32(v) => <T as NumCast>::from(v),
            FieldValue::F32(v) => <T as NumCast>::from(v),
        }
    }
}

pub fn has_field<P: PointType>(field: Field) -> bool {
    P::FIELDS.iter().any(|desc| desc.field == field)
}

pub fn has_all_fields<P: PointType>(fields: &[Field]) -> bool {
    fields.iter().all(|&field| has_field::<P>(field))
}

pub fn has_any_field<P: PointType>(fields: &[Field]) -> bool {
    fields.iter().any(|&field| has_field::<P>(field))
}

pub fn has_xyz<P: PointType>() -> bool {
    has_all_fields::<P>(&[Field::X, Field::Y, Field::Z])
}

pub fn has_normal<P: PointType>() -> bool {
    has_all_fields::<P>(&[Field::NormalX, Field::NormalY, Field::NormalZ])
}

pub fn has_curvature<P: PointType>() -> bool {
    has_field::<P>(Field::Curvature)
}

pub fn has_intensity<P: PointType>() -> bool {
    has_field::<P>(Field::Intensity)
}

pub fn has_color<P: PointType>() -> bool {
    has_any_field::<P>(&[Field::Rgb, Field::Rgba])
}

pub fn has_label<P: PointType>() -> bool {
    has_field::<P>(Field::Label)
}

/// Two point types are the same when their field tables list the same
/// fields with the same datatypes, in order. `rgb` and `rgba` are distinct.
pub fn is_same_point_type<A: PointType, B: PointType>() -> bool {
    A::FIELDS.len() == B::FIELDS.len()
        && A::FIELDS
            .iter()
            .zip(B::FIELDS)
            .all(|(a, b)| a.field == b.field && a.datatype == b.datatype)
}

pub fn find_field<P: PointType>(name: &str) -> Option<&'static FieldDescriptor> {
    P::FIELDS.iter().find(|desc| desc.name() == name)
}

pub fn read_field<P: PointType>(point: &P, desc: &FieldDescriptor) -> FieldValue {
    let bytes = &bytemuck::bytes_of(point)[desc.offset..desc.offset + desc.datatype.size()];
    match desc.datatype {
        Datatype::U8 => FieldValue::U8(bytes[0]),
        Datatype::U32 => FieldValue::U32(bytemuck::pod_read_unaligned(bytes)),
        Datatype::F32 => FieldValue::F32(bytemuck::pod_read_unaligned(bytes)),
    }
}

/// Reads the field called `name` and casts it to `T`.
///
/// Returns `None` when the point type has no such field or the stored value
/// does not fit in `T`.
pub fn copy_if_field_exists<P: PointType, T: NumCast>(point: &P, name: &str) -> Option<T> {
    let desc = find_field::<P>(name)?;
    read_field(point, desc).cast()
}

/// Writes `value` into the field called `name`, converted to the field's
/// datatype. Returns `false` when the field is absent or the value does not
/// fit.
pub fn set_if_field_exists<P: PointType, T: ToPrimitive>(
    point: &mut P,
    name: &str,
    value: T,
) -> bool {
    let Some(desc) = find_field::<P>(name) else {
        return false;
    };
    let range = desc.offset..desc.offset + desc.datatype.size();
    let bytes = &mut bytemuck::bytes_of_mut(point)[range];
    match desc.datatype {
        Datatype::U8 => match value.to_u8() {
            Some(v) => bytes[0] = v,
            None => return false,
        },
        Datatype::U32 => match value.to_u32() {
            Some(v) => bytes.copy_from_slice(&v.to_ne_bytes()),
            None => return false,
        },
        Datatype::F32 => match value.to_f32() {
            Some(v) => bytes.copy_from_slice(&v.to_ne_bytes()),
            None => return false,
        },
    }
    true
}
