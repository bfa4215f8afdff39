use bytemuck::Pod;
use nalgebra::{Vector3, Vector4};

use crate::fields::FieldDescriptor;

/// A fixed-layout point record with a static field table.
///
/// Implementors are `#[repr(C)]` plain-old-data, so the container can hand out
/// float views over its storage and the field registry can address fields by
/// byte offset.
pub trait PointType: Pod + Default + Send + Sync {
    const NAME: &'static str;
    const FIELDS: &'static [FieldDescriptor];

    /// Whether the geometric part of the point holds only finite values.
    fn is_finite(&self) -> bool {
        true
    }
}

/// Points whose first 16 bytes are `x, y, z, w`.
pub trait HasXyz: PointType {
    fn vector4_map(&self) -> &[f32; 4] {
        bytemuck::from_bytes(&bytemuck::bytes_of(self)[..16])
    }

    fn vector4_map_mut(&mut self) -> &mut [f32; 4] {
        bytemuck::from_bytes_mut(&mut bytemuck::bytes_of_mut(self)[..16])
    }

    fn vector3_map(&self) -> &[f32; 3] {
        bytemuck::from_bytes(&bytemuck::bytes_of(self)[..12])
    }

    fn vector3_map_mut(&mut self) -> &mut [f32; 3] {
        bytemuck::from_bytes_mut(&mut bytemuck::bytes_of_mut(self)[..12])
    }

    fn xyz(&self) -> [f32; 3] {
        *self.vector3_map()
    }

    fn vector4(&self) -> Vector4<f32> {
        Vector4::from(*self.vector4_map())
    }
}

/// Points carrying a 16-byte `normal_x, normal_y, normal_z, pad` block.
pub trait HasNormal: PointType {
    const NORMAL_OFFSET: usize;

    fn normal4_map(&self) -> &[f32; 4] {
        let start = Self::NORMAL_OFFSET;
        bytemuck::from_bytes(&bytemuck::bytes_of(self)[start..start + 16])
    }

    fn normal4_map_mut(&mut self) -> &mut [f32; 4] {
        let start = Self::NORMAL_OFFSET;
        bytemuck::from_bytes_mut(&mut bytemuck::bytes_of_mut(self)[start..start + 16])
    }

    fn normal3_map(&self) -> &[f32; 3] {
        let start = Self::NORMAL_OFFSET;
        bytemuck::from_bytes(&bytemuck::bytes_of(self)[start..start + 12])
    }

    fn normal3_map_mut(&mut self) -> &mut [f32; 3] {
        let start = Self::NORMAL_OFFSET;
        bytemuck::from_bytes_mut(&mut bytemuck::bytes_of_mut(self)[start..start + 12])
    }

    fn normal(&self) -> [f32; 3] {
        *self.normal3_map()
    }
}

/// Points carrying four packed colour bytes stored as `b, g, r, a`.
pub trait HasColor: PointType {
    const COLOR_OFFSET: usize;

    fn bgra_map(&self) -> &[u8; 4] {
        let start = Self::COLOR_OFFSET;
        bytemuck::from_bytes(&bytemuck::bytes_of(self)[start..start + 4])
    }

    fn bgra_map_mut(&mut self) -> &mut [u8; 4] {
        let start = Self::COLOR_OFFSET;
        bytemuck::from_bytes_mut(&mut bytemuck::bytes_of_mut(self)[start..start + 4])
    }

    fn color(&self) -> [u8; 3] {
        let [b, g, r, _] = *self.bgra_map();
        [r, g, b]
    }

    /// Packed `0xAARRGGBB`.
    fn rgba(&self) -> u32 {
        u32::from_le_bytes(*self.bgra_map())
    }

    fn set_rgba(&mut self, rgba: u32) {
        *self.bgra_map_mut() = rgba.to_le_bytes();
    }

    fn rgb_vector3i(&self) -> Vector3<i32> {
        let [b, g, r, _] = *self.bgra_map();
        Vector3::new(r as i32, g as i32, b as i32)
    }

    fn rgba_vector4i(&self) -> Vector4<i32> {
        let [b, g, r, a] = *self.bgra_map();
        Vector4::new(r as i32, g as i32, b as i32, a as i32)
    }
}

pub trait HasIntensity {
    fn intensity(&self) -> f32;
}

pub trait HasLabel {
    fn label(&self) -> u32;
}

pub trait HasCurvature {
    fn curvature(&self) -> f32;
}
