use nalgebra::Vector4;

/// Axis-aligned bounds over the finite points fed to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
    empty: bool,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: [f32::INFINITY; 3],
            max: [f32::NEG_INFINITY; 3],
            empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn expand_with_point(&mut self, point: [f32; 3]) {
        if !point.iter().all(|v| v.is_finite()) {
            return;
        }

        if self.empty {
            self.min = point;
            self.max = point;
            self.empty = false;
            return;
        }

        for (axis, &val) in point.iter().enumerate() {
            self.min[axis] = self.min[axis].min(val);
            self.max[axis] = self.max[axis].max(val);
        }
    }

    /// Union of two boxes; an empty side leaves the other unchanged.
    pub fn merge(mut self, other: &Aabb) -> Self {
        if other.empty {
            return self;
        }
        self.expand_with_point(other.min);
        self.expand_with_point(other.max);
        self
    }

    pub fn contains(&self, point: &[f32; 3]) -> bool {
        if self.empty || !point.iter().all(|v| v.is_finite()) {
            return false;
        }

        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        points.into_iter().fold(Self::empty(), |mut aabb, p| {
            aabb.expand_with_point(p);
            aabb
        })
    }

    /// Lower corner as a homogeneous vector with `w = 0`.
    pub fn min_vector4(&self) -> Vector4<f32> {
        Vector4::new(self.min[0], self.min[1], self.min[2], 0.0)
    }

    /// Upper corner as a homogeneous vector with `w = 0`.
    pub fn max_vector4(&self) -> Vector4<f32> {
        Vector4::new(self.max[0], self.max[1], self.max[2], 0.0)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
