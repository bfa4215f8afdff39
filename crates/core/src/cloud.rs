//! The organized point cloud container.
//!
//! A [`PointCloud`] stores its points in one contiguous `Vec` and frames them
//! with `width` and `height`. When `height > 1` the points form a dense
//! row-major grid of `width x height` ("organized"); `height == 1` marks a
//! plain sequence and `height == 0` the empty cloud.
//!
//! Structural mutations (`insert`, `erase`, `push_back`, `resize`, ...) reset
//! the framing to `width = len(), height = 1`. The `transient_*` variants
//! mutate the storage but leave `width` and `height` alone, for callers that
//! temporarily break the grid and restore it themselves.

use std::ops::{Add, AddAssign, Bound, Index, IndexMut, RangeBounds};

use nalgebra::{UnitQuaternion, Vector4};

use crate::error::{CloudError, Result};
use crate::traits::HasXyz;
use crate::Aabb;

/// Acquisition metadata carried with a cloud.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub seq: u32,
    /// Acquisition time in microseconds.
    pub stamp: u64,
    pub frame_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud<P> {
    points: Vec<P>,
    pub width: usize,
    pub height: usize,
    /// True when every point is finite.
    pub is_dense: bool,
    pub header: Header,
    pub sensor_origin: Vector4<f32>,
    pub sensor_orientation: UnitQuaternion<f32>,
}

impl<P> PointCloud<P> {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            width: 0,
            height: 0,
            is_dense: true,
            header: Header::default(),
            sensor_origin: Vector4::zeros(),
            sensor_orientation: UnitQuaternion::identity(),
        }
    }

    /// Wraps `points` as an unorganized cloud.
    pub fn from_points(points: Vec<P>) -> Self {
        let mut cloud = Self::new();
        cloud.points = points;
        cloud.mark_unorganized();
        cloud
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_organized(&self) -> bool {
        self.height > 1
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// Mutable access to the point values. The slice cannot change length, so
    /// the framing is unaffected.
    pub fn points_mut(&mut self) -> &mut [P] {
        &mut self.points
    }

    pub fn into_points(self) -> Vec<P> {
        self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.points.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, P> {
        self.points.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&P> {
        self.points.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut P> {
        self.points.get_mut(index)
    }

    pub fn front(&self) -> Option<&P> {
        self.points.first()
    }

    pub fn back(&self) -> Option<&P> {
        self.points.last()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.points.reserve(additional);
    }

    /// Exchanges points, framing and metadata with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Element at column `col`, row `row` of an organized cloud.
    pub fn at(&self, col: usize, row: usize) -> Result<&P> {
        let index = self.grid_index(col, row)?;
        Ok(&self.points[index])
    }

    pub fn at_mut(&mut self, col: usize, row: usize) -> Result<&mut P> {
        let index = self.grid_index(col, row)?;
        Ok(&mut self.points[index])
    }

    fn grid_index(&self, col: usize, row: usize) -> Result<usize> {
        if !self.is_organized() {
            return Err(CloudError::Unorganized {
                width: self.width,
                height: self.height,
            });
        }
        let index = row
            .checked_mul(self.width)
            .and_then(|base| base.checked_add(col))
            .unwrap_or(usize::MAX);
        if col >= self.width || index >= self.points.len() {
            return Err(CloudError::InvalidPosition {
                position: index,
                len: self.points.len(),
            });
        }
        Ok(index)
    }

    fn mark_unorganized(&mut self) {
        self.width = self.points.len();
        self.height = 1;
    }

    /// Frames the current points as rows of `row_width`, falling back to a
    /// single row when the count does not divide evenly.
    fn frame_rows(&mut self, row_width: usize) {
        let count = self.points.len();
        if row_width > 0 && count % row_width == 0 {
            self.width = row_width;
            self.height = count / row_width;
        } else {
            log::warn!(
                "row width {row_width} does not divide {count} points; framing as a single row"
            );
            self.mark_unorganized();
        }
    }

    fn check_insert_position(&self, pos: usize) -> Result<()> {
        if pos > self.points.len() {
            return Err(CloudError::InvalidPosition {
                position: pos,
                len: self.points.len(),
            });
        }
        Ok(())
    }

    fn check_element_position(&self, pos: usize) -> Result<()> {
        if pos >= self.points.len() {
            return Err(CloudError::InvalidPosition {
                position: pos,
                len: self.points.len(),
            });
        }
        Ok(())
    }

    fn resolve_range<R: RangeBounds<usize>>(&self, range: R) -> Result<(usize, usize)> {
        let len = self.points.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        if start > end || end > len {
            return Err(CloudError::InvalidRange { start, end, len });
        }
        Ok((start, end))
    }

    /// Replaces the contents with the points of `iter` as a single row.
    pub fn assign_iter<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        self.points.clear();
        self.points.extend(iter);
        self.mark_unorganized();
    }

    /// Replaces the contents with the points of `iter`, framed as rows of
    /// `row_width` when the count allows it.
    pub fn assign_iter_with_width<I: IntoIterator<Item = P>>(&mut self, iter: I, row_width: usize) {
        self.points.clear();
        self.points.extend(iter);
        self.frame_rows(row_width);
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.width = 0;
        self.height = 0;
    }

    pub fn insert(&mut self, pos: usize, point: P) -> Result<()> {
        self.transient_insert(pos, point)?;
        self.mark_unorganized();
        Ok(())
    }

    pub fn erase(&mut self, pos: usize) -> Result<P> {
        let removed = self.transient_erase(pos)?;
        self.mark_unorganized();
        Ok(removed)
    }

    pub fn erase_range<R: RangeBounds<usize>>(&mut self, range: R) -> Result<()> {
        self.transient_erase_range(range)?;
        self.mark_unorganized();
        Ok(())
    }

    /// Builds a point from `args` at `pos`.
    pub fn emplace<A: Into<P>>(&mut self, pos: usize, args: A) -> Result<&mut P> {
        self.check_insert_position(pos)?;
        self.points.insert(pos, args.into());
        self.mark_unorganized();
        Ok(&mut self.points[pos])
    }

    pub fn push_back(&mut self, point: P) {
        self.points.push(point);
        self.mark_unorganized();
    }

    /// Appends a point built from `args` and returns it.
    pub fn emplace_back<A: Into<P>>(&mut self, args: A) -> &mut P {
        let index = self.points.len();
        self.points.push(args.into());
        self.mark_unorganized();
        &mut self.points[index]
    }

    pub fn transient_insert(&mut self, pos: usize, point: P) -> Result<()> {
        self.check_insert_position(pos)?;
        self.points.insert(pos, point);
        Ok(())
    }

    pub fn transient_erase(&mut self, pos: usize) -> Result<P> {
        self.check_element_position(pos)?;
        Ok(self.points.remove(pos))
    }

    pub fn transient_erase_range<R: RangeBounds<usize>>(&mut self, range: R) -> Result<()> {
        let (start, end) = self.resolve_range(range)?;
        self.points.drain(start..end);
        Ok(())
    }

    pub fn transient_emplace<A: Into<P>>(&mut self, pos: usize, args: A) -> Result<&mut P> {
        self.check_insert_position(pos)?;
        self.points.insert(pos, args.into());
        Ok(&mut self.points[pos])
    }

    pub fn transient_push_back(&mut self, point: P) {
        self.points.push(point);
    }

    pub fn transient_emplace_back<A: Into<P>>(&mut self, args: A) -> &mut P {
        let index = self.points.len();
        self.points.push(args.into());
        &mut self.points[index]
    }
}

impl<P: Clone> PointCloud<P> {
    /// An organized `width x height` cloud filled with `point`.
    pub fn with_grid(width: usize, height: usize, point: P) -> Self {
        let mut cloud = Self::new();
        cloud.assign_grid(width, height, point);
        cloud
    }

    pub fn assign(&mut self, count: usize, point: P) {
        self.points.clear();
        self.points.resize(count, point);
        self.mark_unorganized();
    }

    /// `count` copies of `point`, framed as rows of `row_width` when
    /// `row_width` divides `count`, otherwise as a single row.
    pub fn assign_with_width(&mut self, count: usize, point: P, row_width: usize) {
        self.points.clear();
        self.points.resize(count, point);
        self.frame_rows(row_width);
    }

    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn assign_grid(&mut self, width: usize, height: usize, point: P) {
        let count = grid_len(width, height);
        self.points.clear();
        self.points.resize(count, point);
        self.width = width;
        self.height = height;
    }

    pub fn assign_slice(&mut self, points: &[P]) {
        self.assign_iter(points.iter().cloned());
    }

    pub fn assign_slice_with_width(&mut self, points: &[P], row_width: usize) {
        self.assign_iter_with_width(points.iter().cloned(), row_width);
    }

    pub fn insert_n(&mut self, pos: usize, count: usize, point: P) -> Result<()> {
        self.transient_insert_n(pos, count, point)?;
        self.mark_unorganized();
        Ok(())
    }

    pub fn transient_insert_n(&mut self, pos: usize, count: usize, point: P) -> Result<()> {
        self.check_insert_position(pos)?;
        self.points.splice(pos..pos, std::iter::repeat_n(point, count));
        Ok(())
    }

    pub fn resize_with_point(&mut self, count: usize, point: P) {
        self.points.resize(count, point);
        self.mark_unorganized();
    }

    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`. The cloud is left
    /// untouched in that case.
    pub fn resize_grid_with_point(&mut self, width: usize, height: usize, point: P) {
        self.points.resize(grid_len(width, height), point);
        self.width = width;
        self.height = height;
    }

    /// Unorganized cloud holding the points at `indices`, in that order.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        let points = indices
            .iter()
            .map(|&idx| {
                assert!(idx < self.len(), "index out of bounds in select");
                self.points[idx].clone()
            })
            .collect();
        let mut out = Self::from_points(points);
        out.copy_metadata_from(self);
        out
    }

    /// Select all points NOT in the given index set.
    ///
    /// This is the complement of [`select`](Self::select) and preserves the
    /// relative order of the retained points.
    ///
    /// # Panics
    ///
    /// Panics if any index in `indices` is out of bounds.
    pub fn select_inverse(&self, indices: &[usize]) -> Self {
        let n = self.len();
        let mut exclude = vec![false; n];
        for &idx in indices {
            assert!(idx < n, "index out of bounds in select_inverse");
            exclude[idx] = true;
        }

        let kept: Vec<usize> = (0..n).filter(|&i| !exclude[i]).collect();
        self.select(&kept)
    }

    fn copy_metadata_from(&mut self, other: &Self) {
        self.is_dense = other.is_dense;
        self.header = other.header.clone();
        self.sensor_origin = other.sensor_origin;
        self.sensor_orientation = other.sensor_orientation;
    }

    /// Appends `src` to `dst`. The result is always a single row: two grids
    /// have no general way to compose into one.
    pub fn concatenate(dst: &mut Self, src: &Self) {
        dst.points.extend_from_slice(&src.points);
        dst.mark_unorganized();
        dst.is_dense = dst.is_dense && src.is_dense;
        dst.header.stamp = dst.header.stamp.max(src.header.stamp);
        log::debug!(
            "concatenated {} points, result holds {}",
            src.points.len(),
            dst.points.len()
        );
    }

    /// Writes `a` followed by `b` into `out`.
    pub fn concatenate_into(a: &Self, b: &Self, out: &mut Self) {
        *out = a.clone();
        Self::concatenate(out, b);
    }
}

impl<P: Clone + Default> PointCloud<P> {
    /// Truncates or extends with default points; the result is a single row.
    pub fn resize(&mut self, count: usize) {
        self.resize_with_point(count, P::default());
    }

    /// Resizes to `width * height` points and frames them as that grid.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn resize_grid(&mut self, width: usize, height: usize) {
        self.resize_grid_with_point(width, height, P::default());
    }
}

impl<P: HasXyz> PointCloud<P> {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.points.iter().map(|p| p.xyz()))
    }

    pub fn iter_xyz(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.points.iter().map(|p| p.xyz())
    }
}

impl<P> Default for PointCloud<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Index<usize> for PointCloud<P> {
    type Output = P;

    fn index(&self, index: usize) -> &P {
        &self.points[index]
    }
}

impl<P> IndexMut<usize> for PointCloud<P> {
    fn index_mut(&mut self, index: usize) -> &mut P {
        &mut self.points[index]
    }
}

impl<P> FromIterator<P> for PointCloud<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}

impl<P> Extend<P> for PointCloud<P> {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        self.points.extend(iter);
        self.mark_unorganized();
    }
}

impl<'a, P> IntoIterator for &'a PointCloud<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<P> IntoIterator for PointCloud<P> {
    type Item = P;
    type IntoIter = std::vec::IntoIter<P>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<P: Clone> AddAssign<&PointCloud<P>> for PointCloud<P> {
    fn add_assign(&mut self, rhs: &PointCloud<P>) {
        Self::concatenate(self, rhs);
    }
}

impl<P: Clone> AddAssign<PointCloud<P>> for PointCloud<P> {
    fn add_assign(&mut self, rhs: PointCloud<P>) {
        Self::concatenate(self, &rhs);
    }
}

impl<P: Clone> Add<&PointCloud<P>> for &PointCloud<P> {
    type Output = PointCloud<P>;

    fn add(self, rhs: &PointCloud<P>) -> PointCloud<P> {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl<P: Clone> Add<&PointCloud<P>> for PointCloud<P> {
    type Output = PointCloud<P>;

    fn add(mut self, rhs: &PointCloud<P>) -> PointCloud<P> {
        self += rhs;
        self
    }
}

impl<P: Clone> Add for PointCloud<P> {
    type Output = PointCloud<P>;

    fn add(mut self, rhs: PointCloud<P>) -> PointCloud<P> {
        self += &rhs;
        self
    }
}

fn grid_len(width: usize, height: usize) -> usize {
    match width.checked_mul(height) {
        Some(count) => count,
        None => panic!("grid of {width}x{height} points overflows usize"),
    }
}

#[cfg(test)]
mod tests {
    use super::{Header, PointCloud};
    use crate::error::CloudError;
    use crate::point::PointXYZ;
    use proptest::prelude::*;

    fn p(v: f32) -> PointXYZ {
        PointXYZ::new(v, v, v)
    }

    /// A cloud framed 640x480 with no points, as a grabber would leave it
    /// before filling.
    fn framed() -> PointCloud<PointXYZ> {
        let mut cloud = PointCloud::new();
        cloud.width = 640;
        cloud.height = 480;
        cloud
    }

    fn organized(count: usize, row_width: usize) -> PointCloud<PointXYZ> {
        let mut cloud = PointCloud::new();
        cloud.assign_iter_with_width(vec![p(1.0); count], row_width);
        assert!(cloud.is_organized());
        cloud
    }

    #[test]
    fn new_is_empty() {
        let cloud = PointCloud::<PointXYZ>::new();
        assert!(cloud.is_empty());
        assert_eq!(cloud.width, 0);
        assert_eq!(cloud.height, 0);
        assert!(!cloud.is_organized());
        assert!(cloud.is_dense);
    }

    #[test]
    fn height_decides_organization() {
        let mut cloud = framed();
        assert!(cloud.is_organized());
        cloud.height = 1;
        assert!(!cloud.is_organized());
    }

    #[test]
    fn clear_resets_framing() {
        let mut cloud = organized(16, 4);
        cloud.clear();
        assert!(cloud.is_empty());
        assert_eq!(cloud.width, 0);
        assert_eq!(cloud.height, 0);
    }

    #[test]
    fn insert_downgrades() {
        let mut cloud = framed();
        cloud.insert(cloud.len(), p(1.0)).unwrap();
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 1);

        let mut cloud = framed();
        cloud.insert_n(cloud.len(), 5, p(1.0)).unwrap();
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 5);
    }

    #[test]
    fn insert_keeps_order() {
        let mut cloud = PointCloud::from_points(vec![p(0.0), p(2.0)]);
        cloud.insert(1, p(1.0)).unwrap();
        cloud.insert_n(0, 2, p(-1.0)).unwrap();
        let xs: Vec<f32> = cloud.iter().map(|pt| pt.x).collect();
        assert_eq!(xs, vec![-1.0, -1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn erase_downgrades() {
        let mut cloud = framed();
        cloud.insert_n(0, 5, p(1.0)).unwrap();
        cloud.erase(cloud.len() - 1).unwrap();
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 4);

        let mut cloud = framed();
        cloud.insert_n(0, 5, p(1.0)).unwrap();
        cloud.erase_range(..).unwrap();
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 0);
    }

    #[test]
    fn emplace_downgrades() {
        let mut cloud = framed();
        let at = cloud.len();
        cloud.emplace(at, (1.0, 1.0, 1.0)).unwrap();
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 1);
    }

    #[test]
    fn emplace_back_returns_back() {
        let mut cloud = framed();
        let new_point: *const PointXYZ = cloud.emplace_back((1.0, 1.0, 1.0));
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 1);
        assert!(std::ptr::eq(new_point, cloud.back().unwrap()));
    }

    #[test]
    fn resize_flat_and_grid() {
        let mut cloud = framed();
        cloud.resize(640 * 360);
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 640 * 360);

        let mut cloud = framed();
        cloud.resize_grid(640, 480);
        assert!(cloud.is_organized());
        assert_eq!(cloud.width, 640);
        assert_eq!(cloud.height, 480);
        assert_eq!(cloud.len(), 640 * 480);

        let mut cloud = framed();
        cloud.resize_with_point(640 * 360, p(1.0));
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 640 * 360);

        let mut cloud = framed();
        cloud.resize_grid_with_point(640, 480, p(1.0));
        assert!(cloud.is_organized());
        assert_eq!(cloud.width, 640);
    }

    #[test]
    fn assign_variants() {
        let mut cloud = framed();
        cloud.assign(640 * 360, p(1.0));
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 640 * 360);

        let mut cloud = framed();
        cloud.assign_grid(640, 480, p(1.0));
        assert!(cloud.is_organized());
        assert_eq!(cloud.width, 640);

        let mut cloud = framed();
        cloud.assign_iter(vec![PointXYZ::new(2.0, 3.0, 4.0); 640 * 360]);
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 640 * 360);

        let mut cloud = framed();
        cloud.assign_iter_with_width(vec![PointXYZ::new(2.0, 3.0, 4.0); 640 * 360], 640);
        assert!(cloud.is_organized());
        assert_eq!(cloud.width, 640);
        assert_eq!(cloud.height, 360);
    }

    #[test]
    fn assign_with_non_dividing_width_falls_back() {
        let mut cloud = framed();
        cloud.assign_iter_with_width(vec![p(7.0); 640 * 480], 460);
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 640 * 480);

        let mut cloud = framed();
        cloud.assign_with_width(10, p(1.0), 0);
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 10);
    }

    #[test]
    fn assign_slices() {
        let q = PointXYZ::new(3.0, 4.0, 5.0);

        let mut cloud = framed();
        cloud.assign_slice(&[q, q, q]);
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 3);

        let mut cloud = framed();
        cloud.assign_slice_with_width(&[q, q, q, q], 2);
        assert!(cloud.is_organized());
        assert_eq!(cloud.width, 2);

        let mut cloud = framed();
        cloud.assign_slice_with_width(&[q, q, q], 6);
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 3);
    }

    #[test]
    fn push_back_downgrades() {
        let mut cloud = framed();
        cloud.push_back(PointXYZ::new(3.0, 4.0, 5.0));
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 1);

        let mut cloud = organized(80 * 80, 80);
        cloud.push_back(PointXYZ::new(3.0, 4.0, 5.0));
        assert!(!cloud.is_organized());
        assert_eq!(cloud.width, 80 * 80 + 1);
    }

    #[test]
    fn transient_mutations_keep_framing() {
        let mut cloud = organized(640 * 480, 640);
        cloud.transient_push_back(p(2.0));
        assert!(cloud.is_organized());
        assert_eq!(cloud.width, 640);
        assert_eq!(cloud.len(), 640 * 480 + 1);

        let mut cloud = organized(640 * 480, 640);
        let new_point: *const PointXYZ = cloud.transient_emplace_back((3.0, 3.0, 3.0));
        assert!(cloud.is_organized());
        assert_eq!(cloud.width, 640);
        assert_eq!(cloud.len(), 640 * 480 + 1);
        assert!(std::ptr::eq(new_point, cloud.back().unwrap()));

        let mut cloud = organized(640 * 480, 640);
        cloud.transient_insert(cloud.len(), p(1.0)).unwrap();
        assert!(cloud.is_organized());
        assert_eq!(cloud.len(), 640 * 480 + 1);
        assert_eq!(cloud.width, 640);

        let mut cloud = organized(640 * 480, 640);
        cloud.transient_insert_n(cloud.len(), 10, p(1.0)).unwrap();
        assert!(cloud.is_organized());
        assert_eq!(cloud.len(), 640 * 480 + 10);
        assert_eq!(cloud.width, 640);

        let mut cloud = organized(640 * 480, 640);
        let at = cloud.len();
        cloud.transient_emplace(at, (4.0, 4.0, 4.0)).unwrap();
        assert!(cloud.is_organized());
        assert_eq!(cloud.width, 640);
        assert_eq!(cloud.len(), 640 * 480 + 1);
    }

    #[test]
    fn transient_erase_keeps_framing() {
        let mut cloud = organized(640 * 480, 640);
        cloud.transient_erase(cloud.len() - 1).unwrap();
        assert!(cloud.is_organized());
        assert_eq!(cloud.width, 640);
        assert_eq!(cloud.len(), 640 * 480 - 1);

        let mut cloud = organized(640 * 480, 640);
        cloud.transient_erase_range(0..cloud.len()).unwrap();
        assert!(cloud.is_organized());
        assert_eq!(cloud.width, 640);
        assert_eq!(cloud.len(), 0);
    }

    #[test]
    fn invalid_positions_leave_cloud_untouched() {
        let mut cloud = organized(16, 4);
        let before = cloud.clone();

        assert_eq!(
            cloud.insert(17, p(0.0)),
            Err(CloudError::InvalidPosition {
                position: 17,
                len: 16
            })
        );
        assert!(cloud.erase(16).is_err());
        assert!(cloud.transient_erase(100).is_err());
        assert!(cloud.emplace(20, (0.0, 0.0, 0.0)).is_err());
        assert_eq!(
            cloud.erase_range(4..20),
            Err(CloudError::InvalidRange {
                start: 4,
                end: 20,
                len: 16
            })
        );
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = cloud.transient_erase_range(5..2);
        assert!(reversed.is_err());

        assert_eq!(cloud, before);
    }

    #[test]
    fn concatenate_is_unorganized() {
        let cloud = organized(640 * 480, 640);

        let mut first = PointCloud::new();
        PointCloud::concatenate(&mut first, &cloud);
        assert!(!first.is_organized());
        assert_eq!(first.width, 640 * 480);

        let mut out = PointCloud::new();
        PointCloud::concatenate_into(&first, &cloud, &mut out);
        assert!(!out.is_organized());
        assert_eq!(out.width, 640 * 480 * 2);

        let sum = &cloud + &first;
        assert!(!sum.is_organized());
        assert_eq!(sum.width, 640 * 480 * 2);

        let mut acc = PointCloud::new();
        acc += &cloud;
        assert!(!acc.is_organized());
        assert_eq!(acc.width, 640 * 480);
    }

    #[test]
    fn concatenate_organized_grids() {
        let mut cloud = framed();
        cloud.resize_grid_with_point(640, 480, p(1.0));
        let a = cloud.clone();
        let b = cloud.clone();
        assert!(a.is_organized());
        assert!(b.is_organized());
        let out = a + b;
        assert!(!out.is_organized());
        assert_eq!(out.width, 614_400);
    }

    #[test]
    fn concatenate_merges_metadata() {
        let mut a = PointCloud::from_points(vec![p(0.0)]);
        a.header = Header {
            seq: 1,
            stamp: 10,
            frame_id: "lidar".into(),
        };
        let mut b = PointCloud::from_points(vec![p(1.0)]);
        b.header.stamp = 25;
        b.is_dense = false;

        a += b;
        assert_eq!(a.header.stamp, 25);
        assert_eq!(a.header.frame_id, "lidar");
        assert!(!a.is_dense);
    }

    #[test]
    fn at_requires_organization() {
        let cloud = organized(640 * 480, 640);
        let mut flat = PointCloud::new();
        flat += &cloud;
        assert_eq!(
            flat.at(5, 5),
            Err(CloudError::Unorganized {
                width: 640 * 480,
                height: 1
            })
        );
    }

    #[test]
    fn at_last_cell_is_back() {
        let cloud = organized(640 * 480, 640);
        let point_at = cloud.at(cloud.width - 1, cloud.height - 1).unwrap();
        assert!(std::ptr::eq(point_at, cloud.back().unwrap()));
    }

    #[test]
    fn at_indexes_row_major() {
        let mut cloud = PointCloud::new();
        cloud.assign_iter_with_width((0..12).map(|i| p(i as f32)), 4);
        assert_eq!(cloud.at(1, 2).unwrap().x, 9.0);
        assert!(matches!(
            cloud.at(4, 0),
            Err(CloudError::InvalidPosition { .. })
        ));
        assert!(matches!(
            cloud.at(0, 3),
            Err(CloudError::InvalidPosition { .. })
        ));

        cloud.at_mut(3, 2).unwrap().x = 100.0;
        assert_eq!(cloud[11].x, 100.0);
    }

    #[test]
    fn select_and_inverse() {
        let cloud: PointCloud<PointXYZ> = (0..4).map(|i| p(i as f32)).collect();
        let selected = cloud.select(&[3, 1]);
        let xs: Vec<f32> = selected.iter().map(|pt| pt.x).collect();
        assert_eq!(xs, vec![3.0, 1.0]);
        assert_eq!(selected.width, 2);

        let inv = cloud.select_inverse(&[0, 2, 2]);
        let xs: Vec<f32> = inv.iter().map(|pt| pt.x).collect();
        assert_eq!(xs, vec![1.0, 3.0]);
    }

    #[test]
    #[should_panic]
    fn select_panics_out_of_range() {
        let cloud: PointCloud<PointXYZ> = (0..2).map(|i| p(i as f32)).collect();
        let _ = cloud.select(&[5]);
    }

    #[test]
    fn swap_exchanges_framing_and_metadata() {
        let mut a = organized(12, 4);
        a.header.seq = 7;
        let mut b = PointCloud::from_points(vec![p(2.0)]);
        a.swap(&mut b);
        assert_eq!((a.width, a.height, a.len()), (1, 1, 1));
        assert_eq!((b.width, b.height, b.len()), (4, 3, 12));
        assert_eq!(b.header.seq, 7);
        assert_eq!(a.header.seq, 0);
    }

    #[test]
    fn aabb_contains_all_points() {
        let cloud: PointCloud<PointXYZ> = vec![
            PointXYZ::new(-1.0, 3.0, 5.0),
            PointXYZ::new(2.0, -4.0, 6.0),
        ]
        .into_iter()
        .collect();
        let aabb = cloud.aabb();
        for pt in cloud.iter_xyz() {
            assert!(aabb.contains(&pt));
        }
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn resize_grid_rejects_overflowing_dimensions() {
        let mut cloud = PointCloud::<PointXYZ>::new();
        cloud.resize_grid(usize::MAX, 2);
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn with_grid_rejects_overflowing_dimensions() {
        let _ = PointCloud::with_grid(2, usize::MAX / 2 + 1, p(0.0));
    }

    proptest! {
        #[test]
        fn grid_resize_always_organizes(w in 1usize..64, h in 2usize..64) {
            let mut cloud = PointCloud::<PointXYZ>::new();
            cloud.resize_grid(w, h);
            prop_assert!(cloud.is_organized());
            prop_assert_eq!(cloud.len(), w * h);
            prop_assert_eq!(cloud.width, w);
            prop_assert_eq!(cloud.height, h);
        }

        #[test]
        fn structural_mutations_flatten(
            w in 1usize..32,
            h in 2usize..32,
            op in 0usize..5,
        ) {
            let mut cloud = PointCloud::<PointXYZ>::new();
            cloud.resize_grid(w, h);
            match op {
                0 => cloud.insert(0, p(1.0)).unwrap(),
                1 => { cloud.erase(0).unwrap(); }
                2 => cloud.push_back(p(1.0)),
                3 => { cloud.emplace_back((1.0, 2.0, 3.0)); }
                _ => cloud.resize(w * h / 2),
            }
            prop_assert!(!cloud.is_organized());
            prop_assert_eq!(cloud.width, cloud.len());
        }

        #[test]
        fn row_width_assign_divides(count in 0usize..400, row_width in 1usize..40) {
            let mut cloud = PointCloud::<PointXYZ>::new();
            cloud.assign_with_width(count, p(0.0), row_width);
            if count % row_width == 0 {
                prop_assert_eq!(cloud.width, row_width);
                prop_assert_eq!(cloud.height, count / row_width);
            } else {
                prop_assert_eq!(cloud.width, count);
                prop_assert_eq!(cloud.height, 1);
            }
        }

        #[test]
        fn transient_ops_never_touch_framing(
            w in 1usize..32,
            h in 2usize..32,
            extra in 0usize..20,
        ) {
            let mut cloud = PointCloud::<PointXYZ>::new();
            cloud.resize_grid(w, h);
            for _ in 0..extra {
                cloud.transient_push_back(p(0.0));
            }
            cloud.transient_erase(0).unwrap();
            prop_assert_eq!(cloud.width, w);
            prop_assert_eq!(cloud.height, h);
            prop_assert_eq!(cloud.len(), w * h + extra - 1);
        }

        #[test]
        fn concatenation_width_is_total(a in 0usize..200, b in 0usize..200) {
            let left = PointCloud::from_points(vec![p(0.0); a]);
            let right = PointCloud::from_points(vec![p(1.0); b]);
            let out = &left + &right;
            prop_assert!(!out.is_organized());
            prop_assert_eq!(out.width, a + b);
        }
    }
}
