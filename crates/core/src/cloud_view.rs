use std::mem::size_of;
use std::ops::Index;

use bytemuck::Pod;
use nalgebra::DMatrix;

use crate::error::{CloudError, Result};
use crate::PointCloud;

/// How field/point indices map onto matrix rows and columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageOrder {
    /// One column per point, one row per field: `dim x len`.
    #[default]
    ColumnMajor,
    /// One row per point, one column per field: `len x dim`.
    RowMajor,
}

/// Zero-copy matrix view over `dim` consecutive floats of every point.
///
/// Field `i` of point `j` lives at `data[offset + j * stride + i]`. The view
/// borrows the cloud, so the cloud cannot be resized while it is alive.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    data: &'a [f32],
    num_points: usize,
    dim: usize,
    stride: usize,
    offset: usize,
    order: StorageOrder,
}

impl<'a> MatrixView<'a> {
    pub fn new(
        data: &'a [f32],
        num_points: usize,
        dim: usize,
        stride: usize,
        offset: usize,
        order: StorageOrder,
    ) -> Result<Self> {
        if dim == 0 || stride == 0 {
            return Err(CloudError::InvalidView {
                reason: format!("dim ({dim}) and stride ({stride}) must be non-zero"),
            });
        }
        if num_points > 0 {
            let end = (num_points - 1)
                .checked_mul(stride)
                .and_then(|v| v.checked_add(offset))
                .and_then(|v| v.checked_add(dim));
            match end {
                Some(end) if end <= data.len() => {}
                _ => {
                    return Err(CloudError::InvalidView {
                        reason: format!(
                            "{num_points} points of stride {stride} from offset {offset} \
                             with {dim} fields exceed {} floats of storage",
                            data.len()
                        ),
                    })
                }
            }
        }
        Ok(Self {
            data,
            num_points,
            dim,
            stride,
            offset,
            order,
        })
    }

    pub fn len(&self) -> usize {
        self.num_points
    }

    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn order(&self) -> StorageOrder {
        self.order
    }

    pub fn nrows(&self) -> usize {
        match self.order {
            StorageOrder::ColumnMajor => self.dim,
            StorageOrder::RowMajor => self.num_points,
        }
    }

    pub fn ncols(&self) -> usize {
        match self.order {
            StorageOrder::ColumnMajor => self.num_points,
            StorageOrder::RowMajor => self.dim,
        }
    }

    fn flat_index(&self, row: usize, col: usize) -> Option<usize> {
        let (field, point) = match self.order {
            StorageOrder::ColumnMajor => (row, col),
            StorageOrder::RowMajor => (col, row),
        };
        (field < self.dim && point < self.num_points)
            .then(|| self.offset + point * self.stride + field)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.flat_index(row, col).map(|i| self.data[i])
    }

    /// The `dim` viewed floats of point `i`.
    pub fn point(&self, i: usize) -> &'a [f32] {
        assert!(i < self.num_points, "index out of bounds");
        let base = self.offset + i * self.stride;
        &self.data[base..base + self.dim]
    }

    pub fn iter_points(&self) -> impl Iterator<Item = &'a [f32]> + '_ {
        (0..self.num_points).map(move |i| self.point(i))
    }

    /// Copies the view into an owned matrix of the same shape.
    pub fn to_matrix(&self) -> DMatrix<f32> {
        DMatrix::from_fn(self.nrows(), self.ncols(), |r, c| self[(r, c)])
    }
}

impl Index<(usize, usize)> for MatrixView<'_> {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        match self.flat_index(row, col) {
            Some(i) => &self.data[i],
            None => panic!(
                "index ({row}, {col}) out of bounds for a {}x{} view",
                self.nrows(),
                self.ncols()
            ),
        }
    }
}

impl<P: Pod> PointCloud<P> {
    /// Views `dim` floats of each point, starting `offset` floats into the
    /// point and advancing `stride` floats per point.
    pub fn matrix_map(
        &self,
        dim: usize,
        stride: usize,
        offset: usize,
        order: StorageOrder,
    ) -> Result<MatrixView<'_>> {
        let data: &[f32] = bytemuck::try_cast_slice(self.points()).map_err(CloudError::PodCast)?;
        MatrixView::new(data, self.len(), dim, stride, offset, order)
    }

    /// Views every float of every point, column-major.
    pub fn matrix_map_default(&self) -> Result<MatrixView<'_>> {
        let floats = size_of::<P>() / size_of::<f32>();
        self.matrix_map(floats, floats, 0, StorageOrder::ColumnMajor)
    }
}
