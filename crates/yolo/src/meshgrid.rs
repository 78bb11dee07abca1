use ndarray::{Array, Array1, Array3, ArrayD, Axis, IxDyn, stack};

use itertools::Itertools;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indexing {
    Xy,
    Ij,
}

/// Returns coordinate grids from the coordinate vectors in `xi`, like numpy's `meshgrid`.
///
/// With [`Indexing::Xy`] the first two axes of each grid are swapped, so for two inputs of
/// lengths `n` and `m` the grids have shape `(m, n)`.
pub fn meshgrid<T>(xi: &[Array1<T>], indexing: Indexing) -> Result<Vec<ArrayD<T>>>
where
    T: Copy,
{
    let ndim = xi.len();
    let product = xi.iter().map(|x| x.iter()).multi_cartesian_product();
    let grid_shape = xi.iter().map(Array1::len).collect_vec();

    let mut grids: Vec<ArrayD<T>> = Vec::with_capacity(ndim);

    for dim_index in 0..ndim {
        let values: Vec<T> = product.clone().map(|p| *p[dim_index]).collect();
        grids.push(Array::from_shape_vec(IxDyn(&grid_shape), values)?);
    }

    if indexing == Indexing::Xy && ndim > 1 {
        for grid in &mut grids {
            grid.swap_axes(0, 1);
        }
    }

    Ok(grids)
}

/// Creates the grid cell offsets for a detection scale with `(rows, cols)` cells.
///
/// The result has shape `(rows, cols, 2)`, where `grid[[row, col]]` is `[col, row]`.
pub fn cell_grid((rows, cols): (usize, usize)) -> Result<Array3<f32>> {
    let cell_x = Array::range(0.0, cols as f32, 1.0);
    let cell_y = Array::range(0.0, rows as f32, 1.0);

    let grids = meshgrid(&[cell_x, cell_y], Indexing::Xy)?;
    let grid = stack(Axis(2), &[grids[0].view(), grids[1].view()])?;

    Ok(grid.into_dimensionality()?)
}
