use crate::algorithms::matrix::InteractionTable;
use crate::error::{RecommendError, Result};
use ndarray::Axis;
use sprs::{CsMat, TriMat};

#[derive(Debug, Clone)]
pub struct ItemSimilarity {
    matrix: CsMat<f64>,
}

impl ItemSimilarity {
    pub fn dim(&self) -> usize {
        self.matrix.rows()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.matrix.rows(), self.matrix.cols())
    }

    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix.get(i, j).copied().unwrap_or(0.0)
    }

    pub fn row(&self, item: usize) -> Vec<(usize, f64)> {
        match self.matrix.outer_view(item) {
            Some(row) => row.iter().map(|(j, &value)| (j, value)).collect(),
            None => Vec::new(),
        }
    }

    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.dim()).all(|i| {
            self.row(i)
                .into_iter()
                .all(|(j, value)| (value - self.get(j, i)).abs() <= tolerance)
        })
    }
}

pub fn compute(table: &InteractionTable) -> Result<ItemSimilarity> {
    let (users, items) = table.scores().dim();

    // scale each column to a largest magnitude of 1 so norms cannot overflow
    let mut scores = table.scores().to_owned();
    for mut column in scores.axis_iter_mut(Axis(1)) {
        let max_abs = column.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if max_abs > 0.0 {
            column.mapv_inplace(|v| v / max_abs);
        }
    }

    let norms: Vec<f64> = (0..items)
        .map(|col| {
            let column = scores.column(col);
            column.dot(&column).sqrt()
        })
        .collect();

    // upper triangle only, mirrored
    let mut triplets = TriMat::new((items, items));

    for i in 0..items {
        if norms[i] == 0.0 {
            continue;
        }
        let left = scores.column(i);

        for j in i..items {
            if norms[j] == 0.0 {
                continue;
            }

            let value = left.dot(&scores.column(j)) / (norms[i] * norms[j]);
            if !value.is_finite() {
                return Err(RecommendError::Similarity {
                    items,
                    users,
                    reason: format!("non-finite similarity between item positions {} and {}", i, j),
                });
            }
            if value == 0.0 {
                continue;
            }

            triplets.add_triplet(i, j, value);
            if i != j {
                triplets.add_triplet(j, i, value);
            }
        }
    }

    let matrix: CsMat<f64> = triplets.to_csr();
    Ok(ItemSimilarity { matrix })
}
