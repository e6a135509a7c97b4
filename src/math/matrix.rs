use rand::Rng;
use serde::{Serialize, Deserialize};
use std::ops::{Sub, Mul};

/// Row-major dense matrix. A minibatch is stored one record per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Samples every entry from U(-scale, scale).
    ///
    /// The caller owns the generator, so two matrices drawn from generators
    /// seeded identically are identical.
    pub fn uniform<R: Rng>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen_range(-scale..=scale);
            }
        }

        res
    }

    pub fn row_vector(values: &[f64]) -> Matrix {
        Matrix::from_data(vec![values.to_vec()])
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.rows, other.rows, "hadamard: row count differs");
        assert_eq!(self.cols, other.cols, "hadamard: column count differs");
        let data = self.data.iter().zip(other.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect()
            })
            .collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    /// Mean of every column, as a 1×cols matrix. Used to average per-record
    /// bias gradients over a batch.
    pub fn column_means(&self) -> Matrix {
        let mut res = Matrix::zeros(1, self.cols);
        if self.rows == 0 {
            return res;
        }
        for row in &self.data {
            for (acc, x) in res.data[0].iter_mut().zip(row.iter()) {
                *acc += x;
            }
        }
        let inv = 1.0 / self.rows as f64;
        res.map(|x| x * inv)
    }

    /// Adds a 1×cols row to every row of `self`.
    pub fn add_row(&self, row: &Matrix) -> Matrix {
        assert_eq!(row.rows, 1, "add_row: expected a single row");
        assert_eq!(self.cols, row.cols, "add_row: column count differs");
        let data = self.data.iter()
            .map(|r| r.iter().zip(row.data[0].iter()).map(|(x, b)| x + b).collect())
            .collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data
        }
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn uniform_is_bounded_and_seeded() {
        let a = Matrix::uniform(12, 20, 0.01, &mut StdRng::seed_from_u64(1));
        let b = Matrix::uniform(12, 20, 0.01, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
        assert!(a.data.iter().flatten().all(|x| x.abs() <= 0.01));

        let c = Matrix::uniform(12, 20, 0.01, &mut StdRng::seed_from_u64(2));
        assert_ne!(a, c);
    }

    #[test]
    fn product_and_transpose() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_data(vec![vec![5.0], vec![6.0]]);
        let p = &a * &b;
        assert_eq!(p.data, vec![vec![17.0], vec![39.0]]);
        assert_eq!(a.transpose().data, vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
    }

    #[test]
    fn column_means_and_add_row() {
        let m = Matrix::from_data(vec![vec![1.0, 10.0], vec![3.0, 30.0]]);
        assert_eq!(m.column_means().data, vec![vec![2.0, 20.0]]);
        let shifted = m.add_row(&Matrix::row_vector(&[1.0, -10.0]));
        assert_eq!(shifted.data, vec![vec![2.0, 0.0], vec![4.0, 20.0]]);
    }

    #[test]
    #[should_panic(expected = "incorrect sizes")]
    fn product_rejects_mismatched_shapes() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        let _ = &a * &b;
    }
}
