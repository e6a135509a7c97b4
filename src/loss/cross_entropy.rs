use crate::activation::activation::softmax;
use crate::math::matrix::Matrix;

/// Cross-entropy over a softmax of raw logits, the training objective for the
/// classifier. Working on logits keeps softmax out of the trained network so
/// the combined gradient is simply `softmax(z) - target`.
pub struct SoftmaxCrossEntropy;

impl SoftmaxCrossEntropy {
    /// Scalar loss for one record:
    ///   L = -sum(target[i] * log_softmax(logits)[i])
    pub fn loss(logits: &[f64], target: &[f64]) -> f64 {
        let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let log_sum = logits.iter().map(|&z| (z - max).exp()).sum::<f64>().ln();
        logits.iter().zip(target.iter())
            .map(|(&z, &t)| -t * (z - max - log_sum))
            .sum()
    }

    /// Mean loss over the rows of a batch.
    pub fn batch_mean(logits: &Matrix, targets: &Matrix) -> f64 {
        if logits.rows == 0 {
            return 0.0;
        }
        let total: f64 = logits.data.iter().zip(targets.data.iter())
            .map(|(z, t)| Self::loss(z, t))
            .sum();
        total / logits.rows as f64
    }

    /// Per-record gradient w.r.t. the logits: ∂L/∂z = softmax(z) - target.
    pub fn gradient(logits: &Matrix, targets: &Matrix) -> Matrix {
        let data = logits.data.iter().zip(targets.data.iter())
            .map(|(z, t)| {
                softmax(z).into_iter().zip(t.iter()).map(|(p, t)| p - t).collect()
            })
            .collect();
        Matrix { rows: logits.rows, cols: logits.cols, data }
    }
}

/// Fraction of rows whose predicted class (argmax of the logits) differs from
/// the labelled class. Accuracy is `1 - classification_error`.
pub fn classification_error(logits: &Matrix, targets: &Matrix) -> f64 {
    if logits.rows == 0 {
        return 0.0;
    }
    let wrong = logits.data.iter().zip(targets.data.iter())
        .filter(|(z, t)| argmax(z) != argmax(t))
        .count();
    wrong as f64 / logits.rows as f64
}

/// Index of the maximum element; ties resolve to the lowest index.
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate() {
        if x > v[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_of_uniform_logits_is_ln_2() {
        let l = SoftmaxCrossEntropy::loss(&[0.0, 0.0], &[1.0, 0.0]);
        assert!((l - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn loss_shrinks_as_the_right_logit_grows() {
        let far = SoftmaxCrossEntropy::loss(&[0.0, 3.0], &[1.0, 0.0]);
        let near = SoftmaxCrossEntropy::loss(&[3.0, 0.0], &[1.0, 0.0]);
        assert!(near < far);
    }

    #[test]
    fn gradient_is_softmax_minus_target() {
        let z = Matrix::from_data(vec![vec![0.0, 0.0]]);
        let t = Matrix::from_data(vec![vec![0.0, 1.0]]);
        let g = SoftmaxCrossEntropy::gradient(&z, &t);
        assert_eq!(g.data, vec![vec![0.5, -0.5]]);
    }

    #[test]
    fn classification_error_counts_argmax_misses() {
        let z = Matrix::from_data(vec![
            vec![2.0, 1.0],
            vec![0.0, 1.0],
            vec![5.0, -1.0],
            vec![0.3, 0.2],
        ]);
        let t = Matrix::from_data(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        ]);
        assert_eq!(classification_error(&z, &t), 0.5);
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[1.0, 1.0]), 0);
        assert_eq!(argmax(&[0.0, 1.0, 1.0]), 1);
    }
}
