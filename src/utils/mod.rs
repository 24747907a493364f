//! Math helpers shared by the model and the sampler.

use ndarray::{Array2, Axis};

/// Row-wise softmax: `exp(logits) / sum(exp(logits))`.
///
/// Logits are exponentiated as-is. A logit above ~88 overflows `f32::exp` to
/// infinity and the row becomes NaN.
#[must_use]
pub fn softmax_rows(logits: &Array2<f32>) -> Array2<f32> {
    let mut out = logits.mapv(f32::exp);
    for mut row in out.axis_iter_mut(Axis(0)) {
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    out
}

/// Mean of squared entries, zero for an empty matrix.
#[must_use]
pub fn mean_square(m: &Array2<f32>) -> f32 {
    if m.is_empty() {
        return 0.0;
    }
    m.iter().map(|v| v * v).sum::<f32>() / m.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_uniform() {
        let p = softmax_rows(&ndarray::array![[0.0, 0.0, 0.0, 0.0]]);
        for &v in p.iter() {
            assert!((v - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_softmax_matches_exp_normalisation() {
        let p = softmax_rows(&ndarray::array![[1.0, 2.0]]);
        let e1 = 1.0f32.exp();
        let e2 = 2.0f32.exp();
        assert!((p[[0, 0]] - e1 / (e1 + e2)).abs() < 1e-6);
        assert!((p[[0, 1]] - e2 / (e1 + e2)).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_overflow_is_nan() {
        let p = softmax_rows(&ndarray::array![[100.0, 100.0], [0.0, 0.0]]);
        assert!(p.row(0).iter().all(|v| v.is_nan()));
        assert_eq!(p.row(1).to_vec(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_softmax_single_column() {
        let p = softmax_rows(&ndarray::array![[-3.5], [42.0]]);
        assert_eq!(p, ndarray::array![[1.0], [1.0]]);
    }

    #[test]
    fn test_softmax_empty_batch() {
        let p = softmax_rows(&Array2::zeros((0, 3)));
        assert_eq!(p.dim(), (0, 3));
    }

    #[test]
    fn test_mean_square() {
        assert_eq!(mean_square(&ndarray::array![[1.0, -1.0], [2.0, 0.0]]), 1.5);
        assert_eq!(mean_square(&Array2::zeros((0, 0))), 0.0);
    }
}
