//! Zero-sum conservation corrections.
//!
//! Both corrections apply in the Expansion phase only. The Collapse branch
//! neither zero-sums its delta nor re-centers the resulting state; that
//! asymmetry is preserved as observed in the reference behavior, pending
//! product clarification (see DESIGN.md).

use crate::field::Field;
use crate::traits::Scalar;

/// Subtract the per-channel mean delta (over all N² cells) from every cell,
/// so the change sums to zero per channel before it is applied.
pub fn zero_sum_delta<T: Scalar>(delta: &mut Field<T>) {
    subtract_channel_means(delta);
}

/// Re-center the field to zero mean per channel after a step is applied,
/// restoring the identity `sum over all cells ≡ 0`.
pub fn recenter<T: Scalar>(field: &mut Field<T>) {
    subtract_channel_means(field);
}

fn subtract_channel_means<T: Scalar>(field: &mut Field<T>) {
    let means = field.channel_means();
    let channels = field.channel_count();
    for chunk in field.as_mut_slice().chunks_exact_mut(channels) {
        for (v, &mean) in chunk.iter_mut().zip(&means) {
            *v = *v - mean;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{recenter, zero_sum_delta};
    use crate::field::Field;

    #[test]
    fn zero_sum_delta_removes_per_channel_mean() {
        let mut delta =
            Field::<f64>::from_values(2, 2, &[1.0, 8.0, 2.0, 8.0, 3.0, 8.0, 6.0, 8.0]).unwrap();
        zero_sum_delta(&mut delta);

        let sums = delta.channel_sums();
        assert!(sums[0].abs() < 1e-12);
        assert!(sums[1].abs() < 1e-12);
        // Channel 0 mean was 3.0; relative spacing survives.
        assert_eq!(delta.get(0, 0, 0), -2.0);
        assert_eq!(delta.get(1, 1, 0), 3.0);
        // A uniform channel collapses to zero.
        assert_eq!(delta.get(0, 1, 1), 0.0);
    }

    #[test]
    fn recenter_restores_zero_sum_per_channel() {
        let mut field = Field::<f64>::from_values(2, 1, &[0.6, -0.4, 0.4, -0.2]).unwrap();
        recenter(&mut field);
        assert!(field.channel_sums()[0].abs() < 1e-12);
        assert!((field.get(0, 0, 0) - 0.5).abs() < 1e-12);
    }
}
