//! Stability-bounded step application.
//!
//! Instead of integrating the raw force, the step is rescaled so that the
//! single largest per-component update magnitude equals `base_dt`, whatever
//! the raw force scale. This clamp is what keeps both phases from
//! overshooting.

use crate::field::Field;
use crate::traits::Scalar;

/// Floor for the scale denominator. Guards the division when the delta is
/// uniformly zero; a stability safeguard, not an error.
pub const STEP_FLOOR: f64 = 1e-9;

/// Apply `field += scale * delta` with `scale = base_dt / max(‖delta‖∞, floor)`.
/// Returns the scale used.
pub fn apply_scaled<T: Scalar>(field: &mut Field<T>, delta: &Field<T>, base_dt: T) -> T {
    debug_assert_eq!(field.len(), delta.len());
    let floor = T::from_f64(STEP_FLOOR).unwrap();
    let scale = base_dt / delta.max_abs().max(floor);
    for (v, &d) in field.as_mut_slice().iter_mut().zip(delta.as_slice()) {
        *v = *v + scale * d;
    }
    scale
}

#[cfg(test)]
mod tests {
    use super::apply_scaled;
    use crate::field::Field;

    #[test]
    fn largest_component_moves_exactly_base_dt() {
        let before = Field::<f64>::from_values(2, 1, &[0.5, -0.5, 0.3, -0.3]).unwrap();
        let delta = Field::<f64>::from_values(2, 1, &[40.0, -2.0, 0.1, 7.5]).unwrap();
        let base_dt = 0.01;

        let mut after = before.clone();
        apply_scaled(&mut after, &delta, base_dt);

        let mut largest = 0.0_f64;
        for idx in 0..after.len() {
            let moved = (after.as_slice()[idx] - before.as_slice()[idx]).abs();
            assert!(moved <= base_dt + 1e-12);
            largest = largest.max(moved);
        }
        assert!((largest - base_dt).abs() < 1e-12);
    }

    #[test]
    fn zero_delta_is_floor_guarded_not_an_error() {
        let mut field = Field::<f64>::from_values(2, 1, &[0.5, -0.5, 0.3, -0.3]).unwrap();
        let before = field.clone();
        let delta = Field::<f64>::zeros(2, 1);
        let scale = apply_scaled(&mut field, &delta, 0.01);
        assert!(scale.is_finite());
        assert_eq!(field, before);
    }

    #[test]
    fn scaling_preserves_delta_direction() {
        let mut field = Field::<f64>::zeros(2, 1);
        let delta = Field::<f64>::from_values(2, 1, &[1.0, -0.5, 0.25, 0.0]).unwrap();
        apply_scaled(&mut field, &delta, 0.02);
        // Components move in proportion to the delta, largest by base_dt.
        assert!((field.get(0, 0, 0) - 0.02).abs() < 1e-12);
        assert!((field.get(0, 1, 0) + 0.01).abs() < 1e-12);
        assert!((field.get(1, 0, 0) - 0.005).abs() < 1e-12);
        assert_eq!(field.get(1, 1, 0), 0.0);
    }
}
