//! Per-cell force laws for the two phases.
//!
//! Every function here is a pure map over the previous step's field: no cell
//! reads another cell's new value, so the work parallelizes across rows with
//! nothing to synchronize beyond the end-of-call barrier.

use crate::field::Field;
use crate::traits::Scalar;
use rayon::prelude::*;

/// Coefficients for the expansion force law, resolved once per step.
/// `g` arrives already scaled by the current complexity.
#[derive(Debug, Clone, Copy)]
pub struct ExpansionCoefficients<T> {
    pub g: T,
    pub h: T,
    pub k: T,
}

/// Toroidally-wrapped smoothing stencil: self weight 4, each of the four
/// neighbors weight 1, divided by 8. Reads only `field`, writes only `out`.
pub fn smooth_into<T: Scalar>(field: &Field<T>, out: &mut Field<T>) {
    debug_assert_eq!(field.len(), out.len());
    let n = field.grid_size();
    let c = field.channel_count();
    let row_len = n * c;
    let src = field.as_slice();
    let four = T::from_f64(4.0).unwrap();
    let eighth = T::from_f64(0.125).unwrap();

    out.as_mut_slice()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(i, out_row)| {
            let up = (i + n - 1) % n;
            let down = (i + 1) % n;
            for j in 0..n {
                let left = (j + n - 1) % n;
                let right = (j + 1) % n;
                for ch in 0..c {
                    let sum = four * src[(i * n + j) * c + ch]
                        + src[(up * n + j) * c + ch]
                        + src[(down * n + j) * c + ch]
                        + src[(i * n + left) * c + ch]
                        + src[(i * n + right) * c + ch];
                    out_row[j * c + ch] = sum * eighth;
                }
            }
        });
}

/// Expansion force law, per cell:
///
/// ```text
/// delta = g*(current - smoothed)        asymmetry tension
///       - h*(current - tanh(current))   soft-wall stability
///       - k*(current - initial)         origin memory
/// ```
///
/// `smoothed` must hold the stencil of `current` (see [`smooth_into`]).
pub fn expansion_delta<T: Scalar>(
    current: &Field<T>,
    initial: &Field<T>,
    smoothed: &Field<T>,
    coeffs: ExpansionCoefficients<T>,
    delta: &mut Field<T>,
) {
    debug_assert_eq!(current.len(), delta.len());
    let cur = current.as_slice();
    let init = initial.as_slice();
    let smo = smoothed.as_slice();

    delta
        .as_mut_slice()
        .par_iter_mut()
        .enumerate()
        .for_each(|(idx, d)| {
            let x = cur[idx];
            *d = coeffs.g * (x - smo[idx]) - coeffs.h * (x - x.tanh())
                - coeffs.k * (x - init[idx]);
        });
}

/// Collapse force law: `delta = -(current - initial)`, a single overwhelming
/// restoring pull toward the origin. No smoothing, no complexity scaling.
pub fn collapse_delta<T: Scalar>(current: &Field<T>, initial: &Field<T>, delta: &mut Field<T>) {
    debug_assert_eq!(current.len(), delta.len());
    let cur = current.as_slice();
    let init = initial.as_slice();

    delta
        .as_mut_slice()
        .par_iter_mut()
        .enumerate()
        .for_each(|(idx, d)| {
            *d = init[idx] - cur[idx];
        });
}
