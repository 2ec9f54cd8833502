use crate::traits::Scalar;
use anyhow::{bail, Result};

/// Dense toroidal field of shape (N, N, C), stored row-major:
/// the value of channel `ch` at cell (i, j) lives at `(i * N + j) * C + ch`.
///
/// The field itself carries no wrap logic; the toroidal topology is a
/// property of the stencil that reads it (see `forces`).
#[derive(Debug, Clone, PartialEq)]
pub struct Field<T> {
    grid_size: usize,
    channel_count: usize,
    data: Vec<T>,
}

impl<T: Scalar> Field<T> {
    /// An all-zero field.
    pub fn zeros(grid_size: usize, channel_count: usize) -> Self {
        Self {
            grid_size,
            channel_count,
            data: vec![T::zero(); grid_size * grid_size * channel_count],
        }
    }

    /// Build a field from provider values, reshaped row-major over the
    /// flattened sequence. The provider must supply at least
    /// `grid_size² × channel_count` values; extras are ignored.
    pub fn from_values(grid_size: usize, channel_count: usize, values: &[T]) -> Result<Self> {
        if grid_size == 0 {
            bail!("grid_size must be greater than zero.");
        }
        if channel_count == 0 {
            bail!("channel_count must be greater than zero.");
        }
        let needed = grid_size * grid_size * channel_count;
        if values.len() < needed {
            bail!(
                "Initial-condition provider supplied {} values, need at least {}.",
                values.len(),
                needed
            );
        }
        Ok(Self {
            grid_size,
            channel_count,
            data: values[..needed].to_vec(),
        })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Total scalar count: N² × C.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize, ch: usize) -> usize {
        (i * self.grid_size + j) * self.channel_count + ch
    }

    pub fn get(&self, i: usize, j: usize, ch: usize) -> T {
        self.data[self.index(i, j, ch)]
    }

    pub fn set(&mut self, i: usize, j: usize, ch: usize, value: T) {
        let idx = self.index(i, j, ch);
        self.data[idx] = value;
    }

    /// Exact copy of another field's contents. Used by the recurrence reset,
    /// which must restore the origin bit-for-bit, never approximately.
    pub fn copy_from(&mut self, other: &Field<T>) {
        debug_assert_eq!(self.data.len(), other.data.len());
        self.data.copy_from_slice(&other.data);
    }

    /// Complexity: population variance over the flattened field. Spatial and
    /// channel dimensions collapse into one scalar deliberately.
    pub fn complexity(&self) -> T {
        let count = T::from_usize(self.data.len()).unwrap();
        let mean = self.data.iter().fold(T::zero(), |acc, &v| acc + v) / count;
        self.data.iter().fold(T::zero(), |acc, &v| {
            let d = v - mean;
            acc + d * d
        }) / count
    }

    /// Difference: Euclidean norm of (self − other) over the whole field.
    pub fn difference(&self, other: &Field<T>) -> T {
        debug_assert_eq!(self.data.len(), other.data.len());
        self.data
            .iter()
            .zip(other.data.iter())
            .fold(T::zero(), |acc, (&a, &b)| {
                let d = a - b;
                acc + d * d
            })
            .sqrt()
    }

    /// Sum of all values, kept per channel.
    pub fn channel_sums(&self) -> Vec<T> {
        let mut sums = vec![T::zero(); self.channel_count];
        for chunk in self.data.chunks_exact(self.channel_count) {
            for (sum, &v) in sums.iter_mut().zip(chunk) {
                *sum = *sum + v;
            }
        }
        sums
    }

    /// Mean over all N² cells, kept per channel.
    pub fn channel_means(&self) -> Vec<T> {
        let cells = T::from_usize(self.grid_size * self.grid_size).unwrap();
        self.channel_sums().into_iter().map(|s| s / cells).collect()
    }

    /// Largest absolute component anywhere in the field.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &v| acc.max(v.abs()))
    }
}
