use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as field scalars.
/// Must support floating-point arithmetic, debug printing, and conversion from f64.
/// `Send + Sync` because the force stencil fans out across rows in parallel.
pub trait Scalar: Float + FromPrimitive + Debug + Send + Sync + 'static {}

impl<T: Float + FromPrimitive + Debug + Send + Sync + 'static> Scalar for T {}
