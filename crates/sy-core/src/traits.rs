//! Core traits for StrangeYield
//!
//! Accumulators filled by independent workers are reduced by simple bin-wise
//! addition. Anything that can take part in that reduction implements
//! [`Mergeable`].

use crate::Result;

/// Bin-wise (or counter-wise) accumulation of a partial result into `self`.
///
/// Implementations must be associative and commutative so that the order in
/// which worker partials are merged does not change the final state.
pub trait Mergeable {
    /// Add `other` into `self`. Fails when the two objects are not
    /// structurally compatible (e.g. different binning).
    fn merge(&mut self, other: &Self) -> Result<()>;
}

impl<T: Mergeable> Mergeable for Vec<T> {
    fn merge(&mut self, other: &Self) -> Result<()> {
        if self.len() != other.len() {
            return Err(crate::Error::Validation(format!(
                "cannot merge collections of different length ({} vs {})",
                self.len(),
                other.len()
            )));
        }
        for (a, b) in self.iter_mut().zip(other.iter()) {
            a.merge(b)?;
        }
        Ok(())
    }
}
