//! Integration with `rand` (v0.8) crate.

use super::EntropySource;
use crate::Error;
use rand::RngCore;

/// An adapter that implements [`EntropySource`] for [`RngCore`] types.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> EntropySource for Adapter<T> {
    fn fill(&mut self, dest: &mut [u8]) -> Result<usize, Error> {
        // fill a scratch buffer first so that a failing source never leaves `dest` half-written
        let mut scratch = vec![0u8; dest.len()];
        self.0.try_fill_bytes(&mut scratch)?;
        dest.copy_from_slice(&scratch);
        Ok(dest.len())
    }
}

/// The default entropy source backed by the operating system's random number generator.
pub type OsEntropy = Adapter<rand::rngs::OsRng>;
