//! Integration with `rand` (v0.8) crate.

use super::{RandSource, V7Generator};
use crate::Error;
use rand::RngCore;

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> RandSource for Adapter<T> {
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.0.try_fill_bytes(dest).map_err(Error::Random)
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl<T: RngCore> V7Generator<'static, Adapter<T>, crate::clock::StdSystemTime> {
    /// Creates a generator object with a specified random number generator that implements
    /// [`RngCore`] from `rand` (v0.8) crate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use subms_uuid7::V7Generator;
    ///
    /// let mut g = V7Generator::with_rand08(rand::rngs::OsRng);
    /// println!("{}", g.generate()?);
    /// # Ok::<(), subms_uuid7::Error>(())
    /// ```
    pub fn with_rand08(rng: T) -> Self {
        Self::new(Adapter(rng))
    }
}
