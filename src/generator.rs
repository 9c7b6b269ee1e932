//! UUIDv7 generator and related types.

use crate::clock::{split_unix_ts_ns, MonotonicClock, TimeSource};
use crate::{Error, Uuid};

#[cfg(feature = "std")]
use crate::clock::StdSystemTime;

pub mod with_rand08;


/// A trait that defines the random byte source interface for [`V7Generator`].
///
/// Implementations must supply data suitable for cryptographic use. A source that cannot do so
/// must return an error rather than weaker bytes.
pub trait RandSource {
    /// Fills `dest` entirely with random data.
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error>;
}

/// Represents a UUIDv7 generator that embeds a sub-millisecond timestamp fraction and guarantees
/// the monotonic order of UUIDs issued through the same [`MonotonicClock`].
///
/// The generator borrows the clock and owns its random and time sources, so the scope of the
/// ordering guarantee is chosen by the clock handed in. Generators created by
/// [`V7Generator::new()`] share [`MonotonicClock::global()`] and hence order their UUIDs across
/// the whole process even when each thread keeps its own generator.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::thread;
/// use subms_uuid7::V7Generator;
///
/// thread::scope(|s| {
///     for i in 0..4 {
///         s.spawn(move || {
///             let mut g = V7Generator::with_rand08(OsRng);
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.generate().unwrap(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// # Field layout
///
/// Each UUID is built by filling all 16 bytes from the random source and then overwriting the
/// first 48 bits with `unix_ts_ms`, the next 4 bits with version `7`, the next 12 bits with the
/// sub-millisecond fraction, and the top 2 bits of byte 8 with variant `10`.
#[derive(Clone, Debug)]
pub struct V7Generator<'c, R, T> {
    clock: &'c MonotonicClock,

    /// The random number generator used by the generator.
    rand: R,

    /// The wall clock read by the generator.
    time: T,
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl<R: RandSource> V7Generator<'static, R, StdSystemTime> {
    /// Creates a generator instance that reads the system clock and orders its UUIDs through the
    /// process-wide [`MonotonicClock`].
    pub fn new(rand: R) -> Self {
        Self::with_sources(MonotonicClock::global(), rand, StdSystemTime)
    }
}

impl<'c, R: RandSource, T: TimeSource> V7Generator<'c, R, T> {
    /// Creates a generator instance with every collaborator specified.
    pub const fn with_sources(clock: &'c MonotonicClock, rand: R, time: T) -> Self {
        Self { clock, rand, time }
    }

    /// Returns the clock this generator orders its UUIDs through.
    pub const fn clock(&self) -> &'c MonotonicClock {
        self.clock
    }

    /// Generates a new UUIDv7 object from the current timestamp.
    ///
    /// Returns an error without producing a UUID if either the time source or the random source
    /// fails.
    pub fn generate(&mut self) -> Result<Uuid, Error> {
        let unix_ts_ns = self.clock.next_timestamp_ns(&mut self.time)?;
        self.generate_core(unix_ts_ns)
    }

    /// Generates a new UUIDv7 object from the `unix_ts_ns` passed.
    ///
    /// This method only encodes the timestamp and does not consult or update the clock; the
    /// caller is responsible for passing an increasing value when order matters. Bits of
    /// `unix_ts_ms` above 48 are discarded.
    pub fn generate_core(&mut self, unix_ts_ns: u64) -> Result<Uuid, Error> {
        let (unix_ts_ms, sub_ms) = split_unix_ts_ns(unix_ts_ns);

        let mut bytes = [0u8; 16];
        self.rand.try_fill_bytes(&mut bytes)?;

        bytes[..6].copy_from_slice(&unix_ts_ms.to_be_bytes()[2..]);
        bytes[6] = 0x70 | ((sub_ms >> 8) as u8 & 0x0f);
        bytes[7] = sub_ms as u8;
        bytes[8] = 0x80 | (bytes[8] & 0x3f);
        Ok(Uuid::from(bytes))
    }

    /// Generates a new UUIDv4 object utilizing the random number generator inside.
    pub fn generate_v4(&mut self) -> Result<Uuid, Error> {
        let mut bytes = [0u8; 16];
        self.rand.try_fill_bytes(&mut bytes)?;
        bytes[6] = 0x40 | (bytes[6] >> 4);
        bytes[8] = 0x80 | (bytes[8] >> 2);
        Ok(Uuid::from(bytes))
    }
}

/// Supports operations as an infinite iterator that produces a new UUIDv7 object for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use subms_uuid7::V7Generator;
///
/// V7Generator::with_rand08(rand::thread_rng())
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e.unwrap()));
/// ```
impl<R: RandSource, T: TimeSource> Iterator for V7Generator<'_, R, T> {
    type Item = Result<Uuid, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
