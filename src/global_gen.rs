//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{Error, Uuid, V7Generator};
use inner::{GlobalGen, GlobalGenInner};

/// Runs `f` with the process-wide global generator, creating one if none exists or if the process
/// ID has changed since the last call.
fn with_global_gen<T>(f: impl FnOnce(&mut GlobalGen) -> Result<T, Error>) -> Result<T, Error> {
    static G: sync::Mutex<Option<GlobalGenInner>> = sync::Mutex::new(None);

    // the state behind the lock is valid even if a holder panicked
    let mut guard = G.lock().unwrap_or_else(sync::PoisonError::into_inner);
    let inner = match guard.take() {
        Some(inner) if inner.is_current() => inner,
        _ => GlobalGenInner::new()?,
    };
    f(&mut guard.insert(inner).generator)
}

/// Generates a UUIDv7 object, returning an error if the system clock or the operating system's
/// random number generator is unavailable.
///
/// This function employs a global generator whose timestamps come from
/// [`MonotonicClock::global()`](crate::clock::MonotonicClock::global), and thus guarantees the
/// process-wide monotonic order of the `unix_ts_ms` and sub-millisecond fields. On Unix, this
/// function reseeds the generator when the process ID changes (i.e., upon process forks) to
/// prevent collisions across processes.
///
/// # Examples
///
/// ```rust
/// let uuid = subms_uuid7::try_uuid7()?;
/// println!("{}", uuid); // e.g., "018bcfe5-6800-7800-9219-566f82fff672"
/// # Ok::<(), subms_uuid7::Error>(())
/// ```
pub fn try_uuid7() -> Result<Uuid, Error> {
    with_global_gen(V7Generator::generate)
}

/// Generates a UUIDv7 object.
///
/// See [`try_uuid7()`] for the ordering guarantee.
///
/// # Panics
///
/// Panics if the system clock reads before the Unix epoch or the operating system's random
/// number generator fails.
///
/// # Examples
///
/// ```rust
/// let uuid = subms_uuid7::uuid7();
/// println!("{}", uuid); // e.g., "018bcfe5-6800-7800-9219-566f82fff672"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
/// ```
pub fn uuid7() -> Uuid {
    match try_uuid7() {
        Ok(uuid) => uuid,
        Err(err) => panic!("subms_uuid7: could not generate UUID: {}", err),
    }
}

/// Generates a UUIDv7 and returns its 8-4-4-4-12 canonical string representation.
///
/// # Panics
///
/// Panics under the same conditions as [`uuid7()`].
///
/// # Examples
///
/// ```rust
/// let text = subms_uuid7::uuid7_string();
/// assert_eq!(text.len(), 36);
/// ```
pub fn uuid7_string() -> String {
    uuid7().to_string()
}

/// Generates a UUIDv4 object, returning an error if the operating system's random number
/// generator is unavailable.
pub fn try_uuid4() -> Result<Uuid, Error> {
    with_global_gen(V7Generator::generate_v4)
}

/// Generates a UUIDv4 object.
///
/// # Panics
///
/// Panics if the operating system's random number generator fails.
///
/// # Examples
///
/// ```rust
/// let uuid = subms_uuid7::uuid4();
/// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// ```
pub fn uuid4() -> Uuid {
    match try_uuid4() {
        Ok(uuid) => uuid,
        Err(err) => panic!("subms_uuid7: could not generate UUID: {}", err),
    }
}

mod inner {
    use rand::rngs::{adapter::ReseedingRng, OsRng};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Core;

    use crate::clock::StdSystemTime;
    use crate::generator::{with_rand08::Adapter, V7Generator};
    use crate::Error;

    /// Number of bytes the global random number generator produces before reseeding from
    /// [`OsRng`].
    const RESEED_THRESHOLD: u64 = 1024 * 64;

    /// The type alias for the random number generator of the global generator.
    ///
    /// The global generator currently employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to
    /// emulate the strategy used by [`rand::rngs::ThreadRng`].
    pub type GlobalGenRng = Adapter<ReseedingRng<ChaCha12Core, OsRng>>;

    pub type GlobalGen = V7Generator<'static, GlobalGenRng, StdSystemTime>;

    /// A thin wrapper to reset the random state when the process ID changes (i.e., upon Unix
    /// forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        pub generator: GlobalGen,
    }

    impl GlobalGenInner {
        /// Seeds a new generator from [`OsRng`].
        pub fn new() -> Result<Self, Error> {
            let core = ChaCha12Core::from_rng(OsRng).map_err(Error::Random)?;
            log::debug!("seeded global UUID generator");
            Ok(Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: V7Generator::new(Adapter(ReseedingRng::new(
                    core,
                    RESEED_THRESHOLD,
                    OsRng,
                ))),
            })
        }

        /// Returns false if the generator was created by another process.
        pub fn is_current(&self) -> bool {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                log::debug!("process ID changed; discarding global UUID generator state");
                return false;
            }
            true
        }
    }
}
