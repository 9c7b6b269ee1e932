/// Environment fault raised while reading the clock or the random source.
///
/// Identifier generation has no recoverable failure mode of its own; every variant reports that
/// one of the two external capabilities a generator depends on is unavailable.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The system clock reads a time before the Unix epoch.
    #[error("system clock reads before the Unix epoch")]
    ClockBeforeEpoch,

    /// The system clock reads a time that does not fit in 64-bit nanoseconds.
    #[error("system clock reading out of 64-bit nanosecond range")]
    ClockOutOfRange,

    /// The random source could not supply the requested bytes.
    #[error("random source failure: {0}")]
    Random(rand::Error),
}
