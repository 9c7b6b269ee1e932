//! Monotonic nanosecond timestamp source.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::Error;

/// Number of nanoseconds in a millisecond.
pub const NS_PER_MS: u64 = 1_000_000;

/// Width of the sub-millisecond fraction stored in the `rand_a` field.
pub const SUB_MS_BITS: u32 = 12;

/// Smallest clock step that advances the truncated 12-bit sub-millisecond fraction by at least
/// one unit.
pub const MINIMAL_STEP_NS: u64 = NS_PER_MS / (1 << SUB_MS_BITS) + 1;

/// A trait that defines the wall-clock interface consumed by [`MonotonicClock`].
///
/// Readings may stall or go backwards between calls; [`MonotonicClock`] compensates for both.
pub trait TimeSource {
    /// Returns the current Unix time in nanoseconds.
    fn unix_ts_ns(&mut self) -> Result<u64, Error>;
}

/// [`TimeSource`] backed by [`std::time::SystemTime`].
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct StdSystemTime;

#[cfg(feature = "std")]
impl TimeSource for StdSystemTime {
    fn unix_ts_ns(&mut self) -> Result<u64, Error> {
        use std::time;
        let elapsed = time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .map_err(|_| Error::ClockBeforeEpoch)?;
        u64::try_from(elapsed.as_nanos()).map_err(|_| Error::ClockOutOfRange)
    }
}

/// Holds the last timestamp handed out and guarantees that every subsequent one is strictly
/// greater, even when the underlying wall clock stalls or moves backwards.
///
/// The state is a single atomic cell updated with a compare-and-swap loop, so one instance can be
/// shared by any number of threads. [`MonotonicClock::global()`] returns the process-wide instance
/// used by the default generator; independent instances order only the timestamps they issue.
///
/// # Examples
///
/// ```rust
/// use subms_uuid7::clock::{MonotonicClock, MINIMAL_STEP_NS};
///
/// let clock = MonotonicClock::new();
/// assert_eq!(clock.advance(1_000_000), 1_000_000);
/// assert_eq!(clock.advance(999_000), 1_000_000 + MINIMAL_STEP_NS);
/// ```
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last_time_ns: AtomicU64,
}

impl MonotonicClock {
    /// Creates a clock that has not issued any timestamp yet.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a clock that behaves as if it had last issued `last_time_ns`.
    pub const fn starting_at(last_time_ns: u64) -> Self {
        Self {
            last_time_ns: AtomicU64::new(last_time_ns),
        }
    }

    /// Returns the process-wide clock instance.
    pub fn global() -> &'static Self {
        static GLOBAL: MonotonicClock = MonotonicClock::new();
        &GLOBAL
    }

    /// Returns the last timestamp issued, or zero if none has been.
    pub fn last_timestamp_ns(&self) -> u64 {
        self.last_time_ns.load(Ordering::Acquire)
    }

    /// Records a raw wall-clock reading and returns the timestamp to use for it.
    ///
    /// The reading is returned as is if it is greater than the last timestamp issued; otherwise
    /// the last timestamp plus [`MINIMAL_STEP_NS`] is returned.
    pub fn advance(&self, now_ns: u64) -> u64 {
        let mut last = self.last_time_ns.load(Ordering::Acquire);
        loop {
            let next = if now_ns <= last {
                last + MINIMAL_STEP_NS
            } else {
                now_ns
            };
            match self.last_time_ns.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if next != now_ns {
                        log::trace!("clock stalled or moved back: read {now_ns}, issued {next}");
                    }
                    return next;
                }
                Err(actual) => last = actual,
            }
        }
    }

    /// Reads `time` and returns the next strictly increasing timestamp in nanoseconds.
    ///
    /// A failure of `time` is returned unmodified and leaves the clock untouched.
    pub fn next_timestamp_ns<T: TimeSource + ?Sized>(&self, time: &mut T) -> Result<u64, Error> {
        let now_ns = time.unix_ts_ns()?;
        Ok(self.advance(now_ns))
    }
}

/// Splits a nanosecond timestamp into whole milliseconds and the remainder scaled onto 4096
/// slots.
///
/// ```rust
/// use subms_uuid7::clock::split_unix_ts_ns;
///
/// assert_eq!(split_unix_ts_ns(1_700_000_000_000_500_000), (1_700_000_000_000, 0x800));
/// ```
pub const fn split_unix_ts_ns(unix_ts_ns: u64) -> (u64, u16) {
    let unix_ts_ms = unix_ts_ns / NS_PER_MS;
    let frac_ns = unix_ts_ns % NS_PER_MS;
    let sub_ms = (frac_ns << SUB_MS_BITS) / NS_PER_MS;
    (unix_ts_ms, sub_ms as u16)
}

#[cfg(test)]
mod tests {
    use super::{split_unix_ts_ns, MonotonicClock, TimeSource, MINIMAL_STEP_NS, NS_PER_MS};
    use crate::Error;

    /// Replays a fixed series of readings
    struct ReplayTimeSource<'a>(&'a [u64]);

    impl TimeSource for ReplayTimeSource<'_> {
        fn unix_ts_ns(&mut self) -> Result<u64, Error> {
            let (first, rest) = self.0.split_first().expect("ran out of readings");
            self.0 = rest;
            Ok(*first)
        }
    }

    struct BrokenTimeSource;

    impl TimeSource for BrokenTimeSource {
        fn unix_ts_ns(&mut self) -> Result<u64, Error> {
            Err(Error::ClockBeforeEpoch)
        }
    }

    /// Uses minimal step of 245 nanoseconds
    #[test]
    fn uses_minimal_step_of_245_nanoseconds() {
        assert_eq!(MINIMAL_STEP_NS, 245);
        assert_eq!(split_unix_ts_ns(MINIMAL_STEP_NS).1, 1);
    }

    /// Passes through increasing readings
    #[test]
    fn passes_through_increasing_readings() {
        let clock = MonotonicClock::new();
        let mut time = ReplayTimeSource(&[1, 2, 1_000, NS_PER_MS * 5]);
        for expected in [1, 2, 1_000, NS_PER_MS * 5] {
            assert_eq!(clock.next_timestamp_ns(&mut time).unwrap(), expected);
        }
        assert_eq!(clock.last_timestamp_ns(), NS_PER_MS * 5);
    }

    /// Clamps stalled and decreasing readings to last plus minimal step
    #[test]
    fn clamps_stalled_and_decreasing_readings_to_last_plus_minimal_step() {
        let ts = 1_700_000_000_000 * NS_PER_MS;
        let clock = MonotonicClock::new();
        let mut time = ReplayTimeSource(&[ts, ts, ts - 1, ts - 10 * NS_PER_MS, ts + 1_000]);
        assert_eq!(clock.next_timestamp_ns(&mut time).unwrap(), ts);
        assert_eq!(
            clock.next_timestamp_ns(&mut time).unwrap(),
            ts + MINIMAL_STEP_NS
        );
        assert_eq!(
            clock.next_timestamp_ns(&mut time).unwrap(),
            ts + 2 * MINIMAL_STEP_NS
        );
        assert_eq!(
            clock.next_timestamp_ns(&mut time).unwrap(),
            ts + 3 * MINIMAL_STEP_NS
        );
        assert_eq!(clock.next_timestamp_ns(&mut time).unwrap(), ts + 1_000);
    }

    /// Resumes from preset state
    #[test]
    fn resumes_from_preset_state() {
        let clock = MonotonicClock::starting_at(5_000);
        assert_eq!(clock.advance(4_000), 5_000 + MINIMAL_STEP_NS);
        assert_eq!(clock.advance(6_000), 6_000);
    }

    /// Advances strictly sub-millisecond fraction on every clamp
    #[test]
    fn advances_strictly_sub_millisecond_fraction_on_every_clamp() {
        let ts = 0x0123_4567_89ab * NS_PER_MS;
        let clock = MonotonicClock::new();
        let mut prev = split_unix_ts_ns(clock.advance(ts));
        for _ in 0..10_000 {
            let curr = split_unix_ts_ns(clock.advance(ts));
            assert!(prev < curr);
            prev = curr;
        }
    }

    /// Propagates time source failure without touching state
    #[test]
    fn propagates_time_source_failure_without_touching_state() {
        let clock = MonotonicClock::starting_at(42);
        assert!(matches!(
            clock.next_timestamp_ns(&mut BrokenTimeSource),
            Err(Error::ClockBeforeEpoch)
        ));
        assert_eq!(clock.last_timestamp_ns(), 42);
    }

    /// Maps sub-millisecond remainder onto 4096 slots
    #[test]
    fn maps_sub_millisecond_remainder_onto_4096_slots() {
        assert_eq!(split_unix_ts_ns(0), (0, 0));
        assert_eq!(split_unix_ts_ns(999_999), (0, 4095));
        assert_eq!(split_unix_ts_ns(1_000_000), (1, 0));
        assert_eq!(
            split_unix_ts_ns(1_700_000_000_000 * NS_PER_MS + 500_000),
            (1_700_000_000_000, 0x800)
        );
        for frac_ns in (0..NS_PER_MS).step_by(7) {
            let (ms, sub_ms) = split_unix_ts_ns(3 * NS_PER_MS + frac_ns);
            assert_eq!(ms, 3);
            assert!(sub_ms < 4096);
        }
    }

    /// Issues unique increasing timestamps under multithreading
    #[cfg(feature = "std")]
    #[test]
    fn issues_unique_increasing_timestamps_under_multithreading() {
        use std::{collections::HashSet, thread};

        let clock = &MonotonicClock::new();
        let ts = 0x0123_4567_89ab * NS_PER_MS;
        let per_thread: Vec<Vec<u64>> = thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(move || {
                        (0..10_000)
                            .map(|_| clock.advance(ts))
                            .collect::<Vec<u64>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut s = HashSet::new();
        for timestamps in &per_thread {
            for w in timestamps.windows(2) {
                assert!(w[0] < w[1]);
            }
            s.extend(timestamps.iter().copied());
        }
        assert_eq!(s.len(), 4 * 10_000);
        assert_eq!(
            clock.last_timestamp_ns(),
            ts + (4 * 10_000 - 1) * MINIMAL_STEP_NS
        );
    }
}
