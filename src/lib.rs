//! A monotonic UUID version 7 generator with sub-millisecond timestamp precision
//!
//! ```rust
//! let uuid = subms_uuid7::uuid7();
//! println!("{}", uuid); // e.g., "018bcfe5-6800-7800-9219-566f82fff672"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//!
//! let uuid_string: String = subms_uuid7::uuid7_string();
//! ```
//!
//! See [RFC 9562](https://www.rfc-editor.org/rfc/rfc9562).
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |        sub_ms         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                          rand                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in
//!   milliseconds.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 12-bit `sub_ms` field holds the fraction of the current millisecond,
//!   scaled onto 4096 slots, so that identifiers generated within the same
//!   millisecond are ordered by time as well.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 62 `rand` bits are filled with a cryptographically strong
//!   random number.
//!
//! Timestamps are read with nanosecond resolution and passed through a
//! [`MonotonicClock`](clock::MonotonicClock). Whenever the system clock stalls
//! or moves back, the clock issues the previous timestamp plus 245 nanoseconds
//! instead, the smallest step that still advances `sub_ms`. The `unix_ts_ms`
//! and `sub_ms` fields therefore never decrease within a process, at the cost
//! of running slightly ahead of the system clock after a rollback.
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen` (implies `std`) enables the process-wide default generator
//!   behind [`uuid7()`] and friends.
//!
//! Optional features:
//!
//! - `std` enables [`clock::StdSystemTime`] and conversions to `String`.
//! - `serde` enables serialization of [`Uuid`] through `serde`.
//! - `uuid` enables conversion from/to [`uuid::Uuid`](https://docs.rs/uuid).

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::Error;

mod id;
pub use id::{Uuid, Variant};

pub mod clock;

pub mod generator;
pub use generator::V7Generator;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{try_uuid4, try_uuid7, uuid4, uuid7, uuid7_string};
