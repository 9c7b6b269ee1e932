#[cfg(not(feature = "std"))]
use core as std;

use std::{fmt, ops, str};

/// Represents a Universally Unique IDentifier.
///
/// The derived ordering compares the underlying bytes, so values produced by a generator sort by
/// creation time.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

/// Layout family encoded in the variant bits of a [`Uuid`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// `0xxx`: reserved for NCS backward compatibility.
    Var0,
    /// `10xx`: the layout used by versions 1 through 8.
    Var10,
    /// `110x`: reserved for Microsoft backward compatibility.
    Var110,
    /// `111x`: reserved for future definition.
    VarReserved,
    /// The Nil UUID.
    Nil,
    /// The Max UUID.
    Max,
}

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a UUID byte array from UUIDv7 field values.
    ///
    /// `sub_ms` is the 12-bit fraction of the millisecond stored in the `rand_a` field.
    ///
    /// # Panics
    ///
    /// Panics if a field value exceeds its width of 48, 12, or 62 bits respectively.
    pub const fn from_fields_v7(unix_ts_ms: u64, sub_ms: u16, rand_b: u64) -> Self {
        if unix_ts_ms >= 1 << 48 || sub_ms >= 1 << 12 || rand_b >= 1 << 62 {
            panic!("invalid field value");
        }

        Self([
            (unix_ts_ms >> 40) as u8,
            (unix_ts_ms >> 32) as u8,
            (unix_ts_ms >> 24) as u8,
            (unix_ts_ms >> 16) as u8,
            (unix_ts_ms >> 8) as u8,
            unix_ts_ms as u8,
            0x70 | (sub_ms >> 8) as u8,
            sub_ms as u8,
            0x80 | (rand_b >> 56) as u8,
            (rand_b >> 48) as u8,
            (rand_b >> 40) as u8,
            (rand_b >> 32) as u8,
            (rand_b >> 24) as u8,
            (rand_b >> 16) as u8,
            (rand_b >> 8) as u8,
            rand_b as u8,
        ])
    }

    /// Returns the 48-bit `unix_ts_ms` field.
    pub const fn unix_ts_ms(&self) -> u64 {
        let b = &self.0;
        (b[0] as u64) << 40
            | (b[1] as u64) << 32
            | (b[2] as u64) << 24
            | (b[3] as u64) << 16
            | (b[4] as u64) << 8
            | b[5] as u64
    }

    /// Returns the 12 bits following the version nibble, which a UUIDv7 produced by this crate
    /// fills with the sub-millisecond fraction of its timestamp.
    pub const fn sub_ms(&self) -> u16 {
        ((self.0[6] & 0x0f) as u16) << 8 | self.0[7] as u16
    }

    /// Reports the variant field value of the UUID.
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 4 {
            0b0000..=0b0111 if u128::from_be_bytes(self.0) == 0 => Variant::Nil,
            0b0000..=0b0111 => Variant::Var0,
            0b1000..=0b1011 => Variant::Var10,
            0b1100..=0b1101 => Variant::Var110,
            _ if u128::from_be_bytes(self.0) == u128::MAX => Variant::Max,
            _ => Variant::VarReserved,
        }
    }

    /// Returns the version field value of the UUID or `None` if the variant is not `10`.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.0[6] >> 4),
            _ => None,
        }
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// structure that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// This method is primarily for `no_std` environments where heap-allocated string types are
    /// not readily available. Use the [`fmt::Display`] trait usually to get the 8-4-4-4-12
    /// canonical hexadecimal string representation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use subms_uuid7::Uuid;
    ///
    /// let x = Uuid::from(0x01809424_3e59_7c05_9219_566f82fff672u128);
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "01809424-3e59-7c05-9219-566f82fff672");
    /// assert_eq!(format!("{}", y), "01809424-3e59-7c05-9219-566f82fff672");
    /// ```
    pub fn encode(&self) -> impl ops::Deref<Target = str> + fmt::Display {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut pos = 0;
        for (i, e) in self.0.iter().enumerate() {
            if i == 4 || i == 6 || i == 8 || i == 10 {
                buffer[pos] = b'-';
                pos += 1;
            }
            buffer[pos] = DIGITS[(e >> 4) as usize];
            buffer[pos + 1] = DIGITS[(e & 15) as usize];
            pos += 2;
        }
        debug_assert!(pos == buffer.len() && buffer.is_ascii());
        UuidStr(buffer)
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

/// Concrete return type of [`Uuid::encode()`] containing the stack-allocated 8-4-4-4-12 string
/// representation.
struct UuidStr([u8; 36]);

impl ops::Deref for UuidStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        debug_assert!(self.0.is_ascii());
        unsafe { str::from_utf8_unchecked(&self.0) }
    }
}

impl fmt::Display for UuidStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod std_ext {
    use super::Uuid;

    impl From<Uuid> for String {
        fn from(src: Uuid) -> Self {
            src.to_string()
        }
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::Uuid;
    use serde::Serializer;

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

}
