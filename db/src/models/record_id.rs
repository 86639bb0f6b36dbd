use std::{
    fmt,
    sync::{LazyLock, Mutex, PoisonError},
};

use bson::{Binary, spec::BinarySubtype};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ulid::{Generator, Ulid};

/// Ids handed out by this process. Within one millisecond the generator
/// increments the random part instead of redrawing it, so ids sort in the
/// order they were issued.
static GENERATOR: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::new()));

/// Identifier of a stored certificate, kept in MongoDB as 16 raw bytes.
///
/// Binary comparison of two ids matches issue order, which is what breaks
/// ties between records written in the same millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordId(Ulid);

impl RecordId {
    pub fn new() -> Self {
        let mut generator = GENERATOR.lock().unwrap_or_else(PoisonError::into_inner);

        // Overflow takes 2^80 ids within a single millisecond.
        RecordId(generator.generate().unwrap_or_else(|_| Ulid::new()))
    }

    fn to_binary(self) -> Binary {
        Binary {
            subtype: BinarySubtype::Generic,
            bytes: self.0.to_bytes().to_vec(),
        }
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_binary().serialize(s)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let bin = Binary::deserialize(d)?;
        let bytes: [u8; 16] = bin
            .bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("RecordId: expected exactly 16 bytes"))?;
        Ok(RecordId(Ulid::from_bytes(bytes)))
    }
}
