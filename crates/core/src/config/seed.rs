use derive_more::Display;
use fnv::FnvHasher;
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// Seed for one randomized channel of world generation (a noise layer or the
/// hydrology stream).
///
/// A seed can be given either as an integer or as arbitrary text. Text that
/// parses as a `u64` is treated as that integer; any other text is kept as-is
/// and hashed (FNV) when the numeric value is needed. This lets people name
/// their worlds ("misty isles") and still get reproducible output.
///
/// Seeds are always **serialized as strings**. JSON and TOML can't hold the
/// full `u64` range, so writing the number as text is the only way to get the
/// same seed back on the next load.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Seed {
    /// An integer seed, which can be used directly
    Int(u64),
    /// A textual seed, which will be hashed into a u64 before use
    Text(String),
}

impl Seed {
    /// Get the numeric value of this seed, hashing text if necessary
    pub fn to_u64(&self) -> u64 {
        match self {
            Self::Int(seed) => *seed,
            Self::Text(text) => {
                let mut hasher = FnvHasher::default();
                text.hash(&mut hasher);
                hasher.finish()
            }
        }
    }

    /// Get a 32-bit seed for the noise functions. The noise crate only takes
    /// `u32` seeds, so we fold the high half into the low half rather than
    /// just truncating, so seeds that differ only in their upper bits still
    /// produce different noise.
    pub fn to_noise_seed(&self) -> u32 {
        let value = self.to_u64();
        ((value >> 32) ^ value) as u32
    }
}

impl From<u64> for Seed {
    fn from(seed: u64) -> Self {
        Self::Int(seed)
    }
}

impl From<&str> for Seed {
    fn from(seed_str: &str) -> Self {
        match seed_str.parse::<u64>() {
            Ok(seed) => Self::Int(seed),
            Err(_) => Self::Text(seed_str.into()),
        }
    }
}

impl Serialize for Seed {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SeedVisitor)
    }
}

/// Accepts integers and strings. Smaller integer types are forwarded to
/// `visit_u64`/`visit_i64` by serde.
struct SeedVisitor;

impl<'de> Visitor<'de> for SeedVisitor {
    type Value = Seed;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a positive integer or string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Seed, E> {
        Ok(Seed::Int(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Seed, E> {
        u64::try_from(value)
            .map(Seed::Int)
            .map_err(|_| E::custom(format!("u64 out of range: {}", value)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Seed, E> {
        Ok(value.into())
    }
}
