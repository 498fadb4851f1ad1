//! Serde adapters for wire encodings.
//!
//! - [`hex_bytes`]: variable-length byte strings as lowercase hex.
//! - [`decimal`]: `BigUint` as a base-10 string.

/// Byte strings as hex. Accepts an optional `0x` prefix on input.
pub mod hex_bytes {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes.as_ref()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let digits = encoded.strip_prefix("0x").unwrap_or(&encoded);
        hex::decode(digits).map_err(D::Error::custom)
    }
}

/// Arbitrary-precision unsigned integers as decimal strings.
pub mod decimal {
    use num_bigint::BigUint;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        if encoded.is_empty() || !encoded.bytes().all(|b| b.is_ascii_digit()) {
            return Err(D::Error::custom(format!(
                "invalid decimal integer: {encoded:?}"
            )));
        }
        BigUint::parse_bytes(encoded.as_bytes(), 10)
            .ok_or_else(|| D::Error::custom("invalid decimal integer"))
    }
}
