// SPDX-License-Identifier: AGPL-3.0-only
//! Serde adapters for `u128` amounts.
//!
//! Neither JSON nor TOML can portably carry 128-bit integers, so amounts are
//! written as decimal strings. Reading accepts a string or a plain integer,
//! which keeps hand-written config files (`initial_supply = 1000000`) working.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `#[serde(with = "u128_str")]` for a single amount.
pub mod u128_str {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(val: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&val.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        struct U128Visitor;

        impl<'de> Visitor<'de> for U128Visitor {
            type Value = u128;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a u128 as a decimal string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
                v.trim().parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
                Ok(v as u128)
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
                if v >= 0 {
                    Ok(v as u128)
                } else {
                    Err(E::custom("negative value for u128"))
                }
            }
        }

        d.deserialize_any(U128Visitor)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct AmountRepr(#[serde(with = "u128_str")] u128);

/// `#[serde(with = "u128_map")]` for `BTreeMap<K, u128>`.
pub mod u128_map {
    use super::AmountRepr;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<K, S>(map: &BTreeMap<K, u128>, s: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize + Ord,
        S: Serializer,
    {
        s.collect_map(map.iter().map(|(k, v)| (k, AmountRepr(*v))))
    }

    pub fn deserialize<'de, K, D>(d: D) -> Result<BTreeMap<K, u128>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        D: Deserializer<'de>,
    {
        let raw: BTreeMap<K, AmountRepr> = BTreeMap::deserialize(d)?;
        Ok(raw.into_iter().map(|(k, v)| (k, v.0)).collect())
    }
}

/// `#[serde(with = "u128_nested_map")]` for `BTreeMap<K1, BTreeMap<K2, u128>>`
/// (allowances keyed owner -> spender).
pub mod u128_nested_map {
    use super::AmountRepr;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<K1, K2, S>(
        map: &BTreeMap<K1, BTreeMap<K2, u128>>,
        s: S,
    ) -> Result<S::Ok, S::Error>
    where
        K1: Serialize + Ord,
        K2: Serialize + Ord,
        S: Serializer,
    {
        s.collect_map(map.iter().map(|(outer, inner)| {
            let inner: BTreeMap<&K2, AmountRepr> =
                inner.iter().map(|(k, v)| (k, AmountRepr(*v))).collect();
            (outer, inner)
        }))
    }

    pub fn deserialize<'de, K1, K2, D>(d: D) -> Result<BTreeMap<K1, BTreeMap<K2, u128>>, D::Error>
    where
        K1: Deserialize<'de> + Ord,
        K2: Deserialize<'de> + Ord,
        D: Deserializer<'de>,
    {
        let raw: BTreeMap<K1, BTreeMap<K2, AmountRepr>> = BTreeMap::deserialize(d)?;
        Ok(raw
            .into_iter()
            .map(|(outer, inner)| (outer, inner.into_iter().map(|(k, v)| (k, v.0)).collect()))
            .collect())
    }
}

/// Sum of all values, `None` on overflow.
pub fn checked_sum<'a, I>(values: I) -> Option<u128>
where
    I: IntoIterator<Item = &'a u128>,
{
    values
        .into_iter()
        .try_fold(0u128, |acc, v| acc.checked_add(*v))
}

/// Count of entries across a nested amount map.
pub fn nested_len<K1, K2>(map: &BTreeMap<K1, BTreeMap<K2, u128>>) -> usize {
    map.values().map(BTreeMap::len).sum()
}
