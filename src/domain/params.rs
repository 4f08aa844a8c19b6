//! Adform bidder parameters carried in `imp.ext`.
//!
//! The host wraps each bidder's params as `{"prebid": {...}, "bidder": {...}}`.
//! Adform expects a master tag id under `bidder.mid`, given either as a
//! JSON integer or as a string of digits.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::BidderError;
use super::openrtb::Imp;

/// Host-level wrapper around the bidder params of one impression.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtImpBidder {
    #[serde(default)]
    pub prebid: Option<Value>,
    pub bidder: Value,
}

/// Adform OpenRTB impression params.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtImpAdformOpenRtb {
    /// Master tag (placement) id.
    pub mid: MasterTagId,
}

/// Adform master tag id, normalized to its decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MasterTagId(String);

impl MasterTagId {
    /// Parse a tag id from its textual form. Only ASCII digits are accepted.
    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            return Err("mid must not be empty".to_string());
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("mid must contain only digits, got {raw:?}"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MasterTagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MasterTagId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MidVisitor;

        impl Visitor<'_> for MidVisitor {
            type Value = MasterTagId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or a string of digits")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MasterTagId, E> {
                Ok(MasterTagId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MasterTagId, E> {
                u64::try_from(v)
                    .map(|v| MasterTagId(v.to_string()))
                    .map_err(|_| E::custom(format!("mid must not be negative, got {v}")))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<MasterTagId, E> {
                Err(E::custom(format!("mid must be an integer, got {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MasterTagId, E> {
                MasterTagId::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MidVisitor)
    }
}

/// Extract Adform params from an impression.
///
/// # Errors
/// Returns `BadInput` when `imp.ext` is missing, is not a host wrapper,
/// or its `bidder` object does not hold a valid `mid`.
pub fn parse_imp_params(imp: &Imp) -> Result<ExtImpAdformOpenRtb, BidderError> {
    let ext = imp
        .ext
        .as_ref()
        .ok_or_else(|| BidderError::bad_input(format!("imp {}: missing ext", imp.id)))?;

    let wrapper = ExtImpBidder::deserialize(ext)
        .map_err(|e| BidderError::bad_input(format!("imp {}: {e}", imp.id)))?;

    ExtImpAdformOpenRtb::deserialize(&wrapper.bidder)
        .map_err(|e| BidderError::bad_input(format!("imp {}: {e}", imp.id)))
}
