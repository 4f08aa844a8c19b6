//! Capability Enforcement - Pre-filtering by Bidder Info
//!
//! Before a bidder sees a request, the host removes what the bidder
//! declared it cannot handle:
//! - app traffic for site-only bidders (and vice versa) is rejected outright
//! - unsupported media objects are stripped from each imp
//! - imps left with no media are dropped with a warning

use tracing::debug;

use crate::domain::bidder::{BidType, BidderInfo};
use crate::domain::errors::BidderError;
use crate::domain::openrtb::{BidRequest, Imp};

/// Result of filtering a request against bidder capabilities.
#[derive(Debug)]
pub struct FilteredRequest {
    /// Request the bidder is allowed to see.
    pub request: BidRequest,
    /// Non-fatal warnings, one per dropped imp.
    pub warnings: Vec<BidderError>,
}

/// Filter `request` down to what `info` says the bidder supports.
///
/// # Errors
/// Returns `BadInput` if the traffic type is unsupported or no imp survives.
pub fn enforce_capabilities(
    request: &BidRequest,
    info: &BidderInfo,
) -> Result<FilteredRequest, BidderError> {
    let allowed: &[BidType] = if request.app.is_some() {
        if !info.supports_app() {
            return Err(BidderError::bad_input("this bidder does not support app requests"));
        }
        &info.app_media_types
    } else {
        if !info.supports_site() {
            return Err(BidderError::bad_input("this bidder does not support site requests"));
        }
        &info.site_media_types
    };

    let mut filtered = request.clone();
    let mut warnings = Vec::new();

    let imps = std::mem::take(&mut filtered.imp);
    filtered.imp = imps
        .into_iter()
        .filter_map(|imp| {
            let imp = strip_unsupported_media(imp, allowed);
            if imp.has_no_media() {
                debug!(imp = %imp.id, "Dropping imp without supported media");
                warnings.push(BidderError::bad_input(format!(
                    "imp {} has no media types supported by this bidder",
                    imp.id
                )));
                None
            } else {
                Some(imp)
            }
        })
        .collect();

    if filtered.imp.is_empty() {
        return Err(BidderError::bad_input(
            "request has no impressions with media types supported by this bidder",
        ));
    }

    Ok(FilteredRequest {
        request: filtered,
        warnings,
    })
}

fn strip_unsupported_media(mut imp: Imp, allowed: &[BidType]) -> Imp {
    if !allowed.contains(&BidType::Banner) {
        imp.banner = None;
    }
    if !allowed.contains(&BidType::Video) {
        imp.video = None;
    }
    if !allowed.contains(&BidType::Audio) {
        imp.audio = None;
    }
    if !allowed.contains(&BidType::Native) {
        imp.native = None;
    }
    imp
}
