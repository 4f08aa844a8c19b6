//! Adform OpenRTB Adapter
//!
//! Translates host auctions into Adform's OpenRTB dialect:
//! - each impression gets `tagid` set from its `mid` bidder param
//! - impressions with unusable params are dropped and reported
//! - the site publisher id is stripped before the request leaves
//! - every bid returned is a native bid

use tracing::{debug, warn};

use crate::config::BidderConfig;
use crate::domain::bidder::{
    BidType, BidderInfo, BidderResponse, ExtraRequestInfo, RequestData, ResponseData, TypedBid,
};
use crate::domain::errors::BidderError;
use crate::domain::openrtb::{BidRequest, BidResponse, Imp};
use crate::domain::params::parse_imp_params;
use crate::ports::bidder::Bidder;

const STATUS_OK: u16 = 200;
const STATUS_NO_CONTENT: u16 = 204;
const STATUS_BAD_REQUEST: u16 = 400;

/// Adform OpenRTB bidder.
#[derive(Debug, Clone)]
pub struct AdformOpenRtbAdapter {
    /// Exchange endpoint every request is POSTed to.
    endpoint: String,
    maintainer_email: String,
}

impl AdformOpenRtbAdapter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            maintainer_email: String::new(),
        }
    }

    /// Build the adapter from its `[bidder]` config section.
    pub fn from_config(config: &BidderConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            maintainer_email: config.maintainer_email.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Copy of `request` in the shape Adform expects, plus one error per dropped imp.
    fn shape_request(request: &BidRequest) -> (BidRequest, Vec<BidderError>) {
        let mut errors = Vec::new();
        let mut shaped = request.clone();

        let imps = std::mem::take(&mut shaped.imp);
        let mut valid_imps: Vec<Imp> = Vec::with_capacity(imps.len());
        for mut imp in imps {
            match parse_imp_params(&imp) {
                Ok(params) => {
                    imp.tagid = Some(params.mid.to_string());
                    valid_imps.push(imp);
                }
                Err(e) => {
                    debug!(imp = %imp.id, error = %e, "Dropping imp with invalid bidder params");
                    errors.push(e);
                }
            }
        }
        shaped.imp = valid_imps;

        if let Some(publisher) = shaped.site.as_mut().and_then(|s| s.publisher.as_mut()) {
            publisher.id = None;
        }

        (shaped, errors)
    }
}

impl Bidder for AdformOpenRtbAdapter {
    fn make_requests(
        &self,
        request: &BidRequest,
        _extra: &ExtraRequestInfo,
    ) -> (Vec<RequestData>, Vec<BidderError>) {
        let (shaped, mut errors) = Self::shape_request(request);

        if shaped.imp.is_empty() {
            warn!(
                request_id = %request.id,
                dropped = errors.len(),
                "No valid imps left, sending empty imp list"
            );
        }

        let body = match serde_json::to_vec(&shaped) {
            Ok(body) => body,
            Err(e) => {
                errors.push(BidderError::Serialization(e));
                return (Vec::new(), errors);
            }
        };

        let request_data = RequestData {
            method: "POST".to_string(),
            uri: self.endpoint.clone(),
            body,
            headers: vec![
                (
                    "Content-Type".to_string(),
                    "application/json;charset=utf-8".to_string(),
                ),
                ("Accept".to_string(), "application/json".to_string()),
            ],
        };

        (vec![request_data], errors)
    }

    fn make_bids(
        &self,
        request: &BidRequest,
        _request_data: &RequestData,
        response: &ResponseData,
    ) -> Result<BidderResponse, BidderError> {
        if response.status_code == STATUS_BAD_REQUEST {
            return Err(BidderError::bad_input(
                "Unexpected status code: 400. Bad request from publisher.",
            ));
        }

        if response.status_code == STATUS_NO_CONTENT || response.body.is_empty() {
            return Err(BidderError::bad_input(
                "Empty response from ad server. Invalid request.",
            ));
        }

        if response.status_code != STATUS_OK {
            return Err(BidderError::bad_server_response(format!(
                "Unexpected status code: {}.",
                response.status_code
            )));
        }

        let parsed: BidResponse =
            serde_json::from_slice(&response.body).map_err(BidderError::Deserialization)?;

        let mut bidder_response = BidderResponse::with_bids_capacity(request.imp.len());
        if let Some(cur) = parsed.cur.filter(|c| !c.is_empty()) {
            bidder_response.currency = cur;
        }

        for seat_bid in parsed.seatbid {
            bidder_response
                .bids
                .extend(seat_bid.bid.into_iter().map(|bid| TypedBid {
                    bid,
                    bid_type: BidType::Native,
                }));
        }

        Ok(bidder_response)
    }

    fn info(&self) -> BidderInfo {
        BidderInfo {
            maintainer_email: self.maintainer_email.clone(),
            site_media_types: vec![BidType::Native],
            app_media_types: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::openrtb::{App, Native, Publisher, Site};
    use serde_json::{Value, json};

    const ENDPOINT: &str = "http://adx.adform.net/adx/openrtb";

    fn adapter() -> AdformOpenRtbAdapter {
        AdformOpenRtbAdapter::new(ENDPOINT)
    }

    fn native_imp(id: &str, ext: Value) -> Imp {
        Imp {
            id: id.to_string(),
            native: Some(Native {
                request: "{}".to_string(),
                ..Native::default()
            }),
            ext: Some(ext),
            ..Imp::default()
        }
    }

    fn ok_response(body: Value) -> ResponseData {
        ResponseData {
            status_code: 200,
            body: serde_json::to_vec(&body).unwrap(),
            headers: Vec::new(),
        }
    }

    fn body_of(req: &RequestData) -> Value {
        serde_json::from_slice(&req.body).unwrap()
    }

    #[test]
    fn test_single_post_with_tagid() {
        let request = BidRequest {
            id: "req".to_string(),
            imp: vec![native_imp("1", json!({"bidder": {"mid": 12345}}))],
            ..BidRequest::default()
        };

        let (reqs, errors) = adapter().make_requests(&request, &ExtraRequestInfo::default());
        assert!(errors.is_empty());
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].method, "POST");
        assert_eq!(reqs[0].uri, ENDPOINT);
        assert_eq!(
            reqs[0].header("Content-Type"),
            Some("application/json;charset=utf-8")
        );
        assert_eq!(reqs[0].header("Accept"), Some("application/json"));

        let body = body_of(&reqs[0]);
        assert_eq!(body["imp"][0]["tagid"], "12345");
        assert_eq!(body["imp"][0]["ext"]["bidder"]["mid"], 12345);
    }

    #[test]
    fn test_invalid_imps_are_dropped_in_order() {
        let request = BidRequest {
            id: "req".to_string(),
            imp: vec![
                native_imp("a", json!({"bidder": {"mid": 1}})),
                native_imp("b", json!({"bidder": {"mid": "x"}})),
                native_imp("c", json!("not an object")),
                native_imp("d", json!({"bidder": {"mid": "4"}})),
            ],
            ..BidRequest::default()
        };

        let (reqs, errors) = adapter().make_requests(&request, &ExtraRequestInfo::default());
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, BidderError::BadInput { .. })));

        let body = body_of(&reqs[0]);
        let ids: Vec<&str> = body["imp"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["a", "d"]);
        assert_eq!(body["imp"][1]["tagid"], "4");
    }

    #[test]
    fn test_no_valid_imps_still_posts_once() {
        let request = BidRequest {
            id: "req".to_string(),
            imp: vec![
                native_imp("a", json!({"bidder": {}})),
                Imp {
                    id: "b".to_string(),
                    ..Imp::default()
                },
            ],
            ..BidRequest::default()
        };

        let (reqs, errors) = adapter().make_requests(&request, &ExtraRequestInfo::default());
        assert_eq!(errors.len(), 2);
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].method, "POST");

        let body = body_of(&reqs[0]);
        assert_eq!(body["id"], "req");
        assert_eq!(body["imp"], json!([]));
    }

    #[test]
    fn test_site_publisher_id_is_stripped_on_copy_only() {
        let request = BidRequest {
            id: "req".to_string(),
            imp: vec![native_imp("1", json!({"bidder": {"mid": 1}}))],
            site: Some(Site {
                page: Some("https://news.example/".to_string()),
                publisher: Some(Publisher {
                    id: Some("pub-42".to_string()),
                    name: Some("Example News".to_string()),
                    ..Publisher::default()
                }),
                ..Site::default()
            }),
            ..BidRequest::default()
        };

        let (reqs, _) = adapter().make_requests(&request, &ExtraRequestInfo::default());
        let body = body_of(&reqs[0]);
        assert!(body["site"]["publisher"].get("id").is_none());
        assert_eq!(body["site"]["publisher"]["name"], "Example News");
        assert_eq!(body["site"]["page"], "https://news.example/");

        let caller_publisher = request.site.unwrap().publisher.unwrap();
        assert_eq!(caller_publisher.id.as_deref(), Some("pub-42"));
        assert_eq!(request.imp[0].tagid, None);
    }

    #[test]
    fn test_app_publisher_id_is_kept() {
        let request = BidRequest {
            id: "req".to_string(),
            imp: vec![native_imp("1", json!({"bidder": {"mid": 1}}))],
            app: Some(App {
                publisher: Some(Publisher {
                    id: Some("app-pub".to_string()),
                    ..Publisher::default()
                }),
                ..App::default()
            }),
            ..BidRequest::default()
        };

        let (reqs, _) = adapter().make_requests(&request, &ExtraRequestInfo::default());
        assert_eq!(body_of(&reqs[0])["app"]["publisher"]["id"], "app-pub");
    }

    #[test]
    fn test_status_classification() {
        let request = BidRequest::default();
        let req_data = RequestData {
            method: "POST".to_string(),
            uri: ENDPOINT.to_string(),
            body: Vec::new(),
            headers: Vec::new(),
        };
        let a = adapter();

        let bad_request = ResponseData {
            status_code: 400,
            body: b"oops".to_vec(),
            headers: Vec::new(),
        };
        let err = a.make_bids(&request, &req_data, &bad_request).unwrap_err();
        assert!(matches!(err, BidderError::BadInput { .. }));
        assert_eq!(
            err.to_string(),
            "Unexpected status code: 400. Bad request from publisher."
        );

        let no_content = ResponseData {
            status_code: 204,
            ..ResponseData::default()
        };
        let err = a.make_bids(&request, &req_data, &no_content).unwrap_err();
        assert_eq!(err.to_string(), "Empty response from ad server. Invalid request.");

        // Empty body wins over an unexpected status.
        let empty_500 = ResponseData {
            status_code: 500,
            ..ResponseData::default()
        };
        let err = a.make_bids(&request, &req_data, &empty_500).unwrap_err();
        assert!(matches!(err, BidderError::BadInput { .. }));

        let server_error = ResponseData {
            status_code: 503,
            body: b"down".to_vec(),
            headers: Vec::new(),
        };
        let err = a.make_bids(&request, &req_data, &server_error).unwrap_err();
        assert!(matches!(err, BidderError::BadServerResponse { .. }));
        assert_eq!(err.to_string(), "Unexpected status code: 503.");
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let request = BidRequest::default();
        let req_data = RequestData {
            method: "POST".to_string(),
            uri: ENDPOINT.to_string(),
            body: Vec::new(),
            headers: Vec::new(),
        };
        let resp = ResponseData {
            status_code: 200,
            body: b"{not json".to_vec(),
            headers: Vec::new(),
        };
        let err = adapter().make_bids(&request, &req_data, &resp).unwrap_err();
        assert!(matches!(err, BidderError::Deserialization(_)));
    }

    #[test]
    fn test_bids_are_native_across_seats() {
        let request = BidRequest {
            id: "req".to_string(),
            imp: vec![native_imp("1", json!({"bidder": {"mid": 1}}))],
            ..BidRequest::default()
        };
        let (reqs, _) = adapter().make_requests(&request, &ExtraRequestInfo::default());

        let resp = ok_response(json!({
            "id": "req",
            "cur": "EUR",
            "seatbid": [
                {"bid": [{"id": "b1", "impid": "1", "price": 0.5, "adm": "{\"native\":{}}"}]},
                {"bid": [{"id": "b2", "impid": "1", "price": 0.75}, {"id": "b3", "impid": "1", "price": 0.25}]}
            ]
        }));

        let out = adapter().make_bids(&request, &reqs[0], &resp).unwrap();
        assert_eq!(out.currency, "EUR");
        let ids: Vec<&str> = out.bids.iter().map(|b| b.bid.id.as_str()).collect();
        assert_eq!(ids, ["b1", "b2", "b3"]);
        assert!(out.bids.iter().all(|b| b.bid_type == BidType::Native));
        assert!((out.bids[1].bid.price - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_currency_keeps_default() {
        let request = BidRequest::default();
        let req_data = RequestData {
            method: "POST".to_string(),
            uri: ENDPOINT.to_string(),
            body: Vec::new(),
            headers: Vec::new(),
        };
        let out = adapter()
            .make_bids(&request, &req_data, &ok_response(json!({"id": "x", "seatbid": []})))
            .unwrap();
        assert_eq!(out.currency, "USD");
        assert!(out.bids.is_empty());
    }

    #[test]
    fn test_nulls_and_missing_scalars_keep_the_bids() {
        let request = BidRequest::default();
        let req_data = RequestData {
            method: "POST".to_string(),
            uri: ENDPOINT.to_string(),
            body: Vec::new(),
            headers: Vec::new(),
        };
        let a = adapter();

        let out = a
            .make_bids(&request, &req_data, &ok_response(json!({"id": "r", "seatbid": null})))
            .unwrap();
        assert!(out.bids.is_empty());

        let resp = ok_response(json!({
            "cur": "EUR",
            "seatbid": [
                {"bid": null},
                {"bid": [
                    {"id": "b1", "impid": "1", "price": 0.4, "adomain": null},
                    {"impid": "1", "adm": "{}"}
                ]}
            ]
        }));
        let out = a.make_bids(&request, &req_data, &resp).unwrap();
        assert_eq!(out.currency, "EUR");
        assert_eq!(out.bids.len(), 2);
        assert_eq!(out.bids[0].bid.id, "b1");
        assert!(out.bids[0].bid.adomain.is_empty());
        assert_eq!(out.bids[1].bid.id, "");
        assert!(out.bids[1].bid.price.abs() < f64::EPSILON);
    }

    #[test]
    fn test_info_declares_site_native_only() {
        let info = adapter().info();
        assert_eq!(info.site_media_types, vec![BidType::Native]);
        assert!(!info.supports_app());
    }
}
