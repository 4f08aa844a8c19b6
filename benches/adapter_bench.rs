//! Adapter Benchmarks — Per-Auction Hot Path
//!
//! Benchmarks request shaping and response parsing, which run once per
//! auction for every exchange call.
//!
//! Run with: cargo bench --bench adapter_bench

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use adform_openrtb_bidder::adapters::adform::AdformOpenRtbAdapter;
use adform_openrtb_bidder::domain::bidder::{ExtraRequestInfo, ResponseData};
use adform_openrtb_bidder::domain::openrtb::BidRequest;
use adform_openrtb_bidder::ports::bidder::Bidder;

fn sample_request(imps: usize) -> BidRequest {
    let imps: Vec<_> = (0..imps)
        .map(|i| {
            json!({
                "id": format!("imp-{i}"),
                "native": {"request": "{\"ver\":\"1.2\",\"assets\":[{\"id\":1,\"title\":{\"len\":90}}]}"},
                "ext": {"bidder": {"mid": 100_000 + i}}
            })
        })
        .collect();
    serde_json::from_value(json!({
        "id": "bench",
        "imp": imps,
        "site": {"page": "https://example.com/", "publisher": {"id": "p", "name": "n"}},
        "device": {"ua": "Mozilla/5.0", "ip": "198.51.100.1"}
    }))
    .expect("valid bench request")
}

/// Benchmark building the exchange call for a 10-imp auction.
fn bench_make_requests(c: &mut Criterion) {
    let adapter = AdformOpenRtbAdapter::new("https://adx.adform.net/adx/openrtb");
    let request = sample_request(10);
    let extra = ExtraRequestInfo::default();

    c.bench_function("make_requests_10_imps", |b| {
        b.iter(|| adapter.make_requests(black_box(&request), &extra));
    });
}

/// Benchmark parsing a 10-bid exchange response.
fn bench_make_bids(c: &mut Criterion) {
    let adapter = AdformOpenRtbAdapter::new("https://adx.adform.net/adx/openrtb");
    let request = sample_request(10);
    let (calls, _) = adapter.make_requests(&request, &ExtraRequestInfo::default());
    let bids: Vec<_> = (0..10)
        .map(|i| json!({"id": format!("b{i}"), "impid": format!("imp-{i}"), "price": 0.5, "adm": "{}"}))
        .collect();
    let response = ResponseData {
        status_code: 200,
        body: serde_json::to_vec(&json!({"id": "bench", "cur": "USD", "seatbid": [{"bid": bids}]}))
            .expect("serializable response"),
        headers: Vec::new(),
    };

    c.bench_function("make_bids_10_bids", |b| {
        b.iter(|| adapter.make_bids(&request, &calls[0], black_box(&response)));
    });
}

criterion_group!(benches, bench_make_requests, bench_make_bids);
criterion_main!(benches);
