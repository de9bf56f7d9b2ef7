//! Round-trip tests for the canonical textual route serialisation.

use whc_coords::{HLineOnHICANN, HicannOnWafer, VLineOnHICANN};
use whc_route::{parse_text, to_text, L1Route, L1Segment};

fn hicann(x: u16, y: u16) -> HicannOnWafer {
    HicannOnWafer::new(x, y).unwrap()
}

#[test]
fn roundtrip_single_chip_route() {
    let h = hicann(18, 8);
    let vline = VLineOnHICANN::new(5).unwrap();
    let hline = HLineOnHICANN::new(4).unwrap();
    let route = L1Route::new(vec![L1Segment::Hicann(h), L1Segment::VLine(vline), L1Segment::HLine(hline)]).unwrap();

    let text1 = to_text(&route);
    let parsed = parse_text(&text1).expect("parse");
    let text2 = to_text(&parsed);
    assert_eq!(text1, text2, "route text did not round-trip identically");
    assert_eq!(parsed, route);
}

#[test]
fn roundtrip_chip_crossing_route() {
    let h = hicann(18, 8);
    let east = h.east().unwrap();
    let hline = HLineOnHICANN::new(3).unwrap();
    let route = L1Route::new(vec![
        L1Segment::Hicann(h),
        L1Segment::HLine(hline),
        L1Segment::Hicann(east),
        L1Segment::HLine(hline),
    ])
    .unwrap();

    let text1 = to_text(&route);
    let parsed = parse_text(&text1).expect("parse");
    assert_eq!(parsed, route);
    assert_eq!(to_text(&parsed), text1);
}

#[test]
fn parse_rejects_malformed_text() {
    assert!(parse_text("").is_err());
    assert!(parse_text("H18_8 not_a_token").is_err());
}
