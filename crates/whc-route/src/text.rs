//! Canonical textual serialisation of an `L1Route`: one space-separated
//! token per segment. Independent of the `Display` impls on `L1Segment`'s
//! variants (which are meant for short diagnostic output, not necessarily
//! lossless); every token defined here round-trips exactly.

use crate::error::{RouteError, RouteResult};
use crate::route::L1Route;
use crate::segment::L1Segment;
use whc_coords::{
    DNCMergerOnHICANN, GbitLinkOnHICANN, HLineOnHICANN, HRepeaterOnHICANN, HicannOnWafer,
    MergerOnHICANN, RepeaterBlockOnHICANN, SideHorizontal, SideVertical, SynapseColumnOnHICANN,
    SynapseDriverOnHICANN, SynapseOnHICANN, VLineOnHICANN, VRepeaterOnHICANN,
};

pub fn to_text(route: &L1Route) -> String {
    route.segments().iter().map(segment_token).collect::<Vec<_>>().join(" ")
}

pub fn parse_text(text: &str) -> RouteResult<L1Route> {
    let segments = text
        .split_whitespace()
        .map(parse_token)
        .collect::<RouteResult<Vec<L1Segment>>>()?;
    L1Route::new(segments)
}

fn segment_token(segment: &L1Segment) -> String {
    match segment {
        L1Segment::Hicann(h) => format!("H{}_{}", h.x(), h.y()),
        L1Segment::Merger(m) => format!("M{}_{}", m.level(), m.index()),
        L1Segment::DncMerger(d) => format!("DNC{}", d.value()),
        L1Segment::GbitLink(g) => format!("GL{}", g.value()),
        L1Segment::RepeaterBlock(r) => format!("RB{}", r.value()),
        L1Segment::HLine(l) => format!("HL{}", l.raw()),
        L1Segment::VLine(l) => format!("VL{}", l.raw()),
        L1Segment::HRepeater(r) => format!("HR{}_{}", r.to_hline().raw(), side_h_char(r.to_side_horizontal())),
        L1Segment::VRepeater(r) => format!("VR{}_{}", r.to_vline().raw(), side_v_char(r.to_side_vertical())),
        L1Segment::SynapseDriver(d) => format!("SD{}{}", side_h_char(d.to_side_horizontal()), d.y()),
        L1Segment::Synapse(s) => {
            let row = s.row();
            let driver = row.driver();
            format!(
                "SY{}{}{}_{}",
                side_h_char(driver.to_side_horizontal()),
                driver.y(),
                if row.is_top() { "T" } else { "B" },
                s.column().value()
            )
        }
    }
}

fn side_h_char(side: SideHorizontal) -> char {
    match side {
        SideHorizontal::Left => 'L',
        SideHorizontal::Right => 'R',
    }
}

fn parse_side_h(c: char) -> RouteResult<SideHorizontal> {
    match c {
        'L' => Ok(SideHorizontal::Left),
        'R' => Ok(SideHorizontal::Right),
        _ => Err(RouteError::ParseError(format!("unknown horizontal side '{c}'"))),
    }
}

fn side_v_char(side: SideVertical) -> char {
    match side {
        SideVertical::Top => 'T',
        SideVertical::Bottom => 'B',
    }
}

fn parse_side_v(c: char) -> RouteResult<SideVertical> {
    match c {
        'T' => Ok(SideVertical::Top),
        'B' => Ok(SideVertical::Bottom),
        _ => Err(RouteError::ParseError(format!("unknown vertical side '{c}'"))),
    }
}

fn parse_error(token: &str) -> RouteError {
    RouteError::ParseError(format!("unrecognised token '{token}'"))
}

fn parse_u16(s: &str, token: &str) -> RouteResult<u16> {
    s.parse().map_err(|_| parse_error(token))
}

fn parse_u8(s: &str, token: &str) -> RouteResult<u8> {
    s.parse().map_err(|_| parse_error(token))
}

fn parse_token(token: &str) -> RouteResult<L1Segment> {
    if let Some(rest) = token.strip_prefix('H').filter(|_| !token.starts_with("HL") && !token.starts_with("HR")) {
        let (x, y) = rest.split_once('_').ok_or_else(|| parse_error(token))?;
        let hicann = HicannOnWafer::new(parse_u16(x, token)?, parse_u16(y, token)?)
            .map_err(|e| RouteError::ParseError(e.to_string()))?;
        return Ok(L1Segment::Hicann(hicann));
    }
    if let Some(rest) = token.strip_prefix('M') {
        let (level, index) = rest.split_once('_').ok_or_else(|| parse_error(token))?;
        let merger = MergerOnHICANN::new(parse_u8(level, token)?, parse_u8(index, token)?)
            .map_err(|e| RouteError::ParseError(e.to_string()))?;
        return Ok(L1Segment::Merger(merger));
    }
    if let Some(rest) = token.strip_prefix("DNC") {
        let dnc = DNCMergerOnHICANN::new(parse_u8(rest, token)?).map_err(|e| RouteError::ParseError(e.to_string()))?;
        return Ok(L1Segment::DncMerger(dnc));
    }
    if let Some(rest) = token.strip_prefix("GL") {
        let gl = GbitLinkOnHICANN::new(parse_u8(rest, token)?).map_err(|e| RouteError::ParseError(e.to_string()))?;
        return Ok(L1Segment::GbitLink(gl));
    }
    if let Some(rest) = token.strip_prefix("RB") {
        let rb = RepeaterBlockOnHICANN::new(parse_u8(rest, token)?).map_err(|e| RouteError::ParseError(e.to_string()))?;
        return Ok(L1Segment::RepeaterBlock(rb));
    }
    if let Some(rest) = token.strip_prefix("HL") {
        let hl = HLineOnHICANN::new(parse_u8(rest, token)?).map_err(|e| RouteError::ParseError(e.to_string()))?;
        return Ok(L1Segment::HLine(hl));
    }
    if let Some(rest) = token.strip_prefix("VL") {
        let vl = VLineOnHICANN::new(parse_u16(rest, token)?).map_err(|e| RouteError::ParseError(e.to_string()))?;
        return Ok(L1Segment::VLine(vl));
    }
    if let Some(rest) = token.strip_prefix("HR") {
        let (line, side) = rest.split_once('_').ok_or_else(|| parse_error(token))?;
        let side_char = side.chars().next().ok_or_else(|| parse_error(token))?;
        let hline = HLineOnHICANN::new(parse_u8(line, token)?).map_err(|e| RouteError::ParseError(e.to_string()))?;
        return Ok(L1Segment::HRepeater(HRepeaterOnHICANN::new(hline, parse_side_h(side_char)?)));
    }
    if let Some(rest) = token.strip_prefix("VR") {
        let (line, side) = rest.split_once('_').ok_or_else(|| parse_error(token))?;
        let side_char = side.chars().next().ok_or_else(|| parse_error(token))?;
        let vline = VLineOnHICANN::new(parse_u16(line, token)?).map_err(|e| RouteError::ParseError(e.to_string()))?;
        return Ok(L1Segment::VRepeater(VRepeaterOnHICANN::new(vline, parse_side_v(side_char)?)));
    }
    if let Some(rest) = token.strip_prefix("SY") {
        let side_char = rest.chars().next().ok_or_else(|| parse_error(token))?;
        let remainder = &rest[1..];
        let top_bottom_idx = remainder.find(|c| c == 'T' || c == 'B').ok_or_else(|| parse_error(token))?;
        let y_str = &remainder[..top_bottom_idx];
        let top_char = remainder.as_bytes()[top_bottom_idx] as char;
        let after = &remainder[top_bottom_idx + 1..];
        let column_str = after.strip_prefix('_').ok_or_else(|| parse_error(token))?;
        let driver = SynapseDriverOnHICANN::new(parse_side_h(side_char)?, parse_u8(y_str, token)?)
            .map_err(|e| RouteError::ParseError(e.to_string()))?;
        let (top_row, bottom_row) = driver.rows();
        let row = if top_char == 'T' { top_row } else { bottom_row };
        let column = SynapseColumnOnHICANN::new(parse_u16(column_str, token)?).map_err(|e| RouteError::ParseError(e.to_string()))?;
        let synapse = row.synapse(column.value()).map_err(|e| RouteError::ParseError(e.to_string()))?;
        return Ok(L1Segment::Synapse(synapse));
    }
    if let Some(rest) = token.strip_prefix("SD") {
        let side_char = rest.chars().next().ok_or_else(|| parse_error(token))?;
        let y_str = &rest[1..];
        let driver = SynapseDriverOnHICANN::new(parse_side_h(side_char)?, parse_u8(y_str, token)?)
            .map_err(|e| RouteError::ParseError(e.to_string()))?;
        return Ok(L1Segment::SynapseDriver(driver));
    }
    Err(parse_error(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(x: u16, y: u16) -> HicannOnWafer {
        HicannOnWafer::new(x, y).unwrap()
    }

    #[test]
    fn round_trips_a_simple_route() {
        let hicann = h(18, 8);
        let vline = VLineOnHICANN::new(5).unwrap();
        let hline = HLineOnHICANN::new(4).unwrap();
        let route = L1Route::new(vec![L1Segment::Hicann(hicann), L1Segment::VLine(vline), L1Segment::HLine(hline)]).unwrap();
        let text = to_text(&route);
        let parsed = parse_text(&text).unwrap();
        assert_eq!(parsed, route);
    }

    #[test]
    fn round_trips_synapse_and_driver_tokens() {
        let hicann = h(18, 8);
        let vline = VLineOnHICANN::new(5).unwrap();
        let driver = SynapseDriverOnHICANN::new(vline.to_side_horizontal(), 4).unwrap();
        let (row, _) = driver.rows();
        let synapse = row.synapse(12).unwrap();
        let route = L1Route::new(vec![
            L1Segment::Hicann(hicann),
            L1Segment::VLine(vline),
            L1Segment::SynapseDriver(driver),
            L1Segment::Synapse(synapse),
        ]);
        let route = route.unwrap();
        let text = to_text(&route);
        let parsed = parse_text(&text).unwrap();
        assert_eq!(parsed, route);
    }

    #[test]
    fn rejects_garbage_tokens() {
        assert!(parse_text("H18_8 nonsense").is_err());
    }
}
