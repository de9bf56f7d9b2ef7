use whc_coords::HicannOnWafer;

/// Which bus orientation a routing target wants to be reached on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A chip the router must reach, on the requested bus orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub hicann: HicannOnWafer,
    pub orientation: Orientation,
}

impl Target {
    pub fn new(hicann: HicannOnWafer, orientation: Orientation) -> Self {
        Target { hicann, orientation }
    }
}
