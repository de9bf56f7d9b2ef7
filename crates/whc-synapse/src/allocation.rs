//! Packs a computed driver requirement onto actual `SynapseDriverOnHICANN`
//! coordinates: a chain of drivers that `chains_with` each other, handed
//! out starting from the lowest usable row.

use whc_coords::{SynapseDriverOnHICANN, VLineOnHICANN};

/// The role a driver in a chain plays relative to the L1 input it serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverMode {
    /// Drives both rows directly from its own L1 input.
    Primary,
    /// Repeats the primary's input without decoding it again.
    Mirror,
    /// Receives its input over the L1 network from a primary elsewhere.
    L1,
    /// Both an L1 receiver and a mirror source for a further driver.
    L1Mirror,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedSynapseDrivers {
    pub drivers: Vec<SynapseDriverOnHICANN>,
    pub primary: SynapseDriverOnHICANN,
}

impl ConnectedSynapseDrivers {
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

/// Find the lowest-y contiguous chain of `rows_needed.div_ceil(2)` usable
/// drivers on the side `incoming_vline` feeds, the first of which becomes
/// `primary`.
pub fn allocate_chain(
    incoming_vline: VLineOnHICANN,
    rows_needed: usize,
    available: impl Fn(&SynapseDriverOnHICANN) -> bool,
) -> Option<ConnectedSynapseDrivers> {
    if rows_needed == 0 {
        return None;
    }
    let side = incoming_vline.to_side_horizontal();
    let drivers_needed = rows_needed.div_ceil(2);

    let mut start = Some(SynapseDriverOnHICANN::new(side, 0).expect("y=0 is always in range"));
    while let Some(candidate) = start {
        let mut chain = Vec::with_capacity(drivers_needed);
        let mut cursor = Some(candidate);
        for _ in 0..drivers_needed {
            match cursor {
                Some(driver) if available(&driver) => {
                    chain.push(driver);
                    cursor = driver.next().and_then(|n| n.next());
                }
                _ => {
                    chain.clear();
                    break;
                }
            }
        }
        if chain.len() == drivers_needed {
            let primary = chain[0];
            return Some(ConnectedSynapseDrivers { drivers: chain, primary });
        }
        start = candidate.next();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use whc_coords::SideHorizontal;

    #[test]
    fn allocates_the_lowest_available_chain() {
        let vline = VLineOnHICANN::new(0).unwrap();
        let defective = SynapseDriverOnHICANN::new(SideHorizontal::Left, 0).unwrap();
        let result = allocate_chain(vline, 4, |d| *d != defective).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.primary.y(), 2);
        assert_eq!(result.drivers[1].y(), 4);
    }

    #[test]
    fn returns_none_when_the_side_has_no_room_for_the_chain() {
        let vline = VLineOnHICANN::new(0).unwrap();
        let result = allocate_chain(vline, 4, |_| false);
        assert!(result.is_none());
    }

    #[test]
    fn zero_rows_needed_allocates_nothing() {
        let vline = VLineOnHICANN::new(0).unwrap();
        assert!(allocate_chain(vline, 0, |_| true).is_none());
    }
}
