//! A generic resource manager: tracks which resources of a given id type
//! are present, user-masked, and allocated.

use crate::error::{ResourceError, ResourceResult};
use std::collections::HashSet;
use std::hash::Hash;

/// Which resources of type `T` (e.g. `HicannOnWafer`) are present on the
/// wafer, masked out by the user, or currently allocated.
///
/// The C++ original indirects through a `RedmanResourcesType` template
/// trait class per resource kind; a Rust generic type parameter does the
/// same job without the indirection layer.
#[derive(Debug, Clone)]
pub struct Manager<T: Eq + Hash + Copy> {
    present: HashSet<T>,
    masked: HashSet<T>,
    allocated: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Default for Manager<T> {
    fn default() -> Self {
        Manager { present: HashSet::new(), masked: HashSet::new(), allocated: HashSet::new() }
    }
}

impl<T: Eq + Hash + Copy> Manager<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a resource as present (loaded from defect/inventory data).
    pub fn load(&mut self, resource: T) {
        self.present.insert(resource);
    }

    pub fn has(&self, resource: &T) -> bool {
        self.present.contains(resource)
    }

    pub fn mask(&mut self, resource: T) -> ResourceResult<()> {
        if !self.has(&resource) {
            return Err(ResourceError::NotPresent);
        }
        self.masked.insert(resource);
        Ok(())
    }

    pub fn unmask(&mut self, resource: T) -> ResourceResult<()> {
        if !self.has(&resource) {
            return Err(ResourceError::NotPresent);
        }
        self.masked.remove(&resource);
        Ok(())
    }

    pub fn masked(&self, resource: &T) -> bool {
        self.masked.contains(resource)
    }

    /// Present and not masked, i.e. eligible for allocation.
    pub fn available(&self, resource: &T) -> bool {
        self.present.contains(resource) && !self.masked.contains(resource) && !self.allocated.contains(resource)
    }

    pub fn allocate(&mut self, resource: T) -> ResourceResult<()> {
        if !self.has(&resource) {
            log::warn!("allocation requested for a resource not present on the wafer");
            return Err(ResourceError::NotPresent);
        }
        if self.allocated.contains(&resource) {
            log::debug!("allocation requested for a resource already in use");
            return Err(ResourceError::InUse);
        }
        self.allocated.insert(resource);
        Ok(())
    }

    pub fn release(&mut self, resource: T) -> ResourceResult<()> {
        if !self.allocated.remove(&resource) {
            log::warn!("release requested for a resource that was not allocated");
            return Err(ResourceError::NotAllocated);
        }
        Ok(())
    }

    pub fn count_present(&self) -> usize {
        self.present.len()
    }

    pub fn count_allocated(&self) -> usize {
        self.allocated.len()
    }

    pub fn count_available(&self) -> usize {
        self.present.iter().filter(|r| self.available(r)).count()
    }

    pub fn present_iter(&self) -> impl Iterator<Item = &T> {
        self.present.iter()
    }

    pub fn available_iter(&self) -> impl Iterator<Item = &T> {
        self.present.iter().filter(move |r| self.available(r))
    }

    pub fn allocated_iter(&self) -> impl Iterator<Item = &T> {
        self.allocated.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_requires_presence() {
        let mut m: Manager<u32> = Manager::new();
        assert_eq!(m.allocate(1).unwrap_err(), ResourceError::NotPresent);
        m.load(1);
        m.allocate(1).unwrap();
        assert_eq!(m.allocate(1).unwrap_err(), ResourceError::InUse);
    }

    #[test]
    fn masked_resources_are_unavailable() {
        let mut m: Manager<u32> = Manager::new();
        m.load(1);
        assert!(m.available(&1));
        m.mask(1).unwrap();
        assert!(!m.available(&1));
        m.unmask(1).unwrap();
        assert!(m.available(&1));
    }

    #[test]
    fn release_requires_prior_allocation() {
        let mut m: Manager<u32> = Manager::new();
        m.load(1);
        assert_eq!(m.release(1).unwrap_err(), ResourceError::NotAllocated);
        m.allocate(1).unwrap();
        m.release(1).unwrap();
        assert!(m.available(&1));
    }

    #[test]
    fn counts_reflect_three_independent_sets() {
        let mut m: Manager<u32> = Manager::new();
        for i in 0..5 {
            m.load(i);
        }
        m.mask(0).unwrap();
        m.allocate(1).unwrap();
        assert_eq!(m.count_present(), 5);
        assert_eq!(m.count_allocated(), 1);
        assert_eq!(m.count_available(), 3);
    }
}
