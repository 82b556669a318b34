//! Vendor registry
//!
//! Holds the known vendors keyed by id and decides listing order and
//! visibility.

use std::collections::HashMap;
use std::sync::Arc;

use crate::vendor::VendorInfo;

#[derive(Default, Clone)]
pub struct VendorRegistry {
    by_id: HashMap<&'static str, Arc<dyn VendorInfo>>,
}

impl std::fmt::Debug for VendorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorRegistry")
            .field("vendors", &self.ids())
            .finish()
    }
}

impl VendorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vendor, replacing any previous one with the same id.
    pub fn register(&mut self, vendor: Arc<dyn VendorInfo>) -> &mut Self {
        tracing::debug!(vendor = vendor.id(), "registering vendor");
        self.by_id.insert(vendor.id(), vendor);
        self
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn VendorInfo>> {
        self.by_id.get(id).cloned()
    }

    /// All vendors, by rank then id.
    pub fn list(&self) -> Vec<Arc<dyn VendorInfo>> {
        let mut vendors: Vec<_> = self.by_id.values().cloned().collect();
        vendors.sort_by(|a, b| a.rank().cmp(&b.rank()).then_with(|| a.id().cmp(b.id())));
        vendors
    }

    /// Vendors the backend currently supports, in listing order.
    pub fn visible(&self) -> Vec<Arc<dyn VendorInfo>> {
        self.list()
            .into_iter()
            .filter(|v| v.has_backend_cap())
            .collect()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.list().iter().map(|v| v.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
