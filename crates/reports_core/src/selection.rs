use crate::TenantId;

/// Ordered, duplicate-free set of selected tenants.
///
/// Iteration order is the order in which tenants were selected; a batch run
/// requests reports in exactly this order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSet {
    ids: Vec<TenantId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` if absent (appending), removes it if present.
    /// Returns whether the tenant is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|existing| existing == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TenantId> {
        self.ids.iter()
    }

    pub fn as_slice(&self) -> &[TenantId] {
        &self.ids
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
