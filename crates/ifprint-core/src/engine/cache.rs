use std::collections::HashMap;

/// Memoized van der Waals contact limits keyed by `(ligand element, protein element)`.
///
/// Owned by a single detector instance; starts empty and fills on demand.
#[derive(Debug, Default, Clone)]
pub struct VdwCache {
    data: HashMap<(String, String), f64>,
}

impl VdwCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ligand_element: &str, protein_element: &str, limit: f64) {
        self.data
            .insert((ligand_element.to_string(), protein_element.to_string()), limit);
    }

    pub fn get(&self, ligand_element: &str, protein_element: &str) -> Option<f64> {
        self.data
            .get(&(ligand_element.to_string(), protein_element.to_string()))
            .copied()
    }

    /// Returns the cached limit, computing and storing it on a miss.
    ///
    /// Nothing is stored when `compute` yields `None`.
    pub fn get_or_insert_with(
        &mut self,
        ligand_element: &str,
        protein_element: &str,
        compute: impl FnOnce() -> Option<f64>,
    ) -> Option<f64> {
        let key = (ligand_element.to_string(), protein_element.to_string());
        if let Some(&limit) = self.data.get(&key) {
            return Some(limit);
        }
        let limit = compute()?;
        self.data.insert(key, limit);
        Some(limit)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.data
            .iter()
            .map(|((lig, prot), &limit)| (lig.as_str(), prot.as_str(), limit))
    }
}
