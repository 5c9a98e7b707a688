use super::model::{ElectricalDataset, OpticalDataset};

// ---------------------------------------------------------------------------
// Structural validity: which datasets may feed an entry
// ---------------------------------------------------------------------------

/// A dataset that may be promoted onto its entry.
pub trait Promotable {
    /// Whether the dataset is well-formed enough to promote.
    fn is_structurally_valid(&self) -> bool;
}

impl Promotable for OpticalDataset {
    fn is_structurally_valid(&self) -> bool {
        OpticalDataset::is_structurally_valid(self)
    }
}

impl Promotable for ElectricalDataset {
    /// Every field is optional, so any parsed electrical dataset qualifies.
    fn is_structurally_valid(&self) -> bool {
        true
    }
}

/// Indices of datasets that pass the structural check, in order.
pub fn valid_indices<T: Promotable>(datasets: &[T]) -> Vec<usize> {
    datasets
        .iter()
        .enumerate()
        .filter(|(_, ds)| ds.is_structurally_valid())
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Selection policy
// ---------------------------------------------------------------------------

/// The dataset whose values are promoted: the first structurally valid one.
///
/// Later datasets are kept on the entry but never aggregated.
pub fn select_promoted<T: Promotable>(datasets: &[T]) -> Option<&T> {
    datasets.iter().find(|ds| ds.is_structurally_valid())
}
