//! Flat column layout shared by the feature groups.

/// A group of named numeric features.
pub trait FeatureGroup {
    /// Column names, in output order.
    const COLUMNS: &'static [&'static str];

    /// Values aligned with [`Self::COLUMNS`]. `None` marks a value that was
    /// not estimated and is omitted from the pair's feature map.
    fn values(&self) -> Vec<Option<f64>>;

    /// Present (name, value) entries.
    fn entries(&self) -> Vec<(&'static str, f64)> {
        Self::COLUMNS
            .iter()
            .copied()
            .zip(self.values())
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }
}
