use crate::domain::ml::types::FeatureRow;

/// Column order of every feature matrix handed to a learner.
pub const FEATURE_NAMES: &[&str] = &[
    "close_return",
    "vol_14",
    "sma_10",
    "sma_30",
    "rsi_14",
    "volume_change",
    "range_pct",
];

/// Converts a feature row into a learner input vector, in `FEATURE_NAMES` order.
pub fn features_to_f64_vector(fs: &FeatureRow) -> Vec<f64> {
    vec![
        fs.close_return,
        fs.vol_14,
        fs.sma_10,
        fs.sma_30,
        fs.rsi_14,
        fs.volume_change,
        fs.range_pct,
    ]
}

/// Pairs each feature name with its value, for display and audit.
pub fn named_features(fs: &FeatureRow) -> Vec<(&'static str, f64)> {
    FEATURE_NAMES
        .iter()
        .copied()
        .zip(features_to_f64_vector(fs))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_length() {
        let fs = FeatureRow::default();
        let vec = features_to_f64_vector(&fs);
        assert_eq!(vec.len(), FEATURE_NAMES.len());
    }

    #[test]
    fn test_feature_consistency() {
        let fs = FeatureRow {
            close_return: 0.01,
            rsi_14: 70.0,
            range_pct: 0.03,
            ..Default::default()
        };

        let vec = features_to_f64_vector(&fs);
        // close_return is index 0
        assert_eq!(vec[0], 0.01);
        // rsi_14 is index 4
        assert_eq!(vec[4], 70.0);
        // range_pct is last index (6)
        assert_eq!(vec[6], 0.03);
    }

    #[test]
    fn test_named_features_follow_registry_order() {
        let fs = FeatureRow {
            sma_30: 101.5,
            ..Default::default()
        };

        let named = named_features(&fs);
        assert_eq!(named[3], ("sma_30", 101.5));
        assert_eq!(named.len(), 7);
    }
}
