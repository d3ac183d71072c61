use crate::constants::GAIN_EPS;
use crate::data::{Dataset, FeatureColumn, FeatureKind};

/// The best split found for a node, with the entropy reduction it achieves.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitInfo {
    pub split_feature: usize,
    /// Information gain of the split, in bits.
    pub split_gain: f64,
    /// Threshold for numeric splits, `None` for categorical splits.
    pub split_value: Option<f64>,
}

/// Label-distribution impurity in bits: `H = -sum(p_c * log2(p_c))` over the
/// classes present.
pub fn entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .iter()
        .filter(|c| **c > 0)
        .map(|c| {
            let p = *c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Search every usable feature for the split with the largest information
/// gain at this node. Ties break deterministically: lowest feature index
/// first, then lowest threshold for numeric features. Returns `None` when no
/// split improves purity.
pub fn best_split(data: &Dataset, index: &[usize], usable: &[bool]) -> Option<SplitInfo> {
    let parent_entropy = entropy(&data.class_counts(index));
    let n_classes = data.label_domain.len();

    let mut best: Option<SplitInfo> = None;
    for feature in 0..data.n_features() {
        if !usable[feature] {
            continue;
        }
        let candidate = match &data.columns[feature] {
            FeatureColumn::Cat(col) => {
                let n_categories = match &data.feature_specs[feature].kind {
                    FeatureKind::Categorical(domain) => domain.len(),
                    FeatureKind::Numeric => unreachable!("categorical column with numeric spec"),
                };
                let gain =
                    categorical_gain(col, &data.labels, n_classes, n_categories, index, parent_entropy);
                Some(SplitInfo {
                    split_feature: feature,
                    split_gain: gain,
                    split_value: None,
                })
            }
            FeatureColumn::Num(col) => {
                numeric_gain(col, &data.labels, n_classes, index, parent_entropy).map(
                    |(gain, threshold)| SplitInfo {
                        split_feature: feature,
                        split_gain: gain,
                        split_value: Some(threshold),
                    },
                )
            }
        };
        // Strictly-greater comparison keeps the lowest feature index on ties.
        if let Some(candidate) = candidate {
            match &best {
                Some(b) if candidate.split_gain <= b.split_gain => {}
                _ => best = Some(candidate),
            }
        }
    }

    best.filter(|b| b.split_gain > GAIN_EPS)
}

/// Gain of partitioning the node's examples exhaustively by category value.
/// Empty categories contribute no weight.
fn categorical_gain(
    col: &[usize],
    labels: &[usize],
    n_classes: usize,
    n_categories: usize,
    index: &[usize],
    parent_entropy: f64,
) -> f64 {
    let mut counts = vec![vec![0_usize; n_classes]; n_categories];
    for i in index {
        counts[col[*i]][labels[*i]] += 1;
    }
    let total = index.len() as f64;
    let weighted: f64 = counts
        .iter()
        .map(|c| {
            let size: usize = c.iter().sum();
            (size as f64 / total) * entropy(c)
        })
        .sum();
    parent_entropy - weighted
}

/// Best threshold for a numeric feature at this node. Every midpoint between
/// consecutive distinct sorted values is a candidate; the scan keeps the
/// first (lowest) threshold among equal gains. Returns `None` when the
/// feature is constant over the node.
fn numeric_gain(
    col: &[f64],
    labels: &[usize],
    n_classes: usize,
    index: &[usize],
    parent_entropy: f64,
) -> Option<(f64, f64)> {
    let mut values: Vec<(f64, usize)> = index.iter().map(|i| (col[*i], labels[*i])).collect();
    if values.len() < 2 {
        return None;
    }
    values.sort_by(|a, b| a.0.total_cmp(&b.0));

    let total = values.len();
    let mut right_counts = vec![0_usize; n_classes];
    for (_, class) in values.iter() {
        right_counts[*class] += 1;
    }
    let mut left_counts = vec![0_usize; n_classes];

    let mut best: Option<(f64, f64)> = None;
    for i in 0..total - 1 {
        let (value, class) = values[i];
        left_counts[class] += 1;
        right_counts[class] -= 1;
        let next_value = values[i + 1].0;
        if value == next_value {
            continue;
        }
        let threshold = (value + next_value) / 2.0;
        let n_left = (i + 1) as f64;
        let n_right = (total - i - 1) as f64;
        let weighted = (n_left / total as f64) * entropy(&left_counts)
            + (n_right / total as f64) * entropy(&right_counts);
        let gain = parent_entropy - weighted;
        match best {
            Some((best_gain, _)) if gain <= best_gain => {}
            _ => best = Some((gain, threshold)),
        }
    }
    best
}
