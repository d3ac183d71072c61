use crate::errors::ArbolError;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A single raw feature value, as supplied by a caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    /// A value drawn from a finite discrete domain.
    Categorical(String),
    /// An ordered numeric value.
    Numeric(f64),
}

impl FeatureValue {
    /// Shorthand for a categorical value.
    pub fn cat(value: &str) -> Self {
        FeatureValue::Categorical(value.to_string())
    }

    /// Shorthand for a numeric value.
    pub fn num(value: f64) -> Self {
        FeatureValue::Numeric(value)
    }

    fn kind_name(&self) -> &'static str {
        match self {
            FeatureValue::Categorical(_) => "categorical",
            FeatureValue::Numeric(_) => "numeric",
        }
    }
}

impl Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FeatureValue::Categorical(v) => write!(f, "{}", v),
            FeatureValue::Numeric(v) => write!(f, "{}", v),
        }
    }
}

/// Whether a feature's values come from a finite discrete domain, or are
/// ordered numbers split by thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// The full domain of the feature, in a fixed order established at load
    /// time. Splitting on the feature creates one branch per domain value.
    Categorical(Vec<String>),
    Numeric,
}

/// Per-feature metadata, fixed for the lifetime of a trained tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    pub kind: FeatureKind,
}

impl FeatureSpec {
    /// A categorical feature over the given domain.
    pub fn categorical(name: &str, domain: &[&str]) -> Self {
        FeatureSpec {
            name: name.to_string(),
            kind: FeatureKind::Categorical(domain.iter().map(|v| v.to_string()).collect()),
        }
    }

    /// A numeric feature.
    pub fn numeric(name: &str) -> Self {
        FeatureSpec {
            name: name.to_string(),
            kind: FeatureKind::Numeric,
        }
    }
}

/// A feature value after encoding against its [`FeatureSpec`]: a position in
/// the categorical domain, or the raw number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum EncodedValue {
    Cat(usize),
    Num(f64),
}

/// A fully encoded feature column.
#[derive(Clone, Debug)]
pub(crate) enum FeatureColumn {
    Cat(Vec<usize>),
    Num(Vec<f64>),
}

/// Validated, column-encoded training data.
///
/// Construction performs every dataset-level check: consistent feature arity,
/// values matching their declared [`FeatureKind`], categorical values inside
/// their declared domain. The label domain is recorded in first-encountered
/// order, which becomes the fixed deterministic ordering used for all
/// majority-label tie-breaks.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub(crate) feature_specs: Vec<FeatureSpec>,
    pub(crate) columns: Vec<FeatureColumn>,
    pub(crate) labels: Vec<usize>,
    pub(crate) label_domain: Vec<String>,
}

impl Dataset {
    /// Build a dataset from row-oriented examples and their labels.
    ///
    /// * `feature_specs` - schema for each feature position.
    /// * `rows` - one example per entry, feature values in spec order.
    /// * `labels` - one label per example.
    pub fn new(
        feature_specs: Vec<FeatureSpec>,
        rows: &[Vec<FeatureValue>],
        labels: &[&str],
    ) -> Result<Self, ArbolError> {
        if rows.is_empty() {
            return Err(ArbolError::InvalidDataset(
                "no examples provided, at least one labeled example is required".to_string(),
            ));
        }
        if rows.len() != labels.len() {
            return Err(ArbolError::InvalidDataset(format!(
                "{} examples but {} labels provided",
                rows.len(),
                labels.len()
            )));
        }
        for spec in feature_specs.iter() {
            if let FeatureKind::Categorical(domain) = &spec.kind {
                if domain.is_empty() {
                    return Err(ArbolError::InvalidDataset(format!(
                        "feature '{}' declares an empty categorical domain",
                        spec.name
                    )));
                }
                let unique: hashbrown::HashSet<&String> = domain.iter().collect();
                if unique.len() != domain.len() {
                    return Err(ArbolError::InvalidDataset(format!(
                        "feature '{}' declares duplicate domain values",
                        spec.name
                    )));
                }
            }
        }

        let domain_maps = domain_maps(&feature_specs);
        let mut columns: Vec<FeatureColumn> = feature_specs
            .iter()
            .map(|spec| match spec.kind {
                FeatureKind::Categorical(_) => FeatureColumn::Cat(Vec::with_capacity(rows.len())),
                FeatureKind::Numeric => FeatureColumn::Num(Vec::with_capacity(rows.len())),
            })
            .collect();

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != feature_specs.len() {
                return Err(ArbolError::InvalidDataset(format!(
                    "example {} has {} feature values but {} features are declared",
                    row_idx,
                    row.len(),
                    feature_specs.len()
                )));
            }
            for (feat_idx, value) in row.iter().enumerate() {
                let encoded = encode_value(&feature_specs[feat_idx], &domain_maps[feat_idx], value)
                    .map_err(|msg| {
                        ArbolError::InvalidDataset(format!("example {}: {}", row_idx, msg))
                    })?;
                match (&mut columns[feat_idx], encoded) {
                    (FeatureColumn::Cat(col), EncodedValue::Cat(id)) => col.push(id),
                    (FeatureColumn::Num(col), EncodedValue::Num(v)) => col.push(v),
                    // encode_value returns the variant matching the spec.
                    _ => unreachable!(),
                }
            }
        }

        // Label domain in first-encountered order.
        let mut label_domain: Vec<String> = Vec::new();
        let mut label_ids: HashMap<String, usize> = HashMap::new();
        let mut encoded_labels = Vec::with_capacity(labels.len());
        for label in labels.iter() {
            let id = *label_ids.entry(label.to_string()).or_insert_with(|| {
                label_domain.push(label.to_string());
                label_domain.len() - 1
            });
            encoded_labels.push(id);
        }

        Ok(Dataset {
            feature_specs,
            columns,
            labels: encoded_labels,
            label_domain,
        })
    }

    /// Number of examples.
    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    /// Number of features.
    pub fn n_features(&self) -> usize {
        self.feature_specs.len()
    }

    /// The per-feature schema this dataset was loaded with.
    pub fn feature_specs(&self) -> &[FeatureSpec] {
        &self.feature_specs
    }

    /// Distinct labels, in first-encountered order.
    pub fn label_domain(&self) -> &[String] {
        &self.label_domain
    }

    /// Per-class label counts over the given example indices.
    pub(crate) fn class_counts(&self, index: &[usize]) -> Vec<usize> {
        let mut counts = vec![0_usize; self.label_domain.len()];
        for i in index {
            counts[self.labels[*i]] += 1;
        }
        counts
    }
}

/// Precomputed value-to-position lookup for each categorical domain.
pub(crate) fn domain_maps(specs: &[FeatureSpec]) -> Vec<HashMap<String, usize>> {
    specs
        .iter()
        .map(|spec| match &spec.kind {
            FeatureKind::Categorical(domain) => domain
                .iter()
                .enumerate()
                .map(|(i, v)| (v.clone(), i))
                .collect(),
            FeatureKind::Numeric => HashMap::new(),
        })
        .collect()
}

/// Encode one value against its spec. The error message names the feature
/// and what was expected; callers wrap it in the error kind appropriate to
/// their phase (`InvalidDataset` at load, `FeatureMismatch` at prediction).
pub(crate) fn encode_value(
    spec: &FeatureSpec,
    domain_map: &HashMap<String, usize>,
    value: &FeatureValue,
) -> Result<EncodedValue, String> {
    match (&spec.kind, value) {
        (FeatureKind::Categorical(domain), FeatureValue::Categorical(v)) => {
            match domain_map.get(v) {
                Some(id) => Ok(EncodedValue::Cat(*id)),
                None => Err(format!(
                    "feature '{}' has no domain value '{}', expected one of [{}]",
                    spec.name,
                    v,
                    domain.join(", ")
                )),
            }
        }
        (FeatureKind::Numeric, FeatureValue::Numeric(v)) => {
            if v.is_nan() {
                Err(format!("feature '{}' holds a NaN value", spec.name))
            } else {
                Ok(EncodedValue::Num(*v))
            }
        }
        (_, observed) => Err(format!(
            "feature '{}' is declared {} but a {} value was observed",
            spec.name,
            match spec.kind {
                FeatureKind::Categorical(_) => "categorical",
                FeatureKind::Numeric => "numeric",
            },
            observed.kind_name()
        )),
    }
}

/// Encode a full example row against the training schema.
pub(crate) fn encode_row(
    specs: &[FeatureSpec],
    domain_map: &[HashMap<String, usize>],
    row: &[FeatureValue],
) -> Result<Vec<EncodedValue>, ArbolError> {
    if row.len() != specs.len() {
        return Err(ArbolError::FeatureMismatch(format!(
            "example has {} feature values but the tree was trained with {}",
            row.len(),
            specs.len()
        )));
    }
    row.iter()
        .zip(specs.iter())
        .zip(domain_map.iter())
        .map(|((value, spec), map)| {
            encode_value(spec, map, value).map_err(ArbolError::FeatureMismatch)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<FeatureSpec> {
        vec![
            FeatureSpec::categorical("Outlook", &["Sunny", "Overcast", "Rain"]),
            FeatureSpec::numeric("Temperature"),
        ]
    }

    #[test]
    fn test_dataset_encoding() {
        let rows = vec![
            vec![FeatureValue::cat("Rain"), FeatureValue::num(20.0)],
            vec![FeatureValue::cat("Sunny"), FeatureValue::num(31.5)],
        ];
        let data = Dataset::new(specs(), &rows, &["Yes", "No"]).unwrap();
        assert_eq!(data.n_rows(), 2);
        assert_eq!(data.n_features(), 2);
        assert_eq!(data.label_domain(), &["Yes".to_string(), "No".to_string()]);
        match &data.columns[0] {
            FeatureColumn::Cat(col) => assert_eq!(col, &vec![2, 0]),
            _ => panic!("expected categorical column"),
        }
        match &data.columns[1] {
            FeatureColumn::Num(col) => assert_eq!(col, &vec![20.0, 31.5]),
            _ => panic!("expected numeric column"),
        }
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = Dataset::new(specs(), &[], &[]).unwrap_err();
        assert!(matches!(err, ArbolError::InvalidDataset(_)));
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let rows = vec![vec![FeatureValue::cat("Rain")]];
        let err = Dataset::new(specs(), &rows, &["Yes"]).unwrap_err();
        assert!(matches!(err, ArbolError::InvalidDataset(_)));
        assert!(err.to_string().contains("1 feature values"));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let rows = vec![vec![FeatureValue::num(1.0), FeatureValue::num(20.0)]];
        let err = Dataset::new(specs(), &rows, &["Yes"]).unwrap_err();
        assert!(err.to_string().contains("declared categorical"));
    }

    #[test]
    fn test_out_of_domain_category_rejected() {
        let rows = vec![vec![FeatureValue::cat("Foggy"), FeatureValue::num(20.0)]];
        let err = Dataset::new(specs(), &rows, &["Yes"]).unwrap_err();
        assert!(err.to_string().contains("Foggy"));
    }

    #[test]
    fn test_nan_value_rejected() {
        let rows = vec![vec![FeatureValue::cat("Rain"), FeatureValue::num(f64::NAN)]];
        let err = Dataset::new(specs(), &rows, &["Yes"]).unwrap_err();
        assert!(err.to_string().contains("NaN"));
    }

    #[test]
    fn test_label_domain_first_encountered_order() {
        let rows = vec![
            vec![FeatureValue::cat("Rain"), FeatureValue::num(1.0)],
            vec![FeatureValue::cat("Rain"), FeatureValue::num(2.0)],
            vec![FeatureValue::cat("Rain"), FeatureValue::num(3.0)],
        ];
        let data = Dataset::new(specs(), &rows, &["No", "Yes", "No"]).unwrap();
        assert_eq!(data.label_domain(), &["No".to_string(), "Yes".to_string()]);
        assert_eq!(data.labels, vec![0, 1, 0]);
        assert_eq!(data.class_counts(&[0, 1, 2]), vec![2, 1]);
    }
}
