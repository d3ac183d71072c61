use crate::data::{
    domain_maps, encode_row, Dataset, FeatureColumn, FeatureKind, FeatureSpec, FeatureValue,
};
use crate::errors::ArbolError;
use crate::explain::Rules;
use crate::metrics::{evaluate_predictions, Evaluation};
use crate::node::{InternalNode, LeafNode, SplitTest, TreeNode};
use crate::splitter::best_split;
use crate::utils::majority_index;
use hashbrown::HashMap;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Hyperparameters for growing a tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum tree depth; `None` leaves it unbounded. `Some(0)` yields a
    /// single majority leaf.
    pub max_depth: Option<usize>,
    /// Minimum number of examples a node needs before it may split.
    pub min_examples_to_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams {
            max_depth: None,
            min_examples_to_split: 2,
        }
    }
}

impl TreeParams {
    fn validate(&self) -> Result<(), ArbolError> {
        if self.min_examples_to_split < 1 {
            return Err(ArbolError::InvalidHyperparameter(
                "min_examples_to_split".to_string(),
                "a value of at least 1".to_string(),
                self.min_examples_to_split.to_string(),
            ));
        }
        Ok(())
    }
}

/// An entropy-based decision tree classifier.
///
/// Built once from a training [`Dataset`] via [`DecisionTree::fit`], then
/// queried arbitrarily often. Immutable after training; retraining produces
/// a new tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecisionTree {
    pub root: TreeNode,
    pub feature_specs: Vec<FeatureSpec>,
    /// Distinct labels in first-encountered training order; leaf class ids
    /// index into this.
    pub label_domain: Vec<String>,
    pub depth: usize,
    pub n_leaves: usize,
    domain_maps: Vec<HashMap<String, usize>>,
}

impl DecisionTree {
    /// Grow a tree by recursive entropy-based splitting.
    ///
    /// At each node the feature (and, for numeric features, threshold) with
    /// the largest information gain is selected, ties broken by lowest
    /// feature index then lowest threshold. A node becomes a leaf when its
    /// labels are pure, no usable features remain, it holds fewer than
    /// `min_examples_to_split` examples, `max_depth` is reached, or no split
    /// has positive gain.
    pub fn fit(data: &Dataset, params: &TreeParams) -> Result<Self, ArbolError> {
        params.validate()?;

        for (feature, column) in data.columns.iter().enumerate() {
            if is_constant(column) {
                warn!(
                    "Feature '{}' has a single distinct value; it will never be selected for a split.",
                    data.feature_specs[feature].name
                );
            }
        }

        let index: Vec<usize> = (0..data.n_rows()).collect();
        let mut usable = vec![true; data.n_features()];
        let root = grow(data, index, &mut usable, 0, params);

        let tree = DecisionTree {
            depth: root.depth(),
            n_leaves: root.n_leaves(),
            feature_specs: data.feature_specs.clone(),
            label_domain: data.label_domain.clone(),
            domain_maps: domain_maps(&data.feature_specs),
            root,
        };
        info!("Grew a tree with {} leaves at depth {}.", tree.n_leaves, tree.depth);
        Ok(tree)
    }

    /// Predict the label for a single example.
    pub fn predict(&self, example: &[FeatureValue]) -> Result<&str, ArbolError> {
        let class = self.predict_id(example)?;
        Ok(self.label_domain[class].as_str())
    }

    pub(crate) fn predict_id(&self, example: &[FeatureValue]) -> Result<usize, ArbolError> {
        let encoded = encode_row(&self.feature_specs, &self.domain_maps, example)?;
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return Ok(leaf.label),
                TreeNode::Internal(internal) => {
                    node = &internal.children[internal.child_index(&encoded[internal.feature])];
                }
            }
        }
    }

    /// A lazy, restartable iterator over one human-readable rule per leaf,
    /// in natural outcome order.
    pub fn rules(&self) -> Rules<'_> {
        Rules::new(self)
    }

    /// Evaluate the tree on held-out `(example, true label)` pairs against a
    /// designated positive label.
    ///
    /// Ratios with a zero denominator are defined as 0, not errors. `beta`
    /// weights recall in the F-beta score (`beta = 1` is F1).
    pub fn evaluate(
        &self,
        held_out: &[(Vec<FeatureValue>, &str)],
        positive: &str,
        beta: f64,
    ) -> Result<Evaluation, ArbolError> {
        if beta.is_nan() || beta < 0.0 {
            return Err(ArbolError::InvalidHyperparameter(
                "beta".to_string(),
                "a non-negative value".to_string(),
                beta.to_string(),
            ));
        }
        let positive_id = self.label_id(positive).ok_or_else(|| {
            ArbolError::FeatureMismatch(format!(
                "positive label '{}' is not in the training label domain [{}]",
                positive,
                self.label_domain.join(", ")
            ))
        })?;

        let mut truth = Vec::with_capacity(held_out.len());
        let mut predicted = Vec::with_capacity(held_out.len());
        for (example, label) in held_out {
            let t = self.label_id(label).ok_or_else(|| {
                ArbolError::FeatureMismatch(format!(
                    "true label '{}' is not in the training label domain [{}]",
                    label,
                    self.label_domain.join(", ")
                ))
            })?;
            truth.push(t);
            predicted.push(self.predict_id(example)?);
        }

        Ok(evaluate_predictions(
            &truth,
            &predicted,
            &self.label_domain,
            positive_id,
            beta,
        ))
    }

    /// Total information gain contributed by each split feature, normalized
    /// to sum to 1. Empty for a single-leaf tree.
    pub fn feature_importance(&self) -> HashMap<String, f64> {
        let mut totals: HashMap<String, f64> = HashMap::new();
        accumulate_gain(&self.root, &self.feature_specs, &mut totals);
        let sum: f64 = totals.values().sum();
        if sum > 0.0 {
            for value in totals.values_mut() {
                *value /= sum;
            }
        }
        totals
    }

    fn label_id(&self, label: &str) -> Option<usize> {
        self.label_domain.iter().position(|l| l == label)
    }
}

fn accumulate_gain(node: &TreeNode, specs: &[FeatureSpec], totals: &mut HashMap<String, f64>) {
    if let TreeNode::Internal(internal) = node {
        *totals.entry(specs[internal.feature].name.clone()).or_insert(0.0) += internal.gain;
        for child in internal.children.iter() {
            accumulate_gain(child, specs, totals);
        }
    }
}

fn is_constant(column: &FeatureColumn) -> bool {
    match column {
        FeatureColumn::Cat(col) => col.windows(2).all(|w| w[0] == w[1]),
        FeatureColumn::Num(col) => col.windows(2).all(|w| w[0] == w[1]),
    }
}

/// Recursively grow the subtree over `index`. `usable` marks features still
/// eligible for a split on this path; categorical features are consumed once
/// split on, numeric features stay usable at new thresholds. The flag is
/// restored before returning so sibling branches see the same state.
fn grow(
    data: &Dataset,
    index: Vec<usize>,
    usable: &mut Vec<bool>,
    depth: usize,
    params: &TreeParams,
) -> TreeNode {
    let counts = data.class_counts(&index);

    let pure = counts.iter().filter(|c| **c > 0).count() <= 1;
    let no_features = !usable.iter().any(|u| *u);
    let too_small = index.len() < params.min_examples_to_split;
    let depth_capped = params.max_depth.is_some_and(|d| depth >= d);
    if pure || no_features || too_small || depth_capped {
        return TreeNode::Leaf(LeafNode::from_counts(counts));
    }

    let split = match best_split(data, &index, usable) {
        Some(split) => split,
        // No split improves purity.
        None => return TreeNode::Leaf(LeafNode::from_counts(counts)),
    };

    match split.split_value {
        None => {
            let col = match &data.columns[split.split_feature] {
                FeatureColumn::Cat(col) => col,
                FeatureColumn::Num(_) => unreachable!("categorical split on numeric column"),
            };
            let n_categories = match &data.feature_specs[split.split_feature].kind {
                FeatureKind::Categorical(domain) => domain.len(),
                FeatureKind::Numeric => unreachable!("categorical split on numeric feature"),
            };
            let mut subsets: Vec<Vec<usize>> = vec![Vec::new(); n_categories];
            for i in index {
                subsets[col[i]].push(i);
            }

            let parent_majority = majority_index(&counts);
            usable[split.split_feature] = false;
            let children = subsets
                .into_iter()
                .map(|subset| {
                    if subset.is_empty() {
                        // Default leaf for a domain value absent at this
                        // node: fall back to the parent's majority label.
                        TreeNode::Leaf(LeafNode {
                            label: parent_majority,
                            class_counts: vec![0; counts.len()],
                        })
                    } else {
                        grow(data, subset, usable, depth + 1, params)
                    }
                })
                .collect();
            usable[split.split_feature] = true;

            TreeNode::Internal(InternalNode {
                feature: split.split_feature,
                test: SplitTest::Category,
                gain: split.split_gain,
                children,
            })
        }
        Some(threshold) => {
            let col = match &data.columns[split.split_feature] {
                FeatureColumn::Num(col) => col,
                FeatureColumn::Cat(_) => unreachable!("threshold split on categorical column"),
            };
            let (le, gt): (Vec<usize>, Vec<usize>) =
                index.into_iter().partition(|i| col[*i] <= threshold);

            let children = vec![
                grow(data, le, usable, depth + 1, params),
                grow(data, gt, usable, depth + 1, params),
            ];
            TreeNode::Internal(InternalNode {
                feature: split.split_feature,
                test: SplitTest::Threshold(threshold),
                gain: split.split_gain,
                children,
            })
        }
    }
}

impl Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_subtree(f, &self.root, 0)
    }
}

impl DecisionTree {
    fn fmt_subtree(&self, f: &mut fmt::Formatter, node: &TreeNode, indent: usize) -> fmt::Result {
        match node {
            TreeNode::Leaf(leaf) => {
                writeln!(
                    f,
                    "{:indent$}-> {} ({}/{})",
                    "",
                    self.label_domain[leaf.label],
                    leaf.correct(),
                    leaf.support(),
                )
            }
            TreeNode::Internal(internal) => {
                let spec = &self.feature_specs[internal.feature];
                writeln!(f, "{:indent$}[{}]", "", spec.name)?;
                match (&internal.test, &spec.kind) {
                    (SplitTest::Category, FeatureKind::Categorical(domain)) => {
                        for (i, child) in internal.children.iter().enumerate() {
                            writeln!(f, "{:indent$}  {}:", "", domain[i])?;
                            self.fmt_subtree(f, child, indent + 4)?;
                        }
                    }
                    (SplitTest::Threshold(t), _) => {
                        writeln!(f, "{:indent$}  <= {}:", "", t)?;
                        self.fmt_subtree(f, &internal.children[0], indent + 4)?;
                        writeln!(f, "{:indent$}  > {}:", "", t)?;
                        self.fmt_subtree(f, &internal.children[1], indent + 4)?;
                    }
                    (SplitTest::Category, FeatureKind::Numeric) => {
                        unreachable!("categorical split on numeric feature")
                    }
                }
                Ok(())
            }
        }
    }
}
