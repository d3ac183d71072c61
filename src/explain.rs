use crate::data::{FeatureKind, FeatureSpec};
use crate::node::{InternalNode, SplitTest, TreeNode};
use crate::tree::DecisionTree;

/// A lazy iterator over one human-readable rule per leaf.
///
/// Each rule is the conjunction of the tests along a root-to-leaf path,
/// followed by the predicted label and the leaf's training support, e.g.
/// `Outlook = Sunny AND Humidity = High -> No (3/3)`. Leaves are visited
/// depth-first, children in natural outcome order: ascending category order,
/// `<=` before `>`. A single-leaf tree yields one unconditional rule.
///
/// The iterator is a read-only view over the tree; calling
/// [`DecisionTree::rules`] again restarts it from the beginning.
pub struct Rules<'a> {
    specs: &'a [FeatureSpec],
    label_domain: &'a [String],
    // Explicit DFS stack. Children are pushed in reverse so the first
    // outcome pops first.
    stack: Vec<(&'a TreeNode, Vec<String>)>,
}

impl<'a> Rules<'a> {
    pub(crate) fn new(tree: &'a DecisionTree) -> Self {
        Rules {
            specs: &tree.feature_specs,
            label_domain: &tree.label_domain,
            stack: vec![(&tree.root, Vec::new())],
        }
    }
}

impl<'a> Iterator for Rules<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some((node, path)) = self.stack.pop() {
            match node {
                TreeNode::Leaf(leaf) => {
                    let prediction = &self.label_domain[leaf.label];
                    let conjunction = if path.is_empty() {
                        "always".to_string()
                    } else {
                        path.join(" AND ")
                    };
                    return Some(format!(
                        "{} -> {} ({}/{})",
                        conjunction,
                        prediction,
                        leaf.correct(),
                        leaf.support()
                    ));
                }
                TreeNode::Internal(internal) => {
                    for (i, child) in internal.children.iter().enumerate().rev() {
                        let mut next_path = path.clone();
                        next_path.push(branch_test(self.specs, internal, i));
                        self.stack.push((child, next_path));
                    }
                }
            }
        }
        None
    }
}

/// The test string for one outcome of an internal node's split.
fn branch_test(specs: &[FeatureSpec], node: &InternalNode, child: usize) -> String {
    let name = &specs[node.feature].name;
    match &node.test {
        SplitTest::Category => {
            let domain = match &specs[node.feature].kind {
                FeatureKind::Categorical(domain) => domain,
                FeatureKind::Numeric => unreachable!("categorical split on numeric feature"),
            };
            format!("{} = {}", name, domain[child])
        }
        SplitTest::Threshold(t) => {
            if child == 0 {
                format!("{} <= {}", name, t)
            } else {
                format!("{} > {}", name, t)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{purchase_dataset, weather_dataset};
    use crate::tree::{DecisionTree, TreeParams};

    #[test]
    fn test_weather_rules() {
        let data = weather_dataset();
        let tree = DecisionTree::fit(&data, &TreeParams::default()).unwrap();
        let rules: Vec<String> = tree.rules().collect();
        assert_eq!(rules.len(), tree.n_leaves);
        assert_eq!(
            rules,
            vec![
                "Outlook = Sunny AND Humidity = High -> No (3/3)",
                "Outlook = Sunny AND Humidity = Normal -> Yes (2/2)",
                "Outlook = Overcast -> Yes (4/4)",
                "Outlook = Rain AND Windy = false -> Yes (3/3)",
                "Outlook = Rain AND Windy = true -> No (2/2)",
            ]
        );
    }

    #[test]
    fn test_numeric_rules() {
        let data = purchase_dataset();
        let tree = DecisionTree::fit(&data, &TreeParams::default()).unwrap();
        let rules: Vec<String> = tree.rules().collect();
        assert_eq!(
            rules,
            vec!["Age <= 29.5 -> 0 (3/3)", "Age > 29.5 -> 1 (4/4)"]
        );
    }

    #[test]
    fn test_rules_restartable() {
        let data = weather_dataset();
        let tree = DecisionTree::fit(&data, &TreeParams::default()).unwrap();
        let first: Vec<String> = tree.rules().collect();
        let second: Vec<String> = tree.rules().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_leaf_rule() {
        use crate::data::{Dataset, FeatureSpec, FeatureValue};
        let specs = vec![FeatureSpec::numeric("x")];
        let rows = vec![vec![FeatureValue::num(1.0)], vec![FeatureValue::num(2.0)]];
        let data = Dataset::new(specs, &rows, &["A", "A"]).unwrap();
        let tree = DecisionTree::fit(&data, &TreeParams::default()).unwrap();
        let rules: Vec<String> = tree.rules().collect();
        assert_eq!(rules, vec!["always -> A (2/2)"]);
    }
}
