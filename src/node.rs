use crate::data::EncodedValue;
use crate::utils::majority_index;
use serde::{Deserialize, Serialize};

/// The test applied at an internal node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SplitTest {
    /// Equality test against the feature's categorical domain; one child per
    /// domain value, indexed by domain position. Domain values absent from
    /// the node's training examples still get a child, a leaf carrying the
    /// parent's majority label, so prediction never fails on them.
    Category,
    /// Threshold test for a numeric feature; children are `[<=, >]`.
    Threshold(f64),
}

/// A terminal prediction node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeafNode {
    /// Predicted class id, the majority label among training examples that
    /// reached this node.
    pub label: usize,
    /// Training example count per class at this node, for confidence
    /// reporting. All zero for the default leaf of an empty categorical
    /// branch.
    pub class_counts: Vec<usize>,
}

impl LeafNode {
    pub(crate) fn from_counts(class_counts: Vec<usize>) -> Self {
        LeafNode {
            label: majority_index(&class_counts),
            class_counts,
        }
    }

    /// Total training examples that reached this leaf.
    pub fn support(&self) -> usize {
        self.class_counts.iter().sum()
    }

    /// Training examples at this leaf that carry the predicted label.
    pub fn correct(&self) -> usize {
        self.class_counts[self.label]
    }
}

/// A branching decision node. Owns its children outright, so the structure
/// is acyclic with no shared references between branches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InternalNode {
    /// Index of the split feature.
    pub feature: usize,
    pub test: SplitTest,
    /// Information gain achieved by this split, in bits.
    pub gain: f64,
    /// One child per test outcome, in outcome order.
    pub children: Vec<TreeNode>,
}

impl InternalNode {
    /// Which child an encoded value routes to.
    pub(crate) fn child_index(&self, value: &EncodedValue) -> usize {
        match (&self.test, value) {
            (SplitTest::Category, EncodedValue::Cat(id)) => *id,
            (SplitTest::Threshold(t), EncodedValue::Num(v)) => {
                if *v <= *t {
                    0
                } else {
                    1
                }
            }
            // Encoding against the training schema guarantees the variant
            // matches the test.
            _ => unreachable!("encoded value kind does not match split test"),
        }
    }
}

/// A node of a trained tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf(LeafNode),
    Internal(InternalNode),
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf(_))
    }

    /// Number of leaves in the subtree rooted here.
    pub fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 1,
            TreeNode::Internal(node) => node.children.iter().map(TreeNode::n_leaves).sum(),
        }
    }

    /// Depth of the subtree rooted here; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Internal(node) => {
                1 + node.children.iter().map(TreeNode::depth).max().unwrap_or(0)
            }
        }
    }
}
