//! Metrics
//!
//! Held-out evaluation of a trained tree: accuracy, precision, recall,
//! F-scores, confusion matrix, confidence and lift. Every ratio with a zero
//! denominator is defined as 0; degenerate inputs are never errors.
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Counts per `(true label, predicted label)` pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    // Row-major over the label domain: rows are truth, columns predictions.
    counts: Vec<usize>,
}

impl ConfusionMatrix {
    pub(crate) fn new(labels: Vec<String>) -> Self {
        let n = labels.len();
        ConfusionMatrix {
            labels,
            counts: vec![0; n * n],
        }
    }

    pub(crate) fn increment(&mut self, truth: usize, predicted: usize) {
        self.counts[truth * self.labels.len() + predicted] += 1;
    }

    /// The label domain, in training order; rows and columns follow it.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Count at a `(true, predicted)` class-id pair.
    pub fn count_at(&self, truth: usize, predicted: usize) -> usize {
        self.counts[truth * self.labels.len() + predicted]
    }

    /// Count for a `(true, predicted)` label pair, `None` for unknown labels.
    pub fn count(&self, truth: &str, predicted: &str) -> Option<usize> {
        let t = self.labels.iter().position(|l| l == truth)?;
        let p = self.labels.iter().position(|l| l == predicted)?;
        Some(self.count_at(t, p))
    }

    /// Total misclassified examples.
    pub fn off_diagonal(&self) -> usize {
        let n = self.labels.len();
        (0..n)
            .flat_map(|t| (0..n).map(move |p| (t, p)))
            .filter(|(t, p)| t != p)
            .map(|(t, p)| self.count_at(t, p))
            .sum()
    }
}

impl Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(|l| l.len())
            .max()
            .unwrap_or(0)
            .max(5);
        write!(f, "{:>width$}", "")?;
        for label in self.labels.iter() {
            write!(f, " {:>width$}", label)?;
        }
        writeln!(f)?;
        for (t, label) in self.labels.iter().enumerate() {
            write!(f, "{:>width$}", label)?;
            for p in 0..self.labels.len() {
                write!(f, " {:>width$}", self.count_at(t, p))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation record for one held-out set and one designated positive label.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Evaluation {
    pub accuracy: f64,
    /// `TP / (TP + FP)` for the positive label.
    pub precision: f64,
    /// `TP / (TP + FN)` for the positive label.
    pub recall: f64,
    pub f1: f64,
    /// F-score at the requested `beta`.
    pub f_beta: f64,
    pub beta: f64,
    /// Alias of precision over the predicted-positive subset; kept under its
    /// own name since callers expect it.
    pub confidence: f64,
    /// Precision divided by the positive base rate of the held-out set
    /// itself; 0 when the base rate is 0.
    pub lift: f64,
    pub confusion: ConfusionMatrix,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f_score(precision: f64, recall: f64, beta: f64) -> f64 {
    let b2 = beta * beta;
    let denominator = b2 * precision + recall;
    if denominator == 0.0 {
        0.0
    } else {
        (1.0 + b2) * precision * recall / denominator
    }
}

/// Compute the full evaluation record from encoded truth/prediction pairs.
pub(crate) fn evaluate_predictions(
    truth: &[usize],
    predicted: &[usize],
    labels: &[String],
    positive: usize,
    beta: f64,
) -> Evaluation {
    let mut confusion = ConfusionMatrix::new(labels.to_vec());
    let mut correct = 0;
    let (mut tp, mut fp, mut fn_) = (0_usize, 0_usize, 0_usize);
    for (t, p) in truth.iter().zip(predicted.iter()) {
        confusion.increment(*t, *p);
        if t == p {
            correct += 1;
        }
        if *p == positive {
            if *t == positive {
                tp += 1;
            } else {
                fp += 1;
            }
        } else if *t == positive {
            fn_ += 1;
        }
    }

    let accuracy = ratio(correct, truth.len());
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let base_rate = ratio(tp + fn_, truth.len());
    let lift = if base_rate == 0.0 {
        0.0
    } else {
        precision / base_rate
    };

    Evaluation {
        accuracy,
        precision,
        recall,
        f1: f_score(precision, recall, 1.0),
        f_beta: f_score(precision, recall, beta),
        beta,
        confidence: precision,
        lift,
        confusion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::precision_round;

    fn labels() -> Vec<String> {
        vec!["No".to_string(), "Yes".to_string()]
    }

    #[test]
    fn test_perfect_predictions() {
        let truth = vec![0, 1, 1, 0, 1];
        let eval = evaluate_predictions(&truth, &truth, &labels(), 1, 1.0);
        assert_eq!(eval.accuracy, 1.0);
        assert_eq!(eval.precision, 1.0);
        assert_eq!(eval.recall, 1.0);
        assert_eq!(eval.f1, 1.0);
        assert_eq!(eval.f_beta, 1.0);
        assert_eq!(eval.confidence, 1.0);
        assert_eq!(eval.confusion.off_diagonal(), 0);
        assert_eq!(eval.confusion.count("Yes", "Yes"), Some(3));
        assert_eq!(eval.confusion.count("No", "No"), Some(2));
    }

    #[test]
    fn test_zero_denominators_are_zero() {
        // Nothing predicted positive and nothing truly positive.
        let truth = vec![0, 0, 0];
        let predicted = vec![0, 0, 0];
        let eval = evaluate_predictions(&truth, &predicted, &labels(), 1, 1.0);
        assert_eq!(eval.accuracy, 1.0);
        assert_eq!(eval.precision, 0.0);
        assert_eq!(eval.recall, 0.0);
        assert_eq!(eval.f1, 0.0);
        assert_eq!(eval.lift, 0.0);
    }

    #[test]
    fn test_precision_recall_and_lift() {
        let truth = vec![1, 0, 1, 0];
        let predicted = vec![1, 1, 1, 0];
        let eval = evaluate_predictions(&truth, &predicted, &labels(), 1, 1.0);
        assert_eq!(eval.accuracy, 0.75);
        assert_eq!(precision_round(eval.precision, 6), 0.666667);
        assert_eq!(eval.recall, 1.0);
        assert_eq!(eval.confidence, eval.precision);
        // Base rate of the positive label is 0.5.
        assert_eq!(precision_round(eval.lift, 6), 1.333333);
        assert_eq!(eval.confusion.count("No", "Yes"), Some(1));
        assert_eq!(eval.confusion.off_diagonal(), 1);
    }

    #[test]
    fn test_f2_weights_recall() {
        let truth = vec![1, 1, 1, 0, 0];
        let predicted = vec![1, 0, 0, 0, 0];
        let eval = evaluate_predictions(&truth, &predicted, &labels(), 1, 2.0);
        // precision 1.0, recall 1/3: F2 = 5 * p * r / (4p + r).
        assert_eq!(eval.precision, 1.0);
        assert_eq!(precision_round(eval.recall, 6), 0.333333);
        assert_eq!(precision_round(eval.f1, 6), 0.5);
        assert_eq!(precision_round(eval.f_beta, 6), precision_round(5.0 / 13.0, 6));
    }

    #[test]
    fn test_confusion_display() {
        let truth = vec![0, 1];
        let predicted = vec![0, 0];
        let eval = evaluate_predictions(&truth, &predicted, &labels(), 1, 1.0);
        let printed = eval.confusion.to_string();
        assert!(printed.contains("No"));
        assert!(printed.contains("Yes"));
        assert_eq!(printed.lines().count(), 3);
    }
}
