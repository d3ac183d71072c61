//! A small numeric dataset: who purchased, given age and salary. Fits a tree
//! on the full table and prints it with its rules.
use arbol::{Dataset, DecisionTree, FeatureSpec, FeatureValue, TreeParams};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let specs = vec![FeatureSpec::numeric("Age"), FeatureSpec::numeric("Salary")];
    let table: [(f64, f64, &str); 7] = [
        (25.0, 50000.0, "0"),
        (30.0, 60000.0, "1"),
        (45.0, 80000.0, "1"),
        (35.0, 75000.0, "1"),
        (22.0, 40000.0, "0"),
        (40.0, 90000.0, "1"),
        (29.0, 48000.0, "0"),
    ];
    let rows: Vec<Vec<FeatureValue>> = table
        .iter()
        .map(|(age, salary, _)| vec![FeatureValue::num(*age), FeatureValue::num(*salary)])
        .collect();
    let labels: Vec<&str> = table.iter().map(|(_, _, purchased)| *purchased).collect();

    let data = Dataset::new(specs, &rows, &labels)?;
    let tree = DecisionTree::fit(&data, &TreeParams::default())?;

    println!("{}", tree);
    for rule in tree.rules() {
        println!("{}", rule);
    }

    for (row, (age, salary, label)) in rows.iter().zip(table.iter()) {
        let predicted = tree.predict(row)?;
        println!(
            "Age {} Salary {} -> predicted {} (actual {})",
            age, salary, predicted, label
        );
    }
    Ok(())
}
