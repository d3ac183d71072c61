//! The classic weather/"Play" table: fit a tree, hold out the last rows, and
//! print evaluation metrics and the learned rules.
use arbol::{Dataset, DecisionTree, FeatureSpec, FeatureValue, TreeParams};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let specs = vec![
        FeatureSpec::categorical("Outlook", &["Sunny", "Overcast", "Rain"]),
        FeatureSpec::categorical("Temperature", &["Hot", "Mild", "Cool"]),
        FeatureSpec::categorical("Humidity", &["High", "Normal"]),
        FeatureSpec::categorical("Windy", &["false", "true"]),
    ];
    let table: [(&str, &str, &str, &str, &str); 14] = [
        ("Sunny", "Hot", "High", "false", "No"),
        ("Sunny", "Hot", "High", "true", "No"),
        ("Overcast", "Hot", "High", "false", "Yes"),
        ("Rain", "Mild", "High", "false", "Yes"),
        ("Rain", "Cool", "Normal", "false", "Yes"),
        ("Rain", "Cool", "Normal", "true", "No"),
        ("Overcast", "Cool", "Normal", "true", "Yes"),
        ("Sunny", "Mild", "High", "false", "No"),
        ("Sunny", "Cool", "Normal", "false", "Yes"),
        ("Rain", "Mild", "Normal", "false", "Yes"),
        ("Sunny", "Mild", "Normal", "true", "Yes"),
        ("Overcast", "Mild", "High", "true", "Yes"),
        ("Overcast", "Hot", "Normal", "false", "Yes"),
        ("Rain", "Mild", "High", "true", "No"),
    ];
    let rows: Vec<Vec<FeatureValue>> = table
        .iter()
        .map(|(outlook, temperature, humidity, windy, _)| {
            vec![
                FeatureValue::cat(outlook),
                FeatureValue::cat(temperature),
                FeatureValue::cat(humidity),
                FeatureValue::cat(windy),
            ]
        })
        .collect();
    let labels: Vec<&str> = table.iter().map(|(_, _, _, _, play)| *play).collect();

    // Deterministic hold-out split: the last three rows are the test set.
    let n_train = 11;
    let data = Dataset::new(specs, &rows[..n_train], &labels[..n_train])?;
    let tree = DecisionTree::fit(&data, &TreeParams::default())?;

    let held_out: Vec<(Vec<FeatureValue>, &str)> = rows[n_train..]
        .iter()
        .cloned()
        .zip(labels[n_train..].iter().copied())
        .collect();
    let eval = tree.evaluate(&held_out, "Yes", 2.0)?;

    println!("Accuracy: {}", eval.accuracy);
    println!("Precision: {}", eval.precision);
    println!("Recall: {}", eval.recall);
    println!("F1 Score: {}", eval.f1);
    println!("F2 Score: {}", eval.f_beta);
    println!("Confidence: {}", eval.confidence);
    println!("Lift: {}", eval.lift);
    println!("\nConfusion Matrix:\n{}", eval.confusion);

    println!("Decision Tree Rules:");
    for rule in tree.rules() {
        println!("  {}", rule);
    }
    Ok(())
}
