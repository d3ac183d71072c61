//! Shared dataset builders for unit tests.

use crate::data::{Dataset, FeatureSpec, FeatureValue};

pub fn weather_specs() -> Vec<FeatureSpec> {
    vec![
        FeatureSpec::categorical("Outlook", &["Sunny", "Overcast", "Rain"]),
        FeatureSpec::categorical("Temperature", &["Hot", "Mild", "Cool"]),
        FeatureSpec::categorical("Humidity", &["High", "Normal"]),
        FeatureSpec::categorical("Windy", &["false", "true"]),
    ]
}

/// The 14-row weather/"Play" table from the classic ID3 worked example.
pub fn weather_rows() -> (Vec<Vec<FeatureValue>>, Vec<&'static str>) {
    let raw: [(&str, &str, &str, &str, &str); 14] = [
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
    let rows = raw
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
    let labels = raw.iter().map(|(_, _, _, _, play)| *play).collect();
    (rows, labels)
}

pub fn weather_dataset() -> Dataset {
    let (rows, labels) = weather_rows();
    Dataset::new(weather_specs(), &rows, &labels).unwrap()
}

pub fn purchase_specs() -> Vec<FeatureSpec> {
    vec![FeatureSpec::numeric("Age"), FeatureSpec::numeric("Salary")]
}

/// Seven numeric Age/Salary rows with a linearly separable "Purchased" label.
pub fn purchase_rows() -> (Vec<Vec<FeatureValue>>, Vec<&'static str>) {
    let raw: [(f64, f64, &str); 7] = [
        (25.0, 50000.0, "0"),
        (30.0, 60000.0, "1"),
        (45.0, 80000.0, "1"),
        (35.0, 75000.0, "1"),
        (22.0, 40000.0, "0"),
        (40.0, 90000.0, "1"),
        (29.0, 48000.0, "0"),
    ];
    let rows = raw
        .iter()
        .map(|(age, salary, _)| vec![FeatureValue::num(*age), FeatureValue::num(*salary)])
        .collect();
    let labels = raw.iter().map(|(_, _, purchased)| *purchased).collect();
    (rows, labels)
}

pub fn purchase_dataset() -> Dataset {
    let (rows, labels) = purchase_rows();
    Dataset::new(purchase_specs(), &rows, &labels).unwrap()
}
