// Training domain models
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fixed set of algorithms the service can train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    #[default]
    LogisticRegression,
    KNearestNeighbors,
    DecisionTree,
    SupportVectorMachine,
    RandomForest,
    UnlearningProtocol,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::LogisticRegression,
        Algorithm::KNearestNeighbors,
        Algorithm::DecisionTree,
        Algorithm::SupportVectorMachine,
        Algorithm::RandomForest,
        Algorithm::UnlearningProtocol,
    ];

    /// Value sent as `algo` in the train request.
    pub fn wire_name(self) -> &'static str {
        match self {
            Algorithm::LogisticRegression => "Logistic Regression",
            Algorithm::KNearestNeighbors => "K-Nearest Neighbors",
            Algorithm::DecisionTree => "Decision Tree",
            Algorithm::SupportVectorMachine => "Support Vector Machine",
            Algorithm::RandomForest => "Random Forest",
            Algorithm::UnlearningProtocol => "Unlearning Protocol",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Algorithm::LogisticRegression => "Logistic Regression",
            Algorithm::KNearestNeighbors => "K-Nearest Neighbors (KNN)",
            Algorithm::DecisionTree => "Decision Tree Classifier",
            Algorithm::SupportVectorMachine => "Support Vector Machine (SVM)",
            Algorithm::RandomForest => "Random Forest Classifier",
            Algorithm::UnlearningProtocol => "Fairness & Unlearning Protocol",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    /// Accepts either the wire name or the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.wire_name().eq_ignore_ascii_case(s) || a.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// Per-class precision/recall/F1 row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassReport {
    #[serde(rename = "class", deserialize_with = "display_string")]
    pub class_name: String,
    #[serde(deserialize_with = "display_string")]
    pub precision: String,
    #[serde(deserialize_with = "display_string")]
    pub recall: String,
    #[serde(deserialize_with = "display_string")]
    pub f1: String,
}

/// Output of one successful training run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResult {
    #[serde(default, deserialize_with = "display_string")]
    pub accuracy: String,
    #[serde(default, deserialize_with = "display_string")]
    pub status: String,
    #[serde(default, deserialize_with = "display_string")]
    pub privacy_score: String,
    #[serde(default)]
    pub confusion_matrix: Option<Vec<Vec<u64>>>,
    #[serde(default)]
    pub classes: Option<Vec<String>>,
    #[serde(default)]
    pub report: Option<Vec<ClassReport>>,
}

impl ModelResult {
    /// Matrix and labels, but only when the matrix is N×N with N labels.
    pub fn square_matrix(&self) -> Option<(&[Vec<u64>], &[String])> {
        let matrix = self.confusion_matrix.as_deref()?;
        let classes = self.classes.as_deref()?;
        let n = classes.len();
        if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
            return None;
        }
        Some((matrix, classes))
    }
}

/// The service reports scores either as preformatted strings or as bare numbers.
fn display_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
        Null(()),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Integer(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Null(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!("Random Forest".parse::<Algorithm>(), Ok(Algorithm::RandomForest));
        assert_eq!(
            "Fairness & Unlearning Protocol".parse::<Algorithm>(),
            Ok(Algorithm::UnlearningProtocol)
        );
        assert_eq!(
            "Gradient Boosting".parse::<Algorithm>(),
            Err(UnknownAlgorithm("Gradient Boosting".to_string()))
        );
    }

    #[test]
    fn test_model_result_from_service_payload() {
        let json = r#"{
            "accuracy": "95.3%",
            "status": "Deployed",
            "privacyScore": "Medium",
            "confusionMatrix": [[5, 0], [1, 4]],
            "classes": ["cat", "dog"],
            "report": [{"class": "cat", "precision": "0.83", "recall": 1.0, "f1": "0.91"}]
        }"#;
        let result: ModelResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.accuracy, "95.3%");
        assert_eq!(result.privacy_score, "Medium");
        assert_eq!(result.report.as_ref().unwrap()[0].recall, "1");
        assert!(result.square_matrix().is_some());
    }

    #[test]
    fn test_square_matrix_rejects_mismatched_shapes() {
        let mut result: ModelResult = serde_json::from_str(
            r#"{"accuracy": 0.9, "confusionMatrix": [[1, 2], [3, 4]], "classes": ["a", "b", "c"]}"#,
        )
        .unwrap();
        assert_eq!(result.accuracy, "0.9");
        assert!(result.square_matrix().is_none());

        result.classes = None;
        assert!(result.square_matrix().is_none());

        result.classes = Some(vec!["a".into(), "b".into()]);
        result.confusion_matrix = Some(vec![vec![1, 2], vec![3]]);
        assert!(result.square_matrix().is_none());
    }
}
