// Evaluation section view model: confusion matrix and classification report
use crate::domain::training::{ClassReport, ModelResult};

const HEADER_CHARS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellIntensity {
    Empty,
    Low,
    High,
}

impl CellIntensity {
    pub fn for_count(count: u64) -> Self {
        match count {
            0 => CellIntensity::Empty,
            1..=9 => CellIntensity::Low,
            _ => CellIntensity::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixCell {
    pub count: u64,
    pub intensity: CellIntensity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    pub header: String,
    pub cells: Vec<MatrixCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixView {
    pub column_headers: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationView {
    pub matrix: MatrixView,
    /// Empty when the result carried no report
    pub report: Vec<ClassReport>,
}

impl EvaluationView {
    /// Nothing renders unless the matrix is N×N with N class labels.
    pub fn build(result: &ModelResult) -> Option<Self> {
        let (matrix, classes) = result.square_matrix()?;

        let column_headers = classes.iter().map(|c| abbreviate(c)).collect();
        let rows = matrix
            .iter()
            .zip(classes)
            .map(|(row, class)| MatrixRow {
                header: abbreviate(class),
                cells: row
                    .iter()
                    .map(|&count| MatrixCell {
                        count,
                        intensity: CellIntensity::for_count(count),
                    })
                    .collect(),
            })
            .collect();

        Some(Self {
            matrix: MatrixView {
                column_headers,
                rows,
            },
            report: result.report.clone().unwrap_or_default(),
        })
    }
}

fn abbreviate(label: &str) -> String {
    label.chars().take(HEADER_CHARS).collect()
}
