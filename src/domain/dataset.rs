// Dataset domain models
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Handle for a dataset the service has accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dataset {
    pub filename: String,
    #[serde(default)]
    pub rows: Option<u64>,
    #[serde(default)]
    pub columns: Option<u64>,
}

impl Dataset {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            rows: None,
            columns: None,
        }
    }
}

/// A local file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl DatasetFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = Self::guess_content_type(&filename).map(str::to_string);
        Self {
            filename,
            bytes,
            content_type,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("No usable file name in {}", path.display()))?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        Ok(Self::new(filename, bytes))
    }

    fn guess_content_type(filename: &str) -> Option<&'static str> {
        let extension = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some("text/csv"),
            "json" => Some("application/json"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(DatasetFile::new("data.csv", vec![]).content_type.as_deref(), Some("text/csv"));
        assert_eq!(
            DatasetFile::new("iris.JSON", vec![]).content_type.as_deref(),
            Some("application/json")
        );
        assert_eq!(DatasetFile::new("notes", vec![]).content_type, None);
    }

    #[test]
    fn test_dataset_handle_with_extra_fields() {
        let dataset: Dataset =
            serde_json::from_str(r#"{"filename":"data.csv","rows":150,"columns":5}"#).unwrap();
        assert_eq!(dataset.filename, "data.csv");
        assert_eq!(dataset.rows, Some(150));
        assert_eq!(dataset.columns, Some(5));
    }

    #[tokio::test]
    async fn test_from_path_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        tokio::fs::write(&path, b"a,b\n1,2\n").await.unwrap();

        let file = DatasetFile::from_path(&path).await.unwrap();
        assert_eq!(file.filename, "data.csv");
        assert_eq!(file.bytes, b"a,b\n1,2\n");
    }
}
