// Header, dataset and training panel view models
use crate::application::training_controller::TrainingController;
use crate::application::upload_controller::{UploadController, UploadState};
use crate::domain::session::UserProfile;
use crate::domain::training::Algorithm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub name: String,
    pub avatar: String,
}

impl HeaderView {
    pub fn build(user: &UserProfile) -> Self {
        Self {
            name: user.name.clone(),
            avatar: user.avatar.clone().unwrap_or_else(|| "U".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPanel {
    pub badge: &'static str,
    pub filename: String,
    pub busy: bool,
}

impl DatasetPanel {
    pub fn build(upload: &UploadController) -> Self {
        let state = upload.state();
        let filename = state
            .last_dataset()
            .map_or_else(|| "No file selected".to_string(), |d| d.filename.clone());
        // A kept filename is always labelled with why it is not trainable
        let badge = match &state {
            UploadState::Ready(_) => "Ready",
            UploadState::Uploading { .. } => "Uploading",
            UploadState::Failed { previous: Some(_) } => "Failed",
            UploadState::Idle | UploadState::Failed { previous: None } => "Missing",
        };
        Self {
            badge,
            filename,
            busy: state.is_uploading(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmOption {
    pub algorithm: Algorithm,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPanel {
    pub options: Vec<AlgorithmOption>,
    pub button_label: &'static str,
    pub disabled: bool,
}

impl TrainingPanel {
    pub fn build(training: &TrainingController) -> Self {
        let selected = training.selected();
        let options = Algorithm::ALL
            .into_iter()
            .map(|algorithm| AlgorithmOption {
                algorithm,
                label: algorithm.label(),
                selected: algorithm == selected,
            })
            .collect();

        let button_label = if training.state().is_training() {
            "Training Model..."
        } else {
            "Start Training"
        };

        Self {
            options,
            button_label,
            disabled: !training.can_start(),
        }
    }
}
