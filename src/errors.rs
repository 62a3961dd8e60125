// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the tiling and capture tools

use std::fmt;
use std::path::PathBuf;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Window configuration errors
    Scan(ScanError),
    /// Output directory and file naming errors
    Storage(StorageError),
    /// Dataset division errors
    Dataset(DatasetError),
    /// Frame capture errors
    Capture(CaptureError),
    /// Classifier collaborator errors
    Classifier(ClassifierError),
    /// Configuration file errors
    Config(String),
}

/// Scan configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Window width, window height or hop is not positive
    InvalidConfiguration(String),
}

/// Output directory errors
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Removing the existing output directory failed
    RemoveFailed { path: PathBuf, reason: String },
    /// The output directory is still present after removal
    NotCleared(PathBuf),
    /// Creating the output directory failed
    CreateFailed { path: PathBuf, reason: String },
    /// Asking the user for confirmation failed
    PromptFailed(String),
}

/// Dataset division errors
#[derive(Debug, Clone)]
pub enum DatasetError {
    /// The input directory could not be listed
    ReadDir { path: PathBuf, reason: String },
    /// A source image could not be opened or decoded
    Decode { path: PathBuf, reason: String },
    /// A sub-image could not be written
    Write { path: PathBuf, reason: String },
    /// The file suffix does not name a supported image format
    UnsupportedSuffix(String),
}

/// Frame capture errors
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// The frame source has nothing to deliver
    NoFrameAvailable,
    /// Loading a frame failed
    SourceFailed(String),
    /// Saving a captured frame failed
    SaveFailed(String),
    /// The file suffix does not name a supported image format
    UnsupportedSuffix(String),
}

/// Classifier collaborator errors
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// The target label is not one of the classifier's labels
    UnknownLabel(String),
    /// The classifier returned a different number of scores than labels
    ScoreCountMismatch { expected: usize, actual: usize },
    /// Classification failed inside the collaborator
    Failed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Scan(e) => write!(f, "Scan error: {}", e),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
            AppError::Dataset(e) => write!(f, "Dataset error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Classifier(e) => write!(f, "Classifier error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::RemoveFailed { path, reason } => {
                write!(f, "Failed to remove {}: {}", path.display(), reason)
            }
            StorageError::NotCleared(path) => {
                write!(f, "Output directory could not be deleted: {}", path.display())
            }
            StorageError::CreateFailed { path, reason } => {
                write!(f, "Failed to create {}: {}", path.display(), reason)
            }
            StorageError::PromptFailed(msg) => write!(f, "Confirmation prompt failed: {}", msg),
        }
    }
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::ReadDir { path, reason } => {
                write!(f, "Cannot list {}: {}", path.display(), reason)
            }
            DatasetError::Decode { path, reason } => {
                write!(f, "Cannot open image {}: {}", path.display(), reason)
            }
            DatasetError::Write { path, reason } => {
                write!(f, "Cannot write {}: {}", path.display(), reason)
            }
            DatasetError::UnsupportedSuffix(suffix) => {
                write!(f, "Unsupported file suffix: {}", suffix)
            }
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoFrameAvailable => write!(f, "No frame available for capture"),
            CaptureError::SourceFailed(msg) => write!(f, "Frame source failed: {}", msg),
            CaptureError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
            CaptureError::UnsupportedSuffix(suffix) => {
                write!(f, "Unsupported file suffix: {}", suffix)
            }
        }
    }
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierError::UnknownLabel(label) => write!(f, "Unknown label: {}", label),
            ClassifierError::ScoreCountMismatch { expected, actual } => write!(
                f,
                "Classifier returned {} scores for {} labels",
                actual, expected
            ),
            ClassifierError::Failed(msg) => write!(f, "Classification failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for ScanError {}
impl std::error::Error for StorageError {}
impl std::error::Error for DatasetError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for ClassifierError {}

// Conversions from sub-errors to AppError
impl From<ScanError> for AppError {
    fn from(err: ScanError) -> Self {
        AppError::Scan(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<DatasetError> for AppError {
    fn from(err: DatasetError) -> Self {
        AppError::Dataset(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<ClassifierError> for AppError {
    fn from(err: ClassifierError) -> Self {
        AppError::Classifier(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

