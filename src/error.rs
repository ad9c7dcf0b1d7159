//! Error types for anura.

/// Result type alias for anura operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for anura.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Timezone name not recognized by the IANA database.
    #[error("unknown timezone: '{name}'")]
    UnknownTimezone {
        /// The unrecognized timezone name.
        name: String,
    },

    /// Input file or record is structurally invalid.
    #[error("malformed input '{path}': {message}")]
    MalformedInput {
        /// Path to the offending input.
        path: std::path::PathBuf,
        /// Description of what was wrong.
        message: String,
    },

    /// A required input set matched nothing.
    #[error("no {what} found under '{path}'")]
    EmptyInput {
        /// What was being looked for.
        what: String,
        /// Directory or file that was searched.
        path: std::path::PathBuf,
    },

    /// Score value outside the mathematical domain of a transform.
    #[error("domain error: {message}")]
    Domain {
        /// Description of the domain violation.
        message: String,
    },

    /// Failed to read CSV file.
    #[error("failed to read CSV file '{path}'")]
    CsvRead {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Failed to write CSV file.
    #[error("failed to write CSV file '{path}'")]
    CsvWrite {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Required column missing from a CSV header.
    #[error("missing column '{column}' in '{path}'")]
    MissingColumn {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Name of the missing column.
        column: String,
    },

    /// Failed to read model manifest file.
    #[error("failed to read model manifest '{path}'")]
    ManifestRead {
        /// Path to the manifest file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse model manifest file.
    #[error("failed to parse model manifest '{path}'")]
    ManifestParse {
        /// Path to the manifest file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Model file does not exist.
    #[error("model file does not exist: {path}")]
    ModelFileNotFound {
        /// Path to the missing model file.
        path: std::path::PathBuf,
    },

    /// Failed to load model.
    #[error("failed to load model '{path}': {reason}")]
    ModelLoad {
        /// Path to the model file.
        path: std::path::PathBuf,
        /// Description of the load failure.
        reason: String,
    },

    /// Failed to open audio file.
    #[error("failed to open audio file '{path}'")]
    AudioOpen {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Audio file sample rate does not match the model input rate.
    #[error("sample rate mismatch in '{path}': expected {expected} Hz, got {actual} Hz")]
    SampleRateMismatch {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Sample rate the model expects.
        expected: u32,
        /// Sample rate found in the file.
        actual: u32,
    },

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// Training stage failed.
    #[error("training failed: {reason}")]
    Train {
        /// Description of the training failure.
        reason: String,
    },

    /// Failed to write tracking log.
    #[error("failed to write tracking log '{path}'")]
    TrackingWrite {
        /// Path to the tracking log.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize tracking record.
    #[error("failed to serialize tracking record")]
    TrackingSerialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}
