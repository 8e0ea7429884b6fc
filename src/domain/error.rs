//! Domain error types.

/// Failure inside the prediction pipeline.
///
/// A closed set so callers can branch on the kind instead of parsing text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("not enough historical data for prediction: have {rows} usable rows, need {minimum}")]
    InsufficientData { rows: usize, minimum: usize },

    #[error("{column} is undefined for every one of {rows} rows")]
    UndefinedFeature { column: &'static str, rows: usize },

    #[error("no test data after chronological split of {rows} rows at index {split_index}")]
    NoTestData { rows: usize, split_index: usize },

    #[error("invalid timeframe '{value}': expected 'short' or 'long'")]
    InvalidTimeframe { value: String },

    #[error("model fit failed: {reason}")]
    ModelFit { reason: String },
}

impl PredictionError {
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::InsufficientData { .. } => "insufficient_data",
            PredictionError::UndefinedFeature { .. } => "undefined_feature",
            PredictionError::NoTestData { .. } => "no_test_data",
            PredictionError::InvalidTimeframe { .. } => "invalid_timeframe",
            PredictionError::ModelFit { .. } => "model_fit",
        }
    }
}

/// Top-level error type for cryptotrack.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("{source_name} request failed{}: {reason}", status_suffix(.status))]
    Upstream {
        source_name: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("no {what} found for {symbol}")]
    NotFound { what: String, symbol: String },

    #[error("prediction failed for {symbol} ({timeframe}): {cause}")]
    Prediction {
        symbol: String,
        timeframe: String,
        #[source]
        cause: PredictionError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

impl TrackerError {
    pub fn upstream(source_name: &str, status: Option<u16>, reason: impl Into<String>) -> Self {
        TrackerError::Upstream {
            source_name: source_name.to_string(),
            status,
            reason: reason.into(),
        }
    }

    pub fn not_found(what: &str, symbol: &str) -> Self {
        TrackerError::NotFound {
            what: what.to_string(),
            symbol: symbol.to_string(),
        }
    }

    /// Stable snake_case identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerError::Database { .. } | TrackerError::DatabaseQuery { .. } => "database",
            TrackerError::ConfigParse { .. }
            | TrackerError::ConfigMissing { .. }
            | TrackerError::ConfigInvalid { .. } => "config",
            TrackerError::Upstream { .. } => "upstream",
            TrackerError::NotFound { .. } => "not_found",
            TrackerError::Prediction { cause, .. } => cause.kind(),
            TrackerError::Io(_) => "io",
        }
    }
}

impl From<&TrackerError> for std::process::ExitCode {
    fn from(err: &TrackerError) -> Self {
        let code: u8 = match err {
            TrackerError::Io(_) => 1,
            TrackerError::ConfigParse { .. }
            | TrackerError::ConfigMissing { .. }
            | TrackerError::ConfigInvalid { .. } => 2,
            TrackerError::Database { .. } | TrackerError::DatabaseQuery { .. } => 3,
            TrackerError::Upstream { .. } => 4,
            TrackerError::NotFound { .. } | TrackerError::Prediction { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
