use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    E001MissingInput,
    E002EmptyVersionName,
    E003NegativeSdk,
    E004NegativeTimestamp,
    E005InvalidInput,
    E006LocalProperties,
}

impl ConfigErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::E001MissingInput => "E001_MISSING_INPUT",
            Self::E002EmptyVersionName => "E002_EMPTY_VERSION_NAME",
            Self::E003NegativeSdk => "E003_NEGATIVE_SDK",
            Self::E004NegativeTimestamp => "E004_NEGATIVE_TIMESTAMP",
            Self::E005InvalidInput => "E005_INVALID_INPUT",
            Self::E006LocalProperties => "E006_LOCAL_PROPERTIES",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("code=E001_MISSING_INPUT required input `{0}` is missing")]
    MissingInput(&'static str),
    #[error("code=E002_EMPTY_VERSION_NAME versionName cannot be empty")]
    EmptyVersionName,
    #[error("code=E003_NEGATIVE_SDK {field} must be >= 0, got {value}")]
    NegativeSdk { field: &'static str, value: i64 },
    #[error("code=E004_NEGATIVE_TIMESTAMP build timestamp must be >= 0, got {0}")]
    NegativeTimestamp(i64),
    #[error("code=E005_INVALID_INPUT {source_name}: {message}")]
    InvalidInput {
        source_name: String,
        message: String,
    },
    #[error("code=E006_LOCAL_PROPERTIES {0}")]
    LocalProperties(String),
}

impl ConfigError {
    pub fn code(&self) -> ConfigErrorCode {
        match self {
            Self::MissingInput(_) => ConfigErrorCode::E001MissingInput,
            Self::EmptyVersionName => ConfigErrorCode::E002EmptyVersionName,
            Self::NegativeSdk { .. } => ConfigErrorCode::E003NegativeSdk,
            Self::NegativeTimestamp(_) => ConfigErrorCode::E004NegativeTimestamp,
            Self::InvalidInput { .. } => ConfigErrorCode::E005InvalidInput,
            Self::LocalProperties(_) => ConfigErrorCode::E006LocalProperties,
        }
    }

    pub fn invalid(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}
