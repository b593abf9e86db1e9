use thiserror::Error;

pub type Result<T> = std::result::Result<T, SymbolError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbolError {
    #[error("Failed to load data: {0}")]
    DataLoad(String),

    #[error("No feature has a usable value for attribute '{0}'")]
    MissingAttributeKey(String),

    #[error("Feature set is empty")]
    EmptyFeatureSet,

    #[error("Index {index} out of range for series of length {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("Invalid symbol value: {0}")]
    InvalidValue(f64),

    #[error("No year attributes found in dataset")]
    EmptySeries,
}
