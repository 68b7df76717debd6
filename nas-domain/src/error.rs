use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid prize table: {0}")]
    InvalidPrizeTable(String),
    #[error("invalid gesture vocabulary: {0}")]
    InvalidGestureVocabulary(String),
    #[error("invalid weekday '{0}'")]
    InvalidWeekday(String),
}
