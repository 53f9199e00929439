use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("monte carlo needs at least one trial")]
    ZeroTrials,

    #[error("{side} intensity must be a finite non-negative number, got {value}")]
    InvalidIntensity { side: &'static str, value: f64 },
}
