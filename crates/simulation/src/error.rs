use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SimulationError {
    #[error("Amount must be a positive, finite number (got {0})")]
    InvalidAmount(f64),
}
