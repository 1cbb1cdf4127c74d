use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid report name '{name}': {reason}")]
    InvalidReportName { name: String, reason: &'static str },
}
