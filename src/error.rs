use thiserror::Error;

pub type TbResult<T> = Result<T, TbError>;

/// Failures of the testbench itself.
///
/// Protocol violations found in the DUT are not errors, they are recorded as
/// [`Violation`](crate::testbench::Violation)s and folded into the verdict.
#[derive(Debug, Error)]
pub enum TbError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("probability `{name}` must lie in [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },

    #[error("`{0}` must be greater than zero")]
    ZeroBound(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Env { key: String, value: String },

    #[error("report error: {0}")]
    Report(String),
}
