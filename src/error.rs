use thiserror::Error;

/// Runtime failures of quantity arithmetic and of the expression graph.
///
/// Dimension mismatches never show up here: they are rejected by the type
/// checker before the program runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("failed to perform {op}: division by zero")]
    DivisionByZero { op: &'static str },
    #[error("only independent variables can be updated in place; reassign dependent variables instead")]
    NotIndependent,
    #[error("failed to perform {op}: {why}")]
    InvalidOp { op: &'static str, why: String },
}

pub type Result<T> = std::result::Result<T, QuantityError>;

/// Panics with `err`. Used by operators that cannot return a `Result`.
#[track_caller]
pub(crate) fn raise(err: QuantityError) -> ! {
    panic!("{err}")
}
