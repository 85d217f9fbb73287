use thiserror::Error;

/// Errors raised while building or combining transfer functions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid input for `{argument}`{}: {reason}", at_index(.index))]
    InvalidInput {
        argument: &'static str,
        index: Option<usize>,
        reason: String,
    },

    #[error("denominator polynomial is identically zero")]
    ZeroDenominator,

    #[error("coefficient has a non-negligible imaginary part ({residue:e})")]
    NotReal { residue: f64 },
}

impl Error {
    pub(crate) fn invalid(argument: &'static str, index: Option<usize>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            argument,
            index,
            reason: reason.into(),
        }
    }
}

fn at_index(index: &Option<usize>) -> String {
    index.map(|i| format!(" at index {i}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
