use thiserror::Error;

use crate::config::ConfigError;

/// Input errors surfaced before any selection work begins. An insufficient
/// collection is deliberately NOT represented here: it is the documented
/// fallback path and produces a deck plus a generation report instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("commander '{0}' not found in collection")]
    CommanderNotInCollection(String),
    #[error("collection is empty")]
    EmptyCollection,
    #[error("'{name}' is not a legal commander: {reason}")]
    IneligibleCommander { name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("collection ingestion failure: {0}")]
    Ingestion(String),
    #[error("integration failure: {0}")]
    Integration(String),
}

impl ApplicationError {
    /// CLI exit-code class: input errors and collaborator failures are both user
    /// facing but reported differently; everything maps to a non-zero exit.
    pub fn is_input_error(&self) -> bool {
        matches!(self, ApplicationError::Build(_) | ApplicationError::Ingestion(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_errors_classify_as_input_errors() {
        let error = ApplicationError::from(BuildError::EmptyCollection);
        assert!(error.is_input_error());

        let error = ApplicationError::Integration("edhrec down".to_string());
        assert!(!error.is_input_error());
    }
}
