//! Error types shared by the generator, its sources and persistence collaborators.

use crate::id::ParseError;

/// Failures surfaced by a [`Generator`](crate::Generator) or one of its collaborators.
///
/// Persistence failures are recovered inside the generator and only show up through
/// [`Generator::last_error`](crate::Generator::last_error); entropy failures abort the current
/// identifier construction and are returned to the caller as well.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum Error {
    /// The persistence collaborator could not supply a usable prior state.
    #[error("could not read generator state: {0}")]
    PersistenceRead(String),

    /// The random byte source could not supply randomness.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// A string failed the canonical 8-4-4-4-12 format check.
    #[error(transparent)]
    InvalidFormat(#[from] ParseError),
}

impl Error {
    /// Returns true if this error blocks identifier construction.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EntropyUnavailable(_))
    }
}

impl From<rand::Error> for Error {
    fn from(src: rand::Error) -> Self {
        Self::EntropyUnavailable(src.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use crate::Uuid;

    /// Classifies only entropy failures as fatal
    #[test]
    fn classifies_only_entropy_failures_as_fatal() {
        assert!(Error::EntropyUnavailable("EOF".into()).is_fatal());
        assert!(!Error::PersistenceRead("gone".into()).is_fatal());

        let parse_err = "not-a-uuid".parse::<Uuid>().unwrap_err();
        assert!(!Error::from(parse_err).is_fatal());
    }

    /// Renders human-readable messages
    #[test]
    fn renders_human_readable_messages() {
        assert_eq!(
            Error::EntropyUnavailable("EOF".into()).to_string(),
            "entropy source unavailable: EOF"
        );
        assert_eq!(
            Error::PersistenceRead("Read broken".into()).to_string(),
            "could not read generator state: Read broken"
        );
        let parse_err = "".parse::<Uuid>().unwrap_err();
        assert_eq!(
            Error::from(parse_err).to_string(),
            "invalid string representation"
        );
    }
}
