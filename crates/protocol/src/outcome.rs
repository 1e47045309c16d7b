/// Result of a best-effort discovery step.
///
/// Discovery never fails the caller: a missing file is `NotPresent`, a file
/// that exists but cannot be understood is `Malformed` with a diagnostic the
/// caller may log before moving on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome<T> {
    Found(T),
    NotPresent,
    Malformed(String),
}

impl<T> LoadOutcome<T> {
    pub fn malformed(diagnostic: impl Into<String>) -> Self {
        Self::Malformed(diagnostic.into())
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Collapse into the absent/present view callers of discovery expect.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotPresent | Self::Malformed(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadOutcome<U> {
        match self {
            Self::Found(value) => LoadOutcome::Found(f(value)),
            Self::NotPresent => LoadOutcome::NotPresent,
            Self::Malformed(diagnostic) => LoadOutcome::Malformed(diagnostic),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> LoadOutcome<U>) -> LoadOutcome<U> {
        match self {
            Self::Found(value) => f(value),
            Self::NotPresent => LoadOutcome::NotPresent,
            Self::Malformed(diagnostic) => LoadOutcome::Malformed(diagnostic),
        }
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Malformed(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}
