//! Error type for fallible DOM operations.

/// Error from platform DOM calls (caret placement, missing anchors).
///
/// Controllers never surface these to the host: every failure path degrades
/// to a logged no-op, since corrupting an in-progress edit is worse than
/// skipping a cosmetic update.
#[derive(Debug, Clone)]
pub struct DomError(pub String);

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for DomError {}

impl From<&str> for DomError {
    fn from(s: &str) -> Self {
        DomError(s.to_string())
    }
}

impl From<String> for DomError {
    fn from(s: String) -> Self {
        DomError(s)
    }
}
