/// Categories of pipeline failures.
///
/// Every failure aborts the current invocation regardless of its kind; the
/// category only shapes the diagnostic and the batch report.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connection refused, timeout, unreachable collaborator.
    Connectivity,

    /// The collaborator answered with an unexpected status.
    Protocol,

    /// Malformed event, missing fields, undecodable content.
    Data,

    /// The object key does not map to a destination index.
    Routing,
}

impl ErrorKind {
    /// Whether a later re-delivery of the same event could succeed.
    ///
    /// Only connectivity failures are transient; nothing in the pipeline retries.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Connectivity)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connectivity => "connectivity",
            Self::Protocol => "protocol",
            Self::Data => "data",
            Self::Routing => "routing",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
