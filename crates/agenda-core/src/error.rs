use std::fmt;

/// Machine-readable error codes for the failure taxonomy shared across the
/// agenda crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    RuleParseError,
    ExtractionParseError,
    ConfigParseError,
    CompletionConflict,
    TaskNotFound,
    CompletionNotFound,
    StoreFailed,
    SubscriptionInterrupted,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::RuleParseError => "E1001",
            Self::ExtractionParseError => "E1002",
            Self::ConfigParseError => "E1003",
            Self::CompletionConflict => "E2001",
            Self::TaskNotFound => "E2002",
            Self::CompletionNotFound => "E2003",
            Self::StoreFailed => "E5001",
            Self::SubscriptionInterrupted => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::RuleParseError => "Recurrence rule parse error",
            Self::ExtractionParseError => "Task extraction response malformed",
            Self::ConfigParseError => "Config file parse error",
            Self::CompletionConflict => "Occurrence already completed",
            Self::TaskNotFound => "Task not found",
            Self::CompletionNotFound => "Completion record not found",
            Self::StoreFailed => "Storage backend failed",
            Self::SubscriptionInterrupted => "Change feed interrupted",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Whether this failure is recovered locally rather than surfaced.
    ///
    /// Recoverable codes contribute an absence value (zero instances, the
    /// existing record, `None`) instead of an error at the expansion seam.
    #[must_use]
    pub const fn recoverable(self) -> bool {
        matches!(
            self,
            Self::RuleParseError
                | Self::ExtractionParseError
                | Self::CompletionConflict
                | Self::TaskNotFound
                | Self::CompletionNotFound
        )
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::RuleParseError => {
                Some("Check the rule against FREQ=...;INTERVAL=...;BYDAY=...;BYMONTHDAY=...")
            }
            Self::ExtractionParseError => {
                Some("The language model returned a malformed payload. Retry the request.")
            }
            Self::ConfigParseError => Some("Fix syntax in agenda.toml and retry."),
            Self::CompletionConflict | Self::TaskNotFound | Self::CompletionNotFound => None,
            Self::StoreFailed => Some("Check connectivity to the storage backend."),
            Self::SubscriptionInterrupted => {
                Some("Re-subscribe to restore liveness; local state is stale until then.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
