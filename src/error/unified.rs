//! Error classification and recovery hints.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
    Configuration,
    Serialization,
    ToolExecution,
    InvalidInput,
    Unknown,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    CheckCredentials,
    CheckConfiguration,
    IncreaseTimeout,
    CheckToolImplementation,
    FixInput,
    ContactSupport,
}

impl RecoverySuggestion {
    /// Short operator-facing hint.
    pub fn hint(self) -> &'static str {
        match self {
            Self::RetryWithBackoff => "the upstream service is busy or unreachable; try again shortly",
            Self::CheckCredentials => "check OPENAI_API_KEY and TAVILY_API_KEY",
            Self::CheckConfiguration => "check the config file and environment variables",
            Self::IncreaseTimeout => "raise model_timeout_secs or tool_timeout_secs",
            Self::CheckToolImplementation => "a tool failed; see the logs for details",
            Self::FixInput => "the request was invalid; fix it and retry",
            Self::ContactSupport => "unexpected failure; see the logs for details",
        }
    }
}
