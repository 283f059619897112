use crate::error::BidlensError;
use crate::extraction::schema::ExtractedBidData;
use std::fmt;
use std::time::Instant;

/// Document handed to an extraction provider.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Failure reported by a single provider.
#[derive(Debug, Clone)]
pub struct ProviderError {
    pub message: String,
    /// Explicit classification by the provider. When `None`, the message decides.
    pub retryable: Option<bool>,
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        ProviderError {
            message: message.into(),
            retryable: None,
            status: None,
        }
    }

    pub fn retryable(message: impl Into<String>) -> Self {
        ProviderError {
            retryable: Some(true),
            ..ProviderError::new(message)
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        ProviderError {
            retryable: Some(false),
            ..ProviderError::new(message)
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<BidlensError> for ProviderError {
    fn from(e: BidlensError) -> Self {
        ProviderError::new(e.to_string())
    }
}

/// A backend able to turn a document into structured bid data.
pub trait ExtractionProvider: Send + Sync {
    /// Short name used in logs and failure summaries.
    fn name(&self) -> &str;

    /// Whether the provider has what it needs (credentials, input files) to run.
    fn is_configured(&self) -> bool;

    fn extract(&self, document: &DocumentInput) -> Result<ExtractedBidData, ProviderError>;
}

/// Successful extraction and the provider that produced it.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub data: ExtractedBidData,
    pub provider: String,
}

const RETRYABLE_MARKERS: &[&str] = &[
    // rate limiting
    "429",
    "rate limit",
    "resource_exhausted",
    // server errors
    "500",
    "502",
    "503",
    "504",
    // timeouts
    "timeout",
    "timed out",
    // malformed response
    "invalid json",
    "json parse",
    "unexpected token",
    // schema validation
    "validation",
    "schema",
];

/// Whether a provider failure should move the chain on to the next provider.
pub fn should_fallback(error: &ProviderError) -> bool {
    if let Some(retryable) = error.retryable {
        return retryable;
    }
    if let Some(status) = error.status {
        if status == 429 || (500..600).contains(&status) {
            return true;
        }
    }
    let message = error.message.to_lowercase();
    RETRYABLE_MARKERS.iter().any(|m| message.contains(m))
}

/// The providers that are configured, in priority order.
pub fn configured_providers(
    providers: &[Box<dyn ExtractionProvider>],
) -> Vec<&dyn ExtractionProvider> {
    providers
        .iter()
        .filter(|p| p.is_configured())
        .map(|p| p.as_ref())
        .collect()
}

/// Try each configured provider in order until one succeeds.
///
/// Retryable failures fall through to the next provider; any other failure stops
/// the chain immediately.
pub fn extract_with_fallback(
    providers: &[Box<dyn ExtractionProvider>],
    document: &DocumentInput,
) -> Result<ExtractionOutcome, BidlensError> {
    let active = configured_providers(providers);

    if active.is_empty() {
        return Err(BidlensError::NoProvidersConfigured);
    }

    tracing::info!(
        "extraction fallback chain: {}",
        active.iter().map(|p| p.name()).collect::<Vec<_>>().join(" -> ")
    );

    let mut failures: Vec<(String, String)> = Vec::new();

    for provider in active {
        let started = Instant::now();
        match provider.extract(document) {
            Ok(data) => {
                tracing::info!(
                    provider = provider.name(),
                    line_items = data.line_items.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "extraction succeeded"
                );
                return Ok(ExtractionOutcome {
                    data,
                    provider: provider.name().to_string(),
                });
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), "extraction failed: {}", e);
                failures.push((provider.name().to_string(), e.message.clone()));

                if !should_fallback(&e) {
                    tracing::error!(
                        provider = provider.name(),
                        "error is not retryable, stopping fallback chain"
                    );
                    return Err(BidlensError::ExtractionAborted {
                        provider: provider.name().to_string(),
                        summary: summarize(&failures),
                    });
                }
                tracing::info!("falling back to next provider");
            }
        }
    }

    Err(BidlensError::AllProvidersFailed {
        summary: summarize(&failures),
    })
}

fn summarize(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(provider, error)| format!("{provider}: {error}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_retryable() {
        assert!(should_fallback(&ProviderError::new("HTTP 429 Too Many Requests")));
        assert!(should_fallback(&ProviderError::new("Rate limit reached")));
        assert!(should_fallback(&ProviderError::new("RESOURCE_EXHAUSTED")));
    }

    #[test]
    fn test_server_error_and_timeout_are_retryable() {
        assert!(should_fallback(&ProviderError::new("503 Service Unavailable")));
        assert!(should_fallback(&ProviderError::new("request timed out")));
    }

    #[test]
    fn test_malformed_response_is_retryable() {
        assert!(should_fallback(&ProviderError::new(
            "Unexpected token < in JSON at position 0"
        )));
        assert!(should_fallback(&ProviderError::new(
            "schema validation failed: missing field `line_items`"
        )));
    }

    #[test]
    fn test_auth_error_is_not_retryable() {
        assert!(!should_fallback(&ProviderError::new("401 invalid api key")));
    }

    #[test]
    fn test_explicit_flag_wins_over_message() {
        assert!(!should_fallback(&ProviderError::fatal("503 but do not retry")));
        assert!(should_fallback(&ProviderError::retryable("quota")));
    }

    #[test]
    fn test_status_code_classification() {
        assert!(should_fallback(&ProviderError::new("upstream").with_status(502)));
        assert!(!should_fallback(&ProviderError::new("bad request").with_status(400)));
    }

    #[test]
    fn test_summary_format() {
        let failures = vec![
            ("gemini".to_string(), "429".to_string()),
            ("openai".to_string(), "timeout".to_string()),
        ];
        assert_eq!(summarize(&failures), "gemini: 429; openai: timeout");
    }

    struct NamedProvider {
        name: &'static str,
        configured: bool,
    }

    impl ExtractionProvider for NamedProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        fn extract(&self, _document: &DocumentInput) -> Result<ExtractedBidData, ProviderError> {
            Err(ProviderError::fatal("not used"))
        }
    }

    #[test]
    fn test_configured_providers_keep_priority_order() {
        let providers: Vec<Box<dyn ExtractionProvider>> = vec![
            Box::new(NamedProvider { name: "gemini", configured: true }),
            Box::new(NamedProvider { name: "openai", configured: false }),
            Box::new(NamedProvider { name: "claude", configured: true }),
        ];
        let names: Vec<&str> = configured_providers(&providers)
            .into_iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names, vec!["gemini", "claude"]);
    }
}
