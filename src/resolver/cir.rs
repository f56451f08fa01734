//! Blocking HTTP client for a CACTUS-style chemical identifier resolver.
//!
//! The NCI/CADD Chemical Identifier Resolver exposes structure lookups as
//! `GET {base}/{input}/{representation}` returning one candidate per line of
//! plain text, with HTTP 404 for "no match". Per the pipeline's error
//! policy, transport failures are logged and reported as `Ok(None)` rather
//! than propagated; the rows affected get dropped by the caller.

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};

use super::{IdentifierKind, Resolution, Resolve, ResolverError};

/// Public endpoint of the NCI/CADD Chemical Identifier Resolver.
pub const DEFAULT_BASE_URL: &str = "https://cactus.nci.nih.gov/chemical/structure";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP resolver backend.
#[derive(Debug)]
pub struct CirClient {
    base: Url,
    client: Client,
}

impl CirClient {
    /// Build a client against the given base URL with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ResolverError> {
        let base = Url::parse(base_url)
            .map_err(|e| ResolverError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ResolverError::InvalidBaseUrl(base_url.to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("thermocurate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { base, client })
    }

    /// Client against the public CACTUS endpoint.
    pub fn public() -> Result<Self, ResolverError> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    fn request_url(&self, input: &str, kind: IdentifierKind) -> Result<Url, ResolverError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ResolverError::InvalidBaseUrl(self.base.to_string()))?
            .push(input)
            .push(kind.as_str());
        Ok(url)
    }
}

impl Resolve for CirClient {
    fn resolve(
        &mut self,
        input: &str,
        kind: IdentifierKind,
    ) -> Result<Option<Resolution>, ResolverError> {
        let url = self.request_url(input, kind)?;
        debug!("Resolving '{input}' as {kind}");

        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(e) => {
                warn!("Resolver request failed for '{input}' ({kind}): {e}");
                return Ok(None);
            }
        };

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No {kind} match for '{input}'");
            return Ok(None);
        }
        if !response.status().is_success() {
            warn!(
                "Resolver returned {} for '{input}' ({kind})",
                response.status()
            );
            return Ok(None);
        }

        let body = match response.text() {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read resolver response for '{input}' ({kind}): {e}");
                return Ok(None);
            }
        };

        let candidates: Vec<String> = body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Resolution::new(candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_percent_encodes_input() {
        let client = CirClient::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT).unwrap();
        let url = client
            .request_url("1,2-ethanediol / glycol", IdentifierKind::Smiles)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://cactus.nci.nih.gov/chemical/structure/1,2-ethanediol%20%2F%20glycol/smiles"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(
            CirClient::new("not a url", DEFAULT_TIMEOUT),
            Err(ResolverError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            CirClient::new("mailto:someone@example.com", DEFAULT_TIMEOUT),
            Err(ResolverError::InvalidBaseUrl(_))
        ));
    }
}
