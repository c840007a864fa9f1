//! Mail exchanger resolution.

use crate::error::{Error, Result};
use hickory_resolver::{
    TokioResolver,
    name_server::TokioConnectionProvider,
};
use tracing::debug;

/// Resolves the mail exchanger responsible for a recipient domain.
///
/// Only the primary MX answer is consulted: there is no A/AAAA fallback
/// and no re-sorting of the records by preference. The first record as
/// returned by the resolver is used, preserving the reference behavior.
#[derive(Debug)]
pub struct MxResolver {
    resolver: TokioResolver,
}

impl MxResolver {
    /// Creates a resolver from the system DNS configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the system DNS configuration cannot be loaded.
    pub fn new() -> Result<Self> {
        let resolver = TokioResolver::builder(TokioConnectionProvider::default())
            .map_err(|source| Error::Resolution {
                domain: "system configuration".to_string(),
                source,
            })?
            .build();

        Ok(Self { resolver })
    }

    /// Returns the host name of the domain's first mail exchanger.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoExchanger`] if the domain has no MX records and
    /// [`Error::Resolution`] if the lookup itself fails.
    pub async fn resolve(&self, domain: &str) -> Result<String> {
        debug!("Looking up mail exchanger for {domain}");

        let lookup = self
            .resolver
            .mx_lookup(domain)
            .await
            .map_err(|source| {
                if source.is_no_records_found() || source.is_nx_domain() {
                    Error::NoExchanger(domain.to_string())
                } else {
                    Error::Resolution {
                        domain: domain.to_string(),
                        source,
                    }
                }
            })?;

        let Some(mx) = lookup.iter().next() else {
            return Err(Error::NoExchanger(domain.to_string()));
        };

        // MX exchange names come back fully qualified with a root dot.
        let host = mx.exchange().to_utf8();
        let host = host.trim_end_matches('.').to_string();
        debug!(
            "Using exchanger {host} (preference {}) for {domain}",
            mx.preference()
        );
        Ok(host)
    }
}
