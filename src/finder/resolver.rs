//! Redirect Resolver
//!
//! Links on an indirection host are followed once and replaced by the
//! address the browser settles on. Everything else passes through untouched
//! without a navigation. No retries here: a failed link is logged and
//! skipped so the rest of the list still resolves.

use std::time::Duration;

use tracing::{debug, warn};

use super::types::{ResolvedLink, SellerLink};
use crate::config::FinderConfig;
use crate::driver::PageDriver;
use crate::driver::wait::poll_until;
use crate::utils::{clean_url, host_of};

#[derive(Debug, Clone)]
pub struct RedirectResolver {
    indirection_hosts: Vec<String>,
    settle_timeout: Duration,
    poll_interval: Duration,
}

impl RedirectResolver {
    #[must_use]
    pub fn new(config: &FinderConfig) -> Self {
        Self {
            indirection_hosts: config.indirection_hosts().to_vec(),
            settle_timeout: config.redirect_settle_timeout(),
            poll_interval: config.poll_interval(),
        }
    }

    /// Whether `link` points at an indirection host or one of its subdomains
    #[must_use]
    pub fn is_indirection(&self, link: &str) -> bool {
        let Some(host) = host_of(link) else {
            return false;
        };
        self.indirection_hosts.iter().any(|candidate| {
            host == *candidate
                || host
                    .strip_suffix(candidate.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    /// Resolve every link in order, dropping the ones that fail
    pub async fn resolve_all<D: PageDriver>(
        &self,
        driver: &D,
        links: &[SellerLink],
    ) -> Vec<ResolvedLink> {
        let mut resolved = Vec::with_capacity(links.len());
        for link in links {
            if let Some(found) = self.resolve(driver, link).await {
                resolved.push(found);
            }
        }
        resolved
    }

    /// Settled destination of one link; `None` when it did not redirect
    pub async fn resolve<D: PageDriver>(&self, driver: &D, link: &str) -> Option<ResolvedLink> {
        if !self.is_indirection(link) {
            return Some(ResolvedLink::resolved(link.to_string(), link.to_string()));
        }

        if let Err(e) = driver.navigate(link).await {
            warn!("Skipping {link}: {e:#}");
            return None;
        }

        let origin = clean_url(link);
        let origin_ref = origin.as_str();
        poll_until(self.settle_timeout, self.poll_interval, || async move {
            match driver.current_url().await {
                Ok(current) => !current.is_empty() && clean_url(&current) != origin_ref,
                Err(_) => false,
            }
        })
        .await;

        let final_url = match driver.current_url().await {
            Ok(url) => url,
            Err(e) => {
                warn!("Skipping {link}: {e:#}");
                return None;
            }
        };

        if final_url.is_empty() || clean_url(&final_url) == origin {
            debug!("Dropped {link}: address did not change");
            return None;
        }

        debug!("Resolved {link} -> {final_url}");
        Some(ResolvedLink::resolved(link.to_string(), final_url))
    }
}
