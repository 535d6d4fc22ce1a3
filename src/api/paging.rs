//! Cursor-driven iteration over a paged collection
//!
//! A [`PagedLister`] knows how to fetch one page; [`list_entries`] turns it
//! into a lazy, fused sequence that follows next-page requests until a page
//! arrives without one.

use super::auth::AccessToken;
use super::models::DirectoryEntry;
use crate::config::{Config, keys};
use crate::error::{Error, Result};
use log::{debug, error};
use reqwest::Url;
use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

/// Everything needed to fetch one page. Next-page requests are taken from
/// the service verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    url: Url,
}

impl PageRequest {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// One page of results
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub entries: Vec<DirectoryEntry>,
    pub next: Option<PageRequest>,
}

impl Page {
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

pub trait PagedLister {
    /// Request for the first page
    fn first_page(&self) -> PageRequest;

    /// Fetch a single page. A rejected request is reported as [`Error::Status`].
    fn fetch_page(&self, token: &AccessToken, request: &PageRequest) -> Result<Page>;
}

/// What to do when the directory answers a page request with a non-200 status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageErrorPolicy {
    /// Log the response and end the listing as if it were complete
    #[default]
    Degrade,
    /// Surface the response as an error
    FailFast,
}

impl PageErrorPolicy {
    pub fn from_config(config: &Config) -> Result<Self> {
        config
            .resolve_or(keys::PAGE_ERROR_POLICY, PageErrorPolicy::Degrade.as_str())
            .parse()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageErrorPolicy::Degrade => "degrade",
            PageErrorPolicy::FailFast => "fail-fast",
        }
    }
}

impl FromStr for PageErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "degrade" => Ok(PageErrorPolicy::Degrade),
            "fail-fast" | "failfast" => Ok(PageErrorPolicy::FailFast),
            other => Err(Error::configuration(format!(
                "Invalid page-error-policy '{}' (expected 'degrade' or 'fail-fast')",
                other
            ))),
        }
    }
}

impl fmt::Display for PageErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lazy sequence of entries across all pages.
///
/// Not restartable: once exhausted (or after the first error) it keeps
/// returning `None`.
pub struct Entries<'a, L: PagedLister + ?Sized> {
    lister: &'a L,
    token: &'a AccessToken,
    policy: PageErrorPolicy,
    buffered: VecDeque<DirectoryEntry>,
    next: Option<PageRequest>,
    pages: usize,
}

pub fn list_entries<'a, L: PagedLister + ?Sized>(
    lister: &'a L,
    token: &'a AccessToken,
    policy: PageErrorPolicy,
) -> Entries<'a, L> {
    Entries {
        lister,
        token,
        policy,
        buffered: VecDeque::new(),
        next: Some(lister.first_page()),
        pages: 0,
    }
}

impl<L: PagedLister + ?Sized> Entries<'_, L> {
    /// Pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }
}

impl<L: PagedLister + ?Sized> Iterator for Entries<'_, L> {
    type Item = Result<DirectoryEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.buffered.pop_front() {
                return Some(Ok(entry));
            }

            let request = self.next.take()?;
            match self.lister.fetch_page(self.token, &request) {
                Ok(page) => {
                    self.pages += 1;
                    debug!(
                        "Page {} returned {} entries (more: {})",
                        self.pages,
                        page.entries.len(),
                        page.has_more()
                    );
                    self.buffered = page.entries.into();
                    self.next = page.next;
                }
                Err(Error::Status { url, status, body })
                    if self.policy == PageErrorPolicy::Degrade =>
                {
                    error!(
                        "fetch_page({}) [statusCode={},body={}]",
                        url, status, body
                    );
                    return None;
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl<L: PagedLister + ?Sized> FusedIterator for Entries<'_, L> {}
