//! Scrape tool limits.
//!
//! A binding advertises which options it understands through
//! [`SupportedOptions`]. [`ScrapeOptions::apply`] keeps what is supported and
//! resets the rest to the minimal configuration, so an unsupported option
//! narrows the tool instead of failing the call.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeOptions {
    /// Pages fetched per tool call
    pub max_pages: usize,
    /// Pages fetched across one generation
    pub max_results: usize,
    /// Characters of page text handed to the model per page
    pub chunk_chars: usize,
    /// Strip navigation and boilerplate, keep the main content
    pub extract_readable: bool,
    /// Append the outgoing links of each page
    pub include_links: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            max_pages: 1,
            max_results: 5,
            chunk_chars: 2500,
            extract_readable: true,
            include_links: true,
        }
    }
}

impl ScrapeOptions {
    /// Smallest useful configuration: one readable page, no links
    pub fn minimal() -> Self {
        Self {
            max_pages: 1,
            max_results: 1,
            chunk_chars: 2000,
            extract_readable: true,
            include_links: false,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars;
        self
    }

    /// Keep the supported subset, reset everything else to [`ScrapeOptions::minimal`]
    pub fn apply(&self, supported: &SupportedOptions) -> ScrapeOptions {
        let minimal = Self::minimal();
        ScrapeOptions {
            max_pages: if supported.max_pages { self.max_pages } else { minimal.max_pages },
            max_results: if supported.max_results { self.max_results } else { minimal.max_results },
            chunk_chars: if supported.chunk_chars { self.chunk_chars } else { minimal.chunk_chars },
            extract_readable: if supported.extract_readable {
                self.extract_readable
            } else {
                minimal.extract_readable
            },
            include_links: if supported.include_links { self.include_links } else { minimal.include_links },
        }
    }
}

/// Which [`ScrapeOptions`] fields a binding honours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedOptions {
    pub max_pages: bool,
    pub max_results: bool,
    pub chunk_chars: bool,
    pub extract_readable: bool,
    pub include_links: bool,
}

impl SupportedOptions {
    pub fn all() -> Self {
        Self {
            max_pages: true,
            max_results: true,
            chunk_chars: true,
            extract_readable: true,
            include_links: true,
        }
    }

    pub fn none() -> Self {
        Self {
            max_pages: false,
            max_results: false,
            chunk_chars: false,
            extract_readable: false,
            include_links: false,
        }
    }
}
