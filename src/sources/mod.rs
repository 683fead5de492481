//! Live sources of article listings.
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Author feed | [`feed`] | RSS via `rss`, Atom via `atom_syndication` | Primary source of new articles |
//! | Archive site | [`archive`] | HTML scraping | Supplies `web_link` enrichment |
//!
//! Both adapters absorb network and parse failures at their boundary: a run
//! always gets a (possibly empty) list back. The archive adapter additionally
//! reports *why* a page came back empty through [`archive::ListingOutcome`].

pub mod archive;
pub mod feed;
