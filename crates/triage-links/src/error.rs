//! Errors for the fallible edges of the crate.
//!
//! The link operations themselves never fail; only decoding external
//! documents (failure reports, Playwright JSON reports) can.

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("parse failure report: {0}")]
    ReportParse(String),
    #[error("parse playwright report: {0}")]
    PlaywrightParse(String),
}
