//! Helpers for presenting dates and URLs

pub mod date;
pub mod url;

pub use date::{date_xml, format_date, full_date};
pub use url::{full_url_for, url_for};
