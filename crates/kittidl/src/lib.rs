pub mod catalog;
pub mod cli;
pub mod downloader;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod paths;

pub use catalog::{catalog, statuses, CatalogEntry, EntryKind, EntryStatus};
pub use downloader::{FileDownloader, ZipExtractor};
pub use error::{FetchError, Result};
pub use fetcher::{Fetcher, FetcherConfig, RunSummary, DEFAULT_LIMIT};
pub use http::{HttpClient, HttpClientConfig};
pub use paths::{default_data_root, kittidl_home};
