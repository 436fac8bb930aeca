pub mod client;
pub mod config_store;
pub mod count;
pub mod downloader;
pub mod error;
pub mod export;
pub mod history_filter;
pub mod models;
pub mod observer;
pub mod paginator;

pub use client::{Auth, JiraClient, JiraConfig, SearchApi};
pub use error::{Error, Result};
pub use models::*;

// Downloader re-exports
pub use downloader::{DownloadConfig, DownloadResult, DownloadService, MAX_RESULTS_PER_CALL};

// Pagination re-exports
pub use paginator::{PageFailure, PageRequest, PaginationOutcome, ParallelPaginator};

// Count prober re-export
pub use count::CountProber;

// History filter re-export
pub use history_filter::HistoryFilter;

// Observer re-exports
pub use observer::{DownloadObserver, NullObserver, TracingObserver};

// Export re-export
pub use export::JsonExporter;

// Config store re-exports
pub use config_store::{BasicConfig, ConfigStore, FileConfigStore};
