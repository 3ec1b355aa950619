//! # notion-exporter
//!
//! Client library for Notion's private export API.
//!
//! ## Design Philosophy
//!
//! notion-exporter is designed to be:
//! - **Complete** - Drives the full export lifecycle: enqueue, poll, download, extract
//! - **Forgiving on input** - Accepts bare ids, dashed ids, and share URLs
//! - **Strict on output** - Typed task records, no silently swallowed API errors
//! - **Embeddable** - A plain async library; the bundled CLI is a thin wrapper
//!
//! ## Quick Start
//!
//! ```no_run
//! use notion_exporter::{Credentials, ExportConfig, NotionExporter};
//!
//! #[tokio::main]
//! async fn main() -> notion_exporter::Result<()> {
//!     let credentials = Credentials::new("token_v2 cookie value");
//!     let config = ExportConfig {
//!         recursive: true,
//!         ..Default::default()
//!     };
//!
//!     let exporter = NotionExporter::new(credentials, config)?;
//!     let markdown = exporter
//!         .export_markdown("https://www.notion.so/My-Page-83715d7703ee4b8699b5e659a4712dd8")
//!         .await?;
//!     println!("{markdown}");
//!     Ok(())
//! }
//! ```
//!
//! ## Authentication
//!
//! This is the same API that backs the "Export" entry in Notion's own menu,
//! so it authenticates with browser session cookies rather than an
//! integration token. Copy the `token_v2` cookie from a logged-in browser
//! session; add the `file_token` cookie as well if exported archives should
//! include file and image attachments.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Export archive inspection and extraction
pub mod archive;
/// Block id validation, normalization, and URL extraction
pub mod block_id;
/// Export configuration
pub mod config;
/// Error types
pub mod error;
/// The exporter client and its HTTP plumbing
pub mod exporter;
/// Export task submission and polling
pub mod task;

// Re-export commonly used types
pub use archive::ExportArchive;
pub use block_id::BlockId;
pub use config::{CollectionViewExportType, ExportConfig};
pub use error::{Error, Result};
pub use exporter::{Credentials, NotionExporter};
pub use task::{ExportTask, TaskId, TaskState, TaskStatus};
