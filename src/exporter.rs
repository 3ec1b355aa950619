//! Export client façade
//!
//! [`NotionExporter`] owns the HTTP client, the API endpoint and one
//! [`ExportConfig`], and composes the full pipeline: normalize the input,
//! enqueue the export task, poll it to a download URL, fetch the archive and
//! pull the requested file out of it.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::archive::ExportArchive;
use crate::block_id::BlockId;
use crate::config::ExportConfig;
use crate::error::{Error, Result};

/// Root of Notion's private API
const DEFAULT_API_URL: &str = "https://www.notion.so/api/v3/";

/// Request timeout for submit and status calls. Archive downloads run
/// without it since export archives can be arbitrarily large.
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Notion session credentials
///
/// `token_v2` authenticates API calls; `file_token` additionally authorizes
/// downloads of archives containing embedded files. Both come from the
/// browser cookies of a logged-in Notion session.
#[derive(Clone, Debug)]
pub struct Credentials {
    token_v2: String,
    file_token: Option<String>,
}

impl Credentials {
    /// Credentials from a `token_v2` session cookie
    pub fn new(token_v2: impl Into<String>) -> Self {
        Self {
            token_v2: token_v2.into(),
            file_token: None,
        }
    }

    /// Credentials from a `token_v2` and a `file_token` cookie pair
    pub fn with_file_token(token_v2: impl Into<String>, file_token: impl Into<String>) -> Self {
        Self {
            token_v2: token_v2.into(),
            file_token: Some(file_token.into()),
        }
    }

    /// Cookie header value attached to every request
    pub(crate) fn cookie_header(&self) -> String {
        match &self.file_token {
            Some(file_token) => format!("token_v2={};file_token={}", self.token_v2, file_token),
            None => format!("token_v2={}", self.token_v2),
        }
    }
}

/// Client for Notion's export API
///
/// Construction builds one `reqwest` client carrying the session cookie as a
/// default header; every export operation on the instance reuses it. The
/// instance holds no mutable state, so concurrent exports on one exporter
/// are independent.
pub struct NotionExporter {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) config: ExportConfig,
}

impl NotionExporter {
    /// Exporter against the public Notion API endpoint
    pub fn new(credentials: Credentials, config: ExportConfig) -> Result<Self> {
        Self::with_api_url(Url::parse(DEFAULT_API_URL)?, credentials, config)
    }

    /// Exporter against a custom API endpoint
    ///
    /// The URL must end with a trailing slash, otherwise its last path
    /// segment is lost when the task paths are joined onto it.
    pub fn with_api_url(
        api_url: Url,
        credentials: Credentials,
        config: ExportConfig,
    ) -> Result<Self> {
        let cookie = reqwest::header::HeaderValue::from_str(&credentials.cookie_header())
            .map_err(|_| Error::InvalidCredentials)?;
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::COOKIE, cookie);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: api_url,
            config,
        })
    }

    // -------------------------------------------------------------------
    // Transport plumbing
    // -------------------------------------------------------------------

    /// POST a JSON body to an API path and parse the JSON reply
    pub(crate) async fn post_json<B, T>(&self, api_path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let endpoint = self.base_url.join(api_path)?;
        let response = self
            .http
            .post(endpoint)
            .timeout(API_TIMEOUT)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                endpoint: api_path.to_string(),
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET a URL as raw bytes
    pub(crate) async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                endpoint: url.to_string(),
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    // -------------------------------------------------------------------
    // Façade operations
    // -------------------------------------------------------------------

    /// Run an export to completion and return the archive download URL
    ///
    /// Accepts a bare block id or a Notion share URL. The first failing
    /// stage (normalization, submission, polling) short-circuits.
    pub async fn resolve_export_url(&self, id_or_url: &str) -> Result<String> {
        let block = BlockId::from_url_or_id(id_or_url)?;
        let task_id = self.enqueue_export(&block).await?;
        self.await_export_url(&task_id).await
    }

    /// Run an export and download the resulting archive into memory
    pub async fn download_archive(&self, id_or_url: &str) -> Result<ExportArchive> {
        let url = self.resolve_export_url(id_or_url).await?;
        debug!("downloading export archive");
        let bytes = self.get_bytes(&url).await?;
        info!(size_bytes = bytes.len(), "export archive downloaded");
        ExportArchive::from_bytes(bytes)
    }

    /// Run an export and extract every archived file under a directory
    ///
    /// Returns the paths of the extracted files.
    pub async fn extract_to_dir(
        &self,
        id_or_url: &str,
        dest: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>> {
        let mut archive = self.download_archive(id_or_url).await?;
        archive.extract_to(dest.as_ref())
    }

    /// Run an export and return the text of the first archived file whose
    /// name satisfies the predicate
    ///
    /// The content is decoded as UTF-8 and trimmed of surrounding
    /// whitespace; an entry that trims to nothing counts as not found.
    pub async fn export_file<P>(&self, id_or_url: &str, predicate: P) -> Result<String>
    where
        P: Fn(&str) -> bool,
    {
        let mut archive = self.download_archive(id_or_url).await?;
        let bytes = archive.read_first_match(predicate)?;
        let text = String::from_utf8_lossy(&bytes).trim().to_string();
        if text.is_empty() {
            return Err(Error::FileNotFound);
        }
        Ok(text)
    }

    /// Export a database as CSV text
    ///
    /// An "all rows" export archives a file suffixed `_all.csv` next to the
    /// plain `.csv` of the current view; `only_current_view` picks between
    /// the two.
    pub async fn export_csv(&self, id_or_url: &str, only_current_view: bool) -> Result<String> {
        let suffix = if only_current_view { ".csv" } else { "_all.csv" };
        self.export_file(id_or_url, move |name| name.ends_with(suffix))
            .await
    }

    /// Export a page as Markdown text
    pub async fn export_markdown(&self, id_or_url: &str) -> Result<String> {
        self.export_file(id_or_url, |name| name.ends_with(".md"))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_with_token_only() {
        let credentials = Credentials::new("abc123");
        assert_eq!(credentials.cookie_header(), "token_v2=abc123");
    }

    #[test]
    fn test_cookie_header_with_file_token() {
        let credentials = Credentials::with_file_token("abc123", "def456");
        assert_eq!(
            credentials.cookie_header(),
            "token_v2=abc123;file_token=def456"
        );
    }

    #[test]
    fn test_constructor_rejects_unencodable_credentials() {
        let result = NotionExporter::new(
            Credentials::new("token\nwith-newline"),
            ExportConfig::default(),
        );
        assert!(matches!(result, Err(Error::InvalidCredentials)));
    }

    #[test]
    fn test_constructor_accepts_default_endpoint() {
        let exporter =
            NotionExporter::new(Credentials::new("abc123"), ExportConfig::default()).unwrap();
        assert_eq!(exporter.base_url.as_str(), DEFAULT_API_URL);
    }

    #[tokio::test]
    async fn test_invalid_input_fails_before_any_network_call() {
        // Unroutable endpoint: reaching the network here would error differently
        let base = Url::parse("http://127.0.0.1:1/api/v3/").unwrap();
        let exporter = NotionExporter::with_api_url(
            base,
            Credentials::new("abc123"),
            ExportConfig::default(),
        )
        .unwrap();

        let err = exporter.resolve_export_url("not an id").await.unwrap_err();
        assert!(matches!(err, Error::InvalidBlockId { .. }));
    }
}
