//! Archive fixtures and mock export API helpers

use std::io::{Cursor, Write};

use notion_exporter::{Credentials, ExportConfig, NotionExporter};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Session cookie value shared by the integration tests
pub const TEST_TOKEN: &str = "v02-integration-token";

/// Task id handed out by the mock enqueue endpoint
pub const TEST_TASK_ID: &str = "d0407f42-7b4f-4d12-80e5-22ab30ab5b7c";

/// Builds an in-memory ZIP archive from (name, content) pairs
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Config with polling fast enough for tests
pub fn fast_config() -> ExportConfig {
    ExportConfig {
        poll_interval_ms: 10,
        ..Default::default()
    }
}

/// Exporter pointed at a mock server
pub fn test_exporter(server: &MockServer, config: ExportConfig) -> NotionExporter {
    let api_url = Url::parse(&format!("{}/api/v3/", server.uri())).unwrap();
    NotionExporter::with_api_url(api_url, Credentials::new(TEST_TOKEN), config).unwrap()
}

/// Mounts the full happy path: enqueue, immediately successful task,
/// archive download
///
/// The API endpoints require the test session cookie, so a passing flow
/// also proves the cookie header went out.
pub async fn mount_export_api(server: &MockServer, archive: Vec<u8>) {
    let cookie = format!("token_v2={TEST_TOKEN}");

    Mock::given(method("POST"))
        .and(path("/api/v3/enqueueTask"))
        .and(header("cookie", cookie.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "taskId": TEST_TASK_ID,
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v3/getTasks"))
        .and(header("cookie", cookie.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "id": TEST_TASK_ID,
                "state": "success",
                "status": {
                    "type": "complete",
                    "pagesExported": 1,
                    "exportURL": format!("{}/export.zip", server.uri()),
                },
            }],
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/export.zip"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/zip")
                .set_body_bytes(archive),
        )
        .mount(server)
        .await;
}
