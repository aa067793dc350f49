//! The two remote verse sources and their reqwest clients.

use std::future::Future;

use reqwest::Client;
use serde::Deserialize;

use crate::config::ApiKey;
use crate::error::VerseError;
use crate::translation::Translation;
use crate::verse::{CanonicalVerseId, RandomVerseRecord, VersePayload};

pub const DEFAULT_RANDOM_VERSE_URL: &str = "https://labs.bible.org/api/?passage=random&type=json";
pub const DEFAULT_CANONICAL_BASE_URL: &str = "https://api.scripture.api.bible/v1";

/// Hands out one verse picked by the remote service.
pub trait RandomVerseSource: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn random_verse(&self) -> impl Future<Output = Result<RandomVerseRecord, VerseError>> + Send;
}

/// Serves verse content addressed by translation and canonical verse id.
pub trait CanonicalVerseSource: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn verse(
        &self,
        translation: Translation,
        id: &CanonicalVerseId,
    ) -> impl Future<Output = Result<VersePayload, VerseError>> + Send;
}

// ============================================================================
// labs.bible.org
// ============================================================================

#[derive(Clone)]
pub struct LabsBibleClient {
    client: Client,
    url: String,
}

impl LabsBibleClient {
    pub fn new(url: &str) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

impl RandomVerseSource for LabsBibleClient {
    fn name(&self) -> &'static str {
        "labs.bible.org"
    }

    async fn random_verse(&self) -> Result<RandomVerseRecord, VerseError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| VerseError::from_reqwest(self.name(), &e))?;

        if !response.status().is_success() {
            return Err(VerseError::Status {
                source_name: self.name(),
                status: response.status().as_u16(),
            });
        }

        let records: Vec<RandomVerseRecord> = response
            .json()
            .await
            .map_err(|e| VerseError::from_reqwest(self.name(), &e))?;

        first_record(records, self.name())
    }
}

fn first_record(
    records: Vec<RandomVerseRecord>,
    source_name: &'static str,
) -> Result<RandomVerseRecord, VerseError> {
    records
        .into_iter()
        .next()
        .ok_or(VerseError::PayloadMissing { source_name })
}

// ============================================================================
// API.Bible
// ============================================================================

#[derive(Deserialize)]
struct ApiBibleResponse {
    data: Option<ApiBibleVerse>,
}

#[derive(Deserialize)]
struct ApiBibleVerse {
    reference: Option<String>,
    content: Option<String>,
}

#[derive(Clone)]
pub struct ApiBibleClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl ApiBibleClient {
    pub fn new(base_url: &str, api_key: ApiKey) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    pub fn with_client(client: Client, base_url: &str, api_key: ApiKey) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn verse_url(&self, translation: Translation, id: &CanonicalVerseId) -> String {
        format!(
            "{}/bibles/{}/verses/{}",
            self.base_url,
            translation.bible_id(),
            id
        )
    }
}

impl CanonicalVerseSource for ApiBibleClient {
    fn name(&self) -> &'static str {
        "API.Bible"
    }

    async fn verse(
        &self,
        translation: Translation,
        id: &CanonicalVerseId,
    ) -> Result<VersePayload, VerseError> {
        let response = self
            .client
            .get(self.verse_url(translation, id))
            .query(&[
                ("content-type", "html"),
                ("include-notes", "false"),
                ("include-titles", "false"),
                ("include-chapter-numbers", "false"),
                ("include-verse-numbers", "false"),
            ])
            .header("api-key", self.api_key.expose())
            .send()
            .await
            .map_err(|e| VerseError::from_reqwest(self.name(), &e))?;

        if !response.status().is_success() {
            return Err(VerseError::Status {
                source_name: self.name(),
                status: response.status().as_u16(),
            });
        }

        let body: ApiBibleResponse = response
            .json()
            .await
            .map_err(|e| VerseError::from_reqwest(self.name(), &e))?;

        into_payload(body, translation, id, self.name())
    }
}

fn into_payload(
    body: ApiBibleResponse,
    translation: Translation,
    id: &CanonicalVerseId,
    source_name: &'static str,
) -> Result<VersePayload, VerseError> {
    let data = body.data.ok_or(VerseError::PayloadMissing { source_name })?;
    let content = data
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(VerseError::PayloadMissing { source_name })?;

    Ok(VersePayload {
        reference: data.reference.unwrap_or_else(|| id.to_string()),
        content,
        translation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn john_3_16() -> CanonicalVerseId {
        CanonicalVerseId::new("JHN", 3, 16).unwrap()
    }

    fn parse(json: &str) -> Result<VersePayload, VerseError> {
        let body: ApiBibleResponse = serde_json::from_str(json).unwrap();
        into_payload(body, Translation::Kjv, &john_3_16(), "API.Bible")
    }

    #[test]
    fn test_payload_from_full_response() {
        let payload = parse(
            r#"{"data":{"id":"JHN.3.16","reference":"John 3:16","content":"<p>For God so loved the world</p>"},"meta":{}}"#,
        )
        .unwrap();
        assert_eq!(payload.reference, "John 3:16");
        assert_eq!(payload.content, "<p>For God so loved the world</p>");
        assert_eq!(payload.translation, Translation::Kjv);
    }

    #[test]
    fn test_missing_data_is_payload_missing() {
        let err = parse(r#"{"statusCode":200}"#).unwrap_err();
        assert_eq!(err, VerseError::PayloadMissing { source_name: "API.Bible" });
    }

    #[test]
    fn test_empty_content_is_payload_missing() {
        let err = parse(r#"{"data":{"reference":"John 3:16","content":"  "}}"#).unwrap_err();
        assert_eq!(err.kind(), "payload_missing");
    }

    #[test]
    fn test_missing_reference_falls_back_to_id() {
        let payload = parse(r#"{"data":{"content":"<p>text</p>"}}"#).unwrap();
        assert_eq!(payload.reference, "JHN.3.16");
    }

    #[test]
    fn test_empty_random_response_is_payload_missing() {
        let err = first_record(Vec::new(), "labs.bible.org").unwrap_err();
        assert_eq!(err.kind(), "payload_missing");
    }

    #[test]
    fn test_verse_url() {
        let client = ApiBibleClient::new("https://example.test/v1/", ApiKey::new("k"));
        assert_eq!(
            client.verse_url(Translation::Kjv, &john_3_16()),
            "https://example.test/v1/bibles/de4e12af7f28f599-02/verses/JHN.3.16"
        );
    }

    // ------------------------------------------------------------------------
    // HTTP
    // ------------------------------------------------------------------------

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    /// Serve one canned response on a local port. Resolves to the request head.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&head).to_lowercase()
        });

        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn test_api_bible_sends_key_and_html_query() {
        let body = r#"{"data":{"reference":"John 3:16","content":"<p>For God so loved the world</p>"}}"#;
        let (base, server) = serve_once("200 OK", body).await;
        let client = ApiBibleClient::with_client(
            local_client(),
            &format!("{}/v1", base),
            ApiKey::new("secret-key"),
        );

        let payload = client.verse(Translation::Kjv, &john_3_16()).await.unwrap();
        let head = server.await.unwrap();

        let request_line = head.lines().next().unwrap();
        assert!(request_line
            .starts_with("get /v1/bibles/de4e12af7f28f599-02/verses/jhn.3.16?"));
        assert!(request_line.contains("content-type=html"));
        assert!(request_line.contains("include-verse-numbers=false"));
        assert!(head.contains("\r\napi-key: secret-key\r\n"));
        assert_eq!(payload.reference, "John 3:16");
        assert_eq!(payload.translation, Translation::Kjv);
    }

    #[tokio::test]
    async fn test_api_bible_unauthorized_is_status_error() {
        let (base, server) = serve_once("401 Unauthorized", r#"{"statusCode":401}"#).await;
        let client = ApiBibleClient::with_client(local_client(), &base, ApiKey::new("wrong"));

        let err = client.verse(Translation::Web, &john_3_16()).await.unwrap_err();
        server.await.unwrap();

        assert_eq!(err, VerseError::Status { source_name: "API.Bible", status: 401 });
        assert_eq!(err.kind(), "network");
    }

    #[tokio::test]
    async fn test_api_bible_malformed_body_is_network_error() {
        let (base, server) = serve_once("200 OK", "<html>not json</html>").await;
        let client = ApiBibleClient::with_client(local_client(), &base, ApiKey::new("k"));

        let err = client.verse(Translation::Web, &john_3_16()).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, VerseError::Network { source_name: "API.Bible", .. }));
        assert_eq!(err.kind(), "network");
    }

    #[tokio::test]
    async fn test_labs_random_verse_over_http() {
        let body = r#"[{"bookname":"John","chapter":"3","verse":16,"text":"For God so loved the world"}]"#;
        let (base, server) = serve_once("200 OK", body).await;
        let client = LabsBibleClient::with_client(
            local_client(),
            &format!("{}/api/?passage=random&type=json", base),
        );

        let record = client.random_verse().await.unwrap();
        let head = server.await.unwrap();

        assert!(head.starts_with("get /api/?passage=random&type=json http/1.1"));
        assert!(!head.contains("api-key"));
        assert_eq!(record.bookname, "John");
        assert_eq!(record.verse_id().unwrap(), john_3_16());
    }

    #[tokio::test]
    async fn test_labs_server_error_is_status_error() {
        let (base, server) = serve_once("500 Internal Server Error", "{}").await;
        let client = LabsBibleClient::with_client(local_client(), &base);

        let err = client.random_verse().await.unwrap_err();
        server.await.unwrap();

        assert_eq!(err, VerseError::Status { source_name: "labs.bible.org", status: 500 });
        assert_eq!(err.kind(), "network");
    }

    #[tokio::test]
    async fn test_labs_empty_list_is_payload_missing() {
        let (base, server) = serve_once("200 OK", "[]").await;
        let client = LabsBibleClient::with_client(local_client(), &base);

        let err = client.random_verse().await.unwrap_err();
        server.await.unwrap();

        assert_eq!(err.kind(), "payload_missing");
    }
}
