use crate::body::MAX_BODY_BYTES;
use crate::error::{Result, TransportErrorKind};
use crate::identity::ClientIdentity;
use crate::policy::{ProbeConfig, TlsVerification};
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// At most `MAX_BODY_BYTES` of the body.
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn from_reqwest(error: &reqwest::Error) -> Self {
        Self::new(classify_reqwest_error(error), error_chain(error))
    }
}

/// One outbound request per call. Implementations must not retry on their own.
pub trait Transport: Send + Sync {
    fn fetch(
        &self,
        url: &str,
        identity: &ClientIdentity,
    ) -> impl Future<Output = std::result::Result<TransportResponse, TransportError>> + Send;
}

/// reqwest-backed transport used for real runs.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout / 2)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .cookie_store(true)
            .danger_accept_invalid_certs(config.tls == TlsVerification::Bypass)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn fetch(
        &self,
        url: &str,
        identity: &ClientIdentity,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let mut response = self
            .client
            .get(url)
            .header(USER_AGENT, identity.user_agent.as_str())
            .header(ACCEPT, identity.accept.as_str())
            .header(ACCEPT_LANGUAGE, identity.accept_language.as_str())
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let mut body = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    let room = MAX_BODY_BYTES - body.len();
                    body.extend_from_slice(&chunk[..chunk.len().min(room)]);
                    if body.len() >= MAX_BODY_BYTES {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    // Keep what arrived; the status line is already known.
                    debug!("Body read for {} cut short: {}", url, e);
                    break;
                }
            }
        }

        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}

/// TLS failures surface as connect errors in reqwest, so the source chain is
/// inspected before falling back to the coarse flags.
fn classify_reqwest_error(error: &reqwest::Error) -> TransportErrorKind {
    if error.is_timeout() {
        return TransportErrorKind::Timeout;
    }

    let mut source = error.source();
    while let Some(inner) = source {
        let text = inner.to_string().to_ascii_lowercase();
        if ["certificate", "tls", "ssl", "handshake"]
            .iter()
            .any(|needle| text.contains(needle))
        {
            return TransportErrorKind::Tls;
        }
        source = inner.source();
    }

    if error.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    }
}

fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    #[tokio::test]
    async fn test_fetch_sends_identity_headers() {
        let mock_server = MockServer::start().await;
        let identity = ClientIdentity::new("probe-test/1.0", "application/json", "en-US");

        Mock::given(method("GET"))
            .and(path("/api.php/provide/vod"))
            .and(header("user-agent", "probe-test/1.0"))
            .and(header("accept-language", "en-US"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_bytes(br#"{"list":[]}"#.as_slice()),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(&ProbeConfig::default()).unwrap();
        let url = format!("{}/api.php/provide/vod", mock_server.uri());
        let response = transport.fetch(&url, &identity).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
        assert_eq!(response.body, br#"{"list":[]}"#);
    }

    #[tokio::test]
    async fn test_body_is_capped() {
        let mock_server = MockServer::start().await;
        let big = vec![b'x'; MAX_BODY_BYTES + 1024];

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(big))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(&ProbeConfig::default()).unwrap();
        let identity = ClientIdentity::new("probe-test/1.0", "*/*", "en");
        let response = transport.fetch(&mock_server.uri(), &identity).await.unwrap();

        assert_eq!(response.body.len(), MAX_BODY_BYTES);
    }

    #[tokio::test]
    async fn test_refused_connection_is_connect_error() {
        // Bind then drop a listener to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = HttpTransport::new(&ProbeConfig::default()).unwrap();
        let identity = ClientIdentity::new("probe-test/1.0", "*/*", "en");
        let error = transport
            .fetch(&format!("http://127.0.0.1:{}/api", port), &identity)
            .await
            .unwrap_err();

        assert_eq!(error.kind, TransportErrorKind::Connect);
        assert!(!error.message.is_empty());
    }
}
