//! Test helpers: a scripted HTTP server and a warning-capture layer.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::fmt::Debug;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use veritas_runtime::secrets::{
    GNEWS_API_KEY_ENV, GOOGLE_API_KEY_ENV, GOOGLE_CSE_ID_ENV, NEWS_API_KEY_ENV,
};
use veritas_runtime::{CredentialSet, SearchConfig};

/// What the server does with one incoming request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with a status and JSON body
    Json(u16, String),
    /// Close the connection without responding
    Drop,
    /// Wait, then respond
    Delayed(Duration, u16, String),
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Reply::Json(200, body.into())
    }

    pub fn status(status: u16) -> Self {
        Reply::Json(status, r#"{"error":{"message":"scripted failure"}}"#.to_string())
    }
}

/// A request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or("")
    }

    pub fn has_query(&self, pair: &str) -> bool {
        self.target
            .split_once('?')
            .map(|(_, q)| q.split('&').any(|p| p == pair))
            .unwrap_or(false)
    }
}

/// Serves scripted replies in order, one connection per request.
///
/// Once the script is exhausted every further request gets a 500.
pub struct ScriptedServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl ScriptedServer {
    pub async fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        let handle = tokio::spawn(async move {
            let mut replies = replies.into_iter();
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let Some(request) = read_request(&mut stream).await else {
                    continue;
                };
                recorded.lock().push(request);

                match replies.next().unwrap_or_else(|| Reply::status(500)) {
                    Reply::Json(status, body) => write_response(stream, status, &body).await,
                    Reply::Drop => drop(stream),
                    Reply::Delayed(delay, status, body) => {
                        tokio::time::sleep(delay).await;
                        write_response(stream, status, &body).await;
                    }
                }
            }
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Drop for ScriptedServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
    })
}

async fn write_response(mut stream: TcpStream, status: u16, body: &str) {
    let reason = if (200..300).contains(&status) { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// WARN events emitted by veritas-runtime, rendered as `message field=value ...`.
#[derive(Clone, Default)]
pub struct CapturedWarnings(Arc<Mutex<Vec<String>>>);

impl CapturedWarnings {
    /// Install a capturing subscriber for the current thread.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().len()
    }
}

impl<S: Subscriber> Layer<S> for CapturedWarnings {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() == Level::WARN && metadata.target().starts_with("veritas_runtime") {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            self.0.lock().push(visitor.message);
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.message.insert_str(0, &format!("{:?}", value));
        } else {
            self.message.push_str(&format!(" {}={:?}", field.name(), value));
        }
    }
}

/// Credentials for every source and the default LLM provider.
pub fn test_credentials() -> CredentialSet {
    CredentialSet::new()
        .with(GOOGLE_API_KEY_ENV, "google-key")
        .with(GOOGLE_CSE_ID_ENV, "engine-id")
        .with(NEWS_API_KEY_ENV, "news-key")
        .with(GNEWS_API_KEY_ENV, "gnews-token")
        .with("GROQ_API_KEY", "groq-key")
}

/// Search config with fast retries and a short timeout.
pub fn fast_search_config() -> SearchConfig {
    let mut config = SearchConfig::default();
    config.timeout = Duration::from_millis(500);
    config.google.backoff = Duration::from_millis(10);
    config
}

pub fn google_body(count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| {
            format!(r#"{{"title":"Result {i}","link":"https://example.ge/{i}","snippet":"Snippet {i}"}}"#)
        })
        .collect();
    format!(r#"{{"kind":"customsearch#search","items":[{}]}}"#, items.join(","))
}

pub fn articles_body(count: usize) -> String {
    let articles: Vec<String> = (0..count)
        .map(|i| {
            format!(r#"{{"title":"Article {i}","url":"https://news.ge/{i}","description":"Description {i}"}}"#)
        })
        .collect();
    format!(r#"{{"status":"ok","totalResults":{count},"articles":[{}]}}"#, articles.join(","))
}

pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-1",
        "model": "llama3-70b-8192",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 100, "completion_tokens": 40, "total_tokens": 140}
    })
    .to_string()
}
