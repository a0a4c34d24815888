use anyhow::{Context, Result};
use flashdeck::config::ApiConfig;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Canned reply for one path of the [`TestServer`]
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Canned {
    Json(String),
    Status(u16, &'static str),
    /// Accept the request and never answer
    Hang,
    /// Promise more body bytes than are sent, then close the connection
    Truncated(String),
}

/// Minimal HTTP/1.1 server on localhost serving canned replies
#[allow(dead_code)]
pub struct TestServer {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestServer {
    /// Start serving `routes` (path -> reply); unknown paths get 404
    pub async fn start(routes: Vec<(&str, Canned)>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind test server")?;
        let addr = listener.local_addr()?;
        let routes: Arc<HashMap<String, Canned>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, reply)| (path.to_string(), reply))
                .collect(),
        );
        let hits = Arc::new(Mutex::new(Vec::new()));

        let server_hits = Arc::clone(&hits);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&server_hits);
                tokio::spawn(async move {
                    let _ = serve(stream, routes, hits).await;
                });
            }
        });

        Ok(Self {
            base_url: format!("http://{}/data", addr),
            hits,
            handle,
        })
    }

    /// Paths requested so far
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn api_config(&self, retry_attempts: u32) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout_ms: 2_000,
            retry_attempts,
            retry_delay_ms: 10,
            endpoint_suffix: ".json".to_string(),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    routes: Arc<HashMap<String, Canned>>,
    hits: Arc<Mutex<Vec<String>>>,
) -> Result<()> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        request.extend_from_slice(&buf[..n]);
    }

    let head = String::from_utf8_lossy(&request);
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    hits.lock().unwrap().push(path.clone());

    let (status, reason, body) = match routes.get(&path) {
        Some(Canned::Json(body)) => (200, "OK", body.clone()),
        Some(Canned::Status(status, reason)) => (*status, *reason, String::new()),
        Some(Canned::Truncated(body)) => {
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                body.len() + 100,
                body
            );
            stream.write_all(response.as_bytes()).await?;
            stream.shutdown().await?;
            return Ok(());
        }
        Some(Canned::Hang) => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            return Ok(());
        }
        None => (404, "Not Found", String::new()),
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

/// Base URL of a port nothing listens on
#[allow(dead_code)]
pub fn unreachable_base_url() -> Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}/data", addr))
}

/// Temporary directory for the progress file
#[allow(dead_code)]
pub struct TestDataDir {
    _temp_dir: TempDir,
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestDataDir {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        let path = temp_dir.path().join("progress");
        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    pub fn progress_file(&self) -> PathBuf {
        self.path.join("flashcard-progress.json")
    }
}
