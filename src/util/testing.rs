// src/util/testing.rs

use anyhow::Result;
use async_trait::async_trait;
use futures::FutureExt;
use std::collections::{HashMap, VecDeque};
use std::env;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{HttpTransport, KeyValueStore, RawResponse, Scheduler, TransportError};
use crate::domain::{fallback_image_url, FlashCard, LanguageDeck, StoreError};

/// Scripted outcome of one [`MockTransport`] request
#[derive(Debug, Clone)]
pub enum MockReply {
    Response { status: u16, body: String },
    /// Host unreachable
    Unreachable,
    /// Never completes; only a deadline ends it
    Hang,
}

impl MockReply {
    pub fn json(body: &str) -> Self {
        MockReply::Response {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        MockReply::Response {
            status,
            body: String::new(),
        }
    }
}

#[derive(Default)]
struct TransportState {
    script: VecDeque<MockReply>,
    fallback: Option<MockReply>,
    requests: Vec<String>,
}

/// Shared mock transport for testing the fetch client and accessors
///
/// Replies are consumed in order; once the script is empty the `always` reply
/// is used. Clones share state, so a test can keep a handle after moving one
/// into a client.
///
/// # Examples
///
/// ```
/// use flashdeck::util::testing::{MockReply, MockTransport};
///
/// let transport = MockTransport::builder()
///     .then(MockReply::status(503))
///     .always(MockReply::json(r#"{"regions": []}"#))
///     .build();
/// assert_eq!(transport.request_count(), 0);
/// ```
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<TransportState>>,
    aborted: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder::new()
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Requests dropped before completing
    pub fn aborted_count(&self) -> usize {
        self.aborted.load(Ordering::SeqCst)
    }

    fn next_reply(&self, url: &str) -> MockReply {
        let mut state = self.state.lock().unwrap();
        state.requests.push(url.to_string());
        state
            .script
            .pop_front()
            .or_else(|| state.fallback.clone())
            .unwrap_or(MockReply::status(404))
    }
}

struct AbortGuard(Arc<AtomicUsize>);

impl Drop for AbortGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn reason_phrase(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
        .to_string()
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        match self.next_reply(url) {
            MockReply::Response { status, body } => Ok(RawResponse {
                status,
                reason: reason_phrase(status),
                body: body.into_bytes(),
            }),
            MockReply::Unreachable => Err(TransportError::Unreachable(
                "connection refused".to_string(),
            )),
            MockReply::Hang => {
                let _guard = AbortGuard(Arc::clone(&self.aborted));
                std::future::pending::<()>().await;
                unreachable!("pending future never resolves")
            }
        }
    }
}

/// Builder for MockTransport
pub struct MockTransportBuilder {
    script: VecDeque<MockReply>,
    fallback: Option<MockReply>,
}

impl MockTransportBuilder {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            fallback: None,
        }
    }

    /// Queue a reply for the next unanswered request
    pub fn then(mut self, reply: MockReply) -> Self {
        self.script.push_back(reply);
        self
    }

    /// Reply used once the queue is exhausted
    pub fn always(mut self, reply: MockReply) -> Self {
        self.fallback = Some(reply);
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            state: Arc::new(Mutex::new(TransportState {
                script: self.script,
                fallback: self.fallback,
                requests: Vec::new(),
            })),
            aborted: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Default for MockTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scheduler that never waits.
///
/// Sleeps are recorded instead of taken. A deadline polls the future once: if it
/// is not ready, the deadline counts as expired and the future is dropped.
#[derive(Clone, Default)]
pub struct MockScheduler {
    sleeps: Arc<Mutex<Vec<Duration>>>,
    deadlines: Arc<Mutex<Vec<Duration>>>,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn deadlines(&self) -> Vec<Duration> {
        self.deadlines.lock().unwrap().clone()
    }
}

#[async_trait]
impl Scheduler for MockScheduler {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }

    async fn with_deadline<F>(&self, limit: Duration, fut: F) -> Option<F::Output>
    where
        F: Future + Send,
        F::Output: Send,
    {
        self.deadlines.lock().unwrap().push(limit);
        Box::pin(fut).now_or_never()
    }
}

/// In-memory key-value store with switchable failures
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::default()
    }

    /// Stored value, bypassing failure switches
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("quota exceeded".to_string()));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("quota exceeded".to_string()));
        }
        self.values.remove(key);
        Ok(())
    }
}

/// Builder for MemoryStore
#[derive(Default)]
pub struct MemoryStoreBuilder {
    store: MemoryStore,
}

impl MemoryStoreBuilder {
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.store.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.store.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.store.fail_writes = true;
        self
    }

    pub fn build(self) -> MemoryStore {
        self.store
    }
}

/// Deck of `count` cards numbered from 1, with fallback images filled in
pub fn sample_deck(code: &str, count: u32) -> LanguageDeck {
    LanguageDeck {
        code: code.to_string(),
        name: format!("Language {code}"),
        region: "Test Region".to_string(),
        cards: (1..=count)
            .map(|n| FlashCard {
                number: n,
                word: format!("word{n}"),
                pronunciation: format!("pron{n}"),
                image: format!("/images/{code}/{n}.jpg"),
                fallback_image: fallback_image_url(code, n),
            })
            .collect(),
    }
}

/// Wire JSON for a deck, as served by the data host
pub fn sample_deck_json(code: &str, count: u32) -> String {
    let cards: Vec<serde_json::Value> = (1..=count)
        .map(|n| {
            serde_json::json!({
                "number": n,
                "word": format!("word{n}"),
                "pronunciation": format!("pron{n}"),
                "image": format!("/images/{code}/{n}.jpg"),
            })
        })
        .collect();
    serde_json::json!({
        "code": code,
        "name": format!("Language {code}"),
        "region": "Test Region",
        "cards": cards,
    })
    .to_string()
}

pub fn sample_categories_json() -> String {
    serde_json::json!({
        "regions": [
            {
                "id": "europe",
                "name": "Europe",
                "languages": [
                    { "code": "es", "name": "Spanish", "flag": "🇪🇸" },
                    { "code": "fr", "name": "French", "flag": "🇫🇷" }
                ]
            },
            {
                "id": "pacific",
                "name": "Pacific",
                "languages": [
                    { "code": "haw", "name": "Hawaiian", "flag": "🌺" },
                    { "code": "tl", "name": "Tagalog", "flag": "🇵🇭" }
                ]
            }
        ]
    })
    .to_string()
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "hyper_util", "reqwest", "mio", "h2"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
