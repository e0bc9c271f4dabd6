//! Transport layer
//!
//! Two seams: [`Transport`] carries JSON-RPC verbs (full node or wallet
//! bridge), [`RestTransport`] carries explorer GET requests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use crate::SdkError;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get JSON response
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError>;
}

/// Explorer REST transport (object-safe)
#[async_trait]
pub trait RestTransport: Send + Sync {
    /// GET `path` relative to the explorer base URL.
    ///
    /// A non-200 status or a non-JSON body is reported as `Ok(None)`; only
    /// connection-level failures are errors.
    async fn get_json(&self, path: &str) -> Result<Option<Value>, SdkError>;
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

#[derive(Debug, Clone)]
enum MockReply {
    Value(Value),
    Error { code: i64, message: String },
}

impl MockReply {
    fn into_result(self) -> Result<Value, SdkError> {
        match self {
            MockReply::Value(v) => Ok(v),
            MockReply::Error { code, message } => Err(SdkError::Rpc { code, message }),
        }
    }
}

/// Mock JSON-RPC transport for testing
///
/// Clones share state, so a test can keep a handle for inspection after
/// moving the transport into a provider.
#[derive(Clone)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    queued: Arc<Mutex<HashMap<String, VecDeque<MockReply>>>>,
    calls: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();
        defaults.insert("getblockcount".to_string(), MockReply::Value(Value::from(100_000u64)));
        defaults.insert(
            "gettransactionreceipt".to_string(),
            MockReply::Value(Value::Array(vec![])),
        );

        Self {
            responses: Arc::new(Mutex::new(defaults)),
            queued: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a fixed response for a method
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_response(&self, method: &str, response: Value) {
        self.responses
            .lock()
            .expect("MockTransport mutex poisoned")
            .insert(method.to_string(), MockReply::Value(response));
    }

    /// Make a method fail with an RPC error
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_error(&self, method: &str, code: i64, message: &str) {
        self.responses
            .lock()
            .expect("MockTransport mutex poisoned")
            .insert(
                method.to_string(),
                MockReply::Error {
                    code,
                    message: message.to_string(),
                },
            );
    }

    /// Queue a one-shot response; queued responses are consumed in order
    /// before the fixed response is used
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn push_response(&self, method: &str, response: Value) {
        self.queued
            .lock()
            .expect("MockTransport mutex poisoned")
            .entry(method.to_string())
            .or_default()
            .push_back(MockReply::Value(response));
    }

    /// Clear fixed and queued responses
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn clear_responses(&self) {
        self.responses.lock().expect("MockTransport mutex poisoned").clear();
        self.queued.lock().expect("MockTransport mutex poisoned").clear();
    }

    /// Every request seen so far, in order
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().expect("MockTransport mutex poisoned").clone()
    }

    /// Number of requests made for `method`
    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|(m, _)| m == method).count()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        self.calls
            .lock()
            .map_err(|_| SdkError::Transport("MockTransport mutex poisoned".to_string()))?
            .push((method.to_string(), params));

        let queued = self
            .queued
            .lock()
            .map_err(|_| SdkError::Transport("MockTransport mutex poisoned".to_string()))?
            .get_mut(method)
            .and_then(|q| q.pop_front());

        if let Some(reply) = queued {
            return reply.into_result();
        }

        let fixed = self
            .responses
            .lock()
            .map_err(|_| SdkError::Transport("MockTransport mutex poisoned".to_string()))?
            .get(method)
            .cloned();

        match fixed {
            Some(reply) => reply.into_result(),
            None => Err(SdkError::Rpc {
                code: -32601,
                message: format!("Method not found: {}", method),
            }),
        }
    }
}

/// Mock explorer transport for testing
///
/// Routes are matched on the exact request path (including query string).
#[derive(Clone, Default)]
pub struct MockRestTransport {
    routes: Arc<Mutex<HashMap<String, Value>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockRestTransport {
    /// Create an empty mock; unknown paths answer `Ok(None)`
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `path`
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_route(&self, path: &str, body: Value) {
        self.routes
            .lock()
            .expect("MockRestTransport mutex poisoned")
            .insert(path.to_string(), body);
    }

    /// Make `path` fail with a transport error
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn fail_route(&self, path: &str) {
        self.failing
            .lock()
            .expect("MockRestTransport mutex poisoned")
            .insert(path.to_string());
    }

    /// Every path requested so far, in order
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("MockRestTransport mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl RestTransport for MockRestTransport {
    async fn get_json(&self, path: &str) -> Result<Option<Value>, SdkError> {
        self.requests
            .lock()
            .map_err(|_| SdkError::Transport("MockRestTransport mutex poisoned".to_string()))?
            .push(path.to_string());

        let failing = self
            .failing
            .lock()
            .map_err(|_| SdkError::Transport("MockRestTransport mutex poisoned".to_string()))?
            .contains(path);
        if failing {
            return Err(SdkError::Transport(format!("connection refused: {}", path)));
        }

        Ok(self
            .routes
            .lock()
            .map_err(|_| SdkError::Transport("MockRestTransport mutex poisoned".to_string()))?
            .get(path)
            .cloned())
    }
}

/// HTTP transport for a Metrix node's JSON-RPC interface
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    auth: Option<(String, String)>,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            auth: None,
            request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    /// Authenticate with the node's rpcuser/rpcpassword
    pub fn with_basic_auth(mut self, user: &str, password: &str) -> Self {
        self.auth = Some((user.to_string(), password.to_string()));
        self
    }

    fn next_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        let request = serde_json::json!({
            "jsonrpc": "1.0",
            "id": self.next_id(),
            "method": method,
            "params": params,
        });

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some((user, password)) = &self.auth {
            builder = builder.basic_auth(user, Some(password));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        // The node answers errors with a 500 status and a JSON body, so the
        // body is parsed regardless of status.
        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(SdkError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result.unwrap_or(Value::Null))
    }
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// HTTP transport for the block explorer API
#[cfg(feature = "http")]
pub struct HttpRestTransport {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpRestTransport {
    /// Create a transport rooted at `base_url` (e.g. `https://explorer.metrixcoin.com/api`)
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl RestTransport for HttpRestTransport {
    async fn get_json(&self, path: &str) -> Result<Option<Value>, SdkError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        if response.status() != reqwest::StatusCode::OK {
            tracing::debug!("GET {} returned {}", url, response.status());
            return Ok(None);
        }

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            tracing::debug!("GET {} did not return JSON", url);
            return Ok(None);
        }

        match response.json::<Value>().await {
            Ok(body) => Ok(Some(body)),
            Err(e) => {
                tracing::warn!("GET {} returned a malformed body: {}", url, e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_transport_default_responses() {
        let transport = MockTransport::new();
        let result = transport.request_json("getblockcount", vec![]).await.unwrap();
        assert_eq!(result, json!(100_000));
    }

    #[tokio::test]
    async fn test_mock_transport_custom_response() {
        let transport = MockTransport::new();
        transport.set_response("getblockcount", json!(42));
        let result = transport.request_json("getblockcount", vec![]).await.unwrap();
        assert_eq!(result, json!(42));
    }

    #[tokio::test]
    async fn test_mock_transport_queue_before_fixed() {
        let transport = MockTransport::new();
        transport.set_response("gettransaction", json!({"confirmations": 3}));
        transport.push_response("gettransaction", json!({"confirmations": 0}));

        let first = transport.request_json("gettransaction", vec![]).await.unwrap();
        let second = transport.request_json("gettransaction", vec![]).await.unwrap();
        assert_eq!(first["confirmations"], 0);
        assert_eq!(second["confirmations"], 3);
        assert_eq!(transport.call_count("gettransaction"), 2);
    }

    #[tokio::test]
    async fn test_mock_transport_records_params() {
        let transport = MockTransport::new();
        let shared = transport.clone();
        let _ = transport
            .request_json("getaccountinfo", vec![json!("abcd")])
            .await;
        let calls = shared.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "getaccountinfo");
        assert_eq!(calls[0].1, vec![json!("abcd")]);
    }

    #[tokio::test]
    async fn test_mock_transport_errors() {
        let transport = MockTransport::new();
        assert!(transport.request_json("unknown_method", vec![]).await.is_err());

        transport.set_error("sendtocontract", -5, "Invalid address");
        match transport.request_json("sendtocontract", vec![]).await {
            Err(SdkError::Rpc { code, message }) => {
                assert_eq!(code, -5);
                assert_eq!(message, "Invalid address");
            }
            other => panic!("Expected Rpc error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mock_rest_transport() {
        let rest = MockRestTransport::new();
        rest.set_route("/address/ab", json!({"balance": "10"}));
        rest.fail_route("/tx/dead");

        assert_eq!(
            rest.get_json("/address/ab").await.unwrap(),
            Some(json!({"balance": "10"}))
        );
        assert_eq!(rest.get_json("/missing").await.unwrap(), None);
        assert!(rest.get_json("/tx/dead").await.is_err());
        assert_eq!(rest.requests(), vec!["/address/ab", "/missing", "/tx/dead"]);
    }
}
