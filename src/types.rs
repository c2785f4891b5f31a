use hyper::http::request::Parts;
use hyper::{HeaderMap, Method, Uri};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::hash_map::{HashMap, Iter};
use std::fmt::{self, Display, Formatter};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one in-flight request for the lifetime of the process.
///
/// Ids come from a process-wide counter, so two requests never share one even when they arrive
/// on the same keep-alive connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub(crate) fn next() -> RequestId {
        RequestId(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a map of the route parameters using the name of the parameter specified in the path as their respective keys.
///
/// Please refer to the [Route Parameters](./index.html#route-parameters) section for more info.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(HashMap<String, String>);

impl RouteParams {
    /// Creates an empty route parameters map.
    pub fn new() -> RouteParams {
        RouteParams(HashMap::new())
    }

    /// Creates an empty route parameters map with the specified capacity.
    pub fn with_capacity(capacity: usize) -> RouteParams {
        RouteParams(HashMap::with_capacity(capacity))
    }

    /// Sets a new parameter entry with the specified key. An existing entry is overwritten.
    pub fn set<N: Into<String>, V: Into<String>>(&mut self, param_name: N, param_val: V) {
        self.0.insert(param_name.into(), param_val.into());
    }

    /// Returns a route parameter value.
    pub fn get<N: AsRef<str>>(&self, param_name: N) -> Option<&String> {
        self.0.get(param_name.as_ref())
    }

    /// Checks if a route parameter exists.
    pub fn has<N: AsRef<str>>(&self, param_name: N) -> bool {
        self.0.contains_key(param_name.as_ref())
    }

    /// Returns the length of the route parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the route parameters map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an [`Iterator`](https://doc.rust-lang.org/std/collections/hash_map/struct.Iter.html) over the parameter names and values.
    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }

    /// Extends the current parameters map with other one. Later entries win.
    pub fn extend(&mut self, other_route_params: RouteParams) {
        other_route_params.0.into_iter().for_each(|(key, val)| {
            self.set(key, val);
        })
    }
}

/// Per-request state: captured route parameters, the finished flag and request-local values.
///
/// A scope belongs to exactly one [`Context`](./struct.Context.html) and is dropped with it, so it
/// is released on every exit path of a request.
#[derive(Debug)]
pub struct RequestScope {
    id: RequestId,
    params: RouteParams,
    finished: bool,
    values: HashMap<String, Value>,
}

impl RequestScope {
    pub(crate) fn new(id: RequestId) -> RequestScope {
        RequestScope {
            id,
            params: RouteParams::new(),
            finished: false,
            values: HashMap::new(),
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub(crate) fn capture(&mut self, params: RouteParams) {
        self.params.extend(params);
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Marks the request finished. Returns `false` if it already was.
    pub(crate) fn finish(&mut self) -> bool {
        !std::mem::replace(&mut self.finished, true)
    }

    pub(crate) fn insert_value(&mut self, key: String, value: Value) {
        self.values.insert(key, value);
    }

    pub(crate) fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        tracing::trace!(request_id = %self.id, "request scope released");
    }
}

/// Holds the request information captured before dispatch, e.g. method, uri and headers.
///
/// It is handed to error handlers registered with
/// [`err_handler_with_info`](./struct.AppBuilder.html#method.err_handler_with_info), because the
/// request context itself is consumed by the failing chain.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    id: RequestId,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    remote_addr: SocketAddr,
}

impl RequestInfo {
    pub(crate) fn new_from_parts(id: RequestId, parts: &Parts, remote_addr: SocketAddr) -> RequestInfo {
        RequestInfo {
            id,
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            remote_addr,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }
}

/// The JSON envelope handlers answer with: `{"status": bool, "message": "...", ...extra}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub status: bool,
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new<M: Into<String>>(status: bool, message: M) -> Message {
        Message {
            status,
            message: message.into(),
            extra: Map::new(),
        }
    }

    /// Adds an extra top level field to the message.
    pub fn with<K: Into<String>, V: Serialize>(mut self, key: K, value: V) -> crate::Result<Message> {
        self.extra.insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }
}
