use crate::data_map::DataMap;
use crate::types::{RequestId, RequestInfo, RequestScope, RouteParams};
use crate::Error;
use bytes::{Bytes, BytesMut};
use http_body_util::Full;
use hyper::header::{self, HeaderName, HeaderValue};
use hyper::http::request::Parts;
use hyper::{HeaderMap, Method, Response, StatusCode, Uri};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// The value threaded through every middleware and route handler of one request.
///
/// A `Context` owns the request, the response under construction and the
/// [`RequestScope`](./struct.RequestScope.html) of that request. Handlers take it by value and
/// hand it back when they succeed:
///
/// ```
/// use routerify_express::Context;
/// use std::convert::Infallible;
///
/// async fn user_handler(mut ctx: Context) -> Result<Context, Infallible> {
///     let greeting = format!("Hello {}", ctx.param("userId").unwrap_or("stranger"));
///     ctx.text(greeting);
///     Ok(ctx)
/// }
/// ```
///
/// The response helpers [`json`](#method.json), [`bytes`](#method.bytes), [`text`](#method.text)
/// and [`send_file`](#method.send_file) mark the request finished, so no later middleware or
/// handler runs. [`write`](#method.write) only appends to the body.
#[derive(Debug)]
pub struct Context {
    parts: Parts,
    path: String,
    body: Bytes,
    remote_addr: SocketAddr,
    scope: RequestScope,
    data: Arc<DataMap>,
    status: StatusCode,
    headers: HeaderMap,
    res_body: BytesMut,
}

impl Context {
    pub(crate) fn new(
        id: RequestId,
        parts: Parts,
        path: String,
        body: Bytes,
        remote_addr: SocketAddr,
        data: Arc<DataMap>,
    ) -> Context {
        Context {
            parts,
            path,
            body,
            remote_addr,
            scope: RequestScope::new(id),
            data,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            res_body: BytesMut::new(),
        }
    }

    pub fn id(&self) -> RequestId {
        self.scope.id()
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// The percent decoded request path the routers match against.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// The full request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Decodes the request body as JSON.
    pub fn parse_json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    pub fn scope(&self) -> &RequestScope {
        &self.scope
    }

    pub(crate) fn scope_mut(&mut self) -> &mut RequestScope {
        &mut self.scope
    }

    /// Returns a route parameter captured for this request.
    pub fn param<P: AsRef<str>>(&self, name: P) -> Option<&str> {
        self.scope.params().get(name).map(String::as_str)
    }

    pub fn params(&self) -> &RouteParams {
        self.scope.params()
    }

    /// Returns the application data of type `T` registered with
    /// [`AppBuilder::data`](./struct.AppBuilder.html#method.data).
    pub fn data<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.data.get::<T>()
    }

    pub fn is_finished(&self) -> bool {
        self.scope.is_finished()
    }

    /// Marks the request finished without producing a body. Use it after writing the response
    /// directly so that no further handlers run.
    pub fn finish(&mut self) {
        if self.scope.finish() {
            tracing::trace!(request_id = %self.id(), "request finished");
        }
    }

    /// Stores a request-local value, readable by every later middleware and handler.
    pub fn set_value<K: Into<String>, V: Serialize>(&mut self, key: K, value: V) -> crate::Result<()> {
        let value = serde_json::to_value(value)?;
        self.scope.insert_value(key.into(), value);
        Ok(())
    }

    /// Reads a request-local value back into `T`. Returns `None` if it's missing or of another shape.
    pub fn value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.scope
            .value(key)
            .and_then(|val| serde_json::from_value(val.clone()).ok())
    }

    /// Returns a request-local value encoded as JSON.
    pub fn value_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.scope.value(key).and_then(|val| serde_json::to_vec(val).ok())
    }

    /// Returns a request-local value encoded as a JSON string.
    pub fn value_string(&self, key: &str) -> Option<String> {
        self.scope.value(key).map(|val| val.to_string())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Appends to the response body. Doesn't finish the request.
    pub fn write<B: AsRef<[u8]>>(&mut self, chunk: B) {
        self.res_body.extend_from_slice(chunk.as_ref());
    }

    /// Serializes `value` as the response body with a JSON content type and finishes the request.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> crate::Result<()> {
        self.finish();
        let encoded = serde_json::to_vec(value)?;
        self.set_header(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        self.write(encoded);
        Ok(())
    }

    /// Appends raw bytes to the response body and finishes the request. The content type is left as is.
    pub fn bytes<B: AsRef<[u8]>>(&mut self, chunk: B) {
        self.finish();
        self.write(chunk);
    }

    /// Appends a line of text to the response body and finishes the request.
    pub fn text<S: AsRef<str>>(&mut self, line: S) {
        self.finish();
        if !self.headers.contains_key(header::CONTENT_TYPE) {
            self.set_header(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_TEXT));
        }
        self.write(line.as_ref());
        self.write("\n");
    }

    /// Sends a file with the given content type and finishes the request.
    pub async fn send_file<P: AsRef<Path>>(&mut self, path: P, content_type: HeaderValue) -> crate::Result<()> {
        self.finish();
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await.map_err(|source| Error::File {
            path: path.to_path_buf(),
            source,
        })?;
        self.set_header(header::CONTENT_TYPE, content_type);
        self.write(contents);
        Ok(())
    }

    pub(crate) fn request_info(&self) -> RequestInfo {
        RequestInfo::new_from_parts(self.id(), &self.parts, self.remote_addr)
    }

    /// Converts the context into the final response. The request scope is released here.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut res = Response::new(Full::new(self.res_body.freeze()));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}


#[cfg(test)]
mod tests {
    use super::test_util::context;
    use super::*;
    use http_body_util::BodyExt;

    async fn into_text(res: Response<Full<Bytes>>) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn should_finish_on_json() {
        let mut ctx = context(Method::GET, "/");
        ctx.json(&serde_json::json!({"lol": 32})).unwrap();
        assert!(ctx.is_finished());

        let res = ctx.into_response();
        assert_eq!(res.headers()[header::CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(into_text(res).await, r#"{"lol":32}"#);
    }

    #[tokio::test]
    async fn should_append_written_chunks() {
        let mut ctx = context(Method::GET, "/");
        ctx.set_status(StatusCode::CREATED);
        ctx.write("____yes____");
        ctx.write("42");
        assert!(!ctx.is_finished());

        let res = ctx.into_response();
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(into_text(res).await, "____yes____42");
    }

    #[tokio::test]
    async fn should_end_text_with_a_newline() {
        let mut ctx = context(Method::GET, "/");
        ctx.text("yex");
        assert!(ctx.is_finished());
        assert_eq!(into_text(ctx.into_response()).await, "yex\n");
    }

    #[test]
    fn should_round_trip_request_values() {
        let mut ctx = context(Method::GET, "/");
        ctx.set_value("wow", "nice").unwrap();
        ctx.set_value("count", 3_u32).unwrap();

        assert_eq!(ctx.value::<String>("wow").as_deref(), Some("nice"));
        assert_eq!(ctx.value::<u32>("count"), Some(3));
        assert_eq!(ctx.value::<u32>("wow"), None);
        assert_eq!(ctx.value_bytes("wow"), Some(br#""nice""#.to_vec()));
        assert_eq!(ctx.value_string("missing"), None);
    }

    #[tokio::test]
    async fn should_fail_on_missing_file() {
        let mut ctx = context(Method::GET, "/");
        let err = ctx
            .send_file("/definitely/not/here.txt", HeaderValue::from_static("text/plain"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::File { .. }));
    }
}
