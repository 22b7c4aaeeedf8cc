//! HTTP transport contracts used to reach the chayns backend.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::de::DeserializeOwned;

/// Object-safe boxed future used by [`HttpClient`].
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Status code the backend uses as its "nothing here" sentinel.
pub const STATUS_NO_CONTENT: u16 = 204;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Buffered HTTP response returned by an [`HttpClient`].
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Builds a response from a status code and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Builds an empty `204 No Content` response.
    pub fn no_content() -> Self {
        Self::new(STATUS_NO_CONTENT, "")
    }

    /// Returns whether the status is in the `2xx` range.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Returns whether the backend answered with its no-content sentinel.
    pub fn is_no_content(&self) -> bool {
        self.status == STATUS_NO_CONTENT
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_str(&self.body).map_err(|e| e.to_string())
    }
}

/// Host service performing HTTP requests.
pub trait HttpClient {
    /// Issues a `GET` request and buffers the response.
    ///
    /// Non-2xx statuses are returned as responses; only transport failures are errors.
    fn get<'a>(&'a self, url: &'a str) -> HttpFuture<'a, Result<HttpResponse, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// HTTP client for targets without a network transport.
pub struct NoopHttpClient;

impl HttpClient for NoopHttpClient {
    fn get<'a>(&'a self, url: &'a str) -> HttpFuture<'a, Result<HttpResponse, String>> {
        Box::pin(async move { Err(format!("no http transport available for {url}")) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory HTTP client answering from a fixed route table.
///
/// Every request is recorded; unknown URLs fail like a transport error.
pub struct MemoryHttpClient {
    routes: Rc<RefCell<HashMap<String, Result<HttpResponse, String>>>>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl MemoryHttpClient {
    /// Registers the response returned for `url`.
    pub fn respond(&self, url: impl Into<String>, response: HttpResponse) -> &Self {
        self.routes.borrow_mut().insert(url.into(), Ok(response));
        self
    }

    /// Registers a transport failure for `url`.
    pub fn fail(&self, url: impl Into<String>, reason: impl Into<String>) -> &Self {
        self.routes
            .borrow_mut()
            .insert(url.into(), Err(reason.into()));
        self
    }

    /// Returns the URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl HttpClient for MemoryHttpClient {
    fn get<'a>(&'a self, url: &'a str) -> HttpFuture<'a, Result<HttpResponse, String>> {
        Box::pin(async move {
            self.requests.borrow_mut().push(url.to_string());
            self.routes
                .borrow()
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(format!("connection refused: {url}")))
        })
    }
}
