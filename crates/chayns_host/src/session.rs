//! Access-token session store contracts and in-memory adapters.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

/// Key under which the host persists the Tobit access token.
pub const ACCESS_TOKEN_KEY: &str = "TobitAccessToken";

/// Object-safe boxed future used by [`SessionStore`] async methods.
pub type SessionStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service holding the current user's access token for the page session.
pub trait SessionStore {
    /// Loads the current access token, `None` when no user is signed in.
    fn access_token(&self) -> SessionStoreFuture<'_, Result<Option<String>, String>>;

    /// Replaces the current access token.
    fn set_access_token<'a>(&'a self, token: &'a str) -> SessionStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op session store for unsupported targets.
pub struct NoopSessionStore;

impl SessionStore for NoopSessionStore {
    fn access_token(&self) -> SessionStoreFuture<'_, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn set_access_token<'a>(&'a self, _token: &'a str) -> SessionStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Default)]
struct MemorySessionInner {
    token: Option<String>,
    failure: Option<String>,
}

#[derive(Debug, Clone, Default)]
/// In-memory session store.
///
/// A store built with [`MemorySessionStore::unavailable`] fails every call, which mirrors a host
/// whose storage backend is blocked.
pub struct MemorySessionStore {
    inner: Rc<RefCell<MemorySessionInner>>,
}

impl MemorySessionStore {
    /// Creates a store pre-populated with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().token = Some(token.into());
        store
    }

    /// Creates a store whose reads and writes fail with `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().failure = Some(reason.into());
        store
    }

    /// Returns the stored token without going through the async contract.
    pub fn current_token(&self) -> Option<String> {
        self.inner.borrow().token.clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn access_token(&self) -> SessionStoreFuture<'_, Result<Option<String>, String>> {
        Box::pin(async move {
            let inner = self.inner.borrow();
            match &inner.failure {
                Some(reason) => Err(reason.clone()),
                None => Ok(inner.token.clone()),
            }
        })
    }

    fn set_access_token<'a>(&'a self, token: &'a str) -> SessionStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            if let Some(reason) = &inner.failure {
                return Err(reason.clone());
            }
            inner.token = Some(token.to_string());
            Ok(())
        })
    }
}
