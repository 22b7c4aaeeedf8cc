//! `fetch`-backed HTTP client.

use chayns_host::{HttpClient, HttpFuture, HttpResponse};

#[derive(Debug, Clone, Copy, Default)]
/// HTTP client issuing browser `fetch` requests through `gloo-net`.
pub struct WebHttpClient;

impl HttpClient for WebHttpClient {
    fn get<'a>(&'a self, url: &'a str) -> HttpFuture<'a, Result<HttpResponse, String>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                use gloo_net::http::Request;

                let response = Request::get(url)
                    .send()
                    .await
                    .map_err(|e| format!("request to {url} failed: {e}"))?;
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .map_err(|e| format!("reading response from {url} failed: {e}"))?;
                return Ok(HttpResponse::new(status, body));
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                Err(format!("fetch is unavailable outside the browser: {url}"))
            }
        })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn native_build_reports_transport_error() {
        let err = block_on(WebHttpClient.get("https://chaynssvc.tobit.com/v0.5/1/LocationSettings"))
            .expect_err("no fetch on native targets");
        assert!(err.contains("LocationSettings"));
    }
}
