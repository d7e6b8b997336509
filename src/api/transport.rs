//! HTTP transport seam for the API client.
//!
//! The client never touches `web_sys` directly; it talks to an
//! [`HttpTransport`]. The browser implementation wraps `fetch`, the native
//! build gets a stub (requests only happen in the browser), and tests drive
//! the client with a scripted fake.

use async_trait::async_trait;

/// A prepared request. Bodies are JSON already serialized by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: &'static str, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response. Status and body text are enough for the error taxonomy;
/// the client decodes JSON itself.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport capability. Errors are transport-level only (no response at
/// all); HTTP error statuses come back as a normal [`HttpResponse`].
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String>;
}

/// Browser transport over `fetch`.
#[cfg(target_arch = "wasm32")]
pub struct FetchTransport;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Headers, Request, RequestInit, Response};

        let window = web_sys::window().ok_or("No window")?;

        let headers = Headers::new().map_err(|e| format!("{:?}", e))?;
        for (name, value) in &req.headers {
            headers.set(name, value).map_err(|e| format!("{:?}", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method);
        opts.set_headers(&headers);
        if let Some(body) = &req.body {
            opts.set_body(&wasm_bindgen::JsValue::from_str(body));
        }

        let request =
            Request::new_with_str_and_init(&req.url, &opts).map_err(|e| format!("{:?}", e))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| format!("{:?}", e))?;

        let resp: Response = resp_value.dyn_into().map_err(|_| "Not a Response")?;
        let status = resp.status();

        let text = JsFuture::from(resp.text().map_err(|e| format!("{:?}", e))?)
            .await
            .map_err(|e| format!("{:?}", e))?;

        Ok(HttpResponse {
            status,
            body: text.as_string().unwrap_or_default(),
        })
    }
}

/// SSR stub - requests only happen in the browser.
#[cfg(not(target_arch = "wasm32"))]
pub struct FetchTransport;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, _req: HttpRequest) -> Result<HttpResponse, String> {
        Err("fetch is only available in browser".to_string())
    }
}
