//! Cookie-bearing HTTP session for one check-in run.
//!
//! The session clones its static headers for every request so callers can
//! layer per-request headers (like the CSRF token) without mutating the
//! shared set, and folds `Set-Cookie` headers from every response back into
//! its store so the login state carries over to the sign request.

use reqwest::header::{COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use reqwest::{Client, Method, RequestBuilder};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::CheckinError;

pub struct Session {
    client: Client,
    headers: HeaderMap,
    cookies: FxHashMap<String, String>,
}

impl Session {
    pub fn new(client: Client, headers: HeaderMap) -> Self {
        Self {
            client,
            headers,
            cookies: FxHashMap::default(),
        }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    /// Create a request with the static headers plus the accumulated cookies.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut headers = self.headers.clone();

        if let Some(cookie_header) = self.cookie_header() {
            match HeaderValue::from_str(&cookie_header) {
                Ok(value) => {
                    headers.insert(COOKIE, value);
                }
                Err(e) => {
                    // A malformed cookie value must not poison the request.
                    debug!(error = %e, "Failed to build Cookie header; skipping");
                }
            }
        }

        self.client.request(method, url).headers(headers)
    }

    /// GET a page, record its cookies, and return the body text.
    /// Non-success statuses surface as errors.
    pub async fn fetch_page(&mut self, url: &str) -> Result<String, CheckinError> {
        let response = self.get(url).send().await?;
        self.store_cookies(response.headers());
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Fold `Set-Cookie` response headers into the cookie store.
    pub fn store_cookies(&mut self, headers: &HeaderMap) {
        for value in headers.get_all(SET_COOKIE) {
            if let Ok(cookie_str) = value.to_str()
                && let Some(cookie_part) = cookie_str.split(';').next()
                && let Some((name, value)) = cookie_part.split_once('=')
            {
                let name = name.trim();
                let value = value.trim();
                if name.is_empty() || value.is_empty() {
                    continue;
                }
                debug!("Storing cookie: {}={}", name, value);
                self.cookies.insert(name.to_owned(), value.to_owned());
            }
        }
    }

    pub fn cookie(&self, name: &str) -> Option<&String> {
        self.cookies.get(name)
    }

    fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        let mut cookie_string = String::with_capacity(
            self.cookies
                .iter()
                .map(|(k, v)| k.len() + 1 + v.len() + 2)
                .sum(),
        );

        for (name, value) in &self.cookies {
            if !cookie_string.is_empty() {
                cookie_string.push_str("; ");
            }
            cookie_string.push_str(name);
            cookie_string.push('=');
            cookie_string.push_str(value);
        }

        Some(cookie_string)
    }
}
