use std::sync::Arc;

use log::debug;
use reqwest::Method;
use reqwest::blocking::{Client, Response};
use reqwest::cookie::Jar;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::StatsBackend;
use crate::api::error::ApiError;
use crate::domain::stats::{SyncStats, TopSender};

const MAX_REDIRECTS: usize = 10;

/// Blocking client for the analytics backend.
///
/// Cookies set by the backend are kept in an in-memory jar, which can be
/// seeded with a session cookie copied out of the browser.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct RawSync {
    processed: u64,
    inserted: u64,
    elapsed_s: f64,
}

#[derive(Deserialize)]
struct RawProfile {
    email: String,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    sender: &'a str,
}

#[derive(Deserialize)]
struct RawDeleted {
    deleted: u64,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        session_cookie: Option<&str>,
        accept_invalid_certs: bool,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)?;

        let jar = Arc::new(Jar::default());
        if let Some(cookie) = session_cookie {
            jar.add_cookie_str(cookie, &parsed);
        }

        let http = Client::builder()
            .cookie_provider(jar)
            .redirect(redirect_policy())
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self { http, base_url })
    }

    fn execute<B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{method} {url}");

        let mut req = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().map_err(ApiError::Transport)?;

        if redirects_to_authorize(&resp) {
            debug!("{endpoint}: redirected to /authorize");
            return Err(ApiError::NotConnected);
        }
        Ok(resp)
    }

    fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let resp = ensure_success(self.execute::<()>(Method::GET, endpoint, None)?)?;
        resp.json::<T>().map_err(ApiError::Decode)
    }
}

impl StatsBackend for ApiClient {
    fn sync(&self) -> Result<SyncStats, ApiError> {
        let raw: RawSync = self.fetch("/sync")?;
        Ok(SyncStats {
            processed: raw.processed,
            inserted: raw.inserted,
            time_elapsed: raw.elapsed_s,
        })
    }

    fn top_senders(&self) -> Result<Vec<TopSender>, ApiError> {
        let rows: Vec<(String, u64)> = self.fetch("/top_senders")?;
        Ok(rows
            .into_iter()
            .map(|(email, count)| TopSender { email, count })
            .collect())
    }

    fn profile(&self) -> Result<String, ApiError> {
        let raw: RawProfile = self.fetch("/profile")?;
        Ok(raw.email)
    }

    fn delete_sender(&self, sender: &str) -> Result<u64, ApiError> {
        let resp = self.execute(
            Method::POST,
            "/delete_sender",
            Some(&DeleteRequest { sender }),
        )?;
        let raw: RawDeleted = ensure_success(resp)?.json().map_err(ApiError::Decode)?;
        Ok(raw.deleted)
    }

    fn disconnect(&self) -> Result<(), ApiError> {
        let resp = self.execute::<()>(Method::GET, "/disconnect", None)?;
        // the backend answers with a bounce back to the web frontend
        if resp.status().is_redirection() {
            return Ok(());
        }
        ensure_success(resp).map(|_| ())
    }

    fn authorize_url(&self) -> String {
        format!("{}/authorize", self.base_url)
    }
}

/// Follows ordinary redirects but stops at the consent route and after
/// `/disconnect`, whose target is the web frontend rather than the API.
fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        let from_disconnect = attempt
            .previous()
            .last()
            .is_some_and(|u| u.path().ends_with("/disconnect"));
        if attempt.url().path().contains("/authorize") || from_disconnect {
            attempt.stop()
        } else if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

fn redirects_to_authorize(resp: &Response) -> bool {
    if resp.url().path().contains("/authorize") {
        return true;
    }
    resp.status().is_redirection()
        && resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|loc| loc.contains("/authorize"))
}

fn ensure_success(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }
    Ok(resp)
}
