use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use std::time::{Duration, Instant};
use tiny_http::{Header, Response, Server};
use url::Url;

/// How long the return listener waits for the browser.
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectStatus {
    Loading,
    Success,
    Error,
}

impl RedirectStatus {
    /// Time the return page stays up before going back to the landing page.
    pub fn linger(self) -> Option<Duration> {
        match self {
            RedirectStatus::Loading => None,
            RedirectStatus::Success => Some(Duration::from_secs(2)),
            RedirectStatus::Error => Some(Duration::from_secs(3)),
        }
    }
}

/// Classifies a request target such as `/redirect?error=access_denied`.
/// Returns `None` for paths that are not an OAuth return.
pub fn status_from_target(target: &str) -> Option<RedirectStatus> {
    let parsed = Url::parse("http://localhost").ok()?.join(target).ok()?;
    if !matches!(parsed.path(), "/redirect" | "/") {
        return None;
    }
    let failed = parsed
        .query_pairs()
        .any(|(k, v)| k == "error" && !v.is_empty());
    Some(if failed {
        RedirectStatus::Error
    } else {
        RedirectStatus::Success
    })
}

/// Sends the user's browser to the backend consent route.
pub fn open_authorize(authorize_url: &str) {
    info!("Opening {authorize_url}");
    // best-effort: the URL is also shown on screen
    if let Err(e) = open::that(authorize_url) {
        warn!("could not open browser automatically: {e}");
    }
}

/// Serves the OAuth return page on `addr` until the browser lands on it.
pub fn wait_for_redirect(addr: &str, timeout: Duration) -> Result<RedirectStatus> {
    let server = Server::http(addr)
        .map_err(|e| anyhow!("Failed to bind OAuth return listener on {addr}: {e:?}"))?;

    let wait_until = Instant::now() + timeout;

    while Instant::now() < wait_until {
        let Ok(maybe_request) = server.recv_timeout(Duration::from_millis(500)) else {
            continue;
        };
        let Some(request) = maybe_request else {
            continue;
        };

        debug!("return listener got {}", request.url());
        let Some(status) = status_from_target(request.url()) else {
            let _ = request.respond(Response::from_string("Not found").with_status_code(404));
            continue;
        };

        let body = match status {
            RedirectStatus::Error => {
                "<h2>Authentication Failed</h2><p>There was an error connecting your Gmail account. You can close this tab.</p>"
            }
            _ => {
                "<h2>Authentication Successful</h2><p>You've successfully connected your Gmail account. You can close this tab.</p>"
            }
        };
        let mut response = Response::from_string(body);
        if let Ok(h) = Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..]) {
            response = response.with_header(h);
        }
        let _ = request.respond(response);
        return Ok(status);
    }

    Err(anyhow!("No OAuth return received within timeout"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_param_means_failure() {
        assert_eq!(
            status_from_target("/redirect?error=access_denied"),
            Some(RedirectStatus::Error)
        );
        assert_eq!(
            status_from_target("/redirect"),
            Some(RedirectStatus::Success)
        );
        assert_eq!(
            status_from_target("/redirect?error="),
            Some(RedirectStatus::Success)
        );
        assert_eq!(status_from_target("/"), Some(RedirectStatus::Success));
        assert_eq!(status_from_target("/favicon.ico"), None);
    }

    #[test]
    fn error_lingers_longer() {
        assert_eq!(RedirectStatus::Success.linger(), Some(Duration::from_secs(2)));
        assert_eq!(RedirectStatus::Error.linger(), Some(Duration::from_secs(3)));
        assert_eq!(RedirectStatus::Loading.linger(), None);
    }
}
