use anyhow::{Result, anyhow};
use keyring::{Entry, Error as KeyringError};

const SERVICE: &str = "mailsync";

fn entry(api_url: &str) -> Result<Entry> {
    Entry::new(SERVICE, &format!("session_cookie:{api_url}")).map_err(|e| anyhow!(e.to_string()))
}

/// Save the backend session cookie (`name=value`) for the given API URL
pub fn save_session_cookie(api_url: &str, cookie: &str) -> Result<()> {
    entry(api_url)?
        .set_password(cookie)
        .map_err(|e| anyhow!(e.to_string()))?;
    Ok(())
}

/// Load the session cookie for the given API URL, if one was saved
pub fn load_session_cookie(api_url: &str) -> Result<Option<String>> {
    match entry(api_url)?.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(e) => Err(anyhow!(e.to_string())),
    }
}

/// Forget the session cookie; missing entries are fine
pub fn clear_session_cookie(api_url: &str) -> Result<()> {
    match entry(api_url)?.delete_credential() {
        Ok(()) | Err(KeyringError::NoEntry) => Ok(()),
        Err(e) => Err(anyhow!(e.to_string())),
    }
}
