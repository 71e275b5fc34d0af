//! The login and sign flows.
//!
//! Both follow the same choreography: fetch a page through the session,
//! scrape the fresh CSRF token out of it, pause briefly, then submit the
//! state-changing request with the token in its header. The server tracks
//! login state purely through cookies, which the session accumulates.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::{Credentials, FlowConfig};
use crate::error::CheckinError;
use crate::session::Session;
use crate::token::{CSRF_HEADER, extract_csrf};

/// Server verdict for a sign request. `code` 0 means the check-in counted;
/// anything else carries a human-readable refusal in `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignResult {
    pub code: i64,
    pub message: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Log in through the shared session, leaving its cookie store authenticated.
///
/// Returns the CSRF token scraped from the login page.
pub async fn perform_login(
    session: &mut Session,
    credentials: &Credentials,
    config: &FlowConfig,
) -> Result<String, CheckinError> {
    let login_url = config.url_for("auth/login");
    let page = session.fetch_page(&login_url).await?;
    let csrf = extract_csrf(&page)?;

    sleep(config.fetch_pace).await;

    let form = [
        ("identification", credentials.handle.as_str()),
        ("keep", "false"),
        ("password", credentials.password.as_str()),
    ];
    let response = session
        .post(&login_url)
        .header(CSRF_HEADER, &csrf)
        .form(&form)
        .send()
        .await?;
    session.store_cookies(response.headers());
    response.error_for_status()?;

    debug!("login accepted");
    Ok(csrf)
}

/// Submit the daily sign action. Requires a session already authenticated by
/// [`perform_login`]; the user page hands out a fresh CSRF token for it.
pub async fn perform_sign(
    session: &mut Session,
    config: &FlowConfig,
) -> Result<SignResult, CheckinError> {
    let page = session.fetch_page(&config.url_for("user")).await?;
    let csrf = extract_csrf(&page)?;

    sleep(config.fetch_pace).await;

    let response = session
        .post(&config.url_for("user/sign"))
        .header(CSRF_HEADER, &csrf)
        .send()
        .await?;
    session.store_cookies(response.headers());
    let response = response.error_for_status()?;

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Run one full login-and-sign attempt on a fresh session.
///
/// A nonzero result code is surfaced as [`CheckinError::Rejected`] carrying
/// the server's message, so the retry orchestrator treats it like any other
/// transient failure.
pub async fn run_task(
    client: &Client,
    credentials: &Credentials,
    headers: &reqwest::header::HeaderMap,
    config: &FlowConfig,
) -> Result<SignResult, CheckinError> {
    let mut session = Session::new(client.clone(), headers.clone());

    perform_login(&mut session, credentials, config).await?;
    sleep(config.flow_pace).await;

    let result = perform_sign(&mut session, config).await?;
    info!(code = result.code, message = %result.message, "sign response");

    if result.code != 0 {
        return Err(CheckinError::Rejected {
            code: result.code,
            message: result.message,
        });
    }
    Ok(result)
}
