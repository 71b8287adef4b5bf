//! Attachment to an already-running browser's DevTools endpoint.

use serde::Deserialize;

use crate::error::BrowserError;

#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(rename = "webSocketDebuggerUrl")]
    web_socket_debugger_url: Option<String>,
}

/// Resolves the browser-level WebSocket URL for `endpoint`.
///
/// `ws://` and `wss://` endpoints are returned unchanged; an HTTP endpoint is
/// asked for `/json/version`.
///
/// # Errors
///
/// Returns [`BrowserError::RemoteEndpoint`] when the request fails or the
/// response is not JSON, and [`BrowserError::MissingDebuggerUrl`] when the
/// response carries no usable URL.
pub async fn resolve_websocket_url(
    client: &reqwest::Client,
    endpoint: &str,
) -> Result<String, BrowserError> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
        return Ok(endpoint.to_string());
    }

    let url = format!("{endpoint}/json/version");
    let remote_err = |source: reqwest::Error| BrowserError::RemoteEndpoint {
        endpoint: endpoint.to_string(),
        source,
    };
    let info: VersionInfo = client
        .get(&url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(remote_err)?
        .json()
        .await
        .map_err(remote_err)?;

    let ws_url = info
        .web_socket_debugger_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| BrowserError::MissingDebuggerUrl {
            endpoint: endpoint.to_string(),
        })?;
    tracing::info!(endpoint, ws_url = %ws_url, "resolved DevTools endpoint");
    Ok(ws_url)
}
