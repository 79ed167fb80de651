//! Post-deploy build hook.

use std::time::Duration;

use tracing::{info, warn};

const HOOK_TIMEOUT: Duration = Duration::from_secs(15);

/// Fire a POST at a hosting provider's build hook.
///
/// Best effort: failures are logged and reported as `false`, never as an
/// error, so a flaky hook cannot fail a deploy that already succeeded.
pub async fn trigger_build_hook(client: &reqwest::Client, url: &str) -> bool {
    match client.post(url).timeout(HOOK_TIMEOUT).send().await {
        Ok(resp) if resp.status().is_success() => {
            info!(status = %resp.status(), "build hook triggered");
            true
        }
        Ok(resp) => {
            warn!(status = %resp.status(), "build hook rejected the request");
            false
        }
        Err(e) => {
            warn!(error = %e, "build hook request failed");
            false
        }
    }
}
