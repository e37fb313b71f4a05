use std::time::Duration;

use anyhow::Context;
use untis_config::UntisConfig;
use untis_rpc::{CallContext, CancelToken, ClientRegistry, SharedSession};

use crate::cli::GlobalFlags;

/// Load `.env` and layered config, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<UntisConfig> {
    let mut config =
        UntisConfig::load_with_dotenv().context("failed to load untis configuration")?;
    if let Some(user) = &flags.user {
        config.credentials.username.clone_from(user);
    }
    Ok(config)
}

/// Call context cancelled by Ctrl-C.
pub fn interruptible_context() -> CallContext {
    let token = CancelToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling in-flight call");
            on_interrupt.cancel();
        }
    });
    CallContext::background().with_cancel(token)
}

/// Register a session for the configured user and authenticate it.
pub async fn connect(config: &UntisConfig, ctx: &CallContext) -> anyhow::Result<SharedSession> {
    let credentials = config.require_credentials()?;

    let registry = ClientRegistry::init_global(ClientRegistry::from_config(config))
        .unwrap_or_else(|_| ClientRegistry::global());
    let handle = registry
        .create(&credentials.username, &credentials.password)
        .await?;

    handle
        .lock()
        .await
        .authenticate(ctx)
        .await
        .with_context(|| format!("login failed for '{}'", credentials.username))?;
    Ok(handle)
}

/// Log out and drop the session from the registry. Failures are logged only.
///
/// Logout runs under its own bounded context so an interrupted command still
/// ends the server-side session.
pub async fn disconnect(handle: &SharedSession, config: &UntisConfig) {
    let ctx = CallContext::background()
        .with_timeout(Duration::from_secs(config.service.request_timeout_secs));
    let mut session = handle.lock().await;
    let username = session.username().to_owned();
    if session.is_authenticated() {
        if let Err(error) = session.close(&ctx).await {
            tracing::warn!(%username, %error, "logout failed");
        }
    }
    drop(session);
    ClientRegistry::global().remove(&username).await;
}
