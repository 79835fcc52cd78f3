use ferrous_ptr_application::use_cases::ReloadPolicyUseCase;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

/// SIGHUP re-reads the config file and swaps the policy table in place.
/// A broken file is logged and the running table stays in force.
pub fn spawn_reload_listener(reload: Arc<ReloadPolicyUseCase>) -> anyhow::Result<()> {
    let mut hangup = signal(SignalKind::hangup())?;

    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("SIGHUP received, reloading policy");
            let reload = reload.clone();
            match tokio::task::spawn_blocking(move || reload.execute()).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => error!(error = %e, "Policy reload failed, keeping current table"),
                Err(e) => error!(error = %e, "Policy reload task panicked"),
            }
        }
    });

    Ok(())
}
