use jm_shell::bootstrap::resolve_default_app_paths;
use jm_shell::bootstrap::tracing::init_tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = jm_shell::load_config_from_env()?;
    let paths = resolve_default_app_paths(&config)?;
    init_tracing_subscriber(&paths)?;

    tracing::info!(
        session_file = %paths.session_file.display(),
        signed_in = !config.signed_in_identity.is_empty(),
        "jobmarket shell starting"
    );

    jm_shell::run_app(config, paths).await
}
