use taskbell::commands::Cli;
use taskbell::libs::messages::macros::is_debug_mode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("taskbell=debug")),
            )
            .with_target(false)
            .init();
    }

    Cli::menu().await
}
