mod config;
mod error;
mod handler;
mod server;
#[cfg(test)]
mod test_log;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let config = config::Config::from_env()?;
    server::run(config).await?;
    Ok(())
}
