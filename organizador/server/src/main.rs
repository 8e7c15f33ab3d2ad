#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = organizador_server::config::Config::from_env()?;
    organizador_server::web::start_web_server(config).await
}
