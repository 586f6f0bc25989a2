use std::net::SocketAddr;

// Entry point for `cargo run -p web-server`: serves with the configured
// address. The `simlab` binary offers the same plus the admin commands.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let _guard = configuration::init_tracing(&config.logging)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    web_server::run_server(config, addr).await
}
