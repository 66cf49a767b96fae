use anyhow::Result;
use reviewer_core::config::Config;

pub fn run(mut config: Config, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.http.port = port;
    }
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(reviewer_server::serve(config))
}
