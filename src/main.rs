use anyhow::Result;
use seosuggest::{cli::parse_args, run_seosuggest};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let config = parse_args()?;
    run_seosuggest(config).await
}
