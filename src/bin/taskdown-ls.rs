use anyhow::Result;
use taskdown_validator::lsp::server::serve;

#[tokio::main]
async fn main() -> Result<()> {
    serve().await
}
