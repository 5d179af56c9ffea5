use anyhow::Result;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::lsp::backend::Backend;
use crate::config::{init_logging, Config};

/// Start the LSP server on stdio
pub async fn serve() -> Result<()> {
    let config = Config::from_args_and_env()?;
    init_logging(&config.log_level);
    log::info!("Starting taskdown-ls (strict: {})", config.strict);

    let (service, socket) = LspService::build(move |client| Backend::new(client, config.clone()))
        .finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}
