use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::lsp::document::{DocumentKind, DocumentState};
use crate::lsp::handlers::HandleDiagnostics;
use crate::validation::TaskdownValidator;
use crate::Config;

/// The main LSP backend that holds state and implements the Language Server Protocol
pub struct Backend {
    pub client: Client,
    pub validator: Arc<TaskdownValidator>,
    pub documents: Arc<Mutex<HashMap<Url, DocumentState>>>,
    pub config: Config,
}

impl Backend {
    pub fn new(client: Client, config: Config) -> Self {
        let validator = TaskdownValidator::new(config.validation_options());
        Self::with_validator(client, config, validator)
    }

    /// Serve diagnostics from a pre-built validator, e.g. one carrying custom rules
    pub fn with_validator(client: Client, config: Config, validator: TaskdownValidator) -> Self {
        Self {
            client,
            validator: Arc::new(validator),
            documents: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(
        &self,
        _: InitializeParams,
    ) -> tower_lsp::jsonrpc::Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "taskdown-ls".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "taskdown-ls initialized")
            .await;
    }

    async fn shutdown(&self) -> tower_lsp::jsonrpc::Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let kind = DocumentKind::detect(&doc.uri, &doc.language_id);

        let mut docs = self.documents.lock().await;
        docs.insert(
            doc.uri.clone(),
            DocumentState {
                content: doc.text,
                version: doc.version,
                kind,
            },
        );
        drop(docs); // Release the lock before calling publish_diagnostics

        self.publish_diagnostics(doc.uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };

        let mut docs = self.documents.lock().await;
        match docs.get_mut(&uri) {
            Some(state) => {
                state.content = change.text;
                state.version = params.text_document.version;
            }
            None => {
                let kind = DocumentKind::detect(&uri, "");
                docs.insert(
                    uri.clone(),
                    DocumentState {
                        content: change.text,
                        version: params.text_document.version,
                        kind,
                    },
                );
            }
        }
        drop(docs);

        self.publish_diagnostics(uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.lock().await.remove(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }
}
