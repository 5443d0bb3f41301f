use std::sync::{Arc, Mutex};

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::application::{KeywordExportUseCase, KeywordExtractionUseCase, SeoChatUseCase};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::{LLMClient, OpenAIClient};
use crate::infrastructure::storage::resolve_upload_dir;
use crate::interfaces::http::{add_log, start_server, HttpState, LogEntry};

pub async fn run() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = AppConfig::load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    let upload_dir = resolve_upload_dir(config.server.upload_dir.as_deref()).map_err(|err| {
        error!(error = %err, "Failed to prepare upload dir");
        err
    })?;

    if config.llm.api_key.is_none() && config.llm.requires_api_key() {
        tracing::warn!("No LLM API key configured; chatbot requests beyond canned replies will fail");
    }

    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));
    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(OpenAIClient::new());

    let state = HttpState {
        extraction: Arc::new(KeywordExtractionUseCase::new(config.extraction.clone())),
        export: KeywordExportUseCase::new(config.extraction.delimiter_byte()),
        chat: SeoChatUseCase::new(llm_client, config.llm.clone()),
        logs: logs.clone(),
    };

    let server = start_server(state, &config.server, upload_dir.clone())?;

    add_log(
        &logs,
        "INFO",
        "System",
        &format!(
            "HTTP server started on {}:{} (uploads spooled to {})",
            config.server.host,
            config.server.port,
            upload_dir.display()
        ),
    );

    server.await
}
