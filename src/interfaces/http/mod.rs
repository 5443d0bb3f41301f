use crate::application::{KeywordExportUseCase, KeywordExtractionUseCase, SeoChatUseCase};
use crate::domain::error::AppError;
use crate::domain::keyword::{ExtractionResult, KeywordRecord};
use crate::infrastructure::config::ServerConfig;
use actix_cors::Cors;
use actix_multipart::form::tempfile::{TempFile, TempFileConfig};
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{
    dev::Server, get, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use validator::Validate;

const MAX_LOG_ENTRIES: usize = 100;
const EXTRACT_SUCCEEDED: &str = "Extracted Page 2 keywords successfully";
const NO_FILE_UPLOADED: &str = "No file uploaded";
const PROCESSING_FAILED: &str = "Error processing file";
const CHAT_FAILED: &str = "Failed to fetch chatbot response";
const MESSAGE_REQUIRED: &str = "Message is required";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub extraction: Arc<KeywordExtractionUseCase>,
    pub export: KeywordExportUseCase,
    pub chat: SeoChatUseCase,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(MultipartForm)]
pub struct UploadForm {
    file: Option<TempFile>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<KeywordRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_rows: Option<Vec<KeywordRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_rows: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractResponse {
    fn success(result: ExtractionResult) -> Self {
        Self {
            success: true,
            message: EXTRACT_SUCCEEDED.to_string(),
            keywords: Some(result.fruit_set),
            preview_rows: Some(result.preview_sample),
            skipped_rows: Some(result.stats.rows_skipped),
            error: None,
        }
    }

    fn failure(message: &str, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            keywords: None,
            preview_rows: None,
            skipped_rows: None,
            error,
        }
    }
}

#[derive(Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub keywords: Vec<KeywordRecord>,
}

#[derive(Deserialize, Validate)]
pub struct ChatRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    fn reply(response: String) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Serialize)]
struct FailureBody<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> FailureBody<'a> {
    fn new(message: &'a str, error: Option<String>) -> Self {
        Self {
            success: false,
            message,
            error,
        }
    }
}

#[post("/extract")]
async fn extract(
    data: web::Data<HttpState>,
    form: Result<MultipartForm<UploadForm>, actix_web::Error>,
) -> impl Responder {
    // Missing content type, missing boundary and oversized bodies all land here
    let form = match form {
        Ok(MultipartForm(form)) => form,
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Extract",
                &format!("Rejected upload: {}", e),
            );
            return HttpResponse::Ok()
                .json(ExtractResponse::failure(PROCESSING_FAILED, Some(e.to_string())));
        }
    };

    let Some(upload) = form.file else {
        add_log(&data.logs, "ERROR", "Extract", "No file received in upload");
        return HttpResponse::Ok().json(ExtractResponse::failure(NO_FILE_UPLOADED, None));
    };

    let file_name = upload
        .file_name
        .clone()
        .unwrap_or_else(|| "upload.csv".to_string());
    add_log(
        &data.logs,
        "INFO",
        "Extract",
        &format!("File received: {} ({} bytes)", file_name, upload.size),
    );

    let use_case = data.extraction.clone();
    // The spooled temp file moves into the job and is deleted when it finishes
    let outcome = web::block(move || use_case.execute_file(upload.file.path())).await;

    match outcome {
        Ok(Ok(result)) => {
            add_log(
                &data.logs,
                "INFO",
                "Extract",
                &format!(
                    "Extracted {} keywords from {} ({} rows skipped)",
                    result.fruit_set.len(),
                    file_name,
                    result.stats.rows_skipped
                ),
            );
            HttpResponse::Ok().json(ExtractResponse::success(result))
        }
        Ok(Err(e)) => {
            add_log(
                &data.logs,
                "ERROR",
                "Extract",
                &format!("Failed to process {}: {}", file_name, e),
            );
            HttpResponse::Ok().json(ExtractResponse::failure(PROCESSING_FAILED, Some(e.to_string())))
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Extract",
                &format!("Extraction worker failed: {}", e),
            );
            HttpResponse::Ok().json(ExtractResponse::failure(PROCESSING_FAILED, Some(e.to_string())))
        }
    }
}

#[post("/export")]
async fn export(data: web::Data<HttpState>, req: web::Json<ExportRequest>) -> impl Responder {
    match data.export.execute(&req.keywords) {
        Ok(file) => {
            add_log(
                &data.logs,
                "INFO",
                "Export",
                &format!("Exported {} keywords", req.keywords.len()),
            );
            HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(file.file_name)],
                })
                .body(file.content)
        }
        Err(AppError::InputMissing(msg)) => {
            HttpResponse::Ok().json(FailureBody::new(&msg, None))
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Export",
                &format!("Export failed: {}", e),
            );
            HttpResponse::Ok().json(FailureBody::new(PROCESSING_FAILED, Some(e.to_string())))
        }
    }
}

#[post("/chatbot")]
async fn chatbot(
    data: web::Data<HttpState>,
    req: Result<web::Json<ChatRequest>, actix_web::Error>,
) -> impl Responder {
    let req = match req {
        Ok(req) => req,
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Chatbot",
                &format!("Unreadable chatbot request: {}", e),
            );
            return HttpResponse::Ok().json(ChatResponse::failure(CHAT_FAILED));
        }
    };

    if req.validate().is_err() {
        return HttpResponse::Ok().json(ChatResponse::failure(MESSAGE_REQUIRED));
    }

    match data.chat.execute(&req.message).await {
        Ok(response) => HttpResponse::Ok().json(ChatResponse::reply(response)),
        Err(AppError::InputMissing(msg)) => HttpResponse::Ok().json(ChatResponse::failure(msg)),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Chatbot",
                &format!("Chatbot request failed: {}", e),
            );
            HttpResponse::Ok().json(ChatResponse::failure(CHAT_FAILED))
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    HttpResponse::Ok().json(&*logs)
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "success": true, "status": "ok" }))
}

// Malformed bodies still answer 200 with a failure payload
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = FailureBody::new("Invalid request body", Some(err.to_string()));
    InternalError::from_response(err, HttpResponse::Ok().json(body)).into()
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }

    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry);
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
}

/// Register the `/api` routes and their extractor configuration
pub fn configure(cfg: &mut web::ServiceConfig, upload_dir: PathBuf, max_upload_bytes: usize) {
    cfg.app_data(TempFileConfig::default().directory(upload_dir))
        .app_data(MultipartFormConfig::default().total_limit(max_upload_bytes))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api")
                .service(extract)
                .service(export)
                .service(chatbot)
                .service(get_logs)
                .service(health),
        );
}

pub fn start_server(
    state: HttpState,
    config: &ServerConfig,
    upload_dir: PathBuf,
) -> std::io::Result<Server> {
    let state = web::Data::new(state);
    let max_upload_bytes = config.max_upload_bytes;

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Browser UI is served from another origin

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(|cfg| configure(cfg, upload_dir.clone(), max_upload_bytes))
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::Result;
    use crate::domain::keyword::ExtractionConfig;
    use crate::domain::llm_config::LLMConfig;
    use crate::infrastructure::llm_clients::LLMClient;
    use actix_web::{http::header, test};
    use async_trait::async_trait;
    use serde_json::Value;

    const BOUNDARY: &str = "----seofruitboundary";

    struct EchoClient;

    #[async_trait]
    impl LLMClient for EchoClient {
        async fn generate(&self, _config: &LLMConfig, _system: &str, user: &str) -> Result<String> {
            if user.contains("fail") {
                return Err(AppError::LLMError("upstream down".to_string()));
            }
            Ok(format!("You asked:\n{}", user))
        }
    }

    fn state() -> web::Data<HttpState> {
        web::Data::new(HttpState {
            extraction: Arc::new(KeywordExtractionUseCase::new(ExtractionConfig::default())),
            export: KeywordExportUseCase::new(b','),
            chat: SeoChatUseCase::new(Arc::new(EchoClient), LLMConfig::default()),
            logs: Arc::new(Mutex::new(Vec::new())),
        })
    }

    fn multipart_body(field: &str, content: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"ranks.csv\"\r\nContent-Type: text/csv\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload(field: &str, content: &[u8]) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/extract")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(field, content))
    }

    macro_rules! app {
        ($state:expr) => {
            app!($state, 1024 * 1024)
        };
        ($state:expr, $limit:expr) => {
            test::init_service(
                App::new()
                    .app_data($state)
                    .configure(|cfg| configure(cfg, std::env::temp_dir(), $limit)),
            )
            .await
        };
    }


    #[actix_web::test]
    async fn test_extract_returns_fruit_and_preview() {
        let app = app!(state());
        let csv = b"Keyword,Current position,Volume,Current URL\nfoo,15,100,http://a\nbar,5,50,http://b\n,12,1,http://c\n";

        let body: Value = test::call_and_read_body_json(&app, upload("file", csv).to_request()).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], EXTRACT_SUCCEEDED);
        assert_eq!(
            body["keywords"],
            serde_json::json!([{ "keyword": "foo", "position": 15, "volume": 100, "url": "http://a" }])
        );
        assert_eq!(body["previewRows"].as_array().unwrap().len(), 2);
        assert_eq!(body["skippedRows"], 1);
    }

    #[actix_web::test]
    async fn test_extract_without_file_field() {
        let app = app!(state());

        let body: Value =
            test::call_and_read_body_json(&app, upload("other", b"irrelevant").to_request()).await;

        assert_eq!(body["success"], false);
        assert_eq!(body["message"], NO_FILE_UPLOADED);
        assert!(body.get("keywords").is_none());
    }

    #[actix_web::test]
    async fn test_extract_corrupt_file_reports_failure() {
        let app = app!(state());
        let csv = b"Keyword,Current position,Current URL\nfoo,\xFF\xFE,http://a\n";

        let resp = test::call_service(&app, upload("file", csv).to_request()).await;
        assert!(resp.status().is_success());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], PROCESSING_FAILED);
        assert!(body["error"].as_str().unwrap().contains("Decode error"));
        assert!(body.get("keywords").is_none());
        assert!(body.get("previewRows").is_none());
    }

    #[actix_web::test]
    async fn test_extract_non_multipart_request_stays_ok() {
        let app = app!(state());
        let requests = vec![
            test::TestRequest::post()
                .uri("/api/extract")
                .set_payload("Keyword\nfoo\n"),
            test::TestRequest::post()
                .uri("/api/extract")
                .insert_header((header::CONTENT_TYPE, "text/plain"))
                .set_payload("Keyword\nfoo\n"),
            test::TestRequest::post()
                .uri("/api/extract")
                .insert_header((header::CONTENT_TYPE, "multipart/form-data"))
                .set_payload(multipart_body("file", b"Keyword\nfoo\n")),
        ];

        for req in requests {
            let resp = test::call_service(&app, req.to_request()).await;
            assert!(resp.status().is_success());

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["message"], PROCESSING_FAILED);
            assert!(body["error"].is_string());
        }
    }

    #[actix_web::test]
    async fn test_extract_oversized_upload_stays_ok() {
        let app = app!(state(), 64);
        let mut csv = b"Keyword,Current position,Volume,Current URL\n".to_vec();
        csv.extend(std::iter::repeat(b"foo,15,100,http://a\n").take(20).flatten());

        let resp = test::call_service(&app, upload("file", &csv).to_request()).await;
        assert!(resp.status().is_success());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], PROCESSING_FAILED);
    }

    #[actix_web::test]
    async fn test_export_returns_csv_attachment() {
        let app = app!(state());
        let req = test::TestRequest::post()
            .uri("/api/export")
            .set_json(serde_json::json!({
                "keywords": [{ "keyword": "foo", "position": 15, "volume": 100, "url": "http://a" }]
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("low_hanging_fruit.csv"));

        let body = test::read_body(resp).await;
        assert_eq!(
            body,
            "Keyword,Position,Search Volume,URL\nfoo,15,100,http://a".as_bytes()
        );
    }

    #[actix_web::test]
    async fn test_export_empty_list_fails() {
        let app = app!(state());
        let req = test::TestRequest::post()
            .uri("/api/export")
            .set_json(serde_json::json!({ "keywords": [] }))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "No extracted data to download.");
    }

    #[actix_web::test]
    async fn test_chatbot_greeting_and_question() {
        let app = app!(state());

        let req = test::TestRequest::post()
            .uri("/api/chatbot")
            .set_json(serde_json::json!({ "message": "Hello" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["response"], "Hello! How can I help you today?");

        let req = test::TestRequest::post()
            .uri("/api/chatbot")
            .set_json(serde_json::json!({ "message": "What is anchor text?" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["response"], "You asked:<br>What is anchor text?");
    }

    #[actix_web::test]
    async fn test_chatbot_missing_message() {
        let app = app!(state());
        let req = test::TestRequest::post()
            .uri("/api/chatbot")
            .set_json(serde_json::json!({}))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], MESSAGE_REQUIRED);
    }

    #[actix_web::test]
    async fn test_chatbot_unreadable_body_is_generic() {
        let app = app!(state());
        let req = test::TestRequest::post()
            .uri("/api/chatbot")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], CHAT_FAILED);
        assert!(body.get("message").is_none());
    }

    #[actix_web::test]
    async fn test_chatbot_long_message_reaches_model() {
        let app = app!(state());
        let message = "rank ".repeat(2000);
        let req = test::TestRequest::post()
            .uri("/api/chatbot")
            .set_json(serde_json::json!({ "message": message }))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert!(body["response"].as_str().unwrap().starts_with("You asked:<br>rank"));
    }

    #[actix_web::test]
    async fn test_chatbot_upstream_failure_is_generic() {
        let state = state();
        let app = app!(state.clone());
        let req = test::TestRequest::post()
            .uri("/api/chatbot")
            .set_json(serde_json::json!({ "message": "please fail" }))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], CHAT_FAILED);

        let logs = state.logs.lock().unwrap();
        assert_eq!(logs.last().unwrap().source, "Chatbot");
    }

    #[actix_web::test]
    async fn test_log_buffer_is_bounded() {
        let logs = Mutex::new(Vec::new());
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            add_log(&logs, "INFO", "Test", &format!("entry {i}"));
        }
        let logs = logs.lock().unwrap();
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].message, "entry 5");
    }
}
