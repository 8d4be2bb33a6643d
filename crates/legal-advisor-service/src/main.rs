use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::{Parser, ValueEnum};
use legal_advisor_api::{
    ArticleFilter, ArticlePage, BackendConfig, CaseFilter, CategoryCount, ChatRequest,
    IntentReport, LegalAdvisorApi, MemoryStore, MigrateResult, SeedRequest, SeedSummary,
    VerifyReport, API_CONTRACT_VERSION, MAX_MESSAGE_CHARS,
};
use legal_advisor_core::{
    AdvisorEngine, Article, ChatResponse, IntentRules, LandmarkCase, Procedure, QuickReply,
};
use legal_advisor_store_sqlite::SchemaStatus;
use serde::{Deserialize, Serialize};

const SERVICE_CONTRACT_VERSION: &str = "service.v1";
const OPENAPI_YAML: &str = include_str!("../../../openapi/openapi.yaml");

#[derive(Debug, Clone)]
struct ServiceState {
    api: LegalAdvisorApi,
}

#[derive(Debug, Clone, Serialize)]
struct ServiceEnvelope<T>
where
    T: Serialize,
{
    service_contract_version: &'static str,
    api_contract_version: &'static str,
    data: T,
}

#[derive(Debug, Clone, Serialize)]
struct ServiceError {
    #[serde(skip)]
    status: StatusCode,
    service_contract_version: &'static str,
    error: String,
}

impl ServiceError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            service_contract_version: SERVICE_CONTRACT_VERSION,
            error: message.into(),
        }
    }

    fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            service_contract_version: SERVICE_CONTRACT_VERSION,
            error: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            service_contract_version: SERVICE_CONTRACT_VERSION,
            error: message.into(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct MigrateRequest {
    #[serde(default)]
    dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendKind {
    Sqlite,
    Json,
    Memory,
}

#[derive(Debug, Parser)]
#[command(name = "legal-advisor-service")]
#[command(about = "Local HTTP service for the legal advisory engine")]
struct Args {
    #[arg(long, value_enum, default_value_t = BackendKind::Sqlite)]
    backend: BackendKind,
    /// Database file for the sqlite backend.
    #[arg(long, default_value = "./legal_advisor.sqlite3")]
    db: PathBuf,
    /// Corpus document for the json backend.
    #[arg(long, default_value = "./legal_corpus.json")]
    data: PathBuf,
    #[arg(long, default_value = "127.0.0.1:4020")]
    bind: SocketAddr,
    /// Optional YAML file overriding fallback message templates.
    #[arg(long)]
    templates: Option<PathBuf>,
}

fn envelope<T>(data: T) -> ServiceEnvelope<T>
where
    T: Serialize,
{
    ServiceEnvelope {
        service_contract_version: SERVICE_CONTRACT_VERSION,
        api_contract_version: API_CONTRACT_VERSION,
        data,
    }
}

fn app(state: ServiceState) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/openapi", get(openapi))
        .route("/v1/db/schema-version", post(db_schema_version))
        .route("/v1/db/migrate", post(db_migrate))
        .route("/v1/chat", post(chat))
        .route("/v1/chat/intent", post(chat_intent))
        .route("/v1/articles", get(articles_list))
        .route("/v1/articles/categories", get(articles_categories))
        .route("/v1/articles/:number", get(article_show))
        .route("/v1/cases", get(cases_list))
        .route("/v1/cases/:name", get(case_show))
        .route("/v1/procedures", get(procedures_list))
        .route("/v1/procedures/:name", get(procedure_show))
        .route("/v1/quick-replies", get(quick_replies))
        .route("/v1/corpus/seed", post(corpus_seed))
        .route("/v1/corpus/verify", get(corpus_verify))
        .with_state(state)
}

fn build_api(args: &Args) -> Result<LegalAdvisorApi> {
    let backend = match args.backend {
        BackendKind::Sqlite => BackendConfig::Sqlite(args.db.clone()),
        BackendKind::Json => BackendConfig::Json(args.data.clone()),
        BackendKind::Memory => BackendConfig::Memory(MemoryStore::default()),
    };

    let api = match &args.templates {
        Some(path) => {
            let templates = LegalAdvisorApi::load_templates(path)?;
            LegalAdvisorApi::with_engine(
                backend,
                AdvisorEngine::new(IntentRules::default(), templates),
            )
        }
        None => LegalAdvisorApi::new(backend),
    };
    Ok(api)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let state = ServiceState { api: build_api(&args)? };
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!(bind = %args.bind, "legal-advisor-service listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

async fn health() -> Json<ServiceEnvelope<HealthResponse>> {
    Json(envelope(HealthResponse { status: "ok" }))
}

async fn openapi() -> impl IntoResponse {
    (StatusCode::OK, [("content-type", "application/yaml; charset=utf-8")], OPENAPI_YAML)
}

async fn db_schema_version(
    State(state): State<ServiceState>,
) -> Result<Json<ServiceEnvelope<SchemaStatus>>, ServiceError> {
    let status =
        state.api.schema_status().map_err(|err| ServiceError::bad_request(err.to_string()))?;
    Ok(Json(envelope(status)))
}

async fn db_migrate(
    State(state): State<ServiceState>,
    Json(request): Json<MigrateRequest>,
) -> Result<Json<ServiceEnvelope<MigrateResult>>, ServiceError> {
    let result = state
        .api
        .migrate(request.dry_run)
        .map_err(|err| ServiceError::bad_request(err.to_string()))?;
    Ok(Json(envelope(result)))
}

async fn chat(
    State(state): State<ServiceState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ServiceEnvelope<ChatResponse>>, ServiceError> {
    validate_chat_message(&request.message)?;
    let response =
        state.api.chat(request).map_err(|err| ServiceError::bad_request(err.to_string()))?;
    Ok(Json(envelope(response)))
}

async fn chat_intent(
    State(state): State<ServiceState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ServiceEnvelope<IntentReport>>, ServiceError> {
    validate_chat_message(&request.message)?;
    let report = state
        .api
        .classify_intent(&request.message)
        .map_err(|err| ServiceError::bad_request(err.to_string()))?;
    Ok(Json(envelope(report)))
}

fn validate_chat_message(message: &str) -> Result<(), ServiceError> {
    if message.trim().is_empty() {
        return Err(ServiceError::unprocessable("message MUST be non-empty"));
    }
    let chars = message.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(ServiceError::unprocessable(format!(
            "message MUST be at most {MAX_MESSAGE_CHARS} characters, got {chars}"
        )));
    }
    Ok(())
}

async fn articles_list(
    State(state): State<ServiceState>,
    Query(filter): Query<ArticleFilter>,
) -> Result<Json<ServiceEnvelope<ArticlePage>>, ServiceError> {
    let page = state
        .api
        .list_articles(&filter)
        .map_err(|err| ServiceError::bad_request(err.to_string()))?;
    Ok(Json(envelope(page)))
}

async fn articles_categories(
    State(state): State<ServiceState>,
) -> Result<Json<ServiceEnvelope<Vec<CategoryCount>>>, ServiceError> {
    let categories =
        state.api.list_categories().map_err(|err| ServiceError::bad_request(err.to_string()))?;
    Ok(Json(envelope(categories)))
}

async fn article_show(
    State(state): State<ServiceState>,
    Path(number): Path<String>,
) -> Result<Json<ServiceEnvelope<Article>>, ServiceError> {
    let article = state
        .api
        .get_article(&number)
        .map_err(|err| ServiceError::bad_request(err.to_string()))?
        .ok_or_else(|| ServiceError::not_found(format!("article not found: {number}")))?;
    Ok(Json(envelope(article)))
}

async fn cases_list(
    State(state): State<ServiceState>,
    Query(filter): Query<CaseFilter>,
) -> Result<Json<ServiceEnvelope<Vec<LandmarkCase>>>, ServiceError> {
    let cases =
        state.api.list_cases(&filter).map_err(|err| ServiceError::bad_request(err.to_string()))?;
    Ok(Json(envelope(cases)))
}

async fn case_show(
    State(state): State<ServiceState>,
    Path(name): Path<String>,
) -> Result<Json<ServiceEnvelope<LandmarkCase>>, ServiceError> {
    let case = state
        .api
        .get_case(&name)
        .map_err(|err| ServiceError::bad_request(err.to_string()))?
        .ok_or_else(|| ServiceError::not_found(format!("case not found: {name}")))?;
    Ok(Json(envelope(case)))
}

async fn procedures_list(
    State(state): State<ServiceState>,
) -> Result<Json<ServiceEnvelope<Vec<Procedure>>>, ServiceError> {
    let procedures =
        state.api.list_procedures().map_err(|err| ServiceError::bad_request(err.to_string()))?;
    Ok(Json(envelope(procedures)))
}

async fn procedure_show(
    State(state): State<ServiceState>,
    Path(name): Path<String>,
) -> Result<Json<ServiceEnvelope<Procedure>>, ServiceError> {
    let procedure = state
        .api
        .get_procedure(&name)
        .map_err(|err| ServiceError::bad_request(err.to_string()))?
        .ok_or_else(|| ServiceError::not_found(format!("procedure not found: {name}")))?;
    Ok(Json(envelope(procedure)))
}

async fn quick_replies(
    State(state): State<ServiceState>,
) -> Result<Json<ServiceEnvelope<Vec<QuickReply>>>, ServiceError> {
    let replies =
        state.api.quick_replies().map_err(|err| ServiceError::bad_request(err.to_string()))?;
    Ok(Json(envelope(replies)))
}

async fn corpus_seed(
    State(state): State<ServiceState>,
    Json(request): Json<SeedRequest>,
) -> Result<Json<ServiceEnvelope<SeedSummary>>, ServiceError> {
    let summary =
        state.api.seed(&request).map_err(|err| ServiceError::bad_request(err.to_string()))?;
    Ok(Json(envelope(summary)))
}

async fn corpus_verify(
    State(state): State<ServiceState>,
) -> Result<Json<ServiceEnvelope<VerifyReport>>, ServiceError> {
    let report =
        state.api.verify().map_err(|err| ServiceError::bad_request(err.to_string()))?;
    Ok(Json(envelope(report)))
}
