//! `lexadv` command-line interface.
//!
//! Every command prints one pretty-printed JSON document to stdout, tagged
//! with `contract_version` so scripted callers can pin against it.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use legal_advisor_api::{
    ArticleFilter, BackendConfig, CaseFilter, ChatRequest, LegalAdvisorApi, SeedRequest,
};
use legal_advisor_core::{AdvisorEngine, IntentRules};
use serde_json::{json, Value};

const CLI_CONTRACT_VERSION: &str = "cli.v1";

#[derive(Parser)]
#[command(
    name = "lexadv",
    version,
    about = "Constitutional legal advisory corpus and query tool"
)]
struct Cli {
    /// Storage backend for corpus data.
    #[arg(long, value_enum, default_value_t = Backend::Sqlite)]
    backend: Backend,

    /// SQLite database path, used when the backend is sqlite.
    #[arg(long, default_value = "./legal_advisor.sqlite3")]
    db: PathBuf,

    /// JSON corpus path, used when the backend is json.
    #[arg(long, default_value = "./legal_corpus.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: RootCommand,
}

impl Cli {
    fn backend_config(&self) -> BackendConfig {
        match self.backend {
            Backend::Sqlite => BackendConfig::Sqlite(self.db.clone()),
            Backend::Json => BackendConfig::Json(self.data.clone()),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Sqlite,
    Json,
}

#[derive(Subcommand)]
enum RootCommand {
    /// Schema inspection and migration for the sqlite backend.
    Db {
        #[command(subcommand)]
        command: Box<DbCommand>,
    },
    /// Corpus loading, inspection, and maintenance.
    Corpus {
        #[command(subcommand)]
        command: Box<CorpusCommand>,
    },
    /// Query understanding and answering.
    Query {
        #[command(subcommand)]
        command: Box<QueryCommand>,
    },
}

#[derive(Subcommand)]
enum DbCommand {
    /// Report current and target schema versions plus pending migrations.
    SchemaVersion,
    /// Apply pending migrations, or plan them with --dry-run.
    Migrate {
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum CorpusCommand {
    /// Install a seed document into the configured backend.
    Seed {
        /// Seed document to load.
        #[arg(long)]
        from: PathBuf,
        /// Replace the stored corpus instead of appending to it.
        #[arg(long)]
        clear: bool,
    },
    /// Report stored entity counts and the corpus content fingerprint.
    Verify,
    /// Rewrite a seed document, dropping duplicated article numbers.
    FixDuplicates {
        /// Seed document to rewrite in place.
        #[arg(long)]
        from: PathBuf,
    },
    /// List articles with optional filters, paged.
    Articles {
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Fetch one article by number.
    Article { number: String },
    /// List article categories with counts.
    Categories,
    /// List landmark cases with optional filters.
    Cases {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Fetch one landmark case by name.
    Case { name: String },
    /// List legal procedures.
    Procedures,
    /// Fetch one procedure by name.
    Procedure { name: String },
    /// List quick reply suggestions in display order.
    QuickReplies,
}

#[derive(Subcommand)]
enum QueryCommand {
    /// Answer one query against the stored corpus.
    Ask {
        #[arg(long)]
        text: String,
        /// YAML file overriding the built-in fallback texts.
        #[arg(long)]
        templates: Option<PathBuf>,
    },
    /// Classify a query without producing an answer.
    Intent {
        #[arg(long)]
        text: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let backend = cli.backend_config();
    match cli.command {
        RootCommand::Db { command } => run_db(&backend, *command),
        RootCommand::Corpus { command } => run_corpus(&backend, *command),
        RootCommand::Query { command } => run_query(&backend, *command),
    }
}

fn run_db(backend: &BackendConfig, command: DbCommand) -> Result<()> {
    let api = LegalAdvisorApi::new(backend.clone());
    match command {
        DbCommand::SchemaVersion => emit_json(serde_json::to_value(api.schema_status()?)?),
        DbCommand::Migrate { dry_run } => emit_json(serde_json::to_value(api.migrate(dry_run)?)?),
    }
}

fn run_corpus(backend: &BackendConfig, command: CorpusCommand) -> Result<()> {
    let api = LegalAdvisorApi::new(backend.clone());
    match command {
        CorpusCommand::Seed { from, clear } => {
            let summary = api.seed(&SeedRequest { data_path: from, clear })?;
            emit_json(serde_json::to_value(summary)?)
        }
        CorpusCommand::Verify => emit_json(serde_json::to_value(api.verify()?)?),
        CorpusCommand::FixDuplicates { from } => {
            let report = LegalAdvisorApi::fix_duplicates(&from)?;
            emit_json(serde_json::to_value(report)?)
        }
        CorpusCommand::Articles { skip, limit, category, search } => {
            let page = api.list_articles(&ArticleFilter { skip, limit, category, search })?;
            emit_json(serde_json::to_value(page)?)
        }
        CorpusCommand::Article { number } => {
            let article = api
                .get_article(&number)?
                .ok_or_else(|| anyhow!("no article numbered `{number}` in the corpus"))?;
            emit_json(serde_json::to_value(article)?)
        }
        CorpusCommand::Categories => {
            let categories = api.list_categories()?;
            emit_json(json!({ "total": categories.len(), "categories": categories }))
        }
        CorpusCommand::Cases { search, year } => {
            let cases = api.list_cases(&CaseFilter { search, year })?;
            emit_json(json!({ "total": cases.len(), "items": cases }))
        }
        CorpusCommand::Case { name } => {
            let case = api
                .get_case(&name)?
                .ok_or_else(|| anyhow!("no landmark case named `{name}` in the corpus"))?;
            emit_json(serde_json::to_value(case)?)
        }
        CorpusCommand::Procedures => {
            let procedures = api.list_procedures()?;
            emit_json(json!({ "total": procedures.len(), "items": procedures }))
        }
        CorpusCommand::Procedure { name } => {
            let procedure = api
                .get_procedure(&name)?
                .ok_or_else(|| anyhow!("no procedure named `{name}` in the corpus"))?;
            emit_json(serde_json::to_value(procedure)?)
        }
        CorpusCommand::QuickReplies => {
            let replies = api.quick_replies()?;
            emit_json(json!({ "total": replies.len(), "items": replies }))
        }
    }
}

fn run_query(backend: &BackendConfig, command: QueryCommand) -> Result<()> {
    match command {
        QueryCommand::Ask { text, templates } => {
            let api = match templates {
                Some(path) => {
                    let templates = LegalAdvisorApi::load_templates(&path)?;
                    let engine = AdvisorEngine::new(IntentRules::default(), templates);
                    LegalAdvisorApi::with_engine(backend.clone(), engine)
                }
                None => LegalAdvisorApi::new(backend.clone()),
            };
            emit_json(serde_json::to_value(api.chat(ChatRequest { message: text })?)?)
        }
        QueryCommand::Intent { text } => {
            let api = LegalAdvisorApi::new(backend.clone());
            emit_json(serde_json::to_value(api.classify_intent(&text)?)?)
        }
    }
}

fn with_contract_version(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            map.insert(
                "contract_version".to_string(),
                Value::String(CLI_CONTRACT_VERSION.to_string()),
            );
            Value::Object(map)
        }
        other => json!({
            "contract_version": CLI_CONTRACT_VERSION,
            "payload": other,
        }),
    }
}

fn emit_json(value: Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&with_contract_version(value))?;
    println!("{rendered}");
    Ok(())
}
