//! Boundary API over the advisory engine and its storage backends.
//!
//! Every operation opens the configured backend, loads a corpus snapshot,
//! runs pure engine logic, and returns plain serializable results. Nothing
//! here holds a connection between calls.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Context, Result};
use legal_advisor_core::{
    text, AdvisorEngine, Article, ArticleId, CaseId, ChatResponse, Corpus, FallbackTemplates,
    LandmarkCase, Procedure, ProcedureId, QueryIntent, QuickReply, QuickReplyId,
};
use legal_advisor_store_json::JsonStore;
use legal_advisor_store_sqlite::{SchemaStatus, SqliteStore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const API_CONTRACT_VERSION: &str = "api.v1";

/// Hard cap on chat message length, in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

const DEFAULT_PAGE_LIMIT: usize = 50;
const MAX_PAGE_LIMIT: usize = 100;

/// One corpus storage backend. Load returns the full snapshot in stored
/// order; replace swaps the snapshot wholesale.
pub trait CorpusStore {
    /// # Errors
    /// Returns an error when the snapshot cannot be read or decoded.
    fn load_corpus(&mut self) -> Result<Corpus>;

    /// # Errors
    /// Returns an error when validation or persistence fails.
    fn replace_corpus(&mut self, corpus: &Corpus) -> Result<()>;

    fn describe(&self) -> String;
}

struct SqliteBackend {
    store: SqliteStore,
    path: PathBuf,
}

impl CorpusStore for SqliteBackend {
    fn load_corpus(&mut self) -> Result<Corpus> {
        self.store.load_corpus()
    }

    fn replace_corpus(&mut self, corpus: &Corpus) -> Result<()> {
        self.store.replace_corpus(corpus)
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

struct JsonBackend {
    store: JsonStore,
    path: PathBuf,
}

impl CorpusStore for JsonBackend {
    fn load_corpus(&mut self) -> Result<Corpus> {
        self.store.load_corpus()
    }

    fn replace_corpus(&mut self, corpus: &Corpus) -> Result<()> {
        self.store.replace_corpus(corpus)
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

/// Shared in-process corpus, used by the service for ephemeral deployments
/// and by tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    corpus: Arc<RwLock<Corpus>>,
}

impl MemoryStore {
    /// # Errors
    /// Returns an error when the initial corpus fails validation.
    pub fn with_corpus(corpus: Corpus) -> Result<Self> {
        corpus.validate().map_err(|err| anyhow!("corpus validation failed: {err}"))?;
        Ok(Self { corpus: Arc::new(RwLock::new(corpus)) })
    }
}

impl CorpusStore for MemoryStore {
    fn load_corpus(&mut self) -> Result<Corpus> {
        let guard = self.corpus.read().map_err(|_| anyhow!("corpus lock poisoned"))?;
        Ok(guard.clone())
    }

    fn replace_corpus(&mut self, corpus: &Corpus) -> Result<()> {
        corpus.validate().map_err(|err| anyhow!("corpus validation failed: {err}"))?;
        let mut guard = self.corpus.write().map_err(|_| anyhow!("corpus lock poisoned"))?;
        *guard = corpus.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Backend selection carried by the API. Memory carries its shared state so
/// clones of the config see the same corpus.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    Sqlite(PathBuf),
    Json(PathBuf),
    Memory(MemoryStore),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrateResult {
    pub dry_run: bool,
    pub current_version: i64,
    pub target_version: i64,
    pub would_apply_versions: Vec<i64>,
    pub inferred_from_legacy: bool,
    pub after_version: Option<i64>,
    pub up_to_date: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentReport {
    pub intent: QueryIntent,
    pub article_reference: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleFilter {
    #[serde(default)]
    pub skip: usize,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticlePage {
    pub total: usize,
    pub skip: usize,
    pub limit: usize,
    pub items: Vec<Article>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub articles: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedRequest {
    pub data_path: PathBuf,
    pub clear: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedSummary {
    pub backend: String,
    pub cleared: bool,
    pub articles: usize,
    pub cases: usize,
    pub procedures: usize,
    pub quick_replies: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyReport {
    pub backend: String,
    pub articles: usize,
    pub cases: usize,
    pub procedures: usize,
    pub quick_replies: usize,
    pub empty: bool,
    pub fingerprint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixDuplicatesReport {
    pub scanned: usize,
    pub duplicate_numbers: Vec<String>,
    pub removed: usize,
    pub kept: usize,
}

/// Seed document as authored on disk. Field names follow the historical data
/// files, with aliases for the shorter spellings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeedDocument {
    #[serde(default)]
    pub articles: Vec<SeedArticle>,
    #[serde(default, rename = "landmark_cases", alias = "cases")]
    pub cases: Vec<SeedCase>,
    #[serde(default, rename = "legal_procedures", alias = "procedures")]
    pub procedures: Vec<SeedProcedure>,
    #[serde(default)]
    pub quick_replies: Vec<SeedQuickReply>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedArticle {
    pub number: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedCase {
    pub name: String,
    pub year: YearValue,
    pub significance: String,
    #[serde(default)]
    pub detailed_explanation: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Years appear both as numbers and as quoted strings in historical data
/// files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum YearValue {
    Number(i32),
    Text(String),
}

impl YearValue {
    /// # Errors
    /// Returns an error when a textual year does not parse as an integer.
    pub fn resolve(&self) -> Result<i32> {
        match self {
            Self::Number(year) => Ok(*year),
            Self::Text(raw) => raw
                .trim()
                .parse::<i32>()
                .with_context(|| format!("invalid case year: {raw}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedProcedure {
    pub name: String,
    pub description: String,
    #[serde(rename = "procedure", alias = "procedure_text")]
    pub procedure_text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Quick replies are either bare suggestion strings or full entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SeedQuickReply {
    Text(String),
    Entry {
        text: String,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        order: Option<u32>,
    },
}

#[derive(Debug, Clone)]
pub struct LegalAdvisorApi {
    backend: BackendConfig,
    engine: AdvisorEngine,
}

impl LegalAdvisorApi {
    #[must_use]
    pub fn new(backend: BackendConfig) -> Self {
        Self { backend, engine: AdvisorEngine::default() }
    }

    #[must_use]
    pub fn with_engine(backend: BackendConfig, engine: AdvisorEngine) -> Self {
        Self { backend, engine }
    }

    fn open_store(&self) -> Result<Box<dyn CorpusStore>> {
        match &self.backend {
            BackendConfig::Sqlite(path) => {
                let mut store = SqliteStore::open(path)?;
                store.migrate()?;
                Ok(Box::new(SqliteBackend { store, path: path.clone() }))
            }
            BackendConfig::Json(path) => {
                Ok(Box::new(JsonBackend { store: JsonStore::new(path), path: path.clone() }))
            }
            BackendConfig::Memory(store) => Ok(Box::new(store.clone())),
        }
    }

    fn load_corpus(&self) -> Result<Corpus> {
        self.open_store()?.load_corpus()
    }

    /// Inspect schema status without mutating data. Only meaningful for the
    /// sqlite backend.
    ///
    /// # Errors
    /// Returns an error for non-sqlite backends or when the database cannot
    /// be opened or queried.
    pub fn schema_status(&self) -> Result<SchemaStatus> {
        let BackendConfig::Sqlite(path) = &self.backend else {
            return Err(anyhow!("schema management requires the sqlite backend"));
        };
        let store = SqliteStore::open(path)?;
        store.schema_status()
    }

    /// Apply pending migrations, or return planned versions for dry-run mode.
    ///
    /// # Errors
    /// Returns an error for non-sqlite backends or when migration fails.
    pub fn migrate(&self, dry_run: bool) -> Result<MigrateResult> {
        let BackendConfig::Sqlite(path) = &self.backend else {
            return Err(anyhow!("schema management requires the sqlite backend"));
        };
        let mut store = SqliteStore::open(path)?;
        let before = store.schema_status()?;
        if dry_run {
            return Ok(MigrateResult {
                dry_run: true,
                current_version: before.current_version,
                target_version: before.target_version,
                would_apply_versions: before.pending_versions,
                inferred_from_legacy: before.inferred_from_legacy,
                after_version: None,
                up_to_date: None,
            });
        }

        let planned_versions = before.pending_versions;
        store.migrate()?;
        let after = store.schema_status()?;
        Ok(MigrateResult {
            dry_run: false,
            current_version: before.current_version,
            target_version: before.target_version,
            would_apply_versions: planned_versions,
            inferred_from_legacy: before.inferred_from_legacy,
            after_version: Some(after.current_version),
            up_to_date: Some(after.pending_versions.is_empty()),
        })
    }

    /// Answer one chat message.
    ///
    /// # Errors
    /// Returns an error when the message is blank or exceeds
    /// [`MAX_MESSAGE_CHARS`], or when the corpus cannot be loaded.
    pub fn chat(&self, input: ChatRequest) -> Result<ChatResponse> {
        validate_message(&input.message)?;
        let corpus = self.load_corpus()?;
        self.engine
            .process(&input.message, &corpus)
            .map_err(|err| anyhow!("chat processing failed: {err}"))
    }

    /// Classify a message without producing an answer.
    ///
    /// # Errors
    /// Returns an error when the message is blank or too long.
    pub fn classify_intent(&self, message: &str) -> Result<IntentReport> {
        validate_message(message)?;
        let normalized = text::normalize(message);
        Ok(IntentReport {
            intent: self.engine.classify(message),
            article_reference: text::extract_article_reference(&normalized),
        })
    }

    /// List articles with optional category and free-text filters, paged.
    ///
    /// # Errors
    /// Returns an error when the corpus cannot be loaded.
    pub fn list_articles(&self, filter: &ArticleFilter) -> Result<ArticlePage> {
        let corpus = self.load_corpus()?;
        let limit = filter.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT);

        let filtered: Vec<Article> = corpus
            .articles
            .into_iter()
            .filter(|article| {
                filter
                    .category
                    .as_ref()
                    .map_or(true, |category| article.category.eq_ignore_ascii_case(category))
            })
            .filter(|article| {
                filter
                    .search
                    .as_ref()
                    .map_or(true, |search| article_matches_search(article, search))
            })
            .collect();

        let total = filtered.len();
        let items = filtered.into_iter().skip(filter.skip).take(limit).collect();
        Ok(ArticlePage { total, skip: filter.skip, limit, items })
    }

    /// Fetch one article by its number, case-insensitively.
    ///
    /// # Errors
    /// Returns an error when the corpus cannot be loaded.
    pub fn get_article(&self, number: &str) -> Result<Option<Article>> {
        let corpus = self.load_corpus()?;
        Ok(corpus
            .articles
            .into_iter()
            .find(|article| article.number.eq_ignore_ascii_case(number.trim())))
    }

    /// List article categories with their article counts, sorted by name.
    ///
    /// # Errors
    /// Returns an error when the corpus cannot be loaded.
    pub fn list_categories(&self) -> Result<Vec<CategoryCount>> {
        let corpus = self.load_corpus()?;
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for article in &corpus.articles {
            *counts.entry(article.category.clone()).or_insert(0) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(category, articles)| CategoryCount { category, articles })
            .collect())
    }

    /// List landmark cases with optional name/keyword search and year filter.
    ///
    /// # Errors
    /// Returns an error when the corpus cannot be loaded.
    pub fn list_cases(&self, filter: &CaseFilter) -> Result<Vec<LandmarkCase>> {
        let corpus = self.load_corpus()?;
        Ok(corpus
            .cases
            .into_iter()
            .filter(|case| filter.year.map_or(true, |year| case.year == year))
            .filter(|case| {
                filter.search.as_ref().map_or(true, |search| case_matches_search(case, search))
            })
            .collect())
    }

    /// Fetch one landmark case by name, case-insensitively.
    ///
    /// # Errors
    /// Returns an error when the corpus cannot be loaded.
    pub fn get_case(&self, name: &str) -> Result<Option<LandmarkCase>> {
        let corpus = self.load_corpus()?;
        Ok(corpus.cases.into_iter().find(|case| case.name.eq_ignore_ascii_case(name.trim())))
    }

    /// List all legal procedures in stored order.
    ///
    /// # Errors
    /// Returns an error when the corpus cannot be loaded.
    pub fn list_procedures(&self) -> Result<Vec<Procedure>> {
        Ok(self.load_corpus()?.procedures)
    }

    /// Fetch one procedure by name, case-insensitively.
    ///
    /// # Errors
    /// Returns an error when the corpus cannot be loaded.
    pub fn get_procedure(&self, name: &str) -> Result<Option<Procedure>> {
        let corpus = self.load_corpus()?;
        Ok(corpus
            .procedures
            .into_iter()
            .find(|procedure| procedure.name.eq_ignore_ascii_case(name.trim())))
    }

    /// List quick replies sorted by display order, then stored position.
    ///
    /// # Errors
    /// Returns an error when the corpus cannot be loaded.
    pub fn quick_replies(&self) -> Result<Vec<QuickReply>> {
        let mut replies = self.load_corpus()?.quick_replies;
        replies.sort_by_key(|reply| reply.order);
        Ok(replies)
    }

    /// Load a seed document from disk and install it as the stored corpus.
    /// With `clear` unset the document is appended to the existing snapshot.
    ///
    /// # Errors
    /// Returns an error when the document cannot be read or parsed, the
    /// resulting corpus fails validation, or persistence fails.
    pub fn seed(&self, input: &SeedRequest) -> Result<SeedSummary> {
        let document = read_seed_document(&input.data_path)?;
        let incoming = corpus_from_seed(&document)?;

        let mut store = self.open_store()?;
        let corpus = if input.clear {
            incoming
        } else {
            let mut existing = store.load_corpus()?;
            existing.articles.extend(incoming.articles);
            existing.cases.extend(incoming.cases);
            existing.procedures.extend(incoming.procedures);
            existing.quick_replies.extend(incoming.quick_replies);
            existing
        };

        store.replace_corpus(&corpus)?;
        Ok(SeedSummary {
            backend: store.describe(),
            cleared: input.clear,
            articles: corpus.articles.len(),
            cases: corpus.cases.len(),
            procedures: corpus.procedures.len(),
            quick_replies: corpus.quick_replies.len(),
        })
    }

    /// Report stored entity counts plus a content fingerprint that is stable
    /// across backends and reseeds of the same data.
    ///
    /// # Errors
    /// Returns an error when the corpus cannot be loaded.
    pub fn verify(&self) -> Result<VerifyReport> {
        let mut store = self.open_store()?;
        let corpus = store.load_corpus()?;
        Ok(VerifyReport {
            backend: store.describe(),
            articles: corpus.articles.len(),
            cases: corpus.cases.len(),
            procedures: corpus.procedures.len(),
            quick_replies: corpus.quick_replies.len(),
            empty: corpus.is_empty(),
            fingerprint: corpus_fingerprint(&corpus),
        })
    }

    /// Rewrite a seed document in place, dropping duplicated article numbers.
    /// For each duplicated number the entry with the longest description is
    /// kept at the first occurrence's position.
    ///
    /// # Errors
    /// Returns an error when the document cannot be read, parsed, or written.
    pub fn fix_duplicates(data_path: &Path) -> Result<FixDuplicatesReport> {
        let mut document = read_seed_document(data_path)?;
        let scanned = document.articles.len();

        let mut kept: Vec<SeedArticle> = Vec::new();
        let mut index_by_number: BTreeMap<String, usize> = BTreeMap::new();
        let mut reported_keys: BTreeSet<String> = BTreeSet::new();
        let mut duplicate_numbers: Vec<String> = Vec::new();

        for article in document.articles.drain(..) {
            let key = article.number.trim().to_ascii_lowercase();
            match index_by_number.get(&key) {
                Some(&existing) => {
                    // Duplicates are keyed case-insensitively, so case
                    // variants of one number are reported once, under the
                    // first occurrence's spelling.
                    if reported_keys.insert(key.clone()) {
                        duplicate_numbers.push(kept[existing].number.clone());
                    }
                    if article.description.len() > kept[existing].description.len() {
                        kept[existing] = article;
                    }
                }
                None => {
                    index_by_number.insert(key, kept.len());
                    kept.push(article);
                }
            }
        }

        let report = FixDuplicatesReport {
            scanned,
            duplicate_numbers,
            removed: scanned - kept.len(),
            kept: kept.len(),
        };

        document.articles = kept;
        write_seed_document(data_path, &document)?;
        Ok(report)
    }

    /// Load fallback template overrides from a YAML file. Missing fields keep
    /// their built-in texts.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed.
    pub fn load_templates(path: &Path) -> Result<FallbackTemplates> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read templates file {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse templates YAML {}", path.display()))
    }
}

fn validate_message(message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(anyhow!("message MUST be non-empty"));
    }
    let chars = message.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(anyhow!("message MUST be at most {MAX_MESSAGE_CHARS} characters, got {chars}"));
    }
    Ok(())
}

fn article_matches_search(article: &Article, search: &str) -> bool {
    let needle = search.to_lowercase();
    article.number.to_lowercase().contains(&needle)
        || article.title.to_lowercase().contains(&needle)
        || article.description.to_lowercase().contains(&needle)
        || article.keywords.iter().any(|keyword| keyword.to_lowercase().contains(&needle))
}

fn case_matches_search(case: &LandmarkCase, search: &str) -> bool {
    let needle = search.to_lowercase();
    case.name.to_lowercase().contains(&needle)
        || case.significance.to_lowercase().contains(&needle)
        || case.keywords.iter().any(|keyword| keyword.to_lowercase().contains(&needle))
}

fn read_seed_document(path: &Path) -> Result<SeedDocument> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read seed document {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse seed document {}", path.display()))
}

fn write_seed_document(path: &Path, document: &SeedDocument) -> Result<()> {
    let json =
        serde_json::to_vec_pretty(document).context("failed to serialize seed document")?;
    let temp_path = path.with_extension(format!("tmp-{}", ulid::Ulid::new()));
    fs::write(&temp_path, json)
        .with_context(|| format!("failed to write temp file {}", temp_path.display()))?;
    fs::rename(&temp_path, path).with_context(|| {
        format!("failed to move seed document into place at {}", path.display())
    })?;
    Ok(())
}

fn corpus_from_seed(document: &SeedDocument) -> Result<Corpus> {
    let articles = document
        .articles
        .iter()
        .map(|seed| Article {
            id: ArticleId::new(),
            number: seed.number.trim().to_string(),
            title: seed.title.clone(),
            description: seed.description.clone(),
            category: seed.category.clone(),
            keywords: seed.keywords.clone(),
        })
        .collect();

    let mut cases = Vec::with_capacity(document.cases.len());
    for seed in &document.cases {
        cases.push(LandmarkCase {
            id: CaseId::new(),
            name: seed.name.clone(),
            year: seed.year.resolve()?,
            significance: seed.significance.clone(),
            detailed_explanation: seed.detailed_explanation.clone(),
            key_points: seed.key_points.clone(),
            keywords: seed.keywords.clone(),
        });
    }

    let procedures = document
        .procedures
        .iter()
        .map(|seed| Procedure {
            id: ProcedureId::new(),
            name: seed.name.clone(),
            description: seed.description.clone(),
            procedure_text: seed.procedure_text.clone(),
            keywords: seed.keywords.clone(),
        })
        .collect();

    let mut quick_replies = Vec::with_capacity(document.quick_replies.len());
    for (position, seed) in document.quick_replies.iter().enumerate() {
        let fallback_order = u32::try_from(position + 1).context("too many quick replies")?;
        quick_replies.push(match seed {
            SeedQuickReply::Text(text) => QuickReply {
                id: QuickReplyId::new(),
                text: text.clone(),
                category: "general".to_string(),
                order: fallback_order,
            },
            SeedQuickReply::Entry { text, category, order } => QuickReply {
                id: QuickReplyId::new(),
                text: text.clone(),
                category: category.clone().unwrap_or_else(|| "general".to_string()),
                order: order.unwrap_or(fallback_order),
            },
        });
    }

    let corpus = Corpus { articles, cases, procedures, quick_replies };
    corpus.validate().map_err(|err| anyhow!("seed document is invalid: {err}"))?;
    Ok(corpus)
}

/// Content fingerprint over every user-visible field, in stored order.
/// Identifiers are excluded so reseeding identical data reproduces the value.
#[must_use]
pub fn corpus_fingerprint(corpus: &Corpus) -> String {
    let mut hasher = Sha256::new();

    for article in &corpus.articles {
        hasher.update(b"article\x1f");
        for field in [&article.number, &article.title, &article.description, &article.category] {
            hasher.update(field.as_bytes());
            hasher.update(b"\x1f");
        }
        for keyword in &article.keywords {
            hasher.update(keyword.as_bytes());
            hasher.update(b"\x1f");
        }
    }

    for case in &corpus.cases {
        hasher.update(b"case\x1f");
        hasher.update(case.name.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(case.year.to_string().as_bytes());
        hasher.update(b"\x1f");
        hasher.update(case.significance.as_bytes());
        hasher.update(b"\x1f");
        if let Some(detail) = &case.detailed_explanation {
            hasher.update(detail.as_bytes());
            hasher.update(b"\x1f");
        }
        for entry in case.key_points.iter().chain(&case.keywords) {
            hasher.update(entry.as_bytes());
            hasher.update(b"\x1f");
        }
    }

    for procedure in &corpus.procedures {
        hasher.update(b"procedure\x1f");
        for field in [&procedure.name, &procedure.description, &procedure.procedure_text] {
            hasher.update(field.as_bytes());
            hasher.update(b"\x1f");
        }
        for keyword in &procedure.keywords {
            hasher.update(keyword.as_bytes());
            hasher.update(b"\x1f");
        }
    }

    for reply in &corpus.quick_replies {
        hasher.update(b"quick_reply\x1f");
        hasher.update(reply.text.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(reply.category.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(reply.order.to_string().as_bytes());
        hasher.update(b"\x1f");
    }

    let digest = hasher.finalize();
    let digest_hex = format!("{digest:x}");
    format!("corpus_{}", &digest_hex[..16])
}
