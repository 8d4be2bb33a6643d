use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use jsonschema::JSONSchema;
use serde_json::{json, Value};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|err| panic!("clock should be >= UNIX_EPOCH: {err}"))
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}-{now}-{}", ulid::Ulid::new()));
    fs::create_dir_all(&dir)
        .unwrap_or_else(|err| panic!("failed to create temp dir {}: {err}", dir.display()));
    dir
}

fn run_lexadv<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_lexadv"))
        .args(args)
        .output()
        .unwrap_or_else(|err| panic!("failed to execute lexadv binary: {err}"))
}

fn run_json<I, S>(args: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run_lexadv(args);
    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "lexadv command failed (status={}):\nstdout:\n{}\nstderr:\n{}",
            output.status, stdout, stderr
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    serde_json::from_str(&stdout)
        .unwrap_or_else(|err| panic!("stdout is not valid JSON: {err}\nstdout:\n{stdout}"))
}

fn run_failure<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run_lexadv(args);
    assert!(!output.status.success(), "command unexpectedly succeeded");
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn as_i64(value: &Value, key: &str) -> i64 {
    value
        .get(key)
        .and_then(Value::as_i64)
        .unwrap_or_else(|| panic!("missing integer field `{key}` in payload: {value}"))
}

fn as_str<'a>(value: &'a Value, key: &str) -> &'a str {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing string field `{key}` in payload: {value}"))
}

fn assert_contract_version(value: &Value) {
    assert_eq!(as_str(value, "contract_version"), "cli.v1");
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap_or_else(|| panic!("path should be valid UTF-8: {}", path.display()))
}

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .unwrap_or_else(|err| panic!("failed to canonicalize repo root: {err}"))
}

fn read_json_file(path: &Path) -> Value {
    let body = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read JSON file {}: {err}", path.display()));
    serde_json::from_str(&body)
        .unwrap_or_else(|err| panic!("failed to parse JSON file {}: {err}", path.display()))
}

fn validate_schema(schema_file: &str, instance: &Value) {
    let schema_path = repo_root().join("contracts/v1/schemas").join(schema_file);
    let schema_json = read_json_file(&schema_path);
    let compiled = JSONSchema::compile(&schema_json)
        .unwrap_or_else(|err| panic!("failed to compile schema {}: {err}", schema_path.display()));

    let errors = compiled
        .validate(instance)
        .err()
        .map(|iter| iter.map(|err| err.to_string()).collect::<Vec<_>>());
    if let Some(errors) = errors {
        panic!("schema validation failed for {}:\n{}", schema_file, errors.join("\n"));
    }
}

fn write_seed_document(dir: &Path) -> PathBuf {
    let document = json!({
        "articles": [
            {
                "number": "14",
                "title": "Equality before law",
                "description": "The State shall not deny to any person equality before the law",
                "category": "Fundamental Rights",
                "keywords": ["equality", "discrimination"]
            },
            {
                "number": "21",
                "title": "Protection of life and personal liberty",
                "description": "No person shall be deprived of his life or personal liberty",
                "category": "Fundamental Rights",
                "keywords": ["life", "liberty", "privacy"]
            },
            {
                "number": "79",
                "title": "Constitution of Parliament",
                "description": "There shall be a Parliament for the Union",
                "category": "Parliament",
                "keywords": ["parliament", "lok sabha"]
            }
        ],
        "landmark_cases": [
            {
                "name": "Kesavananda Bharati case",
                "year": 1973,
                "significance": "Established the basic structure doctrine",
                "key_points": ["Basic structure of the Constitution cannot be amended"],
                "keywords": ["kesavananda", "basic structure"]
            },
            {
                "name": "Maneka Gandhi case",
                "year": "1978",
                "significance": "Due process reading of Article 21",
                "key_points": ["Procedure must be fair, just and reasonable"],
                "keywords": ["maneka", "personal liberty"]
            }
        ],
        "legal_procedures": [
            {
                "name": "Filing a PIL",
                "description": "Public Interest Litigation before a constitutional court",
                "procedure": "1. Identify the public interest issue\n2. Draft the petition",
                "keywords": ["pil", "public interest"]
            }
        ],
        "quick_replies": [
            "What is Article 21?",
            {"text": "How to file a PIL", "category": "procedures", "order": 5}
        ]
    });

    let path = dir.join("seed.json");
    let body = serde_json::to_vec_pretty(&document)
        .unwrap_or_else(|err| panic!("failed to serialize seed document: {err}"));
    fs::write(&path, body)
        .unwrap_or_else(|err| panic!("failed to write seed document {}: {err}", path.display()));
    path
}

#[test]
fn db_commands_cover_schema_version_and_migrate() {
    let sandbox = unique_temp_dir("lexadv-cli-db");
    let db_path = sandbox.join("advisor.sqlite3");

    let before = run_json(["--db", path_str(&db_path), "db", "schema-version"]);
    assert_contract_version(&before);
    assert_eq!(as_i64(&before, "current_version"), 0);
    assert_eq!(as_i64(&before, "target_version"), 2);

    let dry_run = run_json(["--db", path_str(&db_path), "db", "migrate", "--dry-run"]);
    assert_eq!(as_i64(&dry_run, "current_version"), 0);
    assert_eq!(
        dry_run
            .get("would_apply_versions")
            .and_then(Value::as_array)
            .map(std::vec::Vec::len)
            .unwrap_or_default(),
        2
    );

    // Dry-run must not advance the schema.
    let unchanged = run_json(["--db", path_str(&db_path), "db", "schema-version"]);
    assert_eq!(as_i64(&unchanged, "current_version"), 0);

    let migrate = run_json(["--db", path_str(&db_path), "db", "migrate"]);
    assert_eq!(as_i64(&migrate, "after_version"), 2);
    assert_eq!(migrate.get("up_to_date").and_then(Value::as_bool), Some(true));

    let after = run_json(["--db", path_str(&db_path), "db", "schema-version"]);
    assert_eq!(as_i64(&after, "current_version"), 2);
}

#[test]
fn db_commands_require_the_sqlite_backend() {
    let sandbox = unique_temp_dir("lexadv-cli-db-json");
    let data_path = sandbox.join("corpus.json");

    let stderr =
        run_failure(["--backend", "json", "--data", path_str(&data_path), "db", "migrate"]);
    assert!(stderr.contains("sqlite"), "unexpected stderr: {stderr}");
}

#[test]
fn seed_then_browse_the_corpus() {
    let sandbox = unique_temp_dir("lexadv-cli-browse");
    let db_path = sandbox.join("advisor.sqlite3");
    let seed_path = write_seed_document(&sandbox);

    let seeded = run_json([
        "--db",
        path_str(&db_path),
        "corpus",
        "seed",
        "--from",
        path_str(&seed_path),
        "--clear",
    ]);
    assert_contract_version(&seeded);
    assert_eq!(as_i64(&seeded, "articles"), 3);
    assert_eq!(as_i64(&seeded, "cases"), 2);
    assert_eq!(as_i64(&seeded, "procedures"), 1);
    assert_eq!(as_i64(&seeded, "quick_replies"), 2);

    let verify = run_json(["--db", path_str(&db_path), "corpus", "verify"]);
    assert_eq!(verify.get("empty").and_then(Value::as_bool), Some(false));
    assert!(as_str(&verify, "fingerprint").starts_with("corpus_"));
    assert!(as_str(&verify, "backend").starts_with("sqlite:"));

    let page = run_json([
        "--db",
        path_str(&db_path),
        "corpus",
        "articles",
        "--category",
        "fundamental rights",
    ]);
    assert_eq!(as_i64(&page, "total"), 2);

    let article = run_json(["--db", path_str(&db_path), "corpus", "article", "21"]);
    assert_eq!(as_str(&article, "title"), "Protection of life and personal liberty");

    let categories = run_json(["--db", path_str(&db_path), "corpus", "categories"]);
    assert_eq!(as_i64(&categories, "total"), 2);

    let cases =
        run_json(["--db", path_str(&db_path), "corpus", "cases", "--year", "1978"]);
    assert_eq!(as_i64(&cases, "total"), 1);

    let case = run_json(["--db", path_str(&db_path), "corpus", "case", "maneka gandhi case"]);
    assert_eq!(as_i64(&case, "year"), 1978);

    let procedure = run_json(["--db", path_str(&db_path), "corpus", "procedure", "filing a pil"]);
    assert!(as_str(&procedure, "procedure").starts_with("1."));

    let replies = run_json(["--db", path_str(&db_path), "corpus", "quick-replies"]);
    let items = replies
        .get("items")
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("quick replies payload should carry items: {replies}"));
    assert_eq!(items.len(), 2);
    // Bare seed strings get defaults and sort before the explicit order 5.
    assert_eq!(as_str(&items[0], "text"), "What is Article 21?");
    assert_eq!(as_str(&items[0], "category"), "general");

    let stderr = run_failure(["--db", path_str(&db_path), "corpus", "article", "370"]);
    assert!(stderr.contains("370"), "unexpected stderr: {stderr}");
}

#[test]
fn fingerprint_is_stable_across_backends() {
    let sandbox = unique_temp_dir("lexadv-cli-fingerprint");
    let db_path = sandbox.join("advisor.sqlite3");
    let data_path = sandbox.join("corpus.json");
    let seed_path = write_seed_document(&sandbox);

    run_json([
        "--db",
        path_str(&db_path),
        "corpus",
        "seed",
        "--from",
        path_str(&seed_path),
        "--clear",
    ]);
    run_json([
        "--backend",
        "json",
        "--data",
        path_str(&data_path),
        "corpus",
        "seed",
        "--from",
        path_str(&seed_path),
        "--clear",
    ]);

    let sqlite_verify = run_json(["--db", path_str(&db_path), "corpus", "verify"]);
    let json_verify =
        run_json(["--backend", "json", "--data", path_str(&data_path), "corpus", "verify"]);
    assert_eq!(as_str(&sqlite_verify, "fingerprint"), as_str(&json_verify, "fingerprint"));
    assert!(as_str(&json_verify, "backend").starts_with("json:"));
}

#[test]
fn query_commands_answer_and_classify() {
    let sandbox = unique_temp_dir("lexadv-cli-query");
    let db_path = sandbox.join("advisor.sqlite3");
    let seed_path = write_seed_document(&sandbox);

    run_json([
        "--db",
        path_str(&db_path),
        "corpus",
        "seed",
        "--from",
        path_str(&seed_path),
        "--clear",
    ]);

    let answer = run_json([
        "--db",
        path_str(&db_path),
        "query",
        "ask",
        "--text",
        "What is Article 21?",
    ]);
    assert_contract_version(&answer);
    assert_eq!(answer.get("success").and_then(Value::as_bool), Some(true));
    assert!(as_str(&answer, "message").contains("Article 21"));

    let case_answer = run_json([
        "--db",
        path_str(&db_path),
        "query",
        "ask",
        "--text",
        "tell me about the kesavananda judgment",
    ]);
    assert!(as_str(&case_answer, "message").contains("Kesavananda"));

    let intent = run_json([
        "--db",
        path_str(&db_path),
        "query",
        "intent",
        "--text",
        "how to file article 21 case",
    ]);
    assert_eq!(as_str(&intent, "intent"), "procedure");
    assert_eq!(as_str(&intent, "article_reference"), "21");

    let stderr = run_failure(["--db", path_str(&db_path), "query", "ask", "--text", "   "]);
    assert!(stderr.contains("non-empty"), "unexpected stderr: {stderr}");
}

#[test]
fn templates_file_overrides_fallback_texts() {
    let sandbox = unique_temp_dir("lexadv-cli-templates");
    let db_path = sandbox.join("advisor.sqlite3");
    let seed_path = write_seed_document(&sandbox);
    let templates_path = sandbox.join("templates.yaml");
    fs::write(&templates_path, "general: \"Custom guidance text.\"\n").unwrap_or_else(|err| {
        panic!("failed to write templates file {}: {err}", templates_path.display())
    });

    run_json([
        "--db",
        path_str(&db_path),
        "corpus",
        "seed",
        "--from",
        path_str(&seed_path),
        "--clear",
    ]);

    let answer = run_json([
        "--db",
        path_str(&db_path),
        "query",
        "ask",
        "--text",
        "zzz qqq xxx",
        "--templates",
        path_str(&templates_path),
    ]);
    assert_eq!(as_str(&answer, "message"), "Custom guidance text.");
}

#[test]
fn fix_duplicates_rewrites_the_seed_document() {
    let sandbox = unique_temp_dir("lexadv-cli-fixdup");
    let seed_path = sandbox.join("dirty.json");
    let document = json!({
        "articles": [
            {"number": "21", "title": "Short", "description": "short", "category": "c"},
            {"number": "14", "title": "Equality", "description": "equality text", "category": "c"},
            {"number": "21", "title": "Long", "description": "a much longer description", "category": "c"}
        ]
    });
    let body = serde_json::to_vec_pretty(&document)
        .unwrap_or_else(|err| panic!("failed to serialize dirty document: {err}"));
    fs::write(&seed_path, body)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", seed_path.display()));

    let report =
        run_json(["corpus", "fix-duplicates", "--from", path_str(&seed_path)]);
    validate_schema("corpus-fix-duplicates.response.schema.json", &report);
    assert_eq!(as_i64(&report, "scanned"), 3);
    assert_eq!(as_i64(&report, "removed"), 1);
    assert_eq!(as_i64(&report, "kept"), 2);

    let rewritten = read_json_file(&seed_path);
    let articles = rewritten
        .get("articles")
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("rewritten document should carry articles: {rewritten}"));
    assert_eq!(articles.len(), 2);
    assert_eq!(as_str(&articles[0], "title"), "Long");
}

#[test]
fn cli_outputs_validate_against_versioned_schemas() {
    let sandbox = unique_temp_dir("lexadv-cli-schemas");
    let db_path = sandbox.join("advisor.sqlite3");
    let seed_path = write_seed_document(&sandbox);

    let schema_version = run_json(["--db", path_str(&db_path), "db", "schema-version"]);
    validate_schema("db-schema-version.response.schema.json", &schema_version);

    let dry_run = run_json(["--db", path_str(&db_path), "db", "migrate", "--dry-run"]);
    validate_schema("db-migrate.response.schema.json", &dry_run);

    let migrate = run_json(["--db", path_str(&db_path), "db", "migrate"]);
    validate_schema("db-migrate.response.schema.json", &migrate);

    let seeded = run_json([
        "--db",
        path_str(&db_path),
        "corpus",
        "seed",
        "--from",
        path_str(&seed_path),
        "--clear",
    ]);
    validate_schema("corpus-seed.response.schema.json", &seeded);

    let verify = run_json(["--db", path_str(&db_path), "corpus", "verify"]);
    validate_schema("corpus-verify.response.schema.json", &verify);

    let page = run_json(["--db", path_str(&db_path), "corpus", "articles"]);
    validate_schema("articles-page.response.schema.json", &page);

    let answer = run_json([
        "--db",
        path_str(&db_path),
        "query",
        "ask",
        "--text",
        "What is Article 21?",
    ]);
    validate_schema("chat.response.schema.json", &answer);

    let fallback = run_json([
        "--db",
        path_str(&db_path),
        "query",
        "ask",
        "--text",
        "zzz qqq xxx",
    ]);
    validate_schema("chat.response.schema.json", &fallback);

    let intent = run_json([
        "--db",
        path_str(&db_path),
        "query",
        "intent",
        "--text",
        "how to file a case",
    ]);
    validate_schema("intent.response.schema.json", &intent);
}
