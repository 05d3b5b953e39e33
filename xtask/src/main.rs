// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Wraps the cargo and tooling invocations used locally and in CI.
//!
//! ### Schema Verification
//!
//! `cargo xtask verify-schema` applies the embedded `SQLite` migrations to an
//! in-memory database and checks that:
//!
//! - every `diesel::table!` in `crates/persistence/src/diesel_schema.rs`
//!   matches the migrated tables column for column (type and nullability)
//! - the indexes and unique constraints the persistence layer relies on
//!   for correctness exist, and every foreign key targets a real column
//! - reverting every migration leaves no tables behind, and re-applying
//!   yields the same schema

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{fmt::Debug, io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

const DIESEL_SCHEMA_PATH: &str = "crates/persistence/src/diesel_schema.rs";

/// Indexes the persistence layer depends on for rule enforcement.
const REQUIRED_INDEXES: [(&str, &str); 2] = [
    ("section_members", "idx_section_members_one_active_student"),
    ("events", "idx_events_section_status"),
];

/// Unique constraints backing duplicate checks.
const REQUIRED_UNIQUE: [(&str, &[&str]); 3] = [
    ("users", &["email"]),
    ("sections", &["code"]),
    ("section_members", &["section_id", "user_id"]),
];

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, schema)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Generate code coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Check dependencies
    #[command(visible_alias = "cd")]
    Deny,

    /// Check unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Lint markdown files
    #[command(visible_alias = "md")]
    LintMarkdown,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix typos in the project
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Verify migrations against the Diesel schema
    #[command(visible_alias = "vs")]
    VerifySchema,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Deny => deny(),
            Self::Machete => machete(),
            Self::Coverage => coverage(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::LintMarkdown => lint_markdown(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::FixTypos => fix_typos(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifySchema => verify_schema(),
        }
    }
}

/// Run CI checks (lint, build, test, schema)
fn ci() -> Result<()> {
    lint()?;
    deny()?;
    machete()?;
    build()?;
    test()?;
    verify_schema()?;
    Ok(())
}

fn deny() -> Result<()> {
    run_cargo(vec!["deny", "check"])
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Generate code coverage report
fn coverage() -> Result<()> {
    run_cargo(vec![
        "llvm-cov",
        "--lcov",
        "--output-path",
        "target/lcov.info",
        "--all-features",
    ])
}

/// Lint formatting, typos, clippy, and docs (and a soft fail on markdown)
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    if let Err(err) = lint_markdown() {
        tracing::warn!("markdownlint reported issues: {err}");
    }
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Lint markdown files using [markdownlint-cli2](https://github.com/DavidAnson/markdownlint-cli2)
fn lint_markdown() -> Result<()> {
    cmd!("markdownlint-cli2", "**/*.md", "!target", "!**/target").run_with_trace()?;

    Ok(())
}

/// Check for typos in the project using [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

/// Fix typos in the project
fn fix_typos() -> Result<()> {
    cmd!("typos", "-w").run_with_trace()?;
    Ok(())
}

/// Run tests for libs and docs
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

/// Run doc tests for the workspace's default packages
fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run lib tests for the workspace's default packages
fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Verify the migrations against the Diesel schema
///
/// ## What This Command Does
///
/// 1. Applies the embedded migrations to an in-memory `SQLite` database
/// 2. Introspects the resulting schema (columns, keys, indexes)
/// 3. Compares it with the `diesel::table!` definitions
/// 4. Checks required indexes, unique constraints and foreign key targets
/// 5. Reverts every migration and checks that no tables remain
/// 6. Re-applies the migrations and checks the schema is unchanged
///
/// ## Failures
///
/// The command fails if any migration fails to apply or revert, or if any
/// of the checks above find a mismatch.
fn verify_schema() -> Result<()> {
    tracing::info!("Starting schema verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;
    tracing::info!("Migrations applied successfully");

    let migrated: Schema = introspect_sqlite_schema(&mut conn)?;

    let source: String = std::fs::read_to_string(DIESEL_SCHEMA_PATH)
        .wrap_err(format!("Failed to read {DIESEL_SCHEMA_PATH}"))?;
    let declared: BTreeMap<String, DeclaredTable> = parse_diesel_schema(&source)?;

    tracing::info!("Comparing migrated schema with Diesel definitions");
    compare_with_diesel(&migrated, &declared)?;

    tracing::info!("Checking constraints");
    check_constraints(&migrated)?;

    tracing::info!("Reverting all migrations");
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert migrations: {e}"))?;
    let reverted: Schema = introspect_sqlite_schema(&mut conn)?;
    if !reverted.tables.is_empty() {
        let leftover: Vec<&String> = reverted.tables.keys().collect();
        return Err(eyre!("Tables remain after revert: {leftover:?}"));
    }

    tracing::info!("Re-applying migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to re-apply migrations: {e}"))?;
    let reapplied: Schema = introspect_sqlite_schema(&mut conn)?;
    if reapplied != migrated {
        return Err(eyre!("Schema differs after revert and re-apply"));
    }

    tracing::info!("✓ Schema verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<UniqueConstraint>,
    indexes: BTreeSet<Index>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    name: String,
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UniqueConstraint {
    columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Index {
    name: String,
    columns: Vec<String>,
}

/// Introspect `SQLite` schema
#[allow(clippy::too_many_lines)]
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
            foreign_keys: BTreeSet::new(),
            unique_constraints: BTreeSet::new(),
            indexes: BTreeSet::new(),
        };

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            // INTEGER PRIMARY KEY aliases the rowid and is never null
            let nullable: bool = col.notnull == 0 && col.pk == 0;
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    name: col.name.clone(),
                    normalized_type: normalize_sqlite_type(&col.r#type),
                    nullable,
                },
            );

            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            });
        }

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        for idx in indexes {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

            let column_names: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

            if idx.origin == "u" {
                table_info.unique_constraints.insert(UniqueConstraint {
                    columns: column_names,
                });
            } else if !idx.name.starts_with("sqlite_autoindex_") {
                table_info.indexes.insert(Index {
                    name: idx.name,
                    columns: column_names,
                });
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Normalize `SQLite` type to common representation
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let normalized = sqlite_type.to_uppercase();
    if normalized.contains("INT") {
        "integer".to_string()
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real".to_string()
    } else if normalized.contains("BLOB") {
        "blob".to_string()
    } else {
        "text".to_string()
    }
}

/// Normalize a Diesel SQL type name to the same representation
fn normalize_diesel_type(diesel_type: &str) -> String {
    match diesel_type {
        "Integer" | "BigInt" | "SmallInt" | "Bool" => "integer".to_string(),
        "Float" | "Double" => "real".to_string(),
        "Binary" => "blob".to_string(),
        _ => "text".to_string(),
    }
}

/// A table as declared by `diesel::table!`
#[derive(Debug, Default)]
struct DeclaredTable {
    primary_keys: BTreeSet<String>,
    columns: BTreeMap<String, Column>,
}

/// Parse `diesel::table!` blocks into table and column definitions
///
/// Only the shape `diesel print-schema` emits is understood: one
/// `name (pk) {` header per table and one `column -> Type,` line per column.
fn parse_diesel_schema(source: &str) -> Result<BTreeMap<String, DeclaredTable>> {
    let mut tables: BTreeMap<String, DeclaredTable> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in source.lines().map(str::trim) {
        if line.ends_with('{') && !line.starts_with("diesel::") {
            let (name, keys) = line
                .trim_end_matches('{')
                .split_once('(')
                .ok_or_else(|| eyre!("Malformed table header: {line}"))?;
            let primary_keys: BTreeSet<String> = keys
                .trim()
                .trim_end_matches(')')
                .split(',')
                .map(|key| key.trim().to_string())
                .collect();
            let name: String = name.trim().to_string();
            tables.insert(
                name.clone(),
                DeclaredTable {
                    primary_keys,
                    columns: BTreeMap::new(),
                },
            );
            current = Some(name);
        } else if let Some((column, sql_type)) = line.split_once("->") {
            let table: &String = current
                .as_ref()
                .ok_or_else(|| eyre!("Column outside of a table: {line}"))?;
            let column: String = column.trim().to_string();
            let sql_type: &str = sql_type.trim().trim_end_matches(',');
            let (nullable, inner) = sql_type
                .strip_prefix("Nullable<")
                .and_then(|rest| rest.strip_suffix('>'))
                .map_or((false, sql_type), |inner| (true, inner));

            if let Some(declared) = tables.get_mut(table) {
                declared.columns.insert(
                    column.clone(),
                    Column {
                        name: column,
                        normalized_type: normalize_diesel_type(inner),
                        nullable,
                    },
                );
            }
        } else if line == "}" {
            current = None;
        }
    }

    if tables.is_empty() {
        return Err(eyre!("No diesel::table! definitions found"));
    }
    Ok(tables)
}

/// Compare the migrated schema with the Diesel definitions and fail on mismatch
fn compare_with_diesel(migrated: &Schema, declared: &BTreeMap<String, DeclaredTable>) -> Result<()> {
    let migrated_tables: BTreeSet<&String> = migrated.tables.keys().collect();
    let declared_tables: BTreeSet<&String> = declared.keys().collect();

    let mut mismatches: Vec<String> = Vec::new();

    for missing in declared_tables.difference(&migrated_tables) {
        mismatches.push(format!("table {missing} is declared but not migrated"));
    }
    for extra in migrated_tables.difference(&declared_tables) {
        mismatches.push(format!("table {extra} is migrated but not declared"));
    }

    for (name, declared_table) in declared {
        let Some(table) = migrated.tables.get(name) else {
            continue;
        };
        if table.primary_keys != declared_table.primary_keys {
            mismatches.push(format!(
                "{name}: declared primary key {:?}, migrated {:?}",
                declared_table.primary_keys, table.primary_keys
            ));
        }
        let columns: &BTreeMap<String, Column> = &declared_table.columns;
        for (column_name, column) in columns {
            match table.columns.get(column_name) {
                None => mismatches.push(format!("{name}.{column_name} is not migrated")),
                Some(actual) if actual != column => mismatches.push(format!(
                    "{name}.{}: declared {} (nullable: {}), migrated {} (nullable: {})",
                    column.name,
                    column.normalized_type,
                    column.nullable,
                    actual.normalized_type,
                    actual.nullable
                )),
                Some(_) => {}
            }
        }
        for column_name in table.columns.keys() {
            if !columns.contains_key(column_name) {
                mismatches.push(format!("{name}.{column_name} is not declared"));
            }
        }
    }

    if mismatches.is_empty() {
        return Ok(());
    }
    for mismatch in &mismatches {
        tracing::error!("{mismatch}");
    }
    Err(eyre!(
        "Schema mismatch: {} difference(s) found",
        mismatches.len()
    ))
}

/// Fail if a required index or unique constraint is missing, or a foreign
/// key points at a table or column that does not exist
fn check_constraints(schema: &Schema) -> Result<()> {
    for (table, index) in REQUIRED_INDEXES {
        let present: bool = schema
            .tables
            .get(table)
            .is_some_and(|t| t.indexes.iter().any(|i| i.name == index));
        if !present {
            return Err(eyre!("Required index {index} missing on {table}"));
        }
    }

    for (table, columns) in REQUIRED_UNIQUE {
        let expected: Vec<String> = columns.iter().map(ToString::to_string).collect();
        let present: bool = schema
            .tables
            .get(table)
            .is_some_and(|t| t.unique_constraints.iter().any(|u| u.columns == expected));
        if !present {
            return Err(eyre!("Required unique constraint {expected:?} missing on {table}"));
        }
    }

    for (name, table) in &schema.tables {
        for fk in &table.foreign_keys {
            let target_exists: bool = schema
                .tables
                .get(&fk.to_table)
                .is_some_and(|t| t.columns.contains_key(&fk.to_column));
            if !target_exists {
                return Err(eyre!(
                    "{name}.{} references missing {}.{}",
                    fk.from_column,
                    fk.to_table,
                    fk.to_column
                ));
            }
        }
    }

    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
