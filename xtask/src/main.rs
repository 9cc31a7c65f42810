// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Build, lint, test and coverage commands for the enrolall workspace, plus
//! a migration check for the `SQLite` store. Run through the `cargo xtask`
//! alias in `.cargo/config.toml`.
//!
//! ### Migration Verification
//!
//! `cargo xtask verify-migrations` applies the embedded migrations to an
//! in-memory database, checks the tables, keys and unique constraints the
//! persistence layer relies on, reverts every migration and applies them
//! again, failing if the second schema differs from the first.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
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
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Lint, build, test and verify migrations
    CI,

    /// Build every target
    #[command(visible_alias = "b")]
    Build,

    /// Type-check every target
    #[command(visible_alias = "c")]
    Check,

    /// Write an lcov coverage report to `target/lcov.info`
    #[command(visible_alias = "cov")]
    Coverage,

    /// Look for unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Run clippy, rustdoc and rustfmt checks
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy with warnings denied
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Build the docs of every workspace crate with warnings denied
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check formatting
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Apply clippy suggestions
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Format the workspace
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run unit, integration and doc tests
    #[command(visible_alias = "t")]
    Test,

    /// Verify that the `SQLite` migrations apply, revert and reapply cleanly
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => cargo(&["build", "--all-targets"]),
            Self::Check => cargo(&["check", "--all-targets"]),
            Self::Coverage => cargo(&[
                "llvm-cov",
                "--workspace",
                "--lcov",
                "--output-path",
                "target/lcov.info",
            ]),
            Self::Machete => {
                cmd!("cargo-machete").run_with_trace()?;
                Ok(())
            }
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => cargo(&["fmt", "--all", "--check"]),
            Self::FixClippy => cargo(&[
                "clippy",
                "--all-targets",
                "--fix",
                "--allow-dirty",
                "--allow-staged",
            ]),
            Self::FixFormatting => cargo(&["fmt", "--all"]),
            Self::Test => test(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

fn ci() -> Result<()> {
    lint()?;
    cargo(&["build", "--all-targets"])?;
    test()?;
    verify_migrations()
}

fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    cargo(&["fmt", "--all", "--check"])
}

fn lint_clippy() -> Result<()> {
    cargo(&["clippy", "--all-targets", "--", "-D", "warnings"])
}

/// Documents each workspace crate on its own so a broken intra-doc link
/// names the crate it lives in.
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd("cargo", ["doc", "--no-deps", "--package", &package.name])
            .env("RUSTDOCFLAGS", "-D warnings")
            .run_with_trace()?;
    }
    Ok(())
}

fn test() -> Result<()> {
    cargo(&["test", "--workspace", "--all-targets"])?;
    cargo(&["test", "--workspace", "--doc"])
}

fn cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args.iter().copied()).run_with_trace()?;
    Ok(())
}

/// Tables the persistence layer reads or writes.
const EXPECTED_TABLES: [&str; 7] = [
    "capability_grants",
    "course_categories",
    "courses",
    "enrol",
    "operators",
    "sessions",
    "user_enrolments",
];

/// Foreign keys as (table, column, referenced table).
const EXPECTED_FOREIGN_KEYS: [(&str, &str, &str); 5] = [
    ("capability_grants", "course_id", "courses"),
    ("capability_grants", "operator_id", "operators"),
    ("enrol", "course_id", "courses"),
    ("sessions", "operator_id", "operators"),
    ("user_enrolments", "instance_id", "enrol"),
];

/// Unique constraints as (table, columns).
const EXPECTED_UNIQUE: [(&str, &[&str]); 5] = [
    ("capability_grants", &["operator_id", "course_id", "capability"]),
    ("courses", &["shortname"]),
    ("operators", &["login_name"]),
    ("sessions", &["session_token"]),
    ("user_enrolments", &["instance_id", "user_name"]),
];

/// Verify the `SQLite` migrations
///
/// ## What This Command Does
///
/// 1. Applies every embedded migration to an in-memory database with
///    foreign keys enabled
/// 2. Checks the expected tables, foreign keys and unique constraints
/// 3. Reverts every migration and checks that no table is left behind
/// 4. Applies the migrations again and compares the resulting schema with
///    the first one
///
/// ## Usage
///
/// ```bash
/// cargo xtask verify-migrations
/// ```
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{embed_migrations, MigrationHarness};

    const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Starting migration verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply migrations: {}", e))?;
    tracing::info!("Migrations applied successfully");

    let applied = introspect_sqlite_schema(&mut conn)?;
    check_expected_schema(&applied)?;

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to revert migrations: {}", e))?;
    let reverted = introspect_sqlite_schema(&mut conn)?;
    if !reverted.tables.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "Tables left after reverting migrations: {:?}",
            reverted.tables.keys().collect::<Vec<_>>()
        ));
    }
    tracing::info!("Migrations reverted successfully");

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to reapply migrations: {}", e))?;
    let reapplied = introspect_sqlite_schema(&mut conn)?;
    if reapplied != applied {
        return Err(color_eyre::eyre::eyre!(
            "Schema after reapplying migrations differs from the first application"
        ));
    }

    tracing::info!("✓ Migration verification passed");
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
    use diesel::RunQueryDsl;

    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Integer)]
        #[allow(dead_code)]
        cid: i32,
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
        #[diesel(sql_type = Integer)]
        #[allow(dead_code)]
        unique: i32,
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

    // Get all tables
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

        // Get columns
        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            let normalized_type = normalize_sqlite_type(&col.r#type);
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    name: col.name.clone(),
                    normalized_type,
                    nullable: col.notnull == 0,
                },
            );

            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        // Get foreign keys
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

        // Get indexes and unique constraints
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

            // If origin is 'u', it's a unique constraint (including sqlite_autoindex_*)
            if idx.origin == "u" {
                table_info.unique_constraints.insert(UniqueConstraint {
                    columns: column_names,
                });
            } else if !idx.name.starts_with("sqlite_autoindex_") {
                // Regular index (skip auto-generated indexes that aren't unique constraints)
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
    } else if normalized.contains("TEXT")
        || normalized.contains("CHAR")
        || normalized.contains("CLOB")
    {
        "text".to_string()
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real".to_string()
    } else if normalized.contains("BLOB") {
        "blob".to_string()
    } else {
        "text".to_string() // Default for SQLite
    }
}

/// Check the schema against what the persistence layer relies on
fn check_expected_schema(schema: &Schema) -> Result<()> {
    let mut errors = Vec::new();

    for (name, table) in &schema.tables {
        for column in table.columns.values() {
            tracing::debug!(
                "{name}.{} {} (nullable: {})",
                column.name,
                column.normalized_type,
                column.nullable
            );
        }
        for fk in &table.foreign_keys {
            tracing::debug!(
                "{name}.{} -> {}.{}",
                fk.from_column,
                fk.to_table,
                fk.to_column
            );
        }
        for index in &table.indexes {
            tracing::debug!("{name} index {} on {:?}", index.name, index.columns);
        }
        if table.primary_keys.is_empty() {
            errors.push(format!("Table without primary key: {name}"));
        }
    }

    for table in EXPECTED_TABLES {
        if !schema.tables.contains_key(table) {
            errors.push(format!("Missing table: {table}"));
        }
    }

    for (table, column, to_table) in EXPECTED_FOREIGN_KEYS {
        let found = schema.tables.get(table).is_some_and(|info| {
            info.foreign_keys
                .iter()
                .any(|fk| fk.from_column == column && fk.to_table == to_table)
        });
        if !found {
            errors.push(format!("Missing foreign key: {table}.{column} -> {to_table}"));
        }
    }

    for (table, columns) in EXPECTED_UNIQUE {
        let expected: Vec<String> = columns.iter().map(|c| (*c).to_string()).collect();
        let found = schema.tables.get(table).is_some_and(|info| {
            info.unique_constraints
                .iter()
                .any(|unique| unique.columns == expected)
        });
        if !found {
            errors.push(format!(
                "Missing unique constraint on {table}({})",
                columns.join(", ")
            ));
        }
    }

    if !errors.is_empty() {
        tracing::error!("Schema verification failed with {} errors:", errors.len());
        for error in &errors {
            tracing::error!("  - {}", error);
        }
        return Err(color_eyre::eyre::eyre!(
            "Schema verification failed: {} errors found",
            errors.len()
        ));
    }

    tracing::info!("✓ Expected tables, keys and unique constraints present");
    Ok(())
}

/// Logs a `duct` command before running it.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run()
            .inspect_err(|_| tracing::error!("failed to run command: {:?}", self))
    }
}
