//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::engine::RecordFetcher;
use crate::error::Result;
use crate::pagination::StrategyKind;
use crate::query::Query;
use crate::types::{Record, SortKey};
use serde_json::Value;
use std::io::Write;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                strategy,
                app,
                filter,
                sort,
                fields,
                limit,
                offset,
                format,
            } => {
                let query = build_query(
                    app.as_deref(),
                    filter.as_deref(),
                    sort,
                    fields,
                    *limit,
                    *offset,
                )?;
                self.fetch(&query, (*strategy).into(), *format).await
            }
            Commands::Compare { app, filter } => {
                let query = build_query(app.as_deref(), filter.as_deref(), &[], &[], None, None)?;
                self.compare(&query).await
            }
            Commands::Validate => self.validate(),
        }
    }

    /// Load configuration from the file given with `--config`, then the environment
    fn load_config(&self) -> Result<ClientConfig> {
        let config = match &self.cli.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        Ok(config.with_env_overrides())
    }

    fn build_fetcher(&self) -> Result<RecordFetcher> {
        self.load_config()?.build_fetcher()
    }

    /// Fetch with one strategy and print the records
    async fn fetch(&self, query: &Query, kind: StrategyKind, format: OutputFormat) -> Result<()> {
        let fetcher = self.build_fetcher()?;
        let report = fetcher.fetch_with(query, kind).await?;

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        write_records(&mut out, &report.records, format)?;
        out.flush()?;
        Ok(())
    }

    /// Run every strategy and print `strategy count` lines
    async fn compare(&self, query: &Query) -> Result<()> {
        let fetcher = self.build_fetcher()?;
        let mut first_error = None;

        for kind in StrategyKind::ALL {
            match fetcher.fetch_with(query, kind).await {
                Ok(report) => println!("{}", count_line(kind, report.records.len())),
                Err(e) => {
                    warn!(strategy = %kind, error = %e, "strategy failed");
                    println!("{kind} failed: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        config.validate()?;
        info!(base_url = %config.base_url, "configuration is valid");
        println!("Configuration is valid");
        Ok(())
    }
}

/// Build a query from command-line arguments
pub(crate) fn build_query(
    app: Option<&str>,
    filter: Option<&str>,
    sort: &[String],
    fields: &[String],
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<Query> {
    let mut query = Query::new().fields(fields.iter().map(String::as_str));
    if let Some(app) = app {
        query = query.app(app);
    }
    if let Some(filter) = filter {
        query = query.filter(filter);
    }
    for key in sort {
        query = query.sort(key.parse::<SortKey>()?);
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    if let Some(offset) = offset {
        query = query.offset(offset);
    }
    Ok(query)
}

fn count_line(kind: StrategyKind, count: usize) -> String {
    format!("{kind} {count}")
}

/// Write records in the requested format
pub(crate) fn write_records(
    out: &mut impl Write,
    records: &[Record],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            for record in records {
                serde_json::to_writer(&mut *out, &record.fields)?;
                writeln!(out)?;
            }
        }
        OutputFormat::Pretty => {
            let all: Vec<Value> = records
                .iter()
                .map(|r| Value::Object(r.fields.clone()))
                .collect();
            serde_json::to_writer_pretty(&mut *out, &all)?;
            writeln!(out)?;
        }
        OutputFormat::Count => writeln!(out, "{}", records.len())?,
    }
    Ok(())
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("command", &self.cli.command)
            .finish_non_exhaustive()
    }
}
