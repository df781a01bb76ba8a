//! Subcommand bodies.
//!
//! Each command returns what it would print so the binary stays a thin
//! shell around argument parsing, logging setup and the exit status.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use lineage::{Hierarchy, Linearizer};
use tracing::{debug, error, info};

use crate::{check, render, CheckReport, Config, Document, OutputFormat};

/// Builds the effective configuration.
///
/// The JSON file at `config_path` (or the defaults) comes first; `format`
/// and `root` from the command line override it.
pub fn build_config(
    config_path: Option<&Path>,
    format: Option<OutputFormat>,
    root: Option<&str>,
) -> Result<Config> {
    let mut config = if let Some(config_path) = config_path {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?
    } else {
        Config::default()
    };

    // Override with CLI options
    if let Some(format) = format {
        config.output.format = format;
    }
    if let Some(root) = root {
        config.default_root = Some(root.to_string());
    }

    Ok(config)
}

fn load_hierarchy(config: &Config, file: &Path) -> Result<(Document, Hierarchy<String>)> {
    let document = Document::load(file)
        .with_context(|| format!("Failed to load hierarchy: {}", file.display()))?;
    let hierarchy = document.hierarchy(config.default_root.as_deref());
    debug!("Loaded {} classes from {}", hierarchy.len(), file.display());
    Ok((document, hierarchy))
}

/// `mro`: renders the orders of `classes`, or of every class when `all` is
/// set or no class is named.
pub fn cmd_mro(config: &Config, file: &Path, classes: &[String], all: bool) -> Result<String> {
    let (_, hierarchy) = load_hierarchy(config, file)?;
    let mut linearizer = Linearizer::new(&hierarchy);

    let orders = if all || classes.is_empty() {
        linearizer.linearize_all()?
    } else {
        let mut orders = IndexMap::new();
        for class in classes {
            let order = linearizer
                .linearize(class)
                .with_context(|| format!("Failed to linearize {}", class))?;
            orders.insert(class.clone(), order);
        }
        orders
    };

    Ok(render(&orders, &config.output)?)
}

/// Result of the `check` subcommand.
#[derive(Debug)]
pub struct CheckOutcome {
    /// Every problem found, plus the orders that did linearize.
    pub report: CheckReport,
    /// Orders to print: only for a clean check in JSON format.
    pub output: Option<String>,
}

impl CheckOutcome {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        if self.report.is_ok() {
            0
        } else {
            1
        }
    }
}

/// `check`: validates and linearizes every class, logging each failure.
pub fn cmd_check(config: &Config, file: &Path) -> Result<CheckOutcome> {
    let (_, hierarchy) = load_hierarchy(config, file)?;
    let report = check(&hierarchy);

    if let Some(problem) = &report.structural {
        error!("{}: {}", problem.kind(), problem);
    }
    for (class, problem) in &report.failures {
        error!("{}: {}: {}", class, problem.kind(), problem);
    }

    info!(
        "Checked {} classes, {} failed",
        hierarchy.len(),
        report.failures.len()
    );

    let output = if report.is_ok() && config.output.format == OutputFormat::Json {
        Some(render(&report.orders, &config.output)?)
    } else {
        None
    };
    Ok(CheckOutcome { report, output })
}

/// `lookup`: names the class that provides `name` for `class`, searching
/// strictly after `after` when given.
pub fn cmd_lookup(
    config: &Config,
    file: &Path,
    class: &str,
    name: &str,
    after: Option<&str>,
) -> Result<String> {
    let (document, hierarchy) = load_hierarchy(config, file)?;
    let methods = document.method_table();
    let mut linearizer = Linearizer::new(&hierarchy);

    let class = class.to_string();
    let found = match after {
        Some(after) => methods.resolve_after(&mut linearizer, &class, &after.to_string(), name)?,
        None => methods.resolve(&mut linearizer, &class, name)?,
    };

    match (found, after) {
        (Some(provider), _) => Ok(format!("{}.{} -> {}", class, name, provider)),
        (None, Some(after)) => bail!(
            "`{}` is not defined after `{}` in the MRO of `{}`",
            name,
            after,
            class
        ),
        (None, None) => bail!("`{}` is not defined anywhere in the MRO of `{}`", name, class),
    }
}
