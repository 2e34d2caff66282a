//! Migration command for storyweld CLI
//!
//! This module provides the `storyweld migrate` command: every `.mdx` file
//! named on the command line (or found below a named directory) is split
//! into its rewritten documentation, written back in place, and a story
//! module written next to it.

use crate::config::ProjectConfig;
use crate::report::{Reporter, Summary};
use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use storyweld::{TransformOutput, Transformer};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Run the migrate command with the given arguments
pub fn run(args: &[String]) -> Result<()> {
    let cmd = MigrateCommand::parse(args)?;

    let cwd = env::current_dir().context("Failed to read the working directory")?;
    let config = ProjectConfig::discover(cmd.config.as_deref(), &cwd)?;
    let options = config.transform_options(cmd.parser.as_deref())?;
    let transformer = Transformer::new(options);

    let files = collect_files(&cmd.paths)?;
    if files.is_empty() {
        bail!("No .mdx files found");
    }

    let mut reporter = Reporter::stderr(cmd.color);
    let mut summary = Summary::default();
    for file in &files {
        match migrate_file(&transformer, file, cmd.dry_run) {
            Ok(output) => {
                summary.migrated += 1;
                summary.warnings += output.warning_count();
                for diagnostic in &output.diagnostics {
                    reporter.diagnostic(diagnostic)?;
                }
            }
            Err(e) => {
                summary.failed += 1;
                reporter.failure(&file.display().to_string(), &e)?;
            }
        }
    }
    reporter.summary(&summary)?;

    if summary.failed > 0 {
        bail!("{} file(s) could not be migrated", summary.failed);
    }
    Ok(())
}

/// Migrate command configuration
#[derive(Debug, PartialEq, Eq)]
struct MigrateCommand {
    /// Files and directories to migrate
    paths: Vec<PathBuf>,
    /// Script grammar, overriding the configuration file
    parser: Option<String>,
    /// Explicit configuration file
    config: Option<PathBuf>,
    /// Print results instead of writing them
    dry_run: bool,
    /// Colored diagnostics
    color: bool,
}

impl MigrateCommand {
    fn parse(args: &[String]) -> Result<Self> {
        let mut cmd = MigrateCommand {
            paths: Vec::new(),
            parser: None,
            config: None,
            dry_run: false,
            color: true,
        };

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--parser" | "-p" => {
                    if i + 1 < args.len() {
                        cmd.parser = Some(args[i + 1].clone());
                        i += 2;
                    } else {
                        bail!("--parser requires a value (tsx, ts, babel, flow or js)");
                    }
                }
                "--config" | "-c" => {
                    if i + 1 < args.len() {
                        cmd.config = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        bail!("--config requires a value");
                    }
                }
                "--dry-run" => {
                    cmd.dry_run = true;
                    i += 1;
                }
                "--no-color" => {
                    cmd.color = false;
                    i += 1;
                }
                arg if !arg.starts_with('-') => {
                    cmd.paths.push(PathBuf::from(arg));
                    i += 1;
                }
                _ => {
                    bail!("Unknown flag: {}", args[i]);
                }
            }
        }

        if cmd.paths.is_empty() {
            bail!("Usage: storyweld migrate [--parser <name>] [--dry-run] <path>...");
        }
        Ok(cmd)
    }
}

/// Expand directories into the `.mdx` files below them
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            bail!("Path not found: {}", path.display());
        }
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            if entry.file_type().is_file() && is_mdx(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    debug!(count = files.len(), "storyweld.cli.collect");
    Ok(files)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || name == "node_modules")
}

fn is_mdx(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "mdx")
}

/// Transform one file and write (or print) its two outputs
fn migrate_file(transformer: &Transformer, path: &Path, dry_run: bool) -> Result<TransformOutput> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let output = transformer.transform(&source, &path.to_string_lossy())?;
    let module_path = path.with_file_name(&output.file_name);

    if dry_run {
        println!("// {}", path.display());
        println!("{}", output.documentation);
        println!("// {}", module_path.display());
        println!("{}", output.module);
        return Ok(output);
    }

    if module_path.exists() {
        warn!(file = %module_path.display(), "storyweld.cli: overwriting existing story module");
    }
    fs::write(path, &output.documentation)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    fs::write(&module_path, &output.module)
        .with_context(|| format!("Failed to write {}", module_path.display()))?;
    debug!(doc = %path.display(), module = %module_path.display(), "storyweld.cli.written");
    Ok(output)
}
