//! Application orchestrator.
//! Merges config sources, prompts for missing paths, initializes logging,
//! installs the Ctrl-C handler, runs the sort and prints the summary.

use anyhow::{Context, Result, bail};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::{debug, error, warn};

use ext_sorter::cli::{Args, sanitize_path};
use ext_sorter::config::{create_template_config, load_config_from_xml};
use ext_sorter::output as out;
use ext_sorter::{Config, SortError, default_config_path, shutdown, sort_tree};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        match default_config_path() {
            Some(p) => {
                out::print_info(&format!("ext_sorter config path:\n  {}", p.display()));
                if !p.exists() {
                    out::print_info("No config file exists there yet. Run with --init-config to create a template.");
                }
            }
            None => out::print_error("Could not determine a config path."),
        }
        return Ok(());
    }

    if args.init_config {
        let path = default_config_path().context("could not determine a config path")?;
        create_template_config(&path)?;
        out::print_success(&format!("A template config was written to: {}", path.display()));
        return Ok(());
    }

    // Defaults < XML file < CLI flags.
    let mut cfg = Config::default();
    if let Some(file_cfg) = load_config_from_xml()? {
        file_cfg.apply_to(&mut cfg)?;
    }
    args.apply_overrides(&mut cfg);
    if let Some(raw) = args.log_level.as_deref()
        && !args.debug
        && args.effective_log_level().is_none()
    {
        out::print_warn(&format!("Unknown log level '{raw}'; using '{}'", cfg.log_level));
    }

    {
        let stdin = io::stdin();
        prompt_missing_paths(&mut cfg, &mut stdin.lock())?;
    }

    let guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
    })?;

    ctrlc::set_handler(|| {
        if shutdown::is_requested() {
            // second Ctrl-C: stop without waiting for running copies
            std::process::exit(130);
        }
        shutdown::request();
        out::print_warn("Received interrupt; finishing running copies and skipping the rest...");
    })
    .context("install Ctrl-C handler")?;

    debug!("Starting ext_sorter: {:?}", args);

    let result = sort_tree(&cfg);
    match &result {
        Ok(report) => {
            out::print_user(&report.summary());
            if report.interrupted {
                let e = SortError::Interrupted;
                warn!(code = e.code(), skipped = report.skipped, "{e}");
                out::print_warn("Run was interrupted; some files were not copied.");
            }
        }
        Err(e) => match e.downcast_ref::<SortError>() {
            Some(se) => error!(code = se.code(), error = %se, "Sort aborted before start"),
            None => error!(error = %format!("{e:#}"), "Sort aborted before start"),
        },
    }

    // Flush the file appender before the process exits.
    drop(guard);
    result.map(|_| ())
}

/// Ask on stdout for any root not supplied by flags or config, reading answers
/// line by line from `input`.
fn prompt_missing_paths(cfg: &mut Config, input: &mut impl BufRead) -> Result<()> {
    if cfg.source_dir.is_none() {
        cfg.source_dir = Some(prompt_path(
            input,
            "Enter the source folder to read files from:",
        )?);
    }
    if cfg.target_dir.is_none() {
        cfg.target_dir = Some(prompt_path(
            input,
            "Enter the target folder to copy files to:",
        )?);
    }
    Ok(())
}

fn prompt_path(input: &mut impl BufRead, question: &str) -> Result<PathBuf> {
    out::print_prompt(question);
    let mut line = String::new();
    if input.read_line(&mut line).context("read answer from stdin")? == 0 {
        bail!("no answer given for: {question}");
    }
    let path = sanitize_path(&line);
    if path.as_os_str().is_empty() {
        bail!("empty path given for: {question}");
    }
    Ok(path)
}
