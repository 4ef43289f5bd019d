//! Command dispatch

use std::io::{self, Read as _};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::context::ScriptContext;
use crate::domain::{pack, unpack, unpack_join, Request};
use crate::infrastructure::formats::FormatRegistry;
use crate::infrastructure::traits::{BuildRunner, RedoRunner};
use crate::{ApplicationError, ReaderService, WriterService};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Read { request, ignore } => _read(cli, request, *ignore),
        Commands::Ensure { files } => _ensure(files),
        Commands::Write { file } => _write(file),
        Commands::Output => _output(cli),
        Commands::Info => _info(cli),
        Commands::Pack { level, parts } => _pack(parts, *level),
        Commands::Unpack { level, join, name } => _unpack(name, *level, *join),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Rebuild the redo context from the forwarded `$1 $2 $3` options.
fn script_context(cli: &Cli) -> CliResult<ScriptContext> {
    let (Some(target), Some(base), Some(temp)) = (&cli.target, &cli.base, &cli.temp) else {
        return Err(CliError::Usage(
            "redo context required: pass --target \"$1\" --base \"$2\" --temp \"$3\"".to_string(),
        ));
    };
    let args = vec![
        "do".to_string(),
        target.display().to_string(),
        base.clone(),
        temp.display().to_string(),
    ];
    ScriptContext::from_args(&args, cli.no_redo_active())
        .ok_or_else(|| CliError::InvalidArgs("cannot derive redo context".to_string()))
}

/// Parse a request description: valid JSON is taken as-is, anything else is
/// a bare filename.
fn parse_request(description: &str) -> CliResult<Request> {
    let value = serde_json::from_str::<Value>(description)
        .unwrap_or_else(|_| Value::String(description.to_string()));
    Ok(Request::from_json(&value)?)
}

fn stdin_value() -> CliResult<Value> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| CliError::Io {
            context: "read value from stdin".to_string(),
            source: e,
        })?;
    serde_json::from_str(&buffer).map_err(|e| CliError::Application(ApplicationError::failed(
        "parse stdin as JSON",
        e,
    )))
}

#[instrument(skip(cli))]
fn _read(cli: &Cli, description: &str, ignore: bool) -> CliResult<()> {
    let request = parse_request(description)?;
    debug!(leaves = request.leaf_count(), ignore, "read");
    let reader = ReaderService::new(
        Arc::new(RedoRunner),
        Arc::new(FormatRegistry::with_defaults()),
        !cli.no_redo_active(),
    );
    let result = if ignore {
        reader.read_ignored(&request)?
    } else {
        reader.read(&request)?
    };
    println!("{}", serde_json::to_string_pretty(&result.into_json()).expect("JSON tree serializes"));
    Ok(())
}

#[instrument]
fn _ensure(files: &[String]) -> CliResult<()> {
    let status = RedoRunner.ensure_fresh(files).map_err(|e| CliError::Io {
        context: "invoke redo-ifchange".to_string(),
        source: e,
    })?;
    if status != 0 {
        // Same fail-fast policy as the reader: propagate the builder's
        // status verbatim.
        error!(status, "redo-ifchange failed");
        process::exit(status);
    }
    Ok(())
}

#[instrument]
fn _write(file: &PathBuf) -> CliResult<()> {
    let value = stdin_value()?;
    let writer = WriterService::new(Arc::new(FormatRegistry::with_defaults()));
    writer.write(&value, file)?;
    Ok(())
}

#[instrument(skip(cli))]
fn _output(cli: &Cli) -> CliResult<()> {
    let ctx = script_context(cli)?;
    let value = stdin_value()?;
    let writer = WriterService::new(Arc::new(FormatRegistry::with_defaults()));
    writer.output(&value, &ctx)?;
    Ok(())
}

#[instrument(skip(cli))]
fn _info(cli: &Cli) -> CliResult<()> {
    match script_context(cli) {
        Ok(ctx) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ctx).expect("context serializes")
            );
            println!("snippets: {}", ctx.snippets.segments().join(" "));
        }
        Err(_) => println!("no redo context"),
    }
    let registry = FormatRegistry::with_defaults();
    println!("formats: {}", registry.extensions().join(", "));
    Ok(())
}

#[instrument]
fn _pack(parts: &[String], level: usize) -> CliResult<()> {
    println!("{}", pack(parts, level)?);
    Ok(())
}

#[instrument]
fn _unpack(name: &str, level: usize, join: bool) -> CliResult<()> {
    if join {
        println!("{}", unpack_join(name, level)?);
    } else {
        for part in unpack(name, level)? {
            println!("{part}");
        }
    }
    Ok(())
}
