//! rulewire - translate validation constraint tables into JSON-logic rules

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn};
use rulewire::translate::{BuiltinStrategy, ConstraintTable, TranslationResult, Translator};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Translate a JSON table of per-field constraints into JSON-logic rules
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Constraint table to read, `-` for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Map a constraint name to a built-in strategy (NAME=STRATEGY)
    #[arg(short, long = "alias", value_name = "NAME=STRATEGY")]
    aliases: Vec<String>,

    /// Skip fields whose constraints cannot be translated instead of failing
    #[arg(short, long)]
    keep_going: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let table = read_table(&args.input)?;
    info!("read {} field(s)", table.len());

    let mut translator = Translator::new();
    for alias in &args.aliases {
        let (name, strategy) = parse_alias(alias)?;
        if translator.register(name.clone(), strategy).is_some() {
            info!("constraint '{}' remapped to '{}'", name, strategy);
        }
    }

    let result = translate(&translator, &table, args.keep_going)?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", output).context("Failed to write output")?;

    Ok(())
}

fn read_table(input: &Path) -> Result<ConstraintTable> {
    if input.as_os_str() == "-" {
        ConstraintTable::from_reader(io::stdin().lock()).context("Failed to read table from stdin")
    } else {
        ConstraintTable::from_path(input)
            .with_context(|| format!("Failed to read table from {}", input.display()))
    }
}

fn translate(
    translator: &Translator,
    table: &ConstraintTable,
    keep_going: bool,
) -> Result<TranslationResult> {
    if !keep_going {
        return translator.translate(table).context("Translation failed");
    }

    let (result, failures) = translator.translate_lenient(table);
    for (field, err) in &failures {
        warn!("skipped field '{}': {}", field, err);
    }
    Ok(result)
}

/// Parse `NAME=STRATEGY`
fn parse_alias(alias: &str) -> Result<(String, BuiltinStrategy)> {
    let (name, strategy) = alias
        .split_once('=')
        .ok_or_else(|| anyhow!("alias '{}' must have the form NAME=STRATEGY", alias))?;

    let name = name.trim();
    if name.is_empty() {
        bail!("alias '{}' has an empty constraint name", alias);
    }

    let strategy = strategy
        .trim()
        .parse::<BuiltinStrategy>()
        .with_context(|| format!("Invalid alias '{}'", alias))?;

    Ok((name.to_string(), strategy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_alias() {
        let (name, strategy) = parse_alias("required=notBlank").unwrap();
        assert_eq!(name, "required");
        assert_eq!(strategy, BuiltinStrategy::NotBlank);

        let (name, strategy) = parse_alias(" size = lengthBetween ").unwrap();
        assert_eq!(name, "size");
        assert_eq!(strategy, BuiltinStrategy::LengthBetween);

        assert!(parse_alias("notBlank").is_err());
        assert!(parse_alias("=notBlank").is_err());
        assert!(parse_alias("required=isUnique").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "rulewire",
            "table.json",
            "--pretty",
            "--alias",
            "a=notBlank",
            "--alias",
            "b=blank",
            "--keep-going",
        ]);
        assert_eq!(args.input, PathBuf::from("table.json"));
        assert!(args.pretty);
        assert!(args.keep_going);
        assert!(!args.debug);
        assert_eq!(args.aliases, vec!["a=notBlank", "b=blank"]);

        let args = Args::parse_from(["rulewire"]);
        assert_eq!(args.input, PathBuf::from("-"));
    }

    #[test]
    fn test_translate_keep_going() {
        let table = ConstraintTable::from_json(&json!({
            "name": {"notBlank": "notBlank"},
            "email": {"email": "email"}
        }))
        .unwrap();
        let translator = Translator::new();

        assert!(translate(&translator, &table, false).is_err());

        let result = translate(&translator, &table, true).unwrap();
        assert_eq!(result.field_names().collect::<Vec<_>>(), vec!["name"]);
    }
}
