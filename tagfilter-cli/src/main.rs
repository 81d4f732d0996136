use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tagfilter::{strip_tags, AllowPolicy, Constraint, ConstraintError, Scanner, TagFilter, TagSpec};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tagfilter")]
#[command(version, about = "Filter markup against a tag/attribute allowlist")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct InputArgs {
    /// Input string
    #[arg(short, long, conflicts_with = "file")]
    input: Option<String>,

    /// File to read input from (stdin when neither is given)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Treat every line as a separate input
    #[arg(long)]
    lines: bool,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter input against an allowlist
    Filter {
        /// JSON policy file: {"allowTags": [...], "allowAttributes": [...]}
        #[arg(short, long, conflicts_with_all = ["allow_tag", "allow_attr"])]
        policy: Option<PathBuf>,

        /// Allowed tag, optionally with attributes: `a=href,title`
        #[arg(long = "allow-tag", value_name = "TAG[=ATTR,...]")]
        allow_tag: Vec<String>,

        /// Attribute allowed on every tag (`data-*` for all data attributes)
        #[arg(long = "allow-attr", value_name = "ATTR")]
        allow_attr: Vec<String>,

        /// Print scanner segments instead of filtering
        #[arg(long)]
        segments: bool,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Remove all markup
    Strip {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Validate JSON values against a string or number schema
    Validate {
        /// JSON schema file with "type" of string, number or integer
        #[arg(short, long)]
        schema: PathBuf,

        /// JSON pointer reported in errors
        #[arg(long, default_value = "")]
        path: String,

        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Serialize)]
struct Rewrite {
    input: String,
    output: String,
}

#[derive(Serialize)]
struct Validation {
    value: serde_json::Value,
    errors: Vec<ConstraintError>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn parse_tag_spec(spec: &str) -> TagSpec {
    match spec.split_once('=') {
        Some((tag, attrs)) => TagSpec::with_attributes(
            tag,
            attrs.split(',').map(str::trim).filter(|a| !a.is_empty()),
        ),
        None => TagSpec::bare(spec),
    }
}

fn load_policy(path: Option<&Path>, tags: &[String], attrs: &[String]) -> Result<AllowPolicy> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read policy file: {:?}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse policy file: {:?}", path))
        }
        None => Ok(AllowPolicy::new(
            tags.iter().map(|t| parse_tag_spec(t)),
            attrs,
        )),
    }
}

fn read_inputs(args: &InputArgs) -> Result<Vec<String>> {
    let text = if let Some(input) = &args.input {
        input.clone()
    } else if let Some(file) = &args.file {
        fs::read_to_string(file).with_context(|| format!("Failed to read file: {:?}", file))?
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    };

    if args.lines {
        Ok(text.lines().map(str::to_string).collect())
    } else {
        Ok(vec![text])
    }
}

fn segment_lines(text: &str) -> Vec<String> {
    Scanner::new(text).map(|segment| segment.to_string()).collect()
}

fn print_rewrites(inputs: Vec<String>, json: bool, rewrite: impl Fn(&str) -> String) -> Result<()> {
    let results: Vec<Rewrite> = inputs
        .into_iter()
        .map(|input| {
            let output = rewrite(&input);
            Rewrite { input, output }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in results {
            println!("{}", result.output);
        }
    }
    Ok(())
}

fn run_validate(schema_path: &Path, pointer: &str, args: &InputArgs) -> Result<ExitCode> {
    let schema_text = fs::read_to_string(schema_path)
        .with_context(|| format!("Failed to read schema file: {:?}", schema_path))?;
    let schema: serde_json::Value = serde_json::from_str(&schema_text)
        .with_context(|| format!("Failed to parse schema file: {:?}", schema_path))?;
    let constraint = Constraint::from_schema(&schema)
        .with_context(|| format!("Failed to compile schema: {:?}", schema_path))?;
    debug!(schema = %schema_path.display(), "schema compiled");

    let mut results = Vec::new();
    for raw in read_inputs(args)? {
        if raw.trim().is_empty() {
            continue;
        }
        let mut value: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("Input is not valid JSON: {}", raw))?;
        let errors = constraint.validate(&mut value, pointer);
        results.push(Validation { value, errors });
    }

    let failed = results.iter().filter(|r| !r.errors.is_empty()).count();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            println!("{}", result.value);
            for error in &result.errors {
                println!("  [{}] {}", error.error_code, error);
            }
        }
    }
    info!(checked = results.len(), failed, "validation finished");

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Filter {
            policy,
            allow_tag,
            allow_attr,
            segments,
            input,
        } => {
            let inputs = read_inputs(&input)?;
            if segments {
                for text in &inputs {
                    for line in segment_lines(text) {
                        println!("{line}");
                    }
                }
                return Ok(ExitCode::SUCCESS);
            }

            let policy = load_policy(policy.as_deref(), &allow_tag, &allow_attr)?;
            debug!(allows_data = policy.allows_data_attributes(), "policy loaded");
            let filter = TagFilter::with_policy(policy);
            print_rewrites(inputs, input.json, |s| filter.filter(s))?;
        }

        Commands::Strip { input } => {
            print_rewrites(read_inputs(&input)?, input.json, strip_tags)?;
        }

        Commands::Validate {
            schema,
            path,
            input,
        } => return run_validate(&schema, &path, &input),
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_spec() {
        let policy = AllowPolicy::new(
            [parse_tag_spec("A=HREF, title"), parse_tag_spec("br"), parse_tag_spec("p=")],
            ["class"],
        );
        assert!(policy.is_attribute_allowed("a", "href"));
        assert!(policy.is_attribute_allowed("a", "title"));
        assert!(policy.is_tag_allowed("br"));
        assert!(policy.tag_attributes("p").is_some_and(|a| a.is_empty()));
    }

    #[test]
    fn test_segment_lines() {
        assert_eq!(
            segment_lines("x<b>y"),
            vec!["TEXT,1,x", "TAG,3,<b>", "TEXT,1,y"]
        );
        assert!(segment_lines("").is_empty());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
