//! Command-line interface for dtdhint
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and command-line overrides
//! - Loading element declarations
//! - Dispatching subcommands

pub mod completion;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::completion::{CompletionContext, CompletionEngine};
use crate::config::{Config, LogLevel, OutputFormat};
use crate::error::{ConfigError, HintError, Result};
use crate::formatter::{CheckReport, EvalReport, Formatter};
use crate::grammar::DtdGrammar;
use crate::model::ContentModel;

/// DTD content-model completion hints
#[derive(Parser, Debug)]
#[command(
    name = "dtdhint",
    version,
    about = "Suggest which child elements a DTD content model allows next",
    long_about = "Parses DTD element content models such as (title,(author|editor)+,chapter*)
and reports which element names may legally follow a given list of siblings."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_name = "FORMAT", value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for dtdhint
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Suggest child elements using a declarations file
    Hint {
        /// TOML file with an [elements] table of content specifications
        #[arg(short = 'g', long = "grammar", value_name = "FILE")]
        grammar: PathBuf,

        /// Parent element
        #[arg(value_name = "ELEMENT")]
        element: String,

        /// Preceding sibling elements, oldest first
        #[arg(value_name = "SIBLING")]
        siblings: Vec<String>,

        /// Partially typed element name
        #[arg(short = 'p', long, value_name = "PREFIX", default_value = "")]
        prefix: String,

        /// Suggest every declared element when the siblings are invalid
        #[arg(long)]
        fallback_on_invalid: bool,

        /// Match the prefix case-insensitively
        #[arg(short = 'i', long)]
        ignore_case: bool,
    },

    /// Evaluate siblings against a raw content model
    Eval {
        /// Content model text, e.g. "(a,b?,c)"
        #[arg(value_name = "MODEL")]
        model: String,

        /// Preceding sibling elements, oldest first
        #[arg(value_name = "SIBLING")]
        siblings: Vec<String>,
    },

    /// Parse a content model and print its normalized form
    Check {
        /// Content model text
        #[arg(value_name = "MODEL")]
        model: String,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type
        #[arg(value_name = "SHELL", value_enum)]
        shell: Shell,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// Declarations file layout: `[elements] name = "content spec"`
#[derive(Debug, Deserialize)]
struct DeclarationFile {
    #[serde(default)]
    elements: BTreeMap<String, String>,
}

/// Load a declarations file into a fresh grammar
pub fn load_grammar(path: &Path) -> Result<DtdGrammar> {
    let text = fs::read_to_string(path).map_err(|e| {
        HintError::Config(ConfigError::FileNotFound(format!("{}: {e}", path.display())))
    })?;
    parse_grammar(&text)
}

/// Build a grammar from declarations file text
pub fn parse_grammar(text: &str) -> Result<DtdGrammar> {
    let file: DeclarationFile = toml::from_str(text)?;
    let grammar = DtdGrammar::new();
    for (element, spec) in &file.elements {
        grammar.declare(element.as_str(), spec);
    }
    info!(elements = file.elements.len(), "loaded element declarations");
    Ok(grammar)
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Parse the process arguments and load configuration
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Build from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {e}");
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);
        Ok(config)
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Override configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if let Some(format) = args.format {
            config.display.format = format;
        }
        if args.no_color {
            config.display.color_output = false;
        }

        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };

        if let Commands::Hint {
            fallback_on_invalid,
            ignore_case,
            ..
        } = &args.command
        {
            if *fallback_on_invalid {
                config.completion.fallback_on_invalid = true;
            }
            if *ignore_case {
                config.completion.case_sensitive = false;
            }
        }
    }

    /// Run the selected subcommand and return its output
    pub fn run(&self) -> Result<String> {
        match &self.args.command {
            Commands::Hint {
                grammar,
                element,
                siblings,
                prefix,
                ..
            } => self.hint(grammar, element, siblings, prefix),
            Commands::Eval { model, siblings } => self.eval(model, siblings),
            Commands::Check { model } => self.check(model),
            Commands::Completion { shell } => completion::generate_completion(*shell),
            Commands::Config { show, validate } => self.handle_config_command(*show, *validate),
        }
    }

    fn hint(&self, path: &Path, element: &str, siblings: &[String], prefix: &str) -> Result<String> {
        let grammar = load_grammar(path)?;
        let engine = CompletionEngine::new(Arc::new(grammar), self.config.completion.clone());
        let context = CompletionContext::new(element)
            .with_siblings(siblings.iter().cloned())
            .with_prefix(prefix);
        let completion = engine.complete(&context);
        debug!(element, source = ?completion.source, "hint computed");
        self.formatter().format_completion(&completion)
    }

    fn eval(&self, text: &str, siblings: &[String]) -> Result<String> {
        let mut model = ContentModel::parse(text)?;
        let evaluation = model.evaluate(siblings);
        let report = EvalReport::new(&model, evaluation);
        self.formatter().format_evaluation(&report)
    }

    fn check(&self, text: &str) -> Result<String> {
        let model = ContentModel::parse(text)?;
        self.formatter().format_check(&CheckReport::new(&model))
    }

    /// Handle config subcommand
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<String> {
        let mut lines = Vec::new();

        if validate {
            lines.push(self.validate_config_file());
        }
        if show || !validate {
            lines.push(format!("# Configuration file: {}", self.get_config_path().display()));
            lines.push(self.config.to_toml_with_comments()?);
        }

        Ok(lines.join("\n"))
    }

    /// Validate the configuration file as written, without CLI overrides
    fn validate_config_file(&self) -> String {
        let path = self.get_config_path();
        if !path.exists() {
            return format!("❌ Configuration file does not exist: {}", path.display());
        }

        match Config::from_file(&path) {
            Ok(config) => match config.validate() {
                Ok(()) => format!("✅ Configuration is valid: {}", path.display()),
                Err(e) => format!("❌ Configuration validation failed: {e}"),
            },
            Err(e) => format!("❌ Failed to load configuration: {e}"),
        }
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }

    fn formatter(&self) -> Formatter {
        Formatter::from_config(&self.config.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interface(argv: &[&str]) -> CliInterface {
        let mut full = vec!["dtdhint", "-c", "/nonexistent/dtdhint.toml", "--no-color"];
        full.extend_from_slice(argv);
        CliInterface::from_args(CliArgs::try_parse_from(full).unwrap()).unwrap()
    }

    #[test]
    fn test_cli_args_parsing() {
        let args = CliArgs::try_parse_from(["dtdhint", "eval", "(a,b)", "a"]).unwrap();
        match args.command {
            Commands::Eval { model, siblings } => {
                assert_eq!(model, "(a,b)");
                assert_eq!(siblings, vec!["a"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(CliArgs::try_parse_from(["dtdhint"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            CliArgs::try_parse_from(["dtdhint", "check", "(a)", "--format", "json-pretty", "-q"])
                .unwrap();
        assert_eq!(args.format, Some(OutputFormat::JsonPretty));
        assert!(args.quiet);
    }

    #[test]
    fn test_logging_overrides() {
        let cli = interface(&["-v", "check", "(a)"]);
        assert_eq!(cli.config().logging.level, LogLevel::Debug);
        let cli = interface(&["--vv", "-q", "check", "(a)"]);
        assert_eq!(cli.config().logging.level, LogLevel::Trace);
        let cli = interface(&["-q", "check", "(a)"]);
        assert_eq!(cli.config().logging.level, LogLevel::Error);
    }

    #[test]
    fn test_hint_flags_override_config() {
        let cli = interface(&["hint", "-g", "decls.toml", "book", "--fallback-on-invalid", "-i"]);
        assert!(cli.config().completion.fallback_on_invalid);
        assert!(!cli.config().completion.case_sensitive);
    }

    #[test]
    fn test_eval_command() {
        let cli = interface(&["eval", "(a,b?,c)", "a"]);
        assert_eq!(cli.run().unwrap(), "b\nc");

        let cli = interface(&["eval", "(a,b)", "a", "b"]);
        assert_eq!(cli.run().unwrap(), "satisfied");
    }

    #[test]
    fn test_check_command() {
        let cli = interface(&["--format", "json", "check", "( a | b )*"]);
        assert_eq!(
            cli.run().unwrap(),
            r#"{"model":"(a|b)*","elements":["a","b"]}"#
        );

        let cli = interface(&["check", "(a,b"]);
        assert!(matches!(cli.run(), Err(HintError::Model(_))));
    }

    #[test]
    fn test_parse_grammar() {
        let grammar = parse_grammar(
            r#"
            [elements]
            book = "(title,chapter+)"
            title = "(#PCDATA)"
            chapter = "ANY"
            "#,
        )
        .unwrap();
        assert_eq!(grammar.declared_elements().len(), 3);
        let next = grammar.what_can_follow("book", ["title"]).unwrap();
        assert_eq!(next.iter().collect::<Vec<_>>(), vec!["chapter"]);
    }

    #[test]
    fn test_hint_command() {
        let path = std::env::temp_dir().join(format!("dtdhint-decls-{}.toml", std::process::id()));
        fs::write(
            &path,
            "[elements]\nbook = \"(title,(author|editor)+)\"\ntitle = \"(#PCDATA)\"\n",
        )
        .unwrap();

        let grammar_path = path.to_string_lossy().to_string();
        let cli = interface(&["hint", "-g", &grammar_path, "book", "title", "--prefix", "a"]);
        let output = cli.run();
        let _ = fs::remove_file(&path);
        assert_eq!(output.unwrap(), "author");
    }

    #[test]
    fn test_missing_grammar_file() {
        let cli = interface(&["hint", "-g", "/nonexistent/decls.toml", "book"]);
        assert!(matches!(
            cli.run(),
            Err(HintError::Config(ConfigError::FileNotFound(_)))
        ));
    }
}
