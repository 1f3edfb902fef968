//! envdoctor CLI - audit .env files against environment variable usage.
//!
//! Features:
//! - `process.env`, `import.meta.env` and `$env/*` / `astro:env/*` imports
//! - Declaration discovery across every `.env*` file in the tree
//! - Plain or JSON reports, optional non-zero exit on findings

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use envdoctor_core::{
    init_structured_logging, load_config, print_json, print_plain, EnvDoctor, EnvDoctorConfig,
    LogFormat, OutputFormat, CONFIG_FILE,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Audit .env files against environment variables used in code")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Diagnose and audit your environment variables
    Diagnose(DiagnoseArgs),
}

#[derive(Args, Debug)]
struct DiagnoseArgs {
    /// Path to the root of the project
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Keys or patterns (PREFIX*, *SUFFIX) to leave out of the report
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// Extra file or directory names to skip while scanning
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,

    /// Exit with status 1 when any key is missing or unused
    #[arg(long)]
    strict: bool,
}

/// Loads envdoctor.toml from the scan root, falling back to defaults when it
/// is missing or invalid.
fn load_config_or_default(root: &Path) -> EnvDoctorConfig {
    match load_config(root) {
        Ok(Some(cfg)) => cfg,
        Ok(None) => EnvDoctorConfig::default(),
        Err(e) => {
            eprintln!("WARNING: ignoring {}: {}", CONFIG_FILE, e);
            EnvDoctorConfig::default()
        }
    }
}

/// Output format: the CLI flag wins over the config file.
fn resolve_format(json_flag: bool, config: &EnvDoctorConfig) -> OutputFormat {
    if json_flag {
        OutputFormat::Json
    } else {
        config.output_format().unwrap_or_default()
    }
}

fn run_diagnose(args: &DiagnoseArgs) -> Result<i32> {
    let config = load_config_or_default(&args.path);
    let format = resolve_format(args.json, &config);

    let report = EnvDoctor::new(&args.path)
        .with_config(&config)
        .exclude_dirs(args.exclude.iter().cloned())
        .ignore_keys(args.ignore.iter().cloned())
        .analyze()
        .with_context(|| format!("Failed to scan {}", args.path.display()))?;

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Plain => print_plain(&report),
    }

    Ok(if args.strict && !report.is_clean() { 1 } else { 0 })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_structured_logging(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    let code = match &cli.command {
        Command::Diagnose(args) => run_diagnose(args)?,
    };

    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir()
            .join("envdoctor_cli_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir).ok();
        }
        fs::create_dir_all(&temp_dir).unwrap();
        temp_dir
    }

    fn diagnose_args(argv: &[&str]) -> DiagnoseArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Diagnose(args) => args,
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_diagnose_defaults() {
        let args = diagnose_args(&["envdoctor", "diagnose"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert!(!args.json);
        assert!(!args.strict);
        assert!(args.ignore.is_empty());
    }

    #[test]
    fn test_diagnose_flags() {
        let args = diagnose_args(&[
            "envdoctor", "diagnose", "web", "--json", "--strict", "--ignore", "NODE_ENV", "VITE_*",
            "--exclude", "coverage",
        ]);
        assert_eq!(args.path, PathBuf::from("web"));
        assert!(args.json);
        assert!(args.strict);
        assert_eq!(args.ignore, vec!["NODE_ENV", "VITE_*"]);
        assert_eq!(args.exclude, vec!["coverage"]);
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["envdoctor"]).is_err());
    }

    #[test]
    fn test_resolve_format() {
        let json_cfg: EnvDoctorConfig = toml_config("[output]\nformat = \"json\"");
        assert_eq!(resolve_format(false, &json_cfg), OutputFormat::Json);
        assert_eq!(resolve_format(true, &EnvDoctorConfig::default()), OutputFormat::Json);
        assert_eq!(resolve_format(false, &EnvDoctorConfig::default()), OutputFormat::Plain);
    }

    fn toml_config(text: &str) -> EnvDoctorConfig {
        let dir = create_temp_dir("cfg");
        fs::write(dir.join(CONFIG_FILE), text).unwrap();
        let cfg = load_config(&dir).unwrap().unwrap();
        fs::remove_dir_all(&dir).ok();
        cfg
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let dir = create_temp_dir("badcfg");
        fs::write(dir.join(CONFIG_FILE), "ignore = 42").unwrap();
        let cfg = load_config_or_default(&dir);
        assert!(cfg.ignore_patterns().is_empty());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_run_diagnose_strict_exit_code() {
        let dir = create_temp_dir("strict");
        fs::write(dir.join(".env"), "DECLARED=1\n").unwrap();
        fs::write(dir.join("index.js"), "process.env.DECLARED; process.env.MISSING;").unwrap();

        let strict = diagnose_args(&["envdoctor", "diagnose", dir.to_str().unwrap(), "--strict"]);
        assert_eq!(run_diagnose(&strict).unwrap(), 1);

        let lenient = diagnose_args(&["envdoctor", "diagnose", dir.to_str().unwrap()]);
        assert_eq!(run_diagnose(&lenient).unwrap(), 0);

        let ignored = diagnose_args(&[
            "envdoctor", "diagnose", dir.to_str().unwrap(), "--strict", "--ignore", "MISSING",
        ]);
        assert_eq!(run_diagnose(&ignored).unwrap(), 0);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_run_diagnose_missing_root_is_error() {
        let dir = create_temp_dir("noroot").join("absent");
        let args = diagnose_args(&["envdoctor", "diagnose", dir.to_str().unwrap()]);
        assert!(run_diagnose(&args).is_err());
    }
}
