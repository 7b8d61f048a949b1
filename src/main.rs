use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use worldmap_lib::{
    init_logging, read_map_file, write_map_file, write_map_string, Dispatch, MapIoConfig, MapSummary, WarningPolicy,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SummaryFormat {
    Json,
    Xml,
}

#[derive(Parser)]
#[command(name = "worldmap")]
#[command(about = "Read a world map (following includes) and write it back out normalized")]
struct Args {
    /// Map or view document to read
    input: PathBuf,

    /// Where to write the normalized document (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// How to treat recoverable format problems
    #[arg(long, value_enum, ignore_case = true)]
    warnings: Option<WarningPolicy>,

    /// Print a summary of the map instead of the document
    #[arg(long)]
    summary: bool,

    /// Summary output format
    #[arg(long, value_enum, default_value = "json")]
    format: SummaryFormat,
}

fn load_config(args: &Args) -> Result<MapIoConfig> {
    let mut config = match &args.config {
        Some(path) => MapIoConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MapIoConfig::default(),
    };
    if let Some(policy) = args.warnings {
        config.warning_policy = policy;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let config = load_config(&args)?;
    let warner = config.warning_policy.sink();
    let dispatch = Dispatch::shared();

    let view = read_map_file(&args.input, dispatch, &config, warner.as_ref())
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    if args.summary {
        let summary = MapSummary::from_view(&view);
        let rendered = match args.format {
            SummaryFormat::Json => summary.to_json()?,
            SummaryFormat::Xml => summary.to_xml()?,
        };
        println!("{}", rendered);
        return Ok(());
    }

    match &args.output {
        Some(path) => write_map_file(path, &view, dispatch, &config)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", write_map_string(&view, dispatch, &config)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["worldmap", "in.xml", "-o", "out.xml", "--warnings", "die"]);
        assert_eq!(args.input, PathBuf::from("in.xml"));
        assert_eq!(args.output, Some(PathBuf::from("out.xml")));

        let config = load_config(&args).unwrap();
        assert_eq!(config.warning_policy, WarningPolicy::Die);
    }

    #[test]
    fn test_bad_warning_policy() {
        assert!(Args::try_parse_from(["worldmap", "in.xml", "--warnings", "shout"]).is_err());
    }

    #[test]
    fn test_warning_policy_overrides_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"warning_policy": "ignore", "indent_size": 2}"#).unwrap();
        let config_arg = path.to_string_lossy().into_owned();

        let args = Args::parse_from(["worldmap", "in.xml", "--config", &config_arg, "--warnings", "Die"]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.warning_policy, WarningPolicy::Die);
        assert_eq!(config.indent_size, 2);
    }
}
