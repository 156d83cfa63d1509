use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use papersite_core::config_file::{ConfigFile, apply_env_overrides, load_config, save_config};
use papersite_ingest::{Ingestor, UploadLimits, file_extension, resolve_format, validate_file};
use papersite_parsing::{ExtractorConfig, StructureExtractor};

mod output;

use output::ColorMode;

/// Paper structure extractor - pull title, abstract, sections, and references
/// out of PDF, DOCX, and plain-text research papers
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a paper and print its structure
    Parse {
        /// Path to the PDF, DOCX, DOC, or TXT file
        file_path: PathBuf,

        /// Print the structured document as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum accepted file size in megabytes
        #[arg(long)]
        max_size_mb: Option<u64>,
    },

    /// Check whether a file would be accepted for upload, without parsing it
    Validate {
        /// Path to the file to check
        file_path: PathBuf,

        /// Maximum accepted file size in megabytes
        #[arg(long)]
        max_size_mb: Option<u64>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Also write it to the user config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = apply_env_overrides(load_config());

    match cli.command {
        Command::Parse {
            file_path,
            json,
            no_color,
            output,
            max_size_mb,
        } => parse(&config, &file_path, json, no_color, output, max_size_mb),
        Command::Validate {
            file_path,
            max_size_mb,
            no_color,
        } => validate(&config, &file_path, max_size_mb, no_color),
        Command::Config { save } => {
            print!("{}", toml::to_string_pretty(&config)?);
            if save {
                let path = save_config(&config).context("cannot save configuration")?;
                eprintln!("Saved to {}", path.display());
            }
            Ok(())
        }
    }
}

// CLI flag > env/file config > built-in default
fn resolve_limits(config: &ConfigFile, max_size_mb: Option<u64>) -> UploadLimits {
    match max_size_mb {
        Some(mb) => UploadLimits::from_megabytes(mb),
        None => config
            .limits
            .as_ref()
            .map(UploadLimits::from_file_config)
            .unwrap_or_default(),
    }
}

fn build_extractor(config: &ConfigFile) -> anyhow::Result<StructureExtractor> {
    let extractor_config = match &config.extraction {
        Some(extraction) => ExtractorConfig::from_file_config(extraction)
            .context("invalid [extraction] configuration")?,
        None => ExtractorConfig::default(),
    };
    Ok(StructureExtractor::with_config(extractor_config))
}

fn parse(
    config: &ConfigFile,
    file_path: &Path,
    json: bool,
    no_color: bool,
    output: Option<PathBuf>,
    max_size_mb: Option<u64>,
) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let ingestor = Ingestor::new()
        .with_extractor(build_extractor(config)?)
        .with_limits(resolve_limits(config, max_size_mb));

    let doc = match ingestor.parse_file(file_path) {
        Ok(doc) => doc,
        Err(e) if e.is_client_error() => anyhow::bail!("{}", e.user_message()),
        Err(e) => anyhow::bail!("{}\n  cause: {}", e.user_message(), e),
    };

    let use_color = !no_color && !json && output.is_none();
    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(
            std::fs::File::create(output_path)
                .with_context(|| format!("cannot create {}", output_path.display()))?,
        )
    } else {
        Box::new(std::io::stdout())
    };

    if json {
        serde_json::to_writer_pretty(&mut writer, &doc)?;
        writeln!(writer)?;
    } else {
        output::print_document(&mut writer, &doc, ColorMode(use_color))?;
    }
    writer.flush()?;

    Ok(())
}

fn validate(
    config: &ConfigFile,
    file_path: &Path,
    max_size_mb: Option<u64>,
    no_color: bool,
) -> anyhow::Result<()> {
    let data = std::fs::read(file_path)
        .with_context(|| format!("cannot read {}", file_path.display()))?;
    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mime_type = match resolve_format(&file_name, &data) {
        Ok(Some(format)) => format.mime_type(),
        Ok(None) => "",
        Err(_) => {
            tracing::debug!(extension = %file_extension(&file_name), "unrecognised extension");
            ""
        }
    };

    let limits = resolve_limits(config, max_size_mb);
    validate_file(mime_type, data.len() as u64, &limits)?;

    output::print_valid(
        &mut std::io::stdout(),
        &file_name,
        mime_type,
        data.len() as u64,
        ColorMode(!no_color),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use papersite_core::config_file::{ExtractionConfig, LimitsConfig};

    use super::*;

    #[test]
    fn flag_overrides_config_limit() {
        let config = ConfigFile {
            limits: Some(LimitsConfig {
                max_file_size_mb: Some(10),
            }),
            ..Default::default()
        };
        assert_eq!(resolve_limits(&config, Some(2)).max_megabytes(), 2);
        assert_eq!(resolve_limits(&config, None).max_megabytes(), 10);
        assert_eq!(
            resolve_limits(&ConfigFile::default(), None),
            UploadLimits::default()
        );
    }

    #[test]
    fn invalid_extraction_config_is_reported() {
        let config = ConfigFile {
            extraction: Some(ExtractionConfig {
                max_heading_len: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = build_extractor(&config).unwrap_err();
        assert!(err.to_string().contains("[extraction]"));
    }

    #[test]
    fn cli_parses_parse_subcommand() {
        let cli = Cli::try_parse_from([
            "papersite",
            "parse",
            "paper.pdf",
            "--json",
            "--max-size-mb",
            "5",
        ])
        .unwrap();
        match cli.command {
            Command::Parse {
                file_path,
                json,
                max_size_mb,
                ..
            } => {
                assert_eq!(file_path, PathBuf::from("paper.pdf"));
                assert!(json);
                assert_eq!(max_size_mb, Some(5));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn cli_parses_config_save_flag() {
        let cli = Cli::try_parse_from(["papersite", "config", "--save"]).unwrap();
        assert!(matches!(cli.command, Command::Config { save: true }));
        let cli = Cli::try_parse_from(["papersite", "config"]).unwrap();
        assert!(matches!(cli.command, Command::Config { save: false }));
    }
}
