use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use env_logger::Env;
use log::info;

use mihomo_linkconv::interfaces::{convert_links, records_from_json, records_to_json, render_records};
use mihomo_linkconv::parser::explode_text;
use mihomo_linkconv::template::TemplateCatalog;
use mihomo_linkconv::utils::file::{read_file, read_file_or_stdin};
use mihomo_linkconv::Settings;

/// Convert proxy share links into a mihomo configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML or TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Template directory or http(s) base URL, overrides the configuration
    #[arg(long, value_name = "SOURCE", global = true)]
    templates: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert share links and merge them into a template
    Convert {
        /// File with one share link per line, `-` for stdin
        #[arg(short, long, value_name = "FILE")]
        links: String,

        #[command(flatten)]
        template: TemplateArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Parse share links and print the records as JSON
    Parse {
        /// File with one share link per line, `-` for stdin
        #[arg(short, long, value_name = "FILE")]
        links: String,
    },
    /// Merge previously parsed JSON records into a template
    Render {
        /// JSON records produced by `parse`, `-` for stdin
        #[arg(short, long, value_name = "FILE")]
        records: String,

        #[command(flatten)]
        template: TemplateArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the templates in the catalog
    Templates,
}

#[derive(ClapArgs, Debug)]
struct TemplateArgs {
    /// Template name or file from the catalog
    #[arg(short, long, value_name = "NAME", conflicts_with = "template_file")]
    template: Option<String>,

    /// Local template file, bypassing the catalog
    #[arg(long, value_name = "PATH")]
    template_file: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct OutputArgs {
    /// Output file, defaults to the configured output file
    #[arg(short, long, value_name = "OUTPUT_FILE", conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print the result instead of writing a file
    #[arg(long)]
    stdout: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(source) = args.templates {
        settings.template_source = source;
    }

    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or(settings.log_level.as_str()));

    match args.command {
        Command::Convert {
            links,
            template,
            output,
        } => {
            let links_text = read_file_or_stdin(&links)
                .with_context(|| format!("Failed to read links from {}", links))?;
            let template_text = load_template(&settings, &template)?;
            let merged = convert_links(&links_text, &template_text)?;
            write_output(&settings, &output, &merged)
        }
        Command::Parse { links } => {
            let links_text = read_file_or_stdin(&links)
                .with_context(|| format!("Failed to read links from {}", links))?;
            let records = explode_text(&links_text)?;
            println!("{}", records_to_json(&records)?);
            Ok(())
        }
        Command::Render {
            records,
            template,
            output,
        } => {
            let json = read_file_or_stdin(&records)
                .with_context(|| format!("Failed to read records from {}", records))?;
            let records = records_from_json(&json)?;
            let template_text = load_template(&settings, &template)?;
            write_output(&settings, &output, &render_records(&records, &template_text))
        }
        Command::Templates => {
            let catalog = TemplateCatalog::open(&settings.template_source)
                .with_context(|| format!("Failed to load templates from {}", settings.template_source))?;
            for entry in catalog.entries() {
                if entry.display_name() == entry.file {
                    println!("{}", entry.file);
                } else {
                    println!("{}\t{}", entry.file, entry.display_name());
                }
            }
            Ok(())
        }
    }
}

/// Resolve the template text from a local file or the catalog.
fn load_template(settings: &Settings, args: &TemplateArgs) -> Result<String> {
    if let Some(path) = &args.template_file {
        return read_file(path)
            .with_context(|| format!("Failed to read template {}", path.display()));
    }

    let catalog = TemplateCatalog::open(&settings.template_source)
        .with_context(|| format!("Failed to load templates from {}", settings.template_source))?;
    let name = match args.template.as_ref().or(settings.default_template.as_ref()) {
        Some(name) => name.clone(),
        None => catalog.default_entry().file.clone(),
    };
    info!("Using template {}", name);
    Ok(catalog.read_template(&name)?)
}

fn write_output(settings: &Settings, args: &OutputArgs, content: &str) -> Result<()> {
    if args.stdout {
        print!("{}", content);
        return Ok(());
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.output_file));
    if path.as_os_str().is_empty() {
        bail!("No output file configured");
    }
    fs::write(&path, content)
        .with_context(|| format!("Failed to write output to {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
