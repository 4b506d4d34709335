mod cli;

use anyhow::Context;
use assemyaml::documents::{LoadError, Stream};
use assemyaml::{Assembler, Options};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    use clap::{CommandFactory, Parser};
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
                .with_env_var("ASSEMYAML_LOG")
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some((template, resources)) = cli.inputs() else {
        cli::Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "Missing template filename",
            )
            .exit()
    };

    if let Err(e) = run(&cli, template, resources) {
        for error in e.chain() {
            eprintln!("{error}")
        }
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(cli: &cli::Cli, template: &Path, resources: &[PathBuf]) -> anyhow::Result<()> {
    let mut assembler = Assembler::new(Options {
        local_tags: !cli.no_local_tag,
    });

    let template = load(template, "template")?;

    for path in resources {
        let resource = load(path, "resource")?;
        let name = resource.source_name();
        assembler
            .add_resource(resource)
            .with_context(|| format!("While processing resource document {name}:"))?;
    }
    tracing::info!(assemblies = assembler.assemblies().len(), "resources recorded");

    let name = template.source_name();
    let documents = assembler
        .render(template)
        .with_context(|| format!("While processing template document {name}:"))?;

    let mut rendered = Vec::new();
    match cli.format {
        cli::OutputFormat::Yaml => assemyaml::emit::write_yaml(&mut rendered, &documents)?,
        cli::OutputFormat::Json => {
            if documents.len() > 1 {
                tracing::warn!(
                    "Multiple documents are not supported with JSON output; \
                     only the first document will be written."
                );
            }
            assemyaml::emit::write_json(&mut rendered, &documents)?
        }
    };

    output(cli.output.as_deref(), &rendered)
}

/// Load a document stream, `-` reads stdin
fn load(path: &Path, role: &str) -> anyhow::Result<Stream> {
    let loaded = if path == Path::new("-") {
        Stream::load_reader(std::io::stdin().lock(), None)
    } else {
        Stream::load_file(path)
    };

    match loaded {
        Ok(stream) => Ok(stream),
        Err(LoadError::Document(err)) => Err(anyhow::Error::new(err).context(format!(
            "While processing {role} document {}:",
            path.display()
        ))),
        Err(err) => Err(err.into()),
    }
}

fn output(path: Option<&Path>, rendered: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Unable to open {} for writing", path.display()))?,
        None => std::io::stdout().lock().write_all(rendered)?,
    };

    Ok(())
}
