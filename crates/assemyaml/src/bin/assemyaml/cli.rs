//! assemyaml cli interface

use clap::{Parser, ValueEnum};
use std::fmt::Formatter;
use std::path::{Path, PathBuf};

const SYNTAX: &str = "\
Syntax examples:
    Template document:
        Hello:
          !Transclude World:
            - First Line

    Resource documents:
        !Assembly World:
          - Second Line

        !Assembly World:
          - Third Line

    Resulting output:
        Hello:
          - First Line
          - Second Line
          - Third Line";

/// Transclude parts of YAML documents to produce a final document
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, after_help = SYNTAX)]
pub struct Cli {
    #[arg(short = 'f', long = "format", default_value_t)]
    pub format: OutputFormat,

    /// Ignore !Transclude and !Assembly local tags and use global tags only
    #[arg(short = 'l', long = "no-local-tag")]
    pub no_local_tag: bool,

    /// Write output to a file instead of stdout
    ///
    /// The file is only written when rendering succeeds.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Template document, `-` reads stdin
    ///
    /// When given, every positional file is a resource document.
    #[arg(short = 't', long = "template")]
    pub template: Option<PathBuf>,

    /// Template document (unless --template is used) followed by resource documents
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Template path and resource paths, [None] without a template
    pub fn inputs(&self) -> Option<(&Path, &[PathBuf])> {
        match &self.template {
            Some(template) => Some((template.as_path(), self.files.as_slice())),
            None => self
                .files
                .split_first()
                .map(|(template, resources)| (template.as_path(), resources)),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn first_positional_is_the_template() {
        let cli = Cli::parse_from(["assemyaml", "template.yml", "a.yml", "b.yml"]);
        let (template, resources) = cli.inputs().unwrap();
        assert_eq!(template, Path::new("template.yml"));
        assert_eq!(resources.to_vec(), vec![PathBuf::from("a.yml"), PathBuf::from("b.yml")]);
        assert_eq!(cli.format, OutputFormat::Yaml);
    }

    #[test]
    fn explicit_template() {
        let cli = Cli::parse_from(["assemyaml", "-f", "json", "-l", "-t", "-", "a.yml"]);
        let (template, resources) = cli.inputs().unwrap();
        assert_eq!(template, Path::new("-"));
        assert_eq!(resources.to_vec(), vec![PathBuf::from("a.yml")]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.no_local_tag);
    }

    #[test]
    fn no_template() {
        assert!(Cli::parse_from(["assemyaml"]).inputs().is_none());
        assert!(Cli::try_parse_from(["assemyaml", "-f", "xml", "t.yml"]).is_err());
    }
}
