//! yaml document streams ([Node]s and the path of their source)
//!
//! A [Stream] is everything one input contributes: zero or more documents, composed in order.
//! The source path is kept so errors and marks can point back to the file.
use crate::compose::compose;
use crate::error::Error;
use crate::node::Node;
use std::io::Read;
use std::path::{Path, PathBuf};

pub type Source = Option<PathBuf>;

#[derive(Debug, Clone, Default)]
pub struct Stream {
    source: Source,
    documents: Vec<Node>,
}

impl Stream {
    /// Compose every document of `text`
    pub fn parse(text: &str, source: Source) -> Result<Self, Error> {
        let name = source.as_deref().map(|path| path.display().to_string());
        let documents = compose(text, name.as_deref())?;

        Ok(Self { source, documents })
    }

    pub fn load_file(file_path: &Path) -> Result<Self, LoadError> {
        tracing::info!(path = %file_path.display(), "loading file");

        let text = std::fs::read_to_string(file_path).map_err(|source| LoadError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;

        Ok(Self::parse(&text, Some(file_path.to_path_buf()))?)
    }

    /// Read a whole stream from `reader` (usually stdin)
    pub fn load_reader(mut reader: impl Read, source: Source) -> Result<Self, LoadError> {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(|err| LoadError::Io {
            path: source.clone().unwrap_or_else(|| PathBuf::from("-")),
            source: err,
        })?;

        Ok(Self::parse(&text, source)?)
    }

    /// Source path for messages, `<input>` for anonymous streams
    pub fn source_name(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => "<input>".to_string(),
        }
    }

    pub fn documents(&self) -> &[Node] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<Node> {
        self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Unable to open {} for reading", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Document(#[from] Error),
}

/// Utility macro to create a [Stream]
///
/// Create from text alone
/// ```
/// # use assemyaml::yaml_stream;
/// let stream = yaml_stream!("!Assembly World: [Second Line]");
/// assert_eq!(stream.len(), 1);
/// ```
///
/// Create with a source path (shows up in marks and errors)
/// ```
/// # use assemyaml::yaml_stream;
/// let stream = yaml_stream!("resource.yml" => "a: 1\n---\nb: 2\n");
/// assert_eq!(stream.len(), 2);
/// assert_eq!(stream.source_name(), "resource.yml");
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use assemyaml::yaml_stream;
/// yaml_stream!("a: [unclosed");
/// ```
#[macro_export]
macro_rules! yaml_stream {
    // anonymous stream
    { $text:expr } => {
        $crate::documents::Stream::parse($text, None).expect("stream must parse")
    };
    // stream with a source path
    { $source:expr => $text:expr } => {
        $crate::documents::Stream::parse(
            $text,
            Some(::std::path::PathBuf::from($source)),
        )
        .expect("stream must parse")
    };
}
