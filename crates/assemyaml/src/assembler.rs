//! run level pipeline: resources in, rendered template documents out
use crate::assemble::{collect, AssemblyTable};
use crate::documents::Stream;
use crate::error::Result;
use crate::node::Node;
use crate::transclude::transclude;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Recognize `!Assembly` and `!Transclude` next to the global tags
    pub local_tags: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { local_tags: true }
    }
}

/// Collects assemblies from resource streams and renders templates against them
///
/// ```
/// # use assemyaml::{yaml_stream, Assembler, Options};
/// let mut assembler = Assembler::new(Options::default());
/// assembler.add_resource(yaml_stream!("!Assembly World: [Second Line]")).unwrap();
/// assembler.add_resource(yaml_stream!("!Assembly World: [Third Line]")).unwrap();
///
/// let documents = assembler
///     .render(yaml_stream!("Hello: {!Transclude World: [First Line]}"))
///     .unwrap();
/// assert_eq!(documents[0].to_string(), "{Hello: [First Line, Second Line, Third Line]}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    options: Options,
    assemblies: AssemblyTable,
}

impl Assembler {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            assemblies: AssemblyTable::default(),
        }
    }

    /// Record the assemblies of every document in `stream`
    ///
    /// Resource documents are never rendered, only their assemblies are kept.
    pub fn add_resource(&mut self, stream: Stream) -> Result<()> {
        let source = stream.source_name();
        for document in stream.into_documents() {
            collect(document, &mut self.assemblies, self.options.local_tags)?;
        }

        tracing::debug!(%source, assemblies = self.assemblies.len(), "resource recorded");
        Ok(())
    }

    /// Transclude every document of `template`
    ///
    /// Each document sees the resource assemblies plus its own; assemblies declared in one
    /// template document are invisible to the others.
    pub fn render(&self, template: Stream) -> Result<Vec<Node>> {
        let local_tags = self.options.local_tags;

        template
            .into_documents()
            .into_iter()
            .map(|document| {
                let mut scoped = self.assemblies.clone();
                let document = collect(document, &mut scoped, local_tags)?;
                transclude(document, &scoped, local_tags)
            })
            .collect()
    }

    /// Assemblies recorded from resources so far
    pub fn assemblies(&self) -> &AssemblyTable {
        &self.assemblies
    }
}
