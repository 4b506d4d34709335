//! End to end tests
//!
//! Each directory in tests/fixtures/ is one run:
//! - `template.yml`
//! - `resource*.yml`, recorded in file name order
//! - `expected.yml`, compared to the rendered documents by value
//!
//! The written yaml must read back to the rendered documents.
//! - `no-local-tag` (optional) disables the local marker tags

use assemyaml::documents::Stream;
use assemyaml::emit::write_yaml;
use assemyaml::equality::nodes_equal;
use assemyaml::{Assembler, Error, Options};
use std::path::{Path, PathBuf};

fn resources(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .expect("fixture directory must be readable")
        .map(|entry| entry.expect("valid directory entry").path())
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with("resource"))
        })
        .collect();
    paths.sort();
    paths
}

#[test]
fn fixtures() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("ASSEMYAML_LOG"))
        .with_writer(std::io::stderr)
        .try_init();

    insta::glob!("fixtures/*/template.yml", |path| {
        let dir = path.parent().expect("fixture directory");
        let mut assembler = Assembler::new(Options {
            local_tags: !dir.join("no-local-tag").exists(),
        });

        for resource in resources(dir) {
            let stream = Stream::load_file(&resource).expect("resource must load");
            assembler.add_resource(stream).expect("resource must assemble");
        }

        let template = Stream::load_file(path).expect("template must load");
        let rendered = assembler.render(template).expect("template must render");
        let expected = Stream::load_file(&dir.join("expected.yml"))
            .expect("expected.yml must load")
            .into_documents();

        assert_eq!(rendered.len(), expected.len(), "{}", path.display());
        for (rendered, expected) in rendered.iter().zip(&expected) {
            assert!(
                nodes_equal(rendered, expected),
                "{}\nrendered: {rendered}\nexpected: {expected}",
                path.display()
            );
        }

        let mut yaml = vec![];
        write_yaml(&mut yaml, &rendered).expect("must serialize");
        let reparsed = Stream::parse(&String::from_utf8(yaml).expect("utf-8"), None)
            .expect("output must be valid yaml");
        assert_eq!(reparsed.len(), rendered.len(), "{}", path.display());
        for (reparsed, rendered) in reparsed.documents().iter().zip(&rendered) {
            assert!(
                nodes_equal(reparsed, rendered),
                "{}\nwritten: {reparsed}\nrendered: {rendered}",
                path.display()
            );
        }
    });
}

fn stream(source: &str, text: &str) -> Stream {
    Stream::parse(text, Some(PathBuf::from(source))).expect("must parse")
}

#[test]
fn duplicate_keys_across_resources() {
    let mut assembler = Assembler::default();
    assembler
        .add_resource(stream("one.yml", "!Assembly Y:\n  a: 1\n"))
        .unwrap();
    let err = assembler
        .add_resource(stream("two.yml", "!Assembly Y:\n  a: 2\n"))
        .unwrap_err();

    insta::assert_snapshot!(
        err.to_string(),
        @"Cannot merge duplicate mapping key 'a' at two.yml:2:3 into existing mapping at one.yml:2:3"
    );
}

#[test]
fn incompatible_transclusion() {
    let mut assembler = Assembler::default();
    assembler
        .add_resource(stream("r.yml", "!Assembly X: [a]"))
        .unwrap();
    let err = assembler
        .render(stream("t.yml", "Value: {!Transclude X: scalar}"))
        .unwrap_err();

    let Error::MergeIncompatible {
        found,
        found_mark,
        existing,
        existing_mark,
    } = &err
    else {
        panic!("unexpected error {err:?}");
    };
    assert_eq!(found, "!!seq");
    assert_eq!(found_mark.source.as_deref(), Some("r.yml"));
    assert_eq!(existing, "!!str");
    assert_eq!(existing_mark.to_string(), "t.yml:1:24");
}

#[test]
fn malformed_markers() {
    let mut assembler = Assembler::default();

    let err = assembler
        .add_resource(stream("r.yml", "X:\n  !Assembly A: 1\n  B: 2\n"))
        .unwrap_err();
    assert!(err.to_string().starts_with("Assembly must be a single-entry mapping at r.yml:"));

    let err = assembler
        .render(stream("t.yml", "X:\n  ? !Transclude [A]\n  : 1\n"))
        .unwrap_err();
    assert!(err.to_string().starts_with("Transclude name must be a scalar at t.yml:"));
}

#[test]
fn recursive_assemblies() {
    let mut assembler = Assembler::default();
    let resource = "\
!Assembly A: {x: {!Transclude B: }}
---
!Assembly B: [{!Transclude A: }]
";
    assembler.add_resource(stream("r.yml", resource)).unwrap();

    let err = assembler
        .render(stream("t.yml", "{!Transclude A: }"))
        .unwrap_err();
    assert!(matches!(err, Error::RecursiveTransclusion { ref name, .. } if name == "A"));
}
