/// Fixture Verification Tests
/// Runs the configurator against the committed sample project in
/// testdata/hello_di: two entry modules, one of which pulls in the
/// two-implementation OUTPUT interface.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use wirecraft::application::ConfigureUsecase;
use wirecraft::domain::config::Configuration;
use wirecraft::domain::error::ConfigureError;
use wirecraft::ports::ForwardingHeaderEmitter;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/hello_di")
}

fn fixture_config(root: &str, bindings: &[(&str, &str)], out: PathBuf) -> Configuration {
    Configuration {
        root: root.to_string(),
        bindings: bindings
            .iter()
            .map(|(i, m)| (i.to_string(), m.to_string()))
            .collect::<BTreeMap<_, _>>(),
        search_paths: vec![fixture_dir()],
        output: out,
        ..Configuration::default()
    }
}

#[test]
fn test_main_root_resolves_without_output_binding() {
    let dir = tempdir().unwrap();
    let config = fixture_config("MAIN", &[], dir.path().join("gen"));

    let emitter = ForwardingHeaderEmitter::new(None);
    let usecase = ConfigureUsecase { emitter: &emitter, cache: None };
    let resolution = usecase.run(&config).unwrap();

    let bound: Vec<_> = resolution.bindings.keys().cloned().collect();
    assert_eq!(bound, vec!["HELLO", "MAIN", "WORLD"]);

    // HELLO is header-only; only MAIN and WORLD contribute sources.
    let sources = resolution.source_files();
    assert_eq!(sources.len(), 2);
    assert!(sources[0].ends_with("main.c"));
    assert!(sources[1].ends_with("world.c"));
}

#[test]
fn test_report_root_requires_an_output_binding() {
    let dir = tempdir().unwrap();
    let config = fixture_config("REPORT", &[], dir.path().join("gen"));

    let emitter = ForwardingHeaderEmitter::new(None);
    let usecase = ConfigureUsecase { emitter: &emitter, cache: None };
    let err = usecase.run(&config).unwrap_err();

    match err.downcast_ref::<ConfigureError>() {
        Some(ConfigureError::AmbiguousImplementation { interface, candidates }) => {
            assert_eq!(interface, "OUTPUT");
            assert_eq!(candidates, &vec!["CONSOLE".to_string(), "MSGBOX".to_string()]);
        }
        other => panic!("expected AmbiguousImplementation, got {other:?}"),
    }
}

#[test]
fn test_report_root_with_console_binding_forwards_to_console() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("gen");
    let config = fixture_config("REPORT", &[("OUTPUT", "CONSOLE")], out.clone());

    let emitter = ForwardingHeaderEmitter::new(None);
    let usecase = ConfigureUsecase { emitter: &emitter, cache: None };
    let resolution = usecase.run(&config).unwrap();

    assert_eq!(resolution.bindings["OUTPUT"].implementation, "CONSOLE");
    let forwarded = fs::read_to_string(out.join("OUTPUT.h")).unwrap();
    assert!(forwarded.contains("output_console.h"));
}
