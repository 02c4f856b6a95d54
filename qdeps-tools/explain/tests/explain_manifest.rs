//! Integration tests for loading manifests from disk and explaining them.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use qdeps::{CallPath, TypeDescriptor};
use qdeps_explain::{plan, Config, ConfigError, Manifest, ManifestError, PlanError, ResolveReport};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn t(name: &str) -> TypeDescriptor {
    name.parse().unwrap()
}

#[test]
fn garage_plan_picks_engines_by_context() {
    let wiring = Manifest::load(fixture("garage.toml")).unwrap().wire().unwrap();
    let root = plan(&wiring, &t("App"), &Config::default()).unwrap();

    let engines: Vec<String> = root
        .walk()
        .filter(|n| n.requested == t("Engine"))
        .map(|n| format!("{} => {}", n.path, n.given))
        .collect();
    assert_eq!(engines, vec!["App -> Car => V8", "App -> Truck => V6"]);

    let loggers: Vec<String> = root
        .walk()
        .filter(|n| n.requested == t("Ptr<Logger>"))
        .map(|n| format!("{} => {}", n.path, n.given))
        .collect();
    assert_eq!(loggers, vec!["App -> Car -> V8 => Logger", "App => Logger"]);
}

#[test]
fn garage_plan_is_fully_declared() {
    let wiring = Manifest::load(fixture("garage.toml")).unwrap().wire().unwrap();
    let config = Config {
        require_declared: true,
        ..Config::default()
    };

    let root = plan(&wiring, &t("App"), &config).unwrap();
    assert!(root.walk().all(|n| wiring.is_declared(&n.given)));
}

#[test]
fn resolve_report_matches_scenario() {
    let wiring = Manifest::load(fixture("garage.toml")).unwrap().wire().unwrap();
    let resolver = wiring.resolver();
    let config = Config::default();

    let in_car = CallPath::new(vec![t("App"), t("Car")]);
    let report = ResolveReport::build(&resolver, &t("Engine"), &in_car, &config);
    assert_eq!(report.winner.given, t("V8"));
    assert_eq!(report.winner.index, Some(0));

    let report = ResolveReport::build(&resolver, &t("Wheel"), &in_car, &config);
    assert_eq!(report.winner.given, t("Wheel"));
    assert_eq!(report.winner.index, None);
}

#[test]
fn manifest_and_config_from_temp_files() {
    let dir = tempfile::tempdir().unwrap();

    let manifest_path = dir.path().join("cycle.toml");
    fs::write(
        &manifest_path,
        "[[types]]\nname = \"A\"\ndepends = [\"B\"]\n\n[[types]]\nname = \"B\"\ndepends = [\"A\"]\n",
    )
    .unwrap();
    let config_path = dir.path().join("explain.toml");
    fs::write(&config_path, "max_depth = 8\n").unwrap();

    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.max_depth, 8);

    let wiring = Manifest::load(&manifest_path).unwrap().wire().unwrap();
    let err = plan(&wiring, &t("A"), &config).unwrap_err();
    assert!(matches!(err, PlanError::Cycle { .. }));
}

#[test]
fn missing_files_are_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    assert!(matches!(Manifest::load(&missing), Err(ManifestError::Io { .. })));
    assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));
}
