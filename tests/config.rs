use std::{fs, path::PathBuf};

use croplot::{
    config::{AppConfig, ConfigLoader, ResultDisplay},
    geometry::Viewport,
    params::Parameters,
    solver::SolverKind,
};
use tempfile::tempdir;

fn config_loader() -> ConfigLoader {
    ConfigLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn config_path() -> PathBuf {
    PathBuf::from("config/croplot.yaml")
}

#[test]
fn bundled_config_matches_defaults() {
    let config = config_loader().load(config_path()).expect("config parses");
    assert_eq!(config, AppConfig::default());
}

#[test]
fn partial_config_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("farm.yaml"),
        "initial:\n  land: 10\n  labor: 15\nsolver: vertex\nresult_display: hide_stale\n",
    )
    .unwrap();

    let config = ConfigLoader::new(dir.path()).load("farm.yaml").unwrap();
    assert_eq!(config.initial, Parameters::new(10.0, 15.0, 3.0, 4.0).unwrap());
    assert_eq!(config.solver, SolverKind::Vertex);
    assert_eq!(config.result_display, ResultDisplay::HideStale);
    assert_eq!(config.graph, Viewport::default());
    assert_eq!(config.server.port, 8080);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().expect("tempdir");
    let err = ConfigLoader::new(dir.path())
        .load("absent.yaml")
        .unwrap_err();
    assert!(format!("{err:#}").contains("absent.yaml"));
}

#[test]
fn invalid_graph_is_rejected_with_context() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("bad.yaml"),
        "graph:\n  origin_x: 0\n  origin_y: 0\n  width: 0\n  height: 100\n",
    )
    .unwrap();

    let err = ConfigLoader::new(dir.path()).load("bad.yaml").unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Invalid config"));
    assert!(message.contains("graph must have a positive size"));
}

#[test]
fn unknown_solver_is_a_parse_error() {
    let err = AppConfig::from_yaml_str("solver: simplex\n").unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config"));
}

#[test]
fn no_file_means_defaults() {
    let config = config_loader().load_or_default(None).unwrap();
    assert_eq!(config, AppConfig::default());
}
