use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const TRIANGLE_OBJ: &str = "v 0 0 0\nv 2 0 0\nv 0 2 0\nf 1 2 3\n";

fn resource_dir() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("bunny.obj"), TRIANGLE_OBJ).expect("write mesh");
    dir
}

fn viewer() -> Command {
    Command::cargo_bin("shading-viewer").expect("binary exists")
}

#[test]
fn summary_reports_reference_defaults() {
    let dir = resource_dir();
    viewer()
        .arg(dir.path())
        .arg("--summary-only")
        .assert()
        .success()
        .stdout(contains("Loaded catalog with 3 materials and 2 lights"))
        .stdout(contains("Mesh: 3 vertices, 1 triangles"))
        .stdout(contains(
            "Scene state: material=0 primary_light=0 secondary_light=1 shading=phong cull=none",
        ))
        .stdout(contains(
            "Frame: phong primary=(1.00, 1.00, 1.00)@0.80 secondary=(-1.00, 1.00, 1.00)@0.20",
        ));
}

#[test]
fn replayed_keys_update_selection_and_lights() {
    let dir = resource_dir();
    viewer()
        .arg(dir.path())
        .args(["--keys", "mmmmlYYYc", "--summary-only"])
        .assert()
        .success()
        .stdout(contains("Replayed 9 bound key(s)"))
        .stdout(contains(
            "Scene state: material=2 primary_light=1 secondary_light=0 shading=phong cull=back",
        ))
        .stdout(contains(" - light 1 pos=(-1.00, 1.03, 1.00) intensity=0.20"))
        .stdout(contains(" - light 0 pos=(1.00, 1.00, 1.00) intensity=0.80"));
}

#[test]
fn flat_mode_reports_matrices_only() {
    let dir = resource_dir();
    viewer()
        .arg(dir.path())
        .args(["--keys", "S", "--summary-only"])
        .assert()
        .success()
        .stdout(contains("shading=flat"))
        .stdout(contains("Frame: flat (matrices only)"));
}

#[test]
fn missing_mesh_falls_back_to_cube() {
    let dir = TempDir::new().expect("temp dir");
    viewer()
        .arg(dir.path())
        .arg("--summary-only")
        .assert()
        .success()
        .stdout(contains("Mesh: 24 vertices, 12 triangles"));
}

#[test]
fn custom_catalog_is_loaded() {
    let dir = resource_dir();
    let catalog = dir.path().join("catalog.xml");
    fs::write(
        &catalog,
        r#"<catalog>
    <material><ambient>0.1 0.1 0.1</ambient><diffuse>1 0 0</diffuse><shininess>10</shininess></material>
    <light><position>0 3 0</position><intensity>0.5</intensity></light>
    <light><position>0 -3 0</position><intensity>0.25</intensity></light>
    <light><position>3 0 0</position></light>
</catalog>"#,
    )
    .expect("write catalog");

    viewer()
        .arg(dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .args(["--keys", "mX", "--summary-only"])
        .assert()
        .success()
        .stdout(contains("Loaded catalog with 1 materials and 3 lights"))
        .stdout(contains("material=0"))
        .stdout(contains(" - light 0 pos=(0.01, 3.00, 0.00) intensity=0.50"))
        .stdout(contains(" - light 2 pos=(3.00, 0.00, 0.00) intensity=1.00"));
}

#[test]
fn single_light_catalog_is_rejected() {
    let dir = resource_dir();
    let catalog = dir.path().join("catalog.xml");
    fs::write(
        &catalog,
        "<catalog><material><shininess>10</shininess></material><light/></catalog>",
    )
    .expect("write catalog");

    viewer()
        .arg(dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .arg("--summary-only")
        .assert()
        .failure()
        .stderr(contains("at least two lights"));
}

#[test]
fn missing_resource_dir_prints_usage_and_exits_cleanly() {
    viewer()
        .assert()
        .success()
        .stderr(contains("Please specify the resource directory."))
        .stderr(contains("Usage: shading-viewer <RESOURCE_DIR>"));
}

#[test]
fn unknown_flag_is_rejected() {
    let dir = resource_dir();
    viewer()
        .arg(dir.path())
        .arg("--wireframe")
        .assert()
        .failure()
        .stderr(contains("Unknown argument: --wireframe"));
}
