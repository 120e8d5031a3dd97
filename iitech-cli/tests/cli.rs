use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("iitech-template")
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copy the newsletter fixture into a scratch dir so in-place writes don't touch it.
fn scratch_template(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("newsletter.html");
    fs::copy(fixture_path("newsletter.html"), &path).unwrap();
    path
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn transform_rewrites_the_template_in_place() {
    let dir = TempDir::new().unwrap();
    let template = scratch_template(&dir);
    let transforms = write(&dir, "edits.yaml", "Sports: {title: Cricket}\n");

    cargo_bin_cmd!("iitech")
        .arg("transform")
        .arg(&template)
        .arg(&transforms)
        .assert()
        .success()
        .stdout(predicate::str::contains("applied    Sports"));

    assert!(read(&template).contains(r#"<h3 class="article-title">Cricket</h3>"#));
}

#[test]
fn transform_writes_to_output_when_given() {
    let dir = TempDir::new().unwrap();
    let template = scratch_template(&dir);
    let before = read(&template);
    let output = dir.path().join("out.html");
    let transforms = write(&dir, "edits.yaml", "Sports: {append: Bring water.}\n");

    cargo_bin_cmd!("iitech")
        .arg("transform")
        .arg(&template)
        .arg(&transforms)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(read(&template), before);
    assert!(read(&output).contains("Saturday.<br><br>Bring water."));
}

#[test]
fn failed_entries_exit_with_one_but_still_write() {
    let dir = TempDir::new().unwrap();
    let template = scratch_template(&dir);
    let transforms = write(
        &dir,
        "edits.yaml",
        "Obituaries: {append: x}\nSports: {title: Cricket}\n",
    );

    cargo_bin_cmd!("iitech")
        .arg("transform")
        .arg(&template)
        .arg(&transforms)
        .assert()
        .code(1)
        .stdout(
            predicate::str::contains("not found  Obituaries")
                .and(predicate::str::contains("applied    Sports")),
        );

    assert!(read(&template).contains("Cricket"));
}

#[test]
fn server_root_flag_resolves_relative_images() {
    let dir = TempDir::new().unwrap();
    let template = scratch_template(&dir);
    let transforms = write(
        &dir,
        "edits.yaml",
        "top: {image: images/navroz.jpg, caption: Navroz Mubarak}\n",
    );

    cargo_bin_cmd!("iitech")
        .arg("transform")
        .arg(&template)
        .arg(&transforms)
        .arg("--server-root")
        .arg("https://example.org/insight/")
        .assert()
        .success();

    assert!(read(&template).contains(r#"src="https://example.org/insight/images/navroz.jpg""#));
}

#[test]
fn json_format_reports_tagged_outcomes() {
    let dir = TempDir::new().unwrap();
    let template = scratch_template(&dir);
    let transforms = write(&dir, "edits.yaml", "Sports: {left: only}\n");

    cargo_bin_cmd!("iitech")
        .arg("--format")
        .arg("json")
        .arg("transform")
        .arg(&template)
        .arg(&transforms)
        .assert()
        .code(1)
        .stdout(
            predicate::str::contains(r#""outcome": "configuration_error""#)
                .and(predicate::str::contains("requires a matching 'right'")),
        );
}

#[test]
fn invalid_yaml_is_fatal() {
    let dir = TempDir::new().unwrap();
    let template = scratch_template(&dir);
    let transforms = write(&dir, "edits.yaml", "Sports: [unclosed\n");

    cargo_bin_cmd!("iitech")
        .arg("transform")
        .arg(&template)
        .arg(&transforms)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to load transformations"));
}

#[test]
fn missing_template_is_fatal() {
    let dir = TempDir::new().unwrap();
    let transforms = write(&dir, "edits.yaml", "Sports: {title: x}\n");

    cargo_bin_cmd!("iitech")
        .arg("transform")
        .arg(dir.path().join("nope.html"))
        .arg(&transforms)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read template"));
}

#[test]
fn check_reports_malformed_entries() {
    let dir = TempDir::new().unwrap();
    let transforms = write(
        &dir,
        "edits.yaml",
        "Sports: {title: fine}\nHealth: {append: {blod: oops}}\n",
    );

    cargo_bin_cmd!("iitech")
        .arg("check")
        .arg(&transforms)
        .assert()
        .code(1)
        .stdout(
            predicate::str::contains("ok         Sports")
                .and(predicate::str::contains("unknown descriptor key 'blod'")),
        );
}

#[test]
fn check_passes_a_clean_document() {
    let dir = TempDir::new().unwrap();
    let transforms = write(&dir, "edits.yaml", "Sports: {prepend: Hello}\n");

    cargo_bin_cmd!("iitech")
        .arg("check")
        .arg(&transforms)
        .assert()
        .success();
}

#[test]
fn config_file_changes_layout_classes() {
    let dir = TempDir::new().unwrap();
    let template = write(
        &dir,
        "page.html",
        r#"<img class="banner" src="a.jpg"><p class="top-caption">c</p>
<div class="story"><h1 class="headline">Only</h1><p class="copy">text</p></div>"#,
    );
    let config = write(
        &dir,
        "iitech.toml",
        "[template]\narticle = \"story\"\ntitle = \"headline\"\nbody = \"copy\"\ntop_image = \"banner\"\n",
    );
    let transforms = write(&dir, "edits.yaml", "Only: {append: more}\n");

    cargo_bin_cmd!("iitech")
        .arg("--config")
        .arg(&config)
        .arg("transform")
        .arg(&template)
        .arg(&transforms)
        .assert()
        .success();

    assert!(read(&template).contains("text<br><br>more"));
}

#[test]
fn review_rewrites_links_in_place() {
    let dir = TempDir::new().unwrap();
    let template = scratch_template(&dir);

    cargo_bin_cmd!("iitech")
        .arg("review")
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "reviewed 3 links: 1 retargeted, 1 untracked, 1 removed",
        ));

    let html = read(&template);
    assert!(html.contains(r#"href="https://the.ismaili/events?week=3""#));
    assert!(!html.contains("##TRACKCLICK##"));
}

#[test]
fn review_reports_json() {
    let dir = TempDir::new().unwrap();
    let template = scratch_template(&dir);
    let output = dir.path().join("out.html");

    cargo_bin_cmd!("iitech")
        .arg("review")
        .arg(&template)
        .arg("-o")
        .arg(&output)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""removed": 1"#));

    assert!(read(&template).contains("##TRACKCLICK##"));
    assert!(!read(&output).contains("##TRACKCLICK##"));
}
