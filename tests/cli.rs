use assert_cmd::Command;

mod common;

fn boxtag() -> Command {
    let mut cmd = Command::cargo_bin("boxtag").unwrap();
    cmd.env_remove("BOXTAG_FONT").env_remove("RUST_LOG");
    cmd
}

#[test]
fn runs() {
    boxtag().assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = boxtag();
    cmd.arg("-V");
    cmd.assert().success().stdout("boxtag 0.1.0\n");
}

// Annotate subcommand tests

#[test]
fn annotate_writes_output_image() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("in.png");
    let output = temp.path().join("out").join("annotated.png");
    common::write_png(&input, 100, 80);

    let mut cmd = boxtag();
    cmd.arg("annotate")
        .arg(&input)
        .args(["--regions", "tests/fixtures/sample_valid.regions.json"])
        .arg("--output")
        .arg(&output)
        .args(["--color", "red", "--show-scores"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Annotated 2 region(s)"));

    let annotated = image::open(&output).expect("open output").to_rgba8();
    assert_eq!(annotated.dimensions(), (100, 80));
    // Left edge of the sneaker box, drawn in red.
    assert_eq!(*annotated.get_pixel(12, 45), image::Rgba([255, 0, 0, 255]));
}

#[test]
fn annotate_reads_response_envelope() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("in.png");
    let output = temp.path().join("out.jpg");
    common::write_png(&input, 64, 64);

    let mut cmd = boxtag();
    cmd.arg("annotate")
        .arg(&input)
        .args(["-r", "tests/fixtures/envelope.json", "-o"])
        .arg(&output);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Annotated 2 region(s)"));
    assert!(output.exists());
}

#[test]
fn annotate_with_missing_font_falls_back() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("in.png");
    let output = temp.path().join("out.png");
    common::write_png(&input, 100, 80);

    let mut cmd = boxtag();
    cmd.arg("annotate")
        .arg(&input)
        .args(["-r", "tests/fixtures/sample_valid.regions.json"])
        .arg("-o")
        .arg(&output)
        .args(["--font", "no-such-font.ttf", "--font-dir"])
        .arg(temp.path());
    cmd.assert().success();
    assert!(output.exists());
}

#[test]
fn annotate_zero_thickness_succeeds() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("in.png");
    let output = temp.path().join("out.png");
    common::write_png(&input, 100, 80);

    let mut cmd = boxtag();
    cmd.arg("annotate")
        .arg(&input)
        .args(["-r", "tests/fixtures/sample_valid.regions.json"])
        .arg("-o")
        .arg(&output)
        .args(["--thickness", "0"]);
    cmd.assert().success();

    let annotated = image::open(&output).expect("open output").to_rgba8();
    assert_eq!(*annotated.get_pixel(12, 45), common::GRAY);
}

#[test]
fn annotate_normalized_flag_scales_pixel_regions() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("in.png");
    let output = temp.path().join("out.png");
    let regions = temp.path().join("regions.json");
    common::write_png(&input, 200, 100);
    common::write_text(
        &regions,
        r#"[{"label": "", "xmin": 0.25, "ymin": 0.5, "xmax": 0.75, "ymax": 0.9, "normalized": false}]"#,
    );

    let mut cmd = boxtag();
    cmd.arg("annotate")
        .arg(&input)
        .arg("-r")
        .arg(&regions)
        .arg("-o")
        .arg(&output)
        .args(["--color", "red", "--normalized"]);
    cmd.assert().success();

    let annotated = image::open(&output).expect("open output").to_rgba8();
    let red = image::Rgba([255, 0, 0, 255]);
    // Box resolves to (50, 50)-(150, 90): left and right edges are outlined.
    assert_eq!(*annotated.get_pixel(50, 70), red);
    assert_eq!(*annotated.get_pixel(150, 70), red);
    assert_eq!(*annotated.get_pixel(100, 70), common::GRAY);
    assert_eq!(*annotated.get_pixel(0, 70), common::GRAY);
}

#[test]
fn annotate_rejects_unknown_color() {
    let mut cmd = boxtag();
    cmd.args([
        "annotate",
        "in.png",
        "-r",
        "tests/fixtures/sample_valid.regions.json",
        "-o",
        "out.png",
        "--color",
        "blurple",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("unrecognized color 'blurple'"));
}

#[test]
fn annotate_missing_image_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let mut cmd = boxtag();
    cmd.arg("annotate")
        .arg(temp.path().join("nope.png"))
        .args(["-r", "tests/fixtures/sample_valid.regions.json", "-o"])
        .arg(temp.path().join("out.png"));
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Failed to read image"));
}

#[test]
fn annotate_bad_regions_file_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("in.png");
    let regions = temp.path().join("regions.json");
    common::write_png(&input, 10, 10);
    common::write_text(&regions, "{\"nothing\": true}");

    let mut cmd = boxtag();
    cmd.arg("annotate")
        .arg(&input)
        .arg("-r")
        .arg(&regions)
        .arg("-o")
        .arg(temp.path().join("out.png"));
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Failed to parse regions JSON"));
}

// Batch subcommand tests

#[test]
fn batch_decodes_each_source_once() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_png(&temp.path().join("a.png"), 50, 50);
    common::write_png(&temp.path().join("b.png"), 60, 40);
    common::write_text(
        &temp.path().join("preds.json"),
        r#"[{"label": "cup", "xmin": 0.2, "ymin": 0.4, "xmax": 0.8, "ymax": 0.9, "normalized": true}]"#,
    );
    let manifest = temp.path().join("manifest.json");
    common::write_text(
        &manifest,
        r#"{"jobs": [
            {"source": "a.png", "regions": "preds.json", "output": "out/a1.png"},
            {"source": "a.png", "regions": "preds.json", "output": "out/a2.png"},
            {"source": "b.png", "regions": "preds.json", "output": "out/b.png"}
        ]}"#,
    );

    let mut cmd = boxtag();
    cmd.arg("batch").arg(&manifest);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Annotated 3 image(s) from 2 source(s)"));

    for name in ["a1.png", "a2.png", "b.png"] {
        assert!(temp.path().join("out").join(name).exists(), "{}", name);
    }
}

#[test]
fn batch_job_color_overrides_style() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_png(&temp.path().join("a.png"), 100, 100);
    common::write_text(
        &temp.path().join("preds.json"),
        r#"[{"label": "cup", "xmin": 20, "ymin": 40, "xmax": 80, "ymax": 90}]"#,
    );
    let manifest = temp.path().join("manifest.json");
    common::write_text(
        &manifest,
        r##"{"jobs": [
            {"source": "a.png", "regions": "preds.json", "output": "default.png"},
            {"source": "a.png", "regions": "preds.json", "output": "blue.png", "color": "#0000ff"}
        ]}"##,
    );

    let mut cmd = boxtag();
    cmd.arg("batch").arg(&manifest).args(["--color", "red"]);
    cmd.assert().success();

    let default = image::open(temp.path().join("default.png")).expect("open").to_rgba8();
    let blue = image::open(temp.path().join("blue.png")).expect("open").to_rgba8();
    assert_eq!(*default.get_pixel(20, 60), image::Rgba([255, 0, 0, 255]));
    assert_eq!(*blue.get_pixel(20, 60), image::Rgba([0, 0, 255, 255]));
}

#[test]
fn batch_invalid_job_color_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_png(&temp.path().join("a.png"), 20, 20);
    common::write_text(&temp.path().join("preds.json"), "[]");
    let manifest = temp.path().join("manifest.json");
    common::write_text(
        &manifest,
        r#"{"jobs": [{"source": "a.png", "regions": "preds.json", "output": "o.png", "color": "blurple"}]}"#,
    );

    let mut cmd = boxtag();
    cmd.arg("batch").arg(&manifest);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("unrecognized color 'blurple'"));
    assert!(!temp.path().join("o.png").exists());
}

#[test]
fn batch_bad_manifest_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let manifest = temp.path().join("manifest.json");
    common::write_text(&manifest, "[]");

    let mut cmd = boxtag();
    cmd.arg("batch").arg(&manifest);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Failed to parse batch manifest"));
}

// Validate subcommand tests

#[test]
fn validate_valid_regions_succeeds() {
    let mut cmd = boxtag();
    cmd.args([
        "validate",
        "tests/fixtures/sample_valid.regions.json",
        "--width",
        "100",
        "--height",
        "80",
    ]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Validation passed"));
}

#[test]
fn validate_against_image_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let image = temp.path().join("in.png");
    common::write_png(&image, 100, 80);

    let mut cmd = boxtag();
    cmd.args(["validate", "tests/fixtures/sample_valid.regions.json", "--image"])
        .arg(&image);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Validation passed"));
}

#[test]
fn validate_invalid_regions_fails() {
    let mut cmd = boxtag();
    cmd.args([
        "validate",
        "tests/fixtures/sample_invalid.regions.json",
        "--width",
        "100",
        "--height",
        "80",
    ]);
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("error(s)"))
        .stdout(predicates::str::contains("InvalidBBoxOrdering"))
        .stdout(predicates::str::contains("EmptyLabel"))
        .stdout(predicates::str::contains("NormalizedOutOfRange"));
}

#[test]
fn validate_warnings_pass_unless_strict() {
    let args = [
        "validate",
        "tests/fixtures/sample_warnings.regions.yaml",
        "--width",
        "100",
        "--height",
        "80",
    ];

    let mut cmd = boxtag();
    cmd.args(args);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("ScoreOutOfRange"));

    let mut strict = boxtag();
    strict.args(args).arg("--strict");
    strict
        .assert()
        .failure()
        .stderr(predicates::str::contains("Validation failed"));
}

#[test]
fn validate_json_output_format() {
    let mut cmd = boxtag();
    cmd.args([
        "validate",
        "tests/fixtures/sample_valid.regions.json",
        "--width",
        "100",
        "--height",
        "80",
        "--output",
        "json",
    ]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"error_count\": 0"))
        .stdout(predicates::str::contains("\"warning_count\": 0"));
}

#[test]
fn validate_requires_dimensions() {
    let mut cmd = boxtag();
    cmd.args(["validate", "tests/fixtures/sample_valid.regions.json"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("--image or both --width and --height"));
}

#[test]
fn validate_unsupported_output_fails() {
    let mut cmd = boxtag();
    cmd.args([
        "validate",
        "tests/fixtures/sample_valid.regions.json",
        "--width",
        "100",
        "--height",
        "80",
        "--output",
        "xml",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Unsupported format"));
}

#[test]
fn validate_nonexistent_file_fails() {
    let mut cmd = boxtag();
    cmd.args(["validate", "nonexistent_file.json", "--width", "1", "--height", "1"]);
    cmd.assert().failure();
}
