//! Drives the `parse_dashboard` binary and checks its stdout/exit contract.

use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Output};

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

const USAGE: &str = "Usage: parse_dashboard <pdf_path>";

const RECORD_KEYS: &[&str] = &[
    "projectName",
    "projectCode",
    "clientName",
    "projectManager",
    "contractValue",
    "baselineBudget",
    "baselineGPM",
    "workingBudget",
    "currentGPM",
    "actualCosts",
    "projectProgress",
];

fn command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_parse_dashboard"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1, "stdout: {stdout}");
    serde_json::from_str(&stdout).unwrap()
}

fn assert_error_only(output: &Output) -> String {
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(output);
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 1, "unexpected keys in {json}");
    let message = object["error"].as_str().unwrap().to_string();
    assert!(!message.is_empty());
    message
}

fn single_page_pdf(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = Vec::new();
    let mut y: i64 = 720;
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 11.into()]));
        operations.push(Operation::new("Td", vec![72.into(), y.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("ET", vec![]));
        y -= 24;
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn dashboard_pdf() -> Vec<u8> {
    single_page_pdf(&[
        "Project Name: Harbor Terminal Expansion",
        "Client Name: Port Authority",
        "Baseline Budget: 1,234,567.00",
        "Baseline GPM: 31.00%",
        "Estimated Completion: 0.5%",
    ])
}

fn dashboard_pdf_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(&dashboard_pdf()).unwrap();
    file
}

/// Runs the binary with a single relative argument inside a directory that
/// holds a dashboard PDF under that name.
fn run_in_dir_with_file_named(name: &str) -> Output {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(name), dashboard_pdf()).unwrap();
    command()
        .current_dir(dir.path())
        .arg(name)
        .output()
        .unwrap()
}

fn assert_parsed_dashboard(output: &Output) {
    assert_eq!(output.status.code(), Some(0));
    let json = stdout_json(output);
    assert_eq!(json["projectName"], "Harbor Terminal Expansion");
}

#[test]
fn no_arguments_prints_usage() {
    let output = command().output().unwrap();
    assert_eq!(assert_error_only(&output), USAGE);
}

#[test]
fn two_arguments_print_usage() {
    let output = command().args(["a.pdf", "b.pdf"]).output().unwrap();
    assert_eq!(assert_error_only(&output), USAGE);
}

#[test]
fn missing_file_reports_error() {
    let output = command()
        .arg("/no/such/dir/dashboard.pdf")
        .output()
        .unwrap();
    assert_error_only(&output);
}

#[test]
fn corrupt_file_reports_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"this is a spreadsheet, honestly").unwrap();

    let output = command().arg(file.path()).output().unwrap();
    assert_error_only(&output);
}

#[test]
fn parses_a_dashboard_pdf() {
    let file = dashboard_pdf_file();
    let output = command().arg(file.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let json = stdout_json(&output);
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), RECORD_KEYS.len());
    for key in RECORD_KEYS {
        assert!(object.contains_key(*key), "missing {key}");
    }

    assert_eq!(json["projectName"], "Harbor Terminal Expansion");
    assert_eq!(json["clientName"], "Port Authority");
    assert_eq!(json["projectCode"], "");
    assert_eq!(json["baselineBudget"], 1_234_567);
    assert_eq!(json["baselineGPM"], 3100);
    assert_eq!(json["projectProgress"], 50);
    assert_eq!(json["contractValue"], 0);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let file = dashboard_pdf_file();
    let first = command().arg(file.path()).output().unwrap();
    let second = command().arg(file.path()).output().unwrap();

    assert_eq!(first.status.code(), Some(0));
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn help_flag_is_not_special() {
    for flag in ["--help", "-h", "--version", "-V"] {
        let output = command().arg(flag).output().unwrap();
        let message = assert_error_only(&output);
        assert_ne!(message, USAGE, "{flag}");
    }
}

#[test]
fn separator_counts_as_an_argument() {
    let file = dashboard_pdf_file();
    let output = command().arg("--").arg(file.path()).output().unwrap();
    assert_eq!(assert_error_only(&output), USAGE);
}

#[test]
fn path_starting_with_hyphen_is_parsed() {
    assert_parsed_dashboard(&run_in_dir_with_file_named("-report.pdf"));
}

#[test]
fn path_named_like_flags_is_parsed() {
    for name in ["-", "--", "--help"] {
        assert_parsed_dashboard(&run_in_dir_with_file_named(name));
    }
}

#[test]
fn missing_file_error_names_the_path() {
    let path = Path::new("/no/such/dir/dashboard.pdf");
    let output = command().arg(path).output().unwrap();
    let message = assert_error_only(&output);
    assert!(message.contains("/no/such/dir/dashboard.pdf"), "{message}");
}

#[test]
fn environment_does_not_change_the_result() {
    let file = dashboard_pdf_file();
    let baseline = command().arg(file.path()).output().unwrap();
    let with_env = command()
        .arg(file.path())
        .env("DASHBOARD_FIELDS_FILE", "/no/such/fields.toml")
        .output()
        .unwrap();

    assert_eq!(with_env.status.code(), Some(0));
    assert_eq!(baseline.stdout, with_env.stdout);
}
