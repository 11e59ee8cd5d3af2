mod common;

use common::{cmd, pdf_with_pages, temp_file};
use lopdf::dictionary;
use predicates::prelude::*;

fn ext_gstate_resources() -> lopdf::Dictionary {
    dictionary! {
        "ExtGState" => dictionary! {
            "GS0" => dictionary! { "LW" => 4, "BM" => "Screen" },
        },
    }
}

#[test]
fn reports_operator_counts_and_state_per_page() {
    let pdf = pdf_with_pages(
        &[b"/GS0 gs 0 0 m 1 1 l S", b"q 0.5 g Q"],
        ext_gstate_resources(),
    );
    let file = temp_file(&pdf);
    cmd()
        .arg("page")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("page 1: 4 operators"))
        .stdout(predicate::str::contains("line_width: 4"))
        .stdout(predicate::str::contains("blend_mode: Screen"))
        .stdout(predicate::str::contains("page 2: 3 operators"));
}

#[test]
fn pages_option_selects_subset_as_json() {
    let pdf = pdf_with_pages(
        &[b"1 w", b"2 w", b"3 w 3 w"],
        lopdf::Dictionary::new(),
    );
    let file = temp_file(&pdf);
    let output = cmd()
        .arg("page")
        .arg(file.path())
        .args(["--pages", "1,3", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let pages = json.as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["page"], 1);
    assert_eq!(pages[1]["page"], 3);
    assert_eq!(pages[1]["operators"]["w"], 2);
    assert_eq!(pages[1]["state"]["line_width"], 3.0);
}

#[test]
fn page_out_of_range_is_an_error() {
    let pdf = pdf_with_pages(&[b"q Q"], lopdf::Dictionary::new());
    let file = temp_file(&pdf);
    cmd()
        .arg("page")
        .arg(file.path())
        .args(["--pages", "2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("exceeds document page count"));
}

#[test]
fn missing_resource_names_the_page() {
    let pdf = pdf_with_pages(&[b"q Q", b"/Missing gs"], ext_gstate_resources());
    let file = temp_file(&pdf);
    cmd()
        .arg("page")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: page 2:"))
        .stderr(predicate::str::contains("Missing"));
}

#[test]
fn non_pdf_input_is_rejected() {
    let file = temp_file(b"not a pdf");
    cmd()
        .arg("page")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: failed to open PDF"));
}
