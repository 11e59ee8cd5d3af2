mod common;

use common::{cmd, temp_file};
use predicates::prelude::*;

#[test]
fn reformats_one_operator_per_line() {
    let file = temp_file(b"q 1 0 0 1 72 72 cm BT /F1 12 Tf (Hi) Tj ET Q");
    cmd()
        .arg("format")
        .arg(file.path())
        .assert()
        .success()
        .stdout("q\n1 0 0 1 72 72 cm\nBT\n/F1 12 Tf\n(Hi) Tj\nET\nQ\n");
}

#[test]
fn keeps_inline_image_data() {
    let file = temp_file(b"BI /W 2 /H 1 /CS /G ID \x00\xff EI Q");
    let output = cmd().arg("format").arg(file.path()).output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        output.stdout,
        b"BI\n/W 2 /H 1 /CS /G ID\n\x00\xff EI\nQ\n".to_vec()
    );
}

#[test]
fn unknown_operators_pass_through() {
    let file = temp_file(b"1 2 xyz");
    cmd()
        .arg("format")
        .arg(file.path())
        .assert()
        .success()
        .stdout("1 2 xyz\n");
}

#[test]
fn syntax_error_exits_with_code_1() {
    let file = temp_file(b"1 0 0 ) cm");
    cmd()
        .arg("format")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"));
}
