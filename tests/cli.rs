use std::io::Write;
use std::process::{Command, Output, Stdio};

const BANNER: &str = "Compilación y Ejecución Exitosa!";

fn dulce(args: &[&str], source: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_dulce"))
        .args(args)
        .current_dir(std::env::temp_dir())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child.stdin.take().unwrap().write_all(source.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[test]
fn run_prints_banner_and_output() {
    let out = dulce(&["run", "--no-ast", "-"], "mostrame(2 + 3 * 4);");
    assert!(out.status.success());
    assert_eq!(text(&out.stdout), format!("{}\n20\n\n", BANNER));
    assert_eq!(text(&out.stderr), "");
}

#[test]
fn run_dumps_ast_by_default() {
    let out = dulce(&["run", "-"], "mostrame(1);");
    assert!(out.status.success());
    let stdout = text(&out.stdout);
    assert!(stdout.starts_with(&format!("{}\n1\n\n[", BANNER)));
    assert!(stdout.contains("\"type\": \"Print\""));
}

#[test]
fn failed_run_prints_exactly_one_error_line() {
    let out = dulce(&["run", "-"], "caramelo x; caramelo x;");
    assert!(!out.status.success());
    assert_eq!(text(&out.stdout), "");
    assert_eq!(text(&out.stderr), "Error: NameError: Variable 'x' ya declarada\n");
}

#[test]
fn runtime_failure_discards_partial_output() {
    let out = dulce(&["run", "-"], "mostrame(1); mostrame(nada);");
    assert!(!out.status.success());
    assert_eq!(text(&out.stdout), "");
    assert_eq!(text(&out.stderr), "Error: RuntimeError: Variable 'nada' no declarada\n");
}

#[test]
fn reset_return_flag_reaches_the_interpreter() {
    let source = "torta f() { devolveme 1; } f(); alfajor (1) { mostrame(\"a\"); mostrame(\"b\"); }";

    let out = dulce(&["run", "--no-ast", "-"], source);
    assert_eq!(text(&out.stdout), format!("{}\na\n\n", BANNER));

    let out = dulce(&["run", "--no-ast", "--reset-return", "-"], source);
    assert_eq!(text(&out.stdout), format!("{}\na\nb\n\n", BANNER));
}

#[test]
fn check_and_tokens() {
    let out = dulce(&["check", "-"], "mostrame(y);");
    assert!(out.status.success());
    assert_eq!(text(&out.stdout), "OK\n");

    let out = dulce(&["tokens", "-"], "caramelo x;");
    assert_eq!(text(&out.stdout), "KEYWORD caramelo @1:1\nIDENTIFIER x @1:10\nSEMICOLON ; @1:11\n");
}

#[test]
fn missing_file_is_reported() {
    let out = dulce(&["run", "no_existe.dulce"], "");
    assert!(!out.status.success());
    assert!(text(&out.stderr).starts_with("Error: No se pudo leer el archivo 'no_existe.dulce'"));
}
