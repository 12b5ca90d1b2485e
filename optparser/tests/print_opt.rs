use std::process::Command;

#[test]
fn print_opt_table() {
    let output = Command::new(env!("CARGO_BIN_EXE_print-opt"))
        .output()
        .expect("failed to run print-opt");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "        -a/--long-a=: option a\n         -b/--long-b: option b\n\n"
    );
}
