use std::{collections::HashMap, env::temp_dir};

use crate::tasks::{config::CommandSpec, error::ExecError};

fn expect_invalid(spec: CommandSpec) {
    match spec.validate() {
        Err(ExecError::InvalidConfiguration(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn accept_shell_pipeline() {
    let spec = CommandSpec::new("nmap -sV 10.0.0.1 | grep open > ports.txt 2>&1");
    assert!(spec.validate().is_ok());
}

#[test]
fn accept_leading_whitespace() {
    // The shell ignores it, so the line is kept verbatim
    let spec = CommandSpec::new("  echo hi");
    assert!(spec.validate().is_ok());
}

#[test]
fn accept_existing_working_dir() {
    let dir = temp_dir();
    let spec = CommandSpec::new("ls").working_dir(dir.to_str().unwrap());
    assert!(spec.validate().is_ok());
}

#[test]
fn accept_env_vars() {
    let mut env = HashMap::new();
    env.insert("TARGET".to_string(), "10.0.0.1 10.0.0.2".to_string());
    let spec = CommandSpec::new("echo $TARGET").env(env);
    assert!(spec.validate().is_ok());
}

#[test]
fn reject_empty_command() {
    expect_invalid(CommandSpec::new(""));
    expect_invalid(CommandSpec::new("   \t"));
}

#[test]
fn reject_null_byte_in_command() {
    expect_invalid(CommandSpec::new("echo a\0b"));
}

#[test]
fn reject_overlong_command() {
    expect_invalid(CommandSpec::new("a".repeat(64 * 1024)));
}

#[test]
fn reject_zero_timeout() {
    expect_invalid(CommandSpec::new("echo").timeout_secs(0));
}

#[test]
fn reject_missing_working_dir() {
    expect_invalid(CommandSpec::new("ls").working_dir("/definitely/not/a/real/dir"));
}

#[test]
fn reject_file_as_working_dir() {
    let file = temp_dir().join("recon_exec_not_a_dir.txt");
    std::fs::write(&file, b"x").unwrap();
    expect_invalid(CommandSpec::new("ls").working_dir(file.to_str().unwrap()));
    let _ = std::fs::remove_file(file);
}

#[test]
fn reject_bad_env_keys() {
    expect_invalid(CommandSpec::new("env").env([("", "value")]));
    expect_invalid(CommandSpec::new("env").env([("A=B", "value")]));
    expect_invalid(CommandSpec::new("env").env([("A B", "value")]));
}

#[test]
fn reject_null_byte_in_env_value() {
    expect_invalid(CommandSpec::new("env").env([("KEY", "a\0b")]));
}
