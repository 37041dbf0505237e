use formpath::{decode_urlencoded, form_errors, get_path, json, FormResult, Issue};
use tracing_subscriber::EnvFilter;

use std::io::{self, Read};

const USAGE: &str = "usage: formpath [get <path> | errors] < input";

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        fail(&format!("cannot read stdin: {}", err));
    }

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] => {
            let result = decode_or_exit(&input);
            print_json(&json::tree_to_json(&result.value));
            report_path_errors(&result);
        }
        ["get", path] => {
            let result = decode_or_exit(&input);
            match get_path(&result.value, path) {
                Some(value) => print_json(&value.to_json()),
                None => println!("undefined"),
            }
            report_path_errors(&result);
        }
        ["errors"] => {
            let issues: Vec<Issue> = match serde_json::from_str(&input) {
                Ok(issues) => issues,
                Err(err) => fail(&format!("invalid issue list: {}", err)),
            };
            let errors = form_errors(&issues);
            match serde_json::to_value(&errors) {
                Ok(value) => print_json(&value),
                Err(err) => fail(&err.to_string()),
            }
        }
        _ => fail(USAGE),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn decode_or_exit(input: &str) -> FormResult {
    match decode_urlencoded(input.trim_end()) {
        Ok(result) => result,
        Err(err) => fail(&format!("invalid form body: {}", err)),
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(err) => fail(&err.to_string()),
    }
}

/// Skipped entries are reported after the output so that the tree that
/// was built is still shown.
fn report_path_errors(result: &FormResult) {
    if result.errors.is_empty() {
        return;
    }
    for err in &result.errors {
        eprintln!("ERROR ({}): {}", err.code(), err);
    }
    std::process::exit(1);
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
