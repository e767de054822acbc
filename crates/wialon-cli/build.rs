use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let commit =
        run_git(&["rev-parse", "--short=7", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    let build_date =
        run_git(&["log", "-1", "--format=%cI"]).unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=WIALON_BUILD_COMMIT={}", commit);
    println!("cargo:rustc-env=WIALON_BUILD_DATE={}", build_date);
}

fn run_git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}
