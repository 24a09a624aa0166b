use std::process::Command;

const UNKNOWN_VERSION: &str = "unknown";

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=puzzle_data");
    println!("cargo:rustc-env=GIT_HASH={}", git_hash().unwrap_or_else(|| UNKNOWN_VERSION.to_string()));
}

/// The short hash of HEAD, or None (with a build warning) if git can't tell us
fn git_hash() -> Option<String> {
    let output = match Command::new("git").args(["rev-parse", "--short", "HEAD"]).output() {
        Ok(output) => output,
        Err(err) => {
            println!("cargo:warning=unable to run git: {}", err);
            return None;
        }
    };

    if !output.status.success() {
        println!(
            "cargo:warning=git exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    let hash = String::from_utf8_lossy(&output.stdout).trim().to_ascii_lowercase();
    if hash.is_empty() {
        println!("cargo:warning=git returned an empty version");
        return None;
    }

    Some(hash)
}
