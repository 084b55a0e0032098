use std::process::Command;

fn main() {
    // Capture git version string for display. Falls back to the package version
    // when building outside a git checkout (e.g. from a source tarball).
    let version = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty=*"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=GIT_VERSION={version}");

    // Re-run when HEAD or the index change.
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
}
