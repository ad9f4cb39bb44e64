use std::path::Path;
use std::process::Command;

/// Trimmed stdout of `git -C <root> <args>`, or `None` if git fails or prints nothing.
fn git(root: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(root).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let s = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!s.is_empty()).then_some(s)
}

fn main() {
    println!("cargo:rerun-if-env-changed=TASKET_BUILD_SHA");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");

    // Packagers building from a tarball can pin the revision.
    if let Ok(pinned) = std::env::var("TASKET_BUILD_SHA") {
        println!("cargo:rustc-env=TASKET_BUILD_SHA={pinned}");
        return;
    }

    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let root = Path::new(&manifest_dir).join("..");

    let revision = match git(&root, &["rev-parse", "--short", "HEAD"]) {
        Some(sha) if git(&root, &["status", "--porcelain", "--untracked-files=no"]).is_some() => {
            format!("{sha}-dirty")
        }
        Some(sha) => sha,
        None => "unknown".to_string(),
    };

    println!("cargo:rustc-env=TASKET_BUILD_SHA={revision}");
}
