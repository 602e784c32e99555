//! Build script for the site crate.
//!
//! Fingerprints static assets so they can be served with immutable caching.
//! Each asset is copied to a `derived/` sibling directory as
//! `name.<hash>.ext` and the hash is exported as a compile-time env var.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let static_dir = Path::new(&manifest_dir).join("static");

    fingerprint(&static_dir, "css", "main", "css", "CSS_HASH");
    fingerprint(&static_dir, "js", "site", "js", "JS_HASH");
}

/// Hash `static/<subdir>/<stem>.<ext>` and export the short hash as `env_var`.
fn fingerprint(static_dir: &Path, subdir: &str, stem: &str, ext: &str, env_var: &str) {
    let source = static_dir.join(subdir).join(format!("{stem}.{ext}"));
    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", source.display());
            println!("cargo:rustc-env={env_var}=");
            return;
        }
    };

    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = hash.get(..8).unwrap_or(&hash);
    println!("cargo:rustc-env={env_var}={short_hash}");

    let derived_dir = static_dir.join(subdir).join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived asset directory");
    fs::copy(&source, derived_dir.join(format!("{stem}.{short_hash}.{ext}")))
        .expect("Failed to copy asset to derived directory");
}
