//! Build script for storefront crate.
//!
//! Fingerprints `static/css/main.css` so the stylesheet URL changes whenever
//! its content does.

use std::env;
use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");
    let derived_dir = Path::new(&manifest_dir).join("static/css/derived");

    // Tell Cargo to rerun if main.css changes
    println!("cargo:rerun-if-changed={}", css_path.display());

    match hash_css(&css_path, &derived_dir) {
        Ok(short_hash) => println!("cargo:rustc-env=CSS_HASH={short_hash}"),
        Err(e) => {
            // Templates fall back to the unhashed path
            println!("cargo:warning=Could not fingerprint main.css: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
        }
    }
}

/// Copy main.css to `derived_dir` as `main.<hash>.css` and return the hash
/// (first 8 hex chars of SHA-256).
fn hash_css(css_path: &Path, derived_dir: &Path) -> io::Result<String> {
    let content = fs::read(css_path)?;

    let digest = format!("{:x}", Sha256::digest(&content));
    let short_hash: String = digest.chars().take(8).collect();

    fs::create_dir_all(derived_dir)?;
    fs::copy(css_path, derived_dir.join(format!("main.{short_hash}.css")))?;

    Ok(short_hash)
}
