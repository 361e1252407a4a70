//! Manifest patcher
//!
//! Parses the `package.json` written by the init tool, swaps the default
//! test script for the app's `start`/`build`/`test` scripts and adds a Jest
//! configuration right after the license field. Key order is preserved.

use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::{info, warn};

use crate::engine::StageKind;
use crate::{Result, ScaffoldError};

/// Test script written by `npm init`
pub const DEFAULT_TEST_SCRIPT: &str = "echo \"Error: no test specified\" && exit 1";

/// License written by `npm init`
pub const DEFAULT_LICENSE: &str = "ISC";

/// Scripts that replace the default test entry, in order
pub fn app_scripts() -> Vec<(&'static str, &'static str)> {
    vec![
        ("start", "cross-env NODE_ENV=development webpack-dev-server -d"),
        ("build", "cross-env NODE_ENV=production webpack -p"),
        ("test", "jest"),
    ]
}

/// Jest configuration inserted after the license field
pub fn jest_config() -> Value {
    json!({
        "moduleFileExtensions": ["js", "jsx"],
        "moduleDirectories": ["node_modules"],
        "setupFiles": ["<rootDir>/src/tests/setup.js"],
        "moduleNameMapper": {
            r"\.(css|styl|less|sass|scss)$": "identity-obj-proxy"
        },
        "transform": {
            r"^.+\.js$": "babel-jest",
            r"^.+\.jsx$": "babel-jest",
            r"\.(jpg|jpeg|png|gif|eot|otf|webp|svg|ttf|woff|woff2|mp4|webm|wav|mp3|m4a|aac|oga)$":
                "<rootDir>/src/tests/__mock__/fileTransformer.js"
        }
    })
}

/// Which blocks a patch actually inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub scripts_injected: bool,
    pub jest_injected: bool,
}

impl PatchReport {
    pub fn is_complete(&self) -> bool {
        self.scripts_injected && self.jest_injected
    }
}

fn inject_scripts(manifest: &mut Map<String, Value>) -> bool {
    let Some(Value::Object(scripts)) = manifest.get_mut("scripts") else {
        return false;
    };
    if scripts.get("test").and_then(Value::as_str) != Some(DEFAULT_TEST_SCRIPT) {
        return false;
    }

    let mut patched = Map::with_capacity(scripts.len() + 2);
    for (key, value) in std::mem::take(scripts) {
        if key == "test" {
            for (name, command) in app_scripts() {
                patched.insert(name.to_string(), Value::String(command.to_string()));
            }
        } else if !patched.contains_key(&key) {
            patched.insert(key, value);
        }
    }
    *scripts = patched;
    true
}

fn inject_jest(manifest: &mut Map<String, Value>) -> bool {
    if manifest.get("license").and_then(Value::as_str) != Some(DEFAULT_LICENSE) {
        return false;
    }
    if manifest.contains_key("jest") {
        warn!("Manifest already has a jest block, leaving it untouched");
        return false;
    }

    let mut patched = Map::with_capacity(manifest.len() + 1);
    for (key, value) in std::mem::take(manifest) {
        let is_license = key == "license";
        patched.insert(key, value);
        if is_license {
            patched.insert("jest".to_string(), jest_config());
        }
    }
    *manifest = patched;
    true
}

/// Patch manifest text, returning the new text and what was inserted
///
/// A missing placeholder leaves that part of the manifest unchanged; with
/// `strict` it is reported as [`ScaffoldError::ManifestPlaceholder`] instead.
pub fn patch_manifest_text(text: &str, strict: bool) -> Result<(String, PatchReport)> {
    let mut document: Value = serde_json::from_str(text)?;
    let Value::Object(manifest) = &mut document else {
        return Err(ScaffoldError::Stage {
            stage: StageKind::Files.name().to_string(),
            reason: "package.json is not a JSON object".to_string(),
        });
    };

    let report = PatchReport {
        scripts_injected: inject_scripts(manifest),
        jest_injected: inject_jest(manifest),
    };

    if !report.scripts_injected {
        warn!("Default test script not found in manifest; scripts block not added");
        if strict {
            return Err(ScaffoldError::ManifestPlaceholder(format!(
                "scripts.test = {:?}",
                DEFAULT_TEST_SCRIPT
            )));
        }
    }
    if !report.jest_injected {
        warn!("License placeholder not found in manifest; jest block not added");
        if strict {
            return Err(ScaffoldError::ManifestPlaceholder(format!(
                "license = {:?}",
                DEFAULT_LICENSE
            )));
        }
    }

    let mut output = serde_json::to_string_pretty(&document)?;
    output.push('\n');
    Ok((output, report))
}

/// Patch the manifest at `path` in place
pub async fn patch_manifest(path: &Path, strict: bool) -> Result<PatchReport> {
    info!("Patching manifest {:?}", path);

    let text = tokio::fs::read_to_string(path).await.map_err(|e| ScaffoldError::Stage {
        stage: StageKind::Files.name().to_string(),
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;

    let (patched, report) = patch_manifest_text(&text, strict)?;
    tokio::fs::write(path, patched).await?;
    Ok(report)
}
