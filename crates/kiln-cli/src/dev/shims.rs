//! Renderer shims for main-process modules.
//!
//! Renderer bundlers choke on `require` calls for Node built-ins and the
//! desktop runtime's bindings. Each shimmed specifier maps to a tiny ES
//! module that defers the `require` to runtime, where the embedded page has
//! access to it. `node:`-prefixed specifiers resolve to the same shim as the
//! bare name.

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Node built-ins and native packages the renderer is allowed to reach.
const NODE_MODULES: &[&str] = &[
    "os",
    "fs",
    "path",
    "events",
    "child_process",
    "crypto",
    "http",
    "buffer",
    "url",
    "better-sqlite3",
    "knex",
];

/// Runtime bindings re-exported from the `electron` module.
const ELECTRON_BINDINGS: &[&str] = &["clipboard", "ipcRenderer", "nativeImage", "shell", "webFrame"];

/// Map of module specifier to replacement module source.
///
/// Covers every entry in [`NODE_MODULES`] under both its bare and `node:`
/// form, plus the `electron` entry.
pub fn replacer_map() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for name in NODE_MODULES {
        let code = default_export_shim(name);
        map.insert((*name).to_string(), code.clone());
        map.insert(format!("node:{}", name), code);
    }
    map.insert("electron".to_string(), electron_shim());
    map
}

/// Write one shim file per distinct module into `dir`.
///
/// `node:`-prefixed specifiers alias the bare module's file, so they produce
/// no file of their own.
///
/// # Errors
///
/// Returns an error when the directory or a shim file cannot be written.
pub async fn write_shims(dir: &Path) -> Result<usize> {
    tokio::fs::create_dir_all(dir).await?;

    let mut written = 0;
    for (name, code) in replacer_map() {
        if name.contains(':') {
            continue;
        }
        tokio::fs::write(dir.join(format!("{}.js", name)), code).await?;
        written += 1;
    }

    tracing::debug!("wrote {} renderer shims to {}", written, dir.display());
    Ok(written)
}

/// JavaScript identifier for a module name (`better-sqlite3` is not one).
fn identifier_for(name: &str) -> String {
    name.replace(['-', '.'], "_")
}

fn default_export_shim(name: &str) -> String {
    let ident = identifier_for(name);
    format!("const {ident} = require('{name}');\nexport {{ {ident} as default }};\n")
}

fn electron_shim() -> String {
    let bindings = ELECTRON_BINDINGS.join(", ");
    format!("const {{ {bindings} }} = require('electron');\nexport {{ {bindings} }};\n")
}
