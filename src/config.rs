//! Parser configuration.
//!
//! Supplied by the surrounding configuration loader; the core pipeline only
//! reads it. Import-path rules rewrite the module specifiers of collected
//! import statements (source trees rarely ship with the paths consumers
//! should use); URL substitutions let a config map placeholder tokens in
//! node URLs to concrete values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Map from import-path prefix to replacement prefix, applied to the
    /// longest matching prefix. E.g. `"./src/components" -> "@ui/components"`.
    #[serde(default)]
    pub import_paths: HashMap<String, String>,
    /// Token substitutions applied to node URLs before they are emitted,
    /// in declaration order, e.g. `"<FILE_ID>" -> "AbC123"`.
    #[serde(default)]
    pub url_substitutions: IndexMap<String, String>,
    /// Label attached to emitted documents. Defaults to "React".
    #[serde(default)]
    pub label: Option<String>,
}

impl ProjectConfig {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("React")
    }

    /// Apply url substitutions to a raw node URL.
    pub fn substitute_url(&self, url: &str) -> String {
        let mut out = url.to_string();
        for (token, value) in &self.url_substitutions {
            out = out.replace(token, value);
        }
        out
    }

    /// Rewrite a module specifier through the longest matching prefix rule.
    pub fn rewrite_import_path(&self, specifier: &str) -> String {
        let mut best: Option<(&str, &str)> = None;
        for (prefix, replacement) in &self.import_paths {
            if specifier.starts_with(prefix.as_str()) {
                match best {
                    Some((p, _)) if p.len() >= prefix.len() => {}
                    _ => best = Some((prefix, replacement)),
                }
            }
        }
        match best {
            Some((prefix, replacement)) => {
                format!("{}{}", replacement, &specifier[prefix.len()..])
            }
            None => specifier.to_string(),
        }
    }
}
