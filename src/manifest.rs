use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The slice of a package manifest relevant to shim generation. Every other
/// `package.json` field is ignored.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub name: String,

    #[serde(rename = "relayReExports", default)]
    pub re_exports: ReExports,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReExports {
    /// `"package"` or `"package:alias"` entries, forwarded binding-by-binding.
    #[serde(rename = "export *", default)]
    pub star: Vec<String>,

    /// `"package"` or `"package as Namespace"` entries, forwarded as one
    /// module value.
    #[serde(rename = "export =", default)]
    pub equal: Vec<String>,

    /// Like `export =`, but the package may be absent at runtime; the shim
    /// guards the load.
    #[serde(rename = "export optional", default)]
    pub optional: Vec<String>,
}

impl Manifest {
    /// Accepts either a manifest file or a directory holding `package.json`.
    pub fn locate(path: &Path) -> PathBuf {
        if path.is_dir() {
            path.join("package.json")
        } else {
            path.to_path_buf()
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest at {}", path.display()))?;
        let manifest: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse manifest at {}", path.display()))?;
        Ok(manifest)
    }
}

impl ReExports {
    pub fn star_declarations(&self) -> Vec<Declaration> {
        self.star.iter().map(|e| Declaration::parse_star(e)).collect()
    }

    pub fn equal_declarations(&self) -> Vec<Declaration> {
        self.equal.iter().map(|e| Declaration::parse_equal(e)).collect()
    }

    pub fn optional_declarations(&self) -> Vec<Declaration> {
        self.optional.iter().map(|e| Declaration::parse_equal(e)).collect()
    }
}

/// One re-export declaration: the source package plus the local name the shim
/// is published under (star alias, or namespace identifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub package: String,
    pub local: String,
}

impl Declaration {
    /// Splits `"package:alias"` on the first `:`; the alias defaults to the
    /// whole entry. Anything past a second `:` is dropped.
    pub fn parse_star(entry: &str) -> Self {
        let mut parts = entry.split(':');
        let package = parts.next().unwrap_or(entry);
        Self {
            package: package.to_string(),
            local: parts.next().unwrap_or(entry).to_string(),
        }
    }

    /// Splits `"package as Namespace"` on the first `" as "`; the namespace
    /// defaults to the whole entry.
    pub fn parse_equal(entry: &str) -> Self {
        let mut parts = entry.split(" as ");
        let package = parts.next().unwrap_or(entry);
        Self {
            package: package.to_string(),
            local: parts.next().unwrap_or(entry).to_string(),
        }
    }
}
