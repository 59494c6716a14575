use anyhow::Result;
use minijinja::Environment;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::{
    emit::{self, WriteOutcome},
    manifest::Manifest,
    templates,
};

/// Output directory downstream packages import through.
pub const SHARED_DIR: &str = "shared";

/// Markdown index, written next to the manifest.
pub const EXPORTS_FILE: &str = "EXPORTS.md";

/// One output file the generator intends to produce.
#[derive(Debug, Clone)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub contents: String,
    /// Stub pairs are only written when absent; the markdown index is always
    /// regenerated.
    pub overwrite: bool,
}

pub struct Generator {
    manifest: Manifest,
    root: PathBuf,
    env: Environment<'static>,
}

impl Generator {
    /// `path` is a manifest file or a directory containing `package.json`.
    pub fn new(path: &Path) -> Result<Self> {
        let manifest_path = Manifest::locate(path);
        tracing::info!("loading manifest from {}", manifest_path.display());
        let manifest = Manifest::load_from_path(&manifest_path)?;

        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::from_manifest(manifest, root)
    }

    /// For callers that already hold a parsed manifest (build scripts, tests).
    /// `root` is the directory `shared/` and the index are written under.
    pub fn from_manifest(manifest: Manifest, root: PathBuf) -> Result<Self> {
        let env = templates::environment()?;
        Ok(Self {
            manifest,
            root,
            env,
        })
    }

    /// Every file this run would produce, before touching the filesystem.
    pub fn plan(&self) -> Result<Vec<PlannedFile>> {
        let star = self.manifest.re_exports.star_declarations();
        let equal = self.manifest.re_exports.equal_declarations();
        let optional = self.manifest.re_exports.optional_declarations();

        let mut files = Vec::with_capacity(2 * (star.len() + equal.len() + optional.len()) + 1);

        // Star stubs live under the alias, everything else under the package
        // name itself.
        for decl in &star {
            let (js, dts) = templates::star_stub(&self.env, decl)?;
            self.push_stub_pair(&mut files, &decl.local, js, dts);
        }
        for decl in &equal {
            let (js, dts) = templates::equal_stub(&self.env, decl)?;
            self.push_stub_pair(&mut files, &decl.package, js, dts);
        }
        for decl in &optional {
            let (js, dts) = templates::optional_stub(&self.env, decl)?;
            self.push_stub_pair(&mut files, &decl.package, js, dts);
        }

        // The index covers star + equals packages sorted by code point;
        // optional shims stay out of it.
        let mut packages: Vec<String> = star
            .iter()
            .chain(equal.iter())
            .map(|d| d.package.clone())
            .collect();
        packages.sort();

        files.push(PlannedFile {
            path: self.root.join(EXPORTS_FILE),
            contents: templates::markdown_index(&self.env, &self.manifest.name, &packages)?,
            overwrite: true,
        });

        Ok(files)
    }

    fn push_stub_pair(&self, files: &mut Vec<PlannedFile>, base: &str, js: String, dts: String) {
        // Scoped names like "@scope/pkg" land in sub-folders of shared/.
        let base = self.root.join(SHARED_DIR).join(base);
        files.push(PlannedFile {
            path: with_suffix(&base, ".js"),
            contents: js,
            overwrite: false,
        });
        files.push(PlannedFile {
            path: with_suffix(&base, ".d.ts"),
            contents: dts,
            overwrite: false,
        });
    }

    /// Plan and write everything. Writes run concurrently with no ordering
    /// among them; the first error observed aborts the run.
    pub fn generate(&self) -> Result<GenerationReport> {
        let files = self.plan()?;
        tracing::info!("writing {} generated files", files.len());

        let outcomes: Vec<(PathBuf, WriteOutcome)> = files
            .par_iter()
            .map(|file| {
                let outcome = if file.overwrite {
                    emit::write_file(&file.path, &file.contents)?;
                    WriteOutcome::Written
                } else {
                    emit::write_if_missing(&file.path, &file.contents)?
                };
                Ok((file.path.clone(), outcome))
            })
            .collect::<Result<_>>()?;

        let mut report = GenerationReport::default();
        for (path, outcome) in outcomes {
            match outcome {
                WriteOutcome::Written => report.written.push(path),
                WriteOutcome::Skipped => {
                    tracing::debug!("keeping existing {}", path.display());
                    report.skipped.push(path);
                }
            }
        }
        Ok(report)
    }
}

/// Load the manifest at `path` and generate everything it declares.
pub fn run(path: &Path) -> Result<GenerationReport> {
    let generator = Generator::new(path)?;
    generator.generate()
}

// `Path::set_extension` would eat part of names like "socket.io", so append
// the suffix to the raw string instead.
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut s = base.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

/// What a run produced, for the CLI summary.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

impl GenerationReport {
    pub fn summary(&self) {
        println!(
            "relay: {} file(s) written, {} kept as-is",
            self.written.len(),
            self.skipped.len()
        );
    }
}
