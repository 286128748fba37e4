use crate::{
    assemble, files, normalize, probe,
    config::Config,
    report::{DirOutcome, DirReport, JobReport},
    util::now_rfc3339,
    walk,
};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

pub struct Pipeline {
    cfg: Config,
}

impl Pipeline {
    pub fn new(cfg: &Config) -> Self {
        Self { cfg: cfg.clone() }
    }

    /// Run the whole tree: the root directory first, then every descendant,
    /// each converted independently. Sequential; a failure in any directory
    /// aborts the run and keeps whatever finished before it.
    pub fn run(&self, root: &Path, out_dir: &Path, delete_sources: bool) -> Result<JobReport> {
        let started = now_rfc3339();
        let dirs = walk::directories(root);
        info!("visiting {} directories under {}", dirs.len(), root.display());

        let mut reports = Vec::with_capacity(dirs.len());
        for dir in &dirs {
            reports.push(self.convert_dir(dir, out_dir, delete_sources)?);
        }

        Ok(JobReport {
            source_root: root.display().to_string(),
            out_dir: out_dir.display().to_string(),
            started,
            finished: now_rfc3339(),
            directories: reports,
        })
    }

    /// One directory pass: capture the qualifying files once, derive the
    /// target, normalize every file in place, assemble the PDF, then (and
    /// only then) optionally delete the sources and prune the directory if
    /// nothing is left in it.
    pub fn convert_dir(&self, dir: &Path, out_dir: &Path, delete_sources: bool) -> Result<DirReport> {
        let files = files::qualifying_files(dir)?;
        if files.is_empty() {
            println!("{}: no images", dir.display());
            return Ok(DirReport {
                dir: dir.display().to_string(),
                outcome: DirOutcome::NoImages,
                pages: 0,
                resized: 0,
                pdf: None,
                target: None,
            });
        }

        let target = probe::derive_target(&files, self.cfg.conversion.width, self.cfg.conversion.dpi)?;
        debug!("{}: target {}x@{}dpi", dir.display(), target.width, target.dpi);

        let mut resized = 0u32;
        for file in &files {
            if normalize::normalize(file, target.width, target.dpi, self.cfg.conversion.jpeg_quality)? {
                resized += 1;
            }
        }

        let pdf = assemble::assemble(dir, &files, out_dir, self.cfg.conversion.jpeg_quality)?;
        info!(
            "{} -> {} ({} pages, {} resized)",
            dir.display(),
            pdf.display(),
            files.len(),
            resized
        );

        // deletion is the only destructive step and runs strictly after a
        // successful PDF write
        if delete_sources {
            for file in &files {
                std::fs::remove_file(file)
                    .with_context(|| format!("delete source {}", file.display()))?;
            }
        }
        remove_if_empty(dir)?;

        println!("{} to pdf complete", dir.display());
        Ok(DirReport {
            dir: dir.display().to_string(),
            outcome: DirOutcome::Converted,
            pages: files.len() as u32,
            resized,
            pdf: Some(pdf.display().to_string()),
            target: Some(target),
        })
    }
}

/// Remove `dir` only when probing finds no entry at all; leftover non-image
/// files keep the directory alive.
fn remove_if_empty(dir: &Path) -> Result<bool> {
    let mut entries =
        std::fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))?;
    if entries.next().is_none() {
        std::fs::remove_dir(dir).with_context(|| format!("remove dir {}", dir.display()))?;
        return Ok(true);
    }
    Ok(false)
}
