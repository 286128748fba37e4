use crate::probe::TargetSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub source_root: String,
    pub out_dir: String,
    pub started: String,
    pub finished: String,
    pub directories: Vec<DirReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirReport {
    pub dir: String,
    pub outcome: DirOutcome,
    pub pages: u32,
    pub resized: u32,
    pub pdf: Option<String>,
    pub target: Option<TargetSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirOutcome {
    Converted,
    NoImages,
}
