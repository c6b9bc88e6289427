use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct FingerprintInput {
    pub target: PathBuf,
    pub ignored_dirs: Vec<String>,
    pub no_progress: bool,
}

#[derive(Debug, Default)]
pub struct FingerprintOutput {
    pub text_modified: usize,
    pub images_modified: usize,
    pub skipped_dirs: usize,
    pub failures: usize,
}
