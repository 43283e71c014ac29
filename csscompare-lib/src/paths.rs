use std::path::{Path, PathBuf};

/// Where the Sass-compiled Bootstrap CSS is copied before formatting.
pub const SASS_COMPILED_CSS_REFERENCE_DIR: &str = "./test/sass-compiled-css-reference/";

pub fn path_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// `<dir>bootstrap-<version>.css`. `dir` is used as a plain prefix, so it
/// should carry its own trailing separator.
pub fn reference_css_path(dir: &str, version: &str) -> PathBuf {
    PathBuf::from(format!("{}bootstrap-{}.css", dir, version))
}
