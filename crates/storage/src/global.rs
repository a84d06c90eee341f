use std::path::{Path, PathBuf};

pub const STORE_FILENAME: &str = "candor.json";

pub fn compute_store_path(base: &Path) -> PathBuf {
    base.join(STORE_FILENAME)
}

pub fn compute_default_base() -> Result<PathBuf, crate::Error> {
    let data_dir = dirs::data_dir().ok_or(crate::Error::DataDirUnavailable)?;
    Ok(data_dir.join("candor"))
}
