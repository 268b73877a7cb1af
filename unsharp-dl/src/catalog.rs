//! Discovery of source image files.

use crate::{common::*, error::GeneratorError};
use std::ffi::OsStr;

/// File name extensions recognized as images. The match is case-sensitive.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "JPG", "jpeg", "JPEG", "png", "PNG", "bmp", "BMP"];

/// The fixed, non-empty list of source image paths.
#[derive(Debug, Clone)]
pub struct Catalog {
    paths: Vec<PathBuf>,
}

impl Catalog {
    /// Scan the folders for image files.
    ///
    /// Entries are listed per folder in file name order and folders are
    /// concatenated in the given order. It fails with
    /// [GeneratorError::DataUnavailable] if no image file is found.
    pub fn open<I, P>(folders: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let folders: Vec<PathBuf> = folders
            .into_iter()
            .map(|folder| folder.as_ref().to_owned())
            .collect();

        let mut paths = vec![];
        for folder in &folders {
            let found = list_image_files(folder)
                .with_context(|| format!("failed to list folder '{}'", folder.display()))?;
            debug!("found {} image files in '{}'", found.len(), folder.display());
            paths.extend(found);
        }

        if paths.is_empty() {
            return Err(GeneratorError::DataUnavailable {
                reason: format!("no image files found in {:?}", folders),
            }
            .into());
        }

        info!(
            "found {} image files in {} folders",
            paths.len(),
            folders.len()
        );
        Ok(Self { paths })
    }

    /// Build a catalog from a list of paths.
    pub fn from_paths(paths: Vec<PathBuf>) -> Result<Self> {
        if paths.is_empty() {
            return Err(GeneratorError::DataUnavailable {
                reason: "the list of image files is empty".into(),
            }
            .into());
        }
        Ok(Self { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false. Empty catalogs cannot be built.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    /// Pick a path uniformly at random.
    pub fn choose<R>(&self, rng: &mut R) -> &Path
    where
        R: Rng + ?Sized,
    {
        &self.paths[rng.gen_range(0..self.paths.len())]
    }
}

fn list_image_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let folder = folder.canonicalize()?;

    let mut paths: Vec<PathBuf> = fs::read_dir(&folder)?
        .map(|entry| -> Result<_> { Ok(entry?.path()) })
        .filter_ok(|path| is_image_file_name(path))
        .collect::<Result<_>>()?;
    paths.sort();

    Ok(paths)
}

/// Match the text after the last dot of the file name, which may be the
/// whole name but the dot, e.g. `.png`.
fn is_image_file_name(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}
