use crate::error::{CertAttendanceError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

impl ImageInfo {
    fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path: path.to_path_buf(),
            file_name,
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tif", "tiff", "webp"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// フォルダ直下の画像を列挙（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(CertAttendanceError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<ImageInfo> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| is_image_extension(&ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .map(|e| ImageInfo::from_path(e.path()))
        .collect();

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

/// 診断書画像を集める
///
/// 明示指定のファイルは指定順（アップロード順）のまま先頭に、
/// フォルダ指定分はその後ろにファイル名順で並べる。
/// 明示指定は拡張子を問わない（読めない画像はデコード時にエラーになる）。
pub fn collect_certificates(files: &[PathBuf], folder: Option<&Path>) -> Result<Vec<ImageInfo>> {
    let mut images = Vec::with_capacity(files.len());

    for file in files {
        if !file.is_file() {
            return Err(CertAttendanceError::FileNotFound(file.display().to_string()));
        }
        images.push(ImageInfo::from_path(file));
    }

    if let Some(folder) = folder {
        images.extend(scan_folder(folder)?);
    }

    Ok(images)
}
