//! 診断書OCRモジュール
//!
//! 画像のデコード → OCRエンジン → テキスト解析 の順に処理する。
//! OCRエンジンはトレイトで差し替え可能（本番は tesseract CLI）。

mod tesseract;

pub use tesseract::TesseractCli;

use crate::error::{CertAttendanceError, Result};
use crate::scanner::ImageInfo;
use cert_attendance_common::{parse_certificate_text, CertificateExtraction, ExtractedRecord};
use image::DynamicImage;
use rayon::prelude::*;

/// デコード済みの診断書画像
#[derive(Debug, Clone)]
pub struct CertificateImage {
    pub file_name: String,
    pub image: DynamicImage,
}

impl CertificateImage {
    /// バイト列からデコード（壊れた画像はエラー）
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let file_name = file_name.into();
        let image = image::load_from_memory(bytes).map_err(|e| CertAttendanceError::ImageLoad {
            file: file_name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { file_name, image })
    }

    pub fn load(info: &ImageInfo) -> Result<Self> {
        let bytes = std::fs::read(&info.path)?;
        Self::from_bytes(info.file_name.clone(), &bytes)
    }
}

/// 画像 → テキスト のOCRエンジン
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &CertificateImage) -> Result<String>;
}

/// 抽出結果の一覧（入力順を保持）
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub extractions: Vec<CertificateExtraction>,
}

impl ExtractionReport {
    /// 取得できたレコードのみ（入力順）
    pub fn records(&self) -> Vec<ExtractedRecord> {
        self.extractions
            .iter()
            .filter_map(|e| e.record.clone())
            .collect()
    }

    /// 氏名・学籍番号が取れなかった画像の数
    pub fn skipped(&self) -> usize {
        self.extractions.iter().filter(|e| e.record.is_none()).count()
    }
}

/// 画像ファイルをまとめてデコード（入力順を保持）
pub fn load_images(images: &[ImageInfo]) -> Result<Vec<CertificateImage>> {
    images.par_iter().map(CertificateImage::load).collect()
}

/// 画像1枚からレコードを抽出
pub fn extract_certificate(
    engine: &dyn OcrEngine,
    image: &CertificateImage,
) -> Result<CertificateExtraction> {
    let text = engine.recognize(image)?;
    let record = parse_certificate_text(&text);

    if record.is_none() {
        tracing::debug!(file = %image.file_name, "no name/enrollment pair found");
    }

    Ok(CertificateExtraction {
        file_name: image.file_name.clone(),
        record,
    })
}

/// 全画像からレコードを抽出
///
/// 並列に処理するが、結果は入力順（= 照合時の優先順）で返す。
/// `on_progress` は1枚処理するごとに呼ばれる。
pub fn extract_records<F>(
    engine: &dyn OcrEngine,
    images: &[CertificateImage],
    on_progress: F,
) -> Result<ExtractionReport>
where
    F: Fn() + Sync,
{
    let extractions = images
        .par_iter()
        .map(|image| {
            let result = extract_certificate(engine, image);
            on_progress();
            result
        })
        .collect::<Result<Vec<_>>>()?;

    let report = ExtractionReport { extractions };
    tracing::info!(
        images = images.len(),
        records = report.extractions.len() - report.skipped(),
        skipped = report.skipped(),
        "certificate extraction finished"
    );

    Ok(report)
}
