//! 変換パイプライン
//!
//! 抽出 → 照合 → 列挿入 → xlsx保存・再読み込み → 出席率補正 → xlsx出力。
//! 1回の呼び出しで完結し、状態は持たない。

use crate::error::Result;
use crate::ocr::{self, CertificateImage, ExtractionReport, OcrEngine};
use crate::workbook;
use cert_attendance_common::{
    apply_attendance_adjustment, insert_certificate_column, match_rows,
    table_to_xlsx_buffer, total_attendance_column, AdjustmentSummary, ExtractedRecord,
};

/// 出力ファイル名
pub const OUTPUT_FILE_NAME: &str = "updated_attendance.xlsx";

/// 変換結果
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// 補正済み出席簿（xlsx）
    pub xlsx: Vec<u8>,
    pub summary: TransformSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSummary {
    /// 処理した診断書画像の数（OCRを通した `process` のみ）
    pub certificates: Option<usize>,
    /// 氏名・学籍番号が取れず読み飛ばした画像の数（`process` のみ）
    pub skipped_certificates: Option<usize>,
    /// 照合に使ったレコード数
    pub records: usize,
    /// 診断書と一致した出席簿の行数
    pub matched_rows: usize,
    pub adjustment: AdjustmentSummary,
}

/// 抽出済みレコードと出席簿xlsxから補正済みxlsxを作る
pub fn transform(records: &[ExtractedRecord], roster_xlsx: &[u8]) -> Result<TransformOutput> {
    let mut table = workbook::read_table_bytes(roster_xlsx)?;

    // 変更前に検証する
    let attendance_col = total_attendance_column(&table)?;

    let matches = match_rows(&table, records);
    let matched_rows = matches.iter().filter(|m| m.is_matched()).count();
    insert_certificate_column(&mut table, attendance_col, &matches);
    tracing::debug!(rows = table.len(), matched_rows, "certificate column inserted");

    // 一度xlsxに保存して読み直す（型が変わり得るので列を再検証する）
    let intermediate = table_to_xlsx_buffer(&table)?;
    let mut reloaded = workbook::read_table_bytes(&intermediate)?;

    let adjustment = apply_attendance_adjustment(&mut reloaded)?;
    let xlsx = table_to_xlsx_buffer(&reloaded)?;

    Ok(TransformOutput {
        xlsx,
        summary: TransformSummary {
            certificates: None,
            skipped_certificates: None,
            records: records.len(),
            matched_rows,
            adjustment,
        },
    })
}

/// OCR抽出から出力までを一括実行
pub fn process<F>(
    engine: &dyn OcrEngine,
    certificates: &[CertificateImage],
    roster_xlsx: &[u8],
    on_progress: F,
) -> Result<(ExtractionReport, TransformOutput)>
where
    F: Fn() + Sync,
{
    let report = ocr::extract_records(engine, certificates, on_progress)?;
    let mut output = transform(&report.records(), roster_xlsx)?;

    output.summary.certificates = Some(certificates.len());
    output.summary.skipped_certificates = Some(report.skipped());

    tracing::info!(
        certificates = certificates.len(),
        skipped = report.skipped(),
        matched_rows = output.summary.matched_rows,
        adjusted = output.summary.adjustment.adjusted,
        "attendance transform finished"
    );

    Ok((report, output))
}
