//! 変換パイプラインの統合テスト
//!
//! rust_xlsxwriter で出席簿を作り、変換結果を calamine で読み戻して検証する。

use cert_attendance::error::{CertAttendanceError, Result};
use cert_attendance::ocr::{CertificateImage, OcrEngine};
use cert_attendance::pipeline::{self, TransformOutput};
use cert_attendance::workbook;
use cert_attendance_common::{Cell, Error, ErrorKind, ExtractedRecord, Table};
use rust_xlsxwriter::Workbook;
use std::collections::HashMap;
use std::io::Cursor;

const HEADERS: [&str; 4] = ["Enrollment Number", "Name", "Total Attendance", "Remarks"];

fn roster_xlsx(rows: &[(&str, &str, f64)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (i, (enrollment, name, total)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_string(row, 0, *enrollment).unwrap();
        worksheet.write_string(row, 1, *name).unwrap();
        worksheet.write_number(row, 2, *total).unwrap();
        worksheet.write_string(row, 3, "note").unwrap();
    }

    workbook.save_to_buffer().unwrap()
}

fn record(name: &str, enrollment: &str) -> ExtractedRecord {
    ExtractedRecord {
        name: name.to_string(),
        enrollment_number: enrollment.to_string(),
    }
}

fn output_table(output: &TransformOutput) -> Table {
    workbook::read_table_bytes(&output.xlsx).expect("出力xlsxの読み込み失敗")
}

fn column(table: &Table, header: &str) -> usize {
    table
        .find_column(header)
        .unwrap_or_else(|| panic!("列がない: {}", header))
}

fn headers(table: &Table) -> Vec<String> {
    table.headers().iter().map(|h| h.to_string()).collect()
}

/// 出席50・診断書一致 → Yes / 55
#[test]
fn test_matched_below_threshold_gets_bonus() {
    let roster = roster_xlsx(&[("E1", "Alice", 50.0)]);
    let output = pipeline::transform(&[record("Alice", "E1")], &roster).unwrap();
    let table = output_table(&output);

    assert_eq!(table.cell(0, column(&table, "Medical Certificate")), Some(&Cell::text("Yes")));
    assert_eq!(table.cell(0, column(&table, "Updated Attendance")), Some(&Cell::Number(55.0)));
    assert_eq!(output.summary.matched_rows, 1);
    assert_eq!(output.summary.adjustment.adjusted, 1);
}

/// レコードから直接変換した場合、画像の枚数は不明
#[test]
fn test_transform_summary_has_no_image_counts() {
    let roster = roster_xlsx(&[("E1", "Alice", 50.0), ("E2", "Bob", 80.0)]);
    let records = [record("Alice", "E1"), record("Bob", "E2")];
    let output = pipeline::transform(&records, &roster).unwrap();

    assert_eq!(output.summary.records, 2);
    assert_eq!(output.summary.certificates, None);
    assert_eq!(output.summary.skipped_certificates, None);
}

/// 出席70・診断書一致 → 70のまま
#[test]
fn test_matched_above_threshold_unchanged() {
    let roster = roster_xlsx(&[("E1", "Alice", 70.0)]);
    let output = pipeline::transform(&[record("Alice", "E1")], &roster).unwrap();
    let table = output_table(&output);

    assert_eq!(table.cell(0, column(&table, "Medical Certificate")), Some(&Cell::text("Yes")));
    assert_eq!(table.cell(0, column(&table, "Updated Attendance")), Some(&Cell::Number(70.0)));
}

/// 一致なし → 空欄・値そのまま
#[test]
fn test_unmatched_row_unchanged() {
    let roster = roster_xlsx(&[("E2", "Bob", 40.0)]);
    let output = pipeline::transform(&[record("Alice", "E1")], &roster).unwrap();
    let table = output_table(&output);

    assert!(table.cell(0, column(&table, "Medical Certificate")).unwrap().is_blank());
    assert_eq!(table.cell(0, column(&table, "Updated Attendance")), Some(&Cell::Number(40.0)));
}

/// 列順: Total Attendance の直後に Medical Certificate、末尾に Updated Attendance
#[test]
fn test_column_order() {
    let roster = roster_xlsx(&[("E1", "Alice", 50.0)]);
    let output = pipeline::transform(&[], &roster).unwrap();
    let table = output_table(&output);

    assert_eq!(
        headers(&table),
        vec![
            "Enrollment Number",
            "Name",
            "Total Attendance",
            "Medical Certificate",
            "Remarks",
            "Updated Attendance",
        ]
    );
    assert_eq!(table.cell(0, 4), Some(&Cell::text("note")));
}

/// 全行で補正ルールが成り立つこと
#[test]
fn test_adjustment_rule_over_all_rows() {
    let rows = [
        ("E1", "Alice", 50.0),
        ("E2", "Bob", 59.0),
        ("E3", "Carol", 60.0),
        ("E4", "Dave", 95.0),
        ("E5", "Eve", 12.0),
        ("E6", "Frank", 30.0),
    ];
    let roster = roster_xlsx(&rows);
    // Alice は氏名のみ、Carol は学籍番号のみ、Dave は両方一致
    let records = [
        record("Alice", "X1"),
        record("Nobody", "E3"),
        record("Dave", "E4"),
        record("Eve", "E5"),
    ];
    let output = pipeline::transform(&records, &roster).unwrap();
    let table = output_table(&output);

    let total_col = column(&table, "Total Attendance");
    let cert_col = column(&table, "Medical Certificate");
    let updated_col = column(&table, "Updated Attendance");

    for row in 0..table.len() {
        let Some(&Cell::Number(total)) = table.cell(row, total_col) else {
            panic!("数値でない: row {}", row);
        };
        let Some(&Cell::Number(updated)) = table.cell(row, updated_col) else {
            panic!("数値でない: row {}", row);
        };
        let certified = table.cell(row, cert_col) == Some(&Cell::text("Yes"));

        if certified && total < 60.0 {
            assert_eq!(updated, total + 5.0, "row {}", row);
        } else {
            assert_eq!(updated, total, "row {}", row);
        }
    }

    let certified: Vec<bool> = (0..table.len())
        .map(|row| table.cell(row, cert_col) == Some(&Cell::text("Yes")))
        .collect();
    assert_eq!(certified, vec![true, false, true, true, true, false]);
    assert_eq!(output.summary.adjustment.adjusted, 2);
}

/// Total Attendance がない → 400 相当の検証エラー
#[test]
fn test_missing_total_attendance() {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "Enrollment Number").unwrap();
    worksheet.write_string(0, 1, "Name").unwrap();
    worksheet.write_string(0, 2, "Attendance").unwrap();
    let roster = workbook.save_to_buffer().unwrap();

    let err = pipeline::transform(&[record("Alice", "E1")], &roster).unwrap_err();
    assert!(matches!(
        err,
        CertAttendanceError::Common(Error::MissingColumn { .. })
    ));

    let payload = err.payload().expect("検証エラーのはず");
    assert_eq!(payload.status, 400);
    assert_eq!(payload.error, ErrorKind::MissingColumn);
    assert_eq!(payload.message, "Total Attendance column not found");
}

/// 出席値が数値でない → 検証エラー
#[test]
fn test_non_numeric_attendance() {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    worksheet.write_string(1, 0, "E1").unwrap();
    worksheet.write_string(1, 1, "Alice").unwrap();
    worksheet.write_string(1, 2, "N/A").unwrap();
    let roster = workbook.save_to_buffer().unwrap();

    let err = pipeline::transform(&[], &roster).unwrap_err();
    assert_eq!(err.payload().map(|p| p.error), Some(ErrorKind::NonNumericAttendance));
}

/// 出席簿でないバイト列はそのままエラー
#[test]
fn test_unreadable_roster() {
    let err = pipeline::transform(&[], b"plain text").unwrap_err();
    assert!(matches!(err, CertAttendanceError::Spreadsheet(_)));
    assert!(err.payload().is_none());
}

struct FakeOcr(HashMap<String, String>);

impl OcrEngine for FakeOcr {
    fn recognize(&self, image: &CertificateImage) -> Result<String> {
        Ok(self.0.get(&image.file_name).cloned().unwrap_or_default())
    }
}

fn png_bytes() -> Vec<u8> {
    let image = image::DynamicImage::new_rgb8(16, 16);
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
    buffer.into_inner()
}

/// OCRから出力まで（偽OCRエンジン）
#[test]
fn test_process_end_to_end() {
    let mut texts = HashMap::new();
    texts.insert(
        "alice.png".to_string(),
        "MEDICAL CERTIFICATE\nName: Alice\nEnrollment Number: E1\nRest: 3 days".to_string(),
    );
    texts.insert("blurry.png".to_string(), "M3dical cert1ficate".to_string());

    let png = png_bytes();
    let certificates = vec![
        CertificateImage::from_bytes("blurry.png", &png).unwrap(),
        CertificateImage::from_bytes("alice.png", &png).unwrap(),
    ];
    let roster = roster_xlsx(&[("E1", "Alice", 50.0), ("E2", "Bob", 50.0)]);

    let (report, output) =
        pipeline::process(&FakeOcr(texts), &certificates, &roster, || {}).unwrap();

    assert_eq!(report.skipped(), 1);
    assert_eq!(output.summary.certificates, Some(2));
    assert_eq!(output.summary.skipped_certificates, Some(1));
    assert_eq!(output.summary.records, 1);
    assert_eq!(output.summary.matched_rows, 1);

    let table = output_table(&output);
    let updated_col = column(&table, "Updated Attendance");
    assert_eq!(table.cell(0, updated_col), Some(&Cell::Number(55.0)));
    assert_eq!(table.cell(1, updated_col), Some(&Cell::Number(50.0)));
}

/// 診断書なしでも出席簿は出力される
#[test]
fn test_process_without_certificates() {
    let roster = roster_xlsx(&[("E1", "Alice", 50.0)]);
    let (report, output) =
        pipeline::process(&FakeOcr(HashMap::new()), &[], &roster, || {}).unwrap();

    assert!(report.extractions.is_empty());
    let table = output_table(&output);
    assert_eq!(table.cell(0, column(&table, "Updated Attendance")), Some(&Cell::Number(50.0)));
}
