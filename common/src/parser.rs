//! OCRテキストパーサー
//!
//! 診断書のOCR結果から氏名と学籍番号を抜き出す。
//! OCR結果はノイズを含む前提で、取れなければ None を返すだけでエラーにはしない。

use crate::types::ExtractedRecord;

/// 氏名ラベル
pub const NAME_LABEL: &str = "Name:";
/// 学籍番号ラベル
pub const ENROLLMENT_LABEL: &str = "Enrollment Number:";

/// 行中の最初の ':' より後ろをトリムして返す
///
/// 値に ':' が含まれても切らない（`"Name: Dr: Who"` → `"Dr: Who"`）。
/// ラベルより前に ':' がある行では、その位置から後ろが値になる。
fn value_after_colon(line: &str) -> &str {
    line.split_once(':').map(|(_, v)| v.trim()).unwrap_or("")
}

/// OCRテキストから氏名・学籍番号を抽出
///
/// - 1行につき設定されるのは片方のみ（氏名ラベルを優先）
/// - 同じラベルが複数行ある場合は最後の行が勝つ
/// - 両方とも非空のときだけレコードを返す
///
/// # Examples
/// ```
/// use cert_attendance_common::parse_certificate_text;
///
/// let text = "MEDICAL CERTIFICATE\nName: Alice\nEnrollment Number: E1\n";
/// let record = parse_certificate_text(text).unwrap();
/// assert_eq!(record.name, "Alice");
/// assert_eq!(record.enrollment_number, "E1");
/// ```
pub fn parse_certificate_text(text: &str) -> Option<ExtractedRecord> {
    let mut name = "";
    let mut enrollment_number = "";

    for line in text.lines() {
        if line.contains(NAME_LABEL) {
            name = value_after_colon(line);
        } else if line.contains(ENROLLMENT_LABEL) {
            enrollment_number = value_after_colon(line);
        }
    }

    if name.is_empty() || enrollment_number.is_empty() {
        return None;
    }

    Some(ExtractedRecord {
        name: name.to_string(),
        enrollment_number: enrollment_number.to_string(),
    })
}
