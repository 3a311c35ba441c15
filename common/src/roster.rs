//! 出席簿の列操作
//!
//! 「Total Attendance」の右隣に「Medical Certificate」列を挿入する。

use crate::error::{Error, Result};
use crate::matcher::RowMatch;
use crate::types::{Cell, Table};

pub const TOTAL_ATTENDANCE: &str = "Total Attendance";
pub const MEDICAL_CERTIFICATE: &str = "Medical Certificate";
pub const UPDATED_ATTENDANCE: &str = "Updated Attendance";

/// 診断書ありの値
pub const CERTIFICATE_PRESENT: &str = "Yes";

/// 「Total Attendance」列の位置を探す（なければ MissingColumn）
pub fn total_attendance_column(table: &Table) -> Result<usize> {
    table
        .find_column(TOTAL_ATTENDANCE)
        .ok_or_else(|| Error::MissingColumn {
            column: TOTAL_ATTENDANCE.to_string(),
        })
}

/// 照合結果から「Medical Certificate」列を挿入し、挿入位置を返す
///
/// 値は一致なら "Yes"、それ以外は空文字列。
pub fn insert_certificate_column(
    table: &mut Table,
    attendance_col: usize,
    matches: &[RowMatch],
) -> usize {
    let values = (0..table.len())
        .map(|row| {
            let matched = matches.get(row).is_some_and(RowMatch::is_matched);
            if matched {
                Cell::text(CERTIFICATE_PRESENT)
            } else {
                Cell::text("")
            }
        })
        .collect();

    let certificate_col = attendance_col + 1;
    table.insert_column(certificate_col, Cell::text(MEDICAL_CERTIFICATE), values);
    certificate_col
}
