//! 出席率の補正
//!
//! 「Total Attendance」が閾値未満かつ「Medical Certificate」が "Yes" の行に
//! 固定ボーナスを1回だけ加算し、「Updated Attendance」列として末尾に追加する。
//! 上限（100）でのクリップはしない。

use crate::error::{Error, Result};
use crate::roster::{CERTIFICATE_PRESENT, MEDICAL_CERTIFICATE, TOTAL_ATTENDANCE, UPDATED_ATTENDANCE};
use crate::types::{Cell, Table};

/// 補正対象となる出席率の閾値（未満が対象）
pub const ATTENDANCE_THRESHOLD: f64 = 60.0;
/// 加算するボーナス
pub const ATTENDANCE_BONUS: f64 = 5.0;

/// 補正結果の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjustmentSummary {
    /// データ行数
    pub rows: usize,
    /// 診断書ありの行数
    pub certified: usize,
    /// ボーナスを加算した行数
    pub adjusted: usize,
}

/// 出席値を数値に変換する
///
/// 空セルは None。数値文字列は変換し、それ以外は NonNumericAttendance。
fn attendance_value(cell: &Cell, row: usize) -> Result<Option<f64>> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(n) => Ok(Some(*n)),
        Cell::Text(s) if s.trim().is_empty() => Ok(None),
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| Error::NonNumericAttendance {
                row,
                value: s.clone(),
            }),
        Cell::Bool(_) => Err(Error::NonNumericAttendance {
            row,
            value: cell.to_string(),
        }),
    }
}

/// 再読み込み後のテーブルに「Updated Attendance」列を追加する
///
/// 「Total Attendance」「Medical Certificate」のどちらかが無ければ
/// MissingColumnsAfterRoundTrip を返し、テーブルは変更しない。
pub fn apply_attendance_adjustment(table: &mut Table) -> Result<AdjustmentSummary> {
    let attendance_col = table.find_column(TOTAL_ATTENDANCE);
    let certificate_col = table.find_column(MEDICAL_CERTIFICATE);

    let (attendance_col, certificate_col) = match (attendance_col, certificate_col) {
        (Some(a), Some(c)) => (a, c),
        (a, c) => {
            let mut columns = Vec::new();
            if a.is_none() {
                columns.push(TOTAL_ATTENDANCE.to_string());
            }
            if c.is_none() {
                columns.push(MEDICAL_CERTIFICATE.to_string());
            }
            return Err(Error::MissingColumnsAfterRoundTrip { columns });
        }
    };

    let mut summary = AdjustmentSummary {
        rows: table.len(),
        ..Default::default()
    };
    let mut updated = Vec::with_capacity(table.len());

    for (index, row) in table.rows().iter().enumerate() {
        // Excel上の行番号（見出しが1行目）
        let excel_row = index + 2;
        let certified = row[certificate_col].as_str() == Some(CERTIFICATE_PRESENT);
        if certified {
            summary.certified += 1;
        }

        let value = match attendance_value(&row[attendance_col], excel_row)? {
            Some(total) if total < ATTENDANCE_THRESHOLD && certified => {
                summary.adjusted += 1;
                Cell::Number(total + ATTENDANCE_BONUS)
            }
            Some(total) => Cell::Number(total),
            None => Cell::Empty,
        };
        updated.push(value);
    }

    table.push_column(Cell::text(UPDATED_ATTENDANCE), updated);

    tracing::debug!(
        rows = summary.rows,
        certified = summary.certified,
        adjusted = summary.adjusted,
        "attendance adjusted"
    );

    Ok(summary)
}
