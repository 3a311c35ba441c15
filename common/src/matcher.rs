//! 出席簿と診断書レコードの照合
//!
//! 列位置は固定（1列目=学籍番号、2列目=氏名）で、見出しは見ない。
//! 照合は完全一致のみ。大文字小文字・空白の正規化はしない。

use crate::types::{ExtractedRecord, Table};

/// 学籍番号の列（0始まり）
pub const ENROLLMENT_COL: usize = 0;
/// 氏名の列（0始まり）
pub const NAME_COL: usize = 1;

/// 1行分の照合結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMatch {
    /// 一致したレコードの位置（抽出順で最初のもの）
    Matched(usize),
    Unmatched,
}

impl RowMatch {
    pub fn is_matched(&self) -> bool {
        matches!(self, RowMatch::Matched(_))
    }
}

/// 1行を照合する
///
/// 氏名一致 OR 学籍番号一致 のどちらかで成立し、最初に条件を満たしたレコードを採用する。
pub fn match_row(table: &Table, row: usize, records: &[ExtractedRecord]) -> RowMatch {
    let enrollment = table.cell(row, ENROLLMENT_COL).and_then(|c| c.match_key());
    let name = table.cell(row, NAME_COL).and_then(|c| c.match_key());

    records
        .iter()
        .position(|record| {
            name.as_deref() == Some(record.name.as_str())
                || enrollment.as_deref() == Some(record.enrollment_number.as_str())
        })
        .map(RowMatch::Matched)
        .unwrap_or(RowMatch::Unmatched)
}

/// 全データ行を照合する（戻り値はデータ行と同じ順序）
pub fn match_rows(table: &Table, records: &[ExtractedRecord]) -> Vec<RowMatch> {
    (0..table.len())
        .map(|row| match_row(table, row, records))
        .collect()
}
