//! 出席簿（xlsx）の読み込み
//!
//! 先頭シートを Table に変換する。使用範囲がA1から始まらない場合も
//! A1基準の位置に揃える（1列目=学籍番号、2列目=氏名 の前提を崩さないため）。

use crate::error::{CertAttendanceError, Result};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use cert_attendance_common::{Cell, Table};
use std::io::Cursor;
use std::path::Path;

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        // 日付はシリアル値として保持
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

/// xlsxバイト列から先頭シートを読み込む
pub fn read_table_bytes(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CertAttendanceError::Spreadsheet("シートがありません".into()))??;

    let (Some((start_row, start_col)), Some((end_row, end_col))) = (range.start(), range.end())
    else {
        return Ok(Table::default());
    };

    let height = end_row as usize + 1;
    let width = end_col as usize + 1;
    let mut grid = vec![vec![Cell::Empty; width]; height];

    for (row, col, data) in range.used_cells() {
        grid[start_row as usize + row][start_col as usize + col] = to_cell(data);
    }

    tracing::debug!(rows = height, cols = width, "worksheet loaded");

    Ok(Table::from_grid(grid))
}

/// 出席簿ファイルをバイト列として読み込む（存在しなければ FileNotFound）
pub fn read_roster_bytes(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(CertAttendanceError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read(path)?)
}
