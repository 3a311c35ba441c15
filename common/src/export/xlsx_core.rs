//! Excel生成（共通ライブラリ）
//!
//! Table を1シートのxlsxとしてバッファに書き出す。

use crate::error::{Error, Result};
use crate::types::{Cell, Table};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    format: Option<&Format>,
) -> Result<()> {
    let result = match (cell, format) {
        // 空文字列も空セルとして扱う
        (Cell::Empty, _) => return Ok(()),
        (Cell::Text(s), _) if s.is_empty() => return Ok(()),
        (Cell::Text(s), Some(f)) => worksheet.write_string_with_format(row, col, s, f),
        (Cell::Text(s), None) => worksheet.write_string(row, col, s),
        (Cell::Number(n), Some(f)) => worksheet.write_number_with_format(row, col, *n, f),
        (Cell::Number(n), None) => worksheet.write_number(row, col, *n),
        (Cell::Bool(b), Some(f)) => worksheet.write_boolean_with_format(row, col, *b, f),
        (Cell::Bool(b), None) => worksheet.write_boolean(row, col, *b),
    };

    result
        .map(|_| ())
        .map_err(|e| Error::Excel(format!("cell write failed at ({}, {}): {}", row, col, e)))
}

/// Table をxlsxバッファに生成
///
/// 見出し行は太字。セルの型（文字列・数値・真偽値）はそのまま保持する。
pub fn table_to_xlsx_buffer(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();

    let all_rows = std::iter::once(table.headers()).chain(table.rows().iter().map(Vec::as_slice));
    for (row_idx, row) in all_rows.enumerate() {
        let row_num = u32::try_from(row_idx)
            .map_err(|_| Error::Excel(format!("too many rows: {}", row_idx)))?;
        let format = (row_idx == 0).then_some(&header_format);

        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = u16::try_from(col_idx)
                .map_err(|_| Error::Excel(format!("too many columns: {}", col_idx)))?;
            write_cell(worksheet, row_num, col_num, cell, format)?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| Error::Excel(format!("workbook save failed: {}", e)))
}
