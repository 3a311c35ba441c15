//! 共有型定義
//!
//! - ExtractedRecord: 診断書1枚から抽出した学生情報
//! - CertificateExtraction: 画像ごとの抽出結果（レポート用）
//! - Cell / Table: 出席簿シートの表現

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// 診断書から抽出したレコード（氏名・学籍番号とも非空）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    pub name: String,
    pub enrollment_number: String,
}

/// 画像1枚分の抽出結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateExtraction {
    pub file_name: String,
    /// 氏名・学籍番号の両方が取れなかった場合はNone
    pub record: Option<ExtractedRecord>,
}

/// セル値
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// 空セルまたは空文字列
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// 照合用の文字列表現
    ///
    /// 文字列はそのまま、数値は整数なら小数部なしで表現する。
    /// 空セル・真偽値は照合対象外。
    pub fn match_key(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Number(n) => Some(Cow::Owned(format_number(*n))),
            Cell::Empty | Cell::Bool(_) => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", format_number(*n)),
            Cell::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

/// シート全体（1行目が見出し、2行目以降がデータ）
///
/// 全行の列数は常に揃っている。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<Cell>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// 見出しとデータ行から生成（短い行は空セルで埋める）
    pub fn new(headers: Vec<Cell>, rows: Vec<Vec<Cell>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);

        let pad = |mut row: Vec<Cell>| {
            row.resize(width, Cell::Empty);
            row
        };

        Self {
            headers: pad(headers),
            rows: rows.into_iter().map(pad).collect(),
        }
    }

    /// 2次元のセル配列から生成（先頭行を見出しとする）
    pub fn from_grid(grid: Vec<Vec<Cell>>) -> Self {
        let mut iter = grid.into_iter();
        let headers = iter.next().unwrap_or_default();
        Self::new(headers, iter.collect())
    }

    pub fn headers(&self) -> &[Cell] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// 見出し文字列と完全一致する最初の列
    pub fn find_column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.as_str() == Some(header))
    }

    /// `index` の位置に列を挿入する（既存の列は右へずれる）
    pub fn insert_column(&mut self, index: usize, header: Cell, values: Vec<Cell>) {
        let index = index.min(self.width());
        self.headers.insert(index, header);

        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.insert(index, values.next().unwrap_or_default());
        }
    }

    /// 末尾に列を追加する
    pub fn push_column(&mut self, header: Cell, values: Vec<Cell>) {
        let index = self.width();
        self.insert_column(index, header, values);
    }
}
