//! エラー型定義
//!
//! 検証エラーは `ErrorKind` / `ErrorPayload` で統一された形に変換できる。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 検証エラーのHTTP相当ステータス
pub const VALIDATION_STATUS: u16 = 400;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 初回読み込み時に見出しが見つからない
    #[error("{column} column not found")]
    MissingColumn { column: String },

    /// 保存→再読み込み後に必須列が欠落している
    #[error("Required columns are missing in the uploaded file.")]
    MissingColumnsAfterRoundTrip { columns: Vec<String> },

    /// 出席値が数値として解釈できない（rowはExcelの行番号）
    #[error("Total Attendance is not numeric at row {row}: {value:?}")]
    NonNumericAttendance { row: usize, value: String },

    #[error("Excel error: {0}")]
    Excel(String),
}

/// 検証エラーの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingColumn,
    MissingColumnsAfterRoundTrip,
    NonNumericAttendance,
}

/// 呼び出し側へ返す統一エラー形式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: ErrorKind,
    pub message: String,
    pub status: u16,
}

impl Error {
    /// 検証エラーなら種別を返す（Excel書き出しエラーはNone）
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::MissingColumn { .. } => Some(ErrorKind::MissingColumn),
            Error::MissingColumnsAfterRoundTrip { .. } => {
                Some(ErrorKind::MissingColumnsAfterRoundTrip)
            }
            Error::NonNumericAttendance { .. } => Some(ErrorKind::NonNumericAttendance),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<ErrorPayload> {
        self.kind().map(|kind| ErrorPayload {
            error: kind,
            message: self.to_string(),
            status: VALIDATION_STATUS,
        })
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
