//! Certificate Attendance Common Library
//!
//! OCRテキストの解析、出席簿との照合、列の挿入と出席率補正。
//! 入出力（OCR実行・ファイル読み込み）を持たない純粋な変換のみを置く。

pub mod types;
pub mod error;
pub mod parser;
pub mod matcher;
pub mod roster;
pub mod attendance;
pub mod export;

pub use types::{Cell, CertificateExtraction, ExtractedRecord, Table};
pub use error::{Error, ErrorKind, ErrorPayload, Result};
pub use parser::parse_certificate_text;
pub use matcher::{match_row, match_rows, RowMatch};
pub use roster::{
    insert_certificate_column, total_attendance_column,
    MEDICAL_CERTIFICATE, TOTAL_ATTENDANCE, UPDATED_ATTENDANCE,
};
pub use attendance::{apply_attendance_adjustment, AdjustmentSummary};

#[cfg(feature = "excel")]
pub use export::xlsx_core::table_to_xlsx_buffer;
