use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertAttendanceError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー ({file}): {message}")]
    ImageLoad { file: String, message: String },

    #[error("OCR実行エラー: {0}")]
    Ocr(String),

    #[error("出席簿の読み込みに失敗: {0}")]
    Spreadsheet(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] cert_attendance_common::Error),
}

impl CertAttendanceError {
    /// 検証エラーの統一ペイロード（検証エラー以外はNone）
    pub fn payload(&self) -> Option<cert_attendance_common::ErrorPayload> {
        match self {
            CertAttendanceError::Common(e) => e.payload(),
            _ => None,
        }
    }
}

impl From<calamine::XlsxError> for CertAttendanceError {
    fn from(e: calamine::XlsxError) -> Self {
        CertAttendanceError::Spreadsheet(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CertAttendanceError>;
