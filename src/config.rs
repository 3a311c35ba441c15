use crate::error::{CertAttendanceError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// tesseractコマンドを上書きする環境変数
pub const TESSERACT_ENV: &str = "CERT_ATTENDANCE_TESSERACT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// tesseract 実行ファイル（PATH上の名前またはフルパス）
    pub tesseract_command: String,
    /// OCR言語（tesseract の -l）
    pub language: String,
    /// ページ分割モード（tesseract の --psm）
    pub page_segmentation_mode: Option<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tesseract_command: "tesseract".into(),
            language: "eng".into(),
            page_segmentation_mode: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CertAttendanceError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("cert-attendance").join("config.json"))
    }

    pub fn tesseract_command(&self) -> String {
        // 環境変数を優先
        match std::env::var(TESSERACT_ENV) {
            Ok(cmd) if !cmd.trim().is_empty() => cmd,
            _ => self.tesseract_command.clone(),
        }
    }

    pub fn set_tesseract_command(&mut self, command: String) -> Result<()> {
        if command.trim().is_empty() {
            return Err(CertAttendanceError::Config("tesseractコマンドが空です".into()));
        }
        self.tesseract_command = command;
        self.save()
    }

    pub fn set_language(&mut self, language: String) -> Result<()> {
        if language.trim().is_empty() {
            return Err(CertAttendanceError::Config("OCR言語が空です".into()));
        }
        self.language = language;
        self.save()
    }
}
