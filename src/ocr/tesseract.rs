//! tesseract CLI連携
//!
//! 画像をPNGに再エンコードして標準入力へ渡し、標準出力のテキストを受け取る。

use super::{CertificateImage, OcrEngine};
use crate::config::Config;
use crate::error::{CertAttendanceError, Result};
use std::io::{Cursor, Write};
use std::process::{Command, Stdio};

#[derive(Debug, Clone)]
pub struct TesseractCli {
    command: String,
    language: String,
    page_segmentation_mode: Option<u8>,
}

impl TesseractCli {
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
            page_segmentation_mode: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            command: config.tesseract_command(),
            language: config.language.clone(),
            page_segmentation_mode: config.page_segmentation_mode,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
        ];
        if let Some(psm) = self.page_segmentation_mode {
            args.push("--psm".to_string());
            args.push(psm.to_string());
        }
        args
    }
}

fn encode_png(image: &CertificateImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .image
        .write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| CertAttendanceError::ImageLoad {
            file: image.file_name.clone(),
            message: format!("PNG変換エラー: {}", e),
        })?;
    Ok(buffer.into_inner())
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &CertificateImage) -> Result<String> {
        let png = encode_png(image)?;

        let mut child = Command::new(&self.command)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CertAttendanceError::Ocr(format!("{} の起動に失敗: {}", self.command, e)))?;

        // tesseract は入力を読み切ってから出力するので先に書き込んで閉じる
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&png) {
                // 途中で終了したプロセスを回収してから返す
                drop(stdin);
                child.kill().ok();
                child.wait().ok();
                return Err(CertAttendanceError::Ocr(format!(
                    "画像の送信に失敗 ({}): {}",
                    image.file_name, e
                )));
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| CertAttendanceError::Ocr(format!("tesseract 待機エラー: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CertAttendanceError::Ocr(format!(
                "tesseract failed on {} (code {:?}): {}",
                image.file_name,
                output.status.code(),
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        tracing::debug!(file = %image.file_name, chars = text.len(), "ocr text received");

        Ok(text)
    }
}
