use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::pipeline::OUTPUT_FILE_NAME;

#[derive(Parser)]
#[command(name = "cert-attendance")]
#[command(about = "診断書OCR照合・出席率補正ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 検証エラーをJSONで出力
    #[arg(long, global = true)]
    pub json_errors: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 診断書を照合して出席簿を補正
    Process {
        /// 出席簿（xlsx）
        #[arg(short, long, required = true)]
        roster: PathBuf,

        /// 診断書画像（指定順が照合の優先順）
        #[arg(short, long, num_args = 1..)]
        certificates: Vec<PathBuf>,

        /// 診断書画像フォルダ（ファイル名順で追加）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// 出力ファイル/ディレクトリ（デフォルト: updated_attendance.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// OCR言語（設定値を上書き）
        #[arg(long)]
        lang: Option<String>,
    },

    /// 診断書から氏名・学籍番号だけを抽出してJSONを出力
    Extract {
        /// 診断書画像
        #[arg(short, long, num_args = 1..)]
        certificates: Vec<PathBuf>,

        /// 診断書画像フォルダ
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// OCR言語（設定値を上書き）
        #[arg(long)]
        lang: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// tesseractコマンドを設定
        #[arg(long)]
        set_tesseract: Option<String>,

        /// OCR言語を設定
        #[arg(long)]
        set_language: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 出力先を決定（ディレクトリなら既定ファイル名を付ける）
pub fn resolve_output_path(output: Option<&Path>) -> PathBuf {
    match output {
        None => PathBuf::from(OUTPUT_FILE_NAME),
        Some(path) if path.is_dir() || path.extension().is_none() => path.join(OUTPUT_FILE_NAME),
        Some(path) => path.to_path_buf(),
    }
}
