use cert_attendance::{cli, config, error, ocr, pipeline, scanner, workbook};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use ocr::TesseractCli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "cert_attendance=debug,cert_attendance_common=debug"
    } else {
        "cert_attendance=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("  {bar:30} {pos}/{len} {msg}") {
        bar.set_style(style);
    }
    bar
}

fn engine_for(config: &Config, lang: Option<String>) -> TesseractCli {
    let engine = TesseractCli::from_config(config);
    match lang {
        Some(lang) => engine.with_language(lang),
        None => engine,
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Process { roster, certificates, folder, output, lang } => {
            println!("📋 cert-attendance - 出席簿補正\n");

            // 1. 入力確認
            println!("[1/3] 入力を読み込み中...");
            let images = scanner::collect_certificates(&certificates, folder.as_deref())?;
            let certificate_images = ocr::load_images(&images)?;
            let roster_bytes = workbook::read_roster_bytes(&roster)?;
            println!("✔ 診断書 {}枚 / 出席簿 {}\n", images.len(), roster.display());

            // 2. OCR + 照合 + 補正
            let engine = engine_for(&config, lang);
            println!("[2/3] 診断書を読み取り中... ({})", engine.command());
            let bar = progress_bar(certificate_images.len());
            let (_report, result) = pipeline::process(
                &engine,
                &certificate_images,
                &roster_bytes,
                || bar.inc(1),
            )?;
            bar.finish_and_clear();

            let summary = result.summary;
            println!(
                "✔ 抽出 {}件（読み飛ばし {}件）/ 一致 {}行 / 補正 {}行\n",
                summary.records,
                summary.skipped_certificates.unwrap_or_default(),
                summary.matched_rows,
                summary.adjustment.adjusted,
            );

            // 3. 保存
            println!("[3/3] 結果を保存中...");
            let output_path = cli::resolve_output_path(output.as_deref());
            if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output_path, &result.xlsx)?;
            println!("✔ 出力: {}", output_path.display());

            println!("\n✅ 完了");
        }

        Commands::Extract { certificates, folder, output, lang } => {
            let images = scanner::collect_certificates(&certificates, folder.as_deref())?;
            let certificate_images = ocr::load_images(&images)?;

            let engine = engine_for(&config, lang);
            let bar = progress_bar(certificate_images.len());
            let report = ocr::extract_records(&engine, &certificate_images, || bar.inc(1))?;
            bar.finish_and_clear();

            let json = serde_json::to_string_pretty(&report.extractions)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!(
                        "✔ 抽出結果を保存: {}（読み飛ばし {}件）",
                        path.display(),
                        report.skipped()
                    );
                }
                None => println!("{}", json),
            }
        }

        Commands::Config { set_tesseract, set_language, show } => {
            let mut config = config;

            if let Some(command) = set_tesseract {
                config.set_tesseract_command(command)?;
                println!("✔ tesseractコマンドを設定しました");
            }

            if let Some(language) = set_language {
                config.set_language(language)?;
                println!("✔ OCR言語を設定しました");
            }

            if show {
                println!("設定:");
                println!("  tesseract: {}", config.tesseract_command());
                println!("  言語: {}", config.language);
                match config.page_segmentation_mode {
                    Some(psm) => println!("  PSM: {}", psm),
                    None => println!("  PSM: 既定"),
                }
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_errors = cli.json_errors;

    if let Err(e) = run(cli) {
        match e.payload() {
            Some(payload) if json_errors => {
                // 検証エラーは統一形式で出力
                match serde_json::to_string(&payload) {
                    Ok(json) => println!("{}", json),
                    Err(_) => eprintln!("✖ {}", e),
                }
            }
            _ => eprintln!("✖ {}", e),
        }
        std::process::exit(1);
    }
}
