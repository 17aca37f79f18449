use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use visit_report::{cli, config, error, export, visit_file};
use cli::{Cli, Commands};
use config::Config;
use error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Generate { input, base_dir, no_banner, logo, signature } => {
            println!("📄 visit-report - レポート生成\n");

            // 1. 訪問記述の読み込み
            println!("[1/3] 訪問記述を読み込み中...");
            let json_dir = input.parent().unwrap_or(Path::new(".")).to_path_buf();
            let session = visit_file::VisitFile::load(&input)?.into_session(&json_dir, &config)?;
            println!("✔ {}件のアイテム\n", session.items.len());

            // 2. ブランディング・オプション
            let mut config = config;
            if logo.is_some() {
                config.logo_path = logo;
            }
            if signature.is_some() {
                config.signature_path = signature;
            }
            let branding_dir = match &base_dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()?,
            };
            let branding = config.load_branding(&branding_dir);
            let mut options = config.report_options();
            if no_banner {
                options.show_anniversary_banner = false;
            }

            // 3. 生成・保存
            println!("[2/3] PDFを生成中...");
            let report = export::generate_report(
                &session.header,
                &session.items,
                &branding,
                &options,
                base_dir.as_deref(),
            );
            let report = match report {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("✖ PDFの生成に失敗しました: {}", e);
                    std::process::exit(1);
                }
            };

            for warning in &report.warnings {
                println!("⚠ {}", warning);
            }
            println!("✔ {}ページ\n", report.page_count);

            println!("[3/3] 保存完了");
            println!("✔ 保存先: {}", report.path.display());
            println!("  サイズ: {} bytes ({})", report.bytes.len(), export::PDF_MIME_TYPE);

            println!("\n✅ PDF生成完了");
        }

        Commands::Config { set_consultant, set_organization, set_logo, set_signature, banner, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(name) = set_consultant {
                config.consultant = name;
                changed = true;
            }
            if let Some(name) = set_organization {
                config.organization = name;
                changed = true;
            }
            if let Some(path) = set_logo {
                config.logo_path = Some(absolute(path)?);
                changed = true;
            }
            if let Some(path) = set_signature {
                config.signature_path = Some(absolute(path)?);
                changed = true;
            }
            if let Some(flag) = banner {
                config.show_anniversary_banner = flag;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  コンサルタント: {}", config.consultant);
                println!("  会社: {}", config.organization);
                println!("  ロゴ: {}", display_path(config.logo_path.as_deref()));
                println!("  署名: {}", display_path(config.signature_path.as_deref()));
                println!("  記念キャプション: {}", if config.show_anniversary_banner { "表示" } else { "非表示" });
            }
        }

        Commands::Filename { producer } => {
            let today = chrono::Local::now().date_naive();
            println!("{}", export::report_file_name(&producer, today));
        }
    }

    Ok(())
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "未設定".to_string())
}
