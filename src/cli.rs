use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "visit-report")]
#[command(about = "農業技術訪問レポート（PDF）生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 訪問記述JSONからPDFを生成
    Generate {
        /// 訪問記述JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力の基準フォルダ（この下のRelatoriosに保存、デフォルト: カレント）
        #[arg(short = 'd', long)]
        base_dir: Option<PathBuf>,

        /// 表紙の記念キャプションを出さない
        #[arg(long)]
        no_banner: bool,

        /// ロゴ画像（設定より優先）
        #[arg(long)]
        logo: Option<PathBuf>,

        /// 署名画像（設定より優先）
        #[arg(long)]
        signature: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// コンサルタント名を設定
        #[arg(long)]
        set_consultant: Option<String>,

        /// 会社名を設定
        #[arg(long)]
        set_organization: Option<String>,

        /// ロゴ画像パスを設定
        #[arg(long)]
        set_logo: Option<PathBuf>,

        /// 署名画像パスを設定
        #[arg(long)]
        set_signature: Option<PathBuf>,

        /// 記念キャプションの表示 (true/false)
        #[arg(long)]
        banner: Option<bool>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 本日生成した場合の出力ファイル名を表示
    Filename {
        /// 生産者名
        producer: String,
    },
}
