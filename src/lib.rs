//! 農業技術訪問レポート生成
//!
//! 訪問ヘッダ・写真アイテム・ロゴ/署名からA4のPDFレポートを組み立てて保存する。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod imaging;
pub mod visit_file;

pub use visit_report_common as common;
