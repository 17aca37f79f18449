//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Item index out of range: {index} (items: {len})")]
    ItemOutOfRange { index: usize, len: usize },

    #[error("Invalid area: {0} (must be >= 0)")]
    InvalidArea(f64),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
