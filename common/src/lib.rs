//! Visit Report Common Library
//!
//! 訪問記録の型・レコードストア・ファイル名サニタイズ・レイアウト定義

pub mod types;
pub mod store;
pub mod sanitize;
pub mod layout;
pub mod error;

pub use types::{BrandingAssets, Category, VisitHeader, VisitItem};
pub use store::VisitItemStore;
pub use sanitize::{sanitize_filename, sanitize_filename_opt, FALLBACK_FILE_NAME};
pub use layout::{FontStyle, ReportLayout, TextStyle};
pub use error::{Error, Result};
