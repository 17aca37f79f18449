//! ファイル名サニタイズ
//!
//! 生産者名などの任意テキストを、アクセント除去済みの
//! ファイル名に使えるトークンへ変換する。

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 空になった場合のファイル名
pub const FALLBACK_FILE_NAME: &str = "Relatorio";

lazy_static! {
    static ref ILLEGAL_CHARS: Regex = Regex::new(r#"[\\/:*?"<>|]+"#).unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// "José Ñuñez/Test" → "Jose_Nunez_Test"
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    let replaced = ILLEGAL_CHARS.replace_all(&ascii, "_");
    let collapsed = WHITESPACE.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_');

    if trimmed.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// 未入力（None）もフォールバック名になる
pub fn sanitize_filename_opt(name: Option<&str>) -> String {
    sanitize_filename(name.unwrap_or_default())
}
