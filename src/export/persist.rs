//! PDF保存
//!
//! `<base>/Relatorios/Relatorio_Visita_<生産者名>_<YYYYMMDD>.pdf` に書き出し、
//! 書き込んだファイルを読み戻したバイト列を返す。

use crate::error::{Result, VisitReportError};
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use visit_report_common::sanitize_filename;

/// 出力先サブフォルダ
pub const OUTPUT_DIR_NAME: &str = "Relatorios";

/// ダウンロード時のMIMEタイプ
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// 保存済みレポート
#[derive(Debug, Clone)]
pub struct SavedReport {
    pub bytes: Vec<u8>,
    pub path: PathBuf,
}

impl SavedReport {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn mime_type(&self) -> &'static str {
        PDF_MIME_TYPE
    }
}

/// 出力ファイル名
pub fn report_file_name(producer: &str, date: NaiveDate) -> String {
    format!(
        "Relatorio_Visita_{}_{}.pdf",
        sanitize_filename(producer),
        date.format("%Y%m%d")
    )
}

/// カレントディレクトリ・本日の日付で保存
pub fn save_report(bytes: &[u8], producer: &str) -> Result<SavedReport> {
    let base_dir = std::env::current_dir().map_err(|e| {
        VisitReportError::Persistence(format!("作業ディレクトリを取得できません: {}", e))
    })?;
    save_report_in(&base_dir, bytes, producer, Local::now().date_naive())
}

/// 指定ディレクトリ配下に保存
pub fn save_report_in(
    base_dir: &Path,
    bytes: &[u8],
    producer: &str,
    date: NaiveDate,
) -> Result<SavedReport> {
    let out_dir = base_dir.join(OUTPUT_DIR_NAME);
    fs::create_dir_all(&out_dir).map_err(|e| {
        VisitReportError::Persistence(format!(
            "出力フォルダを作成できません: {}: {}",
            out_dir.display(),
            e
        ))
    })?;

    let path = out_dir.join(report_file_name(producer, date));

    if let Err(e) = fs::write(&path, bytes) {
        // 書きかけのファイルは残さない
        fs::remove_file(&path).ok();
        return Err(VisitReportError::Persistence(format!(
            "PDFを書き込めません: {}: {}",
            path.display(),
            e
        )));
    }

    let written = fs::read(&path).map_err(|e| {
        VisitReportError::Persistence(format!(
            "保存したPDFを読み込めません: {}: {}",
            path.display(),
            e
        ))
    })?;

    tracing::info!(path = %path.display(), bytes = written.len(), "PDFを保存");

    Ok(SavedReport {
        bytes: written,
        path,
    })
}
