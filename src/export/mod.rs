pub mod flow;
pub mod metrics;
pub mod pdf;
pub mod persist;
pub mod report;

pub use persist::{report_file_name, save_report, save_report_in, SavedReport, PDF_MIME_TYPE};
pub use report::{build_report_plan, ReportOptions, ReportPlan, ReportWarning, REPORT_TITLE};

use crate::error::Result;
use std::path::{Path, PathBuf};
use visit_report_common::{BrandingAssets, VisitHeader, VisitItemStore};

/// 組み立て済みPDF（未保存）
#[derive(Debug, Clone)]
pub struct AssembledReport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub warnings: Vec<ReportWarning>,
}

/// 保存まで完了したレポート
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub bytes: Vec<u8>,
    pub path: PathBuf,
    pub page_count: usize,
    pub warnings: Vec<ReportWarning>,
}

/// レイアウト → PDF描画
///
/// 画像の失敗は警告として回収され、失敗するのは描画段階のみ。
pub fn assemble_report(
    header: &VisitHeader,
    items: &VisitItemStore,
    branding: &BrandingAssets,
    options: &ReportOptions,
) -> Result<AssembledReport> {
    let plan = build_report_plan(header, items, branding, options);
    let bytes = pdf::render_pdf(&plan, REPORT_TITLE)?;

    Ok(AssembledReport {
        bytes,
        page_count: plan.page_count(),
        warnings: plan.warnings,
    })
}

/// 組み立て → `<base_dir>/Relatorios` に本日付で保存
///
/// `base_dir` が `None` ならカレントディレクトリ基準。
pub fn generate_report(
    header: &VisitHeader,
    items: &VisitItemStore,
    branding: &BrandingAssets,
    options: &ReportOptions,
    base_dir: Option<&Path>,
) -> Result<GeneratedReport> {
    header.validate()?;

    let assembled = assemble_report(header, items, branding, options)?;
    let saved = match base_dir {
        Some(dir) => save_report_in(
            dir,
            &assembled.bytes,
            &header.producer,
            chrono::Local::now().date_naive(),
        )?,
        None => save_report(&assembled.bytes, &header.producer)?,
    };

    Ok(GeneratedReport {
        bytes: saved.bytes,
        path: saved.path,
        page_count: assembled.page_count,
        warnings: assembled.warnings,
    })
}
