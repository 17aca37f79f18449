//! 訪問記述ファイル（JSON）
//!
//! CLIからの入力。ヘッダ項目とアイテム（画像パス + 所見）を持ち、
//! 画像パスはJSONファイルのあるフォルダ基準で解決する。

use crate::config::Config;
use crate::error::{Result, VisitReportError};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use visit_report_common::{Category, VisitHeader, VisitItemStore};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitFile {
    /// 省略時は設定値
    pub consultant: Option<String>,
    pub organization: Option<String>,
    pub producer: String,
    pub property: String,
    pub city: String,
    pub locality: String,
    pub area_ha: f64,
    /// 省略時は本日
    pub visit_date: Option<NaiveDate>,
    pub next_visit_date: Option<NaiveDate>,
    /// 区画名（カンマ区切り）
    pub plots: String,
    pub general_recommendation: String,
    pub items: Vec<VisitFileItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitFileItem {
    pub image: PathBuf,
    /// カメラ撮影として取り込む
    pub camera: bool,
    pub plot: String,
    pub categories: Vec<Category>,
    pub notes: String,
    pub recommendations: String,
}

/// 読み込み済みの訪問セッション
#[derive(Debug, Clone)]
pub struct VisitSession {
    pub header: VisitHeader,
    pub items: VisitItemStore,
}

impl VisitFile {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VisitReportError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let file: VisitFile = serde_json::from_str(&content)?;
        Ok(file)
    }

    /// ヘッダとアイテムストアを構築
    ///
    /// 読めない画像は空データのまま追加し、レポート上はプレースホルダになる。
    pub fn into_session(self, base_dir: &Path, config: &Config) -> Result<VisitSession> {
        let today = Local::now().date_naive();

        let header = VisitHeader {
            consultant: self.consultant.unwrap_or_else(|| config.consultant.clone()),
            organization: self
                .organization
                .unwrap_or_else(|| config.organization.clone()),
            producer: self.producer,
            property: self.property,
            city: self.city,
            locality: self.locality,
            area_ha: self.area_ha,
            visit_date: self.visit_date.unwrap_or(today),
            next_visit_date: self.next_visit_date.unwrap_or(today),
            plot_list: self.plots,
            general_recommendation: self.general_recommendation,
        };
        header.validate()?;

        let mut items = VisitItemStore::new();
        for entry in self.items {
            let path = if entry.image.is_relative() {
                base_dir.join(&entry.image)
            } else {
                entry.image.clone()
            };
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "画像を読み込めません");
                    Vec::new()
                }
            };

            let index = if entry.camera {
                items.add_from_camera(bytes)
            } else {
                let name = entry
                    .image
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                items.add_from_upload(name, bytes)
            };
            items.set_plot(index, entry.plot)?;
            items.set_categories(index, entry.categories)?;
            items.set_notes(index, entry.notes)?;
            items.set_recommendations(index, entry.recommendations)?;
        }

        Ok(VisitSession { header, items })
    }
}
