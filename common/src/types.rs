//! 訪問記録の型定義
//!
//! - VisitItem: 写真1枚分の所見（区画・カテゴリ・メモ・推奨事項）
//! - VisitHeader: 訪問1回分のヘッダ情報
//! - BrandingAssets: ロゴ・署名画像（任意）

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// 区画未指定時の表示
pub const PLOT_NOT_INFORMED: &str = "(not informed)";

/// カテゴリ未選択時の表示
pub const NO_CATEGORY: &str = "(no category)";

/// 所見カテゴリ（固定語彙）
///
/// 宣言順がPDF上の表示順になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(alias = "pest", alias = "Praga")]
    Pest,
    #[serde(alias = "disease", alias = "Doença")]
    Disease,
    #[serde(alias = "highlight", alias = "Destaque")]
    Highlight,
    #[serde(
        rename = "Treatment Result",
        alias = "TreatmentResult",
        alias = "treatment_result",
        alias = "Resultado de Tratamento"
    )]
    TreatmentResult,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Pest => "Pest",
            Category::Disease => "Disease",
            Category::Highlight => "Highlight",
            Category::TreatmentResult => "Treatment Result",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pest" | "praga" => Ok(Category::Pest),
            "disease" | "doença" | "doenca" => Ok(Category::Disease),
            "highlight" | "destaque" => Ok(Category::Highlight),
            "treatment result" | "treatment_result" | "treatmentresult"
            | "resultado de tratamento" => Ok(Category::TreatmentResult),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

/// 写真1枚分の所見
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitItem {
    /// エンコード済み画像（形式は問わない）
    pub image: Vec<u8>,
    /// 元ファイル名（表示専用）
    pub source_name: String,
    /// 区画（Talhão/Gleba）。空文字は未指定
    pub plot: String,
    pub categories: BTreeSet<Category>,
    pub notes: String,
    pub recommendations: String,
}

impl VisitItem {
    pub fn new(source_name: impl Into<String>, image: Vec<u8>) -> Self {
        Self {
            image,
            source_name: source_name.into(),
            ..Default::default()
        }
    }

    /// 区画の表示文字列
    pub fn plot_label(&self) -> &str {
        let plot = self.plot.trim();
        if plot.is_empty() || plot == PLOT_NOT_INFORMED {
            PLOT_NOT_INFORMED
        } else {
            plot
        }
    }

    /// カテゴリの表示文字列（宣言順でカンマ区切り）
    pub fn categories_label(&self) -> String {
        if self.categories.is_empty() {
            return NO_CATEGORY.to_string();
        }
        self.categories
            .iter()
            .map(Category::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 訪問ヘッダ（1セッションにつき1件）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitHeader {
    #[serde(default)]
    pub consultant: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub producer: String,
    #[serde(default)]
    pub property: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub locality: String,
    /// 面積（ha）
    #[serde(default)]
    pub area_ha: f64,
    pub visit_date: NaiveDate,
    /// 次回訪問予定日（見込み）
    pub next_visit_date: NaiveDate,
    /// 区画名のカンマ区切りリスト（入力そのまま）
    #[serde(default)]
    pub plot_list: String,
    #[serde(default)]
    pub general_recommendation: String,
}

impl VisitHeader {
    /// 日付のみ指定した空のヘッダ
    pub fn new(visit_date: NaiveDate, next_visit_date: NaiveDate) -> Self {
        Self {
            consultant: String::new(),
            organization: String::new(),
            producer: String::new(),
            property: String::new(),
            city: String::new(),
            locality: String::new(),
            area_ha: 0.0,
            visit_date,
            next_visit_date,
            plot_list: String::new(),
            general_recommendation: String::new(),
        }
    }

    /// 区画リストをトークンに分解（trim済み・空要素除外、重複はそのまま）
    pub fn plot_names(&self) -> Vec<String> {
        self.plot_list
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// 区画選択肢（先頭は未指定）
    pub fn plot_choices(&self) -> Vec<String> {
        let mut choices = vec![PLOT_NOT_INFORMED.to_string()];
        choices.extend(self.plot_names());
        choices
    }

    /// 全体推奨事項を出力するか
    pub fn has_general_recommendation(&self) -> bool {
        !self.general_recommendation.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.area_ha.is_finite() || self.area_ha < 0.0 {
            return Err(Error::InvalidArea(self.area_ha));
        }
        Ok(())
    }
}

/// ロゴ・署名画像（どちらも任意）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrandingAssets {
    pub logo: Option<Vec<u8>>,
    pub signature: Option<Vec<u8>>,
}

impl BrandingAssets {
    pub fn with_logo(mut self, logo: Vec<u8>) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = Some(signature);
        self
    }
}
