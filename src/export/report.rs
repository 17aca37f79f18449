//! 訪問レポートのレイアウト
//!
//! 表紙 → 訪問ヘッダ → アイテムごとのブロック → 全体推奨事項 → 署名
//! の順にページ計画を組み立てる。画像の失敗はここで回収し、
//! レポート全体は中断しない。

use super::flow::{Align, PageFlow, PagePlan};
use crate::imaging::load_raster;
use std::fmt;
use visit_report_common::layout::{
    ReportLayout, BANNER_LINE_MM, BANNER_STYLE, BODY_LINE_MM, BODY_STYLE, COVER_LINE_MM,
    COVER_STYLE, COVER_TITLE_Y_MM, HEADER_RULE, HEADING_LINE_MM, ITEM_HEADING_STYLE, ITEM_RULE,
    LABEL_STYLE, LOGO_MAX_HEIGHT_MM, LOGO_WIDTH_MM, LOGO_Y_MM, NOTE_STYLE, SECTION_STYLE,
    SIGNATURE_WIDTH_MM, SIGNATURE_X_MM, TITLE_LINE_MM, TITLE_STYLE,
};
use visit_report_common::{BrandingAssets, VisitHeader, VisitItem, VisitItemStore};

/// 表紙タイトル
pub const REPORT_TITLE: &str = "Field Visit Report";

/// 表紙の記念キャプション（固定文言）
pub const ANNIVERSARY_BANNER: &str = "Comtécnica 55 anos (1970–2025)";

pub const HEADER_SECTION_TITLE: &str = "Visit Header";
pub const GENERAL_RECOMMENDATION_TITLE: &str = "General Recommendation";
pub const SIGNATURE_CAPTION: &str = "Electronically signed by the consultant:";

const DATE_FORMAT: &str = "%d/%m/%Y";

/// レポート生成オプション
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// 表紙に記念キャプションを出すか
    pub show_anniversary_banner: bool,
    pub layout: ReportLayout,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_anniversary_banner: true,
            layout: ReportLayout::a4(),
        }
    }
}

/// 生成を止めずに回収した画像エラー
#[derive(Debug, Clone, PartialEq)]
pub enum ReportWarning {
    /// 表紙ロゴを処理できなかった
    Logo(String),
    /// アイテム画像を処理できなかった（1始まりの番号）
    ItemImage { item: usize, reason: String },
    /// 組み込みフォントで表現できず `?` に置換した文字
    UnsupportedCharacters(Vec<char>),
}

impl fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportWarning::Logo(reason) => {
                write!(f, "ロゴを表紙に配置できませんでした: {}", reason)
            }
            ReportWarning::ItemImage { item, reason } => {
                write!(f, "Item {} の画像を処理できませんでした: {}", item, reason)
            }
            ReportWarning::UnsupportedCharacters(chars) => {
                let list: String = chars.iter().collect();
                write!(f, "PDFで表示できない文字を '?' に置換しました: {}", list)
            }
        }
    }
}

/// ページ計画（描画前のレイアウト結果）
#[derive(Debug, Clone)]
pub struct ReportPlan {
    pub pages: Vec<PagePlan>,
    pub warnings: Vec<ReportWarning>,
    pub layout: ReportLayout,
}

impl ReportPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 全ページのテキスト（配置順）
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| p.texts())
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    pub fn image_count(&self) -> usize {
        self.pages.iter().map(PagePlan::image_count).sum()
    }
}

/// レポートのページ計画を作成
pub fn build_report_plan(
    header: &VisitHeader,
    items: &VisitItemStore,
    branding: &BrandingAssets,
    options: &ReportOptions,
) -> ReportPlan {
    let mut flow = PageFlow::new(options.layout.clone());
    let mut warnings = Vec::new();

    layout_cover(&mut flow, header, branding, options, &mut warnings);
    layout_header_section(&mut flow, header);

    for (index, item) in items.iter().enumerate() {
        layout_item(&mut flow, index + 1, item, &mut warnings);
    }

    if header.has_general_recommendation() {
        flow.cell(HEADING_LINE_MM, GENERAL_RECOMMENDATION_TITLE, ITEM_HEADING_STYLE, Align::Left);
        flow.multi_cell(BODY_LINE_MM, &header.general_recommendation, BODY_STYLE);
    }

    if let Some(signature) = &branding.signature {
        layout_signature(&mut flow, signature);
    }

    if !flow.replaced_chars().is_empty() {
        let chars = flow.replaced_chars().to_vec();
        tracing::warn!(chars = %chars.iter().collect::<String>(), "表示できない文字を置換");
        warnings.push(ReportWarning::UnsupportedCharacters(chars));
    }

    ReportPlan {
        pages: flow.finish(),
        warnings,
        layout: options.layout.clone(),
    }
}

fn layout_cover(
    flow: &mut PageFlow,
    header: &VisitHeader,
    branding: &BrandingAssets,
    options: &ReportOptions,
    warnings: &mut Vec<ReportWarning>,
) {
    flow.add_page();

    if let Some(logo) = &branding.logo {
        match load_raster(logo) {
            Ok(raster) => {
                flow.image_centered_at(LOGO_Y_MM, LOGO_WIDTH_MM, LOGO_MAX_HEIGHT_MM, raster)
            }
            Err(e) => {
                tracing::warn!(error = %e, "ロゴを処理できません");
                warnings.push(ReportWarning::Logo(e.to_string()));
            }
        }
    }

    let margin = flow.layout().margin_mm;
    flow.set_xy(margin, COVER_TITLE_Y_MM);
    flow.cell(TITLE_LINE_MM, REPORT_TITLE, TITLE_STYLE, Align::Center);

    flow.ln(4.0);
    let lines = [
        format!(
            "Consultant: {}  |  Organization: {}",
            header.consultant, header.organization
        ),
        format!(
            "Producer: {}  |  Property: {}",
            header.producer, header.property
        ),
        format!("City: {}  |  Locality: {}", header.city, header.locality),
        format!(
            "Area: {:.2} ha  |  Date: {}",
            header.area_ha,
            header.visit_date.format(DATE_FORMAT)
        ),
    ];
    for line in &lines {
        flow.cell(COVER_LINE_MM, line, COVER_STYLE, Align::Center);
    }

    if options.show_anniversary_banner {
        flow.ln(4.0);
        flow.cell(BANNER_LINE_MM, ANNIVERSARY_BANNER, BANNER_STYLE, Align::Center);
    }
}

fn layout_header_section(flow: &mut PageFlow, header: &VisitHeader) {
    flow.add_page();
    flow.cell(HEADING_LINE_MM, HEADER_SECTION_TITLE, SECTION_STYLE, Align::Left);
    flow.multi_cell(
        BODY_LINE_MM,
        &format!("Plots: {}", header.plot_list),
        BODY_STYLE,
    );
    flow.multi_cell(
        BODY_LINE_MM,
        &format!(
            "Next visit (estimated): {}",
            header.next_visit_date.format(DATE_FORMAT)
        ),
        BODY_STYLE,
    );
    flow.ln(2.0);
    flow.rule(HEADER_RULE.0, HEADER_RULE.1);
    flow.ln(5.0);
}

fn layout_item(
    flow: &mut PageFlow,
    number: usize,
    item: &VisitItem,
    warnings: &mut Vec<ReportWarning>,
) {
    flow.cell(
        HEADING_LINE_MM,
        &format!("Item {}", number),
        ITEM_HEADING_STYLE,
        Align::Left,
    );

    match load_raster(&item.image) {
        Ok(raster) => {
            let (x, width) = (flow.layout().margin_mm, flow.layout().content_width_mm());
            flow.image(x, width, raster);
        }
        Err(e) => {
            tracing::warn!(item = number, source = %item.source_name, error = %e, "画像を処理できません");
            flow.multi_cell(
                BODY_LINE_MM,
                &format!("(Image could not be processed: {})", e),
                NOTE_STYLE,
            );
            warnings.push(ReportWarning::ItemImage {
                item: number,
                reason: e.to_string(),
            });
        }
    }

    flow.ln(3.0);
    flow.multi_cell(
        BODY_LINE_MM,
        &format!("Plot: {}", item.plot_label()),
        BODY_STYLE,
    );
    flow.multi_cell(
        BODY_LINE_MM,
        &format!("Categories: {}", item.categories_label()),
        BODY_STYLE,
    );

    flow.ln(1.0);
    flow.cell(BODY_LINE_MM, "Notes:", LABEL_STYLE, Align::Left);
    flow.multi_cell(BODY_LINE_MM, &item.notes, BODY_STYLE);

    flow.ln(1.0);
    flow.cell(BODY_LINE_MM, "Recommendations:", LABEL_STYLE, Align::Left);
    flow.multi_cell(BODY_LINE_MM, &item.recommendations, BODY_STYLE);

    flow.ln(4.0);
    flow.rule(ITEM_RULE.0, ITEM_RULE.1);
    flow.ln(4.0);
}

// 署名の失敗は警告しない
fn layout_signature(flow: &mut PageFlow, signature: &[u8]) {
    let raster = match load_raster(signature) {
        Ok(raster) => raster,
        Err(e) => {
            tracing::debug!(error = %e, "署名画像を省略");
            return;
        }
    };

    flow.ln(10.0);
    // キャプションと署名画像は同じページに置く
    let image_h = flow.image_height(SIGNATURE_WIDTH_MM, &raster);
    flow.keep_together(BODY_LINE_MM + image_h);
    flow.cell(BODY_LINE_MM, SIGNATURE_CAPTION, NOTE_STYLE, Align::Left);
    flow.image(SIGNATURE_X_MM, SIGNATURE_WIDTH_MM, raster);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::flow::Element;
    use chrono::NaiveDate;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;
    use visit_report_common::Category;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([40, 160, 60])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    fn header() -> VisitHeader {
        let mut header = VisitHeader::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 20).unwrap(),
        );
        header.consultant = "Carlos".into();
        header.organization = "Comtécnica Agro".into();
        header.producer = "Ana Silva".into();
        header.area_ha = 12.5;
        header.plot_list = "Talhão A, Talhão B".into();
        header
    }

    #[test]
    fn test_cover_text() {
        let plan = build_report_plan(
            &header(),
            &VisitItemStore::new(),
            &BrandingAssets::default(),
            &ReportOptions::default(),
        );
        assert!(plan.contains_text("12.50 ha"));
        assert!(plan.contains_text("15/01/2025"));
        assert!(plan.contains_text(REPORT_TITLE));
        assert!(plan.contains_text(ANNIVERSARY_BANNER));
        assert!(plan.contains_text("Next visit (estimated): 20/02/2025"));
        assert!(plan.contains_text("Plots: Talhão A, Talhão B"));
        // 表紙 + ヘッダページ
        assert_eq!(plan.page_count(), 2);
        assert!(plan.pages[0].texts().any(|t| t.contains("Ana Silva")));
    }

    #[test]
    fn test_banner_disabled() {
        let options = ReportOptions {
            show_anniversary_banner: false,
            ..Default::default()
        };
        let plan = build_report_plan(
            &header(),
            &VisitItemStore::new(),
            &BrandingAssets::default(),
            &options,
        );
        assert!(!plan.contains_text(ANNIVERSARY_BANNER));
    }

    #[test]
    fn test_item_labels() {
        let mut store = VisitItemStore::new();
        store.add_from_upload("a.png", png_bytes(8, 6));
        store.add_from_upload("b.png", png_bytes(8, 6));
        store
            .set_categories(1, [Category::Highlight, Category::Pest])
            .unwrap();
        store.set_plot(1, "Talhão B").unwrap();

        let plan = build_report_plan(
            &header(),
            &store,
            &BrandingAssets::default(),
            &ReportOptions::default(),
        );
        assert!(plan.contains_text("Categories: (no category)"));
        assert!(plan.contains_text("Plot: (not informed)"));
        assert!(plan.contains_text("Categories: Pest, Highlight"));
        assert!(plan.contains_text("Plot: Talhão B"));
        assert_eq!(plan.image_count(), 2);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_general_recommendation_only_when_present() {
        let mut h = header();
        let plan = build_report_plan(
            &h,
            &VisitItemStore::new(),
            &BrandingAssets::default(),
            &ReportOptions::default(),
        );
        assert!(!plan.contains_text(GENERAL_RECOMMENDATION_TITLE));

        h.general_recommendation = "Manter irrigação\nRevisar em 30 dias".into();
        let plan = build_report_plan(
            &h,
            &VisitItemStore::new(),
            &BrandingAssets::default(),
            &ReportOptions::default(),
        );
        assert!(plan.contains_text(GENERAL_RECOMMENDATION_TITLE));
        assert!(plan.contains_text("Revisar em 30 dias"));
    }

    #[test]
    fn test_bad_logo_warns_and_continues() {
        let branding = BrandingAssets::default().with_logo(b"not an image".to_vec());
        let plan = build_report_plan(
            &header(),
            &VisitItemStore::new(),
            &branding,
            &ReportOptions::default(),
        );
        assert!(matches!(plan.warnings.as_slice(), [ReportWarning::Logo(_)]));
        assert!(plan.contains_text(REPORT_TITLE));
        assert_eq!(plan.image_count(), 0);
    }

    #[test]
    fn test_logo_is_placed_on_cover() {
        let branding = BrandingAssets::default().with_logo(png_bytes(90, 30));
        let plan = build_report_plan(
            &header(),
            &VisitItemStore::new(),
            &branding,
            &ReportOptions::default(),
        );
        assert_eq!(plan.pages[0].image_count(), 1);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_square_logo_is_centered() {
        let branding = BrandingAssets::default().with_logo(png_bytes(100, 100));
        let plan = build_report_plan(
            &header(),
            &VisitItemStore::new(),
            &branding,
            &ReportOptions::default(),
        );
        let logo = plan.pages[0].elements.iter().find_map(|e| match e {
            Element::Image { x_mm, width_mm, .. } => Some((*x_mm, *width_mm)),
            _ => None,
        });
        let (x, w) = logo.expect("ロゴが配置されていない");
        assert!((w - LOGO_MAX_HEIGHT_MM).abs() < 0.01);
        assert!((x + w / 2.0 - 105.0).abs() < 0.01);
    }

    #[test]
    fn test_unsupported_characters_warn() {
        let mut h = header();
        h.producer = "José Łukasz 北京 😀".into();
        let plan = build_report_plan(
            &h,
            &VisitItemStore::new(),
            &BrandingAssets::default(),
            &ReportOptions::default(),
        );
        assert!(plan.contains_text("Producer: José ?ukasz ?? ?"));
        assert_eq!(
            plan.warnings,
            vec![ReportWarning::UnsupportedCharacters(vec!['Ł', '北', '京', '😀'])]
        );
    }

    #[test]
    fn test_portuguese_text_has_no_warning() {
        let mut h = header();
        h.producer = "João Conceição".into();
        h.general_recommendation = "Ação – “aspas”".into();
        let plan = build_report_plan(
            &h,
            &VisitItemStore::new(),
            &BrandingAssets::default(),
            &ReportOptions::default(),
        );
        assert!(plan.warnings.is_empty());
        assert!(plan.contains_text("Ação – “aspas”"));
    }

    #[test]
    fn test_signature_caption_stays_with_image() {
        let mut flow = PageFlow::new(ReportLayout::a4());
        flow.add_page();
        // ln(10)後: 260mm。キャプション6mm + 画像20mm は収まらない
        flow.set_xy(10.0, 250.0);
        layout_signature(&mut flow, &png_bytes(50, 20));

        let pages = flow.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].texts().count(), 0);
        assert_eq!(pages[1].texts().next(), Some(SIGNATURE_CAPTION));
        assert_eq!(pages[1].image_count(), 1);
    }

    #[test]
    fn test_bad_signature_is_silent() {
        let branding = BrandingAssets::default().with_signature(vec![0xde, 0xad]);
        let plan = build_report_plan(
            &header(),
            &VisitItemStore::new(),
            &branding,
            &ReportOptions::default(),
        );
        assert!(plan.warnings.is_empty());
        assert!(!plan.contains_text(SIGNATURE_CAPTION));
    }

    #[test]
    fn test_signature_block() {
        let branding = BrandingAssets::default().with_signature(png_bytes(50, 20));
        let plan = build_report_plan(
            &header(),
            &VisitItemStore::new(),
            &branding,
            &ReportOptions::default(),
        );
        assert!(plan.contains_text(SIGNATURE_CAPTION));
        assert_eq!(plan.image_count(), 1);
    }

    #[test]
    fn test_many_items_paginate() {
        let mut store = VisitItemStore::new();
        for i in 0..5 {
            let idx = store.add_from_upload(format!("{}.png", i), png_bytes(40, 30));
            store.set_notes(idx, "Observação ".repeat(40)).unwrap();
        }
        let plan = build_report_plan(
            &header(),
            &store,
            &BrandingAssets::default(),
            &ReportOptions::default(),
        );
        assert!(plan.page_count() > 3);
        for n in 1..=5 {
            assert!(plan.contains_text(&format!("Item {}", n)));
        }
    }
}
