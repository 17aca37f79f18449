//! レイアウト設定モジュール
//!
//! mm基準のレイアウト定義（Source of Truth）。
//! Y座標はすべてページ上端からの距離（mm）。

// ============================================
// ページ寸法
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 余白（mm）
pub const MARGIN_MM: f32 = 10.0;

/// 自動改ページの下余白（mm）
pub const PAGE_BREAK_MARGIN_MM: f32 = 15.0;

/// セル内の左右パディング（mm）
pub const CELL_PADDING_MM: f32 = 1.0;

/// 本文幅（mm）
pub const CONTENT_WIDTH_MM: f32 = A4_WIDTH_MM - MARGIN_MM * 2.0; // 190mm

// ============================================
// 固定配置
// ============================================

/// 表紙ロゴ（水平中央）
pub const LOGO_Y_MM: f32 = 20.0;
pub const LOGO_WIDTH_MM: f32 = 90.0;
/// タイトルに重ならない高さ上限
pub const LOGO_MAX_HEIGHT_MM: f32 = COVER_TITLE_Y_MM - LOGO_Y_MM - 5.0; // 55mm

/// 表紙タイトル位置
pub const COVER_TITLE_Y_MM: f32 = 80.0;

/// 署名画像
pub const SIGNATURE_X_MM: f32 = 80.0;
pub const SIGNATURE_WIDTH_MM: f32 = 50.0;

// ============================================
// 行高さ（mm）
// ============================================

pub const TITLE_LINE_MM: f32 = 12.0;
pub const COVER_LINE_MM: f32 = 8.0;
pub const BANNER_LINE_MM: f32 = 10.0;
pub const HEADING_LINE_MM: f32 = 8.0;
pub const BODY_LINE_MM: f32 = 6.0;

// ============================================
// 罫線
// ============================================

/// (グレー値 0-255, 線幅mm)
pub const HEADER_RULE: (u8, f32) = (180, 0.4);
pub const ITEM_RULE: (u8, f32) = (210, 0.2);

// ============================================
// フォント
// ============================================

/// 組み込みHelveticaの書体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

/// 書体 + サイズ（pt）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontStyle,
    pub size_pt: f32,
}

impl TextStyle {
    pub const fn new(font: FontStyle, size_pt: f32) -> Self {
        Self { font, size_pt }
    }
}

pub const TITLE_STYLE: TextStyle = TextStyle::new(FontStyle::Bold, 22.0);
pub const COVER_STYLE: TextStyle = TextStyle::new(FontStyle::Regular, 12.0);
pub const BANNER_STYLE: TextStyle = TextStyle::new(FontStyle::Bold, 14.0);
pub const SECTION_STYLE: TextStyle = TextStyle::new(FontStyle::Bold, 14.0);
pub const ITEM_HEADING_STYLE: TextStyle = TextStyle::new(FontStyle::Bold, 13.0);
pub const LABEL_STYLE: TextStyle = TextStyle::new(FontStyle::Bold, 12.0);
pub const BODY_STYLE: TextStyle = TextStyle::new(FontStyle::Regular, 11.0);
pub const NOTE_STYLE: TextStyle = TextStyle::new(FontStyle::Italic, 10.0);

// ============================================
// 変換係数
// ============================================

/// mm → pt変換 (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// mm → pt 変換
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// pt → mm 変換
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}

// ============================================
// レイアウト設定構造体
// ============================================

/// ページ設定
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    /// ページ幅（mm）
    pub page_width_mm: f32,
    /// ページ高さ（mm）
    pub page_height_mm: f32,
    /// 上・左・右余白（mm）
    pub margin_mm: f32,
    /// 自動改ページの下余白（mm）
    pub break_margin_mm: f32,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self::a4()
    }
}

impl ReportLayout {
    pub fn a4() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: MARGIN_MM,
            break_margin_mm: PAGE_BREAK_MARGIN_MM,
        }
    }

    /// 本文幅（mm）
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_mm * 2.0
    }

    /// この位置を越えると改ページ（上端からのmm）
    pub fn page_break_y_mm(&self) -> f32 {
        self.page_height_mm - self.break_margin_mm
    }

    /// 1ページに置ける最大高さ（mm）
    pub fn usable_height_mm(&self) -> f32 {
        self.page_break_y_mm() - self.margin_mm
    }

    /// 右端のX座標（mm）
    pub fn right_edge_mm(&self) -> f32 {
        self.page_width_mm - self.margin_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        assert!((CONTENT_WIDTH_MM - 190.0).abs() < 0.01);
        assert!((LOGO_MAX_HEIGHT_MM - 55.0).abs() < 0.01);
    }

    #[test]
    fn test_conversion() {
        assert!((MM_TO_PT - 2.835).abs() < 0.01);
        assert!((mm_to_pt(10.0) - 28.35).abs() < 0.1);
        assert!((pt_to_mm(mm_to_pt(42.0)) - 42.0).abs() < 0.001);
    }

    #[test]
    fn test_layout_config() {
        let layout = ReportLayout::a4();
        assert!((layout.content_width_mm() - CONTENT_WIDTH_MM).abs() < 0.01);
        assert!((layout.page_break_y_mm() - 282.0).abs() < 0.01);
        assert!((layout.usable_height_mm() - 272.0).abs() < 0.01);
        assert!((layout.right_edge_mm() - 200.0).abs() < 0.01);
        assert_eq!(layout, ReportLayout::default());
    }
}
