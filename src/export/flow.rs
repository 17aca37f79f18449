//! ページフロー
//!
//! カーソル位置（上端からのmm）を進めながら要素を配置し、
//! 下余白を越える場合は自動で改ページする。

use super::metrics::{text_width_mm, to_winansi, wrap_text};
use crate::imaging::RasterImage;
use visit_report_common::layout::{pt_to_mm, ReportLayout, TextStyle, CELL_PADDING_MM};

/// 横方向の揃え
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// ページ上の描画要素（座標はmm、Yは上端から）
#[derive(Debug, Clone)]
pub enum Element {
    Text {
        x_mm: f32,
        baseline_mm: f32,
        style: TextStyle,
        text: String,
    },
    Image {
        x_mm: f32,
        top_mm: f32,
        width_mm: f32,
        height_mm: f32,
        raster: RasterImage,
    },
    Rule {
        x1_mm: f32,
        x2_mm: f32,
        y_mm: f32,
        gray: u8,
        thickness_mm: f32,
    },
}

#[derive(Debug, Clone, Default)]
pub struct PagePlan {
    pub elements: Vec<Element>,
}

impl PagePlan {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn image_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, Element::Image { .. }))
            .count()
    }
}

pub struct PageFlow {
    layout: ReportLayout,
    pages: Vec<PagePlan>,
    x: f32,
    y: f32,
    /// 組み込みフォントで表現できず置換した文字（重複なし、出現順）
    replaced_chars: Vec<char>,
}

impl PageFlow {
    pub fn new(layout: ReportLayout) -> Self {
        Self {
            x: layout.margin_mm,
            y: layout.margin_mm,
            layout,
            pages: Vec::new(),
            replaced_chars: Vec::new(),
        }
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    pub fn add_page(&mut self) {
        self.pages.push(PagePlan::default());
        self.x = self.layout.margin_mm;
        self.y = self.layout.margin_mm;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_xy(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// 改行（Xは左余白に戻る）
    pub fn ln(&mut self, h: f32) {
        self.x = self.layout.margin_mm;
        self.y += h;
    }

    /// 1行分のテキストセル。幅は右余白まで
    pub fn cell(&mut self, h: f32, text: &str, style: TextStyle, align: Align) {
        self.ensure_space(h);

        if !text.is_empty() {
            let (text, replaced) = to_winansi(text);
            for c in replaced {
                if !self.replaced_chars.contains(&c) {
                    self.replaced_chars.push(c);
                }
            }

            let width = self.layout.right_edge_mm() - self.x;
            let text_w = text_width_mm(&text, style.size_pt, style.font);
            let x_mm = match align {
                Align::Left => self.x + CELL_PADDING_MM,
                Align::Center => self.x + (width - text_w) / 2.0,
            };
            let baseline_mm = self.y + h / 2.0 + 0.3 * pt_to_mm(style.size_pt);
            self.push(Element::Text {
                x_mm,
                baseline_mm,
                style,
                text,
            });
        }

        self.ln(h);
    }

    /// 折り返しテキスト（空文字は空行1行）
    pub fn multi_cell(&mut self, h: f32, text: &str, style: TextStyle) {
        let width = self.layout.right_edge_mm() - self.x - CELL_PADDING_MM * 2.0;
        for line in wrap_text(text, width, style.size_pt, style.font) {
            self.cell(h, &line, style, Align::Left);
        }
    }

    /// 現在位置に画像を配置してカーソルを画像の下へ進める。配置高さを返す
    pub fn image(&mut self, x_mm: f32, width_mm: f32, raster: RasterImage) -> f32 {
        let (width_mm, height_mm) =
            fit_size(width_mm, raster.aspect_ratio(), self.layout.usable_height_mm());
        self.ensure_space(height_mm);

        let top_mm = self.y;
        self.push(Element::Image {
            x_mm,
            top_mm,
            width_mm,
            height_mm,
            raster,
        });
        self.y += height_mm;
        height_mm
    }

    /// 水平中央に画像を配置（カーソルは動かさない）
    pub fn image_centered_at(
        &mut self,
        top_mm: f32,
        width_mm: f32,
        max_height_mm: f32,
        raster: RasterImage,
    ) {
        let (width_mm, height_mm) = fit_size(width_mm, raster.aspect_ratio(), max_height_mm);
        let x_mm = (self.layout.page_width_mm - width_mm) / 2.0;
        self.push(Element::Image {
            x_mm,
            top_mm,
            width_mm,
            height_mm,
            raster,
        });
    }

    /// `image` で配置した場合の高さ（mm）
    pub fn image_height(&self, width_mm: f32, raster: &RasterImage) -> f32 {
        fit_size(width_mm, raster.aspect_ratio(), self.layout.usable_height_mm()).1
    }

    /// 高さhのブロックが現在ページに収まらなければ改ページ
    pub fn keep_together(&mut self, h: f32) {
        self.ensure_space(h);
    }

    /// 本文幅の水平罫線
    pub fn rule(&mut self, gray: u8, thickness_mm: f32) {
        let rule = Element::Rule {
            x1_mm: self.layout.margin_mm,
            x2_mm: self.layout.right_edge_mm(),
            y_mm: self.y,
            gray,
            thickness_mm,
        };
        self.push(rule);
    }

    pub fn replaced_chars(&self) -> &[char] {
        &self.replaced_chars
    }

    pub fn finish(self) -> Vec<PagePlan> {
        self.pages
    }

    fn ensure_space(&mut self, h: f32) {
        if self.pages.is_empty() {
            self.add_page();
            return;
        }
        // ページ先頭で収まらない要素はそのまま置く（無限改ページ防止）
        if self.y + h > self.layout.page_break_y_mm() && self.y > self.layout.margin_mm {
            let x = self.x;
            self.add_page();
            self.x = x;
        }
    }

    fn push(&mut self, element: Element) {
        if self.pages.is_empty() {
            self.add_page();
        }
        let last = self.pages.len() - 1;
        self.pages[last].elements.push(element);
    }
}

/// 縦横比を保ったまま高さ上限に収める
fn fit_size(width_mm: f32, aspect: f32, max_height_mm: f32) -> (f32, f32) {
    let height_mm = width_mm * aspect;
    if height_mm <= max_height_mm || aspect <= 0.0 {
        (width_mm, height_mm)
    } else {
        (max_height_mm / aspect, max_height_mm)
    }
}
