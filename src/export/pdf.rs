use super::flow::Element;
use super::report::ReportPlan;
use crate::error::{Result, VisitReportError};
use crate::imaging::{RasterColor, RasterImage};
use printpdf::*;
use visit_report_common::layout::{mm_to_pt, FontStyle};

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

/// ページ計画をPDFバイト列に描画
pub fn render_pdf(plan: &ReportPlan, title: &str) -> Result<Vec<u8>> {
    let page_w = plan.layout.page_width_mm;
    let page_h = plan.layout.page_height_mm;

    let (doc, page1, layer1) = PdfDocument::new(title, Mm(page_w), Mm(page_h), "Layer 1");

    let fonts = Fonts {
        regular: add_font(&doc, BuiltinFont::Helvetica)?,
        bold: add_font(&doc, BuiltinFont::HelveticaBold)?,
        italic: add_font(&doc, BuiltinFont::HelveticaOblique)?,
    };

    for (index, page) in plan.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (page_idx, layer_idx) = doc.add_page(Mm(page_w), Mm(page_h), "Layer 1");
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for element in &page.elements {
            draw_element(&layer, element, &fonts, page_h);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| VisitReportError::Assembly(format!("PDF保存エラー: {:?}", e)))
}

fn add_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef> {
    doc.add_builtin_font(font)
        .map_err(|e| VisitReportError::Assembly(format!("フォント追加エラー: {:?}", e)))
}

// PDFのY軸は下から上
fn draw_element(layer: &PdfLayerReference, element: &Element, fonts: &Fonts, page_h: f32) {
    match element {
        Element::Text {
            x_mm,
            baseline_mm,
            style,
            text,
        } => {
            layer.use_text(
                text.as_str(),
                style.size_pt,
                Mm(*x_mm),
                Mm(page_h - baseline_mm),
                fonts.get(style.font),
            );
        }
        Element::Image {
            x_mm,
            top_mm,
            width_mm,
            height_mm,
            raster,
        } => {
            if raster.width == 0 || *width_mm <= 0.0 {
                return;
            }
            let transform = ImageTransform {
                translate_x: Some(Mm(*x_mm)),
                translate_y: Some(Mm(page_h - top_mm - height_mm)),
                // 幅がwidth_mmになるdpi
                dpi: Some(raster.width as f32 * 25.4 / width_mm),
                ..Default::default()
            };
            image_object(raster).add_to_layer(layer.clone(), transform);
        }
        Element::Rule {
            x1_mm,
            x2_mm,
            y_mm,
            gray,
            thickness_mm,
        } => {
            let y = Mm(page_h - y_mm);
            layer.set_outline_color(Color::Greyscale(Greyscale::new(
                *gray as f32 / 255.0,
                None,
            )));
            layer.set_outline_thickness(mm_to_pt(*thickness_mm));
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1_mm), y), false),
                    (Point::new(Mm(*x2_mm), y), false),
                ],
                is_closed: false,
            });
        }
    }
}

fn image_object(raster: &RasterImage) -> Image {
    let color_space = match raster.color {
        RasterColor::Rgb => ColorSpace::Rgb,
        RasterColor::Gray => ColorSpace::Greyscale,
    };
    Image::from(ImageXObject {
        width: Px(raster.width as usize),
        height: Px(raster.height as usize),
        color_space,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: raster.pixels.clone(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    })
}
