//! PDF生成・保存の統合テスト

use chrono::{Local, NaiveDate};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use tempfile::tempdir;
use visit_report::export::{self, build_report_plan, ReportOptions, ReportWarning};
use visit_report::common::{BrandingAssets, Category, VisitHeader, VisitItemStore};

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7) as u8, (y * 5) as u8, 90])
    }));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .expect("JPEGエンコード失敗");
    buf
}

fn create_header(producer: &str) -> VisitHeader {
    let mut header = VisitHeader::new(
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
    );
    header.consultant = "Carlos Souza".to_string();
    header.organization = "Comtécnica Agro".to_string();
    header.producer = producer.to_string();
    header.property = "Fazenda Esperança".to_string();
    header.city = "Registro".to_string();
    header.locality = "Vale do Ribeira".to_string();
    header.area_ha = 12.5;
    header.plot_list = "Talhão A, Talhão B".to_string();
    header
}

#[test]
fn test_end_to_end_single_item() {
    let dir = tempdir().expect("Failed to create temp dir");

    let header = create_header("Ana Silva");
    let mut items = VisitItemStore::new();
    items.add_from_upload("foto1.jpg", jpeg_bytes(64, 48));

    let report = export::generate_report(
        &header,
        &items,
        &BrandingAssets::default(),
        &ReportOptions::default(),
        Some(dir.path()),
    )
    .expect("PDF生成に失敗");

    let today = Local::now().date_naive().format("%Y%m%d").to_string();
    let expected = dir
        .path()
        .join("Relatorios")
        .join(format!("Relatorio_Visita_Ana_Silva_{}.pdf", today));

    assert_eq!(report.path, expected);
    assert!(expected.exists(), "PDFファイルが作成されていない");

    let on_disk = std::fs::read(&expected).unwrap();
    assert!(!on_disk.is_empty(), "PDFファイルが空");
    assert_eq!(on_disk, report.bytes);
    assert!(report.bytes.starts_with(b"%PDF"));
    assert!(report.warnings.is_empty());
    assert!(report.page_count >= 2);

    // 全体推奨事項は空なので出力しない
    let plan = build_report_plan(
        &header,
        &items,
        &BrandingAssets::default(),
        &ReportOptions::default(),
    );
    assert!(!plan.contains_text("General Recommendation"));
    assert!(plan.contains_text("Item 1"));
}

#[test]
fn test_corrupt_item_yields_placeholder() {
    let header = create_header("Ana Silva");
    let mut items = VisitItemStore::new();
    items.add_from_upload("ok1.jpg", jpeg_bytes(32, 32));
    items.add_from_upload("broken.jpg", b"\xff\xd8\xff garbage".to_vec());
    items.add_from_upload("ok2.jpg", jpeg_bytes(32, 24));

    let plan = build_report_plan(
        &header,
        &items,
        &BrandingAssets::default(),
        &ReportOptions::default(),
    );

    for n in 1..=3 {
        assert!(plan.contains_text(&format!("Item {}", n)), "Item {} がない", n);
    }
    assert!(plan.contains_text("(Image could not be processed:"));
    assert_eq!(plan.image_count(), 2);
    assert!(matches!(
        plan.warnings.as_slice(),
        [ReportWarning::ItemImage { item: 2, .. }]
    ));

    // 描画も失敗しない
    let assembled = export::assemble_report(
        &header,
        &items,
        &BrandingAssets::default(),
        &ReportOptions::default(),
    )
    .expect("PDF組み立てに失敗");
    assert!(assembled.bytes.starts_with(b"%PDF"));
    assert_eq!(assembled.warnings.len(), 1);
}

#[test]
fn test_cover_values() {
    let plan = build_report_plan(
        &create_header("Ana Silva"),
        &VisitItemStore::new(),
        &BrandingAssets::default(),
        &ReportOptions::default(),
    );
    assert!(plan.contains_text("12.50 ha"));
    assert!(plan.contains_text("15/01/2025"));
}

#[test]
fn test_categories_rendered_in_stable_order() {
    let mut items = VisitItemStore::new();
    let a = items.add_from_upload("a.jpg", jpeg_bytes(16, 16));
    let b = items.add_from_camera(jpeg_bytes(16, 16));
    items.set_categories(b, [Category::Highlight, Category::Pest]).unwrap();
    items.set_notes(a, "Sigatoka negra nas folhas baixas").unwrap();
    items.set_recommendations(a, "Desfolha sanitária").unwrap();

    let plan = build_report_plan(
        &create_header("Ana"),
        &items,
        &BrandingAssets::default(),
        &ReportOptions::default(),
    );
    assert!(plan.contains_text("(no category)"));
    assert!(plan.contains_text("Pest, Highlight"));
    assert!(plan.contains_text("Sigatoka negra nas folhas baixas"));
    assert!(plan.contains_text("Desfolha sanitária"));
}

#[test]
fn test_full_report_with_branding() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut header = create_header("José Ñuñez/Test");
    header.general_recommendation = "Manter monitoramento semanal.\nAjustar adubação.".to_string();

    let mut items = VisitItemStore::new();
    for i in 0..4 {
        let idx = items.add_from_upload(format!("f{}.jpg", i), jpeg_bytes(80, 60));
        items.set_plot(idx, "Talhão A").unwrap();
        items.set_notes(idx, "Observação longa ".repeat(30)).unwrap();
    }

    let branding = BrandingAssets::default()
        .with_logo(jpeg_bytes(120, 40))
        .with_signature(jpeg_bytes(100, 30));

    let report = export::generate_report(
        &header,
        &items,
        &branding,
        &ReportOptions::default(),
        Some(dir.path()),
    )
    .expect("PDF生成に失敗");

    assert!(report.warnings.is_empty());
    assert!(report.page_count > 2);
    let name = report.path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("Relatorio_Visita_Jose_Nunez_Test_"));
}

#[test]
fn test_empty_store() {
    let result = export::assemble_report(
        &create_header(""),
        &VisitItemStore::new(),
        &BrandingAssets::default(),
        &ReportOptions::default(),
    );
    // アイテムなしでも表紙とヘッダは出力される
    let report = result.expect("空のPDF生成に失敗");
    assert_eq!(report.page_count, 2);
}

#[test]
fn test_negative_area_is_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut header = create_header("Ana");
    header.area_ha = -1.0;

    let result = export::generate_report(
        &header,
        &VisitItemStore::new(),
        &BrandingAssets::default(),
        &ReportOptions::default(),
        Some(dir.path()),
    );
    assert!(result.is_err());
    assert!(!dir.path().join("Relatorios").exists());
}

#[test]
fn test_unsupported_characters_are_reported() {
    let mut items = VisitItemStore::new();
    let idx = items.add_from_upload("foto.jpg", jpeg_bytes(32, 24));
    items.set_notes(idx, "Praga identificada 🐛").unwrap();

    let report = export::assemble_report(
        &create_header("Ana Silva"),
        &items,
        &BrandingAssets::default(),
        &ReportOptions::default(),
    )
    .expect("PDF生成に失敗");

    assert_eq!(
        report.warnings,
        vec![ReportWarning::UnsupportedCharacters(vec!['🐛'])]
    );
    assert!(report.bytes.starts_with(b"%PDF"));
}
