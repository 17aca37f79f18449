//! 画像正規化モジュール
//!
//! 任意形式の画像バイト列をデコードし、PDFに埋め込める
//! ロスレスPNGの一時ファイルへ書き出す。一時ファイルは
//! `NormalizedImage` のドロップ時に削除される。

use crate::error::{Result, VisitReportError};
use image::{ColorType, DynamicImage, ImageError, ImageFormat, RgbaImage};
use std::path::Path;
use tempfile::TempPath;

/// 正規化済み画像（一時PNGファイル）
#[derive(Debug)]
pub struct NormalizedImage {
    path: TempPath,
    width: u32,
    height: u32,
    color: ColorType,
}

impl NormalizedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Rgb8 / Rgba8 / L8 のいずれか
    pub fn color_type(&self) -> ColorType {
        self.color
    }

    /// 一時ファイルを読み戻してPDF埋め込み用のピクセル列にする
    pub fn to_raster(&self) -> Result<RasterImage> {
        let img = image::open(self.path()).map_err(decode_error)?;
        let (width, height) = (img.width(), img.height());

        let raster = match img {
            DynamicImage::ImageLuma8(gray) => RasterImage {
                width,
                height,
                color: RasterColor::Gray,
                pixels: gray.into_raw(),
            },
            DynamicImage::ImageRgba8(rgba) => RasterImage {
                width,
                height,
                color: RasterColor::Rgb,
                pixels: flatten_on_white(&rgba),
            },
            other => RasterImage {
                width,
                height,
                color: RasterColor::Rgb,
                pixels: other.to_rgb8().into_raw(),
            },
        };
        Ok(raster)
    }
}

/// PDFに渡す色空間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterColor {
    Rgb,
    Gray,
}

/// 8bit非圧縮ピクセル列
#[derive(Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub color: RasterColor,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// 高さ / 幅
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 {
            return 1.0;
        }
        self.height as f32 / self.width as f32
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("color", &self.color)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// 画像バイト列を正規化してPNG一時ファイルに保存
///
/// デコードできない場合は `ImageDecode` を返す。
pub fn normalize_image(bytes: &[u8]) -> Result<NormalizedImage> {
    if bytes.is_empty() {
        return Err(VisitReportError::ImageDecode("画像データが空です".into()));
    }

    let img = image::load_from_memory(bytes).map_err(decode_error)?;
    let img = match img.color() {
        ColorType::Rgb8 | ColorType::Rgba8 | ColorType::L8 => img,
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    };

    let path = tempfile::Builder::new()
        .prefix("visit-img-")
        .suffix(".png")
        .tempfile()?
        .into_temp_path();

    img.save_with_format(&path, ImageFormat::Png)
        .map_err(encode_error)?;

    tracing::debug!(path = %path.display(), width = img.width(), height = img.height(), "画像を正規化");

    Ok(NormalizedImage {
        width: img.width(),
        height: img.height(),
        color: img.color(),
        path,
    })
}

/// 正規化 → ピクセル読み戻し。一時ファイルはこの関数内で削除される
pub fn load_raster(bytes: &[u8]) -> Result<RasterImage> {
    let normalized = normalize_image(bytes)?;
    normalized.to_raster()
}

/// 透過部分を白背景で合成
fn flatten_on_white(rgba: &RgbaImage) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.width() as usize * rgba.height() as usize * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u16;
        for channel in [r, g, b] {
            let blended = (channel as u16 * alpha + 255 * (255 - alpha)) / 255;
            out.push(blended as u8);
        }
    }
    out
}

fn decode_error(e: ImageError) -> VisitReportError {
    VisitReportError::ImageDecode(e.to_string())
}

fn encode_error(e: ImageError) -> VisitReportError {
    match e {
        ImageError::IoError(io) => VisitReportError::Io(io),
        other => VisitReportError::ImageDecode(other.to_string()),
    }
}
