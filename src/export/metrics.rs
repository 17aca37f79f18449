//! 組み込みHelveticaの文字幅と折り返し
//!
//! 幅はAFMの値（1000分率）。ASCII外の文字は数字幅で近似する。

use visit_report_common::layout::{pt_to_mm, FontStyle};

/// Helvetica: ' ' (0x20) 〜 '~' (0x7E)
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold: ' ' (0x20) 〜 '~' (0x7E)
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

const FALLBACK_WIDTH: u16 = 556;

fn char_width(c: char, font: FontStyle) -> u16 {
    let table = match font {
        FontStyle::Bold => &HELVETICA_BOLD_WIDTHS,
        // Obliqueは Regular と同じ幅
        FontStyle::Regular | FontStyle::Italic => &HELVETICA_WIDTHS,
    };
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// 0x80〜0x9F に割り当てられたWinAnsi文字
const WINANSI_EXTRA: &[char] = &[
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•',
    '–', '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// 組み込みフォントの置換文字
pub const REPLACEMENT_CHAR: char = '?';

/// 組み込みフォント（WinAnsiEncoding）で表現できる文字か
pub fn is_winansi(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF) || WINANSI_EXTRA.contains(&c)
}

/// 表現できない文字を `?` に置換する。置換した文字も返す
pub fn to_winansi(text: &str) -> (String, Vec<char>) {
    let mut replaced = Vec::new();
    let encoded = text
        .chars()
        .map(|c| {
            if is_winansi(c) {
                c
            } else {
                replaced.push(c);
                REPLACEMENT_CHAR
            }
        })
        .collect();
    (encoded, replaced)
}

/// 文字列の描画幅（mm）
pub fn text_width_mm(text: &str, size_pt: f32, font: FontStyle) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c, font) as u32).sum();
    pt_to_mm(units as f32 * size_pt / 1000.0)
}

/// 幅に収まるよう単語単位で折り返す
///
/// 改行は段落区切りとして保持し、空段落は空行になる。
/// 1単語が幅を超える場合は文字単位で分割する。
pub fn wrap_text(text: &str, width_mm: f32, size_pt: f32, font: FontStyle) -> Vec<String> {
    let fits = |s: &str| text_width_mm(s, size_pt, font) <= width_mm;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if fits(word) {
                current = word.to_string();
                continue;
            }

            for ch in word.chars() {
                let mut next = current.clone();
                next.push(ch);
                if !current.is_empty() && !fits(&next) {
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                } else {
                    current = next;
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
