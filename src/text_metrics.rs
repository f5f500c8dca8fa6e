use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Width of a single line of text in pixels, using a system font that
/// matches `font_family`. `None` when no usable font could be found.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

/// Font-free estimate, used when fonts are unavailable or fast metrics are
/// requested.
pub fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars()
        .filter(|ch| *ch != '\n')
        .map(|ch| char_width_factor(ch) * font_size)
        .sum()
}

pub fn text_width(text: &str, font_size: f32, font_family: &str, fast: bool) -> f32 {
    if fast {
        return estimate_text_width(text, font_size);
    }
    measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| estimate_text_width(text, font_size))
}

fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.28,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.26,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' => 0.35,
        'm' | 'w' => 0.82,
        'M' | 'W' => 0.9,
        c if c.is_ascii_uppercase() => 0.66,
        c if c.is_ascii_digit() => 0.56,
        c if c.is_ascii() => 0.52,
        // CJK and other wide glyphs
        _ => 1.0,
    }
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = normalize_family_key(font_family);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(font_family);
            if face.is_none() {
                tracing::debug!(font_family, "no system font matched; using estimates");
            }
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get(&key)?.as_ref()?;
        Some(face.measure_width(&text.replace('\t', "    "), font_size))
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let names: Vec<String> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    Family::SansSerif
                }
                "monospace" | "ui-monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                _ => Family::Name(name.as_str()),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| FontFace::parse(data, index))
            .flatten()
    }
}

/// Advance widths pulled out of a parsed face, so the font bytes need not
/// outlive the lookup.
struct FontFace {
    units_per_em: f32,
    ascii_advances: [u16; 128],
    advances: HashMap<char, u16>,
}

impl FontFace {
    fn parse(data: &[u8], index: u32) -> Option<Self> {
        let face = Face::parse(data, index).ok()?;
        let advance = |ch: char| {
            face.glyph_index(ch)
                .and_then(|glyph| face.glyph_hor_advance(glyph))
                .unwrap_or(0)
        };
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            ascii_advances[byte as usize] = advance(byte as char);
        }
        // Latin-1 supplement and general punctuation cover most labels.
        let mut advances = HashMap::new();
        for ch in ('\u{00A0}'..='\u{024F}').chain('\u{2000}'..='\u{206F}') {
            let value = advance(ch);
            if value > 0 {
                advances.insert(ch, value);
            }
        }
        Some(Self {
            units_per_em: face.units_per_em().max(1) as f32,
            ascii_advances,
            advances,
        })
    }

    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = if ch.is_ascii() {
                self.ascii_advances[ch as usize]
            } else {
                self.advances.get(&ch).copied().unwrap_or(0)
            };
            if advance == 0 {
                width += char_width_factor(ch) * font_size;
            } else {
                width += advance as f32 * scale;
            }
        }
        width.max(0.0)
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_scales_with_font_size() {
        let small = estimate_text_width("Launch day", 10.0);
        let large = estimate_text_width("Launch day", 20.0);
        assert!((large - small * 2.0).abs() < 1e-3);
    }

    #[test]
    fn estimate_ignores_newlines() {
        assert_eq!(
            estimate_text_width("ab\n", 16.0),
            estimate_text_width("ab", 16.0)
        );
    }

    #[test]
    fn empty_text_has_zero_width() {
        assert_eq!(measure_text_width("", 14.0, "sans-serif"), Some(0.0));
        assert_eq!(text_width("", 14.0, "sans-serif", true), 0.0);
    }

    #[test]
    fn measured_width_is_positive_with_or_without_fonts() {
        let width = text_width("Timeline", 14.0, "sans-serif", false);
        assert!(width > 0.0);
    }
}
