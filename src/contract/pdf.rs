//! Fixed-coordinate PDF page builder.
//!
//! Builds a single A4 page from absolute-positioned text runs and rules,
//! using the built-in Helvetica fonts so no font files are embedded. The
//! coordinate system is top-left millimetres, matching how the contract
//! template is specified; conversion to bottom-left PDF points happens here.
//!
//! Output is fully deterministic: object ids are assigned sequentially and
//! the only date written is the one handed in by the caller.

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat};

use super::common::encode_win_ansi;
use super::AssembleError;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

const PAGE_WIDTH_PT: f32 = 595.276;
const PAGE_HEIGHT_PT: f32 = 841.89;

/// Helvetica advance widths for the printable ASCII range (32..=126),
/// in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722, 722,
    667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222,
    500, 222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334,
    584,
];

/// Helvetica-Bold advance widths for the same range.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, 975, 722, 722, 722, 722, 667,
    611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556,
    278, 889, 611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Accented Latin-1 glyphs cluster around the lowercase advance.
const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

impl Face {
    fn resource(&self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }

    fn width_of(&self, byte: u8) -> u16 {
        let table = match self {
            Face::Regular => &HELVETICA_WIDTHS,
            Face::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        if (32..127).contains(&byte) {
            table[(byte - 32) as usize]
        } else {
            FALLBACK_WIDTH
        }
    }
}

/// Accumulates draw operations for one page.
pub struct PageBuilder {
    operations: Vec<Operation>,
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PageBuilder {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    fn mm_to_pt(mm: f32) -> f32 {
        mm * 72.0 / 25.4
    }

    fn pt_to_mm(pt: f32) -> f32 {
        pt * 25.4 / 72.0
    }

    /// Width of `text` at `size` points, in millimetres.
    pub fn text_width_mm(text: &str, size: f32, face: Face) -> f32 {
        let units: u32 = encode_win_ansi(text)
            .iter()
            .map(|b| face.width_of(*b) as u32)
            .sum();
        Self::pt_to_mm(units as f32 / 1000.0 * size)
    }

    /// Place a text run with its baseline origin at (`x_mm`, `y_mm`) from the
    /// top-left corner of the page.
    pub fn text(&mut self, x_mm: f32, y_mm: f32, size: f32, face: Face, text: &str) {
        let x = Self::mm_to_pt(x_mm);
        let y = Self::mm_to_pt(PAGE_HEIGHT_MM - y_mm);

        self.operations.push(Operation::new("BT", vec![]));
        self.operations.push(Operation::new(
            "Tf",
            vec![face.resource().into(), Object::Real(size)],
        ));
        self.operations
            .push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
        self.operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                encode_win_ansi(text),
                StringFormat::Literal,
            )],
        ));
        self.operations.push(Operation::new("ET", vec![]));
    }

    /// Place a text run horizontally centered on `cx_mm`.
    pub fn text_centered(&mut self, cx_mm: f32, y_mm: f32, size: f32, face: Face, text: &str) {
        let x_mm = cx_mm - Self::text_width_mm(text, size, face) / 2.0;
        self.text(x_mm, y_mm, size, face, text);
    }

    /// Stroke a straight rule between two top-left-mm points. `gray` is the
    /// stroke level in 0..=255.
    pub fn line(&mut self, x1_mm: f32, y1_mm: f32, x2_mm: f32, y2_mm: f32, gray: u8) {
        let level = gray as f32 / 255.0;
        self.operations.push(Operation::new(
            "RG",
            vec![
                Object::Real(level),
                Object::Real(level),
                Object::Real(level),
            ],
        ));
        self.operations
            .push(Operation::new("w", vec![Object::Real(0.7)]));
        self.operations.push(Operation::new(
            "m",
            vec![
                Object::Real(Self::mm_to_pt(x1_mm)),
                Object::Real(Self::mm_to_pt(PAGE_HEIGHT_MM - y1_mm)),
            ],
        ));
        self.operations.push(Operation::new(
            "l",
            vec![
                Object::Real(Self::mm_to_pt(x2_mm)),
                Object::Real(Self::mm_to_pt(PAGE_HEIGHT_MM - y2_mm)),
            ],
        ));
        self.operations.push(Operation::new("S", vec![]));
    }

    /// Assemble the accumulated page into a serialized PDF.
    pub fn into_document(self, creation_date: NaiveDate) -> Result<Vec<u8>, AssembleError> {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let font_regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let font_bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_regular_id,
                "F2" => font_bold_id,
            },
        });

        let content = Content {
            operations: self.operations,
        };
        let encoded = content
            .encode()
            .map_err(|e| AssembleError::Render(e.to_string()))?;
        let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(PAGE_WIDTH_PT),
                Object::Real(PAGE_HEIGHT_PT),
            ],
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::string_literal("rastreamento-server"),
            "CreationDate" => Object::string_literal(
                format!("D:{}", creation_date.format("%Y%m%d"))
            ),
        });

        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| AssembleError::Render(e.to_string()))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_text_is_offset_by_half_its_width() {
        let width = PageBuilder::text_width_mm("AA", 10.0, Face::Regular);
        assert!(width > 0.0);

        let mut centered = PageBuilder::new();
        centered.text_centered(105.0, 20.0, 10.0, Face::Regular, "AA");
        let mut manual = PageBuilder::new();
        manual.text(105.0 - width / 2.0, 20.0, 10.0, Face::Regular, "AA");

        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(
            centered.into_document(date).unwrap(),
            manual.into_document(date).unwrap()
        );
    }

    #[test]
    fn empty_page_serializes_to_a_pdf() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let bytes = PageBuilder::new().into_document(date).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }
}
