//! Paginated PDF rendition of the fixed receipt layout.
//!
//! One monospaced line per ticket line, paginated on a receipt-roll shaped
//! page. The PDF carries the same sections as the printed ticket, with the
//! verification payload in the clear.

use lopdf::{dictionary, Document, Object, Stream};

use super::Receipt;
use crate::core::FiscalError;

/// Page size in points: 80 mm roll width, A4-ish height.
const PAGE_WIDTH: i64 = 298;
const PAGE_HEIGHT: i64 = 820;
const LINES_PER_PAGE: usize = 60;
const FONT_SIZE: i64 = 9;
const LEADING: i64 = 12;
const MARGIN: i64 = 16;

/// Render a receipt's text into PDF bytes.
pub fn render_pdf(receipt: &Receipt) -> Result<Vec<u8>, FiscalError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => Object::Reference(font_id) },
    });

    let lines: Vec<&str> = receipt.text.lines().collect();
    let mut kids = Vec::new();

    for chunk in lines.chunks(LINES_PER_PAGE.max(1)) {
        let mut content = format!(
            "BT /F1 {FONT_SIZE} Tf {LEADING} TL {MARGIN} {} Td\n",
            PAGE_HEIGHT - MARGIN - LEADING
        );
        for line in chunk {
            content.push_str(&format!("({}) Tj T*\n", escape_pdf_text(line)));
        }
        content.push_str("ET");

        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| FiscalError::Render(format!("failed to save PDF: {e}")))?;
    Ok(out)
}

/// Escape the characters with meaning inside a PDF literal string.
fn escape_pdf_text(line: &str) -> String {
    let mut escaped = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\\' => escaped.push_str("\\\\"),
            c if c.is_ascii() => escaped.push(c),
            // Courier/WinAnsi has no glyphs beyond Latin-1; degrade politely.
            _ => escaped.push('?'),
        }
    }
    escaped
}
