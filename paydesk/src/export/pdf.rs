//! Minimal PDF 1.4 writer
//!
//! Draws with the standard Helvetica faces (WinAnsi encoding) plus filled
//! and stroked rectangles. Text widths are estimated per glyph class, which
//! is close enough for wrapping table cells and centring the footer.

use std::path::{Path, PathBuf};

use super::document::{DocTable, RequestDocument};
use super::{ExportResult, write_file};

const MM: f32 = 72.0 / 25.4;

/// A4 portrait, in points
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

const MARGIN: f32 = 20.0 * MM;
const HEADER_HEIGHT: f32 = 50.0 * MM;
/// Content never goes below this distance from the top
const CONTENT_LIMIT: f32 = PAGE_HEIGHT - 20.0 * MM;
const CELL_PADDING: f32 = 4.0;
const CELL_FONT_SIZE: f32 = 10.0;
const CELL_LEADING: f32 = 12.0;

/// Header band and table head colour
pub const BRAND: Rgb = Rgb(111, 182, 173);
const WHITE: Rgb = Rgb(255, 255, 255);
const BLACK: Rgb = Rgb(0, 0, 0);
const GRAY: Rgb = Rgb(128, 128, 128);
const GRID: Rgb = Rgb(200, 200, 200);

/// Heading printed in the header band of every document
pub const DOCUMENT_HEADING: &str = "Payment Request System";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn components(&self) -> String {
        format!(
            "{:.3} {:.3} {:.3}",
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Approximate Helvetica advance width of one glyph, in em
fn glyph_width(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '.' | ',' | '\'' | '|' | '!' | ':' | ';' | 'I' => 0.25,
        ' ' | 'f' | 't' | 'r' | '(' | ')' | '-' | '/' => 0.33,
        'm' | 'w' | 'M' | 'W' | '@' => 0.85,
        'A'..='Z' => 0.68,
        _ => 0.556,
    }
}

pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(glyph_width).sum::<f32>() * size
}

/// Greedy word wrap; words wider than the line are split. Always at least one line.
pub fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if text_width(&candidate, size) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for c in word.chars() {
                if !line.is_empty() && text_width(&format!("{line}{c}"), size) > max_width {
                    lines.push(std::mem::take(&mut line));
                }
                line.push(c);
            }
        }
        lines.push(line);
    }
    lines
}

/// PDF string literal body: escapes delimiters, Latin-1 as octal, the rest as `?`
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => out.push('?'),
        }
    }
    out
}

fn text_op(x: f32, baseline: f32, size: f32, font: Font, color: Rgb, text: &str) -> String {
    format!(
        "BT /{} {:.1} Tf {} rg {:.2} {:.2} Td ({}) Tj ET\n",
        font.resource(),
        size,
        color.components(),
        x,
        PAGE_HEIGHT - baseline,
        escape(text)
    )
}

/// Page-flowing writer; `y` grows downwards from the top edge
#[derive(Debug)]
pub struct PdfWriter {
    title: String,
    finished: Vec<String>,
    current: String,
    y: f32,
}

impl PdfWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            finished: Vec::new(),
            current: String::new(),
            y: MARGIN,
        }
    }

    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    pub fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.y = MARGIN;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y + height > CONTENT_LIMIT {
            self.new_page();
        }
    }

    pub fn space(&mut self, height: f32) {
        self.y += height;
    }

    pub fn fill_rect(&mut self, x: f32, top: f32, width: f32, height: f32, color: Rgb) {
        self.current.push_str(&format!(
            "{} rg {:.2} {:.2} {:.2} {:.2} re f\n",
            color.components(),
            x,
            PAGE_HEIGHT - top - height,
            width,
            height
        ));
    }

    pub fn stroke_rect(&mut self, x: f32, top: f32, width: f32, height: f32, color: Rgb) {
        self.current.push_str(&format!(
            "{} RG 0.5 w {:.2} {:.2} {:.2} {:.2} re S\n",
            color.components(),
            x,
            PAGE_HEIGHT - top - height,
            width,
            height
        ));
    }

    /// Single line with its baseline `baseline` points below the top edge
    pub fn text_at(&mut self, x: f32, baseline: f32, size: f32, font: Font, color: Rgb, text: &str) {
        self.current
            .push_str(&text_op(x, baseline, size, font, color, text));
    }

    /// Coloured band across the top of the page with heading and title
    pub fn header_band(&mut self, heading: &str, title: &str) {
        self.fill_rect(0.0, 0.0, PAGE_WIDTH, HEADER_HEIGHT, BRAND);
        self.text_at(MARGIN, 20.0 * MM, 16.0, Font::Bold, WHITE, heading);
        self.text_at(MARGIN, 35.0 * MM, 14.0, Font::Regular, WHITE, title);
        self.y = HEADER_HEIGHT + 10.0 * MM;
    }

    /// Wrapped text, one baseline every `leading` points
    pub fn paragraph(&mut self, text: &str, size: f32, font: Font, leading: f32) {
        for line in wrap(text, size, PAGE_WIDTH - 2.0 * MARGIN) {
            self.ensure_space(leading);
            let baseline = self.y + size;
            self.text_at(MARGIN, baseline, size, font, BLACK, &line);
            self.y += leading;
        }
    }

    fn table_row(&mut self, cells: &[Vec<String>], widths: &[f32], height: f32, head: bool) {
        let top = self.y;
        let mut x = MARGIN;
        for (lines, width) in cells.iter().zip(widths) {
            if head {
                self.fill_rect(x, top, *width, height, BRAND);
            }
            self.stroke_rect(x, top, *width, height, GRID);
            let (font, color) = if head {
                (Font::Bold, WHITE)
            } else {
                (Font::Regular, BLACK)
            };
            for (i, line) in lines.iter().enumerate() {
                let baseline = top + CELL_PADDING + CELL_FONT_SIZE + i as f32 * CELL_LEADING;
                self.text_at(x + CELL_PADDING, baseline, CELL_FONT_SIZE, font, color, line);
            }
            x += width;
        }
        self.y += height;
    }

    /// Grid table; the head row repeats after a page break
    pub fn table(&mut self, table: &DocTable) {
        let usable = PAGE_WIDTH - 2.0 * MARGIN;
        let weight: f32 = table.widths.iter().sum::<f32>().max(f32::EPSILON);
        let widths: Vec<f32> = table.widths.iter().map(|w| w / weight * usable).collect();

        let layout = |cells: &[String]| -> (Vec<Vec<String>>, f32) {
            let wrapped: Vec<Vec<String>> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| wrap(cell, CELL_FONT_SIZE, width - 2.0 * CELL_PADDING))
                .collect();
            let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1);
            (wrapped, lines as f32 * CELL_LEADING + 2.0 * CELL_PADDING)
        };

        let (head, head_height) = layout(&table.head);
        self.ensure_space(head_height);
        self.table_row(&head, &widths, head_height, true);
        for row in &table.rows {
            let (cells, height) = layout(row);
            if self.y + height > CONTENT_LIMIT {
                self.new_page();
                self.table_row(&head, &widths, head_height, true);
            }
            self.table_row(&cells, &widths, height, false);
        }
    }

    /// Stamp `Page i of n` on every page and serialize
    pub fn finish(mut self) -> Vec<u8> {
        self.finished.push(std::mem::take(&mut self.current));
        let total = self.finished.len();
        let mut pages = std::mem::take(&mut self.finished);
        for (i, content) in pages.iter_mut().enumerate() {
            let label = format!("Page {} of {}", i + 1, total);
            let x = (PAGE_WIDTH - text_width(&label, 10.0)) / 2.0;
            content.push_str(&text_op(x, PAGE_HEIGHT - 10.0 * MM, 10.0, Font::Regular, GRAY, &label));
        }
        serialize(&self.title, &pages)
    }
}

fn push_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, body: &str) {
    offsets.push(out.len());
    let id = offsets.len();
    out.extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
}

/// Objects: 1 catalog, 2 page tree, 3-4 fonts, 5 info, then page/content pairs
fn serialize(title: &str, pages: &[String]) -> Vec<u8> {
    let page_id = |k: usize| 6 + 2 * k;
    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    push_object(&mut out, &mut offsets, "<< /Type /Catalog /Pages 2 0 R >>");
    let kids: Vec<String> = (0..pages.len()).map(|k| format!("{} 0 R", page_id(k))).collect();
    push_object(
        &mut out,
        &mut offsets,
        &format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), pages.len()),
    );
    for base in ["Helvetica", "Helvetica-Bold"] {
        push_object(
            &mut out,
            &mut offsets,
            &format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>"),
        );
    }
    push_object(
        &mut out,
        &mut offsets,
        &format!("<< /Title ({}) /Producer (paydesk) >>", escape(title)),
    );
    for (k, content) in pages.iter().enumerate() {
        push_object(
            &mut out,
            &mut offsets,
            &format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                page_id(k) + 1
            ),
        );
        push_object(
            &mut out,
            &mut offsets,
            &format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
        );
    }

    let xref_at = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
    for offset in &offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{}\n%%EOF\n",
        offsets.len() + 1,
        xref_at
    ));
    out.extend_from_slice(xref.as_bytes());
    out
}

/// Lay out a request document
pub fn render_request(doc: &RequestDocument) -> Vec<u8> {
    let mut pdf = PdfWriter::new(&doc.title);
    pdf.header_band(DOCUMENT_HEADING, &doc.title);

    for (label, value) in &doc.fields {
        pdf.paragraph(&format!("{label}: {value}"), 12.0, Font::Regular, 10.0 * MM);
    }
    pdf.space(5.0 * MM);

    if let Some(table) = &doc.table {
        pdf.table(table);
        pdf.space(10.0 * MM);
    }
    if let Some(description) = &doc.description {
        pdf.paragraph("Description:", 12.0, Font::Bold, 7.0 * MM);
        pdf.paragraph(description, 12.0, Font::Regular, 7.0 * MM);
        pdf.space(10.0 * MM);
    }
    pdf.paragraph(&doc.total_line, 14.0, Font::Bold, 10.0 * MM);

    if !doc.notes.trim().is_empty() {
        pdf.space(5.0 * MM);
        pdf.paragraph(doc.notes_heading, 12.0, Font::Regular, 7.0 * MM);
        pdf.paragraph(&doc.notes, 12.0, Font::Regular, 7.0 * MM);
    }

    let pages = pdf.page_count();
    let bytes = pdf.finish();
    tracing::debug!(file = %doc.file_name, pages, bytes = bytes.len(), "PDF rendered");
    bytes
}

/// Render and save under `dir` with the document's file name
pub fn write_request_pdf(doc: &RequestDocument, dir: &Path) -> ExportResult<PathBuf> {
    write_file(dir, &doc.file_name, &render_request(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::TemplateForm;

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn tools_doc(rows: usize) -> RequestDocument {
        let items: Vec<String> = (0..rows)
            .map(|i| format!(r#"{{"toolName":"Tool {i}","toolCategory":"SEO","paymentFrequency":"monthly","amount":229}}"#))
            .collect();
        let json = format!(r#"{{"type":"tools","items":[{}]}}"#, items.join(","));
        RequestDocument::from_form(&TemplateForm::from_json(&json).unwrap())
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a(b)\\c"), "a\\(b\\)\\\\c");
        assert_eq!(escape("café"), "caf\\351");
        assert_eq!(escape("€5"), "?5");
    }

    #[test]
    fn test_wrap() {
        let lines = wrap("alpha beta gamma delta", 10.0, 60.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| text_width(l, 10.0) <= 60.0));
        assert_eq!(wrap("", 10.0, 60.0), vec![String::new()]);
        assert_eq!(wrap("a\nb", 10.0, 60.0), vec!["a", "b"]);
        let long = wrap(&"x".repeat(40), 10.0, 50.0);
        assert!(long.len() > 1);
        assert_eq!(long.concat(), "x".repeat(40));
    }

    #[test]
    fn test_single_page_document() {
        let bytes = render_request(&tools_doc(1));
        let text = as_text(&bytes);
        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("(Payment Request System) Tj"));
        assert!(text.contains("(Tools & Software Request) Tj"));
        assert!(text.contains("(Total Amount: USD 229.00) Tj"));
        assert!(text.contains("(Page 1 of 1) Tj"));
        assert!(text.contains("/Count 1"));
    }

    #[test]
    fn test_long_table_breaks_pages() {
        let bytes = render_request(&tools_doc(60));
        let text = as_text(&bytes);
        assert!(text.contains("(Page 2 of 3)") || text.contains("(Page 2 of 2)"));
        assert!(!text.contains("/Count 1 "));
        assert!(text.contains("(Tool 59) Tj"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = render_request(&tools_doc(3));
        let text = as_text(&bytes);
        let start: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        // Offsets are byte positions; the binary marker line is not UTF-8
        let xref = as_text(&bytes[start..]);
        assert!(xref.starts_with("xref\n"));

        let entries: Vec<&str> = xref.lines().skip(3).take_while(|l| l.ends_with(" n ")).collect();
        assert!(entries.len() >= 7);
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            assert!(
                bytes[offset..].starts_with(format!("{} 0 obj", i + 1).as_bytes()),
                "object {} misplaced",
                i + 1
            );
        }
    }

    #[test]
    fn test_write_request_pdf() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_request_pdf(&tools_doc(1), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "tools-tool-0.pdf");
        assert!(std::fs::read(path).unwrap().starts_with(b"%PDF-1.4"));
    }
}
