use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::error::{AppError, Result};

/// Receives materialized report rows and turns them into a downloadable file.
pub trait ReportSink: Send + Sync {
    fn render(&self, header: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>>;

    fn content_type(&self) -> &'static str;

    fn file_name(&self) -> &'static str;
}

fn check_shape(header: &[&str], rows: &[Vec<String>], columns: usize) -> Result<()> {
    if header.len() != columns {
        return Err(AppError::InternalError(format!(
            "report header has {} columns, layout has {}",
            header.len(),
            columns
        )));
    }

    if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != columns) {
        return Err(AppError::InternalError(format!(
            "report row {} has {} columns, layout has {}",
            index,
            row.len(),
            columns
        )));
    }

    Ok(())
}

/// Splits `cell` into lines of at most `max_chars` characters.
/// Joining the lines gives back the cell unchanged.
pub fn wrap_cell(cell: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let chars: Vec<char> = cell.chars().collect();

    if chars.is_empty() {
        return vec![String::new()];
    }

    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Plain-text table. Configured widths are minimums; a column grows to fit
/// its widest cell.
#[derive(Debug, Clone)]
pub struct FixedWidthTable {
    title: String,
    widths: Vec<usize>,
}

impl FixedWidthTable {
    pub fn new(title: impl Into<String>, widths: &[usize]) -> Self {
        Self {
            title: title.into(),
            widths: widths.to_vec(),
        }
    }

    fn column_widths(&self, header: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
        self.widths
            .iter()
            .enumerate()
            .map(|(column, configured)| {
                rows.iter()
                    .map(|row| row[column].chars().count())
                    .chain(std::iter::once(header[column].chars().count()))
                    .fold(*configured, usize::max)
            })
            .collect()
    }
}

fn separator(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn text_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let cell = cell.as_ref();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(width - cell.chars().count()));
        line.push_str(" |");
    }
    line
}

impl ReportSink for FixedWidthTable {
    fn render(&self, header: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>> {
        check_shape(header, rows, self.widths.len())?;

        let widths = self.column_widths(header, rows);
        let separator = separator(&widths);

        let mut out = Vec::with_capacity(rows.len() + 5);
        out.push(self.title.clone());
        out.push(separator.clone());
        out.push(text_line(header, &widths));
        out.push(separator.clone());
        for row in rows {
            out.push(text_line(row.as_slice(), &widths));
        }
        out.push(separator);

        let mut text = out.join("\n");
        text.push('\n');
        Ok(text.into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_name(&self) -> &'static str {
        "products.txt"
    }
}

// A2 portrait
const PAGE_WIDTH_MM: f32 = 420.0;
const PAGE_HEIGHT_MM: f32 = 594.0;
const MARGIN_MM: f32 = 10.0;
const TITLE_SIZE_PT: f32 = 16.0;
const TITLE_BLOCK_MM: f32 = 14.0;
const TEXT_SIZE_PT: f32 = 9.0;
const LINE_HEIGHT_MM: f32 = 4.5;
const ROW_GAP_MM: f32 = 2.0;
const CELL_PADDING_MM: f32 = 1.5;
/// Upper bound for an upper-case Helvetica glyph at `TEXT_SIZE_PT`.
const CHAR_WIDTH_MM: f32 = 2.3;

/// PDF table with fixed column widths in millimetres. Long cells wrap onto
/// extra lines; rows that do not fit start a new page with the header repeated.
#[derive(Debug, Clone)]
pub struct PdfTable {
    title: String,
    widths_mm: Vec<f32>,
}

impl PdfTable {
    pub fn new(title: impl Into<String>, widths_mm: &[f32]) -> Self {
        Self {
            title: title.into(),
            widths_mm: widths_mm.to_vec(),
        }
    }

    /// Characters that fit on one line of a column.
    pub fn chars_per_line(width_mm: f32) -> usize {
        (((width_mm - 2.0 * CELL_PADDING_MM) / CHAR_WIDTH_MM).floor() as usize).max(1)
    }

    /// One entry per cell, each holding that cell's wrapped lines.
    pub fn wrap_row<S: AsRef<str>>(&self, cells: &[S]) -> Vec<Vec<String>> {
        cells
            .iter()
            .zip(&self.widths_mm)
            .map(|(cell, width)| wrap_cell(cell.as_ref(), Self::chars_per_line(*width)))
            .collect()
    }

    fn draw_row(
        &self,
        layer: &PdfLayerReference,
        cells: &[Vec<String>],
        top: f32,
        font: &IndirectFontRef,
    ) -> f32 {
        let mut x = MARGIN_MM;
        for (lines, width) in cells.iter().zip(&self.widths_mm) {
            for (index, line) in lines.iter().enumerate() {
                let baseline = top - LINE_HEIGHT_MM * (index as f32 + 1.0);
                layer.use_text(
                    line.clone(),
                    TEXT_SIZE_PT,
                    Mm(x + CELL_PADDING_MM),
                    Mm(baseline),
                    font,
                );
            }
            x += width;
        }
        top - row_height(cells)
    }
}

fn row_height(cells: &[Vec<String>]) -> f32 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    lines as f32 * LINE_HEIGHT_MM + ROW_GAP_MM
}

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalError(format!("PDF rendering failed: {}", e))
}

impl ReportSink for PdfTable {
    fn render(&self, header: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>> {
        check_shape(header, rows, self.widths_mm.len())?;

        let (doc, page, layer) = PdfDocument::new(
            self.title.clone(),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1".to_string(),
        );
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;

        let mut layer = doc.get_page(page).get_layer(layer);
        let mut top = PAGE_HEIGHT_MM - MARGIN_MM;

        layer.use_text(
            self.title.clone(),
            TITLE_SIZE_PT,
            Mm(MARGIN_MM),
            Mm(top - TITLE_BLOCK_MM / 2.0),
            &bold,
        );
        top -= TITLE_BLOCK_MM;

        let header_cells = self.wrap_row(header);
        top = self.draw_row(&layer, &header_cells, top, &bold);

        for row in rows {
            let cells = self.wrap_row(row.as_slice());

            if top - row_height(&cells) < MARGIN_MM {
                let (page, page_layer) = doc.add_page(
                    Mm(PAGE_WIDTH_MM),
                    Mm(PAGE_HEIGHT_MM),
                    "Layer 1".to_string(),
                );
                layer = doc.get_page(page).get_layer(page_layer);
                top = self.draw_row(&layer, &header_cells, PAGE_HEIGHT_MM - MARGIN_MM, &bold);
            }

            top = self.draw_row(&layer, &cells, top, &regular);
        }

        doc.save_to_bytes().map_err(pdf_error)
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn file_name(&self) -> &'static str {
        "output.pdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_columns_grow_to_fit_long_cells() {
        let table = FixedWidthTable::new("Report", &[4, 6]);
        let rows = vec![
            vec!["P1".to_string(), "Lamp".to_string()],
            vec![
                "PROD-202401-ELECTRONICS-029".to_string(),
                "Ergonomic Standing Desk Walnut Edition".to_string(),
            ],
        ];

        let rendered = String::from_utf8(table.render(&["Ref", "Name"], &rows).unwrap()).unwrap();
        let lines: Vec<&str> = rendered.lines().skip(1).collect();

        assert!(lines.iter().all(|line| line.chars().count() == lines[0].chars().count()));
        assert!(rendered.contains("| PROD-202401-ELECTRONICS-029 | Ergonomic Standing Desk Walnut Edition |"));
        assert!(!rendered.contains('~'));
    }

    #[test]
    fn configured_width_is_a_minimum() {
        let table = FixedWidthTable::new("Report", &[4, 6]);
        let rows = vec![vec!["P1".to_string(), "Lamp".to_string()]];

        let rendered = String::from_utf8(table.render(&["Ref", "Name"], &rows).unwrap()).unwrap();

        assert!(rendered.contains("| Ref  | Name   |"));
        assert!(rendered.contains("| P1   | Lamp   |"));
    }

    #[test]
    fn mismatched_row_is_rejected() {
        let table = FixedWidthTable::new("Report", &[4, 6]);
        let rows = vec![vec!["only one".to_string()]];

        assert!(matches!(
            table.render(&["Ref", "Name"], &rows),
            Err(AppError::InternalError(_))
        ));
        assert!(matches!(
            PdfTable::new("Report", &[40.0, 40.0]).render(&["Ref", "Name"], &rows),
            Err(AppError::InternalError(_))
        ));
    }

    #[test]
    fn wrapping_keeps_every_character() {
        let cell = "PROD-202401-ELECTRONICS-029";
        let lines = wrap_cell(cell, 10);

        assert_eq!(lines, vec!["PROD-20240", "1-ELECTRON", "ICS-029"]);
        assert_eq!(lines.concat(), cell);
        assert_eq!(wrap_cell("", 10), vec![String::new()]);
        assert_eq!(wrap_cell("Café", 3).concat(), "Café");
    }

    #[test]
    fn pdf_cells_wrap_inside_their_column() {
        let table = PdfTable::new("Report", &[30.0, 60.0]);
        let reference = "PROD-202401-ELECTRONICS-029";

        let cells = table.wrap_row(&[reference, "Desk"]);

        assert!(cells[0].len() > 1);
        assert!(cells[0].iter().all(|line| line.chars().count() <= PdfTable::chars_per_line(30.0)));
        assert_eq!(cells[0].concat(), reference);
        assert_eq!(cells[1], vec!["Desk"]);
    }

    #[test]
    fn pdf_report_spans_pages() {
        let table = PdfTable::new("Products", &[45.0, 60.0]);
        let rows: Vec<Vec<String>> = (0..400)
            .map(|i| vec![format!("PROD-{:04}", i), "Standing desk".to_string()])
            .collect();

        let bytes = table.render(&["Product Reference", "Product Name"], &rows).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(table.content_type(), "application/pdf");
    }
}
