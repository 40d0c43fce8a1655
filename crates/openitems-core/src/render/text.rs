use super::DocumentRenderer;
use crate::document::{Document, Table};
use crate::error::RenderError;
use std::fmt::Write;

/// Plain-text rendering with aligned table columns, for console previews.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl DocumentRenderer for TextRenderer {
    fn render(&self, document: &Document) -> Result<String, RenderError> {
        let mut out = String::new();

        writeln!(out, "{}", document.title)?;
        writeln!(out, "{}", "=".repeat(document.title.chars().count()))?;
        writeln!(out)?;
        for paragraph in &document.header {
            writeln!(out, "{}", paragraph.plain_text())?;
        }

        for section in &document.sections {
            writeln!(out)?;
            writeln!(out, "{}", section.title)?;
            writeln!(out, "{}", "-".repeat(section.title.chars().count()))?;
            for line in &section.summary {
                writeln!(out, "{}: {}", line.label, line.value)?;
            }
            if let Some(table) = &section.table {
                writeln!(out)?;
                write_table(&mut out, table)?;
            }
        }

        writeln!(out)?;
        writeln!(out, "{}", document.footer)?;
        Ok(out)
    }
}

fn write_table(out: &mut String, table: &Table) -> std::fmt::Result {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    write_row(out, &table.headers, &widths)?;
    for row in &table.rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) -> std::fmt::Result {
    let mut line = String::from(" ");
    for (cell, &width) in cells.iter().zip(widths) {
        write!(line, " {cell:<width$} ")?;
    }
    writeln!(out, "{}", line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Paragraph, Section, SummaryLine};

    #[test]
    fn test_text_layout() {
        let doc = Document {
            title: "Report".to_string(),
            date: "01/01/2024".to_string(),
            header: vec![Paragraph::new().text("Hello ").strong("world")],
            sections: vec![Section {
                title: "OPEN".to_string(),
                summary: vec![SummaryLine {
                    label: "Valor Total".to_string(),
                    value: "R$ 350,00".to_string(),
                }],
                table: Some(Table {
                    headers: vec!["Tipo".to_string(), "Valor".to_string()],
                    rows: vec![
                        vec!["PIX".to_string(), "R$ 150,00".to_string()],
                        vec!["BOLETO".to_string(), "R$ 200,00".to_string()],
                    ],
                }),
            }],
            footer: "bye".to_string(),
        };

        let text = TextRenderer.render(&doc).unwrap();
        let expected = "\
Report
======

Hello world

OPEN
----
Valor Total: R$ 350,00

  Tipo    Valor
  PIX     R$ 150,00
  BOLETO  R$ 200,00

bye
";
        assert_eq!(text, expected);
    }
}
