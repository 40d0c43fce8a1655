use super::DocumentRenderer;
use crate::document::Document;
use crate::error::RenderError;
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "report.html";
const TEMPLATE: &str = include_str!("../../templates/report.html");

/// HTML email body rendered with the bundled tera template.
///
/// All document text is HTML-escaped by tera's autoescaping.
pub struct HtmlRenderer {
    tera: Tera,
}

impl HtmlRenderer {
    /// Compile the bundled template.
    pub fn new() -> Result<Self, RenderError> {
        Self::from_template(TEMPLATE)
    }

    /// Compile a custom template. It receives the [`Document`] fields as
    /// top-level variables.
    pub fn from_template(template: &str) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, template)?;
        tera.autoescape_on(vec![".html"]);
        Ok(Self { tera })
    }
}

impl DocumentRenderer for HtmlRenderer {
    fn render(&self, document: &Document) -> Result<String, RenderError> {
        let context = Context::from_serialize(document)?;
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Paragraph, Section, SummaryLine, Table};

    fn document() -> Document {
        Document {
            title: "Relatório".to_string(),
            date: "07/05/2024".to_string(),
            header: vec![
                Paragraph::new().text("Prezados,"),
                Paragraph::new().text("Maior: ").strong("PIX & Cia"),
            ],
            sections: vec![
                Section {
                    title: "LANÇAMENTOS EM ABERTO".to_string(),
                    summary: vec![SummaryLine {
                        label: "Valor Total".to_string(),
                        value: "R$ 350,00".to_string(),
                    }],
                    table: Some(Table {
                        headers: vec!["Tipo".to_string(), "Valor Total".to_string()],
                        rows: vec![
                            vec!["PIX".to_string(), "R$ 150,00".to_string()],
                            vec!["<BOLETO>".to_string(), "R$ 200,00".to_string()],
                        ],
                    }),
                },
                Section {
                    title: "SEM TABELA".to_string(),
                    summary: Vec::new(),
                    table: None,
                },
            ],
            footer: "Este é um e-mail automático.".to_string(),
        }
    }

    #[test]
    fn test_renders_sections_and_tables() {
        let html = HtmlRenderer::new().unwrap().render(&document()).unwrap();
        assert!(html.contains("<h2>LANÇAMENTOS EM ABERTO</h2>"));
        assert!(html.contains("<h3>Valor Total: R$ 350,00</h3>"));
        assert!(html.contains("<th>Tipo</th>"));
        assert!(html.contains("<td>R$ 150,00</td>"));
        assert!(html.contains("<h2>SEM TABELA</h2>"));
        assert_eq!(html.matches("<table>").count(), 1);
        assert!(html.contains("Este é um e-mail automático."));
    }

    #[test]
    fn test_escapes_text() {
        let html = HtmlRenderer::new().unwrap().render(&document()).unwrap();
        assert!(html.contains("<strong>PIX &amp; Cia</strong>"));
        assert!(html.contains("<td>&lt;BOLETO&gt;</td>"));
        assert!(!html.contains("<BOLETO>"));
    }

    #[test]
    fn test_custom_template() {
        let renderer =
            HtmlRenderer::from_template("{% for s in sections %}[{{ s.title }}]{% endfor %}").unwrap();
        let out = renderer.render(&document()).unwrap();
        assert_eq!(out, "[LANÇAMENTOS EM ABERTO][SEM TABELA]");
    }

    #[test]
    fn test_invalid_template_is_an_error() {
        assert!(HtmlRenderer::from_template("{% for %}").is_err());
    }
}
