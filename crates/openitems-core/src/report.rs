//! Building the report document from result sets.
//!
//! A [`ReportLayout`] lists the sections of the report. Each [`SectionSpec`]
//! binds to a result set by query name, aggregates it and lays the groups
//! out as summary lines and a table. The optional [`HeadlineSpec`] adds the
//! opening sentence that quotes the leading group of three sections.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use openitems_core::{
//!     ColumnSource, FixedClock, Measure, ReportLayout, ReportRenderer, ResultSet, ResultSets,
//!     Row, SectionSpec,
//! };
//! use rust_decimal_macros::dec;
//!
//! let sets = ResultSets::new().with(ResultSet::from_rows(
//!     "payments",
//!     vec![
//!         Row::new().with("TYPE", "PIX").with("AMOUNT", dec!(100)),
//!         Row::new().with("TYPE", "BOLETO").with("AMOUNT", dec!(200)),
//!     ],
//! ));
//!
//! let layout = ReportLayout::new().with_section(
//!     SectionSpec::new("open", "OPEN ITEMS", "payments", "TYPE")
//!         .sum_field("AMOUNT")
//!         .summary("Valor Total", Measure::Sum("AMOUNT".into()))
//!         .column("Tipo", ColumnSource::Key)
//!         .column("Valor Total", ColumnSource::Sum("AMOUNT".into())),
//! );
//!
//! let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
//! let doc = ReportRenderer::new(&clock).render(&layout, &sets).unwrap();
//! assert_eq!(doc.date, "01/03/2024");
//! assert_eq!(doc.sections[0].summary[0].value, "R$ 300,00");
//! ```

use crate::aggregate::{aggregate, AggregateGroup, Aggregation};
use crate::clock::Clock;
use crate::currency::CurrencyFormat;
use crate::document::{Document, Paragraph, Section, SummaryLine, Table};
use crate::error::ReportError;
use crate::value::{ResultSet, ResultSets};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Date format used in the report body and subject (`dd/mm/YYYY`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

const TITLE: &str = "Posição sobre lançamentos em aberto";
const GREETING: &str = "Prezados,";
const INTRO: &str = "Encaminhamos informações atualizadas sobre os lançamentos em aberto até a data ";
const FOOTER: &str = "Este é um e-mail automático. Por favor, não responda.";

/// A section-level figure: total count or total of a summed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Sum of the count column.
    Count,
    /// Sum of the named column.
    Sum(String),
}

/// Where a table cell takes its value from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSource {
    /// The group key.
    Key,
    /// The group count.
    Count,
    /// The group total of the named column.
    Sum(String),
}

/// A summary line: label and the figure it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySpec {
    /// Label shown before the value.
    pub label: String,
    /// Figure shown.
    pub source: Measure,
}

/// A table column: header and cell source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column header.
    pub header: String,
    /// Cell source.
    pub source: ColumnSource,
}

/// One section of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    /// Identifier used by the headline.
    pub id: String,
    /// Section heading.
    pub title: String,
    /// Name of the query whose result set feeds this section.
    pub result_set: String,
    /// Grouping column.
    pub group_by: String,
    /// Columns summed per group.
    #[serde(default)]
    pub sum_fields: Vec<String>,
    /// Column holding each row's count contribution.
    #[serde(default)]
    pub count_field: Option<String>,
    /// Summary lines above the table.
    #[serde(default)]
    pub summary: Vec<SummarySpec>,
    /// Table layout; no columns means no table.
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

impl SectionSpec {
    /// Create a section with no sums, summary or table.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        result_set: impl Into<String>,
        group_by: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            result_set: result_set.into(),
            group_by: group_by.into(),
            sum_fields: Vec::new(),
            count_field: None,
            summary: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Sum an additional column.
    pub fn sum_field(mut self, field: impl Into<String>) -> Self {
        self.sum_fields.push(field.into());
        self
    }

    /// Set the count column.
    pub fn count_field(mut self, field: impl Into<String>) -> Self {
        self.count_field = Some(field.into());
        self
    }

    /// Add a summary line.
    pub fn summary(mut self, label: impl Into<String>, source: Measure) -> Self {
        self.summary.push(SummarySpec {
            label: label.into(),
            source,
        });
        self
    }

    /// Add a table column.
    pub fn column(mut self, header: impl Into<String>, source: ColumnSource) -> Self {
        self.columns.push(ColumnSpec {
            header: header.into(),
            source,
        });
        self
    }

    /// Check if `field` is one of the summed columns.
    pub fn sums(&self, field: &str) -> bool {
        self.sum_fields.iter().any(|f| f == field)
    }

    /// Aggregate the section's result set.
    pub fn aggregate(&self, set: &ResultSet) -> Aggregation {
        aggregate(
            &set.rows,
            &self.group_by,
            &self.sum_fields,
            self.count_field.as_deref(),
        )
    }

    fn check_field(&self, field: &str) -> Result<(), ReportError> {
        if self.sums(field) {
            Ok(())
        } else {
            Err(ReportError::UntrackedField {
                section: self.id.clone(),
                field: field.to_string(),
            })
        }
    }

    /// Verify that every summary line and column reads a summed column.
    pub fn validate(&self) -> Result<(), ReportError> {
        for line in &self.summary {
            if let Measure::Sum(field) = &line.source {
                self.check_field(field)?;
            }
        }
        for column in &self.columns {
            if let ColumnSource::Sum(field) = &column.source {
                self.check_field(field)?;
            }
        }
        Ok(())
    }
}

/// Reference to the leading group of a section and one of its totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineFact {
    /// Section id.
    pub section: String,
    /// Summed column whose total is quoted.
    pub field: String,
}

impl HeadlineFact {
    /// Create a fact reference.
    pub fn new(section: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            field: field.into(),
        }
    }
}

/// The three facts quoted by the opening sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineSpec {
    /// Payment type with the largest open value.
    pub top_payment_type: HeadlineFact,
    /// Faculty item type with the most records.
    pub top_faculty_type: HeadlineFact,
    /// Client with the largest amount of open installments.
    pub top_client: HeadlineFact,
}

/// Ordered sections plus the optional headline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportLayout {
    /// Opening sentence facts.
    #[serde(default)]
    pub headline: Option<HeadlineSpec>,
    /// Sections in display order.
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

impl ReportLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section.
    pub fn with_section(mut self, section: SectionSpec) -> Self {
        self.sections.push(section);
        self
    }

    /// Set the headline.
    pub fn with_headline(mut self, headline: HeadlineSpec) -> Self {
        self.headline = Some(headline);
        self
    }
}

/// Builds a [`Document`] from a layout and result sets.
pub struct ReportRenderer<'a> {
    clock: &'a dyn Clock,
    currency: CurrencyFormat,
}

impl<'a> ReportRenderer<'a> {
    /// Create a renderer dated by `clock`, formatting amounts as reais.
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self {
            clock,
            currency: CurrencyFormat::pt_br(),
        }
    }

    /// Use a different currency format.
    pub fn with_currency(mut self, currency: CurrencyFormat) -> Self {
        self.currency = currency;
        self
    }

    /// Build the document.
    ///
    /// Fails without producing a partial document when a section's result
    /// set is missing, a layout entry reads an unsummed column, or the
    /// headline quotes a section that has no groups.
    pub fn render(
        &self,
        layout: &ReportLayout,
        sets: &ResultSets,
    ) -> Result<Document, ReportError> {
        let aggregated = layout
            .sections
            .iter()
            .map(|spec| {
                spec.validate()?;
                let set = sets
                    .get(&spec.result_set)
                    .ok_or_else(|| ReportError::MissingResultSet {
                        section: spec.id.clone(),
                        result_set: spec.result_set.clone(),
                    })?;
                Ok((spec, spec.aggregate(set)))
            })
            .collect::<Result<Vec<_>, ReportError>>()?;

        let date = self.clock.today().format(DATE_FORMAT).to_string();

        let mut header = vec![
            Paragraph::new().text(GREETING),
            Paragraph::new().text(INTRO).strong(date.clone()).text("."),
        ];
        if let Some(headline) = &layout.headline {
            header.push(self.headline(headline, &aggregated)?);
        }

        let sections = aggregated
            .iter()
            .map(|(spec, groups)| self.section(spec, groups))
            .collect();

        Ok(Document {
            title: TITLE.to_string(),
            date,
            header,
            sections,
            footer: FOOTER.to_string(),
        })
    }

    fn headline(
        &self,
        spec: &HeadlineSpec,
        aggregated: &[(&SectionSpec, Aggregation)],
    ) -> Result<Paragraph, ReportError> {
        let (payment_type, payment_total) = self.fact(&spec.top_payment_type, aggregated)?;
        let (faculty_type, faculty_total) = self.fact(&spec.top_faculty_type, aggregated)?;
        let (client, client_total) = self.fact(&spec.top_client, aggregated)?;

        Ok(Paragraph::new()
            .text("Observa-se que o tipo de pagamento com maior valor é ")
            .strong(payment_type)
            .text(" totalizando ")
            .strong(payment_total)
            .text(", na Faculdade Sebrae ")
            .strong(faculty_type)
            .text(" tem o maior número de registros totalizando ")
            .strong(faculty_total)
            .text(", já a ")
            .strong(client)
            .text(" tem o maior valor de parcelas em aberto totalizando ")
            .strong(client_total)
            .text("."))
    }

    /// Key and formatted total of the first group of the referenced section.
    fn fact(
        &self,
        fact: &HeadlineFact,
        aggregated: &[(&SectionSpec, Aggregation)],
    ) -> Result<(String, String), ReportError> {
        let (spec, groups) = aggregated
            .iter()
            .find(|(spec, _)| spec.id == fact.section)
            .ok_or_else(|| ReportError::UnknownSection {
                section: fact.section.clone(),
            })?;
        spec.check_field(&fact.field)?;

        let leader = groups.first().ok_or_else(|| ReportError::EmptySection {
            section: spec.id.clone(),
        })?;
        Ok((
            leader.key.clone(),
            self.currency.format(leader.sum(&fact.field)),
        ))
    }

    fn section(&self, spec: &SectionSpec, groups: &Aggregation) -> Section {
        let summary = spec
            .summary
            .iter()
            .map(|line| SummaryLine {
                label: line.label.clone(),
                value: self.total(&line.source, groups),
            })
            .collect();

        let table = (!spec.columns.is_empty()).then(|| Table {
            headers: spec.columns.iter().map(|c| c.header.clone()).collect(),
            rows: groups
                .iter()
                .map(|group| {
                    spec.columns
                        .iter()
                        .map(|c| self.cell(&c.source, group))
                        .collect()
                })
                .collect(),
        });

        Section {
            title: spec.title.clone(),
            summary,
            table,
        }
    }

    fn total(&self, measure: &Measure, groups: &Aggregation) -> String {
        match measure {
            Measure::Count => groups.total_count().to_string(),
            Measure::Sum(field) => {
                // Sum the displayed group amounts so the total matches the table rows.
                let total: Decimal = groups
                    .iter()
                    .map(|group| self.currency.round(group.sum(field)))
                    .sum();
                self.currency.format(total)
            }
        }
    }

    fn cell(&self, source: &ColumnSource, group: &AggregateGroup) -> String {
        match source {
            ColumnSource::Key => group.key.clone(),
            ColumnSource::Count => group.count.to_string(),
            ColumnSource::Sum(field) => self.currency.format(group.sum(field)),
        }
    }
}
