//! Quotation document model and renderers
//!
//! A [`QuotationDocument`] is the layout-ready form of a [`Quotation`]:
//! a cover block, the assembly summary table, the component detail table
//! and three total rows. It copies totals from the quotation and never
//! recomputes them; construction fails if the quotation's totals do not
//! add up.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::core::config::Config;
use crate::core::error::QuoteError;
use crate::core::quotation::Quotation;

pub const SUMMARY_HEADERS: [&str; 7] = ["No", "Assembly", "Qty", "Unit", "Unit cost", "Total", "Notes"];
pub const DETAIL_HEADERS: [&str; 6] = ["No", "Component", "Qty", "Unit", "Unit price", "Total"];

/// Labels and cover text used when laying out a document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOptions {
    pub currency: String,
    pub unit_label: String,
    pub labor_unit_label: String,
    pub customer: String,
    pub project_name: String,
    pub delivery_terms: String,
    pub lead_time: String,
    pub payment_terms: String,
    pub validity: String,
    pub remarks: String,
    pub contact: String,
    pub quotation_no: String,
    pub date: NaiveDate,
}

impl DocumentOptions {
    pub fn from_config(config: &Config, date: NaiveDate) -> Self {
        Self {
            currency: config.currency().to_string(),
            unit_label: config.unit_label().to_string(),
            labor_unit_label: config.labor_unit_label().to_string(),
            customer: config.customer().to_string(),
            project_name: config.project_name().to_string(),
            delivery_terms: config.delivery_terms().to_string(),
            lead_time: config.lead_time().to_string(),
            payment_terms: config.payment_terms().to_string(),
            validity: config.validity().to_string(),
            remarks: config.remarks().to_string(),
            contact: config.contact().to_string(),
            quotation_no: String::new(),
            date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub row_no: usize,
    pub assembly_name: String,
    pub multiplicity: i64,
    pub unit: String,
    pub unit_cost: Decimal,
    pub line_total: Decimal,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub row_no: usize,
    pub component_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub total_cost: Decimal,
}

/// Layout-ready quotation
#[derive(Debug, Clone, Serialize)]
pub struct QuotationDocument {
    pub options: DocumentOptions,
    pub summary: Vec<SummaryRow>,
    pub detail: Vec<DetailRow>,
    pub material_total: Decimal,
    pub labor_total: Decimal,
    pub grand_total: Decimal,
}

impl QuotationDocument {
    pub fn new(quotation: &Quotation, options: DocumentOptions) -> Result<Self, QuoteError> {
        quotation.verify_totals()?;

        let mut summary: Vec<SummaryRow> = quotation
            .assembly_lines
            .iter()
            .enumerate()
            .map(|(i, line)| SummaryRow {
                row_no: i + 1,
                assembly_name: line.name.clone(),
                multiplicity: line.multiplicity,
                unit: options.unit_label.clone(),
                unit_cost: line.unit_cost,
                line_total: line.line_total,
                notes: String::new(),
            })
            .collect();

        if quotation.headcount > 0 {
            summary.push(SummaryRow {
                row_no: summary.len() + 1,
                assembly_name: "Labor".to_string(),
                multiplicity: quotation.headcount,
                unit: options.labor_unit_label.clone(),
                unit_cost: quotation.labor_rate,
                line_total: quotation.labor_total,
                notes: String::new(),
            });
        }

        let detail = quotation
            .component_lines
            .iter()
            .enumerate()
            .map(|(i, line)| DetailRow {
                row_no: i + 1,
                component_name: line.name.clone(),
                quantity: line.total_quantity,
                unit: options.unit_label.clone(),
                unit_price: line.unit_price,
                total_cost: line.total_cost,
            })
            .collect();

        Ok(Self {
            options,
            summary,
            detail,
            material_total: quotation.material_total,
            labor_total: quotation.labor_total,
            grand_total: quotation.grand_total,
        })
    }

    fn amount(&self, value: Decimal) -> String {
        format_amount(value, &self.options.currency)
    }

    fn cover_rows(&self) -> Vec<[String; 2]> {
        let o = &self.options;
        vec![
            ["Customer".to_string(), o.customer.clone()],
            ["Project".to_string(), o.project_name.clone()],
            ["Quoted amount".to_string(), self.amount(self.grand_total)],
            ["Delivery terms".to_string(), o.delivery_terms.clone()],
            ["Lead time".to_string(), o.lead_time.clone()],
            ["Payment terms".to_string(), o.payment_terms.clone()],
            ["Validity".to_string(), o.validity.clone()],
            ["Remarks".to_string(), o.remarks.clone()],
            ["Contact".to_string(), o.contact.clone()],
            ["Quotation No.".to_string(), o.quotation_no.clone()],
            ["Quotation date".to_string(), o.date.format("%Y-%m-%d").to_string()],
        ]
    }

    fn summary_records(&self) -> Vec<Vec<String>> {
        self.summary
            .iter()
            .map(|r| {
                vec![
                    r.row_no.to_string(),
                    r.assembly_name.clone(),
                    r.multiplicity.to_string(),
                    r.unit.clone(),
                    self.amount(r.unit_cost),
                    self.amount(r.line_total),
                    r.notes.clone(),
                ]
            })
            .collect()
    }

    fn detail_records(&self) -> Vec<Vec<String>> {
        self.detail
            .iter()
            .map(|r| {
                vec![
                    r.row_no.to_string(),
                    r.component_name.clone(),
                    format_quantity(r.quantity),
                    r.unit.clone(),
                    self.amount(r.unit_price),
                    self.amount(r.total_cost),
                ]
            })
            .collect()
    }

    fn total_rows(&self) -> [[String; 2]; 3] {
        [
            ["Material total".to_string(), self.amount(self.material_total)],
            ["Labor total".to_string(), self.amount(self.labor_total)],
            ["Grand total".to_string(), self.amount(self.grand_total)],
        ]
    }

    /// CSV artifact: cover, summary, detail and totals separated by blank lines
    pub fn to_csv(&self) -> Result<String, QuoteError> {
        let mut cover: Vec<Vec<String>> = vec![vec!["Quotation".to_string()]];
        cover.extend(self.cover_rows().into_iter().map(Vec::from));

        let mut summary = vec![header_record(&SUMMARY_HEADERS)];
        summary.extend(self.summary_records());

        let mut detail = vec![header_record(&DETAIL_HEADERS)];
        detail.extend(self.detail_records());

        let totals: Vec<Vec<String>> = self.total_rows().into_iter().map(Vec::from).collect();

        let blocks = [cover, summary, detail, totals]
            .iter()
            .map(|records| csv_block(records))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(blocks.join("\n"))
    }

    /// Markdown rendering for terminals and reports
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str("# Quotation\n\n");

        for [label, value] in self.cover_rows() {
            if !value.is_empty() {
                output.push_str(&format!("**{}:** {}\n", label, value));
            }
        }

        output.push_str("\n## Summary\n\n");
        let mut summary = Builder::default();
        summary.push_record(SUMMARY_HEADERS);
        for record in self.summary_records() {
            summary.push_record(record);
        }
        output.push_str(&summary.build().with(Style::markdown()).to_string());

        output.push_str("\n\n## Detail\n\n");
        let mut detail = Builder::default();
        detail.push_record(DETAIL_HEADERS);
        for record in self.detail_records() {
            detail.push_record(record);
        }
        output.push_str(&detail.build().with(Style::markdown()).to_string());

        output.push('\n');
        output.push('\n');
        for [label, value] in self.total_rows() {
            output.push_str(&format!("**{}:** {}\n", label, value));
        }
        output
    }
}

fn header_record(headers: &[&str]) -> Vec<String> {
    headers.iter().map(|h| h.to_string()).collect()
}

fn csv_block(records: &[Vec<String>]) -> Result<String, QuoteError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for record in records {
        writer
            .write_record(record)
            .map_err(|e| QuoteError::integrity(format!("csv output failed: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| QuoteError::integrity(format!("csv output failed: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| QuoteError::integrity(format!("csv output is not UTF-8: {}", e)))
}

/// Format a currency amount with two decimals and thousands separators
pub fn format_amount(value: Decimal, currency: &str) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    if currency.is_empty() {
        format!("{}{}.{}", sign, grouped, frac_part)
    } else {
        format!("{}{}.{} {}", sign, grouped, frac_part, currency)
    }
}

/// Quantities print without trailing zeros
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::{self, A1, C2};
    use crate::core::quotation::{build_quotation, LaborModel};
    use crate::entities::Selection;
    use rust_decimal_macros::dec;

    fn options() -> DocumentOptions {
        let mut options = DocumentOptions::from_config(
            &Config::default(),
            NaiveDate::from_ymd_opt(2024, 8, 10).unwrap(),
        );
        options.currency = "USD".to_string();
        options.customer = "Acme".to_string();
        options
    }

    fn example() -> Quotation {
        build_quotation(
            &fixtures::catalog(),
            &fixtures::assemblies(),
            &Selection::new().pick(A1, 3).with_headcount(2),
            &LaborModel::new(dec!(10)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(0), "KRW"), "0.00 KRW");
        assert_eq!(format_amount(dec!(9), "USD"), "9.00 USD");
        assert_eq!(format_amount(dec!(1234.5), "USD"), "1,234.50 USD");
        assert_eq!(format_amount(dec!(1234567.891), ""), "1,234,567.89");
        assert_eq!(format_amount(dec!(100000), "KRW"), "100,000.00 KRW");
        assert_eq!(format_amount(dec!(0.005), ""), "0.01");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(dec!(6.00)), "6");
        assert_eq!(format_quantity(dec!(0.50)), "0.5");
    }

    #[test]
    fn test_document_rows() {
        let doc = QuotationDocument::new(&example(), options()).unwrap();

        assert_eq!(doc.summary.len(), 2);
        assert_eq!(doc.summary[0].row_no, 1);
        assert_eq!(doc.summary[0].assembly_name, "A1");
        assert_eq!(doc.summary[0].unit_cost, dec!(3.00));
        assert_eq!(doc.summary[1].assembly_name, "Labor");
        assert_eq!(doc.summary[1].multiplicity, 2);
        assert_eq!(doc.summary[1].line_total, dec!(20));

        assert_eq!(doc.detail.len(), 2);
        assert_eq!(doc.detail[1].row_no, 2);
        assert_eq!(doc.detail[1].component_name, "C2");
        assert_eq!(doc.detail[1].quantity, dec!(6));

        assert_eq!(doc.grand_total, dec!(29.00));
    }

    #[test]
    fn test_no_labor_row_without_headcount() {
        let q = build_quotation(
            &fixtures::catalog(),
            &fixtures::assemblies(),
            &Selection::new().pick(A1, 1),
            &LaborModel::default(),
        )
        .unwrap();
        let doc = QuotationDocument::new(&q, options()).unwrap();
        assert_eq!(doc.summary.len(), 1);
    }

    #[test]
    fn test_inconsistent_quotation_is_refused() {
        let mut q = example();
        q.material_total = dec!(1);
        let err = QuotationDocument::new(&q, options()).unwrap_err();
        assert!(matches!(err, QuoteError::Integrity { .. }));
    }

    #[test]
    fn test_csv_blocks() {
        let doc = QuotationDocument::new(&example(), options()).unwrap();
        let csv_text = doc.to_csv().unwrap();
        assert_eq!(csv_text.matches("\n\n").count(), 3);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(csv_text.as_bytes());
        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();

        assert_eq!(rows[0], vec!["Quotation"]);
        assert!(rows.contains(&vec!["Customer".to_string(), "Acme".to_string()]));
        assert!(rows.contains(&vec![
            "1".to_string(),
            "A1".to_string(),
            "3".to_string(),
            "ea".to_string(),
            "3.00 USD".to_string(),
            "9.00 USD".to_string(),
            "".to_string(),
        ]));
        assert!(rows.contains(&vec![
            "2".to_string(),
            "C2".to_string(),
            "6".to_string(),
            "ea".to_string(),
            "0.50 USD".to_string(),
            "3.00 USD".to_string(),
        ]));

        let tail: Vec<_> = rows.iter().rev().take(3).rev().cloned().collect();
        assert_eq!(
            tail,
            vec![
                vec!["Material total".to_string(), "9.00 USD".to_string()],
                vec!["Labor total".to_string(), "20.00 USD".to_string()],
                vec!["Grand total".to_string(), "29.00 USD".to_string()],
            ]
        );
    }

    #[test]
    fn test_markdown_contains_sections() {
        let q = build_quotation(
            &fixtures::catalog(),
            &fixtures::assemblies(),
            &Selection::new()
                .pick(A1, 3)
                .override_quantity(C2, dec!(10), true)
                .with_headcount(2),
            &LaborModel::new(dec!(10)).unwrap(),
        )
        .unwrap();
        let md = QuotationDocument::new(&q, options()).unwrap().to_markdown();

        assert!(md.starts_with("# Quotation"));
        assert!(md.contains("## Summary"));
        assert!(md.contains("## Detail"));
        assert!(md.contains("**Material total:** 11.00 USD"));
        assert!(md.contains("**Grand total:** 31.00 USD"));
        assert!(md.contains("| Labor"));
    }
}
