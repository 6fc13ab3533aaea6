use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use crate::models::{EditorialPlan, PLAN_COLUMNS};

pub const SHEET_NAME: &str = "Piano editoriale";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Terminal column widths, in characters, for `PLAN_COLUMNS`.
const TABLE_WIDTHS: [usize; 5] = [18, 24, 32, 60, 8];

pub struct PlanExporter;

impl PlanExporter {
    /// Spreadsheet bytes: header row in bold, one row per post.
    pub fn generate_xlsx(plan: &EditorialPlan) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let wrap = Format::new().set_text_wrap();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, title) in PLAN_COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *title, &header)?;
        }
        worksheet.set_column_width(2, 40)?;
        worksheet.set_column_width(3, 80)?;

        for (i, row) in plan.rows.iter().enumerate() {
            let excel_row = (i + 1) as u32;
            for (col, value) in row.cells().iter().enumerate() {
                if col == 3 {
                    worksheet.write_string_with_format(excel_row, col as u16, *value, &wrap)?;
                } else {
                    worksheet.write_string(excel_row, col as u16, *value)?;
                }
            }
        }

        workbook
            .save_to_buffer()
            .context("Failed to build spreadsheet")
    }

    pub fn generate_csv(plan: &EditorialPlan) -> String {
        let mut csv = String::new();

        let header: Vec<String> = PLAN_COLUMNS.iter().map(|c| Self::escape_csv(c)).collect();
        csv.push_str(&header.join(","));
        csv.push('\n');

        for row in &plan.rows {
            let cells: Vec<String> = row.cells().iter().map(|c| Self::escape_csv(c)).collect();
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }

        csv
    }

    fn escape_csv(text: &str) -> String {
        // If the text contains comma, quote, or newline, wrap in quotes and escape quotes
        if text.contains(',') || text.contains('"') || text.contains('\n') || text.contains('\r') {
            format!("\"{}\"", text.replace('"', "\"\""))
        } else {
            text.to_string()
        }
    }

    /// Fixed-width preview of the plan. Long cells are cut for display only.
    pub fn render_table(plan: &EditorialPlan) -> String {
        let mut table = String::new();

        let header: Vec<&str> = PLAN_COLUMNS.to_vec();
        table.push_str(&Self::render_line(&header));
        let separator: Vec<String> = TABLE_WIDTHS.iter().map(|w| "-".repeat(*w)).collect();
        table.push_str(&separator.join("-+-"));
        table.push('\n');

        for row in &plan.rows {
            table.push_str(&Self::render_line(&row.cells()));
        }

        table
    }

    fn render_line(cells: &[&str]) -> String {
        let fitted: Vec<String> = cells
            .iter()
            .zip(TABLE_WIDTHS)
            .map(|(cell, width)| format!("{:<width$}", Self::fit(cell, width), width = width))
            .collect();
        format!("{}\n", fitted.join(" | ").trim_end())
    }

    fn fit(text: &str, width: usize) -> String {
        let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= width {
            flat
        } else {
            let cut: String = flat.chars().take(width.saturating_sub(1)).collect();
            format!("{}…", cut)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlanRow;

    fn plan() -> EditorialPlan {
        EditorialPlan::new(vec![
            PlanRow::new(
                "caffè artigianale",
                &["https://a.it".to_string(), "https://b.it".to_string()],
                "Vieni a provare il nostro \"espresso\".",
            ),
            PlanRow::new("colazione", &[], "Cornetti caldi\nogni mattina"),
        ])
    }

    #[test]
    fn test_escape_csv_plain() {
        assert_eq!(PlanExporter::escape_csv("pizza"), "pizza");
    }

    #[test]
    fn test_escape_csv_comma_and_quotes() {
        assert_eq!(PlanExporter::escape_csv("a, b"), "\"a, b\"");
        assert_eq!(
            PlanExporter::escape_csv("il \"nostro\" bar"),
            "\"il \"\"nostro\"\" bar\""
        );
    }

    #[test]
    fn test_generate_csv() {
        let csv = PlanExporter::generate_csv(&plan());
        let expected = "Data pubblicazione,Argomento,Fonte,Contenuto post,Immagine\n\
            ,caffè artigianale,\"https://a.it, https://b.it\",\"Vieni a provare il nostro \"\"espresso\"\".\",\n\
            ,colazione,,\"Cornetti caldi\nogni mattina\",\n";
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_generate_csv_empty_plan_has_header() {
        assert_eq!(
            PlanExporter::generate_csv(&EditorialPlan::default()),
            "Data pubblicazione,Argomento,Fonte,Contenuto post,Immagine\n"
        );
    }

    #[test]
    fn test_render_table_one_line_per_row() {
        let table = PlanExporter::render_table(&plan());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Data pubblicazione"));
        assert!(lines[2].contains("caffè artigianale"));
        assert!(lines[3].contains("Cornetti caldi ogni mattina"));
    }

    #[test]
    fn test_fit_truncates_with_ellipsis() {
        assert_eq!(PlanExporter::fit("abcdef", 4), "abc…");
        assert_eq!(PlanExporter::fit("abc", 4), "abc");
    }

    #[test]
    fn test_generate_xlsx_is_zip_archive() {
        let bytes = PlanExporter::generate_xlsx(&plan()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_extension() {
        assert_eq!(ExportFormat::Xlsx.extension(), "xlsx");
        assert_eq!(ExportFormat::Csv.extension(), "csv");
    }
}
