//! Workbook builder
//!
//! Builds the export as a small in-memory sheet model first, so the layout
//! can be inspected and tested without parsing xlsx, then serializes it with
//! `rust_xlsxwriter` in one pass.

use std::path::{Path, PathBuf};

use log::info;
use rust_xlsxwriter::{Format, Url};

use crate::error::FintrackResult;
use crate::models::MAX_TEXT_LEN;
use crate::storage::write_bytes_atomic;

use super::aggregate::ExportRows;
use super::Variant;

/// Longest URL a spreadsheet hyperlink may target
pub const MAX_URL_LEN: usize = 2083;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    /// Hyperlink target, if the cell links anywhere
    pub hyperlink: Option<String>,
}

/// One worksheet: a header row followed by data rows
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, values: Vec<CellValue>) {
        self.rows.push(
            values
                .into_iter()
                .map(|value| Cell {
                    value,
                    hyperlink: None,
                })
                .collect(),
        );
    }

    /// Data cell at `row` (0 = first row after the header)
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Link every http(s) text cell under a `url`/`link` header
    ///
    /// URLs longer than `MAX_URL_LEN` stay plain text. Returns the A1
    /// references of the cells that were linked.
    pub fn add_hyperlinks(&mut self) -> Vec<String> {
        let mut linked = Vec::new();
        for (col, title) in self.header.iter().enumerate() {
            let title = title.to_lowercase();
            if !(title.contains("url") || title.contains("link")) {
                continue;
            }
            for (row, cells) in self.rows.iter_mut().enumerate() {
                let Some(cell) = cells.get_mut(col) else {
                    continue;
                };
                let Some(text) = cell.value.as_text() else {
                    continue;
                };
                let linkable = text.starts_with("http://") || text.starts_with("https://");
                if linkable && text.chars().count() <= MAX_URL_LEN {
                    cell.hyperlink = Some(text.to_string());
                    // +1 for the header row
                    linked.push(cell_ref(row + 1, col));
                }
            }
        }
        linked
    }

    pub fn hyperlink_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|c| c.hyperlink.is_some())
            .count()
    }
}

/// An export workbook, sheets in output order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn hyperlink_count(&self) -> usize {
        self.sheets.iter().map(Sheet::hyperlink_count).sum()
    }

    /// Serialize to xlsx bytes
    pub fn to_xlsx_bytes(&self) -> FintrackResult<Vec<u8>> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let bold = Format::new().set_bold();

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;

            for (col, title) in sheet.header.iter().enumerate() {
                worksheet.write_string_with_format(0, col as u16, title, &bold)?;
            }

            for (idx, cells) in sheet.rows.iter().enumerate() {
                let row = (idx + 1) as u32;
                for (col, cell) in cells.iter().enumerate() {
                    let col = col as u16;
                    match (&cell.value, &cell.hyperlink) {
                        (_, Some(target)) => {
                            worksheet.write_url(row, col, Url::new(target.as_str()))?;
                        }
                        (CellValue::Number(n), None) => {
                            worksheet.write_number(row, col, *n)?;
                        }
                        (CellValue::Text(s), None) if !s.is_empty() => {
                            worksheet.write_string(row, col, cell_text(s))?;
                        }
                        _ => {}
                    }
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// Write `<stem>.xlsx` into `dir`
    ///
    /// The workbook is serialized completely before anything touches disk,
    /// and the file is moved into place atomically.
    pub fn write_export(&self, dir: &Path, stem: &str) -> FintrackResult<PathBuf> {
        let bytes = self.to_xlsx_bytes()?;
        let path = dir.join(format!("{}.xlsx", stem));
        write_bytes_atomic(&path, &bytes)?;
        info!("wrote export {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// `text` cut to what one cell holds
fn cell_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_TEXT_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Lay out export rows as Incomes, Expenses, Reminders, Savings and Summary
pub fn build_workbook(rows: &ExportRows, variant: Variant) -> Workbook {
    let mut sheets = Vec::new();

    let income_links = rows.incomes.iter().any(|r| r.invoice_url.is_some());
    let mut header = vec!["date", "source", "amount"];
    if income_links {
        header.push("invoiceUrl");
    }
    let mut incomes = Sheet::new("Incomes", &header);
    for r in &rows.incomes {
        let mut values = vec![
            CellValue::from(r.date.as_str()),
            CellValue::from(r.source.as_str()),
            CellValue::from(r.amount),
        ];
        if income_links {
            values.push(CellValue::from(r.invoice_url.clone().unwrap_or_default()));
        }
        incomes.push_row(values);
    }
    sheets.push(incomes);

    let expense_links = rows.expenses.iter().any(|r| r.receipt_url.is_some());
    let mut header = vec!["date", "category", "amount"];
    if expense_links {
        header.push("receiptUrl");
    }
    let mut expenses = Sheet::new("Expenses", &header);
    for r in &rows.expenses {
        let mut values = vec![
            CellValue::from(r.date.as_str()),
            CellValue::from(r.category.as_str()),
            CellValue::from(r.amount),
        ];
        if expense_links {
            values.push(CellValue::from(r.receipt_url.clone().unwrap_or_default()));
        }
        expenses.push_row(values);
    }
    sheets.push(expenses);

    for sheet in &mut sheets {
        sheet.add_hyperlinks();
    }

    if !rows.reminders.is_empty() {
        let mut reminders = Sheet::new("Reminders", &["title", "dueDate", "amount"]);
        for r in &rows.reminders {
            reminders.push_row(vec![
                CellValue::from(r.title.as_str()),
                CellValue::from(r.due_date.as_str()),
                r.amount.map_or_else(|| CellValue::from(""), CellValue::from),
            ]);
        }
        sheets.push(reminders);
    }

    if !rows.savings.is_empty() {
        let mut savings = Sheet::new("Savings", &["name", "amount", "date"]);
        for s in &rows.savings {
            savings.push_row(vec![
                CellValue::from(s.name.as_str()),
                CellValue::from(s.amount),
                CellValue::from(s.date.clone().unwrap_or_default()),
            ]);
        }
        sheets.push(savings);
    }

    let mut summary = Sheet::new("Summary", &["field", "value"]);
    summary.push_row(vec!["Variant".into(), variant.to_string().into()]);
    summary.push_row(vec!["Total Incomes".into(), rows.totals.income.into()]);
    summary.push_row(vec!["Total Expenses".into(), rows.totals.expense.into()]);
    summary.push_row(vec!["Savings".into(), rows.totals.net.into()]);
    sheets.push(summary);

    Workbook { sheets }
}

/// Spreadsheet column letters for a 0-based index (0 = A, 26 = AA)
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// A1-style reference for a 0-based grid position (row 0 is the header)
pub fn cell_ref(row: usize, col: usize) -> String {
    format!("{}{}", column_letter(col), row + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::aggregate::{ExpenseRow, IncomeRow, ReminderRow, SavingRow, Totals};
    use std::io::{Cursor, Read};
    use tempfile::TempDir;

    fn zip_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut contents = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents
    }

    fn income(date: &str, amount: f64, url: Option<&str>) -> IncomeRow {
        IncomeRow {
            date: date.into(),
            source: "Job".into(),
            amount,
            invoice_url: url.map(str::to_string),
        }
    }

    fn scenario() -> ExportRows {
        ExportRows {
            incomes: vec![income("2024-01-05", 50000.0, None)],
            expenses: vec![ExpenseRow {
                date: "2024-01-10".into(),
                category: "Rent".into(),
                amount: 12000.0,
                receipt_url: None,
            }],
            totals: Totals {
                income: 50000.0,
                expense: 12000.0,
                net: 38000.0,
            },
            ..ExportRows::default()
        }
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(51), "AZ");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
        assert_eq!(cell_ref(1, 3), "D2");
    }

    #[test]
    fn test_scenario_layout() {
        let wb = build_workbook(&scenario(), Variant::Itr);
        assert_eq!(wb.sheet_names(), ["Incomes", "Expenses", "Summary"]);

        let incomes = wb.sheet("Incomes").unwrap();
        assert_eq!(incomes.header, ["date", "source", "amount"]);
        assert_eq!(incomes.rows.len(), 1);
        assert_eq!(wb.sheet("Expenses").unwrap().rows.len(), 1);

        let summary = wb.sheet("Summary").unwrap();
        assert_eq!(summary.header, ["field", "value"]);
        assert_eq!(summary.rows.len(), 4);
        assert_eq!(summary.rows[0][1].value, CellValue::from("ITR"));
        assert_eq!(summary.rows[1][1].value, CellValue::Number(50000.0));
        assert_eq!(summary.rows[2][1].value, CellValue::Number(12000.0));
        assert_eq!(summary.rows[3][0].value, CellValue::from("Savings"));
        assert_eq!(summary.rows[3][1].value, CellValue::Number(38000.0));
    }

    #[test]
    fn test_empty_sets() {
        let wb = build_workbook(&ExportRows::default(), Variant::Gst);
        assert_eq!(wb.sheet_names(), ["Incomes", "Expenses", "Summary"]);
        assert!(wb.sheet("Incomes").unwrap().rows.is_empty());
        assert_eq!(wb.sheet("Expenses").unwrap().header.len(), 3);
    }

    #[test]
    fn test_optional_sheets_and_blank_cells() {
        let rows = ExportRows {
            reminders: vec![ReminderRow {
                title: "Tax".into(),
                due_date: "2024-03-31".into(),
                amount: None,
            }],
            savings: vec![SavingRow {
                name: "Emergency".into(),
                amount: 1000.0,
                date: None,
            }],
            ..ExportRows::default()
        };
        let wb = build_workbook(&rows, Variant::Itr);
        assert_eq!(
            wb.sheet_names(),
            ["Incomes", "Expenses", "Reminders", "Savings", "Summary"]
        );
        assert_eq!(wb.sheet("Reminders").unwrap().cell(0, 2).unwrap().value, CellValue::from(""));
        assert_eq!(wb.sheet("Savings").unwrap().cell(0, 2).unwrap().value, CellValue::from(""));
    }

    #[test]
    fn test_attachment_column_all_or_nothing() {
        let rows = ExportRows {
            incomes: vec![
                income("2024-01-05", 1.0, Some("https://files/inv.pdf")),
                income("2024-01-06", 2.0, None),
                income("2024-01-07", 3.0, Some("file:///tmp/inv.pdf")),
            ],
            ..ExportRows::default()
        };
        let wb = build_workbook(&rows, Variant::Itr);
        let sheet = wb.sheet("Incomes").unwrap();
        assert_eq!(sheet.header.last().unwrap(), "invoiceUrl");
        assert!(sheet.rows.iter().all(|r| r.len() == 4));
        assert_eq!(sheet.cell(1, 3).unwrap().value, CellValue::from(""));

        // Only the http(s) value is linked; the date column never is
        assert_eq!(sheet.hyperlink_count(), 1);
        assert_eq!(
            sheet.cell(0, 3).unwrap().hyperlink.as_deref(),
            Some("https://files/inv.pdf")
        );
        assert!(sheet.rows.iter().all(|r| r[0].hyperlink.is_none()));
        assert!(!wb.sheet("Expenses").unwrap().header.contains(&"receiptUrl".to_string()));
    }

    #[test]
    fn test_add_hyperlinks_matches_header_substring() {
        let mut sheet = Sheet::new("Docs", &["date", "Link", "amount", "imageURL"]);
        sheet.push_row(vec![
            "https://not-a-link-column".into(),
            "http://a".into(),
            1.0.into(),
            "https://b".into(),
        ]);
        sheet.push_row(vec!["x".into(), 5.0.into(), 1.0.into(), "ftp://c".into()]);

        let linked = sheet.add_hyperlinks();
        assert_eq!(linked, ["B2", "D2"]);
        assert!(sheet.cell(0, 0).unwrap().hyperlink.is_none());
        assert!(sheet.cell(1, 1).unwrap().hyperlink.is_none());
    }

    #[test]
    fn test_write_export_creates_xlsx() {
        let temp_dir = TempDir::new().unwrap();
        let mut rows = scenario();
        rows.incomes[0].invoice_url = Some("https://files/inv.pdf".into());
        let wb = build_workbook(&rows, Variant::Itr);

        let path = wb.write_export(temp_dir.path(), "fintrack-itr-2024-01").unwrap();
        assert_eq!(path.file_name().unwrap(), "fintrack-itr-2024-01.xlsx");

        let bytes = std::fs::read(&path).unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
        assert!(!temp_dir.path().join("fintrack-itr-2024-01.xlsx.tmp").exists());
    }

    #[test]
    fn test_serialized_workbook_contents() {
        let mut rows = scenario();
        rows.incomes[0].invoice_url = Some("https://files/inv.pdf".into());
        let bytes = build_workbook(&rows, Variant::Itr).to_xlsx_bytes().unwrap();

        let workbook = zip_entry(&bytes, "xl/workbook.xml");
        for name in ["Incomes", "Expenses", "Summary"] {
            assert!(workbook.contains(&format!("name=\"{}\"", name)), "{}", name);
        }
        assert!(!workbook.contains("name=\"Reminders\""));

        let incomes = zip_entry(&bytes, "xl/worksheets/sheet1.xml");
        assert!(incomes.contains("<hyperlink ref=\"D2\""));
        assert!(incomes.contains("<v>50000</v>"));
        let rels = zip_entry(&bytes, "xl/worksheets/_rels/sheet1.xml.rels");
        assert!(rels.contains("Target=\"https://files/inv.pdf\""));

        let summary = zip_entry(&bytes, "xl/worksheets/sheet3.xml");
        assert!(summary.contains("<v>38000</v>"));
    }

    #[test]
    fn test_overlong_values_do_not_abort_export() {
        let long_url = format!("https://files/{}", "a".repeat(MAX_URL_LEN));
        let rows = ExportRows {
            incomes: vec![income("2024-01-05", 1.0, Some(long_url.as_str()))],
            savings: vec![SavingRow {
                name: "é".repeat(MAX_TEXT_LEN + 10),
                amount: 1.0,
                date: None,
            }],
            ..ExportRows::default()
        };
        let wb = build_workbook(&rows, Variant::Itr);
        assert_eq!(wb.sheet("Incomes").unwrap().hyperlink_count(), 0);

        let bytes = wb.to_xlsx_bytes().unwrap();
        assert_eq!(&bytes[..2], b"PK");
        assert_eq!(cell_text(&"é".repeat(MAX_TEXT_LEN + 10)).chars().count(), MAX_TEXT_LEN);
        assert_eq!(cell_text("short"), "short");
    }
}
