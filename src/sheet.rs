use std::{
    collections::HashMap,
    fs::File,
    io::{Read, Write},
    path::Path,
};

use anyhow::{Context, Error, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};
use serde_json::Value;
use tracing::{info, warn};

use crate::models::{
    contact::{Contact, ContactRow, PHONE_FIELD},
    result::ReportRow,
};

const SAMPLE_HEADERS: [&str; 4] = ["phone", "name", "produto", "valor"];
const SAMPLE_ROWS: [[&str; 4]; 2] = [
    ["5521999999999", "João Silva", "CDB", "10000"],
    ["5521988888888", "Maria Santos", "LCI", "15000"],
];

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Rows loaded from a contact sheet with a header row.
#[derive(Debug, Clone)]
pub struct ContactSheet {
    /// Column names in file order. These are the placeholders a template may use.
    pub columns: Vec<String>,
    /// Every non-blank data row, in sheet order.
    pub rows: Vec<ContactRow>,
}

impl ContactSheet {
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.rows.iter().filter_map(ContactRow::contact)
    }

    pub fn rejected_count(&self) -> usize {
        self.rows.len() - self.contacts().count()
    }
}

/// Reads a CSV contact sheet.
pub fn read_contacts<R: Read>(reader: R) -> Result<ContactSheet, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()
        .context("Failed to read header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let records = csv_reader.records().enumerate().map(|(index, record)| {
        record
            .map(|record| record.iter().map(str::to_string).collect::<Vec<String>>())
            .with_context(|| format!("Failed to read row {}", index + 1))
    });

    build_sheet(columns, records)
}

/// Reads the first worksheet of an Excel or OpenDocument workbook.
pub fn read_workbook(path: &Path) -> Result<ContactSheet, Error> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("Workbook {} has no worksheets", path.display()))?
        .with_context(|| format!("Failed to read first worksheet of {}", path.display()))?;

    let mut cells = range.rows();
    let columns: Vec<String> = cells
        .next()
        .map(|header| {
            header
                .iter()
                .map(|cell| cell_to_string(cell).trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let records = cells.map(|row| Ok(row.iter().map(cell_to_string).collect::<Vec<String>>()));

    build_sheet(columns, records)
}

fn build_sheet<I>(columns: Vec<String>, records: I) -> Result<ContactSheet, Error>
where
    I: Iterator<Item = Result<Vec<String>, Error>>,
{
    if !columns.iter().any(|c| c == PHONE_FIELD) {
        return Err(anyhow!(
            "Contact sheet must have a column named '{}' (found: {})",
            PHONE_FIELD,
            columns.join(", ")
        ));
    }

    let mut rows = Vec::new();
    for (index, record) in records.enumerate() {
        let row = index + 1;
        let record = record?;

        if record.iter().all(|value| value.trim().is_empty()) {
            warn!(row, "Skipping blank row");
            continue;
        }

        // Empty cells are left out so templates referencing them fail per row.
        let fields: HashMap<String, Value> = columns
            .iter()
            .zip(record)
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(column, value)| (column.clone(), Value::String(value)))
            .collect();

        let contact_row = ContactRow::from_fields(row, fields);
        if let ContactRow::Invalid { error, .. } = &contact_row {
            warn!(row, error = %error, "Row will be reported as failed");
        }
        rows.push(contact_row);
    }

    Ok(ContactSheet { columns, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // Phone numbers typed into Excel come back as floats.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Loads contacts from `path`, picking the reader by file extension. Anything
/// that is not a known workbook format is read as CSV.
pub fn load_contacts(path: &Path) -> Result<ContactSheet, Error> {
    let is_workbook = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WORKBOOK_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

    let sheet = if is_workbook {
        read_workbook(path)?
    } else {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        read_contacts(file)?
    };

    info!(
        path = %path.display(),
        rows = sheet.rows.len(),
        rejected = sheet.rejected_count(),
        columns = %sheet.columns.join(", "),
        "Contacts loaded"
    );

    Ok(sheet)
}

pub fn write_report<W: Write>(writer: W, rows: &[ReportRow]) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    // Headers are written explicitly so an empty report still has them.
    csv_writer.write_record(["recipient", "name", "status", "detail", "timestamp"])?;
    for row in rows {
        csv_writer.write_record([
            &row.recipient,
            &row.name,
            &row.status,
            &row.detail,
            &row.timestamp,
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn save_report(path: &Path, rows: &[ReportRow]) -> Result<(), Error> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_report(file, rows)?;

    info!(path = %path.display(), rows = rows.len(), "Report written");
    Ok(())
}

/// Writes a small example contact sheet operators can fill in.
pub fn write_sample<W: Write>(writer: W) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(SAMPLE_HEADERS)?;
    for row in SAMPLE_ROWS {
        csv_writer.write_record(row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn save_sample(path: &Path) -> Result<(), Error> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_sample(file)
}
