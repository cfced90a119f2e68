//! Record rendering shared by the process and batch commands.

use clap::ValueEnum;

use waybill_core::ShipmentRecord;
use waybill_core::models::shipment::sum_totals;

/// Column order of tabular output, matching the JSON keys.
pub const COLUMNS: [&str; 5] = [
    "date",
    "air_waybill_number",
    "customer_name",
    "order_number",
    "total_amount",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON array of records
    Json,
    /// CSV with a header row
    Csv,
    /// Tab-separated rows, ready to paste into a spreadsheet
    Tsv,
    /// Plain text table
    Text,
}

impl OutputFormat {
    /// Parse a format name from the config file.
    pub fn from_name(name: &str) -> anyhow::Result<Self> {
        <Self as ValueEnum>::from_str(name, true)
            .map_err(|_| anyhow::anyhow!("Unknown output format in config: {}", name))
    }

    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Text => "txt",
        }
    }
}

/// Render records in the given format.
pub fn format_records(
    records: &[ShipmentRecord],
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Json => Ok(serde_json::to_string(records)?),
        OutputFormat::Csv => format_delimited(records, b','),
        OutputFormat::Tsv => format_delimited(records, b'\t'),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_delimited(records: &[ShipmentRecord], delimiter: u8) -> anyhow::Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(vec![]);

    wtr.write_record(COLUMNS)?;

    for record in records {
        wtr.write_record([
            &record.date,
            &record.air_waybill_number,
            &record.customer_name,
            &record.order_number,
            &record.total_amount,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[ShipmentRecord]) -> String {
    if records.is_empty() {
        return "No shipments found\n".to_string();
    }

    let mut output = String::new();

    output.push_str(&format!(
        "{:<10}  {:<12}  {:<24}  {:<5}  {:>12}\n",
        "Date", "AWB", "Customer", "Order", "Total"
    ));

    for record in records {
        output.push_str(&format!(
            "{:<10}  {:<12}  {:<24}  {:<5}  {:>12}\n",
            record.date,
            record.air_waybill_number,
            record.customer_name,
            record.order_number,
            record.total_amount
        ));
    }

    output.push_str(&format!(
        "\n{} shipments, total {}\n",
        records.len(),
        sum_totals(records)
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ShipmentRecord> {
        vec![
            ShipmentRecord {
                date: "04/17/2025".to_string(),
                air_waybill_number: "123456789012".to_string(),
                customer_name: "VIC VIC".to_string(),
                order_number: "1234".to_string(),
                total_amount: "1234.56".to_string(),
            },
            ShipmentRecord {
                date: String::new(),
                air_waybill_number: "987654321098".to_string(),
                customer_name: "BENJAMIN ATTARD".to_string(),
                order_number: String::new(),
                total_amount: "10.00".to_string(),
            },
        ]
    }

    #[test]
    fn test_json_output() {
        let json = format_records(&records(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["air_waybill_number"], "123456789012");
        assert_eq!(value[1]["order_number"], "");
    }

    #[test]
    fn test_delimited_output() {
        let csv = format_records(&records(), OutputFormat::Csv, false).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("date,air_waybill_number,customer_name,order_number,total_amount")
        );
        assert_eq!(
            lines.next(),
            Some("04/17/2025,123456789012,VIC VIC,1234,1234.56")
        );

        let tsv = format_records(&records(), OutputFormat::Tsv, false).unwrap();
        assert_eq!(
            tsv.lines().nth(2),
            Some("\t987654321098\tBENJAMIN ATTARD\t\t10.00")
        );
    }

    #[test]
    fn test_text_output() {
        let text = format_records(&records(), OutputFormat::Text, false).unwrap();
        assert!(text.contains("2 shipments, total 1244.56"));
        assert_eq!(
            format_records(&[], OutputFormat::Text, false).unwrap(),
            "No shipments found\n"
        );
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::from_name("TSV").unwrap(), OutputFormat::Tsv);
        assert!(OutputFormat::from_name("xml").is_err());
        assert_eq!(OutputFormat::Text.extension(), "txt");
    }
}
