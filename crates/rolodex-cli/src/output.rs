//! Table, plain, and JSON output for contact lists.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

use rolodex_core::Contact;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Plain,
}

pub fn parse_output_format(raw: Option<&str>) -> anyhow::Result<Option<OutputFormat>> {
    match raw {
        None => Ok(None),
        Some("table") => Ok(Some(OutputFormat::Table)),
        Some("plain") => Ok(Some(OutputFormat::Plain)),
        Some(other) => Err(anyhow::anyhow!(
            "Unknown output format \"{}\" (expected table or plain)",
            other
        )),
    }
}

pub fn print_contacts(
    contacts: &[Contact],
    json: bool,
    format: Option<OutputFormat>,
    quiet: bool,
) -> anyhow::Result<()> {
    if json {
        if format.is_some() {
            return Err(anyhow::anyhow!("--format cannot be used with --json"));
        }
        println!("{}", serde_json::to_string_pretty(contacts)?);
        return Ok(());
    }

    match format.unwrap_or(OutputFormat::Table) {
        OutputFormat::Table => {
            if contacts.is_empty() {
                if !quiet {
                    println!("{}", "No contacts yet. Add one with `rolodex add`.".dimmed());
                }
                return Ok(());
            }
            println!("{}", render_table(contacts));
        }
        OutputFormat::Plain => {
            for contact in contacts {
                println!(
                    "{}\t{}\t{}\t{}",
                    contact.id, contact.first_name, contact.last_name, contact.phone
                );
            }
        }
    }
    Ok(())
}

pub fn render_table(contacts: &[Contact]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID"),
            Cell::new("FIRST NAME"),
            Cell::new("LAST NAME"),
            Cell::new("PHONE"),
        ]);
    for contact in contacts {
        table.add_row(vec![
            Cell::new(contact.id),
            Cell::new(&contact.first_name),
            Cell::new(&contact.last_name),
            Cell::new(&contact.phone),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolodex_core::ContactId;

    #[test]
    fn test_render_table_has_one_row_per_contact() {
        let contacts = vec![
            Contact {
                id: ContactId(1),
                first_name: "Alex Johnson".to_string(),
                last_name: String::new(),
                phone: "262-555-1234".to_string(),
            },
            Contact {
                id: ContactId(2),
                first_name: "Jamie Doe".to_string(),
                last_name: String::new(),
                phone: "262-555-5678".to_string(),
            },
        ];

        let rendered = render_table(&contacts).to_string();
        assert!(rendered.contains("Alex Johnson"));
        assert!(rendered.contains("262-555-5678"));
    }

    #[test]
    fn test_parse_output_format_rejects_unknown() {
        assert_eq!(parse_output_format(None).unwrap(), None);
        assert_eq!(
            parse_output_format(Some("plain")).unwrap(),
            Some(OutputFormat::Plain)
        );
        assert!(parse_output_format(Some("yaml")).is_err());
    }
}
