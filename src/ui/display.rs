use std::io::{self, BufRead, Write};

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;

use crate::db::Value;
use crate::input::Console;
use crate::models::{Party, PartyKind, Project};

const PROJECT_HEADERS: [&str; 13] = [
    "Project Number",
    "Project Name",
    "Building Type",
    "Physical Address",
    "ERF Number",
    "Total Fee",
    "Amount Paid",
    "Deadline",
    "Finalised",
    "Completion Date",
    "Architect ID",
    "Contractor ID",
    "Customer ID",
];

/// Build a bordered table with a bold header row
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    for row in rows {
        table.add_row(row.clone());
    }
    table
}

fn project_cells(project: &Project) -> Vec<String> {
    let details = &project.details;
    vec![
        project.number.to_string(),
        Value::from(details.name.clone()).to_string(),
        details.building_type.clone(),
        details.address.clone(),
        details.erf_number.clone(),
        Value::from(details.total_fee).to_string(),
        Value::from(details.amount_paid).to_string(),
        Value::from(details.deadline).to_string(),
        details.status.is_finalised().to_string(),
        details
            .status
            .completion_date()
            .map_or(Value::Null, Value::from)
            .to_string(),
        details.architect_id.clone(),
        details.contractor_id.clone(),
        details.customer_id.clone(),
    ]
}

fn party_headers(kind: PartyKind) -> Vec<String> {
    let mut headers = vec![format!("{} ID", kind.label())];
    match kind {
        PartyKind::Customer => headers.extend(["First Name".to_string(), "Surname".to_string()]),
        _ => headers.push("Name".to_string()),
    }
    headers.extend(["Telephone Number", "Email", "Address"].map(String::from));
    headers
}

fn party_cells(party: &Party) -> Vec<String> {
    let mut cells = vec![party.id.clone()];
    cells.extend(party.detail_columns().into_iter().map(|(_, value)| value));
    cells
}

fn print_table<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    title: &str,
    headers: &[&str],
    rows: &[Vec<String>],
) -> io::Result<()> {
    console.say(title.bold())?;
    console.say(render_table(headers, rows))
}

/// Print `projects` under `title`, or `empty` when there are none
pub fn print_projects<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    title: &str,
    projects: &[Project],
    empty: &str,
) -> io::Result<()> {
    if projects.is_empty() {
        return console.say(empty);
    }
    let rows: Vec<Vec<String>> = projects.iter().map(project_cells).collect();
    print_table(console, title, &PROJECT_HEADERS, &rows)
}

pub fn print_parties<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    kind: PartyKind,
    parties: &[Party],
) -> io::Result<()> {
    if parties.is_empty() {
        return console.say(format!("No {kind}s found."));
    }
    let headers = party_headers(kind);
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = parties.iter().map(party_cells).collect();
    print_table(console, &format!("All {}s:", kind.label()), &headers, &rows)
}
