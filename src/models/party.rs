use std::fmt;

use crate::db::{Row, Table};
use crate::error::StoreError;

/// The three roles a party can play on a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyKind {
    Architect,
    Contractor,
    Customer,
}

impl PartyKind {
    /// Table holding this kind of party
    pub fn table(self) -> Table {
        match self {
            PartyKind::Architect => Table::Architects,
            PartyKind::Contractor => Table::Contractors,
            PartyKind::Customer => Table::Customers,
        }
    }

    /// Column naming the party, both in its own table and in Projects
    pub fn id_column(self) -> &'static str {
        match self {
            PartyKind::Architect => "architect_id",
            PartyKind::Contractor => "contractor_id",
            PartyKind::Customer => "customer_id",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            PartyKind::Architect => "architect",
            PartyKind::Contractor => "contractor",
            PartyKind::Customer => "customer",
        }
    }

    pub fn column(self, field: &str) -> String {
        format!("{}_{field}", self.prefix())
    }

    pub fn label(self) -> &'static str {
        match self {
            PartyKind::Architect => "Architect",
            PartyKind::Contractor => "Contractor",
            PartyKind::Customer => "Customer",
        }
    }
}

impl fmt::Display for PartyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// An architect, contractor or customer
///
/// Customers carry a first name and surname; the other kinds have a single
/// name and leave `surname` empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Party {
    pub kind: PartyKind,
    pub id: String,
    pub name: String,
    pub surname: Option<String>,
    pub telephone: String,
    pub email: String,
    pub address: String,
}

impl Party {
    pub fn from_row(kind: PartyKind, row: &Row) -> Result<Self, StoreError> {
        let (name, surname) = match kind {
            PartyKind::Customer => (
                row.text(&kind.column("fname"))?,
                Some(row.text(&kind.column("surname"))?),
            ),
            _ => (row.text(&kind.column("name"))?, None),
        };

        Ok(Self {
            kind,
            id: row.text(kind.id_column())?,
            name,
            surname,
            telephone: row.text(&kind.column("tel"))?,
            email: row.text(&kind.column("email"))?,
            address: row.text(&kind.column("address"))?,
        })
    }

    /// Column/value pairs for every field except the id
    pub fn detail_columns(&self) -> Vec<(String, String)> {
        let kind = self.kind;
        let mut columns = match (&self.surname, kind) {
            (Some(surname), PartyKind::Customer) => vec![
                (kind.column("fname"), self.name.clone()),
                (kind.column("surname"), surname.clone()),
            ],
            _ => vec![(kind.column("name"), self.name.clone())],
        };
        columns.push((kind.column("tel"), self.telephone.clone()));
        columns.push((kind.column("email"), self.email.clone()));
        columns.push((kind.column("address"), self.address.clone()));
        columns
    }
}
