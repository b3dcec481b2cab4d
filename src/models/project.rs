use chrono::NaiveDate;

use crate::db::{Row, Value};
use crate::error::StoreError;
use crate::models::PartyKind;

/// Whether a project is still running or was signed off on a given date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    InProgress,
    Finalised(NaiveDate),
}

impl ProjectStatus {
    pub fn is_finalised(self) -> bool {
        matches!(self, ProjectStatus::Finalised(_))
    }

    pub fn completion_date(self) -> Option<NaiveDate> {
        match self {
            ProjectStatus::Finalised(date) => Some(date),
            ProjectStatus::InProgress => None,
        }
    }
}

/// Project fields as entered, before the store assigns a number
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub architect_id: String,
    pub contractor_id: String,
    pub customer_id: String,
    pub name: Option<String>,
    pub building_type: String,
    pub address: String,
    pub erf_number: String,
    pub total_fee: f64,
    pub amount_paid: f64,
    pub deadline: NaiveDate,
    pub status: ProjectStatus,
}

impl NewProject {
    /// Writable columns and their values, in table order
    pub fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("architect_id", self.architect_id.clone().into()),
            ("contractor_id", self.contractor_id.clone().into()),
            ("customer_id", self.customer_id.clone().into()),
            ("project_name", self.name.clone().into()),
            ("building_type", self.building_type.clone().into()),
            ("physical_address", self.address.clone().into()),
            ("erf_number", self.erf_number.clone().into()),
            ("total_fee", self.total_fee.into()),
            ("amount_paid", self.amount_paid.into()),
            ("project_deadline", self.deadline.into()),
            ("project_finalised", self.status.is_finalised().into()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub number: i64,
    pub details: NewProject,
}

impl Project {
    pub fn from_row(row: &Row) -> Result<Self, StoreError> {
        let number = row.integer("project_number")?;
        let status = if row.boolean("project_finalised")? {
            let date = row
                .optional_date("completion_date")?
                .ok_or(StoreError::MissingCompletionDate(number))?;
            ProjectStatus::Finalised(date)
        } else {
            ProjectStatus::InProgress
        };

        Ok(Self {
            number,
            details: NewProject {
                architect_id: row.text("architect_id")?,
                contractor_id: row.text("contractor_id")?,
                customer_id: row.text("customer_id")?,
                name: row.optional_text("project_name")?,
                building_type: row.text("building_type")?,
                address: row.text("physical_address")?,
                erf_number: row.text("erf_number")?,
                total_fee: row.decimal("total_fee")?,
                amount_paid: row.decimal("amount_paid")?,
                deadline: row.date("project_deadline")?,
                status,
            },
        })
    }

    /// Party id held for each role
    pub fn party_ids(&self) -> [(PartyKind, &str); 3] {
        [
            (PartyKind::Architect, self.details.architect_id.as_str()),
            (PartyKind::Contractor, self.details.contractor_id.as_str()),
            (PartyKind::Customer, self.details.customer_id.as_str()),
        ]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn project_row(number: i64, architect: &str, contractor: &str, customer: &str) -> Row {
        Row::new(vec![
            ("project_number".to_string(), Value::Integer(number)),
            ("architect_id".to_string(), Value::from(architect)),
            ("contractor_id".to_string(), Value::from(contractor)),
            ("customer_id".to_string(), Value::from(customer)),
            ("project_name".to_string(), Value::Null),
            ("building_type".to_string(), Value::from("House")),
            ("physical_address".to_string(), Value::from("4 Main Rd")),
            ("erf_number".to_string(), Value::from("01234")),
            ("total_fee".to_string(), Value::Decimal(250_000.0)),
            ("amount_paid".to_string(), Value::Decimal(50_000.0)),
            (
                "project_deadline".to_string(),
                Value::Date(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()),
            ),
            ("project_finalised".to_string(), Value::Boolean(false)),
            ("completion_date".to_string(), Value::Null),
        ])
    }

    #[test]
    fn reads_in_progress_project() {
        let project = Project::from_row(&project_row(3, "A1", "K1", "C1")).unwrap();
        assert_eq!(project.number, 3);
        assert_eq!(project.details.name, None);
        assert_eq!(project.details.erf_number, "01234");
        assert_eq!(project.details.status, ProjectStatus::InProgress);
        assert_eq!(project.party_ids()[1], (PartyKind::Contractor, "K1"));
    }

    #[test]
    fn finalised_project_needs_completion_date() {
        let mut row = project_row(3, "A1", "K1", "C1");
        row.set("project_finalised", Value::Boolean(true));
        assert!(matches!(
            Project::from_row(&row),
            Err(StoreError::MissingCompletionDate(3))
        ));

        let completed = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        row.set("completion_date", Value::Date(completed));
        let project = Project::from_row(&row).unwrap();
        assert_eq!(project.details.status.completion_date(), Some(completed));
    }

    #[test]
    fn columns_leave_completion_date_to_caller() {
        let project = Project::from_row(&project_row(3, "A1", "K1", "C1")).unwrap();
        let columns = project.details.columns();
        assert_eq!(columns.len(), 11);
        assert!(columns.iter().all(|(name, _)| *name != "completion_date"));
        assert_eq!(columns[3], ("project_name", Value::Null));
    }
}
