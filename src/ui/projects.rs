use std::io::{self, BufRead, Write};

use chrono::NaiveDate;

use crate::db::{records, RecordStore};
use crate::deletion::{self, DeletionOutcome, PartyDisposition};
use crate::error::AppError;
use crate::input::Console;
use crate::models::{NewProject, PartyKind, ProjectStatus};
use crate::session::Session;
use crate::ui::display::print_projects;

const DEADLINE_PROMPT: &str = "Project Deadline (YYYY-MM-DD): ";
const COMPLETION_PROMPT: &str = "Completion Date (YYYY-MM-DD): ";

/// Ask for a project number; `None` when it is beyond any stored number
fn read_project_number<R: BufRead, W: Write>(console: &mut Console<R, W>, label: &str) -> io::Result<Option<i64>> {
    Ok(i64::try_from(console.integer(label)?).ok())
}

/// Collect every project field. The name may be left blank.
fn read_project_details<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<NewProject> {
    let architect_id = console.text("Architect ID: ")?;
    let contractor_id = console.text("Contractor ID: ")?;
    let customer_id = console.text("Customer ID: ")?;
    let name = console.optional_text("Project Name: ")?;
    let building_type = console.text("Building Type: ")?;
    let address = console.text("Physical Address: ")?;
    let erf_number = console.digits("ERF Number: ")?;
    let total_fee = console.amount("Total Fee: ")?;
    let amount_paid = console.amount("Amount Paid: ")?;
    let deadline = console.date(DEADLINE_PROMPT)?;

    // Completion date is only asked for finalised projects
    let status = if console.boolean("Project Finalised (true/false): ")? {
        ProjectStatus::Finalised(console.date(COMPLETION_PROMPT)?)
    } else {
        ProjectStatus::InProgress
    };

    Ok(NewProject {
        architect_id,
        contractor_id,
        customer_id,
        name,
        building_type,
        address,
        erf_number,
        total_fee,
        amount_paid,
        deadline,
        status,
    })
}

pub async fn view_all<S, R, W>(session: &mut Session<S, R, W>) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let projects = records::get_projects(&mut session.store).await?;
    print_projects(&mut session.console, "All Projects:", &projects, "No projects found.")?;
    Ok(())
}

pub async fn view_incomplete<S, R, W>(session: &mut Session<S, R, W>) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let projects = records::get_incomplete_projects(&mut session.store).await?;
    print_projects(
        &mut session.console,
        "Incomplete Projects:",
        &projects,
        "No incomplete projects found.",
    )?;
    Ok(())
}

pub async fn view_overdue<S, R, W>(session: &mut Session<S, R, W>, today: NaiveDate) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let projects = records::get_overdue_projects(&mut session.store, today).await?;
    print_projects(&mut session.console, "Overdue Projects:", &projects, "No overdue projects found.")?;
    Ok(())
}

pub async fn search<S, R, W>(session: &mut Session<S, R, W>) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let term = session
        .console
        .text("Enter the project number or name to search for: ")?;
    let projects = records::search_projects(&mut session.store, &term).await?;
    print_projects(
        &mut session.console,
        &format!("Search results for '{term}':"),
        &projects,
        &format!("No projects found matching the search term '{term}'."),
    )?;
    Ok(())
}

pub async fn finalise<S, R, W>(session: &mut Session<S, R, W>) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let entered = read_project_number(
        &mut session.console,
        "Enter project number of the project you wish to finalise: ",
    )?;
    let found = match entered {
        Some(number) => records::get_project(&mut session.store, number).await?,
        None => None,
    };
    let Some(project) = found else {
        session.console.say("Project record not found.")?;
        return Ok(());
    };
    let number = project.number;

    let completed = session.console.date("Enter completion date (YYYY-MM-DD): ")?;
    records::finalise_project(&mut session.store, number, completed).await?;
    session
        .console
        .say(format!("Project Number {number} successfully finalised!"))?;
    Ok(())
}

pub async fn add<S, R, W>(session: &mut Session<S, R, W>) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    session.console.say("Enter details for the new project:")?;
    let mut project = read_project_details(&mut session.console)?;

    // Unnamed projects are called after the building and the customer
    if project.name.is_none() {
        let customer = records::get_party(&mut session.store, PartyKind::Customer, &project.customer_id).await?;
        project.name = customer
            .and_then(|customer| customer.surname)
            .map(|surname| format!("{} {surname}", project.building_type));
    }

    let number = records::create_project(&mut session.store, &project).await?;
    session
        .console
        .say(format!("New project {number} successfully added!"))?;
    Ok(())
}

pub async fn update<S, R, W>(session: &mut Session<S, R, W>) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let entered = read_project_number(
        &mut session.console,
        "Enter project number of the project record you wish to update: ",
    )?;
    let found = match entered {
        Some(number) => records::get_project(&mut session.store, number).await?,
        None => None,
    };
    let Some(project) = found else {
        session.console.say("Project record not found.")?;
        return Ok(());
    };
    let number = project.number;

    session
        .console
        .say(format!("Update details for project record {number}: "))?;
    let project = read_project_details(&mut session.console)?;
    records::update_project(&mut session.store, number, &project).await?;
    session.console.say("Project record is successfully updated!")?;
    Ok(())
}

pub async fn delete<S, R, W>(session: &mut Session<S, R, W>) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let Some(number) = read_project_number(
        &mut session.console,
        "Enter project number of the project record you wish to delete: ",
    )?
    else {
        session.console.say("Project record not found.")?;
        return Ok(());
    };

    match deletion::delete_project(session, number).await? {
        DeletionOutcome::NotFound(_) => session.console.say("Project record not found.")?,
        DeletionOutcome::Deleted { project, parties } => {
            for party in parties {
                let label = party.kind.label();
                match party.disposition {
                    PartyDisposition::Deleted => session
                        .console
                        .say(format!("{label} with ID {} successfully deleted!", party.id))?,
                    PartyDisposition::Preserved => session
                        .console
                        .say(format!("{label} with ID {} kept.", party.id))?,
                    PartyDisposition::Missing => session
                        .console
                        .say(format!("{label} with ID {} was already gone.", party.id))?,
                }
            }
            session
                .console
                .say(format!("Project {project} successfully deleted!"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Table;
    use crate::db::memory::MemoryStore;
    use crate::input::{scripted, transcript};

    const DETAILS: [&str; 11] = [
        "A1", "K1", "C1", "", "House", "4 Main Rd", "0042", "1500.50", "500", "2025-06-30", "false",
    ];

    #[tokio::test]
    async fn blank_name_defaults_to_building_and_surname() {
        let mut store = MemoryStore::default();
        store.seed_party(Table::Customers, "C1");
        let mut session = Session::new(store, scripted(&DETAILS));

        add(&mut session).await.unwrap();

        let row = &session.store.rows(Table::Projects)[0];
        assert_eq!(row.optional_text("project_name").unwrap().as_deref(), Some("House C1 customer_surname"));
        assert_eq!(row.text("erf_number").unwrap(), "0042");
        assert!(transcript(&mut session.console).contains("New project 1 successfully added!"));
    }

    #[tokio::test]
    async fn blank_name_stays_empty_without_customer() {
        let mut session = Session::new(MemoryStore::default(), scripted(&DETAILS));

        add(&mut session).await.unwrap();

        let row = &session.store.rows(Table::Projects)[0];
        assert_eq!(row.optional_text("project_name").unwrap(), None);
    }

    #[tokio::test]
    async fn finalised_project_prompts_for_completion_date() {
        let mut lines = DETAILS.to_vec();
        lines[10] = "t";
        lines.extend(["31-01-2025", "2025-01-31"]);
        let mut session = Session::new(MemoryStore::default(), scripted(&lines));

        add(&mut session).await.unwrap();

        let row = &session.store.rows(Table::Projects)[0];
        assert_eq!(
            row.optional_date("completion_date").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31)
        );
        let output = transcript(&mut session.console);
        assert_eq!(output.matches(COMPLETION_PROMPT).count(), 2);
    }

    #[tokio::test]
    async fn finalise_unknown_project_reports_not_found() {
        let mut session = Session::new(MemoryStore::default(), scripted(&["12"]));

        finalise(&mut session).await.unwrap();

        assert!(transcript(&mut session.console).contains("Project record not found."));
        assert!(session.store.log().iter().all(|s| s.sql().starts_with("SELECT")));
    }

    #[tokio::test]
    async fn finalise_sets_flag_and_date() {
        let mut store = MemoryStore::default();
        store.seed_project(3, "A1", "K1", "C1");
        let mut session = Session::new(store, scripted(&["3", "2025-04-01"]));

        finalise(&mut session).await.unwrap();

        let row = &session.store.rows(Table::Projects)[0];
        assert!(row.boolean("project_finalised").unwrap());
        assert_eq!(
            row.optional_date("completion_date").unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 1)
        );
    }

    #[tokio::test]
    async fn delete_reports_each_party() {
        let mut store = MemoryStore::default();
        store.seed_project(1, "A1", "K1", "C1");
        store.seed_party(Table::Architects, "A1");
        store.seed_party(Table::Contractors, "K1");
        let mut session = Session::new(store, scripted(&["1"]));

        delete(&mut session).await.unwrap();

        let output = transcript(&mut session.console);
        assert!(output.contains("Architect with ID A1 successfully deleted!"));
        assert!(output.contains("Customer with ID C1 was already gone."));
        assert!(output.contains("Project 1 successfully deleted!"));
    }

    #[tokio::test]
    async fn out_of_range_number_is_not_found() {
        let mut session = Session::new(MemoryStore::default(), scripted(&["9999999999999999999"]));

        update(&mut session).await.unwrap();

        assert!(transcript(&mut session.console).contains("Project record not found."));
        assert!(session.store.log().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_project_reports_not_found() {
        let mut session = Session::new(MemoryStore::default(), scripted(&["7"]));

        delete(&mut session).await.unwrap();

        assert!(transcript(&mut session.console).contains("Project record not found."));
    }
}
