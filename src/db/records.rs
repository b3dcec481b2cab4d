//! Typed reads and writes for projects and parties.

use chrono::NaiveDate;
use tracing::info;

use crate::db::{RecordStore, Statement, Table, Value};
use crate::error::StoreError;
use crate::models::{NewProject, Party, PartyKind, Project, ProjectStatus};

const PROJECT_ORDER: &str = "ORDER BY project_number ASC";

async fn projects<S: RecordStore>(store: &mut S, statement: Statement) -> Result<Vec<Project>, StoreError> {
    store.query(&statement).await?.iter().map(Project::from_row).collect()
}

// Project operations
pub async fn get_project<S: RecordStore>(store: &mut S, number: i64) -> Result<Option<Project>, StoreError> {
    let statement = Statement::select_where(Table::Projects, "project_number", number)?;
    Ok(projects(store, statement).await?.into_iter().next())
}

pub async fn get_projects<S: RecordStore>(store: &mut S) -> Result<Vec<Project>, StoreError> {
    projects(store, Statement::new(format!("SELECT * FROM Projects {PROJECT_ORDER}"))).await
}

pub async fn get_incomplete_projects<S: RecordStore>(store: &mut S) -> Result<Vec<Project>, StoreError> {
    let statement = Statement::new(format!(
        "SELECT * FROM Projects WHERE project_finalised = $1 {PROJECT_ORDER}"
    ))
    .bind(false);
    projects(store, statement).await
}

/// Unfinished projects whose deadline lies before `today`
pub async fn get_overdue_projects<S: RecordStore>(store: &mut S, today: NaiveDate) -> Result<Vec<Project>, StoreError> {
    let statement = Statement::new(format!(
        "SELECT * FROM Projects WHERE project_finalised = $1 AND project_deadline < $2 {PROJECT_ORDER}"
    ))
    .bind(false)
    .bind(today);
    projects(store, statement).await
}

/// Match by exact project number or by name substring
pub async fn search_projects<S: RecordStore>(store: &mut S, term: &str) -> Result<Vec<Project>, StoreError> {
    let pattern = format!("%{}%", escape_like(term));

    let statement = match term.parse::<i64>() {
        Ok(number) => Statement::new(format!(
            "SELECT * FROM Projects WHERE project_number = $1 OR project_name LIKE $2 {PROJECT_ORDER}"
        ))
        .bind(number)
        .bind(pattern),
        // A non-numeric term cannot be a project number
        Err(_) => Statement::new(format!("SELECT * FROM Projects WHERE project_name LIKE $1 {PROJECT_ORDER}"))
            .bind(pattern),
    };
    projects(store, statement).await
}

/// Insert a project and return the number the store assigned
pub async fn create_project<S: RecordStore>(store: &mut S, project: &NewProject) -> Result<i64, StoreError> {
    let mut columns = project.columns();
    if let ProjectStatus::Finalised(date) = project.status {
        columns.push(("completion_date", date.into()));
    }

    let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|n| format!("${n}")).collect();
    let statement = columns.into_iter().fold(
        Statement::new(format!(
            "INSERT INTO Projects ({}) VALUES ({}) RETURNING project_number",
            names.join(", "),
            placeholders.join(", ")
        )),
        |statement, (_, value)| statement.bind(value),
    );

    let rows = store.query(&statement).await?;
    let number = rows
        .first()
        .ok_or_else(|| StoreError::MissingColumn("project_number".to_string()))?
        .integer("project_number")?;
    info!(number, "project created");

    Ok(number)
}

/// Overwrite every field of project `number`, returning the rows changed
pub async fn update_project<S: RecordStore>(store: &mut S, number: i64, project: &NewProject) -> Result<u64, StoreError> {
    let mut columns = project.columns();
    columns.push(("completion_date", project.status.completion_date().map_or(Value::Null, Into::into)));

    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, (name, _))| match *name {
            // NULL is bound as text, so the date column needs the cast
            "completion_date" => format!("{name} = ${}::date", i + 1),
            _ => format!("{name} = ${}", i + 1),
        })
        .collect();
    let sql = format!(
        "UPDATE Projects SET {} WHERE project_number = ${}",
        assignments.join(", "),
        columns.len() + 1
    );
    let statement = columns
        .into_iter()
        .fold(Statement::new(sql), |statement, (_, value)| statement.bind(value))
        .bind(number);

    let changed = store.execute(&statement).await?;
    info!(number, changed, "project updated");

    Ok(changed)
}

pub async fn finalise_project<S: RecordStore>(store: &mut S, number: i64, completed: NaiveDate) -> Result<u64, StoreError> {
    let statement = Statement::new(
        "UPDATE Projects SET project_finalised = $1, completion_date = $2 WHERE project_number = $3",
    )
    .bind(true)
    .bind(completed)
    .bind(number);

    let changed = store.execute(&statement).await?;
    info!(number, %completed, "project finalised");

    Ok(changed)
}

// Party operations
pub async fn get_party<S: RecordStore>(store: &mut S, kind: PartyKind, id: &str) -> Result<Option<Party>, StoreError> {
    let statement = Statement::select_where(kind.table(), kind.id_column(), id)?;
    let rows = store.query(&statement).await?;

    rows.first().map(|row| Party::from_row(kind, row)).transpose()
}

pub async fn get_parties<S: RecordStore>(store: &mut S, kind: PartyKind) -> Result<Vec<Party>, StoreError> {
    let statement = Statement::new(format!(
        "SELECT * FROM {} ORDER BY {} ASC",
        kind.table().name(),
        kind.id_column()
    ));

    store
        .query(&statement)
        .await?
        .iter()
        .map(|row| Party::from_row(kind, row))
        .collect()
}

pub async fn create_party<S: RecordStore>(store: &mut S, party: &Party) -> Result<(), StoreError> {
    let table = party.kind.table();
    let mut names = vec![table.column(party.kind.id_column())?];
    let mut values = vec![party.id.clone()];
    for (column, value) in party.detail_columns() {
        names.push(table.column(&column)?);
        values.push(value);
    }

    let placeholders: Vec<String> = (1..=names.len()).map(|n| format!("${n}")).collect();
    let statement = values.into_iter().fold(
        Statement::new(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name(),
            names.join(", "),
            placeholders.join(", ")
        )),
        Statement::bind,
    );

    store.execute(&statement).await?;
    info!(kind = %party.kind, id = %party.id, "party created");

    Ok(())
}

/// Overwrite the details of an existing party, returning the rows changed
pub async fn update_party<S: RecordStore>(store: &mut S, party: &Party) -> Result<u64, StoreError> {
    let table = party.kind.table();
    let details = party.detail_columns();

    let mut assignments = Vec::with_capacity(details.len());
    for (i, (column, _)) in details.iter().enumerate() {
        assignments.push(format!("{} = ${}", table.column(column)?, i + 1));
    }
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        table.name(),
        assignments.join(", "),
        party.kind.id_column(),
        details.len() + 1
    );
    let statement = details
        .into_iter()
        .fold(Statement::new(sql), |statement, (_, value)| statement.bind(value))
        .bind(party.id.clone());

    let changed = store.execute(&statement).await?;
    info!(kind = %party.kind, id = %party.id, changed, "party updated");

    Ok(changed)
}

/// Escape LIKE wildcards so a search term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
