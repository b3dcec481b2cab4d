//! Project deletion with per-party cascade decisions.
//!
//! Every party of the project is looked at on its own. A party no other
//! project references is deleted with the project; a shared party is only
//! deleted when the user confirms. Decisions are collected first, then the
//! party deletes and the project delete run inside one transaction.

use std::io::{BufRead, Write};

use tracing::{error, info, warn};

use crate::db::{records, RecordStore, Statement, Table};
use crate::error::{AppError, StoreError};
use crate::models::PartyKind;
use crate::references::count_references;
use crate::session::Session;

/// What happened to one party of a deleted project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyDisposition {
    Deleted,
    /// Shared with other projects and the user declined
    Preserved,
    /// Delete was issued but no party row carried the id
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyOutcome {
    pub kind: PartyKind,
    pub id: String,
    pub references: u64,
    pub disposition: PartyDisposition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// No project carries this number; nothing was touched
    NotFound(i64),
    Deleted { project: i64, parties: Vec<PartyOutcome> },
}

struct PartyPlan {
    kind: PartyKind,
    id: String,
    references: u64,
    delete: bool,
}

fn confirmation_prompt(kind: PartyKind) -> String {
    format!(
        "The {kind} is associated with multiple projects. Do you also wish to delete the {kind}? (true/false): "
    )
}

/// Delete project `number` and, party by party, the records it points at
pub async fn delete_project<S, R, W>(
    session: &mut Session<S, R, W>,
    number: i64,
) -> Result<DeletionOutcome, AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let Some(project) = records::get_project(&mut session.store, number).await? else {
        info!(number, "project not found, nothing deleted");
        return Ok(DeletionOutcome::NotFound(number));
    };

    let mut plan = Vec::with_capacity(3);
    for (kind, id) in project.party_ids() {
        let references = count_references(&mut session.store, Table::Projects, kind.id_column(), id).await?;
        // 0 cannot happen while this project exists, treat it like 1
        let delete = if references > 1 {
            session.console.boolean(&confirmation_prompt(kind))?
        } else {
            true
        };
        plan.push(PartyPlan {
            kind,
            id: id.to_owned(),
            references,
            delete,
        });
    }

    session.store.begin().await?;
    match apply(&mut session.store, number, &plan).await {
        Ok(parties) => {
            session.store.commit().await?;
            info!(number, "project deleted");
            Ok(DeletionOutcome::Deleted {
                project: number,
                parties,
            })
        }
        Err(err) => {
            warn!(number, error = %err, "project deletion failed, rolling back");
            if let Err(rollback_err) = session.store.rollback().await {
                error!(number, error = %rollback_err, "rollback failed");
            }
            Err(err.into())
        }
    }
}

/// Party deletes first, then the project row
async fn apply<S: RecordStore>(
    store: &mut S,
    number: i64,
    plan: &[PartyPlan],
) -> Result<Vec<PartyOutcome>, StoreError> {
    let mut parties = Vec::with_capacity(plan.len());

    for party in plan {
        let disposition = if party.delete {
            let statement = Statement::delete_where(party.kind.table(), party.kind.id_column(), party.id.as_str())?;
            match store.execute(&statement).await? {
                0 => PartyDisposition::Missing,
                _ => PartyDisposition::Deleted,
            }
        } else {
            PartyDisposition::Preserved
        };

        parties.push(PartyOutcome {
            kind: party.kind,
            id: party.id.clone(),
            references: party.references,
            disposition,
        });
    }

    store
        .execute(&Statement::delete_where(Table::Projects, "project_number", number)?)
        .await?;

    Ok(parties)
}
