use std::io::{self, BufRead, Write};

use crate::db::{records, RecordStore};
use crate::error::AppError;
use crate::input::Console;
use crate::models::{Party, PartyKind};
use crate::session::Session;
use crate::ui::display::print_parties;

/// Prompt for every field but the id, which the caller already has
fn read_party_details<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    kind: PartyKind,
    id: String,
) -> io::Result<Party> {
    let (name, surname) = match kind {
        PartyKind::Customer => (console.text("First Name: ")?, Some(console.text("Surname: ")?)),
        _ => (console.text("Name: ")?, None),
    };

    Ok(Party {
        kind,
        id,
        name,
        surname,
        telephone: console.digits("Telephone Number: ")?,
        email: console.text("Email: ")?,
        address: console.text("Address: ")?,
    })
}

pub async fn view_all<S, R, W>(session: &mut Session<S, R, W>, kind: PartyKind) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let parties = records::get_parties(&mut session.store, kind).await?;
    print_parties(&mut session.console, kind, &parties)?;
    Ok(())
}

pub async fn add<S, R, W>(session: &mut Session<S, R, W>, kind: PartyKind) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let label = kind.label();
    session
        .console
        .say(format!("Enter details for the new {kind}:"))?;
    let id = session.console.text(&format!("{label} ID: "))?;

    // Ids are chosen by the user, so clashes are caught before the insert
    if records::get_party(&mut session.store, kind, &id).await?.is_some() {
        session
            .console
            .say(format!("{label} record {id} already exists."))?;
        return Ok(());
    }

    let party = read_party_details(&mut session.console, kind, id)?;
    records::create_party(&mut session.store, &party).await?;
    session
        .console
        .say(format!("New {kind} record {} successfully added!", party.id))?;
    Ok(())
}

pub async fn update<S, R, W>(session: &mut Session<S, R, W>, kind: PartyKind) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let label = kind.label();
    let id = session
        .console
        .text(&format!("Enter ID of the {kind} to update: "))?;

    if records::get_party(&mut session.store, kind, &id).await?.is_none() {
        session.console.say(format!("{label} record not found."))?;
        return Ok(());
    }

    session
        .console
        .say(format!("Update details for {kind} record {id}: "))?;
    let party = read_party_details(&mut session.console, kind, id)?;
    records::update_party(&mut session.store, &party).await?;
    session
        .console
        .say(format!("{label} record {} successfully updated!", party.id))?;
    Ok(())
}
