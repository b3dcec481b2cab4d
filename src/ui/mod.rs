pub mod display;
pub mod parties;
pub mod projects;

use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;
use tracing::{error, info};

use crate::db::RecordStore;
use crate::error::AppError;
use crate::input::Console;
use crate::models::PartyKind;
use crate::session::Session;

/// Menu entries, in the order they are numbered on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ViewProjects,
    ViewParties(PartyKind),
    FinaliseProject,
    IncompleteProjects,
    OverdueProjects,
    SearchProjects,
    UpdateProject,
    UpdateParty(PartyKind),
    AddProject,
    AddParty(PartyKind),
    DeleteProject,
    Exit,
}

const MENU: [(MenuAction, &str); 18] = [
    (MenuAction::ViewProjects, "View All Projects"),
    (MenuAction::ViewParties(PartyKind::Customer), "View All Customers"),
    (MenuAction::ViewParties(PartyKind::Architect), "View All Architects"),
    (MenuAction::ViewParties(PartyKind::Contractor), "View All Contractors"),
    (MenuAction::FinaliseProject, "Finalise Project"),
    (MenuAction::IncompleteProjects, "Find Incomplete Projects"),
    (MenuAction::OverdueProjects, "Find Overdue Projects"),
    (MenuAction::SearchProjects, "Search Projects"),
    (MenuAction::UpdateProject, "Update Project Details"),
    (MenuAction::UpdateParty(PartyKind::Customer), "Update Customer Details"),
    (MenuAction::UpdateParty(PartyKind::Architect), "Update Architect Details"),
    (MenuAction::UpdateParty(PartyKind::Contractor), "Update Contractor Details"),
    (MenuAction::AddProject, "Add New Project"),
    (MenuAction::AddParty(PartyKind::Customer), "Add New Customer"),
    (MenuAction::AddParty(PartyKind::Architect), "Add New Architect"),
    (MenuAction::AddParty(PartyKind::Contractor), "Add New Contractor"),
    (MenuAction::DeleteProject, "Delete Project"),
    (MenuAction::Exit, "Exit Programme"),
];

// Blank line after these entries groups the menu
const GROUP_ENDS: [usize; 4] = [4, 8, 12, 16];

impl MenuAction {
    /// Action for a 1-based menu number
    pub fn from_choice(choice: u64) -> Option<Self> {
        let index = usize::try_from(choice).ok()?.checked_sub(1)?;
        MENU.get(index).map(|(action, _)| *action)
    }
}

fn render_menu<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<()> {
    console.say("")?;
    console.say("Poised Project Management System Menu:".bold())?;
    for (i, (_, label)) in MENU.iter().enumerate() {
        let number = i + 1;
        console.say(format!("{number}. {label}"))?;
        if GROUP_ENDS.contains(&number) {
            console.say("")?;
        }
    }
    console.say("")
}

async fn dispatch<S, R, W>(session: &mut Session<S, R, W>, action: MenuAction) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    match action {
        MenuAction::ViewProjects => projects::view_all(session).await,
        MenuAction::ViewParties(kind) => parties::view_all(session, kind).await,
        MenuAction::FinaliseProject => projects::finalise(session).await,
        MenuAction::IncompleteProjects => projects::view_incomplete(session).await,
        MenuAction::OverdueProjects => {
            let today = chrono::Local::now().date_naive();
            projects::view_overdue(session, today).await
        }
        MenuAction::SearchProjects => projects::search(session).await,
        MenuAction::UpdateProject => projects::update(session).await,
        MenuAction::UpdateParty(kind) => parties::update(session, kind).await,
        MenuAction::AddProject => projects::add(session).await,
        MenuAction::AddParty(kind) => parties::add(session, kind).await,
        MenuAction::DeleteProject => projects::delete(session).await,
        MenuAction::Exit => Ok(()),
    }
}

/// Main menu loop; returns when the user exits.
///
/// A store failure aborts only the current action and is reported before
/// the menu comes back. Console failures end the loop.
pub async fn run<S, R, W>(session: &mut Session<S, R, W>) -> Result<(), AppError>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    loop {
        render_menu(&mut session.console)?;
        let choice = session
            .console
            .choice("Enter your option: ", 1, MENU.len() as u64)?;
        let Some(action) = MenuAction::from_choice(choice) else {
            continue;
        };

        if action == MenuAction::Exit {
            session.console.say("Exiting Poised Project Management System...")?;
            info!("session ended by user");
            return Ok(());
        }

        if let Err(err) = dispatch(session, action).await {
            if err.is_fatal() {
                return Err(err);
            }
            error!(?action, error = %err, "menu action failed");
            session.console.say(format!("Error: {err}").red())?;
        }
    }
}
