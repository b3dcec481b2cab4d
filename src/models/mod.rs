mod party;
mod project;

pub use party::{Party, PartyKind};
pub use project::{NewProject, Project, ProjectStatus};

#[cfg(test)]
pub(crate) use project::tests::project_row;
