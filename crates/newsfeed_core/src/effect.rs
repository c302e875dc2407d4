use crate::{DisplayCommand, FetchTicket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run one feed source call for the ticket's context.
    Fetch(FetchTicket),
    Display(DisplayCommand),
}
