use crate::summary::RepositorySummary;
use crossterm::event::KeyEvent;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    EntityChanged,
    ConfigChanged,
    Refresh,
    SummaryLoaded {
        generation: u64,
        result: Result<Box<RepositorySummary>, String>,
    },
}
