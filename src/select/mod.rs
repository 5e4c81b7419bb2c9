pub mod prompt;
pub mod resolver;
pub mod selection;

pub use prompt::{Prompter, TerminalPrompter};
pub use resolver::{print_heading, resolve_networks, resolve_organization, status_suffix};
pub use selection::SelectionError;
