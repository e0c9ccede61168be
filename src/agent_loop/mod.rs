//! Turn loop: model call, tool dispatch, repeat until the model stops asking for tools.

pub mod events;
pub mod prompt;
pub mod runner;
pub mod types;

pub use events::*;
pub use prompt::PromptTemplate;
pub use runner::*;
pub use types::*;
