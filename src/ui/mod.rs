//! The summarization form: its state machine, the completers that feed it,
//! and the HTML it renders to.

pub mod completion;
pub mod form;
pub mod page;

pub use completion::{Completer, Completion, CompletionError, CompletionOptions, LocalCompleter, StreamProtocol};
pub use form::{FormView, Phase, SummaryForm};
pub use page::render_page;
