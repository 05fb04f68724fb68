pub mod api;
mod prompt;
mod recommender;

pub use prompt::PromptOptions;
pub use recommender::Recommender;
