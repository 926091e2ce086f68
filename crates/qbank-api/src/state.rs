//! Application state shared across handlers.

use qbank_core::Config;
use qbank_db::{QuestionRepository, UserRepository};
use qbank_storage::FileLocator;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub questions: QuestionRepository,
    pub users: UserRepository,
    pub locator: FileLocator,
}
