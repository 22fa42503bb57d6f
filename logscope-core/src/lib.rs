pub mod cli;
pub mod conf;
pub mod correlation;
pub mod error;
pub mod explorer;
pub mod logging;
pub mod rules;
pub mod schema;
pub mod source;
pub mod time;
pub mod url_state;
pub mod window;

pub use error::{FetchError, ValidationError};
