pub mod algorithm;
pub mod config;
pub mod groups;
pub mod summary;
pub mod view;

pub use algorithm::{Algorithm, Lcom4};
pub use config::Config;
pub use summary::{ClassScore, Summary};
pub use view::{ClassView, LookupError, MethodView};
