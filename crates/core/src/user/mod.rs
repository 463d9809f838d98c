//! User module

mod file_store;
mod model;
mod repository;

pub use file_store::FileUserStore;
pub use model::User;
pub use repository::UserRepository;
