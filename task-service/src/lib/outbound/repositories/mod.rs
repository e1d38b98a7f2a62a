pub mod memory;
pub mod task;
pub mod user;

pub use memory::InMemoryTaskRepository;
pub use memory::InMemoryUserRepository;
pub use task::PostgresTaskRepository;
pub use user::PostgresUserRepository;
