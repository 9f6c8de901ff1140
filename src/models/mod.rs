pub mod todo;
pub mod user;

pub use todo::{CreateTodoRequest, Todo, TodoChanges, TodoStats, UpdateTodoRequest};
pub use user::{NewUser, PublicUser, User};
