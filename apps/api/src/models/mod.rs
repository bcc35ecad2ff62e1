pub mod aspect;
pub mod recommendation;
pub mod trend;
pub mod user;
