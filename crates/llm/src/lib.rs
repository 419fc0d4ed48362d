pub mod provider;
pub mod providers;
pub mod query;

pub use provider::{GenerateError, GenerationRequest, Message, QueryProvider, Role};
pub use providers::create_provider;
pub use query::{GeneratedQuery, QueryService};
