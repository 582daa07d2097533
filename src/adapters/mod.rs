// Adapters layer: concrete implementations of the domain ports.

pub mod audit;
pub mod dynamics;
pub mod token;

pub use audit::TracingAuditSink;
pub use dynamics::DynamicsClient;
pub use token::ClientCredentialsTokenProvider;
