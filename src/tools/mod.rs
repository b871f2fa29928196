pub mod function_mapper;
pub mod notebook_reader;

pub use function_mapper::{FunctionMapper, MapFunctionsRequest};
pub use notebook_reader::{NotebookReader, ReadNotebookRequest};

use anyhow::Result;

/// Error-string prefix of the in-band failure contract shared by every
/// tool response. Callers detect failure by matching this prefix.
pub const ERROR_PREFIX: &str = "Error reading notebook: ";

/// Tool trait for server-invoked operations.
///
/// Not object-safe (associated types) — intentional.
/// The server calls tools by concrete type, not `dyn Tool`.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    type Input: Send;
    type Output: Send;

    fn name(&self) -> &str;
    async fn run(&self, input: Self::Input) -> Result<Self::Output>;
}
