use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use std::sync::Arc;

use crate::config::Config;
use crate::tools::{FunctionMapper, MapFunctionsRequest, NotebookReader, ReadNotebookRequest};

const INSTRUCTIONS: &str = "Read Jupyter notebooks as flat text for analysis.\n\n\
    Use `read_notebook` to render a notebook's cells as delimited text blocks, \
    optionally narrowed by keywords, a half-open cell index range, and error \
    presence. Use `map_functions` to locate the cell defining each function. \
    Failures are reported in the response text with the prefix \
    \"Error reading notebook: \".";

/// The MCP-facing tool handler. Owns the tools and a router over them;
/// built once at startup and shared by every request.
#[derive(Clone)]
pub struct NotebookServer {
    reader: Arc<NotebookReader>,
    mapper: Arc<FunctionMapper>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl NotebookServer {
    pub fn new(config: &Config) -> Self {
        Self {
            reader: Arc::new(NotebookReader::new(config.clone())),
            mapper: Arc::new(FunctionMapper::new(config.clone())),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Reads a Jupyter Notebook (.ipynb) and returns a formatted text representation for LLM analysis. Filters are optional and can be combined."
    )]
    async fn read_notebook(
        &self,
        Parameters(request): Parameters<ReadNotebookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.reader.respond(request).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Maps every function defined in a Jupyter Notebook (.ipynb) to the index of the cell that defines it."
    )]
    async fn map_functions(
        &self,
        Parameters(request): Parameters<MapFunctionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.mapper.respond(request).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for NotebookServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
