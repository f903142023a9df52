//! # pagecast MCP Server
//!
//! Implements `ServerHandler` with one MCP tool per pagecast operation plus
//! a status tool. Every tool forwards to the pagecast HTTP API.

use crate::client::{ClientError, PagecastClient};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// MCP SERVER
// =============================================================================

/// MCP server that bridges to a pagecast HTTP API.
#[derive(Clone)]
pub struct PagecastMcp {
    client: PagecastClient,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

// =============================================================================
// TOOL PARAMETER STRUCTS
// =============================================================================

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageParams {
    /// Complete page object.
    #[schemars(description = "Complete page object: { id, title, components }")]
    pub page_config: Value,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddComponentParams {
    /// Component type.
    #[serde(rename = "type")]
    #[schemars(description = "Component type: header, button, text, image, card or list")]
    pub kind: String,
    /// Component properties.
    #[schemars(
        description = "Properties for the type, e.g. text: { content }, header: { text, level }"
    )]
    pub props: Map<String, Value>,
    /// Optional style object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Style object (optional)")]
    pub style: Option<Map<String, Value>>,
    /// Optional parent component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Parent component ID (optional; omitted means root level)")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComponentParams {
    /// Component to update.
    #[schemars(description = "ID of the component to update")]
    pub component_id: String,
    /// Properties to merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Properties to merge over the existing ones")]
    pub props: Option<Map<String, Value>>,
    /// Style keys to merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Style keys to merge over the existing ones")]
    pub style: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveComponentParams {
    /// Component to remove.
    #[schemars(description = "ID of the component to remove, with everything inside it")]
    pub component_id: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreatePageParams {
    /// Page title.
    #[schemars(description = "Page title")]
    pub title: String,
    /// Optional initial components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Initial components (optional)")]
    pub components: Option<Vec<Value>>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPageParams {
    /// Page to show.
    #[schemars(description = "ID of the page to show")]
    pub page_id: String,
}

// =============================================================================
// TOOL IMPLEMENTATIONS
// =============================================================================

#[tool_router]
impl PagecastMcp {
    pub fn new(client: PagecastClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    async fn forward<P: Serialize>(
        &self,
        operation: &str,
        params: &P,
    ) -> Result<CallToolResult, McpError> {
        let params = serde_json::to_value(params)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let resp = self.client.execute(operation, params).await.map_err(mcp_error)?;
        Ok(format_result(&resp))
    }

    #[tool(description = "Replace a whole page configuration")]
    async fn update_page(
        &self,
        params: Parameters<UpdatePageParams>,
    ) -> Result<CallToolResult, McpError> {
        self.forward("update_page", &params.0).await
    }

    #[tool(description = "Add a new component to the page viewers are watching")]
    async fn add_component(
        &self,
        params: Parameters<AddComponentParams>,
    ) -> Result<CallToolResult, McpError> {
        self.forward("add_component", &params.0).await
    }

    #[tool(description = "Update an existing component's properties or style")]
    async fn update_component(
        &self,
        params: Parameters<UpdateComponentParams>,
    ) -> Result<CallToolResult, McpError> {
        self.forward("update_component", &params.0).await
    }

    #[tool(description = "Remove a component and everything nested inside it")]
    async fn remove_component(
        &self,
        params: Parameters<RemoveComponentParams>,
    ) -> Result<CallToolResult, McpError> {
        self.forward("remove_component", &params.0).await
    }

    #[tool(description = "Get the configuration of the page viewers are watching")]
    async fn get_current_page(&self) -> Result<CallToolResult, McpError> {
        self.forward("get_current_page", &serde_json::json!({})).await
    }

    #[tool(description = "Create a new page without switching to it")]
    async fn create_page(
        &self,
        params: Parameters<CreatePageParams>,
    ) -> Result<CallToolResult, McpError> {
        self.forward("create_page", &params.0).await
    }

    #[tool(description = "Switch every viewer to another page")]
    async fn switch_page(
        &self,
        params: Parameters<SwitchPageParams>,
    ) -> Result<CallToolResult, McpError> {
        self.forward("switch_page", &params.0).await
    }

    #[tool(description = "Get server status (connected viewers, page count, current page)")]
    async fn pagecast_status(&self) -> Result<CallToolResult, McpError> {
        let resp = self.client.status().await.map_err(mcp_error)?;
        let data = resp.get("data").unwrap_or(&resp);
        let observers = data
            .get("connectedObservers")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let pages = data.get("totalPages").and_then(|v| v.as_u64()).unwrap_or(0);
        let title = data
            .get("currentPageTitle")
            .and_then(|v| v.as_str())
            .unwrap_or("?");
        let operations = data
            .get("availableOperations")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let text = format!(
            "pagecast Status:\n  Connected viewers: {observers}\n  Pages: {pages}\n  Current page: {title}\n  Operations: {operations}"
        );
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

// =============================================================================
// SERVER HANDLER
// =============================================================================

#[tool_handler]
impl ServerHandler for PagecastMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "pagecast live page server. Use tools to add, update and remove UI \
                 components or switch pages; every connected viewer updates immediately."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// =============================================================================
// RESPONSE FORMATTING
// =============================================================================

fn mcp_error(e: ClientError) -> McpError {
    McpError::internal_error(format!("{e}"), None)
}

/// Turn a result envelope into tool output. `success: false` becomes a tool
/// error so the agent sees the reason.
fn format_result(resp: &Value) -> CallToolResult {
    let success = resp.get("success").and_then(|v| v.as_bool()).unwrap_or(false);
    let message = resp
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("No message");

    if !success {
        let error = resp
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error");
        return CallToolResult::error(vec![Content::text(format!("{message}: {error}"))]);
    }

    let mut text = message.to_string();
    if let Some(data) = resp.get("data") {
        let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
        text.push('\n');
        text.push_str(&pretty);
    }
    CallToolResult::success(vec![Content::text(text)])
}
