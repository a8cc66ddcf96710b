use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ops::{self, Extraction};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExtractSetRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Pages and ranges (e.g., '1-5, 8, 18-16'; reverse and duplicate selections are honored)")]
    pub pages: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExtractRangeRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "First page, 1-based")]
    pub start: i64,
    #[schemars(description = "Last page, inclusive; below start extracts in reverse order")]
    pub end: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExtractPageRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page number, 1-based")]
    pub page: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MergeRequest {
    #[schemars(description = "PDF files to merge, in output order")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file name (the name tag is appended)")]
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Extract a set of pages and ranges from a PDF into a new file named after the selection. Reversed ranges (e.g. '18-16') and duplicates are honored.")]
    fn pdf_extract_set(
        &self,
        Parameters(ExtractSetRequest { path, pages }): Parameters<ExtractSetRequest>,
    ) -> String {
        match ops::extract_set(Path::new(&path), &pages) {
            Ok(extraction) => render_extraction(&extraction),
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Extract one page range from a PDF; an end below the start extracts in reverse order")]
    fn pdf_extract_range(
        &self,
        Parameters(ExtractRangeRequest { path, start, end }): Parameters<ExtractRangeRequest>,
    ) -> String {
        match ops::extract_range(Path::new(&path), start, end) {
            Ok(extraction) => render_extraction(&extraction),
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Extract a single page from a PDF into a new file")]
    fn pdf_extract_page(
        &self,
        Parameters(ExtractPageRequest { path, page }): Parameters<ExtractPageRequest>,
    ) -> String {
        match ops::extract_single(Path::new(&path), page) {
            Ok(extraction) => render_extraction(&extraction),
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Combine multiple PDFs into one, in the given order; listing a file twice duplicates its pages")]
    fn pdf_merge(
        &self,
        Parameters(MergeRequest { inputs, output }): Parameters<MergeRequest>,
    ) -> String {
        let inputs: Vec<PathBuf> = inputs.into_iter().map(PathBuf::from).collect();
        match ops::merge_documents(&inputs, Path::new(&output)) {
            Ok(written) => {
                let result = MergeResult {
                    output_path: written.display().to_string(),
                    input_count: inputs.len(),
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

fn render_extraction(extraction: &Extraction) -> String {
    let result = ExtractionResult {
        output_path: extraction.output.display().to_string(),
        page_count: extraction.pages,
        skipped_selections: extraction.skipped.iter().map(|s| s.to_string()).collect(),
    };
    serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExtractionResult {
    pub output_path: String,
    pub page_count: usize,
    pub skipped_selections: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MergeResult {
    pub output_path: String,
    pub input_count: usize,
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page extraction and merging tools. Use pdf_extract_set for \
                 multi-range selections like '1-5, 8, 18-16', pdf_extract_range and \
                 pdf_extract_page for simple extractions, and pdf_merge to combine \
                 files. Output files are named after the request and land next to \
                 the inputs."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
