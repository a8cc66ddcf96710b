use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "outpdf")]
#[command(about = "Extract page ranges from PDFs and merge PDFs, with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Without a subcommand, outpdf starts its interactive menu.
#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Extract a set of pages and ranges to a new PDF named after them
    #[command(alias = "cat")]
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Pages and ranges (e.g., "1-5, 8, 18-16"; reverse and duplicate
        /// selections are honored)
        pages: String,
    },

    /// Extract one page range; end below start extracts in reverse order
    Range {
        /// PDF file to extract from
        path: PathBuf,

        /// First page (1-based)
        #[arg(allow_negative_numbers = true)]
        start: i64,

        /// Last page, inclusive
        #[arg(allow_negative_numbers = true)]
        end: i64,
    },

    /// Extract a single page
    Page {
        /// PDF file to extract from
        path: PathBuf,

        /// Page number (1-based)
        #[arg(allow_negative_numbers = true)]
        page: i64,
    },

    /// Combine multiple PDFs into one
    Merge {
        /// PDF files to merge, in output order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file name (the name tag is appended)
        #[arg(short, long)]
        output: PathBuf,
    },
}
