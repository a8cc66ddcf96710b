//! Menu-driven front end.
//!
//! All input validation happens here, before the core is called: paths must
//! point at existing `.pdf` files, expressions and page numbers must match
//! the entry grammar. Typing an exit word at any prompt cancels back to the
//! menu; cancellation is an explicit `None` flowing out of the prompt
//! helpers, not an interrupt.

use anyhow::Result;
use regex::Regex;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::commands::extract::report;
use crate::ops;

const EXIT_WORDS: &[&str] = &["q", "quit", "exit"];

pub fn run() -> Result<()> {
    let range_token = Regex::new(r"^\s*\d+(\s*-\s*\d+)?\s*$")?;
    let integer = Regex::new(r"^-?\d+$")?;

    loop {
        println!();
        println!("outpdf");
        println!("  1) extract a set of pages and ranges from a PDF");
        println!("  2) extract one page range from a PDF");
        println!("  3) extract a single page from a PDF");
        println!("  4) merge PDF files into one");
        println!("  q) quit");

        let Some(choice) = prompt("> ")? else { break };
        match choice.as_str() {
            "" => {}
            "1" => extract_set_flow(&range_token)?,
            "2" => extract_range_flow(&integer)?,
            "3" => extract_page_flow(&integer)?,
            "4" => merge_flow()?,
            other => println!("unknown choice: {}", other),
        }
    }

    println!("bye");
    Ok(())
}

fn extract_set_flow(range_token: &Regex) -> Result<()> {
    let Some(path) = prompt_pdf_path("Input PDF file: ")? else {
        return Ok(());
    };
    let Some(expression) = prompt_expression(range_token)? else {
        return Ok(());
    };

    match ops::extract_set(&path, &expression) {
        Ok(extraction) => report(&extraction),
        Err(e) => eprintln!("error: {}", e),
    }
    Ok(())
}

fn extract_range_flow(integer: &Regex) -> Result<()> {
    let Some(path) = prompt_pdf_path("Input PDF file: ")? else {
        return Ok(());
    };
    let Some(start) = prompt_int("First page: ", integer)? else {
        return Ok(());
    };
    let Some(end) = prompt_int("Last page: ", integer)? else {
        return Ok(());
    };

    match ops::extract_range(&path, start, end) {
        Ok(extraction) => report(&extraction),
        Err(e) => eprintln!("error: {}", e),
    }
    Ok(())
}

fn extract_page_flow(integer: &Regex) -> Result<()> {
    let Some(path) = prompt_pdf_path("Input PDF file: ")? else {
        return Ok(());
    };
    let Some(page) = prompt_int("Page: ", integer)? else {
        return Ok(());
    };

    match ops::extract_single(&path, page) {
        Ok(extraction) => report(&extraction),
        Err(e) => eprintln!("error: {}", e),
    }
    Ok(())
}

fn merge_flow() -> Result<()> {
    list_candidates();

    let mut inputs: Vec<PathBuf> = Vec::new();
    loop {
        let label = format!(
            "PDF file #{} to merge (empty line when done): ",
            inputs.len() + 1
        );
        let Some(answer) = prompt(&label)? else {
            return Ok(());
        };
        let answer = answer.trim_matches('"').to_string();
        if answer.is_empty() {
            if inputs.len() >= 2 {
                break;
            }
            println!("need at least two PDF files to merge");
            continue;
        }
        match validate_pdf_path(&answer) {
            Ok(path) => inputs.push(path),
            Err(reason) => println!("{}", reason),
        }
    }

    let Some(output) = prompt("Output PDF name: ")? else {
        return Ok(());
    };
    let output = output.trim_matches('"').to_string();
    if output.is_empty() {
        return Ok(());
    }

    match ops::merge_documents(&inputs, Path::new(&output)) {
        Ok(written) => println!("Merged {} file(s) into {}", inputs.len(), written.display()),
        Err(e) => eprintln!("error: {}", e),
    }
    Ok(())
}

/// One line from stdin, trimmed. `None` means cancel: end of input or one of
/// the exit words.
fn prompt(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let line = line.trim().to_string();
    if EXIT_WORDS.contains(&line.as_str()) {
        return Ok(None);
    }
    Ok(Some(line))
}

fn prompt_pdf_path(label: &str) -> Result<Option<PathBuf>> {
    list_candidates();
    loop {
        let Some(answer) = prompt(label)? else {
            return Ok(None);
        };
        let answer = answer.trim_matches('"').to_string();
        if answer.is_empty() {
            continue;
        }
        match validate_pdf_path(&answer) {
            Ok(path) => return Ok(Some(path)),
            Err(reason) => println!("{}", reason),
        }
    }
}

fn prompt_expression(range_token: &Regex) -> Result<Option<String>> {
    loop {
        let Some(answer) = prompt("Pages (e.g. 1-5, 8, 18-16): ")? else {
            return Ok(None);
        };
        if !answer.is_empty() && answer.split(',').all(|token| range_token.is_match(token)) {
            return Ok(Some(answer));
        }
        println!("enter comma-separated page numbers and start-end ranges");
    }
}

fn prompt_int(label: &str, integer: &Regex) -> Result<Option<i64>> {
    loop {
        let Some(answer) = prompt(label)? else {
            return Ok(None);
        };
        if integer.is_match(&answer) {
            if let Ok(value) = answer.parse() {
                return Ok(Some(value));
            }
        }
        println!("enter a whole number");
    }
}

fn validate_pdf_path(answer: &str) -> std::result::Result<PathBuf, String> {
    if !answer.to_ascii_lowercase().ends_with(".pdf") {
        return Err(format!("not a PDF file name: {}", answer));
    }
    let path = PathBuf::from(answer);
    if !path.is_file() {
        return Err(format!("no such file: {}", answer));
    }
    Ok(path)
}

/// Show the PDF files sitting in the working directory, like a completer.
fn list_candidates() {
    let mut names: Vec<String> = WalkDir::new(".")
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        .collect();
    names.sort();

    if !names.is_empty() {
        println!("PDF files here: {}", names.join(", "));
    }
}
