use std::collections::BTreeMap;
use std::path::Path;

use pdfcontent_parse::{ContentOperation, LopdfDocument, Processor, tokenize};

use crate::cli::OutputFormat;
use crate::shared::{open_pdf, resolve_pages, state_json, state_lines};

/// What running one page's content stream produced.
struct PageReport {
    /// 1-indexed page number.
    page: usize,
    operator_count: usize,
    operators: BTreeMap<String, usize>,
    state_lines: Vec<String>,
    state_json: serde_json::Value,
}

pub fn run(file: &Path, pages: Option<&str>, format: OutputFormat) -> Result<(), i32> {
    let doc = open_pdf(file)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;

    let mut reports = Vec::with_capacity(page_indices.len());
    for idx in page_indices {
        let report = run_page(&doc, idx).map_err(|e| {
            eprintln!("Error: page {}: {e}", idx + 1);
            1
        })?;
        reports.push(report);
    }

    match format {
        OutputFormat::Text => write_text(&reports),
        OutputFormat::Json => write_json(&reports),
    }
    Ok(())
}

fn run_page(doc: &LopdfDocument, idx: usize) -> pdfcontent_parse::Result<PageReport> {
    let content = doc.page_content(idx)?;
    let resources = doc.page_resources(idx)?;
    let operations = tokenize(&content)?;

    let mut processor = Processor::new(&resources);
    processor.process(&operations)?;

    Ok(PageReport {
        page: idx + 1,
        operator_count: operations.len(),
        operators: count_operators(&operations),
        state_lines: state_lines(&processor),
        state_json: state_json(&processor),
    })
}

fn count_operators(operations: &[ContentOperation]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for op in operations {
        *counts.entry(op.name.to_string()).or_insert(0) += 1;
    }
    counts
}

fn write_text(reports: &[PageReport]) {
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("page {}: {} operators", report.page, report.operator_count);
        for (name, count) in &report.operators {
            println!("  {name}\t{count}");
        }
        for line in &report.state_lines {
            println!("  {line}");
        }
    }
}

fn write_json(reports: &[PageReport]) {
    let pages: Vec<serde_json::Value> = reports
        .iter()
        .map(|r| {
            serde_json::json!({
                "page": r.page,
                "operator_count": r.operator_count,
                "operators": r.operators,
                "state": r.state_json,
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&pages).unwrap_or_default()
    );
}
