use std::path::Path;

use pdfcontent_parse::{Processor, ResourceDictionary};

use crate::cli::OutputFormat;
use crate::shared::{read_operations, state_json, state_lines};

pub fn run(file: &Path, format: OutputFormat) -> Result<(), i32> {
    let operations = read_operations(file)?;

    // A bare stream has no page, so named resources never resolve.
    let resources = ResourceDictionary::default();
    let mut processor = Processor::new(&resources);
    processor.process(&operations).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    match format {
        OutputFormat::Text => {
            for line in state_lines(&processor) {
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            let json = state_json(&processor);
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        }
    }
    Ok(())
}
