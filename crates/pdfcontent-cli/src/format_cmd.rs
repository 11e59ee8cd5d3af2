use std::io::{self, Write};
use std::path::Path;

use pdfcontent_parse::{Serializer, serialize_operations};

use crate::shared::read_operations;

pub fn run(file: &Path) -> Result<(), i32> {
    let operations = read_operations(file)?;
    let bytes = serialize_operations(&operations, &Serializer::new()).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&bytes)
        .and_then(|()| stdout.flush())
        .map_err(|e| {
            eprintln!("Error: failed to write output: {e}");
            1
        })
}
