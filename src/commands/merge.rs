use crate::ops;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<()> {
    let output = ops::merge_documents(inputs, output)?;
    println!(
        "Merged {} file(s) into {}",
        inputs.len(),
        output.display()
    );
    Ok(())
}
