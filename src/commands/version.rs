use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("lpq version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
