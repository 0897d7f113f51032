use dulce_core::language::parse;

/// Parses without analyzing, so programs the analyzer would reject still dump.
pub fn ast(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ast = parse(source)?;
    println!("{}", serde_json::to_string_pretty(&ast)?);
    Ok(())
}
