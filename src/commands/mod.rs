use std::fs;
use std::io::Read;

pub mod ast;
pub mod check;
pub mod run;
pub mod tokens;

/// Reads a program from `path`, or from stdin when `path` is `-`.
pub fn read_source(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| format!("No se pudo leer la entrada estándar: {}", e))?;
        return Ok(source);
    }

    let source = fs::read_to_string(path)
        .map_err(|e| format!("No se pudo leer el archivo '{}': {}", path, e))?;
    Ok(source)
}
