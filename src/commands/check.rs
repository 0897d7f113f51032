use dulce_core::check_code;

pub fn check(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ast = check_code(source)?;
    log::info!("Análisis correcto: {} declaraciones", ast.len());
    println!("OK");
    Ok(())
}
