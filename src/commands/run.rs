use dulce_core::compile_code;
use dulce_core::language::InterpreterOptions;
use log::debug;

pub fn run(source: &str, options: InterpreterOptions, show_ast: bool) -> Result<(), Box<dyn std::error::Error>> {
    debug!("Ejecutando con {:?}, show_ast: {}", options, show_ast);

    let compiled = compile_code(source, options)?;
    let rendered = compiled.render(show_ast)?;

    if rendered.ends_with('\n') {
        print!("{}", rendered);
    } else {
        println!("{}", rendered);
    }
    Ok(())
}
