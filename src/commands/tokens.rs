use dulce_core::language::tokenize;
use dulce_core::language::token::Token;

fn describe(token: &Token) -> String {
    format!("{} {} @{}:{}", token.kind, token.text, token.line, token.column)
}

pub fn tokens(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    for token in tokenize(source)? {
        println!("{}", describe(&token));
    }
    Ok(())
}
