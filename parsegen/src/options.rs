/// Settings for the generated program's interaction with its lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Shell command producing the token file. The input path is appended.
    pub lexer_command: String,
    /// File the lexer writes one token record per line to.
    pub token_file: String,
    /// Separates the class, literal and position fields of a record.
    pub delimiter: char,
    /// Token class the lexer emits after the last token.
    pub end_of_input: String,
    /// Name of the variable holding the current token in rule routines.
    pub token_var: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            lexer_command: "cd lexer && make --silent && ./lexer ".to_owned(),
            token_file: "lexer/out.jl".to_owned(),
            delimiter: '\x07',
            end_of_input: "EOF".to_owned(),
            token_var: "next_token".to_owned(),
        }
    }
}
