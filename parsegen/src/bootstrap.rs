//! Routines every generated parser carries regardless of its grammar.

use crate::options::Options;
use crate::program::{Expr, Field, Global, Intrinsic, Item, Param, Routine, RoutineKind, Stmt, Type};

pub const TOKENS: &str = "tokens";
pub const GENERATE_TOKENS: &str = "generate_tokens";
pub const LOAD_TOKENS: &str = "load_tokens";
pub const PEEK: &str = "peek";
pub const GET_TOKEN: &str = "get_token";
pub const EXPECT: &str = "expect";
pub const PARSE: &str = "parse";
pub const MAIN: &str = "main";

const FILE: &str = "file";
const FILENAME: &str = "filename";
const POSITION: &str = "position";
const EXPECTED: &str = "expected";

/// Names no rule may take: the bootstrap routines and their variables. The
/// configured token variable is reserved as well.
pub const RESERVED: &[&str] = &[
    TOKENS,
    GENERATE_TOKENS,
    LOAD_TOKENS,
    PEEK,
    GET_TOKEN,
    EXPECT,
    PARSE,
    MAIN,
    FILE,
    FILENAME,
    POSITION,
    EXPECTED,
];

fn bootstrap(name: &str, params: Vec<Param>, returns: Option<Type>, body: Intrinsic) -> Item {
    Item::Routine(Routine {
        name: name.to_owned(),
        kind: RoutineKind::Bootstrap,
        params,
        returns,
        body: vec![Stmt::Intrinsic(body)],
    })
}

/// The token buffer and the routines operating on it.
pub fn prelude(options: &Options) -> Vec<Item> {
    vec![
        Item::Global(Global {
            name: TOKENS.to_owned(),
            ty: Type::TokenList,
        }),
        bootstrap(
            GENERATE_TOKENS,
            vec![Param::new(FILE, Type::Str)],
            None,
            Intrinsic::GenerateTokens {
                command: options.lexer_command.clone(),
                file: FILE.to_owned(),
            },
        ),
        bootstrap(
            LOAD_TOKENS,
            Vec::new(),
            None,
            Intrinsic::LoadTokens {
                path: options.token_file.clone(),
                delimiter: options.delimiter,
            },
        ),
        bootstrap(PEEK, Vec::new(), Some(Type::Token), Intrinsic::Peek),
        bootstrap(GET_TOKEN, Vec::new(), Some(Type::Token), Intrinsic::GetToken),
        bootstrap(
            EXPECT,
            vec![
                Param::new(POSITION, Type::Str),
                Param::new(EXPECTED, Type::Str),
            ],
            None,
            Intrinsic::Expect {
                position: POSITION.to_owned(),
                expected: EXPECTED.to_owned(),
            },
        ),
    ]
}

/// Tokenizes the given file and parses it from the start rule.
pub fn parse(start: &str) -> Item {
    Item::Routine(Routine {
        name: PARSE.to_owned(),
        kind: RoutineKind::Bootstrap,
        params: vec![Param::new(FILE, Type::Str)],
        returns: None,
        body: vec![
            Stmt::Call {
                routine: GENERATE_TOKENS.to_owned(),
                args: vec![Expr::var(FILE)],
            },
            Stmt::call(LOAD_TOKENS),
            Stmt::call(start),
        ],
    })
}

/// Parses the file named by the first argument, then requires that all
/// input was consumed.
pub fn main(options: &Options) -> Item {
    let token = || Expr::var(&options.token_var);
    Item::Routine(Routine {
        name: MAIN.to_owned(),
        kind: RoutineKind::Entry,
        params: Vec::new(),
        returns: None,
        body: vec![
            Stmt::Intrinsic(Intrinsic::RequireArguments { count: 1 }),
            Stmt::Declare {
                name: FILENAME.to_owned(),
                ty: Type::Str,
            },
            Stmt::Assign {
                name: FILENAME.to_owned(),
                value: Expr::Argument(1),
            },
            Stmt::Call {
                routine: PARSE.to_owned(),
                args: vec![Expr::var(FILENAME)],
            },
            Stmt::Declare {
                name: options.token_var.clone(),
                ty: Type::Token,
            },
            Stmt::Assign {
                name: options.token_var.clone(),
                value: Expr::call(GET_TOKEN, Vec::new()),
            },
            Stmt::If {
                arms: vec![(
                    token()
                        .field(Field::Class)
                        .differs(Expr::str(&options.end_of_input)),
                    vec![Stmt::Expect {
                        position: token().field(Field::Position),
                        expected: options.end_of_input.clone(),
                    }],
                )],
                otherwise: None,
            },
        ],
    })
}
