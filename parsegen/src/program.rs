//! Abstract parsing program produced by synthesis and consumed by back ends.

/// Value types a back end must be able to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Str,
    /// A single token record.
    Token,
    /// The mutable token buffer.
    TokenList,
}

/// Fields of a token record, in lexer output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Class,
    Literal,
    Position,
}

impl Field {
    /// Position of the field in a lexer record.
    pub fn index(self) -> usize {
        match self {
            Field::Class => 0,
            Field::Literal => 1,
            Field::Position => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Str(String),
    Var(String),
    /// A command line argument of the generated program.
    Argument(usize),
    Call(String, Vec<Expr>),
    Field(Box<Expr>, Field),
    Eq(Box<Expr>, Box<Expr>),
    Ne(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn str(s: impl Into<String>) -> Expr {
        Expr::Str(s.into())
    }

    pub fn var(name: impl Into<String>) -> Expr {
        Expr::Var(name.into())
    }

    pub fn call(routine: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Call(routine.into(), args)
    }

    pub fn field(self, field: Field) -> Expr {
        Expr::Field(Box::new(self), field)
    }

    pub fn equals(self, other: Expr) -> Expr {
        Expr::Eq(Box::new(self), Box::new(other))
    }

    pub fn differs(self, other: Expr) -> Expr {
        Expr::Ne(Box::new(self), Box::new(other))
    }
}

/// Grammar independent operations whose bodies each back end writes natively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intrinsic {
    /// Run the lexer command with the file parameter appended, exiting the
    /// process if it fails.
    GenerateTokens { command: String, file: String },
    /// Replace the token buffer with the records in `path`.
    LoadTokens { path: String, delimiter: char },
    /// Return the front token without removing it, or an empty record.
    Peek,
    /// Remove and return the front token, or an empty record.
    GetToken,
    /// Report the expected input at a position and exit the process.
    Expect { position: String, expected: String },
    /// Exit with a usage message unless at least `count` arguments were given.
    RequireArguments { count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Comment(String),
    Declare { name: String, ty: Type },
    Assign { name: String, value: Expr },
    Call { routine: String, args: Vec<Expr> },
    /// Tried in order. A missing `otherwise` does nothing when no arm matches.
    If {
        arms: Vec<(Expr, Vec<Stmt>)>,
        otherwise: Option<Vec<Stmt>>,
    },
    /// Diagnostic for a mismatch, terminating the generated program.
    Expect { position: Expr, expected: String },
    Return(Option<Expr>),
    Intrinsic(Intrinsic),
}

impl Stmt {
    pub fn call(routine: impl Into<String>) -> Stmt {
        Stmt::Call {
            routine: routine.into(),
            args: Vec::new(),
        }
    }

    /// Returns whether this statement, or any nested in it, assigns `var`.
    pub fn assigns(&self, var: &str) -> bool {
        match self {
            Stmt::Assign { name, .. } => name == var,
            Stmt::If { arms, otherwise } => {
                arms.iter()
                    .any(|(_, body)| body.iter().any(|s| s.assigns(var)))
                    || otherwise
                        .iter()
                        .any(|body| body.iter().any(|s| s.assigns(var)))
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineKind {
    Bootstrap,
    Rule,
    /// The generated program's entry point.
    Entry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Param {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    pub name: String,
    pub kind: RoutineKind,
    pub params: Vec<Param>,
    pub returns: Option<Type>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Global {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Global(Global),
    Routine(Routine),
}

/// A complete generated parser, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn routines(&self) -> impl Iterator<Item = &Routine> {
        self.items.iter().filter_map(|item| match item {
            Item::Routine(routine) => Some(routine),
            Item::Global(_) => None,
        })
    }

    pub fn routine(&self, name: &str) -> Option<&Routine> {
        self.routines().find(|routine| routine.name == name)
    }

    pub fn entry(&self) -> Option<&Routine> {
        self.routines()
            .find(|routine| routine.kind == RoutineKind::Entry)
    }
}
