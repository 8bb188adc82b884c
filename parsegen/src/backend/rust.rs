use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use super::sanitize;
use crate::bootstrap::TOKENS;
use crate::emit::Emitter;
use crate::program::{Expr, Field, Global, Intrinsic, Routine, RoutineKind, Stmt, Type};

pub(super) const RESERVED: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Renders a single file Rust program.
///
/// The token buffer and every routine live on a `Parser` struct, and `main`
/// runs the entry routine on a default parser.
#[derive(Debug, Default)]
pub struct Rust {
    fields: Vec<TokenStream>,
    entry: Option<Ident>,
}

impl Rust {
    pub fn new() -> Self {
        Rust::default()
    }
}

fn ident(name: &str) -> Ident {
    Ident::new(&sanitize(name, RESERVED), Span::call_site())
}

fn ty(ty: Type) -> TokenStream {
    match ty {
        Type::Str => quote!(String),
        Type::Token => quote!(Token),
        Type::TokenList => quote!(VecDeque<Token>),
    }
}

fn param_ty(ty: Type) -> TokenStream {
    match ty {
        Type::Str => quote!(&str),
        Type::Token => quote!(&Token),
        Type::TokenList => quote!(&VecDeque<Token>),
    }
}

fn field(field: Field) -> Ident {
    let name = match field {
        Field::Class => "class",
        Field::Literal => "literal",
        Field::Position => "position",
    };
    Ident::new(name, Span::call_site())
}

impl Emitter for Rust {
    type Output = TokenStream;
    type Expr = TokenStream;

    fn expr(&mut self, expr: &Expr) -> TokenStream {
        match expr {
            Expr::Str(s) => quote!(#s),
            Expr::Var(name) => {
                let name = ident(name);
                quote!(#name)
            }
            Expr::Argument(i) => quote!(std::env::args().nth(#i).unwrap_or_default()),
            Expr::Call(routine, args) => {
                let routine = ident(routine);
                let args: Vec<_> = args.iter().map(|arg| self.expr(arg)).collect();
                quote!(self.#routine(#(&#args),*))
            }
            Expr::Field(record, f) => {
                let record = self.expr(record);
                let f = field(*f);
                quote!(#record.#f)
            }
            Expr::Eq(a, b) => {
                let (a, b) = (self.expr(a), self.expr(b));
                quote!(#a == #b)
            }
            Expr::Ne(a, b) => {
                let (a, b) = (self.expr(a), self.expr(b));
                quote!(#a != #b)
            }
        }
    }

    fn global(&mut self, global: &Global) -> TokenStream {
        let name = ident(&global.name);
        let ty = ty(global.ty);
        self.fields.push(quote!(#name: #ty));
        TokenStream::new()
    }

    fn routine(&mut self, routine: &Routine, body: Vec<TokenStream>) -> TokenStream {
        let name = ident(&routine.name);
        let docs: Vec<_> = routine
            .body
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Comment(text) => Some(format!(" {}", text)),
                _ => None,
            })
            .collect();
        let params: Vec<_> = routine
            .params
            .iter()
            .map(|param| {
                let name = ident(&param.name);
                let ty = param_ty(param.ty);
                quote!(#name: #ty)
            })
            .collect();
        let returns = routine.returns.map(|t| {
            let t = ty(t);
            quote!(-> #t)
        });
        let vis = if routine.kind == RoutineKind::Entry {
            self.entry = Some(name.clone());
            quote!(pub)
        } else {
            TokenStream::new()
        };

        quote! {
            #( #[doc = #docs] )*
            #vis fn #name(&mut self #(, #params)*) #returns {
                #( #body )*
            }
        }
    }

    /// Comments become doc attributes of the enclosing routine.
    fn comment(&mut self, _text: &str) -> TokenStream {
        TokenStream::new()
    }

    fn declare(&mut self, name: &str, t: Type) -> TokenStream {
        let name = ident(name);
        let t = ty(t);
        quote!(let mut #name: #t;)
    }

    fn assign(&mut self, name: &str, value: TokenStream) -> TokenStream {
        let name = ident(name);
        quote!(#name = #value;)
    }

    fn call(&mut self, routine: &str, args: Vec<TokenStream>) -> TokenStream {
        let routine = ident(routine);
        quote!(self.#routine(#(&#args),*);)
    }

    fn branch(
        &mut self,
        arms: Vec<(TokenStream, Vec<TokenStream>)>,
        otherwise: Option<Vec<TokenStream>>,
    ) -> TokenStream {
        if arms.is_empty() {
            return otherwise
                .map(|body| quote!(#(#body)*))
                .unwrap_or_default();
        }

        let mut tail = otherwise.map(|body| quote!(else { #(#body)* }));
        let mut chain = TokenStream::new();
        for (cond, body) in arms.into_iter().rev() {
            chain = quote!(if #cond { #(#body)* } #tail);
            tail = Some(quote!(else #chain));
        }
        chain
    }

    fn do_return(&mut self, value: Option<TokenStream>) -> TokenStream {
        quote!(return #value;)
    }

    fn intrinsic(&mut self, intrinsic: &Intrinsic) -> TokenStream {
        let tokens = ident(TOKENS);
        match intrinsic {
            Intrinsic::GenerateTokens { command, file } => {
                let file = ident(file);
                quote! {
                    let status = std::process::Command::new("sh")
                        .arg("-c")
                        .arg(format!("{}{}", #command, #file))
                        .status();
                    match status {
                        Ok(status) if status.success() => {}
                        _ => std::process::exit(1),
                    }
                }
            }
            Intrinsic::LoadTokens { path, delimiter } => quote! {
                let text = match std::fs::read_to_string(#path) {
                    Ok(text) => text,
                    Err(_) => std::process::exit(1),
                };
                self.#tokens = text
                    .lines()
                    .map(|line| {
                        let mut fields = line.split(#delimiter).map(String::from);
                        Token {
                            class: fields.next().unwrap_or_default(),
                            literal: fields.next().unwrap_or_default(),
                            position: fields.next().unwrap_or_default(),
                        }
                    })
                    .collect();
            },
            Intrinsic::Peek => quote! {
                return self.#tokens.front().cloned().unwrap_or_default();
            },
            Intrinsic::GetToken => quote! {
                return self.#tokens.pop_front().unwrap_or_default();
            },
            Intrinsic::Expect { position, expected } => {
                let position = ident(position);
                let expected = ident(expected);
                quote! {
                    eprintln!("Error: line {} - expected {}", #position, #expected);
                    std::process::exit(1);
                }
            }
            Intrinsic::RequireArguments { count } => {
                let count = count + 1;
                quote! {
                    if std::env::args().len() < #count {
                        eprintln!("usage: parser FILE");
                        std::process::exit(1);
                    }
                }
            }
        }
    }

    fn finish(&mut self, items: Vec<TokenStream>) -> String {
        let fields = &self.fields;
        let main = self.entry.as_ref().map(|entry| {
            quote! {
                fn main() {
                    Parser::default().#entry();
                }
            }
        });

        let program = quote! {
            use std::collections::VecDeque;

            #[derive(Debug, Clone, Default)]
            struct Token {
                class: String,
                literal: String,
                position: String,
            }

            #[derive(Debug, Default)]
            struct Parser {
                #( #fields ),*
            }

            #[allow(unused_assignments, unused_mut, dead_code, non_snake_case)]
            impl Parser {
                #( #items )*
            }

            #main
        };
        program.to_string()
    }
}
