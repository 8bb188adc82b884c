use indexmap::IndexSet;

use super::sanitize;
use crate::bootstrap::TOKENS;
use crate::emit::Emitter;
use crate::program::{Expr, Global, Intrinsic, Routine, RoutineKind, Type};

/// Keywords, plus names the generated module relies on.
pub(super) const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield", "len", "open", "print", "str", "List", "subprocess", "sys", "__name__",
];

const TYPING: &str = "from typing import List";
const SUBPROCESS: &str = "import subprocess";
const SYS: &str = "import sys";

/// Renders a tab indented Python 3 module.
///
/// Each fragment is one or more lines of source, indented relative to its
/// parent.
#[derive(Debug, Default)]
pub struct Python {
    imports: IndexSet<&'static str>,
    entry: Option<String>,
}

impl Python {
    pub fn new() -> Self {
        Python::default()
    }

    fn type_name(&mut self, ty: Type) -> &'static str {
        match ty {
            Type::Str => "str",
            Type::Token => {
                self.imports.insert(TYPING);
                "List[str]"
            }
            Type::TokenList => {
                self.imports.insert(TYPING);
                "List[List[str]]"
            }
        }
    }
}

fn ident(name: &str) -> String {
    sanitize(name, RESERVED)
}

fn indent(fragment: &str) -> String {
    fragment
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("\t{}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn block(body: Vec<String>) -> String {
    let body: Vec<_> = body.into_iter().filter(|s| !s.is_empty()).collect();
    if body.is_empty() {
        return "\tpass".to_owned();
    }
    body.iter().map(|s| indent(s)).collect::<Vec<_>>().join("\n")
}

/// A double quoted string literal.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl Emitter for Python {
    type Output = String;
    type Expr = String;

    fn expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Str(s) => quote(s),
            Expr::Var(name) => ident(name),
            Expr::Argument(i) => {
                self.imports.insert(SYS);
                format!("sys.argv[{}]", i)
            }
            Expr::Call(routine, args) => {
                let args: Vec<_> = args.iter().map(|arg| self.expr(arg)).collect();
                format!("{}({})", ident(routine), args.join(", "))
            }
            Expr::Field(record, field) => format!("{}[{}]", self.expr(record), field.index()),
            Expr::Eq(a, b) => format!("{} == {}", self.expr(a), self.expr(b)),
            Expr::Ne(a, b) => format!("{} != {}", self.expr(a), self.expr(b)),
        }
    }

    fn global(&mut self, global: &Global) -> String {
        let init = match global.ty {
            Type::Str => "\"\"",
            Type::Token => "[\"\", \"\", \"\"]",
            Type::TokenList => "[]",
        };
        format!("{}: {} = {}", ident(&global.name), self.type_name(global.ty), init)
    }

    fn routine(&mut self, routine: &Routine, body: Vec<String>) -> String {
        let name = ident(&routine.name);
        if routine.kind == RoutineKind::Entry {
            self.entry = Some(name.clone());
        }
        let params: Vec<_> = routine
            .params
            .iter()
            .map(|param| format!("{}: {}", ident(&param.name), self.type_name(param.ty)))
            .collect();
        let returns = match routine.returns {
            Some(ty) => format!(" -> {}", self.type_name(ty)),
            None => String::new(),
        };
        format!(
            "def {}({}){}:\n{}",
            name,
            params.join(", "),
            returns,
            block(body)
        )
    }

    fn comment(&mut self, text: &str) -> String {
        format!("# {}", text)
    }

    fn declare(&mut self, name: &str, ty: Type) -> String {
        format!("{}: {}", ident(name), self.type_name(ty))
    }

    fn assign(&mut self, name: &str, value: String) -> String {
        format!("{} = {}", ident(name), value)
    }

    fn call(&mut self, routine: &str, args: Vec<String>) -> String {
        format!("{}({})", ident(routine), args.join(", "))
    }

    fn branch(&mut self, arms: Vec<(String, Vec<String>)>, otherwise: Option<Vec<String>>) -> String {
        if arms.is_empty() {
            return otherwise.map(|body| body.join("\n")).unwrap_or_default();
        }
        let mut out = Vec::new();
        for (i, (cond, body)) in arms.into_iter().enumerate() {
            let keyword = if i == 0 { "if" } else { "elif" };
            out.push(format!("{} {}:", keyword, cond));
            out.push(block(body));
        }
        if let Some(body) = otherwise {
            out.push("else:".to_owned());
            out.push(block(body));
        }
        out.join("\n")
    }

    fn do_return(&mut self, value: Option<String>) -> String {
        match value {
            Some(value) => format!("return {}", value),
            None => "return".to_owned(),
        }
    }

    fn intrinsic(&mut self, intrinsic: &Intrinsic) -> String {
        match intrinsic {
            Intrinsic::GenerateTokens { command, file } => {
                self.imports.insert(SUBPROCESS);
                self.imports.insert(SYS);
                format!(
                    "response = subprocess.run({} + {}, shell=True)\n\
                     if response.returncode != 0:\n\
                     \tsys.exit(1)",
                    quote(command),
                    ident(file)
                )
            }
            Intrinsic::LoadTokens { path, delimiter } => format!(
                "global {tokens}\n\
                 with open({}) as f:\n\
                 \t{tokens} = [line.split({}) for line in f.read().splitlines()]",
                quote(path),
                quote(&delimiter.to_string()),
                tokens = TOKENS
            ),
            Intrinsic::Peek => format!(
                "if len({tokens}) > 0:\n\
                 \treturn {tokens}[0]\n\
                 return [\"\", \"\", \"\"]",
                tokens = TOKENS
            ),
            Intrinsic::GetToken => format!(
                "if len({tokens}) > 0:\n\
                 \treturn {tokens}.pop(0)\n\
                 return [\"\", \"\", \"\"]",
                tokens = TOKENS
            ),
            Intrinsic::Expect { position, expected } => {
                self.imports.insert(SYS);
                format!(
                    "print(\"Error: line\", {}, \"- expected\", {})\n\
                     sys.exit(1)",
                    ident(position),
                    ident(expected)
                )
            }
            Intrinsic::RequireArguments { count } => {
                self.imports.insert(SYS);
                format!(
                    "if len(sys.argv) < {}:\n\
                     \tprint(\"usage: parser FILE\")\n\
                     \tsys.exit(1)",
                    count + 1
                )
            }
        }
    }

    fn finish(&mut self, items: Vec<String>) -> String {
        let mut imports: Vec<_> = self.imports.iter().copied().collect();
        imports.sort_by_key(|line| (line.starts_with("from "), *line));

        let mut sections = Vec::new();
        if !imports.is_empty() {
            sections.push(imports.join("\n"));
        }
        sections.extend(items);
        if let Some(entry) = &self.entry {
            sections.push(format!("if __name__ == \"__main__\":\n\t{}()", entry));
        }

        let mut out = sections.join("\n\n");
        out.push('\n');
        out
    }
}
