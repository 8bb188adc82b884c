//! The interface back ends implement to render a [`Program`] as source text.

use crate::bootstrap::EXPECT;
use crate::program::{Expr, Global, Intrinsic, Item, Program, Routine, Stmt, Type};

/// One method per operation of the abstract program. Children are rendered
/// before their parents, so every method receives finished fragments.
pub trait Emitter {
    /// A rendered item or statement.
    type Output;
    /// A rendered expression.
    type Expr;

    fn expr(&mut self, expr: &Expr) -> Self::Expr;

    fn global(&mut self, global: &Global) -> Self::Output;

    /// Defines a routine. `body` holds the rendered statements of
    /// `routine.body`, in order.
    fn routine(&mut self, routine: &Routine, body: Vec<Self::Output>) -> Self::Output;

    fn comment(&mut self, text: &str) -> Self::Output;

    fn declare(&mut self, name: &str, ty: Type) -> Self::Output;

    fn assign(&mut self, name: &str, value: Self::Expr) -> Self::Output;

    fn call(&mut self, routine: &str, args: Vec<Self::Expr>) -> Self::Output;

    fn branch(
        &mut self,
        arms: Vec<(Self::Expr, Vec<Self::Output>)>,
        otherwise: Option<Vec<Self::Output>>,
    ) -> Self::Output;

    /// Reports a mismatch. Calls the generated diagnostic routine by default.
    fn expect(&mut self, position: Self::Expr, expected: &str) -> Self::Output {
        let expected = self.expr(&Expr::str(expected));
        self.call(EXPECT, vec![position, expected])
    }

    fn do_return(&mut self, value: Option<Self::Expr>) -> Self::Output;

    fn intrinsic(&mut self, intrinsic: &Intrinsic) -> Self::Output;

    /// Assembles the rendered items into the final source.
    fn finish(&mut self, items: Vec<Self::Output>) -> String;
}

/// Renders `program` through `emitter`.
pub fn render<E: Emitter>(program: &Program, emitter: &mut E) -> String {
    let items = program
        .items
        .iter()
        .map(|item| match item {
            Item::Global(global) => emitter.global(global),
            Item::Routine(routine) => render_routine(emitter, routine),
        })
        .collect();
    emitter.finish(items)
}

/// Renders a single routine definition.
pub fn render_routine<E: Emitter>(emitter: &mut E, routine: &Routine) -> E::Output {
    let body = block(emitter, &routine.body);
    emitter.routine(routine, body)
}

fn block<E: Emitter>(emitter: &mut E, stmts: &[Stmt]) -> Vec<E::Output> {
    stmts.iter().map(|stmt| statement(emitter, stmt)).collect()
}

fn statement<E: Emitter>(emitter: &mut E, stmt: &Stmt) -> E::Output {
    match stmt {
        Stmt::Comment(text) => emitter.comment(text),
        Stmt::Declare { name, ty } => emitter.declare(name, *ty),
        Stmt::Assign { name, value } => {
            let value = emitter.expr(value);
            emitter.assign(name, value)
        }
        Stmt::Call { routine, args } => {
            let args = args.iter().map(|arg| emitter.expr(arg)).collect();
            emitter.call(routine, args)
        }
        Stmt::If { arms, otherwise } => {
            let arms = arms
                .iter()
                .map(|(cond, body)| (emitter.expr(cond), block(emitter, body)))
                .collect();
            let otherwise = otherwise.as_ref().map(|body| block(emitter, body));
            emitter.branch(arms, otherwise)
        }
        Stmt::Expect { position, expected } => {
            let position = emitter.expr(position);
            emitter.expect(position, expected)
        }
        Stmt::Return(value) => {
            let value = value.as_ref().map(|value| emitter.expr(value));
            emitter.do_return(value)
        }
        Stmt::Intrinsic(intrinsic) => emitter.intrinsic(intrinsic),
    }
}
