//! Tree-walking interpreter for console script
//!
//! The interpreter is the default [`Environment`]: top-level bindings live
//! in `globals` and survive between runs, functions get their own local
//! scope, and every error carries a backtrace whose lines are absolute
//! console lines (snippet line + the line the snippet was attributed to).

mod ops;

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::frontend::parser::ast::{BinaryOp, Expr, ExprKind, FunctionDef};
use crate::repl::environment::{Environment, Evaluation};
use crate::runtime::builtins;
use crate::runtime::error::{ErrorKind, RuntimeError};
use crate::runtime::value::Value;
use crate::util::span::Span;
use crate::util::stack::ensure_sufficient_stack;

/// Default limit on nested function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

/// Hard limit on nested expression evaluation, independent of call depth
pub const MAX_EVAL_DEPTH: usize = 10_000;

#[derive(Debug, Clone)]
struct Function {
    def: Rc<FunctionDef>,
    file: Rc<str>,
    base_line: usize,
}

#[derive(Debug)]
struct Frame {
    name: String,
    locals: IndexMap<String, Value>,
    file: Rc<str>,
    base_line: usize,
    call_file: Rc<str>,
    call_line: usize,
}

/// Non-local exits out of expression evaluation
enum Unwind {
    Error(RuntimeError),
    Return(Value),
}

type Flow<T> = Result<T, Unwind>;

/// Console script interpreter
#[derive(Debug)]
pub struct Interpreter {
    target: Value,
    globals: IndexMap<String, Value>,
    functions: IndexMap<String, Function>,
    frames: Vec<Frame>,
    file: Rc<str>,
    base_line: usize,
    max_call_depth: usize,
    depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Interpreter whose `self` is the top-level `main` object
    pub fn new() -> Self {
        Self::with_target(Value::Main)
    }

    /// Interpreter whose `self` is `target`
    pub fn with_target(target: Value) -> Self {
        Self {
            target,
            globals: IndexMap::new(),
            functions: IndexMap::new(),
            frames: Vec::new(),
            file: Rc::from("(eval)"),
            base_line: 1,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            depth: 0,
        }
    }

    /// Set the nested call limit
    pub fn with_max_call_depth(
        mut self,
        depth: usize,
    ) -> Self {
        self.max_call_depth = depth.max(1);
        self
    }

    pub fn target(&self) -> &Value {
        &self.target
    }

    /// Names of top-level bindings, in definition order
    pub fn binding_names(&self) -> impl Iterator<Item = &str> {
        self.globals.keys().map(String::as_str)
    }

    /// Names of defined functions, in definition order
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    fn origin(&self) -> (Rc<str>, usize) {
        match self.frames.last() {
            Some(frame) => (Rc::clone(&frame.file), frame.base_line),
            None => (Rc::clone(&self.file), self.base_line),
        }
    }

    /// Absolute file and line of `span` in the innermost scope
    fn location(
        &self,
        span: Span,
    ) -> (Rc<str>, usize) {
        let (file, base_line) = self.origin();
        (file, base_line + span.line().saturating_sub(1))
    }

    fn backtrace(
        &self,
        span: Span,
    ) -> Vec<String> {
        let mut trace = Vec::with_capacity(self.frames.len() + 1);
        let (mut file, mut line) = self.location(span);
        for frame in self.frames.iter().rev() {
            trace.push(format!("{file}:{line}:in `{}'", frame.name));
            file = Rc::clone(&frame.call_file);
            line = frame.call_line;
        }
        trace.push(format!("{file}:{line}"));
        trace
    }

    fn fail(
        &self,
        err: RuntimeError,
        span: Span,
    ) -> Unwind {
        if err.backtrace.is_empty() {
            Unwind::Error(err.with_backtrace(self.backtrace(span)))
        } else {
            Unwind::Error(err)
        }
    }

    fn error(
        &self,
        kind: ErrorKind,
        message: impl Into<String>,
        span: Span,
    ) -> Unwind {
        self.fail(RuntimeError::new(kind, message), span)
    }

    fn lookup(
        &self,
        name: &str,
    ) -> Option<Value> {
        match self.frames.last() {
            Some(frame) => frame.locals.get(name).cloned(),
            None => self.globals.get(name).cloned(),
        }
    }

    fn assign(
        &mut self,
        name: &str,
        value: Value,
    ) {
        let scope = match self.frames.last_mut() {
            Some(frame) => &mut frame.locals,
            None => &mut self.globals,
        };
        scope.insert(name.to_string(), value);
    }

    fn eval_body(
        &mut self,
        body: &[Expr],
    ) -> Flow<Value> {
        let mut last = Value::Nil;
        for expr in body {
            last = self.eval(expr)?;
        }
        Ok(last)
    }

    fn eval(
        &mut self,
        expr: &Expr,
    ) -> Flow<Value> {
        if self.depth >= MAX_EVAL_DEPTH {
            return Err(self.error(ErrorKind::SystemStackError, "stack level too deep", expr.span));
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.eval_expr(expr));
        self.depth -= 1;
        result
    }

    fn eval_expr(
        &mut self,
        expr: &Expr,
    ) -> Flow<Value> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Nil => Ok(Value::Nil),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Int(i) => Ok(Value::Int(*i)),
            ExprKind::Float(f) => Ok(Value::Float(*f)),
            ExprKind::Str(s) => Ok(Value::Str(s.clone())),
            ExprKind::Symbol(s) => Ok(Value::Symbol(s.clone())),
            ExprKind::SelfRef => Ok(self.target.clone()),
            ExprKind::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item)?);
                }
                Ok(Value::array(values))
            }
            ExprKind::Var(name) => {
                if let Some(value) = self.lookup(name) {
                    return Ok(value);
                }
                match self.functions.get(name).cloned() {
                    Some(function) => self.call_function(&function, Vec::new(), span),
                    None => Err(self.error(
                        ErrorKind::NameError,
                        format!("undefined local variable or function `{name}'"),
                        span,
                    )),
                }
            }
            ExprKind::Assign { name, value } => {
                let value = self.eval(value)?;
                self.assign(name, value.clone());
                Ok(value)
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                ops::unary(*op, operand).map_err(|err| self.fail(err, span))
            }
            ExprKind::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => {
                let left = self.eval(left)?;
                if left.truthy() {
                    self.eval(right)
                } else {
                    Ok(left)
                }
            }
            ExprKind::Binary {
                op: BinaryOp::Or,
                left,
                right,
            } => {
                let left = self.eval(left)?;
                if left.truthy() {
                    Ok(left)
                } else {
                    self.eval(right)
                }
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                ops::binary(*op, left, right).map_err(|err| self.fail(err, span))
            }
            ExprKind::Index { target, index } => {
                let target = self.eval(target)?;
                let index = self.eval(index)?;
                ops::index(&target, &index).map_err(|err| self.fail(err, span))
            }
            ExprKind::Call { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                if let Some(function) = self.functions.get(name).cloned() {
                    self.call_function(&function, values, span)
                } else if builtins::is_builtin(name) {
                    builtins::call(name, values).map_err(|err| self.fail(err, span))
                } else {
                    Err(self.error(
                        ErrorKind::NoMethodError,
                        format!("undefined function `{name}'"),
                        span,
                    ))
                }
            }
            ExprKind::Def(def) => {
                let (file, base_line) = self.origin();
                debug!(name = %def.name, params = def.params.len(), "defining function");
                self.functions.insert(
                    def.name.clone(),
                    Function {
                        def: Rc::clone(def),
                        file,
                        base_line,
                    },
                );
                Ok(Value::Symbol(def.name.clone()))
            }
            ExprKind::If {
                branches,
                otherwise,
            } => {
                for (condition, body) in branches {
                    if self.eval(condition)?.truthy() {
                        return self.eval_body(body);
                    }
                }
                match otherwise {
                    Some(body) => self.eval_body(body),
                    None => Ok(Value::Nil),
                }
            }
            ExprKind::While { condition, body } => {
                while self.eval(condition)?.truthy() {
                    self.eval_body(body)?;
                }
                Ok(Value::Nil)
            }
            ExprKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            }
        }
    }

    fn call_function(
        &mut self,
        function: &Function,
        args: Vec<Value>,
        span: Span,
    ) -> Flow<Value> {
        let def = &function.def;
        if args.len() != def.params.len() {
            return Err(self.error(
                ErrorKind::ArgumentError,
                format!(
                    "wrong number of arguments (given {}, expected {})",
                    args.len(),
                    def.params.len()
                ),
                span,
            ));
        }
        if self.frames.len() >= self.max_call_depth {
            return Err(self.error(ErrorKind::SystemStackError, "stack level too deep", span));
        }

        let (call_file, call_line) = self.location(span);
        self.frames.push(Frame {
            name: def.name.clone(),
            locals: def.params.iter().cloned().zip(args).collect(),
            file: Rc::clone(&function.file),
            base_line: function.base_line,
            call_file,
            call_line,
        });
        let result = self.eval_body(&def.body);
        self.frames.pop();

        match result {
            Ok(value) | Err(Unwind::Return(value)) => Ok(value),
            Err(err) => Err(err),
        }
    }
}

impl Environment for Interpreter {
    fn run(
        &mut self,
        source: &str,
        file: &str,
        line: usize,
    ) -> Result<Evaluation, RuntimeError> {
        debug!(file, line, bytes = source.len(), "running snippet");
        let program = crate::frontend::parse(source).map_err(|err| {
            RuntimeError::new(ErrorKind::SyntaxError, err.to_string())
                .with_backtrace(vec![format!("{file}:{}", line + err.line().saturating_sub(1))])
        })?;
        if program.is_empty() {
            return Ok(Evaluation::Ignore);
        }

        self.file = Rc::from(file);
        self.base_line = line;
        self.frames.clear();
        self.depth = 0;
        let result = self.eval_body(&program.body);
        self.frames.clear();
        self.depth = 0;

        match result {
            Ok(value) | Err(Unwind::Return(value)) => Ok(Evaluation::Value(value)),
            Err(Unwind::Error(err)) => {
                debug!(error = %err, "snippet raised");
                Err(err)
            }
        }
    }

    fn set_binding(
        &mut self,
        name: &str,
        value: Value,
    ) {
        self.globals.insert(name.to_string(), value);
    }

    fn binding(
        &self,
        name: &str,
    ) -> Option<Value> {
        self.globals.get(name).cloned()
    }
}

#[cfg(test)]
mod tests;
