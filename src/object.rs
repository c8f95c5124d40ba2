//! Objects produced when evaluating the Monkey programming language from
//! <https://interpreterbook.com/>.

use crate::ast;
use crate::token::Token;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hasher;
use std::rc::Rc;

use fnv::FnvHasher;

/// Objects produced when evaluating Monkey source code, along with their
/// associated data if applicable. Runtime failures are ordinary `Error`
/// objects which propagate through evaluation instead of unwinding the host.
#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Unit,
    Integer(i64),
    Boolean(bool),
    String(String),
    Character(u8),
    Array(Vec<Object>),
    Hash(Pairs),
    Function(Function),
    Macro(Macro),
    Quote(ast::Expression),
    Builtin(Builtin),
    ReturnValue(Box<Object>),
    Error(String),
}

/// The backing map of a Monkey hash: each entry keeps the original key
/// object alongside the value so both can be printed later.
pub type Pairs = BTreeMap<HashKey, (Object, Object)>;

impl Object {
    /// Reports the name of this object's type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Unit => "UNIT",
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Character(_) => "CHARACTER",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function(_) => "FUNCTION",
            Object::Macro(_) => "MACRO",
            Object::Quote(_) => "QUOTE",
            Object::Builtin(_) => "BUILTIN",
            Object::ReturnValue(_) => "RETURN",
            Object::Error(_) => "ERROR",
        }
    }

    /// Renders this object the way the REPL prints final results. Quoted
    /// syntax trees render through the token stream they were parsed from.
    pub fn inspect(&self, tokens: &[Token]) -> String {
        match self {
            Object::Unit => String::new(),
            Object::Integer(i) => i.to_string(),
            Object::Boolean(b) => b.to_string(),
            Object::String(s) => s.clone(),
            Object::Character(c) => format!("'{}'", *c as char),
            Object::Array(elements) => {
                let elements: Vec<String> =
                    elements.iter().map(|elem| elem.inspect(tokens)).collect();

                format!("[{}]", elements.join(", "))
            }
            Object::Hash(pairs) => {
                let pairs: Vec<String> = pairs
                    .values()
                    .map(|(k, v)| format!("{}: {}", k.inspect(tokens), v.inspect(tokens)))
                    .collect();

                format!("{{{}}}", pairs.join(", "))
            }
            Object::Function(_) => "<Function>".to_string(),
            Object::Macro(_) => "<Macro>".to_string(),
            Object::Quote(node) => node.show(tokens),
            Object::Builtin(b) => b.to_string(),
            Object::ReturnValue(value) => value.inspect(tokens),
            Object::Error(message) => message.clone(),
        }
    }

    /// Produces the hash key for this object, or `None` if the object cannot
    /// be used as a hash key.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Object::Integer(i) => Some(HashKey {
                kind: HashKind::Integer,
                value: *i,
            }),
            Object::Boolean(b) => Some(HashKey {
                kind: HashKind::Boolean,
                value: *b as i64,
            }),
            Object::String(s) => {
                // FNV-1a so that equal strings always map to the same key.
                let mut hasher = FnvHasher::default();
                hasher.write(s.as_bytes());

                Some(HashKey {
                    kind: HashKind::String,
                    value: hasher.finish() as i64,
                })
            }

            _ => None,
        }
    }
}

/// A key in a Monkey hash: a 64-bit payload tagged with the type it was
/// derived from, so equal payloads of distinct types remain distinct keys.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HashKey {
    pub kind: HashKind,
    pub value: i64,
}

/// The type a `HashKey` was derived from.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum HashKind {
    Integer,
    Boolean,
    String,
}

/// A shared handle to an `Environment`.
pub type Env = Rc<RefCell<Environment>>;

/// An execution environment used when evaluating Monkey source code: a
/// single lexical scope with an optional enclosing scope.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    /// Creates a new top-level `Environment`.
    pub fn new() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// Creates an enclosed `Environment` for use within a function call,
    /// sharing the outer scope rather than copying it.
    pub fn new_enclosed(outer: Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    /// Retrieves the object associated with an identifier name, walking the
    /// scope chain outward, or returns `None` if no binding exists.
    pub fn get(&self, name: &str) -> Option<Object> {
        match (self.store.get(name), &self.outer) {
            // We found a binding in this environment; no need to consult the
            // outer environment.
            (Some(obj), _) => Some(obj.clone()),
            // We did not find a binding; try the outer environment.
            (None, Some(outer)) => outer.borrow().get(name),
            // We found no binding and there is no outer environment.
            (None, None) => None,
        }
    }

    /// Reports whether `name` is bound in this scope, ignoring any outer
    /// scopes.
    pub fn defines(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    /// Binds an object in this scope with the identifier `name`.
    pub fn set(&mut self, name: String, obj: Object) {
        self.store.insert(name, obj);
    }
}

/// The object representation of a Monkey function: parameter identifier
/// tokens, a body, and the environment captured where the literal was
/// evaluated.
#[derive(Clone, Debug)]
pub struct Function {
    pub parameters: Vec<usize>,
    pub body: ast::BlockStatement,
    pub env: Env,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        // Environments may sit in reference cycles with the closures bound
        // inside them, so compare them by identity.
        self.parameters == other.parameters
            && self.body == other.body
            && Rc::ptr_eq(&self.env, &other.env)
    }
}

/// The object representation of a Monkey macro, visible only during the
/// macro expansion pass.
#[derive(Clone, Debug)]
pub struct Macro {
    pub parameters: Vec<usize>,
    pub body: ast::BlockStatement,
    pub env: Env,
}

impl PartialEq for Macro {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters
            && self.body == other.body
            && Rc::ptr_eq(&self.env, &other.env)
    }
}

/// The fixed set of built-in Monkey functions.
#[derive(Clone, Debug, PartialEq)]
pub enum Builtin {
    Len,
    First,
    Last,
    Rest,
    Push,
    Puts,
    Quote,
}

impl Builtin {
    /// Constructs a built-in using its name.
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "len" => Some(Builtin::Len),
            "first" => Some(Builtin::First),
            "last" => Some(Builtin::Last),
            "rest" => Some(Builtin::Rest),
            "push" => Some(Builtin::Push),
            "puts" => Some(Builtin::Puts),
            "quote" => Some(Builtin::Quote),

            _ => None,
        }
    }

    /// Applies the appropriate built-in function on `args` to produce an
    /// `Object`. Failures are `Object::Error` values.
    pub fn apply(&self, args: &[Object], tokens: &[Token]) -> Object {
        match self {
            Builtin::Len => builtin_len(args),
            Builtin::First => builtin_first(args),
            Builtin::Last => builtin_last(args),
            Builtin::Rest => builtin_rest(args),
            Builtin::Push => builtin_push(args),
            Builtin::Puts => builtin_puts(args, tokens),
            // quote does not evaluate its argument and is handled by the
            // call evaluator directly.
            Builtin::Quote => panic!("quote must be dispatched by the evaluator"),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Builtin::Len => write!(f, "len"),
            Builtin::First => write!(f, "first"),
            Builtin::Last => write!(f, "last"),
            Builtin::Rest => write!(f, "rest"),
            Builtin::Push => write!(f, "push"),
            Builtin::Puts => write!(f, "puts"),
            Builtin::Quote => write!(f, "quote"),
        }
    }
}

/// Produces the error object for a built-in applied to the wrong number of
/// arguments.
pub fn wrong_arguments(got: usize, want: usize) -> Object {
    let suffix = if want == 1 { "argument" } else { "arguments" };

    Object::Error(format!(
        "Wrong number of arguments. Got {} arguments, want {} {}",
        got, want, suffix
    ))
}

fn builtin_len(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arguments(args.len(), 1);
    }

    match &args[0] {
        Object::Array(elements) => Object::Integer(elements.len() as i64),
        Object::String(s) => Object::Integer(s.len() as i64),

        _ => Object::Error("`len` not supported for argument".to_string()),
    }
}

fn builtin_first(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arguments(args.len(), 1);
    }

    match &args[0] {
        Object::Array(elements) => elements.first().cloned().unwrap_or(Object::Unit),
        // An empty string produces the NUL character sentinel.
        Object::String(s) => Object::Character(*s.as_bytes().first().unwrap_or(&0)),

        _ => Object::Error("`first` not supported for argument".to_string()),
    }
}

fn builtin_last(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arguments(args.len(), 1);
    }

    match &args[0] {
        Object::Array(elements) => elements.last().cloned().unwrap_or(Object::Unit),
        Object::String(s) => Object::Character(*s.as_bytes().last().unwrap_or(&0)),

        _ => Object::Error("`last` not supported for argument".to_string()),
    }
}

fn builtin_rest(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arguments(args.len(), 1);
    }

    match &args[0] {
        Object::Array(elements) => {
            if elements.len() > 1 {
                Object::Array(elements[1..].to_vec())
            } else {
                Object::Array(vec![])
            }
        }
        Object::String(s) => {
            if s.len() > 1 {
                Object::String(s[1..].to_string())
            } else {
                Object::Character(0)
            }
        }

        _ => Object::Error("`rest` not supported for argument".to_string()),
    }
}

fn builtin_push(args: &[Object]) -> Object {
    if args.len() != 2 {
        return wrong_arguments(args.len(), 2);
    }

    match &args[0] {
        Object::Array(elements) => {
            let mut elements = elements.clone();
            elements.push(args[1].clone());
            Object::Array(elements)
        }

        _ => Object::Error("argument to `push` must be array".to_string()),
    }
}

fn builtin_puts(args: &[Object], tokens: &[Token]) -> Object {
    for arg in args {
        println!("{}", arg.inspect(tokens));
    }

    Object::Unit
}
