use super::handle::Out;
use ahash::AHashMap;
use serde_json::Value;
use std::fmt;

/// A value supplied for one input: a literal or a connection to an upstream output.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Literal(Value),
    Connection(Out),
}

impl Arg {
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Arg::Literal(v) => Some(v),
            Arg::Connection(_) => None,
        }
    }

    pub fn as_connection(&self) -> Option<&Out> {
        match self {
            Arg::Connection(out) => Some(out),
            Arg::Literal(_) => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Literal(v) => write!(f, "{}", v),
            Arg::Connection(out) => write!(f, "{}", out),
        }
    }
}

impl From<Out> for Arg {
    fn from(out: Out) -> Self {
        Arg::Connection(out)
    }
}

impl From<&Out> for Arg {
    fn from(out: &Out) -> Self {
        Arg::Connection(out.clone())
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Literal(value)
    }
}

macro_rules! impl_literal_arg {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Literal(Value::from(value))
                }
            }
        )*
    };
}

impl_literal_arg!(&str, String, bool, i32, i64, u32, u64, f32, f64);

/// Caller-supplied arguments for one `add` call, keyed by input name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: AHashMap<String, Arg>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chaining form of [`Args::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Arg>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Arg> {
        self.values.get(name)
    }

    /// Returns the argument `name` if it is a literal.
    pub fn literal(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(Arg::as_literal)
    }

    /// Returns the argument `name` if it is a connection.
    pub fn connection(&self, name: &str) -> Option<&Out> {
        self.get(name).and_then(Arg::as_connection)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arg> {
        self.values.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Arg>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Args::new();
        for (name, value) in iter {
            args.set(name, value);
        }
        args
    }
}
