use super::{Arg, GraphBuilder};
use std::fmt;

/// Renders a builder's node set as a human-readable listing for debugging.
///
/// ```text
/// #2 KSampler "ksampler"
/// ├── model <- #1[0]:MODEL
/// └── steps = 20
/// ```
pub struct GraphDisplay<'a> {
    builder: &'a GraphBuilder,
}

impl<'a> GraphDisplay<'a> {
    pub(super) fn new(builder: &'a GraphBuilder) -> Self {
        Self { builder }
    }
}

impl fmt::Display for GraphDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in self.builder.nodes() {
            write!(f, "#{} {}", record.id(), record.class_type())?;
            if let Some(label) = record.label() {
                write!(f, " \"{}\"", label)?;
            }
            writeln!(f)?;

            // Declaration order, so the listing is stable across runs.
            let lines: Vec<String> = record
                .definition()
                .inputs()
                .filter_map(|(name, _)| {
                    record.args().get(name).map(|arg| match arg {
                        Arg::Literal(v) => format!("{} = {}", name, v),
                        Arg::Connection(out) => format!("{} <- {}", name, out),
                    })
                })
                .collect();

            for (i, line) in lines.iter().enumerate() {
                let marker = if i + 1 == lines.len() { "└── " } else { "├── " };
                writeln!(f, "{}{}", marker, line)?;
            }
        }
        Ok(())
    }
}
