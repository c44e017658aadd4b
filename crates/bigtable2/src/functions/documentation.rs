/// Function categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    String,
    Table,
    System,
}

impl Category {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Table => "table",
            Self::System => "system",
        }
    }
}

/// Documentation for a single function.
#[derive(Debug, Clone, Copy)]
pub struct Documentation {
    /// Category this function belongs in.
    pub category: Category,
    /// Description of the function.
    ///
    /// Whitespace will be trimmed. This allows for using raw strings and
    /// aligning everything to the left.
    pub description: &'static str,
    /// Argument names for this function.
    ///
    /// If this doesn't match the length of the positional arguments in the
    /// signature, generic names will be used.
    pub arguments: &'static [&'static str],
    /// An optional example for the function.
    pub example: Option<Example>,
}

impl Documentation {
    /// Get the name for the argument at `idx`, falling back to a generic name
    /// if the documented names don't line up with the signature.
    pub fn argument_name(&self, idx: usize, num_args: usize) -> String {
        if self.arguments.len() == num_args {
            self.arguments[idx].to_string()
        } else {
            format!("arg{idx}")
        }
    }
}

/// A simple example.
#[derive(Debug, Clone, Copy)]
pub struct Example {
    /// Example usage of the function.
    ///
    /// This should just be the function call itself and not an entire query.
    pub example: &'static str,
    /// The output for the above example.
    pub output: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_names_fall_back_when_mismatched() {
        let doc = Documentation {
            category: Category::String,
            description: "test",
            arguments: &["name"],
            example: None,
        };

        assert_eq!("name", doc.argument_name(0, 1));
        assert_eq!("arg1", doc.argument_name(1, 2));
    }
}
