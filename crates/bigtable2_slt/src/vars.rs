use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone)]
pub enum VarValue {
    /// Value is sensitive, don't print it out.
    Sensitive(String),
    /// Value is not sensitive, print it during debugging.
    Plain(String),
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensitive(_) => write!(f, "***"),
            Self::Plain(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Debug for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl AsRef<str> for VarValue {
    fn as_ref(&self) -> &str {
        match self {
            Self::Sensitive(s) => s.as_str(),
            Self::Plain(s) => s.as_str(),
        }
    }
}

/// Variables that can be referenced in sql queries and automatically replaced
/// with concrete values.
///
/// Variable format in sql queries: __MYVARIABLE__
///
/// When adding a variable, they'll automatically be uppercased and surrounded
/// with underscores.
#[derive(Debug, Clone, Default)]
pub struct ReplacementVars {
    vars: BTreeMap<String, VarValue>,
}

impl ReplacementVars {
    pub fn add_var(&mut self, key: &str, val: VarValue) {
        let key = format!("__{}__", key.to_uppercase());
        self.vars.insert(key, val);
    }

    pub fn replace_in_query(&self, query: &str) -> String {
        let mut query = query.to_string();
        for (k, v) in &self.vars {
            query = query.replace(k, v.as_ref());
        }
        query
    }
}

impl fmt::Display for ReplacementVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in &self.vars {
            writeln!(f, "{k} = {v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_vars() {
        let mut vars = ReplacementVars::default();
        vars.add_var("openssl_version", VarValue::Plain("OpenSSL 3".to_string()));
        vars.add_var("secret", VarValue::Sensitive("hunter2".to_string()));

        assert_eq!(
            "SELECT 'OpenSSL 3', 'hunter2'",
            vars.replace_in_query("SELECT '__OPENSSL_VERSION__', '__SECRET__'")
        );
        assert_eq!("SELECT 1", vars.replace_in_query("SELECT 1"));
    }

    #[test]
    fn sensitive_values_are_hidden() {
        let mut vars = ReplacementVars::default();
        vars.add_var("secret", VarValue::Sensitive("hunter2".to_string()));
        vars.add_var("plain", VarValue::Plain("visible".to_string()));

        assert_eq!("__PLAIN__ = visible\n__SECRET__ = ***\n", vars.to_string());
    }
}
