use std::collections::HashMap;

/// Variable values loaded for one record, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values {
    values: HashMap<String, Vec<String>>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, variable: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(variable.into())
            .or_default()
            .push(value.into());
    }

    /// First value of a variable.
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.get_all(variable).first().map(String::as_str)
    }

    pub fn get_all(&self, variable: &str) -> &[String] {
        self.values.get(variable).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        for (k, v) in iter {
            values.push(k, v);
        }
        values
    }
}
