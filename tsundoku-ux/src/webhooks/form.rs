use anyhow::Result;
use indexmap::IndexMap;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// Model of a dialog's HTML form: declared inputs in order, plus where and how
/// it submits.
#[derive(Clone, Debug)]
pub struct Form {
    fields: IndexMap<String, String>,
    action: Option<String>,
    method: Method,
}

impl Form {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: inputs
                .into_iter()
                .map(|x| (x.into(), String::new()))
                .collect(),
            action: None,
            method: Method::GET,
        }
    }

    /// Points the form at a new target, replacing any previous one.
    pub fn bind(&mut self, method: Method, action: impl Into<String>) {
        self.method = method;
        self.action = Some(action.into());
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Clears every input value. The binding is kept.
    pub fn reset(&mut self) {
        for value in self.fields.values_mut() {
            value.clear();
        }
    }

    /// Returns false if `name` is not an input of this form.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.get_mut(name) {
            Some(field) => {
                *field = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> &IndexMap<String, String> {
        &self.fields
    }

    /// Sets every input from the same-named field of `source`. Inputs without
    /// a counterpart (or with a null one) end up empty.
    pub fn fill_from<T: Serialize>(&mut self, source: &T) -> Result<()> {
        let Value::Object(source) = serde_json::to_value(source)? else {
            bail!("form source must serialize to an object");
        };
        for (name, value) in self.fields.iter_mut() {
            *value = match source.get(name) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(x)) => x.clone(),
                Some(other) => other.to_string(),
            };
        }
        Ok(())
    }

    /// `application/x-www-form-urlencoded` body, inputs in declaration order.
    pub fn serialize(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}
