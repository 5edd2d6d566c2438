//! Typed accessors for validating configuration tables.
//!
//! The configuration file is parsed into a generic [`toml::Table`]. Each
//! required field of the selected configuration arm is then read through one
//! of the accessors on [`Section`], which check the value's type and
//! constraints and raise a [`ConfigError`] naming the full dotted key
//! (e.g. `orca.task.ts.constraint_atoms`) on failure.
//!
//! Nothing in this module substitutes defaults silently: only the accessors
//! whose names start with `optional_` accept an absent key.

use crate::config::ConfigError;
use toml::{Table, Value};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ConfigError>;

/// A table of the configuration together with its dotted path.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    path: String,
    table: &'a Table,
}

impl<'a> Section<'a> {
    /// Wraps the root table of a configuration document.
    pub fn root(table: &'a Table) -> Self {
        Self {
            path: String::new(),
            table,
        }
    }

    /// Dotted path of this section (empty for the root).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Dotted path of `key` inside this section.
    pub fn key_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Returns true if `key` is present (with any type).
    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.table.get(key)
    }

    fn invalid(&self, key: &str, reason: &str) -> ConfigError {
        ConfigError::Invalid {
            key: self.key_path(key),
            reason: reason.to_string(),
        }
    }

    /// Returns the nested table `name`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingTable`] if `name` is absent or not a table.
    pub fn subsection(&self, name: &str) -> ValidationResult<Section<'a>> {
        match self.get(name) {
            Some(Value::Table(table)) => Ok(Section {
                path: self.key_path(name),
                table,
            }),
            _ => Err(ConfigError::MissingTable {
                table: self.key_path(name),
            }),
        }
    }

    /// Integer value.
    pub fn int(&self, key: &str) -> ValidationResult<i64> {
        match self.get(key) {
            Some(Value::Integer(value)) => Ok(*value),
            _ => Err(self.invalid(key, "must be an integer.")),
        }
    }

    /// Integer value that fits in an `i32`.
    pub fn int32(&self, key: &str) -> ValidationResult<i32> {
        let value = self.int(key)?;
        i32::try_from(value).map_err(|_| self.invalid(key, "is out of range."))
    }

    /// Strictly positive integer that fits in a `u32`.
    pub fn positive_int(&self, key: &str) -> ValidationResult<u32> {
        let value = self.int(key)?;
        match u32::try_from(value) {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(self.invalid(key, "must be a positive integer.")),
        }
    }

    /// Boolean value.
    pub fn bool(&self, key: &str) -> ValidationResult<bool> {
        match self.get(key) {
            Some(Value::Boolean(value)) => Ok(*value),
            _ => Err(self.invalid(key, "must be a boolean.")),
        }
    }

    /// Boolean value, `default` when absent.
    pub fn optional_bool(&self, key: &str, default: bool) -> ValidationResult<bool> {
        if self.contains(key) {
            self.bool(key)
        } else {
            Ok(default)
        }
    }

    /// String with non-whitespace content.
    pub fn nonempty_str(&self, key: &str) -> ValidationResult<String> {
        match self.get(key) {
            Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.clone()),
            _ => Err(self.invalid(key, "must be a non-empty string.")),
        }
    }

    /// Non-empty string, `default` when absent.
    pub fn optional_nonempty_str(&self, key: &str, default: &str) -> ValidationResult<String> {
        if self.contains(key) {
            self.nonempty_str(key)
        } else {
            Ok(default.to_string())
        }
    }

    /// One of a fixed set of string values.
    pub fn choice(&self, key: &str, allowed: &[&str]) -> ValidationResult<&'a str> {
        match self.get(key) {
            Some(Value::String(value)) if allowed.contains(&value.as_str()) => Ok(value.as_str()),
            _ => {
                let quoted: Vec<String> = allowed.iter().map(|v| format!("'{}'", v)).collect();
                let reason = match quoted.split_last() {
                    Some((last, [only])) => format!("must be {} or {}.", only, last),
                    Some((last, rest)) if !rest.is_empty() => {
                        format!("must be {}, or {}.", rest.join(", "), last)
                    }
                    _ => format!("must be {}.", quoted.join("")),
                };
                Err(self.invalid(key, &reason))
            }
        }
    }

    /// Non-empty list of strings, order preserved.
    pub fn nonempty_str_list(&self, key: &str) -> ValidationResult<Vec<String>> {
        match self.get(key).map(string_list) {
            Some(Some(list)) if !list.is_empty() => Ok(list),
            _ => Err(self.invalid(key, "must be a non-empty string list.")),
        }
    }

    /// List of strings, empty when absent.
    pub fn optional_str_list(&self, key: &str) -> ValidationResult<Vec<String>> {
        match self.get(key).map(string_list) {
            None => Ok(Vec::new()),
            Some(Some(list)) => Ok(list),
            Some(None) => Err(self.invalid(key, "must be a string list.")),
        }
    }

    /// A single non-empty string or a non-empty list of non-empty strings,
    /// normalized to a list.
    pub fn str_or_str_list(&self, key: &str) -> ValidationResult<Vec<String>> {
        let reason = "must be a non-empty string or a non-empty list of non-empty strings.";
        match self.get(key) {
            Some(Value::String(value)) if !value.trim().is_empty() => Ok(vec![value.clone()]),
            Some(value @ Value::Array(_)) => match string_list(value) {
                Some(list)
                    if !list.is_empty() && list.iter().all(|item| !item.trim().is_empty()) =>
                {
                    Ok(list)
                }
                _ => Err(self.invalid(key, reason)),
            },
            _ => Err(self.invalid(key, reason)),
        }
    }

    /// Atom index pairs: either a single `[i, j]` or a list `[[i, j], ...]`.
    ///
    /// Indices must be non-negative integers. Both shapes are normalized to
    /// an ordered list of pairs.
    pub fn int_pairs(&self, key: &str) -> ValidationResult<Vec<(usize, usize)>> {
        let reason = "must be an integer pair [i, j] or a non-empty list of integer pairs.";
        let items = match self.get(key) {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Err(self.invalid(key, reason)),
        };

        if let Some(pair) = index_pair(items) {
            return Ok(vec![pair]);
        }

        items
            .iter()
            .map(|item| match item {
                Value::Array(inner) => index_pair(inner),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| self.invalid(key, reason))
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

fn index_pair(items: &[Value]) -> Option<(usize, usize)> {
    match items {
        [Value::Integer(i), Value::Integer(j)] => {
            Some((usize::try_from(*i).ok()?, usize::try_from(*j).ok()?))
        }
        _ => None,
    }
}

/// Fails with [`ConfigError::Incomplete`] listing every absent key.
///
/// `context` names the selected arm (e.g. `"Gaussian sp"`).
pub fn require_present(context: &str, keys: &[(&Section<'_>, &str)]) -> ValidationResult<()> {
    let missing: Vec<String> = keys
        .iter()
        .filter(|(section, key)| !section.contains(key))
        .map(|(section, key)| section.key_path(key))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Incomplete {
            context: context.to_string(),
            missing,
        })
    }
}
