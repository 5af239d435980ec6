//! Reading the resistor drawer from an INI file.
//!
//! The expected layout is a `[Resistors]` section with a comma separated `values` key, in kΩ:
//!
//! ```ini
//! [Resistors]
//! values = 470, 0.220, 1, 2.2, 5.6
//! ```
//!
//! Section names are case sensitive, keys are not. Keys and values are separated by `=` or `:`,
//! lines starting with `#` or `;` are comments, and an indented line continues the value above
//! it, so long lists can be wrapped.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, info};

use crate::error::{DividerError, Result};
use crate::ResistorSet;

/// Section holding the resistor list
pub const RESISTOR_SECTION: &str = "Resistors";

/// Key holding the comma separated values
pub const VALUES_KEY: &str = "values";

/// Configuration file looked up when none is given
pub const DEFAULT_CONFIG_FILE: &str = "resistors.ini";

/// A parsed INI document, keeping sections and keys in file order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IniDocument {
    sections: Vec<(String, Vec<(String, String)>)>,
}

impl IniDocument {
    /// Looks up `key` (case insensitive) in `section` (case sensitive).
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|entries| {
            entries
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_str())
        })
    }

    fn section(&self, name: &str) -> Option<&Vec<(String, String)>> {
        self.sections
            .iter()
            .find(|(section, _)| section == name)
            .map(|(_, entries)| entries)
    }

    /// Extracts the resistor set from the `[Resistors]` section.
    pub fn resistors(&self) -> Result<ResistorSet> {
        if self.section(RESISTOR_SECTION).is_none() {
            return Err(DividerError::MissingSection {
                section: RESISTOR_SECTION.to_string(),
            });
        }
        let values = self
            .get(RESISTOR_SECTION, VALUES_KEY)
            .ok_or_else(|| DividerError::MissingKey {
                section: RESISTOR_SECTION.to_string(),
                key: VALUES_KEY.to_string(),
            })?;
        parse_values(values)
    }
}

impl FromStr for IniDocument {
    type Err = DividerError;

    fn from_str(s: &str) -> Result<Self> {
        let mut doc = IniDocument::default();
        let mut last_key = false;

        for (idx, raw) in s.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if raw.starts_with(char::is_whitespace) && last_key {
                if let Some((_, entries)) = doc.sections.last_mut() {
                    if let Some((_, value)) = entries.last_mut() {
                        value.push('\n');
                        value.push_str(line);
                        continue;
                    }
                }
            }

            if line.starts_with('[') {
                let name = line
                    .strip_prefix('[')
                    .and_then(|l| l.strip_suffix(']'))
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| DividerError::parse(line_no, "malformed section header"))?;
                doc.sections.push((name.to_string(), Vec::new()));
                last_key = false;
                continue;
            }

            let split = line
                .find(|c: char| c == '=' || c == ':')
                .ok_or_else(|| DividerError::parse(line_no, "expected 'key = value'"))?;
            let key = line[..split].trim();
            if key.is_empty() {
                return Err(DividerError::parse(line_no, "empty key"));
            }
            let value = line[split + 1..].trim();
            let (_, entries) = doc
                .sections
                .last_mut()
                .ok_or_else(|| DividerError::parse(line_no, "key outside of any section"))?;
            entries.push((key.to_string(), value.to_string()));
            last_key = true;
        }

        Ok(doc)
    }
}

/// Parses a comma separated list of kΩ values into a resistor set.
/// # Examples
/// ```
///     # use divider_calc::config::parse_values;
///     let set = parse_values("470, 0.220, 1, 2.2, 5.6").unwrap();
///     assert_eq!(set.len(), 5);
///     assert!(parse_values("1, ten").is_err());
/// ```
pub fn parse_values(list: &str) -> Result<ResistorSet> {
    let values = list
        .split(|c: char| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|entry| {
            if entry.is_empty() {
                debug!("Ignoring empty resistor entry");
            }
            !entry.is_empty()
        })
        .map(|entry| {
            let value = entry
                .parse::<f64>()
                .map_err(|_| DividerError::invalid_value(entry, "not a number"))?;
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(DividerError::invalid_value(
                    entry,
                    "resistor values must be positive",
                ))
            }
        })
        .collect::<Result<Vec<f64>>>()?;
    ResistorSet::new(values)
}

/// Reads the resistor set from the INI file at `path`.
pub fn load_resistors(path: impl AsRef<Path>) -> Result<ResistorSet> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| DividerError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let set = text.parse::<IniDocument>()?.resistors()?;
    info!("Loaded {} resistor values from {}", set.len(), path.display());
    Ok(set)
}
