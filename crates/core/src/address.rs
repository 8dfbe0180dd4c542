//! Structured module addresses
//!
//! Addresses like `module.a["k"].module.b` are parsed once at the boundary
//! into ordered segments, so the locator matches structured paths instead of
//! doing repeated substring surgery.

use std::fmt;

use crate::error::{Error, Result};

/// Reserved address of the root module in a plan tree.
pub const ROOT_MODULE: &str = "root_module";

/// One `module.<name>` step of an address, with an optional instance index
/// (`["key"]` for for_each, `[0]` for count).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub name: String,
    pub index: Option<String>,
}

/// A parsed module address. The root module has zero segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleAddress {
    segments: Vec<Segment>,
}

impl ModuleAddress {
    /// The root module address.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dot-separated module address. `"root_module"` and the empty
    /// string map to the root address.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() || raw == ROOT_MODULE {
            return Ok(Self::root());
        }

        let path = raw
            .strip_prefix(&format!("{ROOT_MODULE}."))
            .unwrap_or(raw);

        let malformed = |reason: &str| Error::MalformedAddress {
            address: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut parts = split_dots(path).into_iter();
        while let Some(keyword) = parts.next() {
            if keyword != "module" {
                return Err(malformed(&format!(
                    "expected \"module\" keyword, got {keyword:?}"
                )));
            }
            let name_part = parts
                .next()
                .ok_or_else(|| malformed("missing module name after \"module\""))?;
            segments.push(parse_segment(&name_part).map_err(|reason| malformed(&reason))?);
        }

        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when `self` is a (not necessarily proper) leading path of `other`.
    /// Child module addresses embed their full path from the root, so the
    /// locator descends through any child whose address prefixes the target.
    pub fn is_prefix_of(&self, other: &ModuleAddress) -> bool {
        other.segments.len() >= self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }

    /// Fully qualified address for a resource declared under this module.
    pub fn qualify(&self, resource_address: &str) -> String {
        if self.is_root() {
            resource_address.to_string()
        } else {
            format!("{self}.{resource_address}")
        }
    }
}

impl fmt::Display for ModuleAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "{ROOT_MODULE}");
        }
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, ".")?;
            }
            first = false;
            write!(f, "module.{}", segment.name)?;
            if let Some(index) = &segment.index {
                // String keys are quoted; count indexes are bare integers
                if index.parse::<i64>().is_ok() {
                    write!(f, "[{index}]")?;
                } else {
                    write!(f, "[\"{index}\"]")?;
                }
            }
        }
        Ok(())
    }
}

/// Split on `.` while respecting bracketed index expressions.
fn split_dots(path: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in path.chars() {
        match ch {
            '[' => {
                depth += 1;
                current.push(ch);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            '.' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    parts.push(current);
    parts
}

/// Parse one `name` or `name["key"]` / `name[0]` token.
fn parse_segment(token: &str) -> std::result::Result<Segment, String> {
    let Some(open) = token.find('[') else {
        if token.is_empty() {
            return Err("empty module name".to_string());
        }
        return Ok(Segment {
            name: token.to_string(),
            index: None,
        });
    };

    let name = &token[..open];
    if name.is_empty() {
        return Err("empty module name".to_string());
    }
    let rest = &token[open + 1..];
    let Some(inner) = rest.strip_suffix(']') else {
        return Err(format!("unterminated index in {token:?}"));
    };
    let index = inner
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(inner);

    Ok(Segment {
        name: name.to_string(),
        index: Some(index.to_string()),
    })
}
