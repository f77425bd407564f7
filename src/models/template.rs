use std::mem;

use serde::{Deserialize, Serialize};

use crate::{error::DispatchError, models::contact::Contact};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A message body with `{field}` placeholders. `{{` and `}}` stand for
/// literal braces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl MessageTemplate {
    pub fn parse(source: &str) -> Result<Self, DispatchError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((position, c)) = chars.next() {
            match c {
                '{' => {
                    if matches!(chars.peek(), Some((_, '{'))) {
                        chars.next();
                        literal.push('{');
                        continue;
                    }

                    let mut field = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        match c {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => {
                                return Err(malformed(position, "unexpected '{' inside placeholder"));
                            }
                            _ => field.push(c),
                        }
                    }

                    if !closed {
                        return Err(malformed(position, "unclosed placeholder"));
                    }
                    if field.is_empty() {
                        return Err(malformed(position, "empty placeholder"));
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(field));
                }
                '}' => {
                    if matches!(chars.peek(), Some((_, '}'))) {
                        chars.next();
                        literal.push('}');
                    } else {
                        return Err(malformed(position, "single '}' outside a placeholder"));
                    }
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Referenced field names, in order of first appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Placeholders that do not match any of `columns`.
    pub fn missing_placeholders(&self, columns: &[String]) -> Vec<&str> {
        self.placeholders()
            .into_iter()
            .filter(|name| !columns.iter().any(|column| column == name))
            .collect()
    }

    pub fn render(&self, contact: &Contact) -> Result<String, DispatchError> {
        let mut rendered = String::with_capacity(self.source.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(name) => {
                    let value = contact
                        .field(name)
                        .ok_or_else(|| DispatchError::MissingField {
                            field: name.clone(),
                        })?;
                    rendered.push_str(&value);
                }
            }
        }

        Ok(rendered)
    }
}

impl TryFrom<String> for MessageTemplate {
    type Error = DispatchError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Self::parse(&source)
    }
}

impl From<MessageTemplate> for String {
    fn from(template: MessageTemplate) -> Self {
        template.source
    }
}

/// Parses `template` and renders it against `contact` in one step.
pub fn render(template: &str, contact: &Contact) -> Result<String, DispatchError> {
    MessageTemplate::parse(template)?.render(contact)
}

fn malformed(position: usize, reason: &str) -> DispatchError {
    DispatchError::MalformedTemplate {
        position,
        reason: reason.to_string(),
    }
}
