//! A small CSS selector subset: type selectors, `#id`, `.class`, `:not(...)`,
//! the descendant combinator and selector lists.

use thiserror::Error;

use super::Element;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character '{0}' at offset {1}")]
    UnexpectedChar(char, usize),

    #[error("missing name after '{0}' at offset {1}")]
    MissingName(char, usize),

    #[error("unsupported pseudo-class ':{0}'")]
    UnsupportedPseudo(String),

    #[error("unterminated ':not(' at offset {0}")]
    UnterminatedNot(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub negations: Vec<Compound>,
}

impl Compound {
    pub fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if tag != "*" && *tag != el.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        !self.negations.iter().any(|n| n.matches(el))
    }

    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.negations.is_empty()
    }
}

/// Compounds joined by descendant combinators, leftmost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    pub parts: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        let mut offset = 0;
        for piece in input.split(',') {
            alternatives.push(parse_complex(piece, offset)?);
            offset += piece.chars().count() + 1;
        }
        Ok(Self { alternatives })
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

fn parse_complex(input: &str, base: usize) -> Result<Complex, SelectorError> {
    let chars: Vec<char> = input.chars().collect();
    let mut pos = 0;
    let mut parts = Vec::new();

    loop {
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }
        if pos >= chars.len() {
            break;
        }
        let compound = parse_compound(&chars, &mut pos, base)?;
        if compound.is_empty() {
            return Err(SelectorError::UnexpectedChar(chars[pos], base + pos));
        }
        parts.push(compound);
        if pos < chars.len() && !chars[pos].is_whitespace() {
            return Err(SelectorError::UnexpectedChar(chars[pos], base + pos));
        }
    }

    if parts.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(Complex { parts })
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_name(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && is_name_char(chars[*pos]) {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

fn parse_compound(chars: &[char], pos: &mut usize, base: usize) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();

    if *pos < chars.len() && chars[*pos] == '*' {
        compound.tag = Some("*".to_string());
        *pos += 1;
    } else {
        let tag = read_name(chars, pos);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
    }

    while *pos < chars.len() {
        let c = chars[*pos];
        match c {
            '#' | '.' => {
                *pos += 1;
                let name = read_name(chars, pos);
                if name.is_empty() {
                    return Err(SelectorError::MissingName(c, base + *pos));
                }
                if c == '#' {
                    compound.id = Some(name);
                } else {
                    compound.classes.push(name);
                }
            }
            ':' => {
                *pos += 1;
                let pseudo = read_name(chars, pos);
                if pseudo != "not" || *pos >= chars.len() || chars[*pos] != '(' {
                    return Err(SelectorError::UnsupportedPseudo(pseudo));
                }
                let open = *pos;
                *pos += 1;
                while *pos < chars.len() && chars[*pos].is_whitespace() {
                    *pos += 1;
                }
                let inner = parse_compound(chars, pos, base)?;
                while *pos < chars.len() && chars[*pos].is_whitespace() {
                    *pos += 1;
                }
                if *pos >= chars.len() || chars[*pos] != ')' {
                    return Err(SelectorError::UnterminatedNot(base + open));
                }
                if inner.is_empty() {
                    return Err(SelectorError::MissingName('(', base + open));
                }
                *pos += 1;
                compound.negations.push(inner);
            }
            _ => break,
        }
    }

    Ok(compound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_selector() {
        let sel = Selector::parse("tbody tr:not(.no-results)").unwrap();
        assert_eq!(sel.alternatives.len(), 1);
        let parts = &sel.alternatives[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].tag.as_deref(), Some("tbody"));
        assert_eq!(parts[1].tag.as_deref(), Some("tr"));
        assert_eq!(parts[1].negations[0].classes, vec!["no-results"]);
    }

    #[test]
    fn test_parse_class_and_id() {
        let sel = Selector::parse("  button#clear.clear-search.btn ").unwrap();
        let part = &sel.alternatives[0].parts[0];
        assert_eq!(part.tag.as_deref(), Some("button"));
        assert_eq!(part.id.as_deref(), Some("clear"));
        assert_eq!(part.classes, vec!["clear-search", "btn"]);
    }

    #[test]
    fn test_parse_list() {
        let sel = Selector::parse(".a, #b").unwrap();
        assert_eq!(sel.alternatives.len(), 2);
    }

    #[test]
    fn test_compound_matching() {
        let el = Element::new("tr").with_class("no-results").with_class("d-none");
        assert!(Selector::parse("tr.no-results").unwrap().alternatives[0].parts[0].matches(&el));
        assert!(!Selector::parse("tr:not(.no-results)").unwrap().alternatives[0].parts[0].matches(&el));
        assert!(Selector::parse("*").unwrap().alternatives[0].parts[0].matches(&el));
        assert!(!Selector::parse("td").unwrap().alternatives[0].parts[0].matches(&el));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert!(matches!(Selector::parse("tr > td"), Err(SelectorError::UnexpectedChar('>', _))));
        assert!(matches!(Selector::parse(".").unwrap_err(), SelectorError::MissingName('.', _)));
        assert!(matches!(Selector::parse("a:hover"), Err(SelectorError::UnsupportedPseudo(p)) if p == "hover"));
        assert!(matches!(Selector::parse("tr:not(.x"), Err(SelectorError::UnterminatedNot(_))));
        assert!(Selector::parse("a,").is_err());
    }
}
