//! The `SECTIONS` attribute grammar.
//!
//! The suite mixes two kinds of references in one attribute: section numbers
//! such as `4.3.2` and grammar production numbers such as `[53]`. Authors
//! were not consistent, so the same three productions show up as
//! `[1] [2] [3]`, `[1][2][3]`, `[1,2,3]` or `[1, 2, 3]`.

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SectionsError {
    #[error("nested production")]
    NestedProduction,
    #[error("extraneous bracket")]
    ExtraneousBracket,
    #[error("unterminated production")]
    UnterminatedProduction,
}

/// Section and production references of one test.
///
/// Productions keep their brackets so the two kinds never collide.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sections {
    pub sections: Vec<String>,
    pub productions: Vec<String>,
}

pub fn parse_sections(raw: &str) -> Result<Sections, SectionsError> {
    let mut parsed = Sections::default();
    let mut in_production = false;

    for part in bracket_parts(raw.trim()) {
        match part {
            "[" => {
                if in_production {
                    return Err(SectionsError::NestedProduction);
                }
                in_production = true;
            }
            "]" => {
                if !in_production {
                    return Err(SectionsError::ExtraneousBracket);
                }
                in_production = false;
            }
            text => {
                for token in tokens(text) {
                    if in_production {
                        parsed.productions.push(format!("[{token}]"));
                    } else {
                        parsed.sections.push(token.to_string());
                    }
                }
            }
        }
    }

    if in_production {
        return Err(SectionsError::UnterminatedProduction);
    }
    Ok(parsed)
}

/// Split `raw` around brackets, keeping each bracket as its own part.
fn bracket_parts(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in raw.char_indices() {
        if c == '[' || c == ']' {
            if start < i {
                parts.push(&raw[start..i]);
            }
            parts.push(&raw[i..i + 1]);
            start = i + 1;
        }
    }
    if start < raw.len() {
        parts.push(&raw[start..]);
    }
    parts
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
}
