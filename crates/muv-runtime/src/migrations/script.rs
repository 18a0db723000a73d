//! Migration file parsing.
//!
//! A migration file holds an up section and an optional down section:
//!
//! ```sql
//! -- migrate:up
//! CREATE TABLE users (id BIGSERIAL PRIMARY KEY);
//!
//! -- migrate:down
//! DROP TABLE users;
//! ```
//!
//! Text before the first marker belongs to the up section.

use muv_core::source::Direction;

/// Marker line opening the up section.
pub const UP_MARKER: &str = "-- migrate:up";

/// Marker line opening the down section.
pub const DOWN_MARKER: &str = "-- migrate:down";

/// Parsed contents of one migration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    /// SQL run by `up`.
    pub up: String,
    /// SQL run by `down`, if the file has one.
    pub down: Option<String>,
}

impl MigrationScript {
    /// Split a migration file into its sections.
    pub fn parse(content: &str) -> Self {
        let mut up = String::new();
        let mut down: Option<String> = None;

        for line in content.lines() {
            let marker = line.trim();
            if marker.eq_ignore_ascii_case(UP_MARKER) {
                continue;
            }
            if marker.eq_ignore_ascii_case(DOWN_MARKER) {
                down.get_or_insert_with(String::new);
                continue;
            }

            let section = match down.as_mut() {
                Some(down) => down,
                None => &mut up,
            };
            section.push_str(line);
            section.push('\n');
        }

        let down = down.filter(|sql| !statements(sql).is_empty());
        Self { up, down }
    }

    /// SQL for a direction, if the file has it.
    pub fn sql(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Up => Some(&self.up),
            Direction::Down => self.down.as_deref(),
        }
    }
}

/// Split SQL into executable statements.
///
/// Semicolons only end a statement outside string literals, quoted
/// identifiers, comments and dollar-quoted bodies. Segments holding nothing
/// but whitespace and comments are dropped.
pub fn statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut has_code = false;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '-' if chars.peek() == Some(&'-') => {
                current.push(c);
                while let Some(&next_c) = chars.peek() {
                    if next_c == '\n' {
                        break;
                    }
                    current.push(next_c);
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                // Block comments nest in PostgreSQL
                chars.next();
                current.push_str("/*");
                let mut depth = 1;
                while depth > 0 {
                    match chars.next() {
                        Some('*') if chars.peek() == Some(&'/') => {
                            chars.next();
                            current.push_str("*/");
                            depth -= 1;
                        }
                        Some('/') if chars.peek() == Some(&'*') => {
                            chars.next();
                            current.push_str("/*");
                            depth += 1;
                        }
                        Some(other) => current.push(other),
                        None => break,
                    }
                }
            }
            '\'' | '"' => {
                // A doubled quote closes and reopens, which keeps '' escapes intact
                has_code = true;
                current.push(c);
                for next_c in chars.by_ref() {
                    current.push(next_c);
                    if next_c == c {
                        break;
                    }
                }
            }
            '$' => {
                has_code = true;
                current.push(c);

                // Look for a dollar-quote tag like $$ or $tag$
                let mut tag = String::from("$");
                while let Some(&next_c) = chars.peek() {
                    if next_c.is_alphanumeric() || next_c == '_' {
                        chars.next();
                        tag.push(next_c);
                        current.push(next_c);
                    } else {
                        break;
                    }
                }

                let positional = tag[1..].starts_with(|ch: char| ch.is_ascii_digit());
                if positional || chars.peek() != Some(&'$') {
                    continue;
                }

                chars.next();
                tag.push('$');
                current.push('$');

                let body_start = current.len();
                for next_c in chars.by_ref() {
                    current.push(next_c);
                    if current.len() - body_start >= tag.len() && current.ends_with(&tag) {
                        break;
                    }
                }
            }
            ';' => {
                if has_code {
                    statements.push(current.trim().to_string());
                }
                current.clear();
                has_code = false;
            }
            _ => {
                if !c.is_whitespace() {
                    has_code = true;
                }
                current.push(c);
            }
        }
    }

    if has_code {
        statements.push(current.trim().to_string());
    }

    statements
}
