//! Line-oriented environment-fragment merging.
//!
//! Each resolved fragment may carry a `.env` file of `KEY=value` lines. The
//! merged result keeps the **first** occurrence of every key across all
//! fragments in resolution order: base and earlier fragments define the
//! canonical default, and a later optional fragment must not silently
//! override a value belonging to an earlier-selected concern.
//!
//! The output is always a freshly constructed file, never an in-place edit,
//! so the merge is deterministic regardless of what was on disk beforehand.

/// A parsed `KEY=value` assignment.
///
/// Keys match the original recognizer: one or more ASCII uppercase letters,
/// digits, or underscores, immediately followed by `=`. Anything else
/// (comments, blank lines, lowercase keys) is not a variable definition.
pub fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    let valid = key
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    valid.then_some((key, value))
}

/// Merge environment fragments in order, first definition of a key winning.
///
/// Input is the `.env` content of each fragment that has one, in resolution
/// order. Output preserves the order in which keys were first seen and is
/// newline-terminated; non-variable lines are dropped.
pub fn merge_env_fragments<'a, I>(sources: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: Vec<(&str, &str)> = Vec::new();

    for source in sources {
        for line in source.lines() {
            if let Some((key, value)) = parse_env_line(line) {
                if !seen.iter().any(|(k, _)| *k == key) {
                    seen.push((key, value));
                }
            }
        }
    }

    let mut out = String::new();
    for (key, value) in seen {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_uppercase_keys() {
        assert_eq!(
            parse_env_line("DATABASE_URL=postgres://localhost"),
            Some(("DATABASE_URL", "postgres://localhost"))
        );
        assert_eq!(parse_env_line("PORT_8080=x"), Some(("PORT_8080", "x")));
    }

    #[test]
    fn rejects_non_variable_lines() {
        assert_eq!(parse_env_line("# comment"), None);
        assert_eq!(parse_env_line(""), None);
        assert_eq!(parse_env_line("lowercase=nope"), None);
        assert_eq!(parse_env_line("=orphan"), None);
        assert_eq!(parse_env_line("NO_EQUALS_SIGN"), None);
    }

    #[test]
    fn empty_value_is_kept() {
        assert_eq!(parse_env_line("EMPTY="), Some(("EMPTY", "")));
    }

    #[test]
    fn first_definition_wins_across_fragments() {
        let base = "DATABASE_URL=base\nNEXTAUTH_URL=http://localhost:3000\n";
        let orm = "DATABASE_URL=orm-override\nDB_POOL_SIZE=5\n";
        let merged = merge_env_fragments([base, orm]);

        assert_eq!(
            merged,
            "DATABASE_URL=base\nNEXTAUTH_URL=http://localhost:3000\nDB_POOL_SIZE=5\n"
        );
    }

    #[test]
    fn first_definition_wins_within_one_fragment() {
        let merged = merge_env_fragments(["KEY=first\nKEY=second\n"]);
        assert_eq!(merged, "KEY=first\n");
    }

    #[test]
    fn comments_and_blank_lines_are_dropped() {
        let merged = merge_env_fragments(["# db settings\n\nDATABASE_URL=x\n"]);
        assert_eq!(merged, "DATABASE_URL=x\n");
    }

    #[test]
    fn no_sources_yields_empty_output() {
        assert_eq!(merge_env_fragments([]), "");
    }
}
