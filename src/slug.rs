//! Destination file names.

/// Replace every run of characters that are not alphanumeric or `.` with a
/// single `-`. Case is preserved; callers lowercase first when they want to.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() || c == '.' {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out
}

/// File name a note is written under in the content tree.
pub fn destination_file_name(name: &str) -> String {
    slugify(&name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs() {
        assert_eq!(slugify("my  note -- draft.md"), "my-note-draft.md");
        assert_eq!(slugify("a/b\\c"), "a-b-c");
    }

    #[test]
    fn keeps_case_dots_and_digits() {
        assert_eq!(slugify("Release 1.2.md"), "Release-1.2.md");
    }

    #[test]
    fn unicode_letters_survive() {
        assert_eq!(slugify("café über.md"), "café-über.md");
    }

    #[test]
    fn leading_separator_becomes_single_dash() {
        assert_eq!(slugify("  (draft) x.md"), "-draft-x.md");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn idempotent_and_never_doubles_dashes() {
        for input in ["My Note.md", "a - b -- c.md", "--x--", "Q&A: what?.md", "é à ü"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {:?}", input);
            assert!(!once.contains("--"), "double dash in {:?}", once);
        }
    }

    #[test]
    fn destination_name_lowercases_first() {
        assert_eq!(destination_file_name("My Note.md"), "my-note.md");
    }
}
