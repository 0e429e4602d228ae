/// One level of indentation in text output.
pub const INDENT: &str = "  ";

/// Prompt opening a code block.
pub const PROMPT: &str = ">>> ";

/// Prompt continuing a code block after an embedded newline.
pub const CONTINUATION: &str = "... ";

/// Indent every non-blank line of `text` by `level` indentation units.
pub fn indent(text: &str, level: usize) -> String {
	let pad = INDENT.repeat(level);
	let mut out = String::with_capacity(text.len() + pad.len() * 4);
	for line in text.split_inclusive('\n') {
		if !line.trim().is_empty() {
			out.push_str(&pad);
		}
		out.push_str(line);
	}
	out
}

/// Make sure `text` ends with a newline, so it can be followed by another block.
pub fn ensure_block(mut text: String) -> String {
	if !text.is_empty() && !text.ends_with('\n') {
		text.push('\n');
	}
	text
}

/// Text underlined with `marker` up to its own width.
pub fn underline(title: &str, marker: char) -> String {
	let rule: String = std::iter::repeat_n(marker, title.chars().count()).collect();
	format!("{title}\n{rule}\n")
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn indent_skips_blank_lines() {
		assert_eq!(indent("a\n\nb\n", 1), "  a\n\n  b\n");
		assert_eq!(indent("x", 2), "    x");
	}

	#[test]
	fn ensure_block_adds_single_newline() {
		assert_eq!(ensure_block("a".to_string()), "a\n");
		assert_eq!(ensure_block("a\n".to_string()), "a\n");
		assert_eq!(ensure_block(String::new()), "");
	}

	#[test]
	fn underline_matches_width() {
		assert_eq!(underline("Notes", '-'), "Notes\n-----\n");
	}
}
