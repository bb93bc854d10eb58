//! Speech-bubble cow rendered inside a Discord code block.

/// Discord messages cap at 2000 characters; leave room for the bubble and cow.
const MAX_TEXT_CHARS: usize = 1800;

const COW: &str = r"        \   ^__^
         \  (oo)\_______
            (__)\       )\/\
                ||----w |
                ||     ||";

/// Renders `text` as a cowsay block. Blank input gets a cow asking what to say.
pub fn cowsay(text: &str) -> String {
    if text.trim().is_empty() {
        return render(&["What should I say?"]);
    }

    // A stray fence would close the code block early.
    let mut text = text.replace("```", "` ` `");

    if text.chars().count() > MAX_TEXT_CHARS {
        text = text.chars().take(MAX_TEXT_CHARS - 3).collect::<String>() + "...";
    }

    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return render(&["..."]);
    }
    render(&lines)
}

fn render(lines: &[&str]) -> String {
    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let top = format!(" {}", "_".repeat(width + 2));
    let bottom = format!(" {}", "-".repeat(width + 2));
    let bubble: Vec<String> = lines
        .iter()
        .map(|line| {
            let pad = width - line.chars().count();
            format!("< {}{} >", line, " ".repeat(pad))
        })
        .collect();

    format!("```\n{}\n{}\n{}\n{}\n```", top, bubble.join("\n"), bottom, COW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let out = cowsay("moo");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "```");
        assert_eq!(lines[1], " _____");
        assert_eq!(lines[2], "< moo >");
        assert_eq!(lines[3], " -----");
        assert!(out.contains("(oo)"));
        assert!(out.ends_with("```"));
    }

    #[test]
    fn test_blank_input_asks_what_to_say() {
        for input in ["", "   ", "\n\t"] {
            let out = cowsay(input);
            assert!(out.contains("< What should I say? >"), "input {:?}", input);
        }
    }

    #[test]
    fn test_multiline_lines_are_padded_to_widest() {
        let out = cowsay("a\nlonger line");
        assert!(out.contains(&format!("< a{} >", " ".repeat(10))));
        assert!(out.contains("< longer line >"));
        assert!(out.contains(&format!(" {}", "_".repeat(13))));
    }

    #[test]
    fn test_code_fences_are_defused() {
        let out = cowsay("```rust```");
        assert!(out.contains("` ` `rust` ` `"));
        // Only the wrapping fences remain.
        assert_eq!(out.matches("```").count(), 2);
    }

    #[test]
    fn test_long_text_is_truncated() {
        let long = "x".repeat(2500);
        let out = cowsay(&long);
        let bubble = out.lines().nth(2).unwrap();
        assert_eq!(bubble.chars().count(), 1800 + 4);
        assert!(bubble.ends_with("... >"));
    }

    #[test]
    fn test_width_counts_characters_not_bytes() {
        let out = cowsay("żółw");
        assert!(out.contains(" ______\n"));
    }
}
