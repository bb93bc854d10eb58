pub const RICKROLL_GIF: &str =
    "https://tenor.com/view/rickroll-roll-rick-never-gonna-give-you-up-never-gonna-gif-22954713";

pub const RICKROLL_WARNING: &str = "Ok, if you want to be rickrolled, you will be.";

const BLANK_BLOCKS: usize = 100;

/// A message tall enough to push the visible conversation off screen.
///
/// Discord trims whitespace-only lines, so each block carries a zero-width space.
pub fn blank_wall() -> String {
    format!("e{}e", "\n\u{200B}\n".repeat(BLANK_BLOCKS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_wall_fits_in_one_message() {
        let wall = blank_wall();
        assert!(wall.starts_with('e') && wall.ends_with('e'));
        assert_eq!(wall.matches('\u{200B}').count(), BLANK_BLOCKS);
        assert!(wall.chars().count() <= 2000);
    }
}
