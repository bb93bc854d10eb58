// Source and license texts shown by `/source`, `/license` and the startup banner.

pub const SOURCE_URL: &str = "https://github.com/hakergeniusz/discord-bot";
pub const SOURCE_BUTTON_LABEL: &str = "View Source Code";
pub const COPYRIGHT: &str = "Copyright (C) 2026 hakergeniusz";
pub const LICENSE_TITLE: &str = "📜 Legal Information & License";
pub const LICENSE_COLOR: u32 = 0x3498db;

const GPL_URL: &str = "https://www.gnu.org/licenses/gpl-3.0.txt";

pub fn source_text(with_button: bool) -> String {
    if with_button {
        "This bot is open-source! You can find the source by clicking the following button:"
            .to_string()
    } else {
        format!(
            "This bot is open-source! You can find the source here: {}",
            SOURCE_URL
        )
    }
}

/// License body shared by the embed and the plain-text variant.
pub fn license_body() -> String {
    format!(
        "**{COPYRIGHT}**\n\n\
         This program is free software: you can redistribute it and/or modify it under the terms \
         of the **GNU General Public License v3.0** as published by the Free Software Foundation.\n\n\
         ### ⚠️ Disclaimer of Warranty\n\
         This program is distributed in the hope that it will be useful, but **WITHOUT ANY \
         WARRANTY**; without even the implied warranty of **MERCHANTABILITY** or **FITNESS FOR A \
         PARTICULAR PURPOSE**. See the [GNU GPLv3]({GPL_URL}) for more details."
    )
}

pub fn license_markdown() -> String {
    format!("{}\n\n{}", LICENSE_TITLE, license_body())
}

/// Lines logged once the gateway reports ready.
pub fn startup_banner(user_tag: &str) -> Vec<String> {
    vec![
        format!("Logged on as \"{}\"", user_tag),
        COPYRIGHT.to_string(),
        "This program comes with ABSOLUTELY NO WARRANTY.".to_string(),
        "This is free software under the GNU GPLv3.".to_string(),
    ]
}
