// Discord commands module.
// Each feature gets its own command file.

pub mod admin;
pub mod f1;
pub mod fun;
pub mod music;
pub mod other;
pub mod utility;

// Status helpers shared by `/change_status` and the voice player.
pub mod presence;

use crate::discord::{Data, Error};

/// Every command the bot registers.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        admin::shutdown(),
        admin::purge(),
        admin::change_status(),
        admin::create_webhook(),
        admin::delete_webhook(),
        admin::turn_off_pc(),
        admin::send_messages(),
        utility::webhook(),
        utility::say(),
        utility::dm_or_not(),
        utility::ai(),
        utility::hide_conversation(),
        fun::beep(),
        fun::nothing(),
        fun::complain(),
        fun::heart(),
        fun::finger(),
        fun::rickroll_me(),
        fun::howmanytimes(),
        fun::howmanybutton(),
        fun::cowsay(),
        f1::f1_result(),
        f1::f1_calendar(),
        f1::f1_standings(),
        f1::f1_driver(),
        music::play(),
        music::play_youtube(),
        music::queue(),
        music::skip(),
        music::stop(),
        music::join_vc(),
        music::leave_vc(),
        music::youtube_audio(),
        other::ping(),
        other::source(),
        other::license(),
    ]
}
