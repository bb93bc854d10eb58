// Bot information: latency, source link and license.

use crate::core::about::{
    license_body, license_markdown, source_text, LICENSE_COLOR, LICENSE_TITLE,
    SOURCE_BUTTON_LABEL, SOURCE_URL,
};
use crate::discord::replies;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

fn source_button_row() -> serenity::CreateActionRow {
    serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new_link(SOURCE_URL).label(SOURCE_BUTTON_LABEL)
    ])
}

/// Pong! Outputs the latency of the bot.
#[poise::command(slash_command, prefix_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await.as_millis();
    ctx.reply(format!("Pong! Latency is {}ms", latency)).await?;
    Ok(())
}

/// Source of the bot.
#[poise::command(slash_command, prefix_command)]
pub async fn source(ctx: Context<'_>) -> Result<(), Error> {
    if !replies::is_slash(ctx) {
        ctx.say(source_text(false)).await?;
        return Ok(());
    }

    ctx.send(
        poise::CreateReply::default()
            .content(source_text(true))
            .components(vec![source_button_row()]),
    )
    .await?;
    Ok(())
}

/// Bot's license information.
#[poise::command(slash_command, prefix_command)]
pub async fn license(ctx: Context<'_>) -> Result<(), Error> {
    if !replies::is_slash(ctx) {
        ctx.say(license_markdown()).await?;
        return Ok(());
    }

    let embed = serenity::CreateEmbed::new()
        .title(LICENSE_TITLE)
        .description(license_body())
        .color(LICENSE_COLOR);
    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .components(vec![source_button_row()]),
    )
    .await?;
    Ok(())
}
