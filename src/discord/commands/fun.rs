// Joke commands, usage counters and cowsay.

use crate::core::counters::{button_message, usage_message, CounterKind};
use crate::core::fun::beep::{announcement, busy_message, MAX_BEEPS, MAX_DELAY_SECS, MIN_DELAY_SECS};
use crate::core::fun::cowsay::cowsay as render_cow;
use crate::core::fun::texts::{RICKROLL_GIF, RICKROLL_WARNING};
use crate::discord::replies;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Duration;

const CLICK_BUTTON_ID: &str = "howmanybutton_click";

/// Beeps in the computer that is hosting the bot.
#[poise::command(slash_command)]
pub async fn beep(
    ctx: Context<'_>,
    #[description = "How many times to beep (if not provided, default value is: 1)"]
    #[min = 2]
    #[max = 100]
    times: Option<u32>,
    #[description = "Delay between beeps (in seconds, must be bigger than 0.05 and smaller than 5)"]
    #[min = 0.05]
    #[max = 5.0]
    beep_delay: Option<f64>,
) -> Result<(), Error> {
    let user_id = ctx.author().id.get();
    let times = times.unwrap_or(1).min(MAX_BEEPS);
    let beep_delay = beep_delay.map(|d| d.clamp(MIN_DELAY_SECS, MAX_DELAY_SECS));

    let gate = Arc::clone(&ctx.data().beep);
    let Some(_permit) = gate.try_acquire() else {
        tracing::info!(user = %ctx.author().name, "Beep refused, already beeping");
        ctx.say(busy_message(user_id)).await?;
        return Ok(());
    };

    ctx.say(announcement(user_id, times, beep_delay)).await?;
    tracing::info!(user = %ctx.author().name, times, ?beep_delay, "Beeping");

    let delay = beep_delay.map(Duration::from_secs_f64);
    if let Err(e) = ctx.data().host.beep(times, delay).await {
        tracing::warn!("Beep failed: {}", e);
    }
    Ok(())
}

/// .
#[poise::command(slash_command, prefix_command)]
pub async fn nothing(ctx: Context<'_>) -> Result<(), Error> {
    replies::private(ctx, ".").await
}

/// Complain to the bot owner.
#[poise::command(slash_command, prefix_command)]
pub async fn complain(ctx: Context<'_>) -> Result<(), Error> {
    tracing::info!(user = %ctx.author().name, "Complained and regretted it");
    replies::private(ctx, RICKROLL_GIF).await
}

/// Shows a heart.
#[poise::command(slash_command, prefix_command)]
pub async fn heart(ctx: Context<'_>) -> Result<(), Error> {
    replies::private(ctx, ":middle_finger:").await
}

/// Shows a finger.
#[poise::command(slash_command, prefix_command)]
pub async fn finger(ctx: Context<'_>) -> Result<(), Error> {
    replies::private(ctx, ":heart:").await
}

/// Rickrolls you, on request.
#[poise::command(slash_command, prefix_command)]
pub async fn rickroll_me(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(RICKROLL_WARNING).await?;
    ctx.say(RICKROLL_GIF).await?;
    Ok(())
}

/// Says how many times was the command typed
#[poise::command(slash_command, prefix_command)]
pub async fn howmanytimes(ctx: Context<'_>) -> Result<(), Error> {
    let count = ctx
        .data()
        .counters
        .increment(CounterKind::HowManyTimes, ctx.author().id.get())
        .await?;
    ctx.say(usage_message(count)).await?;
    Ok(())
}

/// How many times did you press the button?
#[poise::command(slash_command)]
pub async fn howmanybutton(ctx: Context<'_>) -> Result<(), Error> {
    let button = serenity::CreateButton::new(CLICK_BUTTON_ID)
        .label("Click me!")
        .style(serenity::ButtonStyle::Success);

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .content("Click this button!")
                .components(vec![serenity::CreateActionRow::Buttons(vec![button])]),
        )
        .await?;
    let msg_id = reply.message().await?.id;

    // Anyone may click, not just the caller.
    while let Some(mci) = serenity::ComponentInteractionCollector::new(ctx)
        .channel_id(ctx.channel_id())
        .timeout(Duration::from_secs(60 * 10))
        .filter(move |mci| mci.message.id == msg_id && mci.data.custom_id == CLICK_BUTTON_ID)
        .await
    {
        let clicker = mci.user.id.get();
        let response = match ctx
            .data()
            .counters
            .increment(CounterKind::HowManyButton, clicker)
            .await
        {
            Ok(count) => serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .content(button_message(clicker, count)),
            ),
            Err(e) => {
                tracing::error!(user_id = clicker, "Could not count button click: {}", e);
                serenity::CreateInteractionResponse::Message(
                    serenity::CreateInteractionResponseMessage::new()
                        .content("I couldn't count that click, sorry.")
                        .ephemeral(true),
                )
            }
        };

        if let Err(e) = mci.create_response(&ctx, response).await {
            tracing::warn!("Error answering button click: {:?}", e);
        }
    }

    // Remove the button once nobody can click it anymore.
    if let Err(e) = reply
        .edit(ctx, poise::CreateReply::default().components(vec![]))
        .await
    {
        tracing::debug!("Could not remove the button: {}", e);
    }
    Ok(())
}

/// I'm a cow!
#[poise::command(slash_command, prefix_command)]
pub async fn cowsay(
    ctx: Context<'_>,
    #[description = "What you want me to say?"]
    #[rest]
    text: String,
) -> Result<(), Error> {
    ctx.say(render_cow(&text)).await?;
    Ok(())
}
