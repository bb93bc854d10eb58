// F1 statistics commands.
//
// Slash invocations answer with an embed, prefix invocations with a bold
// title followed by plain lines.

use crate::core::f1::f1_service::normalize_driver_code;
use crate::core::f1::F1Error;
use crate::discord::replies;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

const F1_RED: u32 = 0xe74c3c;

const WAIT_NOTICE: &str = "Someone else is already using this command. Please wait until this message is replaced.\n\
> Q: Why do I need to wait?\n\
> A: This command when used by many people at once does not function correctly.";
const TURN_NOTICE: &str = "It's your turn. Please wait a moment until I download the required data.";

async fn send_lines(ctx: Context<'_>, title: String, lines: &[String]) -> Result<(), Error> {
    let body = lines.join("\n");
    if replies::is_slash(ctx) {
        let embed = serenity::CreateEmbed::new()
            .title(title)
            .description(body)
            .color(F1_RED);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
    } else {
        ctx.say(format!("**{}:**\n{}", title, body)).await?;
    }
    Ok(())
}

/// Validation problems are shown to the user; API failures are logged.
async fn report(ctx: Context<'_>, err: F1Error) -> Result<(), Error> {
    match err {
        F1Error::Api(detail) => {
            tracing::error!(command = %ctx.command().name, "F1 API failure: {}", detail);
            ctx.say("Could not reach the F1 data service. Please try again later.")
                .await?;
        }
        F1Error::RateLimited { retry_after } => {
            tracing::warn!(
                command = %ctx.command().name,
                ?retry_after,
                "F1 API still rate limiting"
            );
            ctx.say("The F1 data service is rate limiting requests. Please try again in a minute.")
                .await?;
        }
        F1Error::InvalidDriverCode(_) => {
            ctx.say("Invalid driver code.").await?;
        }
        other => {
            ctx.say(format!("{}.", other)).await?;
        }
    }
    Ok(())
}

/// Outputs the result of an F1 race
#[poise::command(slash_command, prefix_command)]
pub async fn f1_result(
    ctx: Context<'_>,
    #[description = "Season of the race you want the result of"]
    #[min = 1950]
    season: i32,
    #[description = "Round number of the race asked. You can get one with /f1_calendar"]
    #[min = 1]
    #[max = 24]
    round: u32,
    #[description = "Show medals for the podium (default: yes)"] medals: Option<bool>,
) -> Result<(), Error> {
    ctx.defer().await?;

    match ctx
        .data()
        .f1
        .race_result(season, round, medals.unwrap_or(true))
        .await
    {
        Ok(Some((race_name, lines))) => {
            send_lines(ctx, format!("F1 {} {}", season, race_name), &lines).await
        }
        Ok(None) => {
            ctx.say(format!("There wasn't R{} in {}.", round, season))
                .await?;
            Ok(())
        }
        Err(e) => report(ctx, e).await,
    }
}

/// Shows an F1 calendar
#[poise::command(slash_command, prefix_command)]
pub async fn f1_calendar(
    ctx: Context<'_>,
    #[description = "Season of the calendar you want to know"]
    #[min = 1950]
    season: i32,
) -> Result<(), Error> {
    ctx.defer().await?;

    match ctx.data().f1.season_calendar(season).await {
        Ok(Some(lines)) => send_lines(ctx, format!("F1 {} calendar", season), &lines).await,
        Ok(None) => {
            ctx.say(format!("There is no calendar for {} yet.", season))
                .await?;
            Ok(())
        }
        Err(e) => report(ctx, e).await,
    }
}

/// Shows the F1 driver standings of a season
#[poise::command(slash_command, prefix_command)]
pub async fn f1_standings(
    ctx: Context<'_>,
    #[description = "Season of the standings you want to know"]
    #[min = 1950]
    season: i32,
) -> Result<(), Error> {
    ctx.defer().await?;

    match ctx.data().f1.driver_standings(season).await {
        Ok(lines) if lines.is_empty() => {
            ctx.say(format!("There are no driver standings for {}.", season))
                .await?;
            Ok(())
        }
        Ok(lines) => {
            send_lines(ctx, format!("F1 {} driver standings", season), &lines).await
        }
        Err(e) => report(ctx, e).await,
    }
}

/// Shows F1 driver's results in a season.
#[poise::command(slash_command, prefix_command)]
pub async fn f1_driver(
    ctx: Context<'_>,
    #[description = "The 3-letter driver code (e.g. VER)"]
    #[min_length = 3]
    #[max_length = 3]
    driver_code: String,
    #[description = "Season of the results you want to know."]
    #[min = 1950]
    season: i32,
    #[description = "Toggle for showing races with DNS (Default: False)."]
    show_not_started: Option<bool>,
) -> Result<(), Error> {
    ctx.defer().await?;

    let code = match normalize_driver_code(&driver_code) {
        Ok(code) => code,
        Err(e) => return report(ctx, e).await,
    };

    let f1 = Arc::clone(&ctx.data().f1);
    let mut waiting = None;
    let _guard = match f1.try_claim_driver_lookup() {
        Some(guard) => guard,
        None => {
            let notice = ctx.say(WAIT_NOTICE).await?;
            let guard = f1.claim_driver_lookup().await;
            notice
                .edit(ctx, poise::CreateReply::default().content(TURN_NOTICE))
                .await?;
            waiting = Some(notice);
            guard
        }
    };

    tracing::info!(user = %ctx.author().name, %code, season, "Walking F1 season");
    let outcome = f1
        .driver_season(&code, season, show_not_started.unwrap_or(false))
        .await;

    let sent = match outcome {
        Ok(summary) if summary.races_found == 0 => ctx
            .say(format!(
                "Could not find any results for driver {} in {} season.",
                code, season
            ))
            .await
            .map(|_| ())
            .map_err(Error::from),
        Ok(summary) => {
            send_lines(
                ctx,
                format!("F1 Season Results: {} ({})", code, season),
                &summary.lines,
            )
            .await
        }
        Err(e) => report(ctx, e).await,
    };

    if let Some(notice) = waiting {
        if let Err(e) = notice.delete(ctx).await {
            tracing::debug!("Could not delete wait notice: {}", e);
        }
    }
    sent
}
