use crate::discord::replies;
use crate::discord::{Context, Error};

/// poise check for administration commands.
///
/// Answers the caller itself when refusing, so the framework error handler
/// stays silent about failed checks.
pub async fn owner_only(ctx: Context<'_>) -> Result<bool, Error> {
    let owners = &ctx.data().owners;
    if owners.is_owner(ctx.author().id.get()) {
        return Ok(true);
    }

    tracing::info!(
        user = %ctx.author().name,
        command = %ctx.command().qualified_name,
        "Refused admin command"
    );
    replies::notice(ctx, owners.denial_message()).await?;
    Ok(false)
}
