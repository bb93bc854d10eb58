// Commands that touch the machine the bot runs on.

use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

pub const POWEROFF_DISABLED_MESSAGE: &str =
    "PC cannot be turned off, because I have not been permitted from doing so.";

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Powering off is disabled on this host")]
    PoweroffDisabled,

    #[error("Could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },
}

pub struct HostControl {
    poweroff_enabled: bool,
    beep_program: String,
    poweroff_program: String,
}

impl HostControl {
    pub fn new(poweroff_enabled: bool) -> Self {
        Self {
            poweroff_enabled,
            beep_program: "beep".to_string(),
            poweroff_program: "poweroff".to_string(),
        }
    }

    pub fn poweroff_enabled(&self) -> bool {
        self.poweroff_enabled
    }

    async fn run(program: &str) -> Result<(), HostError> {
        let status = Command::new(program)
            .status()
            .await
            .map_err(|source| HostError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(HostError::Failed {
                program: program.to_string(),
                status: status.to_string(),
            })
        }
    }

    /// Runs the PC-speaker `beep` program `times` times, pausing `delay` between runs.
    /// Stops at the first failure (usually: no speaker on this machine).
    pub async fn beep(&self, times: u32, delay: Option<Duration>) -> Result<(), HostError> {
        for i in 0..times {
            Self::run(&self.beep_program).await?;
            if let Some(delay) = delay {
                if i + 1 < times {
                    tokio::time::sleep(delay).await;
                }
            }
        }
        Ok(())
    }

    pub async fn poweroff(&self) -> Result<(), HostError> {
        if !self.poweroff_enabled {
            return Err(HostError::PoweroffDisabled);
        }
        tracing::warn!("Powering off the host");
        Self::run(&self.poweroff_program).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_poweroff_refused_when_disabled() {
        let host = HostControl::new(false);
        assert!(matches!(
            host.poweroff().await,
            Err(HostError::PoweroffDisabled)
        ));
    }

    #[tokio::test]
    async fn test_missing_beep_program() {
        let mut host = HostControl::new(false);
        host.beep_program = "definitely-not-a-beep-binary".to_string();
        assert!(matches!(
            host.beep(3, None).await,
            Err(HostError::Spawn { .. })
        ));
    }

    #[tokio::test]
    async fn test_beep_runs_each_time() {
        let mut host = HostControl::new(false);
        // `true` exits 0 without a speaker.
        host.beep_program = "true".to_string();
        host.beep(3, Some(Duration::from_millis(1))).await.unwrap();
    }

    #[tokio::test]
    async fn test_failing_program_is_reported() {
        let mut host = HostControl::new(true);
        host.poweroff_program = "false".to_string();
        assert!(matches!(
            host.poweroff().await,
            Err(HostError::Failed { .. })
        ));
    }
}
