// The host machine's PC speaker can only do one thing at a time.

use std::sync::atomic::{AtomicBool, Ordering};

pub const MAX_BEEPS: u32 = 100;
pub const MIN_DELAY_SECS: f64 = 0.05;
pub const MAX_DELAY_SECS: f64 = 5.0;

#[derive(Default)]
pub struct BeepGate {
    busy: AtomicBool,
}

/// Releases the gate when dropped, even if the beeping task fails midway.
pub struct BeepPermit<'a> {
    gate: &'a BeepGate,
}

impl Drop for BeepPermit<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

impl BeepGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another beep sequence is running.
    pub fn try_acquire(&self) -> Option<BeepPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| BeepPermit { gate: self })
    }
}

pub fn busy_message(user_id: u64) -> String {
    format!(
        "<@{}>, you cannot beep while I am already beeping. Please try again later.",
        user_id
    )
}

pub fn announcement(user_id: u64, times: u32, delay_secs: Option<f64>) -> String {
    if times == 1 {
        return format!("<@{}>, I will beep 1 time in the computer.", user_id);
    }
    match delay_secs {
        Some(delay) => {
            let unit = if delay == 1.0 { "second" } else { "seconds" };
            format!(
                "<@{}>, I will beep {} times with the delay between of them of {} {} in the computer.",
                user_id, times, delay, unit
            )
        }
        None => format!("<@{}>, I will beep {} times in the computer.", user_id, times),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_is_exclusive_and_released_on_drop() {
        let gate = BeepGate::new();
        let permit = gate.try_acquire();
        assert!(permit.is_some());
        assert!(gate.try_acquire().is_none());
        drop(permit);
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn test_announcements() {
        assert_eq!(
            announcement(5, 1, None),
            "<@5>, I will beep 1 time in the computer."
        );
        assert_eq!(
            announcement(5, 3, None),
            "<@5>, I will beep 3 times in the computer."
        );
        assert!(announcement(5, 3, Some(1.0)).ends_with("of 1 second in the computer."));
        assert!(announcement(5, 3, Some(0.5)).ends_with("of 0.5 seconds in the computer."));
    }
}
