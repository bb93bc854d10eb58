// Per-guild song queue for the voice player.
//
// The queue only does bookkeeping: who is playing and what comes next. The
// Discord voice glue pops the next track from here whenever the current one
// finishes, so playback is a chain of "track ended -> advance -> play".

use dashmap::DashMap;
use std::collections::VecDeque;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct QueuedTrack {
    pub title: String,
    pub path: PathBuf,
    pub duration: Option<String>,
    pub requested_by: u64,
}

#[derive(Debug, Default)]
struct GuildQueue {
    now_playing: Option<QueuedTrack>,
    upcoming: VecDeque<QueuedTrack>,
}

/// Where a newly queued track ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// Nothing was playing; the caller should start this track now.
    StartNow,
    /// Waiting behind others. 1 = plays next.
    Position(usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueSnapshot {
    pub now_playing: Option<QueuedTrack>,
    pub upcoming: Vec<QueuedTrack>,
}

/// How many upcoming tracks `/queue` lists before summarising the rest.
const LISTED_UPCOMING: usize = 10;

fn describe(track: &QueuedTrack) -> String {
    match &track.duration {
        Some(duration) => format!(
            "**{}** ({}), requested by <@{}>",
            track.title, duration, track.requested_by
        ),
        None => format!("**{}**, requested by <@{}>", track.title, track.requested_by),
    }
}

impl QueueSnapshot {
    pub fn is_empty(&self) -> bool {
        self.now_playing.is_none() && self.upcoming.is_empty()
    }

    /// Text for the `/queue` command.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "The queue is empty.".to_string();
        }

        let mut out = match &self.now_playing {
            Some(track) => format!("Now playing: {}", describe(track)),
            None => "Nothing is playing right now.".to_string(),
        };

        if !self.upcoming.is_empty() {
            out.push_str("\n\nUp next:");
            for (i, track) in self.upcoming.iter().take(LISTED_UPCOMING).enumerate() {
                out.push_str(&format!("\n{}. {}", i + 1, describe(track)));
            }
            if self.upcoming.len() > LISTED_UPCOMING {
                out.push_str(&format!(
                    "\n...and {} more",
                    self.upcoming.len() - LISTED_UPCOMING
                ));
            }
        }
        out
    }
}

/// Per-guild queues, keyed by guild id.
#[derive(Default)]
pub struct SongQueue {
    guilds: DashMap<u64, GuildQueue>,
}

impl SongQueue {
    pub fn new() -> Self {
        Self {
            guilds: DashMap::new(),
        }
    }

    /// Adds a track. If the guild is idle the track becomes "now playing" at once.
    pub fn enqueue(&self, guild_id: u64, track: QueuedTrack) -> Enqueued {
        let mut queue = self.guilds.entry(guild_id).or_default();
        if queue.now_playing.is_none() {
            queue.now_playing = Some(track);
            Enqueued::StartNow
        } else {
            queue.upcoming.push_back(track);
            Enqueued::Position(queue.upcoming.len())
        }
    }

    /// Marks a one-off track as playing if the guild is idle. Returns false when busy.
    pub fn start_if_idle(&self, guild_id: u64, track: QueuedTrack) -> bool {
        let mut queue = self.guilds.entry(guild_id).or_default();
        if queue.now_playing.is_some() {
            return false;
        }
        queue.now_playing = Some(track);
        true
    }

    /// Called when the current track ends: moves the next track into
    /// "now playing" and returns it, or clears the slot when nothing is left.
    pub fn advance(&self, guild_id: u64) -> Option<QueuedTrack> {
        let mut queue = self.guilds.get_mut(&guild_id)?;
        queue.now_playing = queue.upcoming.pop_front();
        queue.now_playing.clone()
    }

    pub fn now_playing(&self, guild_id: u64) -> Option<QueuedTrack> {
        self.guilds
            .get(&guild_id)
            .and_then(|q| q.now_playing.clone())
    }

    pub fn is_playing(&self, guild_id: u64) -> bool {
        self.now_playing(guild_id).is_some()
    }

    /// True while any guild has a track playing.
    pub fn any_playing(&self) -> bool {
        self.guilds.iter().any(|q| q.now_playing.is_some())
    }

    pub fn snapshot(&self, guild_id: u64) -> QueueSnapshot {
        self.guilds
            .get(&guild_id)
            .map(|q| QueueSnapshot {
                now_playing: q.now_playing.clone(),
                upcoming: q.upcoming.iter().cloned().collect(),
            })
            .unwrap_or_default()
    }

    /// Drops everything for the guild. Returns how many upcoming tracks were discarded.
    pub fn clear(&self, guild_id: u64) -> usize {
        self.guilds
            .remove(&guild_id)
            .map(|(_, q)| q.upcoming.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(title: &str) -> QueuedTrack {
        QueuedTrack {
            title: title.to_string(),
            path: PathBuf::from(format!("/tmp/{}.opus", title)),
            duration: None,
            requested_by: 1,
        }
    }

    #[test]
    fn test_first_track_starts_immediately() {
        let queue = SongQueue::new();
        assert_eq!(queue.enqueue(1, track("a")), Enqueued::StartNow);
        assert_eq!(queue.enqueue(1, track("b")), Enqueued::Position(1));
        assert_eq!(queue.enqueue(1, track("c")), Enqueued::Position(2));
        assert_eq!(queue.now_playing(1).unwrap().title, "a");
    }

    #[test]
    fn test_advance_plays_in_order_then_goes_idle() {
        let queue = SongQueue::new();
        queue.enqueue(1, track("a"));
        queue.enqueue(1, track("b"));
        queue.enqueue(1, track("c"));

        assert_eq!(queue.advance(1).unwrap().title, "b");
        assert_eq!(queue.advance(1).unwrap().title, "c");
        assert_eq!(queue.advance(1), None);
        assert!(!queue.is_playing(1));

        // Idle again, so the next track starts right away.
        assert_eq!(queue.enqueue(1, track("d")), Enqueued::StartNow);
    }

    #[test]
    fn test_guilds_are_independent() {
        let queue = SongQueue::new();
        queue.enqueue(1, track("a"));
        assert_eq!(queue.enqueue(2, track("b")), Enqueued::StartNow);
        queue.clear(1);
        assert!(!queue.is_playing(1));
        assert_eq!(queue.now_playing(2).unwrap().title, "b");
    }

    #[test]
    fn test_snapshot_and_clear() {
        let queue = SongQueue::new();
        queue.enqueue(1, track("a"));
        queue.enqueue(1, track("b"));
        queue.enqueue(1, track("c"));

        let snapshot = queue.snapshot(1);
        assert_eq!(snapshot.now_playing.unwrap().title, "a");
        let titles: Vec<_> = snapshot.upcoming.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c"]);

        assert_eq!(queue.clear(1), 2);
        assert_eq!(queue.snapshot(1), QueueSnapshot::default());
    }

    #[test]
    fn test_start_if_idle_refuses_when_busy() {
        let queue = SongQueue::new();
        assert!(queue.start_if_idle(1, track("example")));
        assert!(!queue.start_if_idle(1, track("example")));
        assert!(queue.snapshot(1).upcoming.is_empty());
    }

    #[test]
    fn test_render() {
        let queue = SongQueue::new();
        assert_eq!(queue.snapshot(1).render(), "The queue is empty.");

        let mut first = track("a");
        first.duration = Some("3 minutes".to_string());
        queue.enqueue(1, first);
        queue.enqueue(1, track("b"));
        assert_eq!(
            queue.snapshot(1).render(),
            concat!(
                "Now playing: **a** (3 minutes), requested by <@1>\n\n",
                "Up next:\n1. **b**, requested by <@1>"
            )
        );

        for i in 0..12 {
            queue.enqueue(1, track(&format!("t{}", i)));
        }
        assert!(queue.snapshot(1).render().ends_with("...and 3 more"));
    }

    #[test]
    fn test_any_playing_spans_guilds() {
        let queue = SongQueue::new();
        assert!(!queue.any_playing());

        queue.enqueue(1, track("a"));
        queue.enqueue(2, track("b"));
        queue.advance(1);
        assert!(queue.any_playing());

        queue.clear(2);
        assert!(!queue.any_playing());
    }

    #[test]
    fn test_advance_unknown_guild() {
        let queue = SongQueue::new();
        assert_eq!(queue.advance(99), None);
    }
}
