//! Fire-and-forget side channels: sounds out, ad rewards in.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use serde::{Deserialize, Serialize};

/// Sound cues the session asks the host to play.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sound {
    Flip,
    Match,
    Mismatch,
    Shuffle,
    GridClear,
    Hint,
    Freeze,
    Victory,
    Defeat,
}

pub trait Notifier {
    fn play_sound(&mut self, sound: Sound);
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn play_sound(&mut self, _sound: Sound) {}
}

/// Records cues in order; handy for hosts that batch audio per frame.
impl Notifier for Vec<Sound> {
    fn play_sound(&mut self, sound: Sound) {
        self.push(sound);
    }
}

/// Result of a rewarded ad as reported by the platform SDK.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AdSignal {
    Earned,
    Cancelled,
}

/// Sending half handed to the ad SDK callback. May live on another thread.
#[derive(Debug, Clone)]
pub struct AdRewardHandle {
    tx: Sender<AdSignal>,
}

impl AdRewardHandle {
    pub fn on_ad_reward_earned(&self) {
        // receiver gone means the session was discarded; nothing to reward
        let _ = self.tx.send(AdSignal::Earned);
    }

    pub fn on_ad_reward_cancelled(&self) {
        let _ = self.tx.send(AdSignal::Cancelled);
    }
}

/// Receiving half, drained by the session at the start of each tick.
#[derive(Debug)]
pub struct AdInbox {
    rx: Receiver<AdSignal>,
}

impl AdInbox {
    pub fn drain(&self) -> Vec<AdSignal> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(sig) => out.push(sig),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

pub fn ad_channel() -> (AdRewardHandle, AdInbox) {
    let (tx, rx) = mpsc::channel();
    (AdRewardHandle { tx }, AdInbox { rx })
}
