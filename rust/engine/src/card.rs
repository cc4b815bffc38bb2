use serde::{Deserialize, Serialize};

use crate::board::Rect;

/// Default length of one half-turn of the flip animation.
pub const DEFAULT_FLIP_SECS: f32 = 0.25;

/// Visual lifecycle of a single card.
///
/// Legal path: `Hidden -> FlippingToFront -> Revealed`, then either
/// `FlippingToBack -> Hidden` or `Matched`. `Matched` is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CardState {
    /// Face down and clickable
    Hidden,
    /// Turning face up
    FlippingToFront,
    /// Face up, waiting for the session to decide
    Revealed,
    /// Turning face down after a mismatch or the preview
    FlippingToBack,
    /// Part of a found pair
    Matched,
}

/// One card on the board. Knows nothing about pairing rules or scoring;
/// the session controller drives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Shared by exactly two cards of a grid
    pair_id: u32,
    /// Identity of the card face in the owning deck or unlocked pool
    card_id: u32,
    /// Nekoins granted when this card's pair is found
    coin_value: u32,
    state: CardState,
    /// 0..1 progress of the current flip animation
    flip_progress: f32,
    flip_secs: f32,
    rect: Rect,
}

impl Card {
    pub fn new(pair_id: u32, card_id: u32, coin_value: u32, rect: Rect) -> Self {
        Self {
            pair_id,
            card_id,
            coin_value,
            state: CardState::Hidden,
            flip_progress: 0.0,
            flip_secs: DEFAULT_FLIP_SECS,
            rect,
        }
    }

    pub fn pair_id(&self) -> u32 {
        self.pair_id
    }
    pub fn card_id(&self) -> u32 {
        self.card_id
    }
    pub fn coin_value(&self) -> u32 {
        self.coin_value
    }
    pub fn state(&self) -> CardState {
        self.state
    }
    pub fn flip_progress(&self) -> f32 {
        self.flip_progress
    }
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Non-positive durations make every flip complete on the next update.
    pub fn set_flip_secs(&mut self, secs: f32) {
        self.flip_secs = secs;
    }

    pub fn can_be_clicked(&self) -> bool {
        self.state == CardState::Hidden
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.state,
            CardState::FlippingToFront | CardState::FlippingToBack
        )
    }

    pub fn is_matched(&self) -> bool {
        self.state == CardState::Matched
    }

    /// True while the face is at least partly visible.
    pub fn is_face_up(&self) -> bool {
        matches!(
            self.state,
            CardState::FlippingToFront | CardState::Revealed | CardState::Matched
        )
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.rect.contains(x, y)
    }

    /// Starts turning a hidden card face up. Returns false otherwise.
    pub fn flip(&mut self) -> bool {
        if !self.can_be_clicked() {
            return false;
        }
        self.state = CardState::FlippingToFront;
        self.flip_progress = 0.0;
        true
    }

    /// Starts turning a revealed card face down. Returns false otherwise.
    pub fn flip_back(&mut self) -> bool {
        if self.state != CardState::Revealed {
            return false;
        }
        self.state = CardState::FlippingToBack;
        self.flip_progress = 0.0;
        true
    }

    pub fn set_matched(&mut self) {
        self.state = CardState::Matched;
        self.flip_progress = 0.0;
    }

    /// Advances the flip animation. Returns the new state when a flip finished.
    pub fn update(&mut self, dt: f32) -> Option<CardState> {
        if !self.is_animating() {
            return None;
        }
        if self.flip_secs <= 0.0 {
            self.flip_progress = 1.0;
        } else {
            self.flip_progress += dt.max(0.0) / self.flip_secs;
        }
        if self.flip_progress < 1.0 {
            return None;
        }
        self.flip_progress = 0.0;
        self.state = match self.state {
            CardState::FlippingToFront => CardState::Revealed,
            _ => CardState::Hidden,
        };
        Some(self.state)
    }
}
