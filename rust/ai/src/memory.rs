//! Memory-based bot.
//!
//! Keeps a map from card index to the face it last saw there. Each face it
//! sees is retained with probability `recall`, so `1.0` plays perfectly after
//! the preview and `0.0` guesses blindly. A card that changes position is
//! forgotten, which is what a reshuffle does to a human player.

use std::collections::HashMap;

use nekomemo_engine::board::Rect;
use nekomemo_engine::card::CardState;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::{AutoPlayer, CardView};

#[derive(Debug, Clone)]
pub struct MemoryBot {
    name: String,
    recall: f64,
    rng: ChaCha20Rng,
    /// index -> (face, where it was seen)
    known: HashMap<usize, (u32, Rect)>,
}

impl MemoryBot {
    pub fn new(name: &str, recall: f64, seed: u64) -> Self {
        Self {
            name: name.to_string(),
            recall: recall.clamp(0.0, 1.0),
            rng: ChaCha20Rng::seed_from_u64(seed),
            known: HashMap::new(),
        }
    }

    /// Faces currently remembered.
    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    fn remembered(&self, index: usize, view: &[CardView]) -> Option<u32> {
        let (face, _) = self.known.get(&index)?;
        view[index].is_clickable().then_some(*face)
    }

    fn known_pair(&self, view: &[CardView]) -> Option<usize> {
        let mut by_face: HashMap<u32, usize> = HashMap::new();
        let mut indices: Vec<usize> = self.known.keys().copied().collect();
        indices.sort_unstable();
        for index in indices {
            let Some(face) = self.remembered(index, view) else {
                continue;
            };
            if let Some(&other) = by_face.get(&face) {
                return Some(other);
            }
            by_face.insert(face, index);
        }
        None
    }

    fn partner_of(&self, open: &CardView, view: &[CardView]) -> Option<usize> {
        let face = open.face?;
        let mut candidates: Vec<usize> = self
            .known
            .keys()
            .copied()
            .filter(|&i| i != open.index && self.remembered(i, view) == Some(face))
            .collect();
        candidates.sort_unstable();
        candidates.first().copied()
    }

    /// An unexplored card if there is one, any clickable card otherwise.
    fn explore(&mut self, view: &[CardView]) -> Option<usize> {
        let unknown: Vec<usize> = view
            .iter()
            .filter(|v| v.is_clickable() && !self.known.contains_key(&v.index))
            .map(|v| v.index)
            .collect();
        if let Some(&i) = unknown.choose(&mut self.rng) {
            return Some(i);
        }
        let clickable: Vec<usize> = view
            .iter()
            .filter(|v| v.is_clickable())
            .map(|v| v.index)
            .collect();
        clickable.choose(&mut self.rng).copied()
    }
}

impl AutoPlayer for MemoryBot {
    fn observe(&mut self, view: &[CardView]) {
        for v in view {
            if v.state == CardState::Matched {
                self.known.remove(&v.index);
                continue;
            }
            if let Some((_, seen_at)) = self.known.get(&v.index) {
                if *seen_at != v.rect {
                    self.known.remove(&v.index);
                }
            }
            let Some(face) = v.face else {
                continue;
            };
            if self.known.get(&v.index).map(|(f, _)| *f) == Some(face) {
                continue;
            }
            if self.rng.random_bool(self.recall) {
                self.known.insert(v.index, (face, v.rect));
            } else {
                self.known.remove(&v.index);
            }
        }
    }

    fn choose(&mut self, view: &[CardView]) -> Option<usize> {
        let open: Vec<&CardView> = view.iter().filter(|v| v.is_open()).collect();
        match open.as_slice() {
            [] => self.known_pair(view).or_else(|| self.explore(view)),
            [first] => {
                let first = **first;
                self.partner_of(&first, view).or_else(|| self.explore(view))
            }
            _ => None,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(faces: &[(u32, CardState)]) -> Vec<CardView> {
        faces
            .iter()
            .enumerate()
            .map(|(index, &(face, state))| CardView {
                index,
                rect: Rect::new(index as f32 * 10.0, 0.0, 10.0, 10.0),
                state,
                face: matches!(
                    state,
                    CardState::FlippingToFront | CardState::Revealed | CardState::Matched
                )
                .then_some(face),
            })
            .collect()
    }

    #[test]
    fn perfect_memory_goes_straight_for_a_known_pair() {
        let mut bot = MemoryBot::new("perfect", 1.0, 0);
        bot.observe(&view(&[
            (0, CardState::Revealed),
            (1, CardState::Revealed),
            (0, CardState::Revealed),
            (1, CardState::Revealed),
        ]));
        assert_eq!(bot.known_count(), 4);
        let hidden = view(&[
            (0, CardState::Hidden),
            (1, CardState::Hidden),
            (0, CardState::Hidden),
            (1, CardState::Hidden),
        ]);
        bot.observe(&hidden);
        assert_eq!(bot.choose(&hidden), Some(0));

        let one_open = view(&[
            (0, CardState::Revealed),
            (1, CardState::Hidden),
            (0, CardState::Hidden),
            (1, CardState::Hidden),
        ]);
        assert_eq!(bot.choose(&one_open), Some(2));
    }

    #[test]
    fn zero_recall_remembers_nothing() {
        let mut bot = MemoryBot::new("random", 0.0, 0);
        bot.observe(&view(&[(0, CardState::Revealed), (0, CardState::Revealed)]));
        assert_eq!(bot.known_count(), 0);
    }

    #[test]
    fn moved_and_matched_cards_are_forgotten() {
        let mut bot = MemoryBot::new("perfect", 1.0, 0);
        let mut v = view(&[
            (0, CardState::Revealed),
            (0, CardState::Revealed),
            (1, CardState::Revealed),
        ]);
        bot.observe(&v);
        assert_eq!(bot.known_count(), 3);

        v[0].state = CardState::Matched;
        v[2].rect = Rect::new(500.0, 0.0, 10.0, 10.0);
        v[2].state = CardState::Hidden;
        v[2].face = None;
        bot.observe(&v);
        assert_eq!(bot.known_count(), 1);
    }

    #[test]
    fn waits_while_two_cards_are_open() {
        let mut bot = MemoryBot::new("perfect", 1.0, 0);
        let v = view(&[
            (0, CardState::Revealed),
            (1, CardState::FlippingToFront),
            (2, CardState::Hidden),
        ]);
        assert_eq!(bot.choose(&v), None);
    }

    #[test]
    fn explores_unknown_cards_first() {
        let mut bot = MemoryBot::new("perfect", 1.0, 5);
        bot.observe(&view(&[(0, CardState::Revealed), (1, CardState::Hidden)]));
        let v = view(&[(0, CardState::Hidden), (1, CardState::Hidden)]);
        assert_eq!(bot.choose(&v), Some(1));
    }
}
