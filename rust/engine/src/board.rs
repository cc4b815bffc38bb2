use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::errors::EngineError;
use crate::level::GridShape;

/// Card height as a multiple of its width.
pub const CARD_ASPECT: f32 = 1.4;
/// Gap between neighbouring cards as a fraction of card width.
pub const CARD_GAP_RATIO: f32 = 0.1;

/// Axis-aligned rectangle in host coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open on the far edges so adjacent rects never both claim a point.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// What to build: how many pairs, in which grid shape, inside which box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSpec {
    pub pair_count: usize,
    pub grid: GridShape,
    pub bounds: Rect,
}

impl BoardSpec {
    /// Spec whose pair count fills `grid` exactly.
    pub fn for_grid(grid: GridShape, bounds: Rect) -> Self {
        Self {
            pair_count: grid.pair_count(),
            grid,
            bounds,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let GridShape { cols, rows } = self.grid;
        if self.pair_count == 0 {
            return Err(EngineError::ZeroPairs);
        }
        if (cols * rows) % 2 != 0 {
            return Err(EngineError::OddGrid { cols, rows });
        }
        if cols * rows != self.pair_count * 2 {
            return Err(EngineError::GridMismatch {
                cols,
                rows,
                pairs: self.pair_count,
            });
        }
        if !(self.bounds.w > 0.0 && self.bounds.h > 0.0) {
            return Err(EngineError::EmptyBounds);
        }
        Ok(())
    }
}

/// How a pair id maps to a card face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardIdentity {
    /// Pair `i` shows deck card `i`
    Deck,
    /// Pair `i` shows `pool[i]` (time-attack boards built from unlocked cards)
    Pool(Vec<u32>),
}

impl CardIdentity {
    fn card_id(&self, pair_id: u32) -> u32 {
        match self {
            CardIdentity::Deck => pair_id,
            CardIdentity::Pool(ids) => ids[pair_id as usize],
        }
    }
}

/// Builds a shuffled board of `2 * pair_count` cards laid out on `spec.grid`.
///
/// `coin_value` is asked once per pair with the card id of that pair.
///
/// # Examples
///
/// ```
/// use nekomemo_engine::board::{generate, BoardSpec, CardIdentity, Rect};
/// use nekomemo_engine::level::GridShape;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let spec = BoardSpec::for_grid(GridShape { cols: 3, rows: 4 }, Rect::new(0.0, 0.0, 300.0, 500.0));
/// let mut rng = ChaCha20Rng::seed_from_u64(7);
/// let cards = generate(&spec, &CardIdentity::Deck, |_| 1, &mut rng).unwrap();
/// assert_eq!(cards.len(), 12);
/// ```
pub fn generate<R, F>(
    spec: &BoardSpec,
    identity: &CardIdentity,
    coin_value: F,
    rng: &mut R,
) -> Result<Vec<Card>, EngineError>
where
    R: Rng + ?Sized,
    F: Fn(u32) -> u32,
{
    spec.validate()?;
    if let CardIdentity::Pool(ids) = identity {
        if ids.len() < spec.pair_count {
            return Err(EngineError::InsufficientCardPool {
                needed: spec.pair_count,
                available: ids.len(),
            });
        }
    }

    let mut pair_ids: Vec<u32> = (0..spec.pair_count as u32)
        .flat_map(|p| [p, p])
        .collect();
    pair_ids.shuffle(rng);

    let values: Vec<u32> = (0..spec.pair_count as u32)
        .map(|p| coin_value(identity.card_id(p)))
        .collect();

    let rects = layout_rects(spec.grid, spec.bounds);
    Ok(pair_ids
        .into_iter()
        .zip(rects)
        .map(|(pair_id, rect)| {
            Card::new(
                pair_id,
                identity.card_id(pair_id),
                values[pair_id as usize],
                rect,
            )
        })
        .collect())
}

/// Same as [`generate`] with a private ChaCha20 stream. `None` picks a random seed.
pub fn generate_seeded<F>(
    spec: &BoardSpec,
    identity: &CardIdentity,
    coin_value: F,
    seed: Option<u64>,
) -> Result<Vec<Card>, EngineError>
where
    F: Fn(u32) -> u32,
{
    let mut rng = ChaCha20Rng::seed_from_u64(seed.unwrap_or_else(rand::random));
    generate(spec, identity, coin_value, &mut rng)
}

/// Row-major card rectangles for `grid`, centred in `bounds`.
pub fn layout_rects(grid: GridShape, bounds: Rect) -> Vec<Rect> {
    let GridShape { cols, rows } = grid;
    if cols == 0 || rows == 0 {
        return Vec::new();
    }
    let (c, r) = (cols as f32, rows as f32);
    let width_units = c + (c - 1.0) * CARD_GAP_RATIO;
    let height_units = r * CARD_ASPECT + (r - 1.0) * CARD_GAP_RATIO;
    let card_w = (bounds.w / width_units).min(bounds.h / height_units);
    let card_h = card_w * CARD_ASPECT;
    let gap = card_w * CARD_GAP_RATIO;

    let margin_x = (bounds.w - card_w * width_units) / 2.0;
    let margin_y = (bounds.h - card_w * height_units) / 2.0;

    let mut rects = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            rects.push(Rect {
                x: bounds.x + margin_x + col as f32 * (card_w + gap),
                y: bounds.y + margin_y + row as f32 * (card_h + gap),
                w: card_w,
                h: card_h,
            });
        }
    }
    rects
}

/// Permutes the positions of every unmatched card. Pair ids and states stay put.
///
/// Returns the number of cards that took part. When at least two cards take
/// part, at least one of them ends up somewhere else.
pub fn shuffle_positions<R: Rng + ?Sized>(cards: &mut [Card], rng: &mut R) -> usize {
    let movable: Vec<usize> = cards
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_matched())
        .map(|(i, _)| i)
        .collect();
    if movable.len() < 2 {
        return movable.len();
    }
    let original: Vec<Rect> = movable.iter().map(|&i| cards[i].rect()).collect();
    let mut rects = original.clone();
    rects.shuffle(rng);
    if rects == original {
        rects.rotate_left(1);
    }
    for (&i, rect) in movable.iter().zip(rects) {
        cards[i].set_rect(rect);
    }
    movable.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(cols: usize, rows: usize, pairs: usize) -> BoardSpec {
        BoardSpec {
            pair_count: pairs,
            grid: GridShape { cols, rows },
            bounds: Rect::new(0.0, 0.0, 480.0, 800.0),
        }
    }

    #[test]
    fn rejects_malformed_specs() {
        assert_eq!(spec(3, 4, 0).validate(), Err(EngineError::ZeroPairs));
        assert_eq!(
            spec(3, 3, 4).validate(),
            Err(EngineError::OddGrid { cols: 3, rows: 3 })
        );
        assert_eq!(
            spec(4, 4, 6).validate(),
            Err(EngineError::GridMismatch {
                cols: 4,
                rows: 4,
                pairs: 6
            })
        );
        let mut s = spec(3, 4, 6);
        s.bounds.w = 0.0;
        assert_eq!(s.validate(), Err(EngineError::EmptyBounds));
    }

    #[test]
    fn layout_is_centred_and_disjoint() {
        let bounds = Rect::new(10.0, 20.0, 480.0, 800.0);
        let rects = layout_rects(GridShape { cols: 4, rows: 5 }, bounds);
        assert_eq!(rects.len(), 20);
        for (i, a) in rects.iter().enumerate() {
            assert!((a.h - a.w * CARD_ASPECT).abs() < 1e-3);
            assert!(a.x >= bounds.x - 1e-3 && a.x + a.w <= bounds.x + bounds.w + 1e-3);
            assert!(a.y >= bounds.y - 1e-3 && a.y + a.h <= bounds.y + bounds.h + 1e-3);
            for b in rects.iter().skip(i + 1) {
                assert!(!a.overlaps(b));
            }
        }
        let left = rects[0].x - bounds.x;
        let right = bounds.x + bounds.w - (rects[3].x + rects[3].w);
        assert!((left - right).abs() < 1e-3);
        let top = rects[0].y - bounds.y;
        let bottom = bounds.y + bounds.h - (rects[19].y + rects[19].h);
        assert!((top - bottom).abs() < 1e-3);
    }

    #[test]
    fn pool_identity_maps_faces_and_values() {
        let pool = vec![40, 41, 42, 43, 44, 45, 99];
        let cards = generate_seeded(
            &spec(3, 4, 6),
            &CardIdentity::Pool(pool),
            |id| id * 2,
            Some(5),
        )
        .unwrap();
        for c in &cards {
            assert_eq!(c.card_id(), 40 + c.pair_id());
            assert_eq!(c.coin_value(), c.card_id() * 2);
        }
    }

    #[test]
    fn small_pool_is_rejected() {
        let err = generate_seeded(
            &spec(3, 4, 6),
            &CardIdentity::Pool(vec![1, 2]),
            |_| 0,
            Some(1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientCardPool {
                needed: 6,
                available: 2
            }
        );
    }

    #[test]
    fn shuffle_moves_only_unmatched_cards() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut cards = generate(&spec(3, 4, 6), &CardIdentity::Deck, |_| 1, &mut rng).unwrap();
        cards[0].set_matched();
        let fixed = cards[0].rect();
        let before: Vec<Rect> = cards.iter().map(|c| c.rect()).collect();
        let moved = shuffle_positions(&mut cards, &mut rng);
        assert_eq!(moved, 11);
        assert_eq!(cards[0].rect(), fixed);
        let after: Vec<Rect> = cards.iter().map(|c| c.rect()).collect();
        assert_ne!(before, after);
    }
}
