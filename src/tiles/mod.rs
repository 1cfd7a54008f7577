//! Vector tile kinds.
//!
//! Every kind provides one capability: given an [`AnimationState`], emit the
//! line geometry for that state. Dispatch is a plain `match` over
//! [`TileKind`]; there is no per-kind object hierarchy.

mod boxstack;
mod forest;
mod grass;
mod lava;
mod pyramid;
mod sand;
mod snow;
mod water;
mod wheat;

use std::f32::consts::TAU;
use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::{GeometryBuilder, TileFrame, VertexGeometry};
use crate::level::TileTypeId;

/// One frame of a tile kind's animation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AnimationState(pub u8);

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The built-in vector tile kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Swaying grass blades.
    Grass,
    /// Drifting wave lines.
    Water,
    /// Pines that lean with the wind.
    Forest,
    /// Static dunes.
    Sand,
    /// Bubbling crust.
    Lava,
    /// Falling flakes.
    Snow,
    /// Rippling stalks.
    Wheat,
    /// Static stepped pyramid.
    Pyramid,
    /// Three stacked boxes that shuffle.
    BoxStack,
}

impl TileKind {
    /// Every kind, in built-in registry order.
    pub const ALL: [TileKind; 9] = [
        TileKind::Grass,
        TileKind::Water,
        TileKind::Forest,
        TileKind::Sand,
        TileKind::Lava,
        TileKind::Snow,
        TileKind::Wheat,
        TileKind::Pyramid,
        TileKind::BoxStack,
    ];

    /// Lowercase name, as used in legends.
    pub fn name(self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Water => "water",
            TileKind::Forest => "forest",
            TileKind::Sand => "sand",
            TileKind::Lava => "lava",
            TileKind::Snow => "snow",
            TileKind::Wheat => "wheat",
            TileKind::Pyramid => "pyramid",
            TileKind::BoxStack => "boxstack",
        }
    }

    /// Default legend symbol (matched case-insensitively).
    pub fn symbol(self) -> char {
        match self {
            TileKind::Grass => 'G',
            TileKind::Water => 'W',
            TileKind::Forest => 'F',
            TileKind::Sand => 'S',
            TileKind::Lava => 'L',
            TileKind::Snow => 'N',
            TileKind::Wheat => 'Y',
            TileKind::Pyramid => 'P',
            TileKind::BoxStack => 'B',
        }
    }

    /// Length of the animation cycle; `1` means static.
    pub fn state_count(self) -> u8 {
        match self {
            TileKind::Sand | TileKind::Pyramid => 1,
            TileKind::BoxStack => 3,
            _ => 5,
        }
    }

    /// More than one animation state.
    pub fn is_animated(self) -> bool {
        self.state_count() > 1
    }

    /// Generates the geometry for `state`. Deterministic for a given kind,
    /// state and frame.
    pub fn build(self, frame: &TileFrame, state: AnimationState) -> VertexGeometry {
        let mut out = GeometryBuilder::new();
        let mut rng = self.layout_rng();
        let phase = cycle_phase(state, self.state_count());
        match self {
            TileKind::Grass => grass::build(frame, phase, &mut rng, &mut out),
            TileKind::Water => water::build(frame, phase, &mut out),
            TileKind::Forest => forest::build(frame, phase, &mut rng, &mut out),
            TileKind::Sand => sand::build(frame, &mut rng, &mut out),
            TileKind::Lava => lava::build(frame, phase, &mut rng, &mut out),
            TileKind::Snow => snow::build(frame, phase, &mut rng, &mut out),
            TileKind::Wheat => wheat::build(frame, phase, &mut rng, &mut out),
            TileKind::Pyramid => pyramid::build(frame, &mut out),
            TileKind::BoxStack => boxstack::build(frame, state.0, &mut rng, &mut out),
        }
        out.build()
    }

    // Decoration layout is fixed per kind so every state of a tile, and
    // every run, places its strokes in the same spots.
    fn layout_rng(self) -> ChaCha8Rng {
        let seed = self
            .name()
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
                (h ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
            });
        ChaCha8Rng::seed_from_u64(seed)
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position of `state` in its cycle as an angle in `[0, TAU)`.
fn cycle_phase(state: AnimationState, count: u8) -> f32 {
    if count <= 1 {
        0.0
    } else {
        state.0 as f32 / count as f32 * TAU
    }
}

/// Lookup table from [`TileTypeId`] to [`TileKind`].
#[derive(Debug, Clone, Default)]
pub struct TileRegistry {
    kinds: Vec<Option<TileKind>>,
}

impl TileRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in kind, ids assigned in [`TileKind::ALL`] order.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in TileKind::ALL {
            registry.register(kind);
        }
        registry
    }

    /// Adds `kind` under the next free id.
    pub fn register(&mut self, kind: TileKind) -> TileTypeId {
        let id = TileTypeId(self.kinds.len() as u16);
        self.kinds.push(Some(kind));
        id
    }

    /// Kind registered under `id`.
    #[inline]
    pub fn kind(&self, id: TileTypeId) -> Option<TileKind> {
        self.kinds.get(id.0 as usize).copied().flatten()
    }

    /// First id registered for `kind`.
    pub fn id_of(&self, kind: TileKind) -> Option<TileTypeId> {
        self.kinds
            .iter()
            .position(|k| *k == Some(kind))
            .map(|i| TileTypeId(i as u16))
    }

    /// Resolves a built-in legend symbol.
    pub fn resolve_symbol(&self, symbol: char) -> Option<TileTypeId> {
        self.find(|kind| kind.symbol().eq_ignore_ascii_case(&symbol))
    }

    /// Resolves a legend description such as `"Grass (animated)"` by its
    /// first word.
    pub fn resolve_name(&self, description: &str) -> Option<TileTypeId> {
        let word = description
            .split(|c: char| !c.is_ascii_alphanumeric())
            .find(|w| !w.is_empty())?;
        self.find(|kind| kind.name().eq_ignore_ascii_case(word))
    }

    fn find(&self, pred: impl Fn(TileKind) -> bool) -> Option<TileTypeId> {
        self.kinds
            .iter()
            .position(|k| k.is_some_and(&pred))
            .map(|i| TileTypeId(i as u16))
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
