use serde::{Deserialize, Serialize};

use skyward_core::math::Rect;

use crate::collision::LANDING_EPSILON;
use crate::config::CRUMBLE_DELAY_SECS;
use crate::error::LevelError;

/// Raw tile-type code for an empty cell.
pub const CODE_EMPTY: u8 = 0;
/// Raw tile-type code for a permanent solid block.
pub const CODE_SOLID: u8 = 1;
/// Raw tile-type code for a block that crumbles after being stood on.
pub const CODE_CRUMBLING: u8 = 2;

/// Lifecycle of a crumbling tile: Idle → Crumbling → Gone, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CrumbleState {
    Idle,
    Crumbling { remaining_secs: f32 },
    Gone,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TileKind {
    Solid,
    Crumbling(CrumbleState),
}

/// A collidable tile in the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub col: u32,
    pub row: u32,
    pub rect: Rect,
    pub kind: TileKind,
}

impl Tile {
    /// Whether the tile still blocks movement.
    pub fn is_solid(&self) -> bool {
        !matches!(self.kind, TileKind::Crumbling(CrumbleState::Gone))
    }
}

/// The level's tile layout and the authoritative solidity function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelGrid {
    pub width_tiles: u32,
    pub height_tiles: u32,
    pub tile_size: f32,
    /// Tiles in row-major order.
    tiles: Vec<Tile>,
    /// Per-cell index into `tiles` (row-major, `None` for empty cells).
    cells: Vec<Option<usize>>,
    crumble_delay_secs: f32,
}

impl LevelGrid {
    /// Build a grid from raw tile-type codes stored row-major.
    pub fn build(
        codes: &[u8],
        width: u32,
        height: u32,
        tile_size: f32,
    ) -> Result<Self, LevelError> {
        if width == 0 || height == 0 || !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(LevelError::InvalidDimensions {
                width,
                height,
                tile_size,
            });
        }
        let expected = width as usize * height as usize;
        if codes.len() != expected {
            return Err(LevelError::InvalidLevelData {
                expected,
                actual: codes.len(),
            });
        }

        let mut tiles = Vec::new();
        let mut cells = vec![None; expected];
        let mut unknown = 0usize;

        for row in 0..height {
            for col in 0..width {
                let cell = row as usize * width as usize + col as usize;
                let kind = match codes[cell] {
                    CODE_EMPTY => continue,
                    CODE_SOLID => TileKind::Solid,
                    CODE_CRUMBLING => TileKind::Crumbling(CrumbleState::Idle),
                    _ => {
                        unknown += 1;
                        continue;
                    },
                };
                cells[cell] = Some(tiles.len());
                tiles.push(Tile {
                    col,
                    row,
                    rect: Rect::new(
                        col as f32 * tile_size,
                        row as f32 * tile_size,
                        tile_size,
                        tile_size,
                    ),
                    kind,
                });
            }
        }

        if unknown > 0 {
            tracing::warn!(unknown, "Unknown tile codes treated as empty");
        }

        Ok(Self {
            width_tiles: width,
            height_tiles: height,
            tile_size,
            tiles,
            cells,
            crumble_delay_secs: CRUMBLE_DELAY_SECS,
        })
    }

    pub fn with_crumble_delay(mut self, secs: f32) -> Self {
        self.crumble_delay_secs = secs;
        self
    }

    pub fn pixel_width(&self) -> f32 {
        self.width_tiles as f32 * self.tile_size
    }

    pub fn pixel_height(&self) -> f32 {
        self.height_tiles as f32 * self.tile_size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Solidity of the world at a pixel. Everything outside the grid is
    /// solid so bodies cannot leave through the edges.
    pub fn is_solid_at_pixel(&self, x: f32, y: f32) -> bool {
        if !(x >= 0.0 && y >= 0.0 && x < self.pixel_width() && y < self.pixel_height()) {
            return true;
        }
        let col = (x / self.tile_size).floor() as usize;
        let row = (y / self.tile_size).floor() as usize;
        self.cells
            .get(row * self.width_tiles as usize + col)
            .copied()
            .flatten()
            .is_some_and(|i| self.tiles[i].is_solid())
    }

    /// Solid tiles whose cells intersect `area` grown by one tile, in
    /// row-major order.
    pub fn solid_tiles_near<'a>(
        &'a self,
        area: &Rect,
    ) -> impl Iterator<Item = (usize, &'a Tile)> + 'a {
        let ts = self.tile_size;
        let clamp_col = |v: f32| (v / ts).floor().clamp(0.0, self.width_tiles as f32) as usize;
        let clamp_row = |v: f32| (v / ts).floor().clamp(0.0, self.height_tiles as f32) as usize;
        let min_col = clamp_col(area.left() - ts);
        let max_col = clamp_col(area.right() + ts) + 1;
        let min_row = clamp_row(area.top() - ts);
        let max_row = clamp_row(area.bottom() + ts) + 1;
        let width = self.width_tiles as usize;

        (min_row..max_row.min(self.height_tiles as usize))
            .flat_map(move |row| {
                (min_col..max_col.min(width)).map(move |col| row * width + col)
            })
            .filter_map(move |cell| self.cells[cell])
            .map(move |i| (i, &self.tiles[i]))
            .filter(|(_, tile)| tile.is_solid())
    }

    /// Solid tiles a body of extent `rect` is standing on: their top edge is
    /// level with its bottom and their columns overlap it. Row-major order.
    pub fn tiles_supporting(&self, rect: &Rect) -> Vec<usize> {
        self.solid_tiles_near(rect)
            .filter(|(_, tile)| {
                (tile.rect.top() - rect.bottom()).abs() <= LANDING_EPSILON
                    && tile.rect.left() < rect.right()
                    && tile.rect.right() > rect.left()
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Contact from above: an idle crumbling tile starts its countdown.
    /// Returns whether the tile changed state.
    pub fn on_top_contact(&mut self, index: usize) -> bool {
        let delay = self.crumble_delay_secs;
        match self.tiles.get_mut(index) {
            Some(tile) if tile.kind == TileKind::Crumbling(CrumbleState::Idle) => {
                tile.kind = TileKind::Crumbling(CrumbleState::Crumbling {
                    remaining_secs: delay,
                });
                tracing::debug!(col = tile.col, row = tile.row, "Tile started crumbling");
                true
            },
            _ => false,
        }
    }

    /// Advance crumble countdowns. Returns indices of tiles that vanished
    /// during this update.
    pub fn update(&mut self, dt: f32) -> Vec<usize> {
        let mut gone = Vec::new();
        if !dt.is_finite() || dt <= 0.0 {
            return gone;
        }
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            let TileKind::Crumbling(CrumbleState::Crumbling { remaining_secs }) = &mut tile.kind
            else {
                continue;
            };
            *remaining_secs -= dt;
            if *remaining_secs <= 0.0 {
                tile.kind = TileKind::Crumbling(CrumbleState::Gone);
                tracing::debug!(col = tile.col, row = tile.row, "Tile crumbled away");
                gone.push(i);
            }
        }
        gone
    }
}

/// Entity type tags in level files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Player,
    Enemy,
    Key,
    Door,
    Goal,
}

/// An entity placement in level data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpawn {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
}

/// A moving platform placement in level data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSpawn {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub end_x: f32,
    pub end_y: f32,
    pub speed: f32,
}

/// A level file as produced by the level editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub width: u32,
    pub height: u32,
    pub tile_size: f32,
    pub tile_data: Vec<u8>,
    #[serde(default)]
    pub entities: Vec<EntitySpawn>,
    #[serde(default)]
    pub moving_platforms: Vec<PlatformSpawn>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        serde_json::from_str(json).map_err(|e| LevelError::Parse(e.to_string()))
    }

    pub fn spawns(&self, kind: EntityKind) -> impl Iterator<Item = &EntitySpawn> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    pub fn build_grid(&self) -> Result<LevelGrid, LevelError> {
        LevelGrid::build(&self.tile_data, self.width, self.height, self.tile_size)
    }
}
