pub mod body;
pub mod collision;
pub mod config;
pub mod enemy;
pub mod error;
pub mod events;
pub mod items;
pub mod level;
pub mod platform;
pub mod player;
pub mod session;
pub mod world;

pub use config::PlatformerConfig;
pub use error::LevelError;
pub use events::{SimEvent, TickOutcome};
pub use level::LevelData;
pub use session::{Session, SessionState};
pub use world::{StepReport, World};

/// Level fixtures shared by unit and integration tests.
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::level::{CODE_SOLID, EntityKind, EntitySpawn, LevelData, LevelGrid};

    pub const TILE_SIZE: f32 = 32.0;
    pub const ROOM_WIDTH: u32 = 20;
    pub const ROOM_HEIGHT: u32 = 15;
    /// Top edge of the floor row in a [`ROOM_HEIGHT`]-tall floored room.
    pub const FLOOR_TOP: f32 = (ROOM_HEIGHT - 1) as f32 * TILE_SIZE;

    /// Empty room codes with a solid bottom row.
    pub fn floored_codes(width: u32, height: u32) -> Vec<u8> {
        let mut codes = vec![0; width as usize * height as usize];
        let floor = (height as usize - 1) * width as usize;
        codes[floor..].fill(CODE_SOLID);
        codes
    }

    pub fn floored_grid(width: u32, height: u32) -> LevelGrid {
        LevelGrid::build(&floored_codes(width, height), width, height, TILE_SIZE)
            .expect("floored room is a valid grid")
    }

    pub fn spawn(kind: EntityKind, x: f32, y: f32) -> EntitySpawn {
        EntitySpawn { kind, x, y }
    }

    /// A standard floored room holding the given entities.
    pub fn level_data(entities: Vec<EntitySpawn>) -> LevelData {
        LevelData {
            width: ROOM_WIDTH,
            height: ROOM_HEIGHT,
            tile_size: TILE_SIZE,
            tile_data: floored_codes(ROOM_WIDTH, ROOM_HEIGHT),
            entities,
            moving_platforms: Vec::new(),
        }
    }
}
