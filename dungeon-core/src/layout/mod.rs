//! Room layout generation.
//!
//! Every room is a square grid: walls on the border, floor inside, one spawn
//! point in the top-left interior corner and two exits carved into the south
//! and east walls. Exits stay closed until the room is cleared.
//!
//! ```text
//!  1 1 1 1 1 1
//!  1 S 0 0 0 1        S = spawn (floor tile, recorded separately)
//!  1 0 0 0 0 1
//!  1 0 0 0 0 2  <- east exit  (size-1, size/2)
//!  1 0 0 0 0 1
//!  1 1 1 2 1 1  <- south exit (size/2, size-1)
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::MIN_LAYOUT_SIZE;
use crate::error::GenerationError;

/// Tile codes as they appear in the serialized grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tile {
    Floor,
    Wall,
    Exit,
}

impl Tile {
    pub fn code(self) -> u8 {
        match self {
            Tile::Floor => 0,
            Tile::Wall => 1,
            Tile::Exit => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Tile::Floor),
            1 => Some(Tile::Wall),
            2 => Some(Tile::Exit),
            _ => None,
        }
    }
}

impl From<Tile> for u8 {
    fn from(tile: Tile) -> Self {
        tile.code()
    }
}

impl TryFrom<u8> for Tile {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Tile::from_code(code).ok_or_else(|| format!("invalid tile code {code}"))
    }
}

/// Grid coordinate, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Player spawn, fixed at the top-left interior corner
pub const SPAWN_POINT: Point = Point::new(1, 1);

/// Square tile grid, serialized as rows of tile codes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileGrid {
    rows: Vec<Vec<Tile>>,
}

impl TileGrid {
    /// Border walls around a floor interior
    fn walled(size: u32) -> Self {
        let last = size - 1;
        let rows = (0..size)
            .map(|y| {
                (0..size)
                    .map(|x| {
                        if x == 0 || y == 0 || x == last || y == last {
                            Tile::Wall
                        } else {
                            Tile::Floor
                        }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Edge length (number of rows)
    pub fn size(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn get(&self, point: Point) -> Option<Tile> {
        self.rows
            .get(point.y as usize)
            .and_then(|row| row.get(point.x as usize))
            .copied()
    }

    fn set(&mut self, point: Point, tile: Tile) {
        if let Some(cell) = self
            .rows
            .get_mut(point.y as usize)
            .and_then(|row| row.get_mut(point.x as usize))
        {
            *cell = tile;
        }
    }

    /// Iterate every cell as (point, tile), row by row
    pub fn cells(&self) -> impl Iterator<Item = (Point, Tile)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, tile)| (Point::new(x as u32, y as u32), *tile))
        })
    }

    pub fn is_border(&self, point: Point) -> bool {
        let last = self.size().saturating_sub(1);
        point.x == 0 || point.y == 0 || point.x == last || point.y == last
    }
}

/// A room's tile grid plus its spawn and exit markers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomLayout {
    pub tiles: TileGrid,
    pub spawn_point: Point,
    /// South exit first, then east
    pub exit_points: [Point; 2],
    /// Closed until the room is cleared
    pub exits_open: bool,
}

impl RoomLayout {
    pub fn is_exit(&self, point: Point) -> bool {
        self.exit_points.contains(&point)
    }
}

/// Build the layout for a `size` x `size` room.
///
/// Sizes below [`MIN_LAYOUT_SIZE`] would put the exits on the corners or
/// outside the grid and are rejected.
pub fn generate_layout(size: u32) -> Result<RoomLayout, GenerationError> {
    if size < MIN_LAYOUT_SIZE {
        return Err(GenerationError::RoomTooSmall {
            size,
            min: MIN_LAYOUT_SIZE,
        });
    }
    Ok(carve_layout(size))
}

/// Layout builder for sizes already known to be valid
pub(crate) fn carve_layout(size: u32) -> RoomLayout {
    debug_assert!(size >= MIN_LAYOUT_SIZE, "layout size {size} too small");

    let mut tiles = TileGrid::walled(size);
    let exit_south = Point::new(size / 2, size - 1);
    let exit_east = Point::new(size - 1, size / 2);
    tiles.set(exit_south, Tile::Exit);
    tiles.set(exit_east, Tile::Exit);

    RoomLayout {
        tiles,
        spawn_point: SPAWN_POINT,
        exit_points: [exit_south, exit_east],
        exits_open: false,
    }
}
