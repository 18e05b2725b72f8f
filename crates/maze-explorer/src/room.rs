//! Room representation and the read contract the explorer relies on.
//!
//! The explorer never sees a map directly. It only asks a [`RoomMap`] which
//! exits a room has and where each exit leads. [`World`] is the concrete map
//! loaded from the JSON maze format:
//!
//! ```json
//! { "start": 0, "rooms": { "0": { "n": 1, "e": null }, "1": { "s": 0 } } }
//! ```
//!
//! An exit mapped to `null` exists but its far side is unmapped.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::{ExploreError, Result};

/// Compass direction of an exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "n", alias = "north")]
    North,
    #[serde(rename = "s", alias = "south")]
    South,
    #[serde(rename = "e", alias = "east")]
    East,
    #[serde(rename = "w", alias = "west")]
    West,
}

impl Direction {
    /// Lookup order used when mapping a move back to a direction
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn token(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
        }
    }

    pub fn from_token(token: &str) -> Option<Direction> {
        match token.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Some(Direction::North),
            "s" | "south" => Some(Direction::South),
            "e" | "east" => Some(Direction::East),
            "w" | "west" => Some(Direction::West),
            _ => None,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Read-only view of a room map
pub trait RoomMap {
    type Room: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display;

    /// Exits currently known from `room`
    fn exits(&self, room: Self::Room) -> Vec<Direction>;

    /// Room behind an exit, or `None` when the exit is missing or unmapped
    fn room_in_direction(&self, room: Self::Room, direction: Direction) -> Option<Self::Room>;

    fn north_of(&self, room: Self::Room) -> Option<Self::Room> {
        self.room_in_direction(room, Direction::North)
    }

    fn south_of(&self, room: Self::Room) -> Option<Self::Room> {
        self.room_in_direction(room, Direction::South)
    }

    fn east_of(&self, room: Self::Room) -> Option<Self::Room> {
        self.room_in_direction(room, Direction::East)
    }

    fn west_of(&self, room: Self::Room) -> Option<Self::Room> {
        self.room_in_direction(room, Direction::West)
    }

    /// Neighbour through `direction` using the per-direction accessors
    fn neighbor(&self, room: Self::Room, direction: Direction) -> Option<Self::Room> {
        match direction {
            Direction::North => self.north_of(room),
            Direction::South => self.south_of(room),
            Direction::East => self.east_of(room),
            Direction::West => self.west_of(room),
        }
    }
}

pub type RoomId = u32;

/// Maze file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeConfig {
    pub start: RoomId,
    pub rooms: BTreeMap<RoomId, BTreeMap<Direction, Option<RoomId>>>,
}

/// A validated room map
#[derive(Debug, Clone)]
pub struct World {
    start: RoomId,
    rooms: BTreeMap<RoomId, BTreeMap<Direction, Option<RoomId>>>,
}

impl World {
    /// Validate a maze: the start and every exit target must be defined rooms
    pub fn from_config(config: MazeConfig) -> Result<Self> {
        if !config.rooms.contains_key(&config.start) {
            return Err(ExploreError::UnknownRoom {
                id: config.start.to_string(),
            });
        }
        for exits in config.rooms.values() {
            for target in exits.values().flatten() {
                if !config.rooms.contains_key(target) {
                    return Err(ExploreError::UnknownRoom {
                        id: target.to_string(),
                    });
                }
            }
        }
        Ok(Self {
            start: config.start,
            rooms: config.rooms,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: MazeConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    pub fn start(&self) -> RoomId {
        self.start
    }

    /// Change the start room
    pub fn with_start(mut self, start: RoomId) -> Result<Self> {
        if !self.rooms.contains_key(&start) {
            return Err(ExploreError::UnknownRoom {
                id: start.to_string(),
            });
        }
        self.start = start;
        Ok(self)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn contains(&self, room: RoomId) -> bool {
        self.rooms.contains_key(&room)
    }
}

impl RoomMap for World {
    type Room = RoomId;

    fn exits(&self, room: RoomId) -> Vec<Direction> {
        self.rooms
            .get(&room)
            .map(|exits| exits.keys().copied().collect())
            .unwrap_or_default()
    }

    fn room_in_direction(&self, room: RoomId, direction: Direction) -> Option<RoomId> {
        self.rooms
            .get(&room)
            .and_then(|exits| exits.get(&direction).copied().flatten())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_tokens() {
        for direction in Direction::ALL {
            let token = direction.token().to_string();
            assert_eq!(Direction::from_token(&token), Some(direction));
            assert_eq!(direction.opposite().opposite(), direction);
        }
        assert_eq!(Direction::from_token("North"), Some(Direction::North));
        assert_eq!(Direction::from_token("up"), None);
    }

    #[test]
    fn test_parse_world() {
        let world = World::from_json(
            r#"{ "start": 0, "rooms": { "0": { "n": 1, "e": null }, "1": { "south": 0 } } }"#,
        )
        .unwrap();

        assert_eq!(world.start(), 0);
        assert_eq!(world.room_count(), 2);
        assert_eq!(world.exits(0), vec![Direction::North, Direction::East]);
        assert_eq!(world.north_of(0), Some(1));
        assert_eq!(world.room_in_direction(0, Direction::East), None);
        assert_eq!(world.south_of(1), Some(0));
        assert_eq!(world.neighbor(1, Direction::South), Some(0));
    }

    #[test]
    fn test_undefined_target_rejected() {
        let err = World::from_json(r#"{ "start": 0, "rooms": { "0": { "w": 5 } } }"#).unwrap_err();
        assert!(matches!(err, ExploreError::UnknownRoom { ref id } if id == "5"));

        let err = World::from_json(r#"{ "start": 3, "rooms": { "0": {} } }"#).unwrap_err();
        assert!(matches!(err, ExploreError::UnknownRoom { .. }));
    }

    #[test]
    fn test_with_start() {
        let world = fixtures::linear();
        assert_eq!(world.clone().with_start(2).unwrap().start(), 2);
        assert!(world.with_start(99).is_err());
    }
}
