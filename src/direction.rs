use std::fmt;
use std::str::FromStr;

use mlua::{Error as LuaError, IntoLua, Lua, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vector::Vector;

/// Acceleration applied to a car in one turn.
///
/// The discriminants are the selection codes shown to players, so the order must not change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Direction {
    #[default]
    None = 0,
    UpLeft = 1,
    Up = 2,
    UpRight = 3,
    Left = 4,
    Right = 5,
    DownLeft = 6,
    Down = 7,
    DownRight = 8,
}

impl Direction {
    pub const ALL: [Self; 9] = [
        Self::None,
        Self::UpLeft,
        Self::Up,
        Self::UpRight,
        Self::Left,
        Self::Right,
        Self::DownLeft,
        Self::Down,
        Self::DownRight,
    ];

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn vector(self) -> Vector {
        match self {
            Self::None => Vector::new(0, 0),
            Self::UpLeft => Vector::new(-1, -1),
            Self::Up => Vector::new(0, -1),
            Self::UpRight => Vector::new(1, -1),
            Self::Left => Vector::new(-1, 0),
            Self::Right => Vector::new(1, 0),
            Self::DownLeft => Vector::new(-1, 1),
            Self::Down => Vector::new(0, 1),
            Self::DownRight => Vector::new(1, 1),
        }
    }

    /// Maps a unit delta back to its direction; anything else is `None`.
    pub fn from_vector(vector: Vector) -> Self {
        Self::ALL
            .into_iter()
            .find(|direction| direction.vector() == vector)
            .unwrap_or(Self::None)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::UpLeft => "UP_LEFT",
            Self::Up => "UP",
            Self::UpRight => "UP_RIGHT",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::DownLeft => "DOWN_LEFT",
            Self::Down => "DOWN",
            Self::DownRight => "DOWN_RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown direction: {0}")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.name() == s)
            .ok_or_else(|| UnknownDirection(s.to_owned()))
    }
}

impl<'lua> IntoLua<'lua> for Direction {
    fn into_lua(self, lua: &'lua Lua) -> Result<Value<'lua>, LuaError> {
        let table = lua.create_table()?;
        table.set("index", self.index())?;
        table.set("name", self.name())?;
        table.set("x", self.vector().x)?;
        table.set("y", self.vector().y)?;
        Ok(Value::Table(table))
    }
}
