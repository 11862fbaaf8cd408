use mlua::prelude::LuaError;
use mlua::{IntoLua, Lua, Value};
use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::finish_line::Crossing;
use crate::strategy::MoveStrategy;
use crate::vector::Vector;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    id: char,
    position: Vector,
    velocity: Vector,
    crashed: bool,
    finish_line_crossings: i32,
    #[serde(skip)]
    strategy: MoveStrategy,
}

impl Car {
    pub const fn new(id: char, position: Vector) -> Self {
        Self {
            id,
            position,
            velocity: Vector::ZERO,
            crashed: false,
            finish_line_crossings: 0,
            strategy: MoveStrategy::DoNotMove,
        }
    }

    pub const fn id(&self) -> char {
        self.id
    }

    pub const fn position(&self) -> Vector {
        self.position
    }

    pub const fn velocity(&self) -> Vector {
        self.velocity
    }

    pub const fn is_crashed(&self) -> bool {
        self.crashed
    }

    /// Net count of correct finish line crossings; wrong-way crossings subtract.
    pub const fn finish_line_crossings(&self) -> i32 {
        self.finish_line_crossings
    }

    /// Position after one more move at the current velocity.
    pub fn next_position(&self) -> Vector {
        self.position + self.velocity
    }

    /// Adds the acceleration to the velocity. A crashed car keeps its velocity.
    pub fn accelerate(&mut self, acceleration: Direction) {
        if !self.crashed {
            self.velocity += acceleration.vector();
        }
    }

    pub fn move_to_next(&mut self) {
        self.position = self.next_position();
    }

    /// Places the car directly, ignoring its velocity. Used for crash positions and race setup.
    pub fn set_position(&mut self, position: Vector) {
        self.position = position;
    }

    /// Marks the car as crashed for the rest of the race; it will never move again.
    pub fn crash(&mut self) {
        self.crashed = true;
        self.strategy = MoveStrategy::DoNotMove;
    }

    pub fn record_crossing(&mut self, crossing: Crossing) {
        self.finish_line_crossings += crossing.delta();
    }

    pub const fn strategy(&self) -> &MoveStrategy {
        &self.strategy
    }

    /// Assigns a driver. Ignored once the car has crashed.
    pub fn set_strategy(&mut self, strategy: MoveStrategy) {
        if !self.crashed {
            self.strategy = strategy;
        }
    }

    pub(crate) fn take_strategy(&mut self) -> MoveStrategy {
        std::mem::take(&mut self.strategy)
    }
}

impl<'lua> IntoLua<'lua> for Car {
    fn into_lua(self, lua: &'lua Lua) -> Result<Value<'lua>, LuaError> {
        let table = lua.create_table()?;
        table.set("id", self.id.to_string())?;
        table.set("x", self.position.x)?;
        table.set("y", self.position.y)?;
        table.set("vx", self.velocity.x)?;
        table.set("vy", self.velocity.y)?;
        table.set("crashed", self.crashed)?;
        table.set("crossings", self.finish_line_crossings)?;
        Ok(Value::Table(table))
    }
}
