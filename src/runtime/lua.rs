use mlua::{Function, Lua, UserData, UserDataFields, UserDataMethods};
use tracing::debug;

use crate::direction::Direction;
use crate::error::{RaceError, Result};
use crate::game::Game;
use crate::track::Track;
use crate::vector::Vector;

/// Drives a car with a Lua script.
///
/// The script must define a global `takeYourTurn()` returning a selection code from 0 to 8.
/// Every turn runs in a fresh interpreter with a read-only `GameState` global.
#[derive(Debug, Clone)]
pub struct ScriptDriver {
    source: String,
}

impl ScriptDriver {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn next_direction(&self, game: &Game, car_index: usize) -> Result<Direction> {
        let lua = Lua::new();
        let globals = lua.globals();

        let game_state = GameState {
            turns: game.turns(),
            car_index,
            track: game.track().clone(),
        };
        globals.set("GameState", game_state)?;

        lua.load(&self.source).exec()?;

        let take_your_turn: Function = globals.get("takeYourTurn")?;
        let selection: i64 = take_your_turn.call(())?;
        debug!(car_index, selection, "script chose acceleration");

        usize::try_from(selection)
            .ok()
            .and_then(Direction::from_index)
            .ok_or(RaceError::InvalidDirection(selection))
    }
}

/// Snapshot of the board as seen by a script at the start of its turn.
struct GameState {
    turns: usize,
    car_index: usize,
    track: Track,
}

impl UserData for GameState {
    fn add_fields<'lua, F: UserDataFields<'lua, Self>>(fields: &mut F) {
        fields.add_field_method_get("turns", |_, this| Ok(this.turns));
        fields.add_field_method_get("index", |_, this| Ok(this.car_index + 1));
        fields.add_field_method_get("cars", |_, this| Ok(this.track.cars().to_vec()));
        fields.add_field_method_get("car", |_, this| Ok(this.track.car(this.car_index).clone()));
        fields.add_field_method_get("directions", |_, _| Ok(Direction::ALL.to_vec()));
        fields.add_field_method_get("width", |_, this| Ok(this.track.width()));
        fields.add_field_method_get("height", |_, this| Ok(this.track.height()));
    }

    fn add_methods<'lua, M: UserDataMethods<'lua, Self>>(methods: &mut M) {
        methods.add_method("space_at", |_, this, (x, y): (i32, i32)| {
            Ok(this.track.cell_type(Vector::new(x, y)).symbol().to_string())
        });

        methods.add_method("will_crash", |_, this, (x, y): (i32, i32)| {
            Ok(this.track.is_crash(this.car_index, Vector::new(x, y)))
        });
    }
}
