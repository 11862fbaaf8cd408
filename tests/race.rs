use std::fs;
use std::io::Cursor;

use racetrack::config::{assign_drivers, DriverKind, DriverSpec};
use racetrack::runtime::{LineInput, ScriptDriver};
use racetrack::{Direction, Game, MoveStrategy, RaceError, State, Track, Vector};

const CHALLENGE: &str = include_str!("../tracks/challenge.txt");
const HORIZONTAL: &str = include_str!("../tracks/horizontal.txt");

fn game_with(text: &str, strategies: [MoveStrategy; 2]) -> Game {
    let mut track = Track::parse(text).unwrap();
    for (index, strategy) in strategies.into_iter().enumerate() {
        track.car_mut(index).set_strategy(strategy);
    }
    Game::new(track)
}

fn no_input() -> LineInput<Cursor<&'static str>, Vec<u8>> {
    LineInput::new(Cursor::new(""), Vec::new())
}

#[test]
fn autopilot_wins_the_straight() {
    let mut game = game_with(
        HORIZONTAL,
        [MoveStrategy::PathFinder(None), MoveStrategy::DoNotMove],
    );

    let winner = game.race(&mut no_input(), 100, |_| {}).unwrap();

    assert_eq!(winner, Some('a'));
    assert_eq!(game.turns(), 19);
    let car = game.track().car(0);
    assert!(!car.is_crashed());
    assert_eq!(car.position(), Vector::new(27, 1));
    assert_eq!(car.finish_line_crossings(), 1);
}

#[test]
fn autopilot_cuts_a_corner_on_the_challenge_track() {
    let mut game = game_with(
        CHALLENGE,
        [MoveStrategy::PathFinder(None), MoveStrategy::DoNotMove],
    );
    let winner = game.race(&mut no_input(), 2_000, |_| {}).unwrap();

    // only landing cells are checked, so a fast diagonal clips the wall
    let car = game.track().car(0);
    assert!(car.is_crashed());
    assert_eq!(car.position(), Vector::new(48, 13));
    assert_eq!(car.finish_line_crossings(), 0);
    assert_eq!(winner, Some('b'));
    assert_eq!(game.turns(), 25);
    assert_eq!(game.state(), State::Done);
}

#[test]
fn move_list_crashes_after_crossing_and_still_wins() {
    let mut game = game_with(
        HORIZONTAL,
        [
            MoveStrategy::move_list([Direction::Right; 7]),
            MoveStrategy::DoNotMove,
        ],
    );

    let mut boards = 0;
    let winner = game.race(&mut no_input(), 100, |_| boards += 1).unwrap();

    assert_eq!(winner, Some('a'));
    assert_eq!(boards, 13);
    let car = game.track().car(0);
    assert!(car.is_crashed());
    assert_eq!(car.position(), Vector::new(29, 1));
}

#[test]
fn user_input_drives_the_car() {
    let mut game = game_with(HORIZONTAL, [MoveStrategy::User, MoveStrategy::DoNotMove]);
    let mut input = LineInput::new(Cursor::new("5\n5\noops\n5\n5\n5\n5\n5\n"), Vec::new());

    let winner = game.race(&mut input, 100, |_| {}).unwrap();
    assert_eq!(winner, Some('a'));
    assert_eq!(game.turns(), 13);
}

#[test]
fn running_out_of_input_stops_the_race() {
    let mut game = game_with(HORIZONTAL, [MoveStrategy::User, MoveStrategy::DoNotMove]);
    let mut input = LineInput::new(Cursor::new("5\n5\n"), Vec::new());

    let result = game.race(&mut input, 100, |_| {});
    assert!(matches!(result, Err(RaceError::InputExhausted)));
    assert_eq!(game.state(), State::Active);
    assert_eq!(game.track().car(0).position(), Vector::new(4, 1));
}

#[test]
fn lua_driver_reads_its_velocity() {
    let script = r"
        function takeYourTurn()
            if GameState.car.vx < 3 then
                return 5
            end
            return 0
        end
    ";
    let mut game = game_with(
        HORIZONTAL,
        [
            MoveStrategy::Script(ScriptDriver::new(script)),
            MoveStrategy::DoNotMove,
        ],
    );

    let winner = game.race(&mut no_input(), 100, |_| {}).unwrap();
    assert_eq!(winner, Some('a'));
    assert_eq!(game.turns(), 19);
    assert_eq!(game.track().car(0).position(), Vector::new(28, 1));
}

#[test]
fn turn_limit_leaves_race_undecided() {
    let mut game = game_with(
        HORIZONTAL,
        [MoveStrategy::DoNotMove, MoveStrategy::DoNotMove],
    );
    let winner = game.race(&mut no_input(), 10, |_| {}).unwrap();
    assert_eq!(winner, None);
    assert_eq!(game.turns(), 10);
    assert_eq!(game.state(), State::Active);
}

#[test]
fn drivers_from_files_and_exported_log() {
    let dir = tempfile::tempdir().unwrap();
    let moves = dir.path().join("a.moves");
    fs::write(&moves, "RIGHT\nRIGHT\nRIGHT\n").unwrap();
    let waypoints = dir.path().join("b.points");
    fs::write(&waypoints, "(X:1, Y:2)\n(X:1, Y:2)\n").unwrap();

    let mut track = Track::parse(HORIZONTAL).unwrap();
    let drivers = [
        DriverSpec {
            car: 'a',
            kind: DriverKind::Moves(moves),
        },
        DriverSpec {
            car: 'b',
            kind: DriverKind::Follow(waypoints),
        },
    ];
    assign_drivers(&mut track, &drivers).unwrap();

    let mut game = Game::new(track);
    game.race(&mut no_input(), 6, |_| {}).unwrap();
    assert_eq!(game.track().car(0).position(), Vector::new(7, 1));
    assert_eq!(game.track().car(1).position(), Vector::new(1, 2));

    let path = game.export_log(&dir.path().join("logs")).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("logs_") && name.ends_with(".json"));

    let log: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(log["logs"].as_array().unwrap().len(), 6);
    assert_eq!(log["logs"][0]["acceleration"], "RIGHT");
    assert_eq!(log["logs"][1]["current_car"], "b");
    assert!(log["winner"].is_null());
}

#[test]
fn bundled_lua_driver_finishes_the_straight() {
    let driver = ScriptDriver::new(include_str!("../drivers/steady.lua"));
    let mut game = game_with(
        HORIZONTAL,
        [MoveStrategy::Script(driver), MoveStrategy::DoNotMove],
    );
    assert_eq!(game.race(&mut no_input(), 100, |_| {}).unwrap(), Some('a'));
}
