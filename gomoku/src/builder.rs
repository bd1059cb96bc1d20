use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{BoardParams, GameState};

/// Inference request body as sent by clients. Nothing in it is trusted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestPayload {
    /// Kept as raw JSON so that a malformed value is ignored rather than rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_player: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_move: Option<i64>,
    #[serde(default)]
    pub points: Option<Vec<RequestPoint>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPoint {
    pub x: i64,
    pub y: i64,
    pub player: i64,
}

impl RequestPayload {
    /// A two stone position that is a valid inference body as-is.
    pub fn example() -> Self {
        Self {
            current_player: Some(1.into()),
            last_move: Some(-1),
            points: Some(vec![
                RequestPoint {
                    x: 0,
                    y: 0,
                    player: 1,
                },
                RequestPoint {
                    x: 0,
                    y: 1,
                    player: 2,
                },
            ]),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("points is required")]
    MissingPoints,
    #[error("point {index} ({x}, {y}) is outside the {height}x{width} board")]
    PointOutOfBounds {
        index: usize,
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },
    #[error("point {index} has player {player}, expected 1 or 2")]
    InvalidPlayer { index: usize, player: i64 },
    #[error("last_move {last_move} is outside the board of {cells} cells")]
    LastMoveOutOfBounds { last_move: i64, cells: usize },
}

const DEFAULT_START_PLAYER: usize = 1;

/// Rebuilds a consistent board from a client payload.
///
/// Later points overwrite earlier ones on the same cell. `availables` is recomputed from the
/// occupied cells and never taken from the client.
pub fn build_game_state(
    params: &BoardParams,
    payload: &RequestPayload,
) -> Result<GameState, BoardError> {
    let points = payload.points.as_ref().ok_or(BoardError::MissingPoints)?;
    let mut states = BTreeMap::new();

    for (index, point) in points.iter().enumerate() {
        let cell = params.location_to_move(point.x, point.y).ok_or(
            BoardError::PointOutOfBounds {
                index,
                x: point.x,
                y: point.y,
                width: params.width,
                height: params.height,
            },
        )?;

        let player = match point.player {
            1 => 1,
            2 => 2,
            player => return Err(BoardError::InvalidPlayer { index, player }),
        };

        states.insert(cell, player);
    }

    let last_move = match payload.last_move {
        Some(last_move) if last_move >= 0 => {
            let cell = last_move as usize;
            if cell >= params.num_cells() {
                return Err(BoardError::LastMoveOutOfBounds {
                    last_move,
                    cells: params.num_cells(),
                });
            }
            Some(cell)
        }
        _ => None,
    };

    let current_player = payload
        .current_player
        .as_ref()
        .and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        })
        .and_then(|p| match p {
            1 => Some(1),
            2 => Some(2),
            _ => None,
        })
        .unwrap_or(DEFAULT_START_PLAYER);

    Ok(GameState::from_stones(
        *params,
        states,
        last_move,
        current_player,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> RequestPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_two_stones_on_default_board() {
        let params = BoardParams::default();
        let state = build_game_state(
            &params,
            &payload(json!({
                "current_player": 1,
                "last_move": -1,
                "points": [{"x": 0, "y": 0, "player": 1}, {"x": 0, "y": 1, "player": 2}]
            })),
        )
        .unwrap();

        assert_eq!(state.states().len(), 2);
        assert_eq!(state.states().get(&0), Some(&1));
        assert_eq!(state.states().get(&1), Some(&2));
        assert_eq!(state.availables().len(), 62);
        assert_eq!(state.legal_moves().count(), 62);
        assert_eq!(state.last_move(), None);
        assert_eq!(state.current_player(), 1);
    }

    #[test]
    fn test_states_and_availables_partition_the_board() {
        let params = BoardParams::new(6, 4, 4);
        let state = build_game_state(
            &params,
            &payload(json!({
                "points": [{"x": 3, "y": 5, "player": 2}, {"x": 1, "y": 2, "player": 1}]
            })),
        )
        .unwrap();

        for cell in 0..params.num_cells() {
            assert_ne!(
                state.states().contains_key(&cell),
                state.availables().contains(&cell)
            );
        }
        assert_eq!(state.states().get(&23), Some(&2));
        assert_eq!(state.states().get(&8), Some(&1));
    }

    #[test]
    fn test_missing_points_is_rejected() {
        let err = build_game_state(&BoardParams::default(), &payload(json!({}))).unwrap_err();

        assert_eq!(err, BoardError::MissingPoints);
    }

    #[test]
    fn test_empty_points_is_an_empty_board() {
        let state =
            build_game_state(&BoardParams::default(), &payload(json!({"points": []}))).unwrap();

        assert!(state.states().is_empty());
        assert_eq!(state.availables().len(), 64);
    }

    #[test]
    fn test_row_out_of_range_is_rejected() {
        let err = build_game_state(
            &BoardParams::default(),
            &payload(json!({"points": [{"x": 8, "y": 0, "player": 1}]})),
        )
        .unwrap_err();

        assert!(matches!(err, BoardError::PointOutOfBounds { x: 8, y: 0, .. }));
    }

    #[test]
    fn test_negative_coordinates_are_rejected() {
        let params = BoardParams::default();

        for point in [json!({"x": -1, "y": 0, "player": 1}), json!({"x": 0, "y": -1, "player": 1})] {
            let err = build_game_state(&params, &payload(json!({ "points": [point] }))).unwrap_err();
            assert!(matches!(err, BoardError::PointOutOfBounds { .. }));
        }
    }

    #[test]
    fn test_column_checked_against_width() {
        let params = BoardParams::new(4, 9, 4);
        let err = build_game_state(
            &params,
            &payload(json!({"points": [{"x": 8, "y": 4, "player": 1}]})),
        )
        .unwrap_err();

        assert!(matches!(err, BoardError::PointOutOfBounds { x: 8, y: 4, .. }));
    }

    #[test]
    fn test_unknown_player_is_rejected() {
        let err = build_game_state(
            &BoardParams::default(),
            &payload(json!({"points": [{"x": 0, "y": 0, "player": 1}, {"x": 1, "y": 1, "player": 3}]})),
        )
        .unwrap_err();

        assert_eq!(err, BoardError::InvalidPlayer { index: 1, player: 3 });
    }

    #[test]
    fn test_duplicate_point_last_one_wins() {
        let state = build_game_state(
            &BoardParams::default(),
            &payload(json!({"points": [{"x": 2, "y": 3, "player": 1}, {"x": 2, "y": 3, "player": 2}]})),
        )
        .unwrap();

        assert_eq!(state.states().len(), 1);
        assert_eq!(state.states().get(&19), Some(&2));
        assert_eq!(state.availables().len(), 63);
    }

    #[test]
    fn test_invalid_current_player_falls_back_to_first_player() {
        let params = BoardParams::default();

        for current_player in [json!(3), json!(0), json!("2"), json!(1.5), json!(null)] {
            let state = build_game_state(
                &params,
                &payload(json!({"current_player": current_player, "points": []})),
            )
            .unwrap();

            assert_eq!(state.current_player(), 1);
        }

        let state = build_game_state(
            &params,
            &payload(json!({"current_player": 2, "points": []})),
        )
        .unwrap();

        assert_eq!(state.current_player(), 2);
    }

    #[test]
    fn test_integral_float_current_player() {
        let params = BoardParams::default();

        for (current_player, expected) in [(json!(2.0), 2), (json!(1.0), 1), (json!(3.0), 1)] {
            let state = build_game_state(
                &params,
                &payload(json!({"current_player": current_player, "points": []})),
            )
            .unwrap();

            assert_eq!(state.current_player(), expected);
        }
    }

    #[test]
    fn test_last_move() {
        let params = BoardParams::default();

        let state =
            build_game_state(&params, &payload(json!({"last_move": 63, "points": []}))).unwrap();
        assert_eq!(state.last_move(), Some(63));

        let state =
            build_game_state(&params, &payload(json!({"last_move": -5, "points": []}))).unwrap();
        assert_eq!(state.last_move(), None);

        let err = build_game_state(&params, &payload(json!({"last_move": 64, "points": []})))
            .unwrap_err();
        assert_eq!(
            err,
            BoardError::LastMoveOutOfBounds {
                last_move: 64,
                cells: 64
            }
        );
    }

    #[test]
    fn test_example_builds() {
        let body = serde_json::to_string(&RequestPayload::example()).unwrap();

        assert_eq!(
            body,
            r#"{"current_player":1,"last_move":-1,"points":[{"x":0,"y":0,"player":1},{"x":0,"y":1,"player":2}]}"#
        );

        let state =
            build_game_state(&BoardParams::default(), &serde_json::from_str(&body).unwrap())
                .unwrap();

        assert_eq!(state.states().len(), 2);
    }
}
