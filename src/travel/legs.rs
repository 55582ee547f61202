//! Trip-leg reconstruction.
//!
//! The team starts at its home base and travels to each game's venue in date
//! order. A leg is emitted only when the venue differs from the city the team
//! is currently in; after the last game the team flies home.
//!
//! The walk is a fold over games with an explicit accumulator (`TripState`):
//! `step` is pure and returns the next state plus an optional leg, so the
//! "current city" cursor never lives outside the fold.

use chrono::NaiveDate;

use crate::domain::{CityTable, Game, Leg};
use crate::error::AppError;
use crate::math::haversine_km;

/// Fold state: where the team is and the date of the last game processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripState {
    pub current_city: String,
    pub last_date: Option<NaiveDate>,
}

impl TripState {
    pub fn at_home(home: &str) -> Self {
        Self {
            current_city: home.to_string(),
            last_date: None,
        }
    }
}

/// A leg before distance lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegDraft {
    pub date: NaiveDate,
    pub from_city: String,
    pub to_city: String,
}

/// Advance the trip by one game.
///
/// The cursor always moves to the venue; a leg is produced only on a city change.
pub fn step(state: TripState, game: &Game) -> (TripState, Option<LegDraft>) {
    let draft = (game.venue_city != state.current_city).then(|| LegDraft {
        date: game.date,
        from_city: state.current_city.clone(),
        to_city: game.venue_city.clone(),
    });

    let next = TripState {
        current_city: game.venue_city.clone(),
        last_date: Some(game.date),
    };

    (next, draft)
}

/// The trip home after the last game, dated at that game's date.
pub fn closing_leg(state: &TripState, home: &str) -> Option<LegDraft> {
    let date = state.last_date?;
    (state.current_city != home).then(|| LegDraft {
        date,
        from_city: state.current_city.clone(),
        to_city: home.to_string(),
    })
}

/// Walk the schedule and return every leg with its great-circle distance.
///
/// Games are stably sorted by date first. Any city missing from `cities` is
/// fatal.
pub fn reconstruct_legs(games: &[Game], cities: &CityTable, home: &str) -> Result<Vec<Leg>, AppError> {
    let mut ordered: Vec<&Game> = games.iter().collect();
    ordered.sort_by_key(|g| g.date);

    let (state, mut drafts) = ordered.into_iter().fold(
        (TripState::at_home(home), Vec::new()),
        |(state, mut drafts), game| {
            let (next, draft) = step(state, game);
            drafts.extend(draft);
            (next, drafts)
        },
    );
    drafts.extend(closing_leg(&state, home));

    drafts.into_iter().map(|d| measure(d, cities)).collect()
}

fn measure(draft: LegDraft, cities: &CityTable) -> Result<Leg, AppError> {
    let from = cities.get(&draft.from_city)?.coords();
    let to = cities.get(&draft.to_city)?.coords();
    Ok(Leg {
        date: draft.date,
        km: haversine_km(from, to),
        from_city: draft.from_city,
        to_city: draft.to_city,
    })
}
