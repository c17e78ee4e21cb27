use crate::game::state::Phase;
use crate::model::card::{Card, CardId};
use crate::model::play::Play;
use crate::model::player::{Player, Seat};
use crate::model::trump::TrumpContext;
use thiserror::Error;

/// Recoverable rejection of a play or pass. Nothing is applied when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("no cards selected")]
    EmptySelection,
    #[error("card {0} is not in the player's hand")]
    NotOwned(CardId),
    #[error("selected cards do not form a legal play")]
    IllegalShape,
    #[error("play does not beat the current lead")]
    CannotBeat,
    #[error("there is no lead to follow; the player must lead")]
    NoLeadToFollow,
    #[error("it is {expected}'s turn, not {actual}'s")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("game is not in the playing phase ({0:?})")]
    NotPlaying(Phase),
}

/// Checks ownership, shape and the beat requirement for `ids` played by `player`.
pub fn validate(
    player: &Player,
    ids: &[CardId],
    last_play: Option<&Play>,
    trump: TrumpContext,
) -> Result<Play, PlayError> {
    if ids.is_empty() {
        return Err(PlayError::EmptySelection);
    }
    let mut cards: Vec<Card> = Vec::with_capacity(ids.len());
    for id in ids {
        let card = player.hand.get(*id).ok_or(PlayError::NotOwned(*id))?;
        if cards.iter().any(|c| c.id == *id) {
            return Err(PlayError::IllegalShape);
        }
        cards.push(card);
    }
    let play = Play::classify(&cards, trump).ok_or(PlayError::IllegalShape)?;
    if let Some(last) = last_play {
        if !play.can_beat(last) {
            return Err(PlayError::CannotBeat);
        }
    }
    Ok(play)
}
