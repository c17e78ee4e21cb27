pub mod card;
pub mod deck;
pub mod hand;
pub mod legal;
pub mod play;
pub mod player;
pub mod rank;
pub mod suit;
pub mod trump;
