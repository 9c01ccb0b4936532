pub mod admin;
pub mod admin_notification;
pub mod bet;
pub mod bet_game;
pub mod challenge;
pub mod championship;
pub mod game;
pub mod questionnaire;
pub mod step;
pub mod tip;
pub mod user;
pub mod user_challenge;
pub mod user_challenge_step;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::admin::{self, Entity as Admin};
    pub use super::admin_notification::{self, Entity as AdminNotification};
    pub use super::bet::{self, Entity as Bet};
    pub use super::bet_game::{self, Entity as BetGame};
    pub use super::challenge::{self, Entity as Challenge};
    pub use super::championship::{self, Entity as Championship};
    pub use super::game::{self, Entity as Game};
    pub use super::questionnaire::{self, Entity as Questionnaire};
    pub use super::step::{self, Entity as Step};
    pub use super::tip::{self, Entity as Tip};
    pub use super::user::{self, Entity as User};
    pub use super::user_challenge::{self, Entity as UserChallenge};
    pub use super::user_challenge_step::{self, Entity as UserChallengeStep};
}
