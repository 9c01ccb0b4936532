pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users;
mod m20250901_000002_create_admins;
mod m20250901_000003_create_challenges;
mod m20250901_000004_create_steps;
mod m20250901_000005_create_user_challenges;
mod m20250901_000006_create_user_challenge_steps;
mod m20250901_000007_create_games;
mod m20250901_000008_create_bets;
mod m20250901_000009_create_championships;
mod m20250901_000010_create_bet_games;
mod m20250901_000011_create_tips;
mod m20250901_000012_create_admin_notifications;
mod m20250901_000013_create_questionnaires;
mod m20250901_000014_seed_tips;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users::Migration),
            Box::new(m20250901_000002_create_admins::Migration),
            Box::new(m20250901_000003_create_challenges::Migration),
            Box::new(m20250901_000004_create_steps::Migration),
            Box::new(m20250901_000005_create_user_challenges::Migration),
            Box::new(m20250901_000006_create_user_challenge_steps::Migration),
            Box::new(m20250901_000007_create_games::Migration),
            Box::new(m20250901_000008_create_bets::Migration),
            Box::new(m20250901_000009_create_championships::Migration),
            Box::new(m20250901_000010_create_bet_games::Migration),
            Box::new(m20250901_000011_create_tips::Migration),
            Box::new(m20250901_000012_create_admin_notifications::Migration),
            Box::new(m20250901_000013_create_questionnaires::Migration),
            Box::new(m20250901_000014_seed_tips::Migration),
        ]
    }
}
