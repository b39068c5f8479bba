use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::subject;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};

/// Fixed vocabulary; names are drawn without repetition so the unique
/// constraint on `subjects.name` cannot trip during seeding.
const SUBJECT_NAMES: [&str; 12] = [
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Geography",
    "Literature",
    "Computer Science",
    "Philosophy",
    "Economics",
    "Statistics",
    "Astronomy",
];

pub struct SubjectSeeder;

#[async_trait]
impl Seeder for SubjectSeeder {
    fn name(&self) -> &'static str {
        "subjects"
    }

    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let mut rng = StdRng::from_entropy();
        let count = rng.gen_range(5..=8);
        let names: Vec<&str> = SUBJECT_NAMES
            .choose_multiple(&mut rng, count)
            .copied()
            .collect();

        let txn = db.begin().await?;
        for name in names {
            subject::Model::create(&txn, name).await?;
        }
        txn.commit().await
    }
}
