use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::teacher;
use fake::{Fake, faker::name::en::Name};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};

pub struct TeacherSeeder;

#[async_trait]
impl Seeder for TeacherSeeder {
    fn name(&self) -> &'static str {
        "teachers"
    }

    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let mut rng = StdRng::from_entropy();
        let count = rng.gen_range(3..=5);
        let txn = db.begin().await?;

        for _ in 0..count {
            let name: String = Name().fake();
            teacher::Model::create(&txn, &name).await?;
        }

        txn.commit().await
    }
}
