use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::group;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};

pub struct GroupSeeder;

#[async_trait]
impl Seeder for GroupSeeder {
    fn name(&self) -> &'static str {
        "groups"
    }

    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let mut rng = StdRng::from_entropy();
        let txn = db.begin().await?;

        for stream in ["CS", "EE", "MD"] {
            let name = format!("{}-{}", stream, rng.gen_range(100..400));
            group::Model::create(&txn, &name).await?;
        }

        txn.commit().await
    }
}
