use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::{group, student};
use fake::{Fake, faker::name::en::Name};
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use tracing::info;

pub struct StudentSeeder;

#[async_trait]
impl Seeder for StudentSeeder {
    fn name(&self) -> &'static str {
        "students"
    }

    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let groups = group::Model::get_all(db).await?;
        if groups.is_empty() {
            info!("no groups present, skipping students phase");
            return Ok(());
        }

        let count = fastrand::usize(30..=50);
        let txn = db.begin().await?;

        for _ in 0..count {
            let name: String = Name().fake();
            let group = &groups[fastrand::usize(..groups.len())];
            student::Model::create(&txn, &name, group.id).await?;
        }

        txn.commit().await
    }
}
