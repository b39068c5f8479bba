use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::{subject, teacher, teacher_subject};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use tracing::info;

pub struct TeacherSubjectSeeder;

#[async_trait]
impl Seeder for TeacherSubjectSeeder {
    fn name(&self) -> &'static str {
        "teacher_subjects"
    }

    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let teachers = teacher::Model::get_all(db).await?;
        let subjects = subject::Model::get_all(db).await?;

        // Upstream phase may have rolled back; nothing to link is not an error.
        if teachers.is_empty() || subjects.is_empty() {
            info!("no teachers or subjects present, skipping teacher_subjects phase");
            return Ok(());
        }

        let mut rng = StdRng::from_entropy();
        let txn = db.begin().await?;

        let max_links = teachers.len().min(3);
        for subject in &subjects {
            let count = rng.gen_range(1..=max_links);
            for teacher in teachers.choose_multiple(&mut rng, count) {
                teacher_subject::Model::link(&txn, teacher.id, subject.id).await?;
            }
        }

        txn.commit().await
    }
}
