use crate::seed::Seeder;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use db::models::{grade, student, subject, teacher_subject};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sea_orm::ActiveValue::Set;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, TransactionTrait};
use std::collections::HashMap;
use tracing::info;

pub struct GradeSeeder;

#[async_trait]
impl Seeder for GradeSeeder {
    fn name(&self) -> &'static str {
        "grades"
    }

    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let students = student::Model::get_all(db).await?;
        let subjects = subject::Model::get_all(db).await?;
        let links = teacher_subject::Model::get_all(db).await?;

        if students.is_empty() || subjects.is_empty() || links.is_empty() {
            info!("no students, subjects or teacher links present, skipping grades phase");
            return Ok(());
        }

        let mut teachers_by_subject: HashMap<i64, Vec<i64>> = HashMap::new();
        for link in &links {
            teachers_by_subject
                .entry(link.subject_id)
                .or_default()
                .push(link.teacher_id);
        }

        let mut rng = StdRng::from_entropy();
        let txn = db.begin().await?;

        for student in &students {
            let mut batch = Vec::new();
            for subject in &subjects {
                // Subjects nobody teaches get no grades.
                let Some(teacher_ids) = teachers_by_subject.get(&subject.id) else {
                    continue;
                };

                for _ in 0..rng.gen_range(10..=20) {
                    let received = Utc::now()
                        - Duration::days(rng.gen_range(0..365))
                        - Duration::minutes(rng.gen_range(0..1440));
                    let now = Utc::now();
                    batch.push(grade::ActiveModel {
                        student_id: Set(student.id),
                        subject_id: Set(subject.id),
                        teacher_id: Set(teacher_ids.choose(&mut rng).copied()),
                        grade: Set(rng.gen_range(1..=100)),
                        date_received: Set(received),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    });
                }
            }
            if !batch.is_empty() {
                grade::Entity::insert_many(batch).exec(&txn).await?;
            }
        }

        txn.commit().await
    }
}
