use async_trait::async_trait;
use colored::*;
use sea_orm::{DatabaseConnection, DbErr};
use std::io::{self, Write};
use std::time::Instant;
use tracing::{info, warn};

use crate::seeds::{
    grade::GradeSeeder, group::GroupSeeder, student::StudentSeeder, subject::SubjectSeeder,
    teacher::TeacherSeeder, teacher_subject::TeacherSubjectSeeder,
};

const STATUS_COLUMN: usize = 80;

/// One seeding phase. Each implementation opens its own transaction, so a
/// failed phase rolls back without touching rows written by earlier phases.
#[async_trait]
pub trait Seeder {
    fn name(&self) -> &'static str;
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr>;
}

/// Which phases committed and which rolled back.
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub succeeded: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl SeedSummary {
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

pub async fn run_seeder<S: Seeder + ?Sized>(
    seeder: &S,
    db: &DatabaseConnection,
) -> Result<(), DbErr> {
    let base_msg = format!("Seeding {}", seeder.name().bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(base_msg.len()));
    print!("{}{} ", base_msg, dots);
    io::stdout().flush().ok();

    let start = Instant::now();
    match seeder.seed(db).await {
        Ok(()) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
            info!("{} phase committed", seeder.name());
            Ok(())
        }
        Err(e) => {
            println!("{}", "failed".red());
            warn!("{} phase failed, rolled back: {}", seeder.name(), e);
            Err(e)
        }
    }
}

/// Runs every phase in dependency order. A failed phase is recorded and the
/// remaining phases still run; phases whose upstream rows are missing no-op.
pub async fn seed_all(db: &DatabaseConnection) -> SeedSummary {
    let seeders: Vec<Box<dyn Seeder + Send + Sync>> = vec![
        Box::new(GroupSeeder),
        Box::new(TeacherSeeder),
        Box::new(SubjectSeeder),
        Box::new(TeacherSubjectSeeder),
        Box::new(StudentSeeder),
        Box::new(GradeSeeder),
    ];

    let mut summary = SeedSummary::default();
    for seeder in &seeders {
        match run_seeder(seeder.as_ref(), db).await {
            Ok(()) => summary.succeeded.push(seeder.name()),
            Err(e) => summary.failed.push((seeder.name(), e.to_string())),
        }
    }
    info!("Database seeding finished");
    summary
}

#[cfg(test)]
mod tests {
    use super::seed_all;
    use crate::verify::all_tables_populated;
    use db::models::{grade, group, student, subject, teacher};
    use db::test_utils::setup_test_db;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    #[tokio::test]
    async fn test_seed_all_populates_every_table() {
        let db = setup_test_db().await;

        let summary = seed_all(&db).await;
        assert!(summary.all_ok(), "failed phases: {:?}", summary.failed);
        assert!(all_tables_populated(&db).await.unwrap());

        let groups = group::Model::get_all(&db).await.unwrap();
        assert_eq!(groups.len(), 3);

        let teachers = teacher::Model::get_all(&db).await.unwrap();
        assert!((3..=5).contains(&teachers.len()));

        let subjects = subject::Model::get_all(&db).await.unwrap();
        assert!((5..=8).contains(&subjects.len()));

        let students = student::Model::get_all(&db).await.unwrap();
        assert!((30..=50).contains(&students.len()));
    }

    #[tokio::test]
    async fn test_seeded_grades_are_valid() {
        let db = setup_test_db().await;
        seed_all(&db).await;

        let now = chrono::Utc::now();
        let grades = grade::Model::get_all(&db).await.unwrap();
        assert!(!grades.is_empty());
        for g in &grades {
            assert!((1..=100).contains(&g.grade));
            assert!(g.date_received <= now);
            assert!(g.teacher_id.is_some());
        }

        // every (student, subject) pair that got grades stays within 10..=20
        let sample = &grades[0];
        let pair_count = grade::Entity::find()
            .filter(grade::Column::StudentId.eq(sample.student_id))
            .filter(grade::Column::SubjectId.eq(sample.subject_id))
            .all(&db)
            .await
            .unwrap()
            .len();
        assert!((10..=20).contains(&pair_count));
    }
}
