use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202608250001_create_groups::Migration),
            Box::new(migrations::m202608250002_create_teachers::Migration),
            Box::new(migrations::m202608250003_create_subjects::Migration),
            Box::new(migrations::m202608250004_create_teacher_subjects::Migration),
            Box::new(migrations::m202608250005_create_students::Migration),
            Box::new(migrations::m202608250006_create_grades::Migration),
        ]
    }
}
