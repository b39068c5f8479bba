pub mod m202608250001_create_groups;
pub mod m202608250002_create_teachers;
pub mod m202608250003_create_subjects;
pub mod m202608250004_create_teacher_subjects;
pub mod m202608250005_create_students;
pub mod m202608250006_create_grades;
